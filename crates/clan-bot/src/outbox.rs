//! Delivering replies over Signal.

use crate::format::messages;
use crate::reply::Reply;
use signal_client::{Attachment, BotMessage, SentMessage, SignalClient, SignalError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

#[derive(Clone)]
pub struct Outbox {
    signal: SignalClient,
}

impl Outbox {
    pub fn new(signal: SignalClient) -> Self {
        Self { signal }
    }

    /// Deliver every reply in order. Failures are logged and do not stop
    /// the remaining replies.
    pub async fn deliver(&self, original: &BotMessage, replies: Vec<Reply>) {
        for reply in replies {
            if let Err(e) = self.deliver_one(original, reply).await {
                error!("Failed to send reply: {}", e);
            }
        }
    }

    async fn deliver_one(&self, original: &BotMessage, reply: Reply) -> Result<(), SignalError> {
        match reply {
            Reply::Text(text) => {
                self.signal.reply(original, &text).await?;
            }
            Reply::Image {
                png,
                filename,
                caption,
            } => {
                let attachment = Attachment::png(filename, png);
                self.signal
                    .send_attachment(&original.reply_target(), &caption, &attachment)
                    .await?;
            }
            Reply::Ephemeral { text, ttl } => {
                let sent = self.signal.reply(original, &text).await?;
                self.expire(sent, ttl);
            }
            Reply::Pong { api_latency } => {
                let started = Instant::now();
                let sent = self.signal.reply(original, messages::PING_PENDING).await?;
                let transport_latency = started.elapsed();
                self.signal
                    .edit(&sent, &messages::ping(api_latency, transport_latency))
                    .await?;
            }
            Reply::Notify { recipient, text } => {
                self.signal.send(&recipient, &text).await?;
            }
        }
        Ok(())
    }

    /// Delete a sent message for everyone once `ttl` has passed.
    fn expire(&self, sent: SentMessage, ttl: Duration) -> JoinHandle<()> {
        let signal = self.signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            match signal.remote_delete(&sent).await {
                Ok(()) => debug!("Expired message {}", sent.timestamp),
                Err(e) => warn!("Failed to expire message {}: {}", sent.timestamp, e),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BOT: &str = "+10000000000";

    fn message(group: Option<&str>) -> BotMessage {
        BotMessage {
            source: "+15550001".into(),
            source_name: None,
            text: "!ping".into(),
            timestamp: 1,
            is_group: group.is_some(),
            group_id: group.map(str::to_string),
            receiving_account: BOT.into(),
            mentions: Vec::new(),
        }
    }

    async fn outbox(server: &MockServer) -> Outbox {
        Outbox::new(SignalClient::new(server.uri(), BOT).unwrap())
    }

    fn sent_ok() -> ResponseTemplate {
        ResponseTemplate::new(201)
            .set_body_json(serde_json::json!({ "timestamp": "1700000000000" }))
    }

    #[tokio::test]
    async fn test_text_goes_to_group() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .and(body_string_contains("group.YWJj"))
            .and(body_string_contains("hello"))
            .respond_with(sent_ok())
            .expect(1)
            .mount(&server)
            .await;

        outbox(&server)
            .await
            .deliver(&message(Some("abc")), vec![Reply::text("hello")])
            .await;
    }

    #[tokio::test]
    async fn test_image_sent_as_attachment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .and(body_string_contains("data:image/png;filename=warlog-2PP.png;base64,"))
            .respond_with(sent_ok())
            .expect(1)
            .mount(&server)
            .await;

        let image = Reply::Image {
            png: vec![1, 2, 3],
            filename: "warlog-2PP.png".into(),
            caption: "War log".into(),
        };
        outbox(&server).await.deliver(&message(None), vec![image]).await;
    }

    #[tokio::test]
    async fn test_pong_is_sent_then_edited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .and(body_string_contains("Checking latency"))
            .respond_with(sent_ok())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .and(body_string_contains("edit_timestamp"))
            .and(body_string_contains("Clash of Clans API: 42.00 ms"))
            .respond_with(sent_ok())
            .expect(1)
            .mount(&server)
            .await;

        let pong = Reply::Pong {
            api_latency: Duration::from_millis(42),
        };
        outbox(&server).await.deliver(&message(None), vec![pong]).await;
    }

    #[tokio::test]
    async fn test_ephemeral_is_deleted_after_ttl() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .respond_with(sent_ok())
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1/remote-delete/%2B10000000000"))
            .and(body_string_contains("1700000000000"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let outbox = outbox(&server).await;
        let sent = outbox.signal.send("+15550001", "help").await.unwrap();
        outbox.expire(sent, Duration::from_millis(10)).await.unwrap();
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_replies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .and(body_string_contains("first"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/send"))
            .and(body_string_contains("welcome"))
            .and(body_string_contains("+15550009"))
            .respond_with(sent_ok())
            .expect(1)
            .mount(&server)
            .await;

        let replies = vec![
            Reply::text("first"),
            Reply::Notify {
                recipient: "+15550009".into(),
                text: "welcome".into(),
            },
        ];
        outbox(&server).await.deliver(&message(None), replies).await;
    }
}

//! Utility commands: ping, help, botinfo and info.

use super::{CommandContext, CommandHandler};
use crate::error::AppResult;
use crate::format::messages;
use crate::reply::Reply;
use crate::upstream::GameData;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Measures game API latency; the transport leg is timed on delivery.
pub struct PingHandler {
    game: Arc<dyn GameData>,
    probe_tag: String,
}

impl PingHandler {
    pub fn new(game: Arc<dyn GameData>, probe_tag: impl Into<String>) -> Self {
        Self {
            game,
            probe_tag: probe_tag.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for PingHandler {
    fn names(&self) -> &[&'static str] {
        &["ping"]
    }

    async fn execute(&self, _ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        let started = Instant::now();
        match self.game.clan(&self.probe_tag).await {
            Ok(_) => Ok(vec![Reply::Pong {
                api_latency: started.elapsed(),
            }]),
            Err(e) => {
                warn!("Ping probe failed: {}", e);
                Ok(vec![Reply::text(format!("Error occurred: {} ❌", e))])
            }
        }
    }
}

pub struct HelpHandler {
    prefix: String,
    ttl: Duration,
}

impl HelpHandler {
    pub fn new(prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            prefix: prefix.into(),
            ttl,
        }
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    fn names(&self) -> &[&'static str] {
        &["help", "coc"]
    }

    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        Ok(vec![Reply::Ephemeral {
            text: messages::help(&self.prefix, ctx.is_admin_chat),
            ttl: self.ttl,
        }])
    }
}

pub struct BotInfoHandler {
    version: String,
}

impl BotInfoHandler {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for BotInfoHandler {
    fn names(&self) -> &[&'static str] {
        &["botinfo"]
    }

    async fn execute(&self, _ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        Ok(vec![Reply::Text(messages::bot_info(&self.version))])
    }
}

/// Sender and chat ids, used to set up chat access.
pub struct InfoHandler;

#[async_trait]
impl CommandHandler for InfoHandler {
    fn names(&self) -> &[&'static str] {
        &["info"]
    }

    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        Ok(vec![Reply::Text(format!(
            "*User Info*\nName: {}\nID: {}\nChat ID: {}",
            ctx.sender_name.as_deref().unwrap_or("Unknown"),
            ctx.sender,
            ctx.chat_id
        ))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::ctx;
    use crate::upstream::testing::FakeGame;

    #[tokio::test]
    async fn test_ping_probes_configured_tag() {
        let game = Arc::new(FakeGame::new().with_clan("#2PP", "Reddit"));
        let handler = PingHandler::new(game.clone(), "#2PP");

        let replies = handler.execute(&ctx("ping", &[])).await.unwrap();

        assert!(matches!(replies[0], Reply::Pong { .. }));
        assert_eq!(game.calls(), vec!["clan #2PP"]);
    }

    #[tokio::test]
    async fn test_ping_reports_failure() {
        let handler = PingHandler::new(Arc::new(FakeGame::new()), "#2PP");

        let replies = handler.execute(&ctx("ping", &[])).await.unwrap();

        assert_eq!(replies, vec![Reply::text("Error occurred: Not found: #2PP ❌")]);
    }

    #[tokio::test]
    async fn test_help_is_ephemeral_with_admin_section() {
        let handler = HelpHandler::new("!", Duration::from_secs(30));

        let user = handler.execute(&ctx("help", &[])).await.unwrap();
        let mut admin_ctx = ctx("coc", &[]);
        admin_ctx.is_admin_chat = true;
        let admin = handler.execute(&admin_ctx).await.unwrap();

        match (&user[0], &admin[0]) {
            (Reply::Ephemeral { text: plain, ttl }, Reply::Ephemeral { text: full, .. }) => {
                assert_eq!(*ttl, Duration::from_secs(30));
                assert!(!plain.contains("!allow"));
                assert!(full.contains("!allow <chatId>"));
            }
            other => panic!("expected ephemeral replies, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_help_uses_configured_prefix() {
        let handler = HelpHandler::new("/", Duration::from_secs(30));

        let replies = handler.execute(&ctx("help", &[])).await.unwrap();

        let Reply::Ephemeral { text, .. } = &replies[0] else {
            panic!("expected ephemeral reply, got {:?}", replies);
        };
        assert!(text.contains("- */clan* <tag>: Fetch general clan information."));
        assert!(text.contains("- /help: Display this help message."));
        assert!(!text.contains("!clan"));
        assert!(!text.contains("{prefix}"));
    }

    #[tokio::test]
    async fn test_info() {
        let replies = InfoHandler.execute(&ctx("info", &[])).await.unwrap();
        assert_eq!(
            replies,
            vec![Reply::text(
                "*User Info*\nName: Alice\nID: +15550001\nChat ID: group-1"
            )]
        );
    }
}

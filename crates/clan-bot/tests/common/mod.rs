//! Common test utilities for integration tests.

use clan_bot::app::Bot;
use clan_bot::config::Config;
use clan_bot::rate_limit::RateLimiter;
use clan_bot::render::{SvgRasterizer, TableRenderer};
use coc_client::CocClient;
use profile_store::ProfileStore;
use signal_client::{BotMessage, SignalClient};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{MockServer, ResponseTemplate};

pub const BOT_NUMBER: &str = "+10000000000";
pub const USER: &str = "+15550001";

/// Mock Clash of Clans and Signal servers.
pub struct Servers {
    pub coc: MockServer,
    pub signal: MockServer,
}

impl Servers {
    pub async fn start() -> Self {
        Self {
            coc: MockServer::start().await,
            signal: MockServer::start().await,
        }
    }

    /// Configuration pointing at the mock servers, plus extra overrides.
    pub fn config(&self, overrides: &[(&str, &str)]) -> Config {
        let mut builder = config::Config::builder()
            .set_override("signal.phone_number", BOT_NUMBER)
            .unwrap()
            .set_override("signal.service_url", self.signal.uri())
            .unwrap()
            .set_override("coc.api_token", "test-token")
            .unwrap()
            .set_override("coc.base_url", self.coc.uri())
            .unwrap()
            .set_override("coc.max_retries", "0")
            .unwrap();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        Config::from_config(builder.build().unwrap()).unwrap()
    }

    /// A bot wired to the mock servers with an in-memory store.
    pub fn bot(&self, config: &Config, store: Arc<ProfileStore>) -> Bot {
        let coc = CocClient::new(
            &config.coc.api_token,
            &config.coc.base_url,
            Duration::from_secs(5),
        )
        .unwrap()
        .with_max_retries(config.coc.max_retries);
        let signal = SignalClient::new(&config.signal.service_url, BOT_NUMBER).unwrap();
        let limiter = Arc::new(RateLimiter::new(
            config.rate_limit.max_requests,
            config.rate_limit.window,
        ));
        let renderer = TableRenderer::new(Arc::new(SvgRasterizer::new(None, "sans-serif")));

        Bot::new(config, Arc::new(coc), store, limiter, renderer, signal)
    }
}

/// Incoming direct message from [`USER`].
pub fn direct_message(text: &str) -> BotMessage {
    BotMessage {
        source: USER.to_string(),
        source_name: Some("Alice".to_string()),
        text: text.to_string(),
        timestamp: 1_700_000_000_000,
        is_group: false,
        group_id: None,
        receiving_account: BOT_NUMBER.to_string(),
        mentions: Vec::new(),
    }
}

/// Successful `/v2/send` response.
pub fn sent() -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(serde_json::json!({ "timestamp": "1700000000123" }))
}

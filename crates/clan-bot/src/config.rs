//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Signal configuration
    pub signal: SignalConfig,

    /// Clash of Clans API configuration
    pub coc: CocConfig,

    /// Profile storage configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Per-sender rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,

    /// Table image rendering
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalConfig {
    /// Signal CLI REST API endpoint
    #[serde(default = "default_signal_service")]
    pub service_url: String,

    /// Bot account phone number
    pub phone_number: String,

    /// Poll interval for messages
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CocConfig {
    /// API token from the developer portal
    pub api_token: String,

    /// API base URL
    #[serde(default = "default_coc_url")]
    pub base_url: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Retries for rate-limited or failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Clan fetched by `!ping` to measure API latency
    #[serde(default = "default_ping_tag")]
    pub ping_tag: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// JSON file for profiles; in-memory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Sliding window length
    #[serde(default = "default_rate_window", with = "humantime_serde")]
    pub window: Duration,

    /// Commands admitted per sender within one window
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,

    /// How often idle sender windows are swept
    #[serde(default = "default_sweep_interval", with = "humantime_serde")]
    pub sweep_interval: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Command prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Chat allowed to run `allow` / `stop`
    #[serde(default)]
    pub admin_chat: Option<String>,

    /// Only allowed chats (and the admin chat) may run commands other than `info`
    #[serde(default)]
    pub restrict_to_allowed_chats: bool,

    /// How long help messages stay before being deleted
    #[serde(default = "default_help_ttl", with = "humantime_serde")]
    pub help_ttl: Duration,

    /// Version shown by `!botinfo`
    #[serde(default = "default_version")]
    pub version: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Extra directory of fonts loaded next to the system fonts
    #[serde(default)]
    pub font_dir: Option<PathBuf>,

    /// Font family used for table text
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

// Default implementations
impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: default_rate_window(),
            max_requests: default_max_requests(),
            sweep_interval: default_sweep_interval(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            admin_chat: None,
            restrict_to_allowed_chats: false,
            help_ttl: default_help_ttl(),
            version: default_version(),
            log_level: default_log_level(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_dir: None,
            font_family: default_font_family(),
        }
    }
}

// Default value functions
fn default_signal_service() -> String {
    "http://signal-api:8080".into()
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(200)
}

fn default_coc_url() -> String {
    "https://api.clashofclans.com/v1".into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_retries() -> u32 {
    2
}

fn default_ping_tag() -> String {
    "#2PP".into()
}

fn default_rate_window() -> Duration {
    Duration::from_millis(3000)
}

fn default_max_requests() -> usize {
    5
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_prefix() -> String {
    "!".into()
}

fn default_help_ttl() -> Duration {
    Duration::from_secs(30)
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_font_family() -> String {
    "sans-serif".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Note: try_parsing(true) would parse +16504928286 as a positive number
                    // stripping the + prefix. Keep strings as strings.
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        Self::from_config(config)
    }

    /// Deserialize and validate an already-built configuration.
    pub fn from_config(config: config::Config) -> Result<Self> {
        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        anyhow::ensure!(!config.coc.api_token.is_empty(), "COC__API_TOKEN is empty");
        anyhow::ensure!(
            !config.signal.phone_number.is_empty(),
            "SIGNAL__PHONE_NUMBER is empty"
        );
        anyhow::ensure!(!config.bot.prefix.is_empty(), "BOT__PREFIX is empty");
        anyhow::ensure!(
            config.rate_limit.max_requests > 0,
            "RATE_LIMIT__MAX_REQUESTS must be positive"
        );

        Ok(config)
    }
}

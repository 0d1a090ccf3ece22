//! Clan Bot - Main entry point.

use anyhow::Context;
use clan_bot::app::Bot;
use clan_bot::config::Config;
use clan_bot::error::AppResult;
use clan_bot::rate_limit::RateLimiter;
use clan_bot::render::{SvgRasterizer, TableRenderer};
use coc_client::CocClient;
use profile_store::ProfileStore;
use signal_client::{MessageReceiver, SignalClient};
use std::sync::Arc;
use tokio::signal;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level);

    info!("Starting Clan Bot v{}...", config.bot.version);

    // Initialize clients
    let coc = Arc::new(
        CocClient::new(&config.coc.api_token, &config.coc.base_url, config.coc.timeout)
            .context("Failed to create Clash of Clans client")?
            .with_max_retries(config.coc.max_retries),
    );

    let store = Arc::new(match &config.store.path {
        Some(path) => ProfileStore::open(path)
            .await
            .with_context(|| format!("Failed to open profile store at {}", path.display()))?,
        None => {
            warn!("STORE__PATH not set - profiles will not survive a restart");
            ProfileStore::memory()
        }
    });
    info!(
        "Profile store ready ({} profiles, {} allowed chats)",
        store.profile_count().await,
        store.allowed_chats().await.len()
    );

    let signal = SignalClient::new(&config.signal.service_url, &config.signal.phone_number)
        .context("Failed to create Signal client")?;

    // Health checks
    if coc.clan(&config.coc.ping_tag).await.is_ok() {
        info!("Clash of Clans API reachable at {}", config.coc.base_url);
    } else {
        warn!("Clash of Clans API probe failed - will retry on requests");
    }

    if !signal.health_check().await {
        error!("Signal API not reachable at {}", config.signal.service_url);
        return Err(anyhow::anyhow!("Signal API not reachable").into());
    }
    info!("Signal API healthy");

    let renderer = TableRenderer::new(Arc::new(SvgRasterizer::new(
        config.render.font_dir.as_deref(),
        config.render.font_family.clone(),
    )));

    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit.max_requests,
        config.rate_limit.window,
    ));
    let sweeper = limiter.spawn_sweeper(config.rate_limit.sweep_interval);

    let bot = Bot::new(
        &config,
        coc,
        store,
        limiter,
        renderer,
        signal.clone(),
    );

    match &config.bot.admin_chat {
        Some(chat) => info!("Admin chat: {}", chat),
        None => warn!("BOT__ADMIN_CHAT not set - allow/stop are disabled"),
    }
    info!("Listening for messages with prefix {:?}...", config.bot.prefix);

    // Start message receiver
    let receiver = MessageReceiver::new(signal, config.signal.poll_interval);
    let mut stream = Box::pin(receiver.stream());

    // Main message loop
    loop {
        tokio::select! {
            Some(message) = stream.next() => {
                bot.handle(&message).await;
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Shutting down...");
    sweeper.abort();
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

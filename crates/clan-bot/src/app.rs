//! Wiring: handlers, dispatcher and outbox assembled from configuration.

use crate::commands::*;
use crate::config::Config;
use crate::dispatch::{AccessPolicy, Dispatcher};
use crate::outbox::Outbox;
use crate::rate_limit::RateLimiter;
use crate::render::TableRenderer;
use crate::tags::TagResolver;
use crate::upstream::GameData;
use profile_store::{ProfileStore, TagKind};
use signal_client::{BotMessage, SignalClient};
use std::sync::Arc;

/// Every command the bot answers to.
pub fn command_registry(
    config: &Config,
    game: Arc<dyn GameData>,
    store: Arc<ProfileStore>,
    renderer: TableRenderer,
) -> CommandRegistry {
    let resolver = TagResolver::new(store.clone());
    let clan = |view| ClanInfoHandler::new(game.clone(), resolver.clone(), view);
    let war = |view| WarHandler::new(game.clone(), resolver.clone(), view);

    CommandRegistry::new()
        .with(clan(ClanView::Summary))
        .with(clan(ClanView::Labels))
        .with(clan(ClanView::Composition))
        .with(clan(ClanView::Capital))
        .with(clan(ClanView::Raids))
        .with(PlayerHandler::new(game.clone(), resolver.clone()))
        .with(MembersHandler::new(game.clone(), resolver.clone(), renderer.clone()))
        .with(war(WarView::Summary))
        .with(war(WarView::Attacks))
        .with(war(WarView::LeftAttacks))
        .with(WarLogHandler::new(game.clone(), resolver.clone(), renderer))
        .with(LinkHandler::new(game.clone(), store.clone(), TagKind::Player))
        .with(LinkHandler::new(game.clone(), store.clone(), TagKind::Clan))
        .with(UnlinkHandler::new(store.clone(), TagKind::Player))
        .with(UnlinkHandler::new(store.clone(), TagKind::Clan))
        .with(ProfileHandler::new(game.clone(), store.clone()))
        .with(PingHandler::new(game.clone(), config.coc.ping_tag.clone()))
        .with(HelpHandler::new(config.bot.prefix.clone(), config.bot.help_ttl))
        .with(BotInfoHandler::new(config.bot.version.clone()))
        .with(InfoHandler)
        .with(AllowHandler::new(store.clone()))
        .with(StopHandler::new(store))
}

/// Handles one message end to end: dispatch, then delivery.
pub struct Bot {
    dispatcher: Dispatcher,
    outbox: Outbox,
}

impl Bot {
    pub fn new(
        config: &Config,
        game: Arc<dyn GameData>,
        store: Arc<ProfileStore>,
        limiter: Arc<RateLimiter>,
        renderer: TableRenderer,
        signal: SignalClient,
    ) -> Self {
        let registry = command_registry(config, game, store.clone(), renderer);
        Self {
            dispatcher: Dispatcher::new(registry, limiter, store, AccessPolicy::from(&config.bot)),
            outbox: Outbox::new(signal),
        }
    }

    pub async fn handle(&self, message: &BotMessage) {
        let replies = self.dispatcher.dispatch(message).await;
        if !replies.is_empty() {
            self.outbox.deliver(message, replies).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::RecordingRasterizer;
    use crate::upstream::testing::FakeGame;

    fn bot_config() -> Config {
        let source = config::Config::builder()
            .set_override("signal.phone_number", "+10000000000")
            .unwrap()
            .set_override("coc.api_token", "token")
            .unwrap()
            .build()
            .unwrap();
        Config::from_config(source).unwrap()
    }

    #[test]
    fn test_registry_has_every_command() {
        let registry = command_registry(
            &bot_config(),
            Arc::new(FakeGame::new()),
            Arc::new(ProfileStore::memory()),
            TableRenderer::new(Arc::new(RecordingRasterizer::default())),
        );

        assert_eq!(
            registry.names(),
            vec![
                "allow", "attack", "botinfo", "capital", "clan", "coc", "compo", "help", "info",
                "labels", "leftattack", "linkclan", "linkplayer", "members", "ping", "player",
                "profile", "raids", "stop", "unlinkclan", "unlinkplayer", "war", "warlog",
            ]
        );
    }
}

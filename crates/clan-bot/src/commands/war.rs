//! Clan war commands: current war, attacks, attacks left and war log.

use super::{resolve_targets, CommandContext, CommandHandler, Targets};
use crate::error::AppResult;
use crate::fanout::fan_out;
use crate::format::{clan_heading, messages, war};
use crate::render::TableRenderer;
use crate::reply::Reply;
use crate::tags::TagResolver;
use crate::upstream::GameData;
use async_trait::async_trait;
use coc_client::CocError;
use profile_store::TagKind;
use std::sync::Arc;
use tracing::warn;

/// Which view of the current war a handler produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarView {
    Summary,
    Attacks,
    LeftAttacks,
}

impl WarView {
    fn names(self) -> &'static [&'static str] {
        match self {
            WarView::Summary => &["war"],
            WarView::Attacks => &["attack"],
            WarView::LeftAttacks => &["leftattack"],
        }
    }

    fn subject(self) -> &'static str {
        match self {
            WarView::Summary => "war information",
            WarView::Attacks => "war attacks",
            WarView::LeftAttacks => "remaining attacks",
        }
    }
}

pub struct WarHandler {
    game: Arc<dyn GameData>,
    resolver: TagResolver,
    view: WarView,
}

impl WarHandler {
    pub fn new(game: Arc<dyn GameData>, resolver: TagResolver, view: WarView) -> Self {
        Self {
            game,
            resolver,
            view,
        }
    }

    async fn fetch(&self, tag: &str) -> Result<String, CocError> {
        let clan = self.game.clan(tag).await?;
        let current = self.game.current_war(tag).await?;

        let Some(active) = war::ActiveWar::from_war(&current) else {
            return Ok(war::not_in_war(&clan, tag));
        };
        Ok(match self.view {
            WarView::Summary => war::war_summary(&active),
            WarView::Attacks => war::attack_report(&clan, &active, tag),
            WarView::LeftAttacks => war::attacks_left(&clan, &active, tag),
        })
    }
}

#[async_trait]
impl CommandHandler for WarHandler {
    fn names(&self) -> &[&'static str] {
        self.view.names()
    }

    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        let args: Vec<String> = ctx.plain_args().map(str::to_string).collect();
        let tags = match resolve_targets(&self.resolver, ctx, &args, TagKind::Clan).await? {
            Targets::Tags(tags) => tags,
            Targets::Missing(reply) => return Ok(vec![reply]),
        };

        let outcomes = fan_out(&tags, |tag| async move { self.fetch(&tag).await }).await;

        Ok(outcomes
            .into_iter()
            .map(|outcome| match outcome.result {
                Ok(text) => Reply::Text(text),
                Err(e) => Reply::Text(messages::fetch_error(
                    self.view.subject(),
                    TagKind::Clan,
                    &outcome.tag,
                    e,
                )),
            })
            .collect())
    }
}

/// Recent wars as a table image, with a text fallback.
pub struct WarLogHandler {
    game: Arc<dyn GameData>,
    resolver: TagResolver,
    renderer: TableRenderer,
}

impl WarLogHandler {
    pub fn new(game: Arc<dyn GameData>, resolver: TagResolver, renderer: TableRenderer) -> Self {
        Self {
            game,
            resolver,
            renderer,
        }
    }

    async fn fetch(&self, tag: &str) -> Result<Reply, CocError> {
        let clan = self.game.clan(tag).await?;
        let entries = self.game.war_log(tag).await?;
        if entries.is_empty() {
            return Ok(Reply::Text(war::no_war_log(&clan, tag)));
        }

        match self.renderer.render_async(war::war_log_table(&entries)).await {
            Ok(png) => Ok(Reply::Image {
                png,
                filename: format!("warlog-{}.png", tag.trim_start_matches('#')),
                caption: clan_heading(&clan.name, &clan.tag, tag),
            }),
            Err(e) => {
                warn!("Rendering war log for {} failed: {}", tag, e);
                Ok(Reply::Text(war::war_log_text(&clan, &entries, tag)))
            }
        }
    }
}

#[async_trait]
impl CommandHandler for WarLogHandler {
    fn names(&self) -> &[&'static str] {
        &["warlog"]
    }

    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        let args: Vec<String> = ctx.plain_args().map(str::to_string).collect();
        let tags = match resolve_targets(&self.resolver, ctx, &args, TagKind::Clan).await? {
            Targets::Tags(tags) => tags,
            Targets::Missing(reply) => return Ok(vec![reply]),
        };

        let outcomes = fan_out(&tags, |tag| async move { self.fetch(&tag).await }).await;

        Ok(outcomes
            .into_iter()
            .map(|outcome| {
                outcome.result.unwrap_or_else(|e| {
                    Reply::Text(messages::fetch_error("war log", TagKind::Clan, &outcome.tag, e))
                })
            })
            .collect())
    }
}

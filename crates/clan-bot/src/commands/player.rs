//! Player information command.

use super::{resolve_targets, CommandContext, CommandHandler, Targets};
use crate::error::AppResult;
use crate::fanout::fan_out;
use crate::format::{messages, player::player_summary};
use crate::reply::Reply;
use crate::tags::TagResolver;
use crate::upstream::GameData;
use async_trait::async_trait;
use profile_store::TagKind;
use std::sync::Arc;

pub struct PlayerHandler {
    game: Arc<dyn GameData>,
    resolver: TagResolver,
}

impl PlayerHandler {
    pub fn new(game: Arc<dyn GameData>, resolver: TagResolver) -> Self {
        Self { game, resolver }
    }
}

#[async_trait]
impl CommandHandler for PlayerHandler {
    fn names(&self) -> &[&'static str] {
        &["player"]
    }

    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        let args: Vec<String> = ctx.plain_args().map(str::to_string).collect();
        let tags = match resolve_targets(&self.resolver, ctx, &args, TagKind::Player).await? {
            Targets::Tags(tags) => tags,
            Targets::Missing(reply) => return Ok(vec![reply]),
        };

        let game = &self.game;
        let outcomes = fan_out(&tags, |tag| async move { game.player(&tag).await }).await;

        Ok(outcomes
            .into_iter()
            .map(|outcome| match outcome.result {
                Ok(player) => Reply::Text(player_summary(&player)),
                Err(e) => Reply::Text(messages::fetch_error(
                    "player information",
                    TagKind::Player,
                    &outcome.tag,
                    e,
                )),
            })
            .collect())
    }
}

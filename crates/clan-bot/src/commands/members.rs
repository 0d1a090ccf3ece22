//! Clan member list, as text or as a table image.

use super::{resolve_targets, CommandContext, CommandHandler, Targets};
use crate::error::AppResult;
use crate::fanout::fan_out;
use crate::format::{clan_heading, members, messages};
use crate::render::TableRenderer;
use crate::reply::Reply;
use crate::tags::TagResolver;
use crate::upstream::GameData;
use async_trait::async_trait;
use coc_client::{Clan, ClanMember, CocError};
use profile_store::TagKind;
use std::sync::Arc;
use tracing::warn;

const TABLE_KEYWORD: &str = "table";

pub struct MembersHandler {
    game: Arc<dyn GameData>,
    resolver: TagResolver,
    renderer: TableRenderer,
}

impl MembersHandler {
    pub fn new(game: Arc<dyn GameData>, resolver: TagResolver, renderer: TableRenderer) -> Self {
        Self {
            game,
            resolver,
            renderer,
        }
    }

    async fn fetch(&self, tag: &str) -> Result<(Clan, Vec<ClanMember>), CocError> {
        let clan = self.game.clan(tag).await?;
        let members = self.game.clan_members(tag).await?;
        Ok((clan, members))
    }

    /// Table image, or the text list when the roster is empty or
    /// rendering fails.
    async fn table_reply(&self, clan: &Clan, roster: &[ClanMember], tag: &str) -> Reply {
        if roster.is_empty() {
            return Reply::Text(members::member_list(clan, roster, tag));
        }

        match self.renderer.render_async(members::members_table(roster)).await {
            Ok(png) => Reply::Image {
                png,
                filename: format!("members-{}.png", tag.trim_start_matches('#')),
                caption: clan_heading(&clan.name, &clan.tag, tag),
            },
            Err(e) => {
                warn!("Rendering member table for {} failed: {}", tag, e);
                Reply::Text(members::member_list(clan, roster, tag))
            }
        }
    }
}

#[async_trait]
impl CommandHandler for MembersHandler {
    fn names(&self) -> &[&'static str] {
        &["members"]
    }

    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        let mut as_table = false;
        let args: Vec<String> = ctx
            .plain_args()
            .filter(|arg| {
                let keyword = arg.eq_ignore_ascii_case(TABLE_KEYWORD);
                as_table |= keyword;
                !keyword
            })
            .map(str::to_string)
            .collect();

        let tags = match resolve_targets(&self.resolver, ctx, &args, TagKind::Clan).await? {
            Targets::Tags(tags) => tags,
            Targets::Missing(reply) => return Ok(vec![reply]),
        };

        let outcomes = fan_out(&tags, |tag| async move { self.fetch(&tag).await }).await;

        let mut replies = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            let reply = match outcome.result {
                Ok((clan, roster)) if as_table => {
                    self.table_reply(&clan, &roster, &outcome.tag).await
                }
                Ok((clan, roster)) => {
                    Reply::Text(members::member_list(&clan, &roster, &outcome.tag))
                }
                Err(e) => Reply::Text(messages::fetch_error(
                    "clan members",
                    TagKind::Clan,
                    &outcome.tag,
                    e,
                )),
            };
            replies.push(reply);
        }
        Ok(replies)
    }
}

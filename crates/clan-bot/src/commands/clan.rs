//! Clan information commands: summary, labels, composition, capital, raids.

use super::{resolve_targets, CommandContext, CommandHandler, Targets};
use crate::error::AppResult;
use crate::fanout::fan_out;
use crate::format::{capital, clan, messages};
use crate::reply::Reply;
use crate::tags::TagResolver;
use crate::upstream::GameData;
use async_trait::async_trait;
use coc_client::CocError;
use profile_store::TagKind;
use std::sync::Arc;

/// Which clan view a handler produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClanView {
    Summary,
    Labels,
    Composition,
    Capital,
    Raids,
}

impl ClanView {
    fn names(self) -> &'static [&'static str] {
        match self {
            ClanView::Summary => &["clan"],
            ClanView::Labels => &["labels"],
            ClanView::Composition => &["compo"],
            ClanView::Capital => &["capital"],
            ClanView::Raids => &["raids"],
        }
    }

    /// What the error reply says could not be fetched.
    fn subject(self) -> &'static str {
        match self {
            ClanView::Summary => "clan information",
            ClanView::Labels => "labels",
            ClanView::Composition => "clan composition",
            ClanView::Capital => "capital information",
            ClanView::Raids => "capital raid seasons",
        }
    }
}

pub struct ClanInfoHandler {
    game: Arc<dyn GameData>,
    resolver: TagResolver,
    view: ClanView,
}

impl ClanInfoHandler {
    pub fn new(game: Arc<dyn GameData>, resolver: TagResolver, view: ClanView) -> Self {
        Self {
            game,
            resolver,
            view,
        }
    }

    async fn fetch(&self, tag: &str) -> Result<String, CocError> {
        match self.view {
            ClanView::Summary => Ok(clan::clan_summary(&self.game.clan(tag).await?)),
            ClanView::Labels => Ok(clan::labels_list(&self.game.clan(tag).await?, tag)),
            ClanView::Composition => {
                let info = self.game.clan(tag).await?;
                let members = self.game.clan_members(tag).await?;
                Ok(clan::composition(&info, &members, tag))
            }
            ClanView::Capital => Ok(capital::capital_summary(&self.game.clan(tag).await?, tag)),
            ClanView::Raids => Ok(capital::raid_seasons(
                &self.game.capital_raid_seasons(tag).await?,
                tag,
            )),
        }
    }
}

#[async_trait]
impl CommandHandler for ClanInfoHandler {
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

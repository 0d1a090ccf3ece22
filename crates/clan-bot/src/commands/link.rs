//! Linking game tags to a user's profile.

use super::{CommandContext, CommandHandler};
use crate::error::AppResult;
use crate::fanout::{fan_out, TagOutcome};
use crate::format::messages;
use crate::format::profile::{profile_summary, LinkedEntry};
use crate::reply::Reply;
use crate::tags::{is_tag_argument, normalize_tag};
use crate::upstream::GameData;
use async_trait::async_trait;
use coc_client::CocError;
use profile_store::{LinkOutcome, ProfileStore, TagKind};
use std::sync::Arc;

/// First tag-shaped argument, normalized.
fn tag_argument(ctx: &CommandContext) -> Option<String> {
    ctx.plain_args().find(|a| is_tag_argument(a)).map(normalize_tag)
}

/// Display name of a clan or player, confirming the tag exists.
async fn lookup_name(game: &dyn GameData, kind: TagKind, tag: &str) -> Result<String, CocError> {
    let name = match kind {
        TagKind::Clan => game.clan(tag).await?.name,
        TagKind::Player => game.player(tag).await?.name,
    };
    Ok(name.unwrap_or_else(|| tag.to_string()))
}

/// `linkclan` / `linkplayer`.
pub struct LinkHandler {
    game: Arc<dyn GameData>,
    store: Arc<ProfileStore>,
    kind: TagKind,
}

impl LinkHandler {
    pub fn new(game: Arc<dyn GameData>, store: Arc<ProfileStore>, kind: TagKind) -> Self {
        Self { game, store, kind }
    }
}

#[async_trait]
impl CommandHandler for LinkHandler {
    fn names(&self) -> &[&'static str] {
        match self.kind {
            TagKind::Clan => &["linkclan"],
            TagKind::Player => &["linkplayer"],
        }
    }

    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        let Some(tag) = tag_argument(ctx) else {
            return Ok(vec![Reply::Text(messages::link_usage(self.kind))]);
        };

        let name = match lookup_name(self.game.as_ref(), self.kind, &tag).await {
            Ok(name) => name,
            Err(e) => return Ok(vec![Reply::Text(messages::link_error(self.kind, e))]),
        };

        let text = match self
            .store
            .link_tag(&ctx.chat_id, &ctx.sender, self.kind, &tag)
            .await?
        {
            LinkOutcome::Linked => messages::linked(self.kind, &tag, &name),
            LinkOutcome::AlreadyLinked => messages::already_linked(self.kind, &tag, &name),
        };
        Ok(vec![Reply::Text(text)])
    }
}

/// `unlinkclan` / `unlinkplayer`: one tag, or every tag of the kind.
pub struct UnlinkHandler {
    store: Arc<ProfileStore>,
    kind: TagKind,
}

impl UnlinkHandler {
    pub fn new(store: Arc<ProfileStore>, kind: TagKind) -> Self {
        Self { store, kind }
    }
}

#[async_trait]
impl CommandHandler for UnlinkHandler {
    fn names(&self) -> &[&'static str] {
        match self.kind {
            TagKind::Clan => &["unlinkclan"],
            TagKind::Player => &["unlinkplayer"],
        }
    }

    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        let text = match tag_argument(ctx) {
            None if ctx.plain_args().next().is_some() => messages::unlink_usage(self.kind),
            Some(tag) => {
                if self
                    .store
                    .unlink_tag(&ctx.chat_id, &ctx.sender, self.kind, &tag)
                    .await?
                {
                    messages::unlinked(self.kind, &tag)
                } else {
                    messages::not_linked(self.kind, &tag)
                }
            }
            None => {
                self.store
                    .unlink_all(&ctx.chat_id, &ctx.sender, self.kind)
                    .await?;
                messages::unlinked_all(self.kind)
            }
        };
        Ok(vec![Reply::Text(text)])
    }
}

/// `profile [@user]`: linked clans and players with their names.
pub struct ProfileHandler {
    game: Arc<dyn GameData>,
    store: Arc<ProfileStore>,
}

impl ProfileHandler {
    pub fn new(game: Arc<dyn GameData>, store: Arc<ProfileStore>) -> Self {
        Self { game, store }
    }

    async fn entries(&self, tags: &[String], kind: TagKind) -> Vec<LinkedEntry> {
        let game = self.game.as_ref();
        let outcomes = fan_out(tags, |tag| async move {
            match kind {
                TagKind::Clan => game
                    .clan(&tag)
                    .await
                    .map(|c| (c.name, c.clan_level)),
                TagKind::Player => game
                    .player(&tag)
                    .await
                    .map(|p| (p.name, p.exp_level)),
            }
        })
        .await;

        outcomes
            .into_iter()
            .map(|TagOutcome { tag, result }| match result {
                Ok((Some(name), level)) => LinkedEntry::known(tag, name, level.unwrap_or(0)),
                _ => LinkedEntry::unknown(tag),
            })
            .collect()
    }
}

#[async_trait]
impl CommandHandler for ProfileHandler {
    fn names(&self) -> &[&'static str] {
        &["profile"]
    }

    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        let user = ctx.mention().unwrap_or(&ctx.sender);
        let profile = self.store.profile(&ctx.chat_id, user).await?;

        let clans = self.entries(&profile.clan_tags, TagKind::Clan).await;
        let players = self.entries(&profile.player_tags, TagKind::Player).await;

        Ok(vec![Reply::Text(profile_summary(user, &clans, &players))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{ctx, texts};
    use crate::upstream::testing::FakeGame;

    fn store() -> Arc<ProfileStore> {
        Arc::new(ProfileStore::memory())
    }

    #[tokio::test]
    async fn test_link_player_verifies_and_is_idempotent() {
        let store = store();
        let handler = LinkHandler::new(
            Arc::new(FakeGame::new().with_player("#P1", "Alpha")),
            store.clone(),
            TagKind::Player,
        );

        let first = texts(&handler.execute(&ctx("linkplayer", &["#p1"])).await.unwrap());
        let second = texts(&handler.execute(&ctx("linkplayer", &["#P1"])).await.unwrap());

        assert_eq!(first, vec!["Linked your profile to player tag #P1. (Alpha)."]);
        assert_eq!(
            second,
            vec!["Player tag #P1 is already linked to your profile. (Alpha)."]
        );
        let profile = store.profile("group-1", "+15550001").await.unwrap();
        assert_eq!(profile.player_tags, vec!["#P1"]);
    }

    #[tokio::test]
    async fn test_link_requires_tag() {
        let game = Arc::new(FakeGame::new());
        let handler = LinkHandler::new(game.clone(), store(), TagKind::Player);

        let replies = texts(&handler.execute(&ctx("linkplayer", &["alpha"])).await.unwrap());

        assert_eq!(
            replies,
            vec!["Please provide a valid player tag, e.g., `!linkplayer #ABC123`."]
        );
        assert!(game.calls().is_empty());
    }

    #[tokio::test]
    async fn test_link_unknown_clan_not_stored() {
        let store = store();
        let handler = LinkHandler::new(Arc::new(FakeGame::new()), store.clone(), TagKind::Clan);

        let replies = texts(&handler.execute(&ctx("linkclan", &["#BAD"])).await.unwrap());

        assert_eq!(replies, vec!["Error linking clan tag: Not found: #BAD ❌"]);
        assert!(store.find_one("group-1", "+15550001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unlink_one_and_all() {
        let store = store();
        store.link_tag("group-1", "+15550001", TagKind::Clan, "#2PP").await.unwrap();
        store.link_tag("group-1", "+15550001", TagKind::Clan, "#9QQ").await.unwrap();
        let handler = UnlinkHandler::new(store.clone(), TagKind::Clan);

        let one = texts(&handler.execute(&ctx("unlinkclan", &["#2pp"])).await.unwrap());
        let again = texts(&handler.execute(&ctx("unlinkclan", &["#2PP"])).await.unwrap());
        let all = texts(&handler.execute(&ctx("unlinkclan", &[])).await.unwrap());

        assert_eq!(one, vec!["Unlinked clan tag #2PP from your profile."]);
        assert_eq!(again, vec!["Clan tag #2PP is not linked to your profile."]);
        assert_eq!(all, vec!["All clan tags unlinked from your profile."]);
        let profile = store.profile("group-1", "+15550001").await.unwrap();
        assert!(profile.clan_tags.is_empty());
    }

    #[tokio::test]
    async fn test_unlink_malformed_tag_keeps_links() {
        let store = store();
        store.link_tag("group-1", "+15550001", TagKind::Clan, "#2PP").await.unwrap();
        store.link_tag("group-1", "+15550001", TagKind::Clan, "#9QQ").await.unwrap();
        let handler = UnlinkHandler::new(store.clone(), TagKind::Clan);

        let replies = texts(&handler.execute(&ctx("unlinkclan", &["2PP"])).await.unwrap());

        assert_eq!(
            replies,
            vec![
                "Please provide a valid clan tag, e.g., `!unlinkclan #2PP`, \
                 or no tag to unlink all of them."
            ]
        );
        let profile = store.profile("group-1", "+15550001").await.unwrap();
        assert_eq!(profile.clan_tags, vec!["#2PP", "#9QQ"]);
    }

    #[tokio::test]
    async fn test_profile_names_and_unknowns() {
        let store = store();
        store.link_tag("group-1", "+15550001", TagKind::Clan, "#2PP").await.unwrap();
        store.link_tag("group-1", "+15550001", TagKind::Clan, "#GONE").await.unwrap();
        let game = FakeGame::new().with_clan("#2PP", "Reddit");
        let handler = ProfileHandler::new(Arc::new(game), store);

        let replies = texts(&handler.execute(&ctx("profile", &[])).await.unwrap());

        assert!(replies[0].starts_with("👤 **User ID**: +15550001"));
        assert!(replies[0].contains("- Reddit (Level 10) - #2PP"));
        assert!(replies[0].contains("- Unknown Clan - #GONE"));
        assert!(replies[0].contains("No players linked"));
    }

    #[tokio::test]
    async fn test_profile_of_mentioned_user() {
        let store = store();
        store.link_tag("group-1", "+15550002", TagKind::Player, "#P1").await.unwrap();
        let game = FakeGame::new().with_player("#P1", "Alpha");
        let handler = ProfileHandler::new(Arc::new(game), store);

        let mut context = ctx("profile", &["\u{FFFC}"]);
        context.mentions = vec!["+15550002".into()];
        let replies = texts(&handler.execute(&context).await.unwrap());

        assert!(replies[0].starts_with("👤 **User ID**: +15550002"));
        assert!(replies[0].contains("- Alpha (Level 200) - #P1"));
    }
}

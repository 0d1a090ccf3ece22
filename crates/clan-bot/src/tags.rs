//! Resolving which clan or player tags a command operates on.

use profile_store::{ProfileStore, StoreError, TagKind};
use std::sync::Arc;

/// Marker every game tag starts with.
pub const TAG_MARKER: char = '#';

/// Where a resolved tag list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSource {
    /// Tags given as command arguments.
    Explicit,
    /// Linked tags of a mentioned user.
    Mentioned(String),
    /// Linked tags of the user who sent the command.
    Invoker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTagSet {
    pub kind: TagKind,
    pub source: TagSource,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedTagSet),
    /// Nothing to operate on; the caller replies with an instruction.
    Missing { kind: TagKind, source: TagSource },
}

/// Normalize user input into a canonical tag: trimmed, uppercase, `O`
/// read as `0`, and `#`-prefixed.
pub fn normalize_tag(raw: &str) -> String {
    let body: String = raw
        .trim()
        .trim_start_matches(TAG_MARKER)
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'O' => '0',
            other => other,
        })
        .collect();
    format!("{}{}", TAG_MARKER, body)
}

/// Whether an argument is syntactically a tag.
pub fn is_tag_argument(arg: &str) -> bool {
    let arg = arg.trim();
    arg.starts_with(TAG_MARKER) && arg.len() > TAG_MARKER.len_utf8()
}

/// Every tag-shaped argument, normalized, in argument order without
/// duplicates.
pub fn explicit_tags(args: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in args
        .iter()
        .filter(|arg| is_tag_argument(arg))
        .map(|arg| normalize_tag(arg))
    {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Resolves tags with precedence: explicit arguments, then a mentioned
/// user's profile, then the invoker's profile.
#[derive(Clone)]
pub struct TagResolver {
    store: Arc<ProfileStore>,
}

impl TagResolver {
    pub fn new(store: Arc<ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(
        &self,
        chat_id: &str,
        invoker: &str,
        args: &[String],
        mention: Option<&str>,
        kind: TagKind,
    ) -> Result<Resolution, StoreError> {
        let explicit = explicit_tags(args);
        if !explicit.is_empty() {
            return Ok(Resolution::Resolved(ResolvedTagSet {
                kind,
                source: TagSource::Explicit,
                tags: explicit,
            }));
        }

        let (user, source) = match mention {
            Some(user) => (user, TagSource::Mentioned(user.to_string())),
            None => (invoker, TagSource::Invoker),
        };

        let profile = self.store.profile(chat_id, user).await?;
        let tags = profile.tags(kind).to_vec();

        if tags.is_empty() {
            Ok(Resolution::Missing { kind, source })
        } else {
            Ok(Resolution::Resolved(ResolvedTagSet { kind, source, tags }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    async fn store_with_links() -> Arc<ProfileStore> {
        let store = Arc::new(ProfileStore::memory());
        store
            .link_tag("chat", "alice", TagKind::Clan, "#ALICE1")
            .await
            .unwrap();
        store
            .link_tag("chat", "alice", TagKind::Clan, "#ALICE2")
            .await
            .unwrap();
        store
            .link_tag("chat", "bob", TagKind::Clan, "#BOB")
            .await
            .unwrap();
        store
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("#2pp"), "#2PP");
        assert_eq!(normalize_tag("  #abc  "), "#ABC");
        assert_eq!(normalize_tag("#2Oo"), "#200");
        assert_eq!(normalize_tag("##QQ"), "#QQ");
    }

    #[test]
    fn test_explicit_tags_filters_and_dedups() {
        let tags = explicit_tags(&args(&["table", "#2pp", "#", "#2PP", "#Y"]));
        assert_eq!(tags, vec!["#2PP", "#Y"]);
    }

    #[tokio::test]
    async fn test_explicit_tag_wins_over_mention_and_profile() {
        let resolver = TagResolver::new(store_with_links().await);

        let resolution = resolver
            .resolve("chat", "alice", &args(&["#XYZ"]), Some("bob"), TagKind::Clan)
            .await
            .unwrap();

        assert_eq!(
            resolution,
            Resolution::Resolved(ResolvedTagSet {
                kind: TagKind::Clan,
                source: TagSource::Explicit,
                tags: vec!["#XYZ".into()],
            })
        );
    }

    #[tokio::test]
    async fn test_multiple_explicit_tags_form_override_list() {
        let resolver = TagResolver::new(store_with_links().await);

        let resolution = resolver
            .resolve("chat", "alice", &args(&["#A", "#B", "#C"]), None, TagKind::Clan)
            .await
            .unwrap();

        match resolution {
            Resolution::Resolved(set) => {
                assert_eq!(set.source, TagSource::Explicit);
                assert_eq!(set.tags, vec!["#A", "#B", "#C"]);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mention_wins_over_invoker() {
        let resolver = TagResolver::new(store_with_links().await);

        let resolution = resolver
            .resolve("chat", "alice", &[], Some("bob"), TagKind::Clan)
            .await
            .unwrap();

        assert_eq!(
            resolution,
            Resolution::Resolved(ResolvedTagSet {
                kind: TagKind::Clan,
                source: TagSource::Mentioned("bob".into()),
                tags: vec!["#BOB".into()],
            })
        );
    }

    #[tokio::test]
    async fn test_invoker_profile_in_link_order() {
        let resolver = TagResolver::new(store_with_links().await);

        let resolution = resolver
            .resolve("chat", "alice", &args(&["table"]), None, TagKind::Clan)
            .await
            .unwrap();

        match resolution {
            Resolution::Resolved(set) => {
                assert_eq!(set.source, TagSource::Invoker);
                assert_eq!(set.tags, vec!["#ALICE1", "#ALICE2"]);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_profile_is_missing() {
        let resolver = TagResolver::new(store_with_links().await);

        let resolution = resolver
            .resolve("chat", "carol", &[], None, TagKind::Player)
            .await
            .unwrap();

        assert_eq!(
            resolution,
            Resolution::Missing {
                kind: TagKind::Player,
                source: TagSource::Invoker,
            }
        );
    }

    #[tokio::test]
    async fn test_mentioned_user_without_links_is_missing() {
        let resolver = TagResolver::new(store_with_links().await);

        let resolution = resolver
            .resolve("chat", "alice", &[], Some("carol"), TagKind::Clan)
            .await
            .unwrap();

        assert_eq!(
            resolution,
            Resolution::Missing {
                kind: TagKind::Clan,
                source: TagSource::Mentioned("carol".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_profiles_do_not_leak_across_chats() {
        let resolver = TagResolver::new(store_with_links().await);

        let resolution = resolver
            .resolve("other-chat", "alice", &[], None, TagKind::Clan)
            .await
            .unwrap();

        assert!(matches!(resolution, Resolution::Missing { .. }));
    }
}

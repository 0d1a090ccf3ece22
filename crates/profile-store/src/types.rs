//! Profile and link types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Which kind of game entity a tag identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Player,
    Clan,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::Player => write!(f, "player"),
            TagKind::Clan => write!(f, "clan"),
        }
    }
}

/// Result of linking a tag to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    AlreadyLinked,
}

/// Tags a user has linked within one chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub player_tags: Vec<String>,
    #[serde(default)]
    pub clan_tags: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// A profile with nothing linked. Absent records read as this.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            player_tags: Vec::new(),
            clan_tags: Vec::new(),
            updated_at: None,
        }
    }

    /// Linked tags of the given kind, in link order.
    pub fn tags(&self, kind: TagKind) -> &[String] {
        match kind {
            TagKind::Player => &self.player_tags,
            TagKind::Clan => &self.clan_tags,
        }
    }

    pub(crate) fn tags_mut(&mut self, kind: TagKind) -> &mut Vec<String> {
        match kind {
            TagKind::Player => &mut self.player_tags,
            TagKind::Clan => &mut self.clan_tags,
        }
    }

    /// Add a tag unless it is already present.
    pub fn link(&mut self, kind: TagKind, tag: &str) -> LinkOutcome {
        let tags = self.tags_mut(kind);
        if tags.iter().any(|t| t == tag) {
            return LinkOutcome::AlreadyLinked;
        }
        tags.push(tag.to_string());
        self.updated_at = Some(Utc::now());
        LinkOutcome::Linked
    }

    /// Remove a tag. Returns whether it was present.
    pub fn unlink(&mut self, kind: TagKind, tag: &str) -> bool {
        let tags = self.tags_mut(kind);
        let before = tags.len();
        tags.retain(|t| t != tag);
        let removed = tags.len() != before;
        if removed {
            self.updated_at = Some(Utc::now());
        }
        removed
    }

    /// Apply a partial update.
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(tags) = patch.player_tags {
            self.player_tags = dedup(tags);
        }
        if let Some(tags) = patch.clan_tags {
            self.clan_tags = dedup(tags);
        }
        self.updated_at = Some(Utc::now());
    }
}

/// Partial profile update for [`crate::ProfileStore::upsert`]. `None` keeps
/// the stored list.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub player_tags: Option<Vec<String>>,
    pub clan_tags: Option<Vec<String>>,
}

impl ProfilePatch {
    /// Patch that replaces the tag list of one kind.
    pub fn tags(kind: TagKind, tags: Vec<String>) -> Self {
        match kind {
            TagKind::Player => Self {
                player_tags: Some(tags),
                ..Self::default()
            },
            TagKind::Clan => Self {
                clan_tags: Some(tags),
                ..Self::default()
            },
        }
    }
}

fn dedup(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Data version for schema migrations.
pub(crate) const DATA_VERSION: u32 = 1;

/// Everything the store persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoreData {
    pub version: u32,
    /// Profiles keyed by chat scope, then user id.
    #[serde(default)]
    pub chats: HashMap<String, HashMap<String, UserProfile>>,
    /// Chats an admin has allowed to use the bot.
    #[serde(default)]
    pub allowed_chats: BTreeSet<String>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: DATA_VERSION,
            chats: HashMap::new(),
            allowed_chats: BTreeSet::new(),
        }
    }
}

//! Profile store with optional JSON file persistence.

use crate::error::StoreError;
use crate::types::*;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Where the store writes its data.
#[derive(Debug, Clone)]
pub enum Persistence {
    /// In-memory only (no persistence)
    Memory,
    /// JSON document on disk, rewritten atomically on every change
    File(PathBuf),
}

/// Per-chat user profiles plus the allowed-chat set.
///
/// Every mutating call holds the write lock for its whole
/// read-modify-write, so concurrent links for one user cannot lose updates.
/// A change becomes visible only after it has been written to disk.
#[derive(Clone)]
pub struct ProfileStore {
    data: Arc<RwLock<StoreData>>,
    persistence: Persistence,
}

impl ProfileStore {
    /// Create a store that keeps everything in memory.
    pub fn memory() -> Self {
        Self {
            data: Arc::new(RwLock::new(StoreData::default())),
            persistence: Persistence::Memory,
        }
    }

    /// Open a file-backed store, loading existing data if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = load(&path).await?;
        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            persistence: Persistence::File(path),
        })
    }

    /// Open the store described by `persistence`.
    pub async fn with_persistence(persistence: Persistence) -> Result<Self, StoreError> {
        match persistence {
            Persistence::Memory => Ok(Self::memory()),
            Persistence::File(path) => Self::open(path).await,
        }
    }

    /// Find the stored profile of a user in a chat.
    #[instrument(skip(self))]
    pub async fn find_one(
        &self,
        chat_id: &str,
        user_id: &str,
    ) -> Result<Option<UserProfile>, StoreError> {
        let data = self.data.read().await;
        Ok(data
            .chats
            .get(chat_id)
            .and_then(|users| users.get(user_id))
            .cloned())
    }

    /// Profile of a user in a chat; an absent record reads as empty.
    pub async fn profile(&self, chat_id: &str, user_id: &str) -> Result<UserProfile, StoreError> {
        Ok(self
            .find_one(chat_id, user_id)
            .await?
            .unwrap_or_else(|| UserProfile::empty(user_id)))
    }

    /// Create or partially update a profile.
    #[instrument(skip(self, patch))]
    pub async fn upsert(
        &self,
        chat_id: &str,
        user_id: &str,
        patch: ProfilePatch,
    ) -> Result<UserProfile, StoreError> {
        self.mutate(chat_id, user_id, |profile| {
            profile.apply(patch);
            (true, profile.clone())
        })
        .await
    }

    /// Link a tag to a user's profile. Linking an existing tag is a no-op.
    #[instrument(skip(self))]
    pub async fn link_tag(
        &self,
        chat_id: &str,
        user_id: &str,
        kind: TagKind,
        tag: &str,
    ) -> Result<LinkOutcome, StoreError> {
        let outcome = self
            .mutate(chat_id, user_id, |profile| {
                let outcome = profile.link(kind, tag);
                (outcome == LinkOutcome::Linked, outcome)
            })
            .await?;

        if outcome == LinkOutcome::Linked {
            info!("Linked {} tag {} for {}", kind, tag, user_id);
        }
        Ok(outcome)
    }

    /// Remove one tag. Returns whether it was linked.
    #[instrument(skip(self))]
    pub async fn unlink_tag(
        &self,
        chat_id: &str,
        user_id: &str,
        kind: TagKind,
        tag: &str,
    ) -> Result<bool, StoreError> {
        self.mutate(chat_id, user_id, |profile| {
            let removed = profile.unlink(kind, tag);
            (removed, removed)
        })
        .await
    }

    /// Clear every tag of one kind, keeping the record. Returns how many
    /// tags were removed.
    #[instrument(skip(self))]
    pub async fn unlink_all(
        &self,
        chat_id: &str,
        user_id: &str,
        kind: TagKind,
    ) -> Result<usize, StoreError> {
        self.mutate(chat_id, user_id, |profile| {
            let removed = profile.tags(kind).len();
            profile.apply(ProfilePatch::tags(kind, Vec::new()));
            (true, removed)
        })
        .await
    }

    /// Allow a chat to use the bot. Returns false if it already was.
    pub async fn allow_chat(&self, chat_id: &str) -> Result<bool, StoreError> {
        let added = self
            .commit(|data| {
                let added = data.allowed_chats.insert(chat_id.to_string());
                (added, added)
            })
            .await?;
        if added {
            info!("Allowed chat {}", chat_id);
        }
        Ok(added)
    }

    /// Revoke a chat. Returns false if it was not allowed.
    pub async fn revoke_chat(&self, chat_id: &str) -> Result<bool, StoreError> {
        let removed = self
            .commit(|data| {
                let removed = data.allowed_chats.remove(chat_id);
                (removed, removed)
            })
            .await?;
        if removed {
            info!("Revoked chat {}", chat_id);
        }
        Ok(removed)
    }

    /// Check whether a chat has been allowed.
    pub async fn is_chat_allowed(&self, chat_id: &str) -> bool {
        self.data.read().await.allowed_chats.contains(chat_id)
    }

    /// All allowed chats, sorted.
    pub async fn allowed_chats(&self) -> Vec<String> {
        self.data.read().await.allowed_chats.iter().cloned().collect()
    }

    /// Number of stored profiles across all chats.
    pub async fn profile_count(&self) -> usize {
        self.data
            .read()
            .await
            .chats
            .values()
            .map(|users| users.len())
            .sum()
    }

    /// Run `f` on the (lazily created) profile and commit the result.
    async fn mutate<T>(
        &self,
        chat_id: &str,
        user_id: &str,
        f: impl FnOnce(&mut UserProfile) -> (bool, T),
    ) -> Result<T, StoreError> {
        self.commit(|data| {
            let profile = data
                .chats
                .entry(chat_id.to_string())
                .or_default()
                .entry(user_id.to_string())
                .or_insert_with(|| UserProfile::empty(user_id));
            f(profile)
        })
        .await
    }

    /// Apply `f` to a copy of the data under the write lock. A reported
    /// change replaces the live data only once it has been saved; on a
    /// failed save the live data is left untouched.
    async fn commit<T>(
        &self,
        f: impl FnOnce(&mut StoreData) -> (bool, T),
    ) -> Result<T, StoreError> {
        let mut data = self.data.write().await;
        let mut candidate = data.clone();
        let (changed, result) = f(&mut candidate);

        if changed {
            self.save(&candidate).await?;
            *data = candidate;
        }
        Ok(result)
    }

    /// Write the current data to disk (no-op for memory stores).
    pub async fn persist(&self) -> Result<(), StoreError> {
        let data = self.data.read().await;
        self.save(&data).await
    }

    async fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        let Persistence::File(path) = &self.persistence else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(data)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Atomic write
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &bytes).await?;
        fs::rename(&temp_path, path).await?;

        debug!("Saved profile store ({} bytes) to {:?}", bytes.len(), path);
        Ok(())
    }
}

async fn load(path: &PathBuf) -> Result<StoreData, StoreError> {
    if !path.exists() {
        info!("Profile store not found at {:?}, starting fresh", path);
        return Ok(StoreData::default());
    }

    let bytes = fs::read(path).await?;
    if bytes.is_empty() {
        warn!("Profile store file is empty, starting fresh");
        return Ok(StoreData::default());
    }

    let data: StoreData = serde_json::from_slice(&bytes)?;
    if data.version != DATA_VERSION {
        warn!(
            "Profile store version {} differs from {}, loading anyway",
            data.version, DATA_VERSION
        );
    }

    info!(
        "Loaded profile store: {} chats, {} allowed chats",
        data.chats.len(),
        data.allowed_chats.len()
    );
    Ok(data)
}

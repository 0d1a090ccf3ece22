//! Per-chat user profiles linking chat users to game tags.
//!
//! Profiles are scoped by chat: the same user can link different tags in
//! different chats. The store also remembers which chats an admin has
//! allowed to use the bot.

mod error;
mod store;
mod types;

pub use error::StoreError;
pub use store::{Persistence, ProfileStore};
pub use types::*;

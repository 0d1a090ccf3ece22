//! Admin commands granting and revoking chat access.

use super::{CommandContext, CommandHandler};
use crate::error::AppResult;
use crate::format::messages;
use crate::reply::Reply;
use async_trait::async_trait;
use profile_store::ProfileStore;
use signal_client::group_recipient;
use std::sync::Arc;
use tracing::{info, warn};

/// Send target for a chat id: phone numbers and account uuids as-is,
/// anything else is a group id.
fn chat_recipient(chat_id: &str) -> String {
    let is_uuid = chat_id.len() == 36 && chat_id.chars().filter(|c| *c == '-').count() == 4;
    if chat_id.starts_with('+') || is_uuid {
        chat_id.to_string()
    } else {
        group_recipient(chat_id)
    }
}

/// Chat id argument of an admin command, or the usage reply.
fn target_chat<'a>(ctx: &'a CommandContext, usage: &str) -> Result<&'a str, Vec<Reply>> {
    match ctx.args.first() {
        Some(chat_id) if ctx.is_admin_chat => Ok(chat_id.as_str()),
        None if ctx.is_admin_chat => Err(vec![Reply::text(usage)]),
        _ => {
            warn!("{} tried admin command {} outside the admin chat", ctx.sender, ctx.command);
            Err(Vec::new())
        }
    }
}

pub struct AllowHandler {
    store: Arc<ProfileStore>,
}

impl AllowHandler {
    pub fn new(store: Arc<ProfileStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for AllowHandler {
    fn names(&self) -> &[&'static str] {
        &["allow"]
    }

    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        let chat_id = match target_chat(ctx, "Usage: !allow <chatId>") {
            Ok(chat_id) => chat_id,
            Err(replies) => return Ok(replies),
        };

        if !self.store.allow_chat(chat_id).await? {
            return Ok(vec![Reply::text(format!(
                "Chat ID {} is already allowed.",
                chat_id
            ))]);
        }

        info!("Chat {} allowed by {}", chat_id, ctx.sender);
        Ok(vec![
            Reply::text(format!("Chat ID {} is now allowed.", chat_id)),
            Reply::Notify {
                recipient: chat_recipient(chat_id),
                text: messages::WELCOME.to_string(),
            },
        ])
    }
}

pub struct StopHandler {
    store: Arc<ProfileStore>,
}

impl StopHandler {
    pub fn new(store: Arc<ProfileStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler for StopHandler {
    fn names(&self) -> &[&'static str] {
        &["stop"]
    }

    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>> {
        let chat_id = match target_chat(ctx, "Usage: !stop <chatId>") {
            Ok(chat_id) => chat_id,
            Err(replies) => return Ok(replies),
        };

        if !self.store.revoke_chat(chat_id).await? {
            return Ok(vec![Reply::text(format!(
                "Chat ID {} is not in the allowed list.",
                chat_id
            ))]);
        }

        info!("Chat {} revoked by {}", chat_id, ctx.sender);
        Ok(vec![
            Reply::text(format!("Chat ID {} is no longer allowed.", chat_id)),
            Reply::Notify {
                recipient: chat_recipient(chat_id),
                text: messages::GOODBYE.to_string(),
            },
        ])
    }
}

//! Turning an incoming message into replies.

use crate::commands::{CommandContext, CommandRegistry};
use crate::config::BotConfig;
use crate::format::messages;
use crate::rate_limit::RateLimiter;
use crate::reply::Reply;
use profile_store::ProfileStore;
use signal_client::BotMessage;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Commands a chat may run before it has been allowed.
const OPEN_COMMANDS: &[&str] = &["info"];

/// A prefixed command split into its word and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// `None` when `text` is not a command. Only the command word is
    /// lowercased.
    pub fn parse(text: &str, prefix: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix(prefix)?;
        let mut words = rest.split_whitespace();
        let command = words.next()?.to_lowercase();
        Some(Self {
            command,
            args: words.map(str::to_string).collect(),
        })
    }
}

/// Who may run what.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    pub prefix: String,
    pub admin_chat: Option<String>,
    pub restrict_to_allowed_chats: bool,
}

impl From<&BotConfig> for AccessPolicy {
    fn from(config: &BotConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            admin_chat: config.admin_chat.clone(),
            restrict_to_allowed_chats: config.restrict_to_allowed_chats,
        }
    }
}

pub struct Dispatcher {
    registry: CommandRegistry,
    limiter: Arc<RateLimiter>,
    store: Arc<ProfileStore>,
    policy: AccessPolicy,
}

impl Dispatcher {
    pub fn new(
        registry: CommandRegistry,
        limiter: Arc<RateLimiter>,
        store: Arc<ProfileStore>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            registry,
            limiter,
            store,
            policy,
        }
    }

    fn is_admin_chat(&self, chat_id: &str) -> bool {
        self.policy.admin_chat.as_deref() == Some(chat_id)
    }

    async fn chat_permitted(&self, chat_id: &str, command: &str) -> bool {
        !self.policy.restrict_to_allowed_chats
            || OPEN_COMMANDS.contains(&command)
            || self.is_admin_chat(chat_id)
            || self.store.is_chat_allowed(chat_id).await
    }

    /// Replies for one message. Never fails: handler errors become the
    /// generic error reply.
    #[instrument(skip_all, fields(chat = %message.chat_id()))]
    pub async fn dispatch(&self, message: &BotMessage) -> Vec<Reply> {
        let Some(invocation) = Invocation::parse(&message.text, &self.policy.prefix) else {
            return Vec::new();
        };

        let chat_id = message.chat_id();
        if !self.chat_permitted(chat_id, &invocation.command).await {
            debug!("Ignoring !{} from chat without access", invocation.command);
            return Vec::new();
        }

        let Some(handler) = self.registry.resolve(&invocation.command) else {
            debug!("Unknown command {}", invocation.command);
            return Vec::new();
        };

        if !self.limiter.admit(&message.source) {
            info!("Rate limited {}", message.source);
            return vec![Reply::text(messages::RATE_LIMITED)];
        }

        let ctx = CommandContext {
            command: invocation.command,
            args: invocation.args,
            chat_id: chat_id.to_string(),
            sender: message.source.clone(),
            sender_name: message.source_name.clone(),
            mentions: message.mentions.clone(),
            is_admin_chat: self.is_admin_chat(chat_id),
        };

        info!("Running !{} for {}", ctx.command, ctx.sender);
        match handler.execute(&ctx).await {
            Ok(replies) => {
                if replies.is_empty() {
                    warn!("!{} produced no reply", ctx.command);
                }
                replies
            }
            Err(e) => {
                error!("Command !{} failed: {}", ctx.command, e);
                vec![Reply::text(messages::GENERIC_ERROR)]
            }
        }
    }
}

//! Bot command handlers.

mod access;
mod clan;
mod link;
mod members;
mod player;
mod utility;
mod war;

pub use access::{AllowHandler, StopHandler};
pub use clan::{ClanInfoHandler, ClanView};
pub use link::{LinkHandler, ProfileHandler, UnlinkHandler};
pub use members::MembersHandler;
pub use player::PlayerHandler;
pub use utility::{BotInfoHandler, HelpHandler, InfoHandler, PingHandler};
pub use war::{WarHandler, WarLogHandler, WarView};

use crate::error::AppResult;
use crate::format::messages;
use crate::reply::Reply;
use crate::tags::{Resolution, TagResolver};
use async_trait::async_trait;
use profile_store::TagKind;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Placeholder Signal puts in message text where a mention sits.
const MENTION_PLACEHOLDER: char = '\u{FFFC}';

/// A parsed command and where it came from.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Lowercased command word without the prefix.
    pub command: String,
    pub args: Vec<String>,
    pub chat_id: String,
    pub sender: String,
    pub sender_name: Option<String>,
    /// Identities of mentioned users, in message order.
    pub mentions: Vec<String>,
    pub is_admin_chat: bool,
}

impl CommandContext {
    /// First mentioned user, if any.
    pub fn mention(&self) -> Option<&str> {
        self.mentions.first().map(String::as_str)
    }

    /// Arguments other than mention placeholders.
    pub fn plain_args(&self) -> impl Iterator<Item = &str> {
        self.args
            .iter()
            .map(String::as_str)
            .filter(|a| !a.contains(MENTION_PLACEHOLDER) && !a.starts_with('@'))
    }
}

/// Command handler trait.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command words this handler answers to, lowercase.
    fn names(&self) -> &[&'static str];

    /// Execute the command.
    async fn execute(&self, ctx: &CommandContext) -> AppResult<Vec<Reply>>;
}

/// Command name to handler lookup, built once at startup.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) {
        for name in handler.names() {
            debug!("Registered command {}", name);
            self.handlers.insert(name.to_lowercase(), handler.clone());
        }
    }

    pub fn with(mut self, handler: impl CommandHandler + 'static) -> Self {
        self.register(Arc::new(handler));
        self
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(&name.to_lowercase()).cloned()
    }

    /// Registered command words, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Tags a command should run against.
pub(crate) enum Targets {
    Tags(Vec<String>),
    /// No usable tag; reply with this instead.
    Missing(Reply),
}

/// Resolve the target tags of a command, turning a failed resolution into
/// the instruction reply.
pub(crate) async fn resolve_targets(
    resolver: &TagResolver,
    ctx: &CommandContext,
    args: &[String],
    kind: TagKind,
) -> AppResult<Targets> {
    match resolver
        .resolve(&ctx.chat_id, &ctx.sender, args, ctx.mention(), kind)
        .await?
    {
        Resolution::Resolved(set) => Ok(Targets::Tags(set.tags)),
        Resolution::Missing { .. } if !args.is_empty() => {
            Ok(Targets::Missing(Reply::text(messages::INVALID_TAG)))
        }
        Resolution::Missing { kind, source } => Ok(Targets::Missing(Reply::text(
            messages::missing_tags(kind, &source),
        ))),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub fn ctx(command: &str, args: &[&str]) -> CommandContext {
        CommandContext {
            command: command.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            chat_id: "group-1".into(),
            sender: "+15550001".into(),
            sender_name: Some("Alice".into()),
            ..Default::default()
        }
    }

    /// Text of every reply, in order.
    pub fn texts(replies: &[Reply]) -> Vec<String> {
        replies
            .iter()
            .filter_map(|r| r.as_text().map(str::to_string))
            .collect()
    }
}

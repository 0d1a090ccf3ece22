//! Reply actions produced by command handlers.

use std::time::Duration;

/// One action the bot performs in response to a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Plain text reply.
    Text(String),
    /// PNG image with a caption.
    Image {
        png: Vec<u8>,
        filename: String,
        caption: String,
    },
    /// Text deleted for everyone after `ttl`.
    Ephemeral { text: String, ttl: Duration },
    /// Latency probe: sent, then edited with transport and API latency.
    Pong { api_latency: Duration },
    /// Message to another chat.
    Notify { recipient: String, text: String },
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    /// Text content, if this reply carries any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Text(text) | Reply::Ephemeral { text, .. } | Reply::Notify { text, .. } => {
                Some(text)
            }
            Reply::Image { caption, .. } => Some(caption),
            Reply::Pong { .. } => None,
        }
    }
}

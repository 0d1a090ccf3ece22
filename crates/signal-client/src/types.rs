//! Signal API types.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Deserializer, Serialize};

/// Prefix signal-cli-rest-api expects on group recipients.
const GROUP_RECIPIENT_PREFIX: &str = "group.";

/// Incoming Signal message.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub envelope: Envelope,
    pub account: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub source: String,
    #[serde(rename = "sourceNumber")]
    pub source_number: Option<String>,
    #[serde(rename = "sourceName")]
    pub source_name: Option<String>,
    pub timestamp: i64,
    #[serde(rename = "dataMessage")]
    pub data_message: Option<DataMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataMessage {
    pub message: Option<String>,
    pub timestamp: i64,
    #[serde(rename = "groupInfo")]
    pub group_info: Option<GroupInfo>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupInfo {
    #[serde(rename = "groupId")]
    pub group_id: String,
}

/// A user mention inside a message body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Mention {
    pub name: Option<String>,
    pub number: Option<String>,
    pub uuid: Option<String>,
    pub start: u32,
    pub length: u32,
}

impl Mention {
    /// Identity of the mentioned user: phone number if known, else UUID.
    pub fn identity(&self) -> Option<&str> {
        self.number.as_deref().or(self.uuid.as_deref())
    }
}

/// Outgoing message request.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub message: String,
    pub number: Option<String>,
    pub recipients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub base64_attachments: Vec<String>,
    /// Timestamp of a previously sent message to replace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_timestamp: Option<i64>,
}

/// Send message response.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<i64>,
}

/// Remote delete request.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteDeleteRequest {
    pub recipient: String,
    pub timestamp: i64,
}

/// Newer API versions return the timestamp as a string.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.parse().ok(),
        None => None,
    })
}

/// An image or file to attach to an outgoing message.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub content_type: String,
    pub filename: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn png(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            content_type: "image/png".into(),
            filename: filename.into(),
            data,
        }
    }

    /// Encode as the data URI the REST API accepts.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};filename={};base64,{}",
            self.content_type,
            self.filename,
            STANDARD.encode(&self.data)
        )
    }
}

/// Reference to a message the bot has sent, for later edits or deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub timestamp: i64,
}

/// Parsed message for bot processing.
#[derive(Debug, Clone)]
pub struct BotMessage {
    /// The phone number that sent the message.
    pub source: String,
    /// Display name of the sender, if known.
    pub source_name: Option<String>,
    /// The message text.
    pub text: String,
    /// Message timestamp.
    pub timestamp: i64,
    /// Whether this is a group message.
    pub is_group: bool,
    /// Group ID if this is a group message.
    pub group_id: Option<String>,
    /// The bot's phone number that received this message.
    pub receiving_account: String,
    /// Identities of mentioned users, in message order.
    pub mentions: Vec<String>,
}

impl BotMessage {
    /// Extract bot message from incoming envelope.
    pub fn from_incoming(msg: &IncomingMessage) -> Option<Self> {
        let data = msg.envelope.data_message.as_ref()?;
        let text = data.message.clone()?;

        Some(Self {
            source: msg.envelope.source.clone(),
            source_name: msg.envelope.source_name.clone(),
            text,
            timestamp: msg.envelope.timestamp,
            is_group: data.group_info.is_some(),
            group_id: data.group_info.as_ref().map(|g| g.group_id.clone()),
            receiving_account: msg.account.clone(),
            mentions: data
                .mentions
                .iter()
                .filter_map(|m| m.identity().map(str::to_string))
                .collect(),
        })
    }

    /// Identifier of the chat this message belongs to.
    pub fn chat_id(&self) -> &str {
        self.group_id.as_deref().unwrap_or(&self.source)
    }

    /// Get the reply target (group recipient or source number).
    pub fn reply_target(&self) -> String {
        match &self.group_id {
            Some(group_id) => group_recipient(group_id),
            None => self.source.clone(),
        }
    }
}

/// Convert a received group id into a send recipient.
///
/// Ids that already carry the `group.` prefix are passed through.
pub fn group_recipient(group_id: &str) -> String {
    if group_id.starts_with(GROUP_RECIPIENT_PREFIX) {
        group_id.to_string()
    } else {
        format!(
            "{}{}",
            GROUP_RECIPIENT_PREFIX,
            STANDARD.encode(group_id.as_bytes())
        )
    }
}

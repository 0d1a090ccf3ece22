//! Fixed reply texts and small message builders.

use super::format_millis;
use crate::tags::TagSource;
use profile_store::TagKind;
use std::fmt::Display;
use std::time::Duration;

const HELP: &str = "**Available Commands:**
*Clan Information* 🏰

- *{prefix}clan* <tag>: Fetch general clan information.
- *{prefix}labels* <tag>: Fetch clan labels.
- *{prefix}capital* <tag>: Fetch clan capital information.
- *{prefix}raids* <tag>: Fetch recent capital raid seasons.
- *{prefix}compo* <tag>: Show townhall counts for the clan.

*Member Information* 👥

- *{prefix}members* <tag>: Fetch the clan members list.
- *{prefix}members* *table* <tag>: Fetch clan members in a table format.

*Player Information* 👤

- *{prefix}player* <tag>: Fetch detailed player information.

*Clan Wars* ⚔️

- *{prefix}war* <tag>: Fetch current clan war information.
- *{prefix}warlog* <tag>: Fetch clan war log.
- *{prefix}attack* <tag>: Fetch current war attack details.
- *{prefix}leftattack* <tag>: Fetch members who haven't completed their attacks.

*Profile* 🔗

- *{prefix}linkclan* <tag>: Link a clan to your profile.
- *{prefix}linkplayer* <tag>: Link a player to your profile.
- *{prefix}unlinkclan* [tag]: Unlink one clan, or all of them.
- *{prefix}unlinkplayer* [tag]: Unlink one player, or all of them.
- *{prefix}profile* [@user]: Show linked clans and players.

Commands that take a tag fall back to your linked tags, or those of a mentioned user.

*Utilities* ℹ️

- {prefix}ping: Check bot and API responsiveness.
- {prefix}botinfo: Show bot information.
- {prefix}info: Show your user and chat ids.
- {prefix}help: Display this help message.";

const ADMIN_HELP: &str = "*Admin* 🛠️

- {prefix}allow <chatId>: Allow a chat to use the bot.
- {prefix}stop <chatId>: Revoke a chat's access.";

/// Help text with `prefix` in front of every command, plus the admin
/// section when asked for.
pub fn help(prefix: &str, with_admin: bool) -> String {
    let text = if with_admin {
        format!("{}\n\n{}", HELP, ADMIN_HELP)
    } else {
        HELP.to_string()
    };
    text.replace("{prefix}", prefix)
}

pub const RATE_LIMITED: &str = "⏳ You are sending commands too quickly. Please try again later.";
pub const INVALID_TAG: &str = "🚫 Please provide a valid tag, e.g., `!clan #2PP`.";
pub const GENERIC_ERROR: &str = "An error occurred while executing the command.";
pub const PING_PENDING: &str = "🏓 Pong! Checking latency...";
pub const WELCOME: &str = "Welcome! You're now allowed to interact with me.";
pub const GOODBYE: &str = "You are no longer allowed to interact with me.";

pub fn bot_info(version: &str) -> String {
    format!(
        "**Bot Information**:\n\
         🛠️ - Version: {}\n\
         📊 - Features: Fetch Clash of Clans data, provide war status, clan info, and more.",
        version
    )
}

pub fn ping(api_latency: Duration, transport_latency: Duration) -> String {
    format!(
        "🏓 Pong! Latency:\n- Clash of Clans API: {} ms\n- Signal: {} ms",
        format_millis(api_latency),
        format_millis(transport_latency)
    )
}

/// Reply when neither arguments nor a profile yield any tag.
pub fn missing_tags(kind: TagKind, source: &TagSource) -> String {
    match source {
        TagSource::Mentioned(user) => format!(
            "Invalid or no {} tag provided, and no linked {}s found for {}.",
            kind, kind, user
        ),
        _ => format!(
            "Invalid or no {} tag provided, and no linked {}s found in profile.",
            kind, kind
        ),
    }
}

pub fn fetch_error(what: &str, kind: TagKind, tag: &str, err: impl Display) -> String {
    format!("Error fetching {} for {} {}: {} ❌", what, kind, tag, err)
}

pub fn link_usage(kind: TagKind) -> String {
    let example = match kind {
        TagKind::Player => "`!linkplayer #ABC123`",
        TagKind::Clan => "`!linkclan #2PP`",
    };
    format!("Please provide a valid {} tag, e.g., {}.", kind, example)
}

pub fn unlink_usage(kind: TagKind) -> String {
    let example = match kind {
        TagKind::Player => "`!unlinkplayer #ABC123`",
        TagKind::Clan => "`!unlinkclan #2PP`",
    };
    format!(
        "Please provide a valid {} tag, e.g., {}, or no tag to unlink all of them.",
        kind, example
    )
}

pub fn linked(kind: TagKind, tag: &str, name: &str) -> String {
    format!("Linked your profile to {} tag {}. ({}).", kind, tag, name)
}

pub fn already_linked(kind: TagKind, tag: &str, name: &str) -> String {
    format!(
        "{} tag {} is already linked to your profile. ({}).",
        capitalized(kind),
        tag,
        name
    )
}

pub fn link_error(kind: TagKind, err: impl Display) -> String {
    format!("Error linking {} tag: {} ❌", kind, err)
}

pub fn unlinked_all(kind: TagKind) -> String {
    format!("All {} tags unlinked from your profile.", kind)
}

pub fn unlinked(kind: TagKind, tag: &str) -> String {
    format!("Unlinked {} tag {} from your profile.", kind, tag)
}

pub fn not_linked(kind: TagKind, tag: &str) -> String {
    format!("{} tag {} is not linked to your profile.", capitalized(kind), tag)
}

fn capitalized(kind: TagKind) -> &'static str {
    match kind {
        TagKind::Player => "Player",
        TagKind::Clan => "Clan",
    }
}

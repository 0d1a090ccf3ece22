//! Linked-profile summary.

use profile_store::TagKind;

/// A linked tag, with name and level when the lookup succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedEntry {
    pub tag: String,
    pub detail: Option<(String, u32)>,
}

impl LinkedEntry {
    pub fn unknown(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            detail: None,
        }
    }

    pub fn known(tag: impl Into<String>, name: impl Into<String>, level: u32) -> Self {
        Self {
            tag: tag.into(),
            detail: Some((name.into(), level)),
        }
    }
}

pub fn profile_summary(user_id: &str, clans: &[LinkedEntry], players: &[LinkedEntry]) -> String {
    format!(
        "👤 **User ID**: {}\n\n{}\n\n{}",
        user_id,
        section(TagKind::Clan, clans),
        section(TagKind::Player, players)
    )
}

fn section(kind: TagKind, entries: &[LinkedEntry]) -> String {
    let (title, unknown, command) = match kind {
        TagKind::Clan => ("🏰 **Linked Clans**:", "Unknown Clan", "!linkclan* *#ClanTag"),
        TagKind::Player => ("🎮 **Linked Players**:", "Unknown Player", "!linkplayer* *#PlayerTag"),
    };

    if entries.is_empty() {
        return format!(
            "{}\nNo {}s linked\nTo link your {}, use *{}*",
            title, kind, kind, command
        );
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|entry| match &entry.detail {
            Some((name, level)) => format!("- {} (Level {}) - {}", name, level, entry.tag),
            None => format!("- {} - {}", unknown, entry.tag),
        })
        .collect();
    format!("{}\n{}", title, lines.join("\n"))
}

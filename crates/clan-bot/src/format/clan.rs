//! Clan summary, labels and town-hall composition.

use super::{or_na, str_or_na};
use coc_client::{Clan, ClanMember};
use std::collections::BTreeMap;

/// Maximum clan size shown next to the member count.
const MAX_CLAN_MEMBERS: u32 = 50;

pub fn clan_summary(clan: &Clan) -> String {
    let members = clan
        .members
        .or_else(|| (!clan.member_list.is_empty()).then_some(clan.member_list.len() as u32));

    format!(
        "🏰 **Clan Name**: {}\n\
         🏷️ **Clan Tag**: {}\n\
         📈 **Clan Level**: {}\n\
         👥 **Members**: {}/{}\n\
         🏆 **War Wins**: {}\n\
         🔥 **War Win Streak**: {}\n\
         🗓️ **War Frequency**: {}\n\
         💯 **Clan Points**: {}\n\
         💪 **Builder Base Points**: {}\n\
         🏅 **Required Trophies**: {}\n\
         📍 **Location**: {}",
        str_or_na(&clan.name),
        str_or_na(&clan.tag),
        or_na(clan.clan_level),
        or_na(members),
        MAX_CLAN_MEMBERS,
        or_na(clan.war_wins),
        or_na(clan.war_win_streak),
        str_or_na(&clan.war_frequency),
        or_na(clan.clan_points),
        or_na(clan.clan_builder_base_points),
        or_na(clan.required_trophies),
        clan.location
            .as_ref()
            .map(|l| str_or_na(&l.name))
            .unwrap_or("N/A"),
    )
}

pub fn labels_list(clan: &Clan, tag: &str) -> String {
    if clan.labels.is_empty() {
        return format!(
            "No labels available for the clan {} ({}). ❌",
            str_or_na(&clan.name),
            clan.tag.as_deref().unwrap_or(tag)
        );
    }

    let mut text = format!(
        "🏰 **Clan Labels for {} ({})**:\n\n**Clan Labels**:\n",
        str_or_na(&clan.name),
        clan.tag.as_deref().unwrap_or(tag)
    );
    for label in &clan.labels {
        text.push_str(&format!("🏷️ **{}**\n", str_or_na(&label.name)));
    }
    text
}

/// Town-hall histogram, ascending by level. Members without a level are
/// counted last.
pub fn composition(clan: &Clan, members: &[ClanMember], tag: &str) -> String {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    let mut unknown = 0;
    for member in members {
        match member.town_hall_level {
            Some(level) => *counts.entry(level).or_default() += 1,
            None => unknown += 1,
        }
    }

    let mut text = format!(
        "🏰 **Clan Composition for {} ({})**:\n\n",
        str_or_na(&clan.name),
        clan.tag.as_deref().unwrap_or(tag)
    );
    if members.is_empty() {
        text.push_str("No members found in the clan. ❌\n");
        return text;
    }
    for (level, count) in counts {
        text.push_str(&format!("🏠 TH {}: {}\n", level, count));
    }
    if unknown > 0 {
        text.push_str(&format!("🏠 TH N/A: {}\n", unknown));
    }
    text
}

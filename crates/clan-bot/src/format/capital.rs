//! Clan capital and raid weekends.

use super::{clan_heading, format_api_time, or_na, str_or_na};
use coc_client::{CapitalRaidSeason, Clan};

/// Raid seasons listed per reply, newest first.
pub const RAID_SEASONS_SHOWN: usize = 3;

pub fn capital_summary(clan: &Clan, tag: &str) -> String {
    let Some(capital) = &clan.clan_capital else {
        return format!(
            "No capital information available for clan {} ({}). ❌",
            str_or_na(&clan.name),
            clan.tag.as_deref().unwrap_or(tag)
        );
    };

    let mut text = format!(
        "{}\n\n🏰 **Capital Hall Level**: {}\n",
        clan_heading(&clan.name, &clan.tag, tag),
        or_na(capital.capital_hall_level)
    );

    if capital.districts.is_empty() {
        text.push_str("🏘️ **Districts**: No districts available.\n");
    } else {
        text.push_str("🏘️ **Districts**:\n");
        for district in &capital.districts {
            text.push_str(&format!(
                "  - {} (Level {})\n",
                str_or_na(&district.name),
                or_na(district.district_hall_level)
            ));
        }
    }
    text
}

pub fn raid_seasons(seasons: &[CapitalRaidSeason], tag: &str) -> String {
    if seasons.is_empty() {
        return format!("No capital raid seasons available for clan {}. ❌", tag);
    }

    let mut text = format!("📜 **Capital Raid Seasons** ({}):\n", tag);
    for season in seasons.iter().take(RAID_SEASONS_SHOWN) {
        text.push_str(&format!(
            "\n🏆 **State**: {}\n\
             ⏱️ **Start Time**: {}\n\
             ⏱️ **End Time**: {}\n\
             💰 **Total Loot**: {}\n\
             🔥 **Raids Completed**: {}\n\
             ⚔️ **Total Attacks**: {}\n\
             🏰 **Enemy Districts Destroyed**: {}\n\
             🎁 **Offensive Reward**: {}\n\
             🛡️ **Defensive Reward**: {}\n",
            str_or_na(&season.state),
            format_api_time(season.start_time.as_deref()),
            format_api_time(season.end_time.as_deref()),
            or_na(season.capital_total_loot),
            or_na(season.raids_completed),
            or_na(season.total_attacks),
            or_na(season.enemy_districts_destroyed),
            or_na(season.offensive_reward),
            or_na(season.defensive_reward),
        ));
    }
    text
}

//! Player summary.

use super::{or_na, role_label, str_or_na};
use coc_client::Player;

pub fn player_summary(player: &Player) -> String {
    format!(
        "👤 **Player Name**: {}\n\
         🏷️ **Player Tag**: {}\n\
         🏠 **Town Hall Level**: {}\n\
         📈 **XP Level**: {}\n\
         🏅 **Trophies**: {}\n\
         🏆 **Best Trophies**: {}\n\
         ⭐ **War Stars**: {}\n\
         ⚔️ **Attack Wins**: {}\n\
         🛡️ **Defense Wins**: {}\n\
         🎖️ **Clan Role**: {}\n\
         🏰 **Clan**: {}\n\
         🏆 **League**: {}\n\
         📤 **Donations**: {}\n\
         📥 **Received**: {}\n\
         🏠 **Builder Hall Level**: {}\n\
         🏅 **Builder Base Trophies**: {}\n\
         🏆 **Best Builder Base Trophies**: {}",
        str_or_na(&player.name),
        str_or_na(&player.tag),
        or_na(player.town_hall_level),
        or_na(player.exp_level),
        or_na(player.trophies),
        or_na(player.best_trophies),
        or_na(player.war_stars),
        or_na(player.attack_wins),
        or_na(player.defense_wins),
        role_label(player.role.as_deref()),
        player
            .clan
            .as_ref()
            .map(|c| str_or_na(&c.name))
            .unwrap_or("N/A"),
        player
            .league
            .as_ref()
            .map(|l| str_or_na(&l.name))
            .unwrap_or("N/A"),
        player.donations.unwrap_or(0),
        player.donations_received.unwrap_or(0),
        or_na(player.builder_hall_level),
        or_na(player.builder_base_trophies),
        or_na(player.best_builder_base_trophies),
    )
}

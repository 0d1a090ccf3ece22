//! Clan member roster as text or table.

use super::{clan_heading, or_na, role_label, FormattedTable};
use coc_client::{Clan, ClanMember};

const TABLE_HEADER: [&str; 8] = [
    "#", "Name", "Role", "Level", "TH", "Trophies", "Donations", "Received",
];
const TABLE_WIDTHS: [u32; 8] = [5, 30, 12, 5, 6, 12, 10, 10];

pub fn member_list(clan: &Clan, members: &[ClanMember], tag: &str) -> String {
    let heading = clan_heading(&clan.name, &clan.tag, tag);
    if members.is_empty() {
        return format!("{}\n\nNo members found in the clan. ❌", heading);
    }

    let mut text = format!("{}\n\n**Clan Members**:\n", heading);
    for (index, member) in members.iter().enumerate() {
        text.push_str(&format!(
            "🏅 {}. *{}*:\n\
             ⭐ Role: {}\n\
             🎖️ Level: {}\n\
             🏰 Town Hall Level: {}\n\
             🏆 Trophies: {}\n\
             📤 Donations: {}\n\
             📥 Received: {}\n",
            index + 1,
            member.name.as_deref().unwrap_or("Unknown"),
            role_label(member.role.as_deref()),
            or_na(member.exp_level),
            or_na(member.town_hall_level),
            member.trophies.unwrap_or(0),
            member.donations.unwrap_or(0),
            member.donations_received.unwrap_or(0),
        ));
    }
    text
}

pub fn members_table(members: &[ClanMember]) -> FormattedTable {
    let mut table = FormattedTable::new(&TABLE_HEADER, &TABLE_WIDTHS);
    for (index, member) in members.iter().enumerate() {
        table.push_row(vec![
            (index + 1).to_string(),
            member.name.clone().unwrap_or_else(|| "Unknown".into()),
            role_label(member.role.as_deref()).to_string(),
            or_na(member.exp_level),
            or_na(member.town_hall_level),
            member.trophies.unwrap_or(0).to_string(),
            member.donations.unwrap_or(0).to_string(),
            member.donations_received.unwrap_or(0).to_string(),
        ]);
    }
    table
}

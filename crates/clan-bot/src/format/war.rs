//! Current war, attack breakdowns and war log.

use super::{clan_heading, format_api_time, or_na, str_or_na, FormattedTable};
use coc_client::{Clan, ClanWar, WarAttack, WarClan, WarLogEntry, WarMember};

/// Attacks per member assumed when the API omits it.
const DEFAULT_ATTACKS_PER_MEMBER: u32 = 2;
/// War log entries listed in the text reply.
pub const WAR_LOG_TEXT_ENTRIES: usize = 5;
/// War log entries drawn in the table image.
pub const WAR_LOG_TABLE_ENTRIES: usize = 10;

const WAR_LOG_HEADER: [&str; 6] = [
    "Opponent",
    "Result",
    "Stars",
    "Destruction",
    "Exp Earned",
    "End Time",
];
const WAR_LOG_WIDTHS: [u32; 6] = [18, 8, 8, 12, 10, 20];

/// A war with both sides present.
#[derive(Debug, Clone, Copy)]
pub struct ActiveWar<'a> {
    pub war: &'a ClanWar,
    pub home: &'a WarClan,
    pub away: &'a WarClan,
}

impl<'a> ActiveWar<'a> {
    /// `None` when the clan is not in a war.
    pub fn from_war(war: &'a ClanWar) -> Option<Self> {
        if !war.is_active() {
            return None;
        }
        Some(Self {
            war,
            home: war.clan.as_ref()?,
            away: war.opponent.as_ref()?,
        })
    }

    /// Attacks made by the home side, in attack order.
    pub fn home_attacks(&self) -> Vec<&'a WarAttack> {
        let mut attacks: Vec<&WarAttack> = self
            .home
            .members
            .iter()
            .flat_map(|m| m.attacks.iter())
            .collect();
        attacks.sort_by_key(|a| a.order.unwrap_or(u32::MAX));
        attacks
    }
}

/// Attack with the most stars; ties go to higher destruction, full ties keep
/// the first one seen.
pub fn best_attack<'a>(attacks: impl IntoIterator<Item = &'a WarAttack>) -> Option<&'a WarAttack> {
    attacks.into_iter().fold(None, |best, attack| match best {
        None => Some(attack),
        Some(current) => {
            let stars = (attack.stars.unwrap_or(0), current.stars.unwrap_or(0));
            let destruction = (
                attack.destruction_percentage.unwrap_or(0),
                current.destruction_percentage.unwrap_or(0),
            );
            if stars.0 > stars.1 || (stars.0 == stars.1 && destruction.0 > destruction.1) {
                Some(attack)
            } else {
                Some(current)
            }
        }
    })
}

/// Highest-destruction attack among the members' best received attacks.
/// Ties keep the first one seen.
pub fn best_defense(members: &[WarMember]) -> Option<&WarAttack> {
    members
        .iter()
        .filter_map(|m| m.best_opponent_attack.as_ref())
        .fold(None, |best: Option<&WarAttack>, attack| match best {
            Some(current)
                if attack.destruction_percentage.unwrap_or(0)
                    <= current.destruction_percentage.unwrap_or(0) =>
            {
                Some(current)
            }
            _ => Some(attack),
        })
}

/// Members who still have attacks to make.
#[derive(Debug, Default)]
pub struct AttacksLeft<'a> {
    /// Members with no attacks used.
    pub zero: Vec<&'a WarMember>,
    /// Members with exactly one attack used.
    pub one: Vec<&'a WarMember>,
}

impl<'a> AttacksLeft<'a> {
    pub fn classify(members: &'a [WarMember]) -> Self {
        let mut left = Self::default();
        for member in members {
            match member.attacks.len() {
                0 => left.zero.push(member),
                1 => left.one.push(member),
                _ => {}
            }
        }
        left
    }

    /// Total attacks remaining in a two-attack war.
    pub fn remaining(&self) -> usize {
        2 * self.zero.len() + self.one.len()
    }
}

pub fn not_in_war(clan: &Clan, tag: &str) -> String {
    format!(
        "No current war information available for clan {} ({}). ❌",
        str_or_na(&clan.name),
        clan.tag.as_deref().unwrap_or(tag)
    )
}

pub fn war_summary(active: &ActiveWar<'_>) -> String {
    let ActiveWar { war, home, away } = *active;

    let mut text = format!(
        "⚔️ **War State**: {}\n\
         🛡️ **Clan**: {} ({}) vs {} ({})\n\
         ⭐ **Stars**: {} - {}\n\
         💥 **Destruction**: {}% - {}%\n\
         👥 **Team Size**: {}\n\
         ⚔️ **Attacks per Member**: {}\n\
         🕒 **Preparation Start Time**: {}\n\
         🕒 **Start Time**: {}\n\
         🕒 **End Time**: {}\n",
        str_or_na(&war.state),
        str_or_na(&home.name),
        str_or_na(&home.tag),
        str_or_na(&away.name),
        str_or_na(&away.tag),
        home.stars.unwrap_or(0),
        away.stars.unwrap_or(0),
        percent(home.destruction_percentage),
        percent(away.destruction_percentage),
        or_na(war.team_size),
        or_na(war.attacks_per_member),
        format_api_time(war.preparation_start_time.as_deref()),
        format_api_time(war.start_time.as_deref()),
        format_api_time(war.end_time.as_deref()),
    );

    for attack in active.home_attacks() {
        let attacker = member_of(home, &attack.attacker_tag);
        let defender = member_of(away, &attack.defender_tag);
        text.push_str(&format!(
            "\n🏹 **{} (#{})** attacked **{} (#{})** ⭐ {} 💥 {}%",
            display_name(attacker),
            position(attacker),
            display_name(defender),
            position(defender),
            attack.stars.unwrap_or(0),
            attack.destruction_percentage.unwrap_or(0),
        ));
    }
    text
}

/// Attack list with best attack, best defense and team totals.
pub fn attack_report(clan: &Clan, active: &ActiveWar<'_>, tag: &str) -> String {
    let attacks = active.home_attacks();
    if attacks.is_empty() {
        return format!(
            "Clan {} is in preparation day. ❌",
            str_or_na(&clan.name)
        );
    }

    let mut sections = vec![clan_heading(&clan.name, &clan.tag, tag)];

    let details: Vec<String> = attacks
        .iter()
        .enumerate()
        .map(|(index, attack)| attack_details(index + 1, attack, &attacks, active))
        .collect();
    sections.push(details.join("\n\n"));

    sections.push(match best_defense(&active.home.members) {
        Some(defense) => {
            let attacker = member_of(active.away, &defense.attacker_tag);
            format!(
                "🛡️ **Best Defense**:\n\
                 - 🏹 Attacker: {} ({})\n\
                 - ⭐ Stars: {}\n\
                 - 💥 Destruction: {}%",
                display_name(attacker),
                str_or_na(&defense.attacker_tag),
                defense.stars.unwrap_or(0),
                defense.destruction_percentage.unwrap_or(0),
            )
        }
        None => "🛡️ **Best Defense**: No defenses yet".to_string(),
    });

    sections.push(match best_attack(attacks.iter().copied()) {
        Some(best) => {
            let attacker = member_of(active.home, &best.attacker_tag);
            let defender = member_of(active.away, &best.defender_tag);
            format!(
                "⚔️ **Best Attack**:\n\
                 - 🏹 Attacker: {} ({})\n\
                 - 🛡️ Defender: {} ({})\n\
                 - ⭐ Stars: {}\n\
                 - 💥 Destruction: {}%",
                display_name(attacker),
                str_or_na(&best.attacker_tag),
                display_name(defender),
                str_or_na(&best.defender_tag),
                best.stars.unwrap_or(0),
                best.destruction_percentage.unwrap_or(0),
            )
        }
        None => "⚔️ **Best Attack**: No attacks yet".to_string(),
    });

    let completed = attacks.len() as u32;
    let attacks_left = active.war.team_size.map(|size| {
        let per_member = active
            .war
            .attacks_per_member
            .unwrap_or(DEFAULT_ATTACKS_PER_MEMBER);
        (size * per_member).saturating_sub(completed)
    });
    sections.push(format!(
        "🏰 **Team Size**: {}\n\
         ✅ **Total Completed Attacks**: {}\n\
         ❌ **Total Attacks Left**: {}",
        or_na(active.war.team_size),
        completed,
        or_na(attacks_left),
    ));

    sections.join("\n\n")
}

fn attack_details(
    number: usize,
    attack: &WarAttack,
    all: &[&WarAttack],
    active: &ActiveWar<'_>,
) -> String {
    let attacker = member_of(active.home, &attack.attacker_tag);
    let defender = member_of(active.away, &attack.defender_tag);
    // Fresh: no earlier attack on the same base
    let fresh = !all.iter().any(|other| {
        other.defender_tag == attack.defender_tag
            && other.order.unwrap_or(u32::MAX) < attack.order.unwrap_or(u32::MAX)
    });

    format!(
        "{}. ⚔️ **Attack Details**:\n\
         🏹 Attacker: *#{}* {} ({})\n\
         ⭐ Stars Achieved: {} on 🗺️ *#{}* {} ({})\n\
         💥 Destruction: {}%\n\
         🗡️ Attack Order: {}\n\
         ⏳ Duration: {} seconds\n\
         🔄 *Attacks Used:* {}\n\
         🆕 Fresh Attack: {}",
        number,
        position(attacker),
        display_name(attacker),
        str_or_na(&attack.attacker_tag),
        attack.stars.unwrap_or(0),
        position(defender),
        display_name(defender),
        str_or_na(&attack.defender_tag),
        attack.destruction_percentage.unwrap_or(0),
        or_na(attack.order),
        or_na(attack.duration),
        attacker.map(|m| m.attacks.len()).unwrap_or(0),
        if fresh { "Yes" } else { "No" },
    )
}

pub fn attacks_left(clan: &Clan, active: &ActiveWar<'_>, tag: &str) -> String {
    let left = AttacksLeft::classify(&active.home.members);

    let mut text = format!(
        "🛡️ **Members who haven't completed their attacks in clan {} ({})**:\n",
        str_or_na(&clan.name),
        clan.tag.as_deref().unwrap_or(tag)
    );

    if left.zero.is_empty() {
        text.push_str("\nAll members have used at least one attack. ✅\n");
    } else {
        text.push_str("\n⚔️⚔️ *Both Attacks Left*:\n");
        for member in &left.zero {
            text.push_str(&format!(
                "\n🗺 #{}. {}",
                position(Some(member)),
                display_name(Some(member))
            ));
        }
        text.push('\n');
    }

    if !left.one.is_empty() {
        text.push_str("\n⚔️ *One Attack Left*:\n");
        for member in &left.one {
            text.push_str(&format!(
                "\n🗺 #{}. {}",
                position(Some(member)),
                display_name(Some(member))
            ));
        }
        text.push('\n');
    }

    text.push_str(&format!("\n*Total Attacks Left*: {}", left.remaining()));
    text
}

pub fn war_log_text(clan: &Clan, entries: &[WarLogEntry], tag: &str) -> String {
    if entries.is_empty() {
        return no_war_log(clan, tag);
    }

    let mut text = format!(
        "📜 **Clan War Log** for {} ({}):\n",
        str_or_na(&clan.name),
        clan.tag.as_deref().unwrap_or(tag)
    );
    for entry in entries.iter().take(WAR_LOG_TEXT_ENTRIES) {
        text.push_str(&format!(
            "\n⚔️ **War against {}**:\n\
             \x20 - 🏆 Result: {}\n\
             \x20 - ⭐ Stars: {} - {}\n\
             \x20 - ⚔️ Attacks: {} - {}\n\
             \x20 - 💥 Destruction: {}% - {}%\n\
             \x20 - 🎖️ Exp Earned: {}\n\
             \x20 - 🕒 Ended: {}\n",
            str_or_na(&entry.opponent.name),
            result_label(entry.result.as_deref()),
            entry.clan.stars.unwrap_or(0),
            entry.opponent.stars.unwrap_or(0),
            or_na(entry.clan.attacks),
            or_na(entry.opponent.attacks),
            percent(entry.clan.destruction_percentage),
            percent(entry.opponent.destruction_percentage),
            or_na(entry.clan.exp_earned),
            format_api_time(entry.end_time.as_deref()),
        ));
    }
    text
}

pub fn war_log_table(entries: &[WarLogEntry]) -> FormattedTable {
    let mut table = FormattedTable::new(&WAR_LOG_HEADER, &WAR_LOG_WIDTHS);
    for entry in entries.iter().take(WAR_LOG_TABLE_ENTRIES) {
        table.push_row(vec![
            str_or_na(&entry.opponent.name).to_string(),
            result_label(entry.result.as_deref()).to_string(),
            format!(
                "{} - {}",
                entry.clan.stars.unwrap_or(0),
                entry.opponent.stars.unwrap_or(0)
            ),
            format!("{}%", percent(entry.clan.destruction_percentage)),
            or_na(entry.clan.exp_earned),
            format_api_time(entry.end_time.as_deref()),
        ]);
    }
    table
}

pub fn no_war_log(clan: &Clan, tag: &str) -> String {
    format!(
        "No war log available for the clan {} ({}). ❌",
        str_or_na(&clan.name),
        clan.tag.as_deref().unwrap_or(tag)
    )
}

fn result_label(result: Option<&str>) -> &str {
    match result {
        Some("win") => "Win",
        Some("lose") => "Loss",
        Some("tie") => "Tie",
        Some(other) => other,
        None => "N/A",
    }
}

fn percent(value: Option<f64>) -> String {
    value.unwrap_or(0.0).to_string()
}

fn member_of<'a>(side: &'a WarClan, tag: &Option<String>) -> Option<&'a WarMember> {
    tag.as_deref().and_then(|t| side.member(t))
}

fn display_name(member: Option<&WarMember>) -> &str {
    member.and_then(|m| m.name.as_deref()).unwrap_or("N/A")
}

fn position(member: Option<&WarMember>) -> String {
    or_na(member.and_then(|m| m.map_position))
}

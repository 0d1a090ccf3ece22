//! Response types for the Clash of Clans API.
//!
//! The API omits fields freely (private war logs, clans without a capital,
//! players without a clan), so every scalar is optional and every list
//! defaults to empty.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout used by the API, e.g. `20240101T120000.000Z`.
const API_TIME_FORMAT: &str = "%Y%m%dT%H%M%S%.fZ";

/// Parse an API timestamp into UTC.
pub fn parse_api_time(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, API_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Paged list wrapper (`{"items": [...]}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub reason: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Label {
    pub id: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct League {
    pub id: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct District {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub district_hall_level: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClanCapital {
    pub capital_hall_level: Option<u32>,
    pub districts: Vec<District>,
}

/// A clan member as listed by `/clans/{tag}/members`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClanMember {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub exp_level: Option<u32>,
    pub town_hall_level: Option<u32>,
    pub trophies: Option<u32>,
    pub builder_base_trophies: Option<u32>,
    pub clan_rank: Option<u32>,
    pub donations: Option<u32>,
    pub donations_received: Option<u32>,
    pub league: Option<League>,
}

/// Clan details from `/clans/{tag}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Clan {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub clan_level: Option<u32>,
    pub clan_points: Option<u32>,
    pub clan_builder_base_points: Option<u32>,
    pub clan_capital_points: Option<u32>,
    pub required_trophies: Option<u32>,
    pub war_frequency: Option<String>,
    pub war_win_streak: Option<u32>,
    pub war_wins: Option<u32>,
    pub war_ties: Option<u32>,
    pub war_losses: Option<u32>,
    pub is_war_log_public: Option<bool>,
    /// Member count.
    pub members: Option<u32>,
    pub member_list: Vec<ClanMember>,
    pub location: Option<Location>,
    pub labels: Vec<Label>,
    pub clan_capital: Option<ClanCapital>,
}

/// The clan a player belongs to, as embedded in the player record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerClan {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub clan_level: Option<u32>,
}

/// Player details from `/players/{tag}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Player {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub town_hall_level: Option<u32>,
    pub exp_level: Option<u32>,
    pub trophies: Option<u32>,
    pub best_trophies: Option<u32>,
    pub war_stars: Option<u32>,
    pub attack_wins: Option<u32>,
    pub defense_wins: Option<u32>,
    pub builder_hall_level: Option<u32>,
    pub builder_base_trophies: Option<u32>,
    pub best_builder_base_trophies: Option<u32>,
    pub role: Option<String>,
    pub war_preference: Option<String>,
    pub donations: Option<u32>,
    pub donations_received: Option<u32>,
    pub clan: Option<PlayerClan>,
    pub league: Option<League>,
}

/// One attack in a war.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarAttack {
    pub attacker_tag: Option<String>,
    pub defender_tag: Option<String>,
    pub stars: Option<u32>,
    pub destruction_percentage: Option<u32>,
    pub order: Option<u32>,
    pub duration: Option<u32>,
}

/// A war participant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarMember {
    pub tag: Option<String>,
    pub name: Option<String>,
    /// The API spells this one with a lowercase `h`.
    #[serde(rename = "townhallLevel")]
    pub town_hall_level: Option<u32>,
    pub map_position: Option<u32>,
    pub attacks: Vec<WarAttack>,
    pub opponent_attacks: Option<u32>,
    pub best_opponent_attack: Option<WarAttack>,
}

/// One side of a war (current war or war-log entry).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarClan {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub clan_level: Option<u32>,
    /// Attacks used by this side.
    pub attacks: Option<u32>,
    pub stars: Option<u32>,
    pub destruction_percentage: Option<f64>,
    pub exp_earned: Option<u32>,
    pub members: Vec<WarMember>,
}

impl WarClan {
    /// Find a participant by player tag.
    pub fn member(&self, tag: &str) -> Option<&WarMember> {
        self.members
            .iter()
            .find(|m| m.tag.as_deref() == Some(tag))
    }
}

/// Current war from `/clans/{tag}/currentwar`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClanWar {
    pub state: Option<String>,
    pub team_size: Option<u32>,
    pub attacks_per_member: Option<u32>,
    pub preparation_start_time: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub clan: Option<WarClan>,
    pub opponent: Option<WarClan>,
}

impl ClanWar {
    /// Both sides present and the clan is not idle.
    pub fn is_active(&self) -> bool {
        self.clan.is_some()
            && self.opponent.is_some()
            && !matches!(self.state.as_deref(), None | Some("notInWar"))
    }
}

/// Entry from `/clans/{tag}/warlog`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarLogEntry {
    pub result: Option<String>,
    pub end_time: Option<String>,
    pub team_size: Option<u32>,
    pub attacks_per_member: Option<u32>,
    pub clan: WarClan,
    pub opponent: WarClan,
}

/// Entry from `/clans/{tag}/capitalraidseasons`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CapitalRaidSeason {
    pub state: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub capital_total_loot: Option<u64>,
    pub raids_completed: Option<u32>,
    pub total_attacks: Option<u32>,
    pub enemy_districts_destroyed: Option<u32>,
    pub offensive_reward: Option<u32>,
    pub defensive_reward: Option<u32>,
}

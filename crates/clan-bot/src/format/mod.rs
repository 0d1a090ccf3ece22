//! Reply text and table builders.
//!
//! Everything here is pure: records in, text or [`FormattedTable`] out.
//! Absent fields render as `N/A`, absent tallies as `0`.

pub mod capital;
pub mod clan;
pub mod members;
pub mod messages;
pub mod player;
pub mod profile;
pub mod war;

use coc_client::parse_api_time;
use std::fmt::Display;
use std::time::Duration;

pub(crate) const NOT_AVAILABLE: &str = "N/A";

/// Table contents plus per-column width hints (in character units) used
/// only by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub column_widths: Vec<u32>,
}

impl FormattedTable {
    pub fn new(header: &[&str], column_widths: &[u32]) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            column_widths: column_widths.to_vec(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> usize {
        self.header
            .len()
            .max(self.rows.iter().map(Vec::len).max().unwrap_or(0))
    }
}

/// Value or `N/A`.
pub(crate) fn or_na<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// String value or `N/A`.
pub(crate) fn str_or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

/// Render an API timestamp as `YYYY-MM-DD HH:MM UTC`.
pub fn format_api_time(value: Option<&str>) -> String {
    value
        .and_then(parse_api_time)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Milliseconds with two decimals.
pub fn format_millis(duration: Duration) -> String {
    format!("{:.2}", duration.as_secs_f64() * 1000.0)
}

/// Human label for a clan role as the API reports it.
pub fn role_label(role: Option<&str>) -> &str {
    match role {
        Some("leader") => "Leader",
        Some("coLeader") => "Co-Leader",
        Some("admin") => "Elder",
        Some("member") => "Member",
        Some(other) => other,
        None => NOT_AVAILABLE,
    }
}

/// `Name (#TAG)` heading used above per-clan replies.
pub(crate) fn clan_heading(
    name: &Option<String>,
    tag: &Option<String>,
    fallback_tag: &str,
) -> String {
    format!(
        "🏰 **Clan**: {} ({})",
        str_or_na(name),
        tag.as_deref().unwrap_or(fallback_tag)
    )
}

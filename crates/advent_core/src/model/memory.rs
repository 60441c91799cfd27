//! Memory (one calendar day page) model.
//!
//! # Responsibility
//! - Define the assembled page returned to viewers.
//! - Define the calendar summary that never carries block content.
//!
//! # Invariants
//! - `day_number` is unique and starts at 1.
//! - A memory with zero blocks is a valid, empty page.

use super::block::Block;
use super::formatting::DisplaySettings;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar day number, unique per memory.
pub type DayNumber = u32;

/// Wire format for release dates.
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Assembled memory page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    pub day_number: DayNumber,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub display_settings: DisplaySettings,
    /// Ordered by `sort_order` ascending.
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Calendar landing entry for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub day_number: DayNumber,
    pub release_date: NaiveDate,
    pub unlocked: bool,
}

/// Parses a stored release date, ignoring any time-of-day suffix.
///
/// Accepts `2025-12-05` as well as `2025-12-05 18:30:00` or
/// `2025-12-05T18:30:00Z`.
pub fn parse_release_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, RELEASE_DATE_FORMAT).ok()
}

/// Formats a release date for storage.
pub fn format_release_date(date: NaiveDate) -> String {
    date.format(RELEASE_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_release_date, parse_release_date};
    use chrono::NaiveDate;

    #[test]
    fn parse_release_date_truncates_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 5).unwrap();
        assert_eq!(parse_release_date("2025-12-05"), Some(expected));
        assert_eq!(parse_release_date("2025-12-05 18:30:00"), Some(expected));
        assert_eq!(parse_release_date("2025-12-05T23:59:59Z"), Some(expected));
        assert_eq!(parse_release_date("12/05/2025"), None);
        assert_eq!(parse_release_date("2025"), None);
    }

    #[test]
    fn format_release_date_is_iso() {
        let date = NaiveDate::from_ymd_opt(3000, 1, 1).unwrap();
        assert_eq!(format_release_date(date), "3000-01-01");
        assert_eq!(parse_release_date(&format_release_date(date)), Some(date));
    }
}

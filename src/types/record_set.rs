//! Output of the record engine.

use crate::types::season::Season;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Format used for onset and end dates, which omit the year because the season already
/// pins it down.
pub const DAY_MONTH_FORMAT: &str = "%d-%m";
/// Format used for streak boundaries.
pub const DAY_MONTH_YEAR_FORMAT: &str = "%d-%m-%Y";

/// Highest daily snow depth reached in a season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonDepth {
    pub season: Season,
    pub max_depth_cm: f64,
}

/// First or last snow day of a season, with its season-relative day index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonDate {
    pub season: Season,
    pub date: NaiveDate,
    pub ordinal: u32,
}

impl SeasonDate {
    /// The date as `DD-MM`.
    pub fn day_month(&self) -> String {
        self.date.format(DAY_MONTH_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonCount {
    pub season: Season,
    pub snow_days: usize,
}

/// A maximal run of consecutive snow days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub length: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Display for Streak {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} days ({} to {})",
            self.length,
            self.start.format(DAY_MONTH_YEAR_FORMAT),
            self.end.format(DAY_MONTH_YEAR_FORMAT)
        )
    }
}

/// Seasonal superlatives over an analysed span.
///
/// Every ranking holds at most ten entries, best first. Entries with an equal key keep
/// chronological season order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSet {
    /// Seasons with the deepest snow cover.
    pub highest_max_depth: Vec<SeasonDepth>,
    /// Seasons whose first snow day came earliest in the season.
    pub earliest_start: Vec<SeasonDate>,
    pub latest_start: Vec<SeasonDate>,
    /// Seasons whose last snow day came earliest in the season.
    pub earliest_end: Vec<SeasonDate>,
    pub latest_end: Vec<SeasonDate>,
    pub most_snow_days: Vec<SeasonCount>,
    /// Longest run over the whole span, crossing season boundaries if it has to.
    pub longest_streak: Streak,
    pub total_snow_days: usize,
}

/// Result of a record computation on a valid series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "records", rename_all = "snake_case")]
pub enum RecordOutcome {
    Records(RecordSet),
    /// The series holds no day with snow cover, so there is nothing to rank.
    NoSnow,
}

impl RecordOutcome {
    pub fn records(&self) -> Option<&RecordSet> {
        match self {
            RecordOutcome::Records(records) => Some(records),
            RecordOutcome::NoSnow => None,
        }
    }

    pub fn into_records(self) -> Option<RecordSet> {
        match self {
            RecordOutcome::Records(records) => Some(records),
            RecordOutcome::NoSnow => None,
        }
    }

    pub fn is_no_snow(&self) -> bool {
        matches!(self, RecordOutcome::NoSnow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_display() {
        let streak = Streak {
            length: 5,
            start: NaiveDate::from_ymd_opt(2020, 12, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 12, 5).unwrap(),
        };
        assert_eq!(streak.to_string(), "5 days (01-12-2020 to 05-12-2020)");
    }

    #[test]
    fn test_day_month() {
        let entry = SeasonDate {
            season: Season(2020),
            date: NaiveDate::from_ymd_opt(2020, 11, 5).unwrap(),
            ordinal: 128,
        };
        assert_eq!(entry.day_month(), "05-11");
    }

    #[test]
    fn test_no_snow_serialization() {
        assert_eq!(
            serde_json::to_string(&RecordOutcome::NoSnow).unwrap(),
            r#"{"status":"no_snow"}"#
        );
    }
}

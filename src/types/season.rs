//! Winter seasons and the season-relative day ordinal.
//!
//! A snow season runs from July 1 of year `Y` up to and including June 30 of year `Y + 1`
//! and is labelled `"Y/Y+1"`. Because the season straddles New Year, comparing onset or
//! melt dates across seasons requires a day index that does not reset on January 1; that
//! is what [`seasonal_ordinal`] provides.

use crate::types::error::ParseSeasonError;
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Calendar month in which a new season starts.
pub const SEASON_START_MONTH: u32 = 7;

/// Days from July 1 through December 31, identical in every year.
const DAYS_JULY_TO_DECEMBER: u32 = 184;

/// A winter season, identified by the calendar year of the July 1 that opens it.
///
/// # Examples
///
/// ```
/// use snowdepth::Season;
///
/// let season = Season(2019);
/// assert_eq!(season.to_string(), "2019/2020");
/// assert_eq!("2019/2020".parse::<Season>().unwrap(), season);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Season(pub i32);

impl Season {
    pub fn start_year(self) -> i32 {
        self.0
    }

    /// `None` for a season starting in `i32::MAX`.
    pub fn end_year(self) -> Option<i32> {
        self.0.checked_add(1)
    }

    pub fn next(self) -> Option<Self> {
        self.end_year().map(Self)
    }

    /// July 1 of the starting year.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start_year(), SEASON_START_MONTH, 1)
    }

    /// June 30 of the following year.
    pub fn last_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.end_year()?, SEASON_START_MONTH - 1, 30)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        season_of(date) == self
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start_year(), i64::from(self.start_year()) + 1)
    }
}

impl Serialize for Season {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Season {
    type Err = ParseSeasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('/')
            .ok_or_else(|| ParseSeasonError::Format(s.to_string()))?;
        let start: i32 = start
            .trim()
            .parse()
            .map_err(|_| ParseSeasonError::Format(s.to_string()))?;
        let end: i32 = end
            .trim()
            .parse()
            .map_err(|_| ParseSeasonError::Format(s.to_string()))?;
        if start.checked_add(1) != Some(end) {
            return Err(ParseSeasonError::NotConsecutive { start, end });
        }
        Ok(Season(start))
    }
}

/// Returns the season a calendar date belongs to.
///
/// Dates from July onwards open a season in their own year, dates in January through June
/// close the season that started the year before.
pub fn season_of(date: NaiveDate) -> Season {
    if date.month() >= SEASON_START_MONTH {
        Season(date.year())
    } else {
        Season(date.year() - 1)
    }
}

/// Day index of `date` within its season: July 1 is day 1, December 31 is day 184 and
/// the count continues through June 30, which lands on 365 or 366 depending on whether
/// February of the second half has 29 days.
///
/// The value does not depend on which years the season spans, so ordinals of different
/// seasons can be compared directly to find the earliest or latest onset.
pub fn seasonal_ordinal(date: NaiveDate) -> u32 {
    if date.month() >= SEASON_START_MONTH {
        date.ordinal() - june_30_ordinal(date.year())
    } else {
        let previous_year = date.year() - 1;
        let days_in_previous_second_half =
            december_31_ordinal(previous_year) - june_30_ordinal(previous_year);
        date.ordinal() + days_in_previous_second_half
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn june_30_ordinal(year: i32) -> u32 {
    if is_leap_year(year) {
        182
    } else {
        181
    }
}

fn december_31_ordinal(year: i32) -> u32 {
    june_30_ordinal(year) + DAYS_JULY_TO_DECEMBER
}

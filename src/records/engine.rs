//! Seasonal record computation.

use crate::records::aggregate::{aggregate_by_season, SeasonAggregate};
use crate::records::streak::longest_streak;
use crate::types::daily_series::DailySeries;
use crate::types::error::SeriesError;
use crate::types::record_set::{RecordOutcome, RecordSet, SeasonCount, SeasonDate, SeasonDepth};
use crate::types::season::{seasonal_ordinal, Season};
use chrono::NaiveDate;
use log::debug;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Number of entries kept in every ranking.
pub const RANKING_SIZE: usize = 10;

/// Computes the seasonal records of a gap-filled daily series.
///
/// Seasons are ranked by maximum depth, by the season-relative day of their first and last
/// snow day, and by their number of snow days. The longest run of consecutive snow days
/// is searched over the whole series, regardless of seasons.
///
/// Every ranking is sorted with a stable sort over seasons in chronological order, so
/// seasons with equal keys keep their chronological order and the result is identical
/// across runs.
///
/// # Returns
///
/// [`RecordOutcome::NoSnow`] when no day in the series has snow cover. This is a normal
/// outcome and not an error.
///
/// # Errors
///
/// [`SeriesError::EmptySeries`] for an empty series and [`SeriesError::InvalidDepth`] when a
/// depth is negative or not a finite number.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use snowdepth::{compute_records, DailySeries, Season};
///
/// let series: DailySeries = [
///     (NaiveDate::from_ymd_opt(2020, 12, 1).unwrap(), 12.0),
///     (NaiveDate::from_ymd_opt(2020, 12, 2).unwrap(), 15.5),
/// ]
/// .into_iter()
/// .collect();
///
/// let outcome = compute_records(&series).unwrap();
/// let records = outcome.records().unwrap();
/// assert_eq!(records.highest_max_depth[0].season, Season(2020));
/// assert_eq!(records.longest_streak.length, 2);
/// ```
pub fn compute_records(series: &DailySeries) -> Result<RecordOutcome, SeriesError> {
    series.validate()?;

    let Some(longest_streak) = longest_streak(series) else {
        debug!(
            "No snow days in {} days of data, nothing to rank",
            series.len()
        );
        return Ok(RecordOutcome::NoSnow);
    };

    let seasons = aggregate_by_season(series);

    let highest_max_depth = top_by_key(
        seasons
            .iter()
            .map(|(season, aggregate)| SeasonDepth {
                season: *season,
                max_depth_cm: aggregate.max_depth_cm,
            })
            .collect(),
        |entry| Reverse(OrderedFloat(entry.max_depth_cm)),
    );

    let onsets = season_dates(&seasons, |aggregate| aggregate.first_snow_day);
    let ends = season_dates(&seasons, |aggregate| aggregate.last_snow_day);

    let most_snow_days = top_by_key(
        seasons
            .iter()
            .filter(|(_, aggregate)| aggregate.snow_days > 0)
            .map(|(season, aggregate)| SeasonCount {
                season: *season,
                snow_days: aggregate.snow_days,
            })
            .collect(),
        |entry| Reverse(entry.snow_days),
    );

    let total_snow_days = series.snow_days().count();
    debug!(
        "Computed records over {} seasons with {} snow days",
        seasons.len(),
        total_snow_days
    );

    Ok(RecordOutcome::Records(RecordSet {
        highest_max_depth,
        earliest_start: top_by_key(onsets.clone(), |entry| entry.ordinal),
        latest_start: top_by_key(onsets, |entry| Reverse(entry.ordinal)),
        earliest_end: top_by_key(ends.clone(), |entry| entry.ordinal),
        latest_end: top_by_key(ends, |entry| Reverse(entry.ordinal)),
        most_snow_days,
        longest_streak,
        total_snow_days,
    }))
}

/// One entry per season that has a date for `pick`, in chronological season order.
fn season_dates(
    seasons: &BTreeMap<Season, SeasonAggregate>,
    pick: impl Fn(&SeasonAggregate) -> Option<NaiveDate>,
) -> Vec<SeasonDate> {
    seasons
        .iter()
        .filter_map(|(season, aggregate)| {
            pick(aggregate).map(|date| SeasonDate {
                season: *season,
                date,
                ordinal: seasonal_ordinal(date),
            })
        })
        .collect()
}

fn top_by_key<T, K: Ord>(mut entries: Vec<T>, key: impl FnMut(&T) -> K) -> Vec<T> {
    // sort_by_key is stable
    entries.sort_by_key(key);
    entries.truncate(RANKING_SIZE);
    entries
}

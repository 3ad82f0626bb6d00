//! The daily maximum snow-depth series that every analysis works on.

use crate::types::error::SeriesError;
use crate::types::period::StartEndDate;
use chrono::{Duration, NaiveDate};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use serde::{Serialize, Serializer};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

pub const DATE_COLUMN: &str = "date";
pub const DEPTH_COLUMN: &str = "depth_cm";

/// Maximum snow depth recorded on a single calendar day.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct DailyMeasurement {
    pub date: NaiveDate,
    pub depth_cm: f64,
}

impl DailyMeasurement {
    pub fn new(date: NaiveDate, depth_cm: f64) -> Self {
        Self { date, depth_cm }
    }

    /// A day counts as a snow day when any snow cover was recorded.
    pub fn is_snow_day(&self) -> bool {
        self.depth_cm > 0.0
    }
}

/// Date-ordered mapping from calendar day to maximum snow depth in centimeters.
///
/// A date is stored at most once. When the same date is inserted again, the value that was
/// inserted first is kept, which is how overlapping archive responses are merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    values: BTreeMap<NaiveDate, f64>,
}

impl DailySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a measurement unless its date is already present. Returns whether the
    /// value was stored.
    pub fn insert(&mut self, measurement: DailyMeasurement) -> bool {
        match self.values.entry(measurement.date) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(measurement.depth_cm);
                true
            }
        }
    }

    /// Appends all measurements of `other`, keeping existing values for shared dates.
    pub fn merge(&mut self, other: DailySeries) {
        for measurement in other.iter() {
            self.insert(measurement);
        }
    }

    /// Defaults every day of `period` that has no value yet to 0.0 cm.
    pub fn fill_missing(&mut self, period: StartEndDate) {
        let mut day = period.start;
        while day <= period.end {
            self.values.entry(day).or_insert(0.0);
            day += Duration::days(1);
        }
    }

    /// Returns the part of the series that falls inside `period`.
    pub fn restrict(&self, period: StartEndDate) -> DailySeries {
        if period.start > period.end {
            return DailySeries::new();
        }
        Self {
            values: self
                .values
                .range(period.start..=period.end)
                .map(|(date, depth)| (*date, *depth))
                .collect(),
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.values.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.values.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.values.keys().next_back().copied()
    }

    /// Measurements in chronological order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = DailyMeasurement> + '_ {
        self.values
            .iter()
            .map(|(date, depth)| DailyMeasurement::new(*date, *depth))
    }

    /// Measurements with a depth above zero, in chronological order.
    pub fn snow_days(&self) -> impl Iterator<Item = DailyMeasurement> + '_ {
        self.iter().filter(DailyMeasurement::is_snow_day)
    }

    /// Checks that the series can be analysed: not empty and every depth a finite,
    /// non-negative number.
    pub fn validate(&self) -> Result<(), SeriesError> {
        if self.is_empty() {
            return Err(SeriesError::EmptySeries);
        }
        match self
            .iter()
            .find(|m| !m.depth_cm.is_finite() || m.depth_cm < 0.0)
        {
            Some(m) => Err(SeriesError::InvalidDepth {
                date: m.date,
                depth_cm: m.depth_cm,
            }),
            None => Ok(()),
        }
    }

    /// Converts the series into a two-column frame (`date`, `depth_cm`).
    pub fn to_dataframe(&self) -> Result<DataFrame, SeriesError> {
        let dates: Vec<NaiveDate> = self.values.keys().copied().collect();
        let depths: Vec<f64> = self.values.values().copied().collect();
        DataFrame::new(vec![
            Column::from(Series::new(DATE_COLUMN.into(), dates)),
            Column::from(Series::new(DEPTH_COLUMN.into(), depths)),
        ])
        .map_err(SeriesError::FrameConstruction)
    }

    /// Reads a series back from a frame with a `date` (Date) and `depth_cm` (Float64)
    /// column. Rows with nulls are rejected rather than silently dropped.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, SeriesError> {
        let dates = df
            .column(DATE_COLUMN)
            .map_err(|e| SeriesError::ColumnNotFound(DATE_COLUMN.to_string(), e))?
            .date()
            .map_err(|e| SeriesError::ColumnType(DATE_COLUMN.to_string(), e))?;
        let depths = df
            .column(DEPTH_COLUMN)
            .map_err(|e| SeriesError::ColumnNotFound(DEPTH_COLUMN.to_string(), e))?
            .f64()
            .map_err(|e| SeriesError::ColumnType(DEPTH_COLUMN.to_string(), e))?;

        let mut series = DailySeries::new();
        for (row, (date, depth)) in dates.as_date_iter().zip(depths.into_iter()).enumerate() {
            let date = date.ok_or_else(|| SeriesError::NullValue {
                column: DATE_COLUMN.to_string(),
                row,
            })?;
            let depth_cm = depth.ok_or_else(|| SeriesError::NullValue {
                column: DEPTH_COLUMN.to_string(),
                row,
            })?;
            series.insert(DailyMeasurement::new(date, depth_cm));
        }
        Ok(series)
    }
}

impl FromIterator<DailyMeasurement> for DailySeries {
    fn from_iter<I: IntoIterator<Item = DailyMeasurement>>(iter: I) -> Self {
        let mut series = DailySeries::new();
        for measurement in iter {
            series.insert(measurement);
        }
        series
    }
}

impl FromIterator<(NaiveDate, f64)> for DailySeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(date, depth_cm)| DailyMeasurement::new(date, depth_cm))
            .collect()
    }
}

impl Serialize for DailySeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

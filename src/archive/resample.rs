use crate::archive::error::ArchiveError;
use crate::archive::source::HourlySnowDepth;
use crate::types::daily_series::{DailyMeasurement, DailySeries, DATE_COLUMN};
use chrono::NaiveDate;
use polars::prelude::*;

const HOURLY_DEPTH_COLUMN: &str = "snow_depth_m";
const DAILY_MAX_COLUMN: &str = "max_depth_m";

/// Reduces hourly snow depth to the daily maximum in centimeters, rounded to one decimal.
///
/// Days are the local calendar days of the timestamps. Missing samples are ignored; a day
/// with no valid sample at all gets 0.0.
pub fn daily_maximum(hourly: &HourlySnowDepth) -> Result<DailySeries, ArchiveError> {
    if hourly.time.is_empty() {
        return Ok(DailySeries::new());
    }
    let dates: Vec<NaiveDate> = hourly.time.iter().map(|t| t.date()).collect();
    let df = DataFrame::new(vec![
        Column::from(Series::new(DATE_COLUMN.into(), dates)),
        Column::from(Series::new(
            HOURLY_DEPTH_COLUMN.into(),
            hourly.snow_depth_m.clone(),
        )),
    ])?;

    let daily = df
        .lazy()
        .group_by([col(DATE_COLUMN)])
        .agg([col(HOURLY_DEPTH_COLUMN).max().alias(DAILY_MAX_COLUMN)])
        .collect()?;

    let days = daily.column(DATE_COLUMN)?.date()?;
    let maxima = daily.column(DAILY_MAX_COLUMN)?.f64()?;

    let mut series = DailySeries::new();
    for (date, max_m) in days.as_date_iter().zip(maxima.into_iter()) {
        let Some(date) = date else {
            continue;
        };
        series.insert(DailyMeasurement::new(
            date,
            max_m.map_or(0.0, meters_to_rounded_cm),
        ));
    }
    Ok(series)
}

fn meters_to_rounded_cm(meters: f64) -> f64 {
    (meters * 1000.0).round() / 10.0
}

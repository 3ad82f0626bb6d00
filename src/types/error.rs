use chrono::NaiveDate;
use polars::error::PolarsError;
use thiserror::Error;

/// A daily series that cannot be analysed.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("Daily series is empty")]
    EmptySeries,

    #[error("Invalid snow depth {depth_cm} cm on {date}")]
    InvalidDepth { date: NaiveDate, depth_cm: f64 },

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Column '{0}' has an unexpected type")]
    ColumnType(String, #[source] PolarsError),

    #[error("Null value in column '{column}' at row {row}")]
    NullValue { column: String, row: usize },

    #[error("Failed to build DataFrame from daily series")]
    FrameConstruction(#[source] PolarsError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseSeasonError {
    #[error("Expected a season formatted as 'YYYY/YYYY', got '{0}'")]
    Format(String),

    #[error("Season years must be consecutive, got {start}/{end}")]
    NotConsecutive { start: i32, end: i32 },
}

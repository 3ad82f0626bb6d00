use crate::archive::error::{ArchiveError, CacheError};
use crate::types::error::SeriesError;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnowError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    InvalidInput(#[from] SeriesError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Cannot build seasons from {start_year} to {end_year}")]
    InvalidSeasonSpan { start_year: i32, end_year: i32 },

    #[error("Date {date} is outside the supported range {min} to {max}")]
    DateOutOfRange {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}

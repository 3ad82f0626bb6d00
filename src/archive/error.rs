use crate::types::error::SeriesError;
use chrono::NaiveDate;
use polars::error::PolarsError;
use std::path::PathBuf;
use std::time::SystemTimeError;
use thiserror::Error;

/// Failures while retrieving data from the weather archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse archive response")]
    JsonParse(#[from] serde_json::Error),

    #[error("Malformed archive response: {0}")]
    MalformedResponse(String),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("No snow depth data available from {start} to {end}")]
    NoData { start: NaiveDate, end: NaiveDate },

    #[error("None of the {chunks} requests from {start} to {end} returned data")]
    AllChunksFailed {
        start: NaiveDate,
        end: NaiveDate,
        chunks: usize,
        #[source]
        last_error: Option<Box<ArchiveError>>,
    },
}

/// Failures of the on-disk series cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to read metadata for cache file '{0}'")]
    CacheMetadataRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to calculate system time difference for {0:?}")]
    SystemTimeCalculation(PathBuf, #[source] SystemTimeError),

    #[error("I/O error writing parquet cache file '{0}'")]
    ParquetWriteIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing parquet cache file '{0}'")]
    ParquetWritePolars(PathBuf, #[source] PolarsError),

    #[error("Failed to scan parquet cache file '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error("Cache file '{0}' does not hold a valid daily series")]
    InvalidSeries(PathBuf, #[source] SeriesError),

    #[error("Failed to read cache directory '{0}'")]
    CacheDirRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to delete cache '{0}'")]
    CacheDeletionError(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

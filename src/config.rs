//! Location, archive endpoint and fetch settings.

use chrono::{Duration as DateDuration, Local, NaiveDate};
use std::time::Duration;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use snowdepth::LatLon;
///
/// let malman = LatLon(62.9977, 17.0811);
/// assert_eq!(malman.0, 62.9977); // Latitude
/// assert_eq!(malman.1, 17.0811); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Malmån, Sweden.
pub const DEFAULT_LOCATION: LatLon = LatLon(62.9977, 17.0811);
pub const DEFAULT_TIMEZONE: &str = "Europe/Stockholm";
pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
/// Years of data requested per archive call when fetching long spans.
pub const DEFAULT_CHUNK_YEARS: u32 = 4;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 2;
pub const CACHE_DIR_NAME: &str = "snowdepth_rs_cache";

/// Earliest date for which archive data is considered reliable.
pub fn earliest_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1950, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Latest date the archive can serve: historical data stops at yesterday.
pub fn latest_supported_date() -> NaiveDate {
    Local::now().date_naive() - DateDuration::days(1)
}

/// Settings shared by the series builder and the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveConfig {
    pub location: LatLon,
    /// IANA time zone the archive localizes hourly timestamps to; days are cut at local
    /// midnight.
    pub timezone: String,
    pub archive_url: String,
    pub chunk_years: u32,
    pub cache_ttl: Duration,
    pub max_concurrent_requests: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION,
            timezone: DEFAULT_TIMEZONE.to_string(),
            archive_url: ARCHIVE_URL.to_string(),
            chunk_years: DEFAULT_CHUNK_YEARS,
            cache_ttl: DEFAULT_CACHE_TTL,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}

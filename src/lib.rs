mod archive;
mod config;
mod error;
mod records;
mod snow_archive;
mod types;
mod utils;

pub use error::SnowError;
pub use snow_archive::*;

pub use config::{
    earliest_supported_date, latest_supported_date, ArchiveConfig, LatLon, ARCHIVE_URL,
    DEFAULT_CACHE_TTL, DEFAULT_CHUNK_YEARS, DEFAULT_LOCATION, DEFAULT_MAX_CONCURRENT_REQUESTS,
    DEFAULT_TIMEZONE,
};

pub use records::engine::{compute_records, RANKING_SIZE};
pub use records::streak::{longest_streak, snow_streaks};

pub use types::daily_series::*;
pub use types::detail::*;
pub use types::period::{DatePeriod, StartEndDate};
pub use types::record_set::*;
pub use types::season::{season_of, seasonal_ordinal, Season};

pub use archive::open_meteo::OpenMeteoSource;
pub use archive::series_builder::DailySeriesBuilder;
pub use archive::source::{ArchiveRequest, ArchiveSource, HourlySnowDepth};

pub use archive::error::{ArchiveError, CacheError};
pub use types::error::{ParseSeasonError, SeriesError};

//! This module provides the main entry point of the crate. [`SnowArchive`] fetches daily
//! snow depth for one location from the weather archive, caches it, and computes seasonal
//! records or a detail view over a short period.

use crate::archive::open_meteo::OpenMeteoSource;
use crate::archive::series_builder::DailySeriesBuilder;
use crate::archive::series_cache::SeriesCache;
use crate::archive::source::ArchiveSource;
use crate::config::{
    earliest_supported_date, latest_supported_date, ArchiveConfig, LatLon, ARCHIVE_URL,
    DEFAULT_CACHE_TTL, DEFAULT_CHUNK_YEARS, DEFAULT_LOCATION, DEFAULT_MAX_CONCURRENT_REQUESTS,
    DEFAULT_TIMEZONE,
};
use crate::error::SnowError;
use crate::records::engine::compute_records;
use crate::types::daily_series::DailySeries;
use crate::types::detail::{DetailSummary, DetailView};
use crate::types::error::SeriesError;
use crate::types::period::{DatePeriod, StartEndDate};
use crate::types::record_set::RecordOutcome;
use crate::types::season::Season;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use chrono::NaiveDate;
use log::{debug, warn};
use std::path::PathBuf;
use std::time::Duration;

/// The main client for historic snow depth.
///
/// A client is bound to a single location. Long spans are fetched in chunks, reduced to
/// daily maxima and cached for [`ArchiveConfig::cache_ttl`], both in memory and as parquet
/// files in the cache folder.
///
/// Create an instance with [`SnowArchive::builder()`] for the Open-Meteo archive, or with
/// [`SnowArchive::with_source()`] to read from any other [`ArchiveSource`].
///
/// # Examples
///
/// ```rust
/// # use snowdepth::SnowArchive;
/// # use snowdepth::SnowError;
/// # async fn run() -> Result<(), SnowError> {
/// // Malmån, Sweden, with the default cache directory
/// let archive = SnowArchive::builder().build().await?;
/// # Ok(())
/// # }
/// ```
pub struct SnowArchive<S = OpenMeteoSource> {
    builder: DailySeriesBuilder<S>,
    cache: SeriesCache,
    config: ArchiveConfig,
}

#[bon]
impl SnowArchive<OpenMeteoSource> {
    /// Creates a client that reads from the Open-Meteo archive.
    ///
    /// This method uses a builder pattern. Every setting is optional.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: The location to fetch snow depth for. Defaults to Malmån, Sweden.
    /// * `.timezone(impl Into<String>)`: IANA time zone that decides where one day ends. Defaults to `Europe/Stockholm`.
    /// * `.cache_folder(PathBuf)`: Where cached series are stored. Defaults to `snowdepth_rs_cache` in the system cache directory.
    /// * `.chunk_years(u32)`: Years of data per archive request for long spans. Defaults to `4`.
    /// * `.cache_ttl(Duration)`: How long a cached series stays valid. Defaults to 24 hours.
    /// * `.max_concurrent_requests(usize)`: Archive requests in flight at once. Defaults to `2`.
    /// * `.archive_url(impl Into<String>)`: Base URL of the archive API.
    ///
    /// # Errors
    ///
    /// Returns [`SnowError::CacheDirResolution`] if the default cache directory cannot be found.
    /// Returns [`SnowError::CacheDirCreation`] if the cache directory cannot be created.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use snowdepth::{LatLon, SnowArchive, SnowError};
    /// # use std::time::Duration;
    /// # async fn run() -> Result<(), SnowError> {
    /// let archive = SnowArchive::builder()
    ///     .location(LatLon(67.8558, 20.2253)) // Kiruna
    ///     .cache_ttl(Duration::from_secs(3600))
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn new(
        location: Option<LatLon>,
        #[builder(into)] timezone: Option<String>,
        cache_folder: Option<PathBuf>,
        chunk_years: Option<u32>,
        cache_ttl: Option<Duration>,
        max_concurrent_requests: Option<usize>,
        #[builder(into)] archive_url: Option<String>,
    ) -> Result<Self, SnowError> {
        let cache_folder = match cache_folder {
            Some(folder) => folder,
            None => get_cache_dir().map_err(SnowError::CacheDirResolution)?,
        };
        let config = ArchiveConfig {
            location: location.unwrap_or(DEFAULT_LOCATION),
            timezone: timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            archive_url: archive_url.unwrap_or_else(|| ARCHIVE_URL.to_string()),
            chunk_years: chunk_years.unwrap_or(DEFAULT_CHUNK_YEARS),
            cache_ttl: cache_ttl.unwrap_or(DEFAULT_CACHE_TTL),
            max_concurrent_requests: max_concurrent_requests
                .unwrap_or(DEFAULT_MAX_CONCURRENT_REQUESTS),
        };
        let source = OpenMeteoSource::new(config.archive_url.clone());
        Self::with_source(source, config, cache_folder).await
    }
}

#[bon]
impl<S: ArchiveSource> SnowArchive<S> {
    /// Creates a client that reads hourly snow depth from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`SnowError::CacheDirCreation`] if `cache_folder` cannot be created.
    pub async fn with_source(
        source: S,
        config: ArchiveConfig,
        cache_folder: PathBuf,
    ) -> Result<Self, SnowError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| SnowError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            builder: DailySeriesBuilder::new(source, config.clone()),
            cache: SeriesCache::new(&cache_folder, config.cache_ttl),
            config,
        })
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        self.builder.source()
    }

    /// Computes seasonal snow records from July 1 of `start_year` to June 30 of `end_year`.
    ///
    /// The end of the span is clamped to yesterday, the last day the archive has data for.
    /// The daily series of the span is cached, so asking again for the same seasons within
    /// the cache TTL does not touch the archive.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.start_year(i32)`: **Required.** Calendar year of the July 1 that opens the first season.
    /// * `.end_year(i32)`: **Required.** Calendar year of the June 30 that closes the last season.
    ///
    /// # Returns
    ///
    /// [`RecordOutcome::Records`] with the rankings, or [`RecordOutcome::NoSnow`] when the
    /// whole span is snow-free.
    ///
    /// # Errors
    ///
    /// Returns [`SnowError::InvalidDateRange`] if the span is empty, before anything is fetched.
    /// Returns [`SnowError::Archive`] if no part of the span could be fetched.
    /// Returns [`SnowError::InvalidInput`] if the fetched series cannot be analysed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use snowdepth::{RecordOutcome, SnowArchive, SnowError};
    /// # async fn run() -> Result<(), SnowError> {
    /// let archive = SnowArchive::builder().build().await?;
    /// let outcome = archive
    ///     .records()
    ///     .start_year(1990)
    ///     .end_year(2025)
    ///     .call()
    ///     .await?;
    ///
    /// match outcome {
    ///     RecordOutcome::Records(records) => {
    ///         for entry in &records.highest_max_depth {
    ///             println!("{}: {} cm", entry.season, entry.max_depth_cm);
    ///         }
    ///         println!("Longest streak: {}", records.longest_streak);
    ///     }
    ///     RecordOutcome::NoSnow => println!("No snow in this period"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn records(&self, start_year: i32, end_year: i32) -> Result<RecordOutcome, SnowError> {
        let span = end_year
            .checked_sub(1)
            .and_then(|last| (Season(start_year), Season(last)).get_date_period())
            .ok_or(SnowError::InvalidSeasonSpan {
                start_year,
                end_year,
            })?;
        let period = StartEndDate {
            start: span.start,
            end: span.end.min(latest_supported_date()),
        };
        check_order(period)?;

        let series = self.cached_series(period).await?;
        Ok(compute_records(&series)?)
    }

    /// Fetches the daily snow depth of a short period together with its maximum, mean and
    /// number of snow days.
    ///
    /// The period is fetched with a single archive request and is not cached.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.start(NaiveDate)`: **Required.** First day of the period.
    /// * `.end(NaiveDate)`: **Required.** Last day of the period, included.
    ///
    /// # Errors
    ///
    /// Returns [`SnowError::InvalidDateRange`] if `start` is after `end`.
    /// Returns [`SnowError::DateOutOfRange`] if either date is before 1950-01-01 or after yesterday.
    /// Returns [`SnowError::Archive`] if the archive request fails or returns no data.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chrono::NaiveDate;
    /// # use snowdepth::{SnowArchive, SnowError};
    /// # async fn run() -> Result<(), SnowError> {
    /// let archive = SnowArchive::builder().build().await?;
    /// let view = archive
    ///     .detail()
    ///     .start(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap())
    ///     .call()
    ///     .await?;
    /// println!(
    ///     "max {} cm, mean {:.1} cm, {} snow days",
    ///     view.summary.max_depth_cm, view.summary.mean_depth_cm, view.summary.snow_days
    /// );
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn detail(&self, start: NaiveDate, end: NaiveDate) -> Result<DetailView, SnowError> {
        let period = (start, end)
            .get_date_period()
            .ok_or(SnowError::InvalidDateRange { start, end })?;
        check_order(period)?;
        check_supported(start)?;
        check_supported(end)?;

        let series = self.builder.fetch_period(period).await?;
        let summary = DetailSummary::from_series(&series).ok_or(SeriesError::EmptySeries)?;
        Ok(DetailView { series, summary })
    }

    /// Fetches the gap-filled daily maximum snow depth from `start` to `end`, through the
    /// cache.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.start(NaiveDate)`: **Required.** First day of the period.
    /// * `.end(NaiveDate)`: **Required.** Last day of the period, included.
    ///
    /// # Errors
    ///
    /// Returns [`SnowError::InvalidDateRange`] if `start` is after `end`.
    /// Returns [`SnowError::Archive`] if no part of the period could be fetched.
    #[builder]
    pub async fn daily_series(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DailySeries, SnowError> {
        let period = StartEndDate { start, end };
        check_order(period)?;
        self.cached_series(period).await
    }

    /// Removes every cached series of this client's cache folder. Returns the number of
    /// cache files deleted.
    pub async fn clear_cache(&self) -> Result<usize, SnowError> {
        Ok(self.cache.clear().await?)
    }

    async fn cached_series(&self, period: StartEndDate) -> Result<DailySeries, SnowError> {
        let location = self.config.location;
        match self.cache.load(location, period).await {
            Ok(Some(series)) => return Ok(series),
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable cache entry: {}", e),
        }

        let series = self.builder.build(period).await?;
        if let Err(e) = self.cache.store(location, period, &series).await {
            warn!("Failed to cache daily series: {}", e);
        }
        debug!(
            "Built daily series of {} days from {} to {}",
            series.len(),
            period.start,
            period.end
        );
        Ok(series)
    }
}

fn check_order(period: StartEndDate) -> Result<(), SnowError> {
    if period.start > period.end {
        return Err(SnowError::InvalidDateRange {
            start: period.start,
            end: period.end,
        });
    }
    Ok(())
}

fn check_supported(date: NaiveDate) -> Result<(), SnowError> {
    let min = earliest_supported_date();
    let max = latest_supported_date();
    if date < min || date > max {
        return Err(SnowError::DateOutOfRange { date, min, max });
    }
    Ok(())
}

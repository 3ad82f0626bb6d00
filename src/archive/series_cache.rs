use crate::archive::error::CacheError;
use crate::config::LatLon;
use crate::types::daily_series::DailySeries;
use crate::types::period::StartEndDate;
use log::{debug, info, warn};
use polars::prelude::*;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tokio::{fs, task};

const CACHE_FILE_PREFIX: &str = "daily-";
const CACHE_FILE_EXTENSION: &str = "parquet";

struct CachedSeries {
    fetched_at: SystemTime,
    series: DailySeries,
}

/// Time-limited cache of daily series, kept in memory and as parquet files on disk.
pub struct SeriesCache {
    cache_dir: PathBuf,
    ttl: Duration,
    memory: Mutex<HashMap<String, CachedSeries>>,
}

impl SeriesCache {
    pub fn new(cache_dir: &Path, ttl: Duration) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            ttl,
            memory: Mutex::new(HashMap::new()),
        }
    }

    fn cache_key(location: LatLon, period: StartEndDate) -> String {
        format!(
            "{}{:.4}_{:.4}_{}_{}",
            CACHE_FILE_PREFIX, location.0, location.1, period.start, period.end
        )
    }

    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", key, CACHE_FILE_EXTENSION))
    }

    fn is_fresh(&self, fetched_at: SystemTime) -> bool {
        // A timestamp in the future counts as fresh.
        SystemTime::now()
            .duration_since(fetched_at)
            .map_or(true, |age| age < self.ttl)
    }

    /// Drops every in-memory entry older than the TTL, not just the one being looked up.
    fn evict_stale(&self, memory: &mut HashMap<String, CachedSeries>) {
        let before = memory.len();
        memory.retain(|_, cached| self.is_fresh(cached.fetched_at));
        if memory.len() < before {
            debug!("Evicted {} expired series from memory", before - memory.len());
        }
    }

    /// Returns the cached series for `location` and `period` if one exists and is younger
    /// than the TTL.
    pub async fn load(
        &self,
        location: LatLon,
        period: StartEndDate,
    ) -> Result<Option<DailySeries>, CacheError> {
        let key = Self::cache_key(location, period);
        {
            let mut memory = self.memory.lock().await;
            self.evict_stale(&mut memory);
            if let Some(cached) = memory.get(&key) {
                debug!("Memory cache hit for {}", key);
                return Ok(Some(cached.series.clone()));
            }
        }

        let path = self.cache_path(&key);
        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Cache miss for {}", key);
                return Ok(None);
            }
            Err(e) => return Err(CacheError::CacheMetadataRead(path, e)),
        };
        let modified = metadata
            .modified()
            .map_err(|e| CacheError::CacheMetadataRead(path.clone(), e))?;
        let age = SystemTime::now()
            .duration_since(modified)
            .map_err(|e| CacheError::SystemTimeCalculation(path.clone(), e))?;
        if age >= self.ttl {
            info!(
                "Cache file {:?} is {}s old, older than the {}s TTL",
                path,
                age.as_secs(),
                self.ttl.as_secs()
            );
            return Ok(None);
        }

        let series = Self::read_parquet(path.clone()).await?;
        info!("Cache hit for {} at {:?}", key, path);
        self.memory.lock().await.insert(
            key,
            CachedSeries {
                fetched_at: modified,
                series: series.clone(),
            },
        );
        Ok(Some(series))
    }

    /// Stores `series` in memory and writes it to the cache folder.
    pub async fn store(
        &self,
        location: LatLon,
        period: StartEndDate,
        series: &DailySeries,
    ) -> Result<(), CacheError> {
        let key = Self::cache_key(location, period);
        let path = self.cache_path(&key);
        {
            let mut memory = self.memory.lock().await;
            self.evict_stale(&mut memory);
            memory.insert(
                key,
                CachedSeries {
                    fetched_at: SystemTime::now(),
                    series: series.clone(),
                },
            );
        }

        let df = series
            .to_dataframe()
            .map_err(|e| CacheError::InvalidSeries(path.clone(), e))?;
        Self::write_parquet(df, path.clone()).await?;
        info!("Cached {} days of snow depth to {:?}", series.len(), path);
        Ok(())
    }

    /// Drops every cached series, in memory and on disk. Returns the number of files
    /// removed.
    pub async fn clear(&self) -> Result<usize, CacheError> {
        self.memory.lock().await.clear();

        let mut entries = match fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(CacheError::CacheDirRead(self.cache_dir.clone(), e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::CacheDirRead(self.cache_dir.clone(), e))?
        {
            let path = entry.path();
            if !is_cache_file(&path) {
                continue;
            }
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!("Cache file {:?} disappeared before removal", path);
                }
                Err(e) => return Err(CacheError::CacheDeletionError(path, e)),
            }
        }
        info!("Removed {} cache file(s) from {:?}", removed, self.cache_dir);
        Ok(removed)
    }

    async fn read_parquet(path: PathBuf) -> Result<DailySeries, CacheError> {
        task::spawn_blocking(move || {
            let df = LazyFrame::scan_parquet(&path, Default::default())
                .and_then(LazyFrame::collect)
                .map_err(|e| CacheError::ParquetScan(path.clone(), e))?;
            let series = DailySeries::from_dataframe(&df)
                .and_then(|series| series.validate().map(|()| series))
                .map_err(|e| CacheError::InvalidSeries(path, e))?;
            Ok::<DailySeries, CacheError>(series)
        })
        .await?
    }

    async fn write_parquet(mut df: DataFrame, path: PathBuf) -> Result<(), CacheError> {
        task::spawn_blocking(move || {
            let file = std::fs::File::create(&path)
                .map_err(|e| CacheError::ParquetWriteIo(path.clone(), e))?;
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| CacheError::ParquetWritePolars(path, e))?;
            Ok::<(), CacheError>(())
        })
        .await?
    }
}

fn is_cache_file(path: &Path) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(CACHE_FILE_PREFIX));
    let has_extension = path
        .extension()
        .is_some_and(|ext| ext == CACHE_FILE_EXTENSION);
    has_prefix && has_extension
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    const LOCATION: LatLon = LatLon(62.9977, 17.0811);

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period() -> StartEndDate {
        StartEndDate {
            start: date(2020, 7, 1),
            end: date(2021, 6, 30),
        }
    }

    fn sample_series() -> DailySeries {
        let mut series: DailySeries = vec![
            (date(2020, 12, 1), 4.5),
            (date(2020, 12, 2), 7.25),
            (date(2021, 2, 1), 31.0),
        ]
        .into_iter()
        .collect();
        series.fill_missing(period());
        series
    }

    #[test]
    fn test_cache_file_name() {
        let key = SeriesCache::cache_key(LOCATION, period());
        assert_eq!(key, "daily-62.9977_17.0811_2020-07-01_2021-06-30");
        assert!(is_cache_file(Path::new(
            "/tmp/daily-62.9977_17.0811_2020-07-01_2021-06-30.parquet"
        )));
        assert!(!is_cache_file(Path::new("/tmp/stations.parquet")));
        assert!(!is_cache_file(Path::new("/tmp/daily-notes.txt")));
    }

    #[tokio::test]
    async fn test_store_then_load_from_disk() -> Result<(), CacheError> {
        let dir = tempdir().unwrap();
        let series = sample_series();
        SeriesCache::new(dir.path(), Duration::from_secs(3600))
            .store(LOCATION, period(), &series)
            .await?;

        // A fresh instance has nothing in memory and must read the parquet file.
        let cache = SeriesCache::new(dir.path(), Duration::from_secs(3600));
        let loaded = cache.load(LOCATION, period()).await?;
        assert_eq!(loaded, Some(series));
        Ok(())
    }

    #[tokio::test]
    async fn test_miss_for_other_period() -> Result<(), CacheError> {
        let dir = tempdir().unwrap();
        let cache = SeriesCache::new(dir.path(), Duration::from_secs(3600));
        cache.store(LOCATION, period(), &sample_series()).await?;

        let other = StartEndDate {
            start: date(2019, 7, 1),
            end: date(2021, 6, 30),
        };
        assert_eq!(cache.load(LOCATION, other).await?, None);
        assert_eq!(cache.load(LatLon(52.52, 13.40), period()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_entries_are_ignored() -> Result<(), CacheError> {
        let dir = tempdir().unwrap();
        let cache = SeriesCache::new(dir.path(), Duration::ZERO);
        cache.store(LOCATION, period(), &sample_series()).await?;
        assert_eq!(cache.load(LOCATION, period()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_memory_entries_are_evicted() -> Result<(), CacheError> {
        let dir = tempdir().unwrap();
        let cache = SeriesCache::new(dir.path(), Duration::from_secs(3600));
        let old_key = "daily-62.9977_17.0811_2020-07-01_2021-06-29".to_string();
        cache.memory.lock().await.insert(
            old_key.clone(),
            CachedSeries {
                fetched_at: SystemTime::now() - Duration::from_secs(7200),
                series: sample_series(),
            },
        );

        assert_eq!(cache.load(LOCATION, period()).await?, None);
        assert!(!cache.memory.lock().await.contains_key(&old_key));

        cache.memory.lock().await.insert(
            old_key.clone(),
            CachedSeries {
                fetched_at: SystemTime::now() - Duration::from_secs(7200),
                series: sample_series(),
            },
        );
        cache.store(LOCATION, period(), &sample_series()).await?;
        let memory = cache.memory.lock().await;
        assert!(!memory.contains_key(&old_key));
        assert_eq!(memory.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_removes_only_cache_files() -> Result<(), CacheError> {
        let dir = tempdir().unwrap();
        let unrelated = dir.path().join("notes.txt");
        std::fs::write(&unrelated, "keep me").unwrap();

        let cache = SeriesCache::new(dir.path(), Duration::from_secs(3600));
        cache.store(LOCATION, period(), &sample_series()).await?;
        assert_eq!(cache.clear().await?, 1);
        assert_eq!(cache.load(LOCATION, period()).await?, None);
        assert!(unrelated.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_missing_folder() -> Result<(), CacheError> {
        let dir = tempdir().unwrap();
        let cache = SeriesCache::new(&dir.path().join("absent"), Duration::from_secs(60));
        assert_eq!(cache.clear().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let key = SeriesCache::cache_key(LOCATION, period());
        std::fs::write(dir.path().join(format!("{key}.parquet")), b"not parquet").unwrap();

        let cache = SeriesCache::new(dir.path(), Duration::from_secs(3600));
        assert!(matches!(
            cache.load(LOCATION, period()).await,
            Err(CacheError::ParquetScan(..))
        ));
    }
}

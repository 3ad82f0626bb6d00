use crate::archive::chunking::split_into_chunks;
use crate::archive::error::ArchiveError;
use crate::archive::resample::daily_maximum;
use crate::archive::source::{ArchiveRequest, ArchiveSource};
use crate::config::ArchiveConfig;
use crate::types::daily_series::DailySeries;
use crate::types::period::StartEndDate;
use futures_util::stream::{self, StreamExt};
use log::{info, warn};
use tokio::task;

/// Turns archive responses into gap-filled daily maximum series.
pub struct DailySeriesBuilder<S> {
    source: S,
    config: ArchiveConfig,
}

impl<S: ArchiveSource> DailySeriesBuilder<S> {
    pub fn new(source: S, config: ArchiveConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches a long span in chunks and merges them into one series.
    ///
    /// Up to `max_concurrent_requests` chunks are in flight at once; results are merged in
    /// chunk order and the first value wins for a date delivered twice. A chunk that fails
    /// or returns no data is logged and skipped, leaving its days out of the series. The
    /// build only fails when no chunk produced data.
    pub async fn build(&self, period: StartEndDate) -> Result<DailySeries, ArchiveError> {
        let chunks = split_into_chunks(period, self.config.chunk_years);
        info!(
            "Fetching snow depth from {} to {} in {} chunk(s)",
            period.start,
            period.end,
            chunks.len()
        );

        let results: Vec<_> = stream::iter(chunks.iter().copied())
            .map(|chunk| async move { (chunk, self.fetch_chunk(chunk).await) })
            .buffered(self.config.max_concurrent_requests.max(1))
            .collect()
            .await;

        let mut series = DailySeries::new();
        let mut succeeded = 0;
        let mut last_error: Option<ArchiveError> = None;
        for (chunk, result) in results {
            match result {
                Ok(Some(daily)) => {
                    series.merge(daily);
                    succeeded += 1;
                }
                Ok(None) => {
                    warn!("No snow depth data for {} to {}", chunk.start, chunk.end);
                }
                Err(e) => {
                    warn!(
                        "Failed to fetch snow depth for {} to {}: {}",
                        chunk.start, chunk.end, e
                    );
                    last_error = Some(e);
                }
            }
        }

        if succeeded == 0 {
            return Err(ArchiveError::AllChunksFailed {
                start: period.start,
                end: period.end,
                chunks: chunks.len(),
                last_error: last_error.map(Box::new),
            });
        }
        Ok(series)
    }

    /// Fetches a span with a single archive request.
    pub async fn fetch_period(&self, period: StartEndDate) -> Result<DailySeries, ArchiveError> {
        self.fetch_chunk(period)
            .await?
            .ok_or(ArchiveError::NoData {
                start: period.start,
                end: period.end,
            })
    }

    /// One archive request, resampled to daily maxima with every day of the chunk present.
    async fn fetch_chunk(&self, chunk: StartEndDate) -> Result<Option<DailySeries>, ArchiveError> {
        let request = ArchiveRequest {
            location: self.config.location,
            timezone: self.config.timezone.clone(),
            period: chunk,
        };
        let Some(hourly) = self.source.fetch_hourly(&request).await? else {
            return Ok(None);
        };

        let mut daily = task::spawn_blocking(move || daily_maximum(&hourly)).await??;
        daily = daily.restrict(chunk);
        daily.fill_missing(chunk);
        Ok(Some(daily))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::testing::FakeArchive;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config(chunk_years: u32) -> ArchiveConfig {
        ArchiveConfig {
            chunk_years,
            ..ArchiveConfig::default()
        }
    }

    #[tokio::test]
    async fn test_build_fills_gaps_with_zero() -> Result<(), ArchiveError> {
        let archive = FakeArchive::new()
            .with_day(date(2021, 1, 2), Some(0.25))
            .with_day(date(2021, 1, 3), None);
        let builder = DailySeriesBuilder::new(archive, config(4));
        let period = StartEndDate {
            start: date(2021, 1, 1),
            end: date(2021, 1, 5),
        };

        let series = builder.build(period).await?;
        assert_eq!(series.len(), 5);
        assert_eq!(series.get(date(2021, 1, 1)), Some(0.0));
        assert_eq!(series.get(date(2021, 1, 2)), Some(25.0));
        assert_eq!(series.get(date(2021, 1, 3)), Some(0.0));
        assert_eq!(series.get(date(2021, 1, 5)), Some(0.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_build_requests_every_chunk_in_order() -> Result<(), ArchiveError> {
        let archive = FakeArchive::new().with_days(date(2015, 7, 1), 3653, Some(0.1));
        let builder = DailySeriesBuilder::new(archive, config(4));
        let period = StartEndDate {
            start: date(2015, 7, 1),
            end: date(2025, 6, 30),
        };

        let series = builder.build(period).await?;
        assert_eq!(series.len() as i64, period.num_days());
        assert_eq!(series.first_date(), Some(period.start));
        assert_eq!(series.last_date(), Some(period.end));

        let requests = builder.source().requests.lock().unwrap().clone();
        let periods: Vec<StartEndDate> = requests.iter().map(|r| r.period).collect();
        assert_eq!(periods, split_into_chunks(period, 4));
        assert!(requests.iter().all(|r| r.timezone == "Europe/Stockholm"));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_chunk_is_skipped() -> Result<(), ArchiveError> {
        let archive = FakeArchive::new()
            .with_days(date(2020, 1, 1), 60, Some(0.3))
            .failing_on(date(2020, 1, 20));
        // chunk_years = 0 gives 11-day chunks
        let builder = DailySeriesBuilder::new(archive, config(0));
        let period = StartEndDate {
            start: date(2020, 1, 1),
            end: date(2020, 1, 31),
        };

        let series = builder.build(period).await?;
        assert_eq!(builder.source().request_count(), 3);
        // Jan 12 - Jan 22 failed and stays absent
        assert_eq!(series.len(), 31 - 11);
        assert_eq!(series.get(date(2020, 1, 11)), Some(30.0));
        assert_eq!(series.get(date(2020, 1, 20)), None);
        assert_eq!(series.get(date(2020, 1, 23)), Some(30.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_all_chunks_failing_is_an_error() {
        let archive = FakeArchive::new()
            .failing_on(date(2020, 1, 5))
            .failing_on(date(2020, 1, 15));
        let builder = DailySeriesBuilder::new(archive, config(0));
        let period = StartEndDate {
            start: date(2020, 1, 1),
            end: date(2020, 1, 20),
        };

        let err = builder.build(period).await.unwrap_err();
        match err {
            ArchiveError::AllChunksFailed {
                chunks, last_error, ..
            } => {
                assert_eq!(chunks, 2);
                assert!(matches!(
                    last_error.as_deref(),
                    Some(ArchiveError::MalformedResponse(_))
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_no_data_anywhere_is_an_error() {
        let builder = DailySeriesBuilder::new(FakeArchive::new(), config(4));
        let period = StartEndDate {
            start: date(2020, 1, 1),
            end: date(2020, 1, 20),
        };
        assert!(matches!(
            builder.build(period).await,
            Err(ArchiveError::AllChunksFailed {
                last_error: None,
                ..
            })
        ));
        assert!(matches!(
            builder.fetch_period(period).await,
            Err(ArchiveError::NoData { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_period_uses_single_request() -> Result<(), ArchiveError> {
        let archive = FakeArchive::new().with_days(date(2010, 1, 1), 3000, Some(0.05));
        let builder = DailySeriesBuilder::new(archive, config(1));
        let period = StartEndDate {
            start: date(2010, 1, 1),
            end: date(2016, 12, 31),
        };
        let series = builder.fetch_period(period).await?;
        assert_eq!(builder.source().request_count(), 1);
        assert_eq!(series.len() as i64, period.num_days());
        Ok(())
    }
}

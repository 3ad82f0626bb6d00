//! In-memory archive used by the tests.

use crate::archive::error::ArchiveError;
use crate::archive::source::{ArchiveRequest, ArchiveSource, HourlySnowDepth};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Serves hourly samples from a fixed map and records every request. Requests that
/// overlap a date listed in `failing_dates` fail with a malformed-response error.
#[derive(Default)]
pub struct FakeArchive {
    samples: BTreeMap<NaiveDateTime, Option<f64>>,
    failing_dates: Vec<NaiveDate>,
    pub requests: Mutex<Vec<ArchiveRequest>>,
}

impl FakeArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds hourly samples for every hour of `date`, all at `depth_m`.
    pub fn with_day(mut self, date: NaiveDate, depth_m: Option<f64>) -> Self {
        for hour in 0..24 {
            if let Some(time) = date.and_hms_opt(hour, 0, 0) {
                self.samples.insert(time, depth_m);
            }
        }
        self
    }

    pub fn with_days(
        self,
        first: NaiveDate,
        days: u32,
        depth_m: Option<f64>,
    ) -> Self {
        first
            .iter_days()
            .take(days as usize)
            .fold(self, |archive, date| archive.with_day(date, depth_m))
    }

    pub fn failing_on(mut self, date: NaiveDate) -> Self {
        self.failing_dates.push(date);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl ArchiveSource for FakeArchive {
    async fn fetch_hourly(
        &self,
        request: &ArchiveRequest,
    ) -> Result<Option<HourlySnowDepth>, ArchiveError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let period = request.period;
        if self
            .failing_dates
            .iter()
            .any(|d| *d >= period.start && *d <= period.end)
        {
            return Err(ArchiveError::MalformedResponse(format!(
                "simulated failure for {} to {}",
                period.start, period.end
            )));
        }

        let (Some(from), Some(to)) = (
            period.start.and_hms_opt(0, 0, 0),
            period.end.and_hms_opt(23, 59, 59),
        ) else {
            return Ok(None);
        };
        let mut hourly = HourlySnowDepth::default();
        for (time, depth) in self.samples.range(from..=to) {
            hourly.time.push(*time);
            hourly.snow_depth_m.push(*depth);
        }
        if hourly.time.is_empty() {
            return Ok(None);
        }
        Ok(Some(hourly))
    }
}

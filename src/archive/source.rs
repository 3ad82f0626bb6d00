use crate::archive::error::ArchiveError;
use crate::config::LatLon;
use crate::types::period::StartEndDate;
use chrono::NaiveDateTime;
use std::future::Future;

/// A request for hourly snow depth over an inclusive date span.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRequest {
    pub location: LatLon,
    pub timezone: String,
    pub period: StartEndDate,
}

/// Hourly snow depth in meters as returned by the archive, timestamps in local time.
/// Both vectors have the same length; a `None` value is a missing sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlySnowDepth {
    pub time: Vec<NaiveDateTime>,
    pub snow_depth_m: Vec<Option<f64>>,
}

/// Upstream provider of hourly snow depth.
///
/// `Ok(None)` means the archive answered but holds no snow depth for the request.
pub trait ArchiveSource {
    fn fetch_hourly(
        &self,
        request: &ArchiveRequest,
    ) -> impl Future<Output = Result<Option<HourlySnowDepth>, ArchiveError>> + Send;
}

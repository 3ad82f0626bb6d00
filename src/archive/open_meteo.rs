//! Client for the Open-Meteo historical weather archive.

use crate::archive::error::ArchiveError;
use crate::archive::source::{ArchiveRequest, ArchiveSource, HourlySnowDepth};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;

const API_DATE_FORMAT: &str = "%Y-%m-%d";
const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Option<Vec<String>>,
    snow_depth: Option<Vec<Option<f64>>>,
}

/// Fetches hourly snow depth from the Open-Meteo archive API.
pub struct OpenMeteoSource {
    archive_url: String,
    download_client: Client,
}

impl OpenMeteoSource {
    pub fn new(archive_url: impl Into<String>) -> Self {
        Self {
            archive_url: archive_url.into(),
            download_client: Client::new(),
        }
    }
}

impl ArchiveSource for OpenMeteoSource {
    async fn fetch_hourly(
        &self,
        request: &ArchiveRequest,
    ) -> Result<Option<HourlySnowDepth>, ArchiveError> {
        let start = request.period.start.format(API_DATE_FORMAT).to_string();
        let end = request.period.end.format(API_DATE_FORMAT).to_string();
        let url = format!("{}?start_date={}&end_date={}", self.archive_url, start, end);
        info!("Downloading snow depth from {}", url);

        let response = self
            .download_client
            .get(&self.archive_url)
            .query(&[
                ("latitude", request.location.0.to_string()),
                ("longitude", request.location.1.to_string()),
                ("start_date", start),
                ("end_date", end),
                ("hourly", "snow_depth".to_string()),
                ("timezone", request.timezone.clone()),
            ])
            .send()
            .await
            .map_err(|e| ArchiveError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ArchiveError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ArchiveError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| ArchiveError::NetworkRequest(url.clone(), e))?;
        debug!("Received {} bytes from {}", body.len(), url);
        parse_archive_response(&body)
    }
}

/// Parses an archive response body.
///
/// A body without an `hourly` block, or whose `hourly` block lacks `time` or `snow_depth`,
/// is not an error: the archive simply has no data for the request.
pub(crate) fn parse_archive_response(body: &str) -> Result<Option<HourlySnowDepth>, ArchiveError> {
    let response: ArchiveResponse = serde_json::from_str(body)?;
    let Some(HourlyBlock {
        time: Some(time),
        snow_depth: Some(snow_depth_m),
    }) = response.hourly
    else {
        return Ok(None);
    };

    if time.len() != snow_depth_m.len() {
        return Err(ArchiveError::MalformedResponse(format!(
            "{} timestamps but {} snow depth values",
            time.len(),
            snow_depth_m.len()
        )));
    }

    let time = time
        .iter()
        .map(|t| {
            NaiveDateTime::parse_from_str(t, API_TIME_FORMAT)
                .map_err(|e| ArchiveError::MalformedResponse(format!("timestamp '{t}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(HourlySnowDepth { time, snow_depth_m }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LatLon, ARCHIVE_URL, DEFAULT_TIMEZONE};
    use crate::types::period::StartEndDate;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_hourly_snow_depth() {
        let body = r#"{
            "latitude": 62.99,
            "longitude": 17.08,
            "timezone": "Europe/Stockholm",
            "hourly_units": {"time": "iso8601", "snow_depth": "m"},
            "hourly": {
                "time": ["2021-01-01T00:00", "2021-01-01T01:00", "2021-01-01T02:00"],
                "snow_depth": [0.42, null, 0.44]
            }
        }"#;
        let hourly = parse_archive_response(body).unwrap().unwrap();
        assert_eq!(hourly.time.len(), 3);
        assert_eq!(
            hourly.time[1],
            NaiveDate::from_ymd_opt(2021, 1, 1)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        );
        assert_eq!(hourly.snow_depth_m, vec![Some(0.42), None, Some(0.44)]);
    }

    #[test]
    fn test_missing_fields_mean_no_data() {
        assert_eq!(parse_archive_response(r#"{"latitude": 1.0}"#).unwrap(), None);
        assert_eq!(
            parse_archive_response(r#"{"hourly": {"time": ["2021-01-01T00:00"]}}"#).unwrap(),
            None
        );
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let body = r#"{"hourly": {"time": ["2021-01-01T00:00"], "snow_depth": [0.1, 0.2]}}"#;
        assert!(matches!(
            parse_archive_response(body),
            Err(ArchiveError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_bad_timestamp_is_malformed() {
        let body = r#"{"hourly": {"time": ["yesterday"], "snow_depth": [0.1]}}"#;
        assert!(matches!(
            parse_archive_response(body),
            Err(ArchiveError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_archive_response("<html>"),
            Err(ArchiveError::JsonParse(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires network access to the Open-Meteo archive"]
    async fn test_fetch_live_archive() -> Result<(), ArchiveError> {
        let source = OpenMeteoSource::new(ARCHIVE_URL);
        let request = ArchiveRequest {
            location: LatLon(62.9977, 17.0811),
            timezone: DEFAULT_TIMEZONE.to_string(),
            period: StartEndDate {
                start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2023, 1, 7).unwrap(),
            },
        };
        let hourly = source.fetch_hourly(&request).await?.unwrap();
        assert_eq!(hourly.time.len(), 7 * 24);
        Ok(())
    }
}

use crate::types::daily_series::DailySeries;
use serde::Serialize;

/// Summary statistics of a short daily series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSummary {
    pub max_depth_cm: f64,
    /// Mean over every day of the period, snow-free days included.
    pub mean_depth_cm: f64,
    pub snow_days: usize,
}

impl DetailSummary {
    /// Returns `None` for an empty series.
    pub fn from_series(series: &DailySeries) -> Option<Self> {
        if series.is_empty() {
            return None;
        }
        let (max, sum, snow_days) =
            series
                .iter()
                .fold((f64::MIN, 0.0, 0usize), |(max, sum, snow_days), m| {
                    (
                        max.max(m.depth_cm),
                        sum + m.depth_cm,
                        snow_days + usize::from(m.is_snow_day()),
                    )
                });
        Some(Self {
            max_depth_cm: max,
            mean_depth_cm: sum / series.len() as f64,
            snow_days,
        })
    }
}

/// Daily series of a user-chosen period together with its summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub series: DailySeries,
    pub summary: DetailSummary,
}

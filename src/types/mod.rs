pub mod daily_series;
pub mod detail;
pub mod error;
pub mod period;
pub mod record_set;
pub mod season;

use chrono::NaiveDate;
use serde_json::to_string_pretty;
use snowdepth::{SnowArchive, SnowError};

#[tokio::main]
async fn main() -> Result<(), SnowError> {
    let archive = SnowArchive::builder().build().await?;

    let view = archive
        .detail()
        .start(NaiveDate::from_ymd_opt(2024, 11, 1).unwrap())
        .end(NaiveDate::from_ymd_opt(2025, 4, 30).unwrap())
        .call()
        .await?;

    println!("{}", to_string_pretty(&view.summary).unwrap());
    for day in view.series.snow_days().take(10) {
        println!("{}  {:.1} cm", day.date, day.depth_cm);
    }
    Ok(())
}

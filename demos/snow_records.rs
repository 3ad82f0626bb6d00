use snowdepth::{RecordOutcome, SnowArchive, SnowError};

#[tokio::main]
async fn main() -> Result<(), SnowError> {
    let archive = SnowArchive::builder().build().await?;

    let outcome = archive
        .records()
        .start_year(1990)
        .end_year(2025)
        .call()
        .await?;

    let records = match outcome {
        RecordOutcome::Records(records) => records,
        RecordOutcome::NoSnow => {
            println!("No snow recorded between 1990 and 2025.");
            return Ok(());
        }
    };

    println!("Highest snow depth:");
    for (rank, entry) in records.highest_max_depth.iter().enumerate() {
        println!("{:>2}. {}  {:.1} cm", rank + 1, entry.season, entry.max_depth_cm);
    }

    println!("\nEarliest first snow:");
    for entry in &records.earliest_start {
        println!("    {}  {}", entry.season, entry.day_month());
    }

    println!("\nLatest last snow:");
    for entry in &records.latest_end {
        println!("    {}  {}", entry.season, entry.day_month());
    }

    println!("\nMost snow days:");
    for entry in &records.most_snow_days {
        println!("    {}  {} days", entry.season, entry.snow_days);
    }

    println!("\nLongest streak: {}", records.longest_streak);
    println!("Total snow days: {}", records.total_snow_days);
    Ok(())
}

use crate::types::daily_series::DailySeries;
use crate::types::record_set::Streak;
use chrono::NaiveDate;

impl Streak {
    fn starting_at(date: NaiveDate) -> Self {
        Self {
            length: 1,
            start: date,
            end: date,
        }
    }

    fn continues_with(&self, date: NaiveDate) -> bool {
        self.end.succ_opt() == Some(date)
    }
}

/// Splits the snow days of a series into maximal runs of consecutive calendar days.
///
/// Runs ignore season boundaries. A missing date breaks a run just like a snow-free day.
pub fn snow_streaks(series: &DailySeries) -> Vec<Streak> {
    let mut streaks: Vec<Streak> = Vec::new();
    for day in series.snow_days() {
        match streaks.last_mut() {
            Some(run) if run.continues_with(day.date) => {
                run.end = day.date;
                run.length += 1;
            }
            _ => streaks.push(Streak::starting_at(day.date)),
        }
    }
    streaks
}

/// Longest run of snow days. Among runs of equal length the chronologically first one
/// wins. Returns `None` when the series has no snow day at all.
pub fn longest_streak(series: &DailySeries) -> Option<Streak> {
    snow_streaks(series)
        .into_iter()
        .reduce(|best, run| if run.length > best.length { run } else { best })
}

use crate::types::period::StartEndDate;
use chrono::Duration;

/// Splits a long span into consecutive, non-overlapping sub-spans of roughly
/// `chunk_years` years (`chunk_years * 365 + 10` days past each chunk start) so that no
/// single archive request grows too large. The last chunk ends exactly at `period.end`.
pub fn split_into_chunks(period: StartEndDate, chunk_years: u32) -> Vec<StartEndDate> {
    let span = Duration::days(i64::from(chunk_years) * 365 + 10);
    let mut chunks = Vec::new();
    let mut current_start = period.start;

    while current_start <= period.end {
        let chunk_end = current_start
            .checked_add_signed(span)
            .map_or(period.end, |candidate| candidate.min(period.end));
        chunks.push(StartEndDate {
            start: current_start,
            end: chunk_end,
        });
        if chunk_end == period.end {
            break;
        }
        match chunk_end.succ_opt() {
            Some(next) => current_start = next,
            None => break,
        }
    }
    chunks
}

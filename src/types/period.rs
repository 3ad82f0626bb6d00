use crate::types::season::Season;
use chrono::NaiveDate;

/// An inclusive span of calendar dates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StartEndDate {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StartEndDate {
    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Anything that can be resolved into an inclusive date span.
pub trait DatePeriod {
    fn get_date_period(self) -> Option<StartEndDate>;
}

impl DatePeriod for NaiveDate {
    fn get_date_period(self) -> Option<StartEndDate> {
        Some(StartEndDate {
            start: self,
            end: self,
        })
    }
}

impl DatePeriod for (NaiveDate, NaiveDate) {
    fn get_date_period(self) -> Option<StartEndDate> {
        Some(StartEndDate {
            start: self.0,
            end: self.1,
        })
    }
}

impl DatePeriod for Season {
    fn get_date_period(self) -> Option<StartEndDate> {
        Some(StartEndDate {
            start: self.first_day()?,
            end: self.last_day()?,
        })
    }
}

/// First and last season of a multi-season span, both included.
impl DatePeriod for (Season, Season) {
    fn get_date_period(self) -> Option<StartEndDate> {
        Some(StartEndDate {
            start: self.0.first_day()?,
            end: self.1.last_day()?,
        })
    }
}

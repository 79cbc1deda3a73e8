use chrono::NaiveDate;

use super::recurringholiday::RecurringHoliday;

#[derive(Clone, Debug)]
pub struct FixedDateHoliday {
    month: u32,
    day: u32
}

impl FixedDateHoliday {
    pub fn new(month: u32, day: u32) -> Option<FixedDateHoliday> {
        // Feb 29 is accepted and skipped in common years.
        NaiveDate::from_ymd_opt(2000, month, day)?;
        Some(FixedDateHoliday { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl RecurringHoliday for FixedDateHoliday {
    fn get_holiday(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

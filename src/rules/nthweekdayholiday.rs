use chrono::{
    NaiveDate,
    Weekday
};

use super::recurringholiday::RecurringHoliday;
use crate::groups::weekdayholidays::nth_weekday_of_month;

#[derive(Clone, Debug)]
pub struct NthWeekdayHoliday {
    month: u32,
    n: u8,
    weekday: Weekday,
}

impl NthWeekdayHoliday {
    pub fn new(month: u32, n: u8, weekday: Weekday) -> Option<NthWeekdayHoliday> {
        if !(1..=12).contains(&month) || !(1..=5).contains(&n) {
            None
        } else {
            Some(NthWeekdayHoliday { month, n, weekday })
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn n(&self) -> u8 {
        self.n
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }
}

impl RecurringHoliday for NthWeekdayHoliday {
    fn get_holiday(&self, year: i32) -> Option<NaiveDate> {
        nth_weekday_of_month(year, self.month, self.n as i32, self.weekday)
    }
}

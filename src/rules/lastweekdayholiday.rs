use chrono::{
    Datelike,
    Days,
    NaiveDate,
    Weekday
};

use super::recurringholiday::RecurringHoliday;

#[derive(Clone, Debug)]
pub struct LastWeekdayHoliday {
    month: u32,
    weekday: Weekday,
}

impl LastWeekdayHoliday {
    pub fn new(month: u32, weekday: Weekday) -> Option<LastWeekdayHoliday> {
        if !(1..=12).contains(&month) {
            None
        } else {
            Some(LastWeekdayHoliday { month, weekday })
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }
}

impl RecurringHoliday for LastWeekdayHoliday {
    fn get_holiday(&self, year: i32) -> Option<NaiveDate> {
        let first_of_next_month = if self.month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, self.month + 1, 1)?
        };

        // Going back from the 1st of the next month; a full week when it already is `weekday`.
        let days_back = (first_of_next_month.weekday().num_days_from_monday() + 7
            - self.weekday.num_days_from_monday()) % 7;
        let days_back = if days_back == 0 { 7 } else { days_back };

        first_of_next_month.checked_sub_days(Days::new(days_back as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_monday_of_may() {
        let memorial_day = LastWeekdayHoliday::new(5, Weekday::Mon).unwrap();
        assert_eq!(memorial_day.get_holiday(2023), NaiveDate::from_ymd_opt(2023, 5, 29));
        assert_eq!(memorial_day.get_holiday(2021), NaiveDate::from_ymd_opt(2021, 5, 31));
        let last_friday = LastWeekdayHoliday::new(12, Weekday::Fri).unwrap();
        assert_eq!(last_friday.get_holiday(2023), NaiveDate::from_ymd_opt(2023, 12, 29));
    }
}

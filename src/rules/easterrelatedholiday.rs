use chrono::{
    NaiveDate,
    TimeDelta
};

use super::recurringholiday::RecurringHoliday;
use crate::groups::christianholidays::{
    easter_sunday,
    EasterType
};

#[derive(Clone, Debug)]
pub struct EasterRelatedHoliday {
    easter_type: EasterType,
    shift_days: i64
}

impl EasterRelatedHoliday {
    pub fn new(easter_type: EasterType, shift_days: i64) -> EasterRelatedHoliday {
        EasterRelatedHoliday {
            easter_type,
            shift_days
        }
    }

    pub fn easter_type(&self) -> EasterType {
        self.easter_type
    }

    pub fn shift_days(&self) -> i64 {
        self.shift_days
    }
}

impl RecurringHoliday for EasterRelatedHoliday {
    fn get_holiday(&self, year: i32) -> Option<NaiveDate> {
        easter_sunday(year, self.easter_type)?.checked_add_signed(TimeDelta::days(self.shift_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn good_friday_and_whit_monday() {
        let good_friday = EasterRelatedHoliday::new(EasterType::Western, -2);
        assert_eq!(good_friday.get_holiday(2023), NaiveDate::from_ymd_opt(2023, 4, 7));
        assert!(good_friday.is_holiday(&NaiveDate::from_ymd_opt(2023, 4, 7).unwrap()));

        let whit_monday = EasterRelatedHoliday::new(EasterType::Western, 50);
        assert_eq!(whit_monday.get_holiday(2023), NaiveDate::from_ymd_opt(2023, 5, 29));
    }
}

use chrono::{
    Datelike,
    NaiveDate
};

/// A holiday that recurs every year by a fixed rule.
pub trait RecurringHoliday: Send + Sync {

    /// Nominal date in `year`, or `None` if the rule yields no date that year.
    fn get_holiday(&self, year: i32) -> Option<NaiveDate>;

    fn is_holiday(&self, d: &NaiveDate) -> bool {
        self.get_holiday(d.year()) == Some(*d)
    }
}

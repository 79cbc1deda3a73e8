use chrono::{
    Datelike,
    Days,
    NaiveDate,
    TimeDelta,
    Weekday
};

use crate::entity::yearcontext::YearContext;
use crate::time::utility::days_of_month;

/// The `n`-th `weekday` of a month; negative `n` counts from the month end,
/// so `-1` is the last one. `None` if the month has no such day.
pub fn nth_weekday_of_month(year: i32, month: u32, n: i32, weekday: Weekday) -> Option<NaiveDate> {
    match n {
        0 => None,
        n if n > 0 => NaiveDate::from_weekday_of_month_opt(year, month, weekday, u8::try_from(n).ok()?),
        n => {
            let last_of_month = NaiveDate::from_ymd_opt(year, month, days_of_month(year, month)?)?;
            let days_back = (last_of_month.weekday().num_days_from_monday() + 7
                - weekday.num_days_from_monday()) % 7;
            let last = last_of_month - Days::new(days_back as u64);
            let date = last.checked_sub_days(Days::new(7 * (n.unsigned_abs() as u64 - 1)))?;
            (date.month() == month).then_some(date)
        }
    }
}

/// The `n`-th `weekday` counted from `date` itself: `1` is `date` when it
/// already falls on `weekday`, otherwise the next one; `-1` the same backwards.
pub fn nth_weekday_from(n: i32, weekday: Weekday, date: NaiveDate) -> Option<NaiveDate> {
    let target = weekday.num_days_from_monday() as i64;
    let current = date.weekday().num_days_from_monday() as i64;
    let delta = match n {
        0 => return None,
        n if n > 0 => (n as i64 - 1) * 7 + (target - current).rem_euclid(7),
        n => (n as i64 + 1) * 7 - (current - target).rem_euclid(7)
    };
    date.checked_add_signed(TimeDelta::days(delta))
}

pub fn add_nth_weekday_of_month(ctx: &mut YearContext<'_>, name: &str, month: u32, n: i32, weekday: Weekday) -> Option<NaiveDate> {
    let date = nth_weekday_of_month(ctx.year(), month, n, weekday)?;
    ctx.add_holiday(name, date)
}

pub fn add_nth_weekday_from(ctx: &mut YearContext<'_>, name: &str, n: i32, weekday: Weekday, date: NaiveDate) -> Option<NaiveDate> {
    let date = nth_weekday_from(n, weekday, date)?;
    ctx.add_holiday(name, date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn nth_weekday_in_month() {
        assert_eq!(nth_weekday_of_month(2023, 1, 3, Weekday::Mon), Some(date(2023, 1, 16)));
        assert_eq!(nth_weekday_of_month(2023, 11, 4, Weekday::Thu), Some(date(2023, 11, 23)));
        assert_eq!(nth_weekday_of_month(2023, 5, -1, Weekday::Mon), Some(date(2023, 5, 29)));
        assert_eq!(nth_weekday_of_month(2023, 8, -2, Weekday::Thu), Some(date(2023, 8, 24)));
        assert_eq!(nth_weekday_of_month(2023, 2, 5, Weekday::Mon), None);
        assert_eq!(nth_weekday_of_month(2023, 2, 0, Weekday::Mon), None);
    }

    #[test]
    fn nth_weekday_counted_from_date() {
        // 2023-05-25 is a Thursday.
        assert_eq!(nth_weekday_from(1, Weekday::Mon, date(2023, 5, 25)), Some(date(2023, 5, 29)));
        assert_eq!(nth_weekday_from(1, Weekday::Thu, date(2023, 5, 25)), Some(date(2023, 5, 25)));
        assert_eq!(nth_weekday_from(2, Weekday::Thu, date(2023, 5, 25)), Some(date(2023, 6, 1)));
        assert_eq!(nth_weekday_from(-1, Weekday::Mon, date(2023, 5, 25)), Some(date(2023, 5, 22)));
        assert_eq!(nth_weekday_from(-1, Weekday::Thu, date(2023, 5, 25)), Some(date(2023, 5, 25)));
        assert_eq!(nth_weekday_from(0, Weekday::Thu, date(2023, 5, 25)), None);
    }
}

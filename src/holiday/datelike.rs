use chrono::{
    DateTime,
    NaiveDate,
    NaiveDateTime,
    TimeZone
};

use super::holidayerror::{
    HolidayError,
    HolidayResult
};

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y"
];

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M"
];

/// Anything a holiday collection accepts as a key.
///
/// Every key is normalized to a `NaiveDate` before it touches the underlying
/// mapping; date-times lose their time part and timestamps are read as UTC.
pub trait DateLike {
    fn to_date(&self) -> HolidayResult<NaiveDate>;
}

impl DateLike for NaiveDate {
    fn to_date(&self) -> HolidayResult<NaiveDate> {
        Ok(*self)
    }
}

impl DateLike for NaiveDateTime {
    fn to_date(&self) -> HolidayResult<NaiveDate> {
        Ok(self.date())
    }
}

impl<Tz: TimeZone> DateLike for DateTime<Tz> {
    fn to_date(&self) -> HolidayResult<NaiveDate> {
        Ok(self.date_naive())
    }
}

impl DateLike for str {
    fn to_date(&self) -> HolidayResult<NaiveDate> {
        parse_date_str(self)
    }
}

impl DateLike for String {
    fn to_date(&self) -> HolidayResult<NaiveDate> {
        parse_date_str(self)
    }
}

impl DateLike for i64 {
    fn to_date(&self) -> HolidayResult<NaiveDate> {
        DateTime::from_timestamp(*self, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| HolidayError::DateParse(self.to_string()))
    }
}

impl DateLike for f64 {
    fn to_date(&self) -> HolidayResult<NaiveDate> {
        if !self.is_finite() {
            return Err(HolidayError::DateParse(self.to_string()));
        }
        let secs = self.floor();
        let nanos = ((self - secs) * 1e9) as u32;
        DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
            .map(|dt| dt.date_naive())
            .ok_or_else(|| HolidayError::DateParse(self.to_string()))
    }
}

impl<T: DateLike + ?Sized> DateLike for &T {
    fn to_date(&self) -> HolidayResult<NaiveDate> {
        (**self).to_date()
    }
}

pub fn parse_date_str(s: &str) -> HolidayResult<NaiveDate> {
    let s = s.trim();

    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Ok(d);
        }
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }

    // Keeps the local calendar date written in the string, not its UTC date.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(HolidayError::DateParse(s.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_string_layouts() {
        assert_eq!(parse_date_str("2014-01-01").unwrap(), date(2014, 1, 1));
        assert_eq!(parse_date_str("01/03/2014").unwrap(), date(2014, 1, 3));
        assert_eq!(parse_date_str("2014/03/01").unwrap(), date(2014, 3, 1));
        assert_eq!(parse_date_str("25 December 2020").unwrap(), date(2020, 12, 25));
        assert_eq!(parse_date_str("Jul 4, 2021").unwrap(), date(2021, 7, 4));
        assert_eq!(parse_date_str(" 2014-01-01T13:45:00 ").unwrap(), date(2014, 1, 1));
        assert_eq!(parse_date_str("2014-01-01T23:30:00-05:00").unwrap(), date(2014, 1, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_date_str("abc"), Err(HolidayError::DateParse(_))));
        assert!(matches!(parse_date_str("abc123"), Err(HolidayError::DateParse(_))));
        assert!(matches!(parse_date_str("2014-13-01"), Err(HolidayError::DateParse(_))));
        assert!(f64::NAN.to_date().is_err());
    }

    #[test]
    fn timestamps_use_utc_dates() {
        assert_eq!(1388552400_i64.to_date().unwrap(), date(2014, 1, 1));
        assert_eq!(1388552400.01_f64.to_date().unwrap(), date(2014, 1, 1));
        assert_eq!(1388725201_i64.to_date().unwrap(), date(2014, 1, 3));
    }

    #[test]
    fn date_times_drop_time_of_day() {
        let dt = date(2014, 1, 1).and_hms_opt(13, 45, 0).unwrap();
        assert_eq!(dt.to_date().unwrap(), date(2014, 1, 1));
        assert_eq!(dt.and_utc().to_date().unwrap(), date(2014, 1, 1));
    }
}

use chrono::{
    Datelike,
    NaiveDate,
    TimeDelta
};
use serde::{
    Deserialize,
    Serialize
};

use crate::entity::yearcontext::YearContext;
use crate::holiday::holidayerror::HolidayResult;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum EasterType {
    #[default]
    Western,
    Orthodox
}

/// Calendar the fixed Christian feasts are counted in.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum ChristianCalendar {
    #[default]
    Gregorian,
    Julian
}

/// Easter Sunday as a Gregorian date; `None` outside 1583..=4099.
pub fn easter_sunday(year: i32, easter_type: EasterType) -> Option<NaiveDate> {
    if !(1583..=4099).contains(&year) {
        return None;
    }

    let g = year % 19;

    let p = match easter_type {
        EasterType::Orthodox => {
            let i = (19 * g + 15) % 30;
            let j = (year + year / 4 + i) % 7;
            let e = if year <= 1600 {
                10
            } else {
                10 + year / 100 - 16 - (year / 100 - 16) / 4
            };
            i - j + e
        },
        EasterType::Western => {
            let c = year / 100;
            let c_div_4 = c / 4;
            let h = (c - c_div_4 - (8 * c + 13) / 25 + 19 * g + 15) % 30;
            let h_div_28 = h / 28;
            let i = h - h_div_28 * (1 - h_div_28 * (29 / (h + 1)) * ((21 - g) / 11));
            let j = (year + year / 4 + i + 2 - c + c_div_4) % 7;
            i - j
        }
    };

    // `p` may be slightly negative for western Easter; every term below stays non-negative.
    let day = 1 + (p + 27 + (p + 6) / 40) % 31;
    let month = 3 + (p + 26) / 30;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Days the Julian calendar lags the Gregorian one in `year`.
fn julian_drift(year: i32) -> i64 {
    (year / 100 - year / 400 - 2) as i64
}

/// Gregorian date of a Julian-calendar `month`/`day` in `year`.
pub fn julian_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)?.checked_add_signed(TimeDelta::days(julian_drift(year)))
}

/// Christmas Day in `year`: Dec 25, or its Julian counterpart in early January.
pub fn christmas_day(year: i32, calendar: ChristianCalendar) -> Option<NaiveDate> {
    match calendar {
        ChristianCalendar::Gregorian => NaiveDate::from_ymd_opt(year, 12, 25),
        ChristianCalendar::Julian => {
            let drift = julian_drift(year) - 13;
            NaiveDate::from_ymd_opt(year, 1, 7)?.checked_add_signed(TimeDelta::days(drift))
        }
    }
}

/// Easter-based and fixed Christian holidays of one church tradition.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct ChristianHolidays {
    easter_type: EasterType,
    calendar: ChristianCalendar
}

impl ChristianHolidays {
    pub const WESTERN: ChristianHolidays = ChristianHolidays::new(EasterType::Western, ChristianCalendar::Gregorian);
    pub const ORTHODOX: ChristianHolidays = ChristianHolidays::new(EasterType::Orthodox, ChristianCalendar::Julian);

    pub const fn new(easter_type: EasterType, calendar: ChristianCalendar) -> ChristianHolidays {
        ChristianHolidays { easter_type, calendar }
    }

    pub fn easter_type(&self) -> EasterType {
        self.easter_type
    }

    pub fn calendar(&self) -> ChristianCalendar {
        self.calendar
    }

    pub fn easter_sunday(&self, year: i32) -> Option<NaiveDate> {
        easter_sunday(year, self.easter_type)
    }

    pub fn christmas_day(&self, year: i32) -> Option<NaiveDate> {
        christmas_day(year, self.calendar)
    }

    /// Adds `name` at `days` from Easter Sunday; nothing when Easter is undefined.
    pub fn add_easter_offset(&self, ctx: &mut YearContext<'_>, name: &str, days: i64) -> Option<NaiveDate> {
        let date = self.easter_sunday(ctx.year())?.checked_add_signed(TimeDelta::days(days))?;
        ctx.add_holiday(name, date)
    }

    pub fn add_ash_wednesday(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_easter_offset(ctx, name, -46)
    }

    pub fn add_carnival_monday(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_easter_offset(ctx, name, -48)
    }

    pub fn add_carnival_tuesday(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_easter_offset(ctx, name, -47)
    }

    pub fn add_holy_thursday(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_easter_offset(ctx, name, -3)
    }

    pub fn add_good_friday(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_easter_offset(ctx, name, -2)
    }

    pub fn add_easter_sunday(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_easter_offset(ctx, name, 0)
    }

    pub fn add_easter_monday(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_easter_offset(ctx, name, 1)
    }

    pub fn add_ascension_thursday(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_easter_offset(ctx, name, 39)
    }

    pub fn add_whit_sunday(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_easter_offset(ctx, name, 49)
    }

    pub fn add_whit_monday(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_easter_offset(ctx, name, 50)
    }

    pub fn add_corpus_christi_day(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_easter_offset(ctx, name, 60)
    }

    pub fn add_christmas_eve(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_christmas_offset(ctx, name, -1)
    }

    pub fn add_christmas_day(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_christmas_offset(ctx, name, 0)
    }

    pub fn add_christmas_day_two(&self, ctx: &mut YearContext<'_>, name: &str) -> Option<NaiveDate> {
        self.add_christmas_offset(ctx, name, 1)
    }

    fn add_christmas_offset(&self, ctx: &mut YearContext<'_>, name: &str, days: i64) -> Option<NaiveDate> {
        let date = self.christmas_day(ctx.year())?.checked_add_signed(TimeDelta::days(days))?;
        ctx.add_holiday(name, date)
    }

    pub fn add_epiphany_day(&self, ctx: &mut YearContext<'_>, name: &str) -> HolidayResult<Option<NaiveDate>> {
        self.add_feast(ctx, name, 1, 6)
    }

    pub fn add_assumption_of_mary_day(&self, ctx: &mut YearContext<'_>, name: &str) -> HolidayResult<Option<NaiveDate>> {
        self.add_feast(ctx, name, 8, 15)
    }

    pub fn add_all_saints_day(&self, ctx: &mut YearContext<'_>, name: &str) -> HolidayResult<Option<NaiveDate>> {
        self.add_feast(ctx, name, 11, 1)
    }

    pub fn add_immaculate_conception_day(&self, ctx: &mut YearContext<'_>, name: &str) -> HolidayResult<Option<NaiveDate>> {
        self.add_feast(ctx, name, 12, 8)
    }

    fn add_feast(&self, ctx: &mut YearContext<'_>, name: &str, month: u32, day: u32) -> HolidayResult<Option<NaiveDate>> {
        match self.calendar {
            ChristianCalendar::Gregorian => ctx.add_holiday_on(name, month, day),
            ChristianCalendar::Julian => {
                let Some(date) = julian_date(ctx.year(), month, day) else {
                    return Ok(None);
                };
                if date.year() != ctx.year() {
                    return Ok(None);
                }
                Ok(ctx.add_holiday(name, date))
            }
        }
    }
}

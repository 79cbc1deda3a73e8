use chrono::NaiveDate;
use serde::{
    Deserialize,
    Serialize
};

use crate::entity::yearcontext::YearContext;
use crate::holiday::holidayerror::HolidayResult;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum ChildrensDay {
    /// June 1.
    #[default]
    Jun,
    /// November 20, the UN variant.
    Nov
}

pub fn add_new_years_day(ctx: &mut YearContext<'_>, name: &str) -> HolidayResult<Option<NaiveDate>> {
    ctx.add_holiday_on(name, 1, 1)
}

pub fn add_new_years_day_two(ctx: &mut YearContext<'_>, name: &str) -> HolidayResult<Option<NaiveDate>> {
    ctx.add_holiday_on(name, 1, 2)
}

pub fn add_new_years_eve(ctx: &mut YearContext<'_>, name: &str) -> HolidayResult<Option<NaiveDate>> {
    ctx.add_holiday_on(name, 12, 31)
}

pub fn add_womens_day(ctx: &mut YearContext<'_>, name: &str) -> HolidayResult<Option<NaiveDate>> {
    ctx.add_holiday_on(name, 3, 8)
}

pub fn add_labor_day(ctx: &mut YearContext<'_>, name: &str) -> HolidayResult<Option<NaiveDate>> {
    ctx.add_holiday_on(name, 5, 1)
}

pub fn add_childrens_day(ctx: &mut YearContext<'_>, name: &str, variation: ChildrensDay) -> HolidayResult<Option<NaiveDate>> {
    match variation {
        ChildrensDay::Jun => ctx.add_holiday_on(name, 6, 1),
        ChildrensDay::Nov => ctx.add_holiday_on(name, 11, 20)
    }
}

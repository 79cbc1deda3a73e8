use chrono::TimeDelta;

use super::holidayerror::{
    HolidayError,
    HolidayResult
};

/// Step of a date-range slice, either a day count or a duration.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SliceStep {
    Days(i64),
    Delta(TimeDelta)
}

impl SliceStep {
    pub fn days(&self) -> HolidayResult<i64> {
        let days = match self {
            SliceStep::Days(n) => *n,
            SliceStep::Delta(delta) => delta.num_days()
        };
        if days == 0 {
            return Err(HolidayError::configuration("step value must not be zero"));
        }
        Ok(days)
    }
}

impl Default for SliceStep {
    fn default() -> Self {
        SliceStep::Days(1)
    }
}

impl From<i64> for SliceStep {
    fn from(days: i64) -> Self {
        SliceStep::Days(days)
    }
}

impl From<TimeDelta> for SliceStep {
    fn from(delta: TimeDelta) -> Self {
        SliceStep::Delta(delta)
    }
}

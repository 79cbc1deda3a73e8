use std::collections::HashMap;
use std::ops::{
    Add,
    AddAssign
};

use chrono::Weekday;
use serde::{
    Deserialize,
    Serialize
};

use crate::holiday::holidayerror::{
    HolidayError,
    HolidayResult
};

/// Raw offset magnitude meaning "walk to the nearest workday" instead of a fixed jump.
pub const WALKING_SENTINEL: i32 = 7;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ObservedShift {
    /// Fixed jump; never zero and never as large as the walking sentinel.
    Days(i32),
    NextWorkday,
    PreviousWorkday,
    /// The holiday is not kept at all when it falls on this weekday.
    Suppress
}

impl ObservedShift {
    /// Converts a raw table offset. Zero means "no shift" and yields `None`.
    pub fn from_offset(offset: i32) -> HolidayResult<Option<ObservedShift>> {
        match offset {
            0 => Ok(None),
            WALKING_SENTINEL => Ok(Some(ObservedShift::NextWorkday)),
            n if n == -WALKING_SENTINEL => Ok(Some(ObservedShift::PreviousWorkday)),
            n if n.abs() < WALKING_SENTINEL => Ok(Some(ObservedShift::Days(n))),
            n => Err(HolidayError::InvalidObservedRule(format!(
                "offset {} exceeds the walking sentinel {}", n, WALKING_SENTINEL
            )))
        }
    }

    /// Raw table offset, `None` for a suppressing shift.
    pub fn offset(&self) -> Option<i32> {
        match self {
            ObservedShift::Days(n) => Some(*n),
            ObservedShift::NextWorkday => Some(WALKING_SENTINEL),
            ObservedShift::PreviousWorkday => Some(-WALKING_SENTINEL),
            ObservedShift::Suppress => None
        }
    }
}

/// Weekday-indexed observance rule.
///
/// Slot `i` holds the shift applied to a holiday whose nominal date falls on
/// the `i`-th weekday counted from Monday; an empty slot leaves the date alone.
/// Serialized as a weekday -> offset map where `null` suppresses and `±7` walks.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<Weekday, Option<i32>>",
    into = "HashMap<Weekday, Option<i32>>"
)]
pub struct ObservedRule {
    rule: [Option<ObservedShift>; 7]
}

impl ObservedRule {
    pub const EMPTY: ObservedRule = ObservedRule { rule: [None; 7] };

    pub fn new() -> ObservedRule {
        ObservedRule::EMPTY
    }

    pub const fn with(mut self, weekday: Weekday, shift: ObservedShift) -> ObservedRule {
        self.rule[weekday.num_days_from_monday() as usize] = Some(shift);
        self
    }

    pub const fn days(self, weekday: Weekday, days: i32) -> ObservedRule {
        self.with(weekday, ObservedShift::Days(days))
    }

    pub fn from_offsets<I>(offsets: I) -> HolidayResult<ObservedRule>
        where I: IntoIterator<Item = (Weekday, Option<i32>)> {
        let mut rule = ObservedRule::EMPTY;
        for (weekday, offset) in offsets {
            let shift = match offset {
                Some(n) => ObservedShift::from_offset(n)?,
                None => Some(ObservedShift::Suppress)
            };
            rule.rule[weekday.num_days_from_monday() as usize] = shift;
        }
        Ok(rule)
    }

    #[inline]
    pub fn shift(&self, weekday: Weekday) -> Option<ObservedShift> {
        self.rule[weekday.num_days_from_monday() as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.rule.iter().all(|slot| slot.is_none())
    }

    /// Reconstructs the weekday -> raw offset map.
    pub fn offsets(&self) -> HashMap<Weekday, Option<i32>> {
        let mut result = HashMap::new();
        let mut weekday = Weekday::Mon;
        for _ in 0..7 {
            if let Some(shift) = self.shift(weekday) {
                result.insert(weekday, shift.offset());
            }
            weekday = weekday.succ();
        }
        result
    }
}

/// Right-biased union: slots defined by `other` win.
impl Add for ObservedRule {
    type Output = ObservedRule;

    fn add(self, other: ObservedRule) -> ObservedRule {
        let mut rule = self.rule;
        for (slot, other_slot) in rule.iter_mut().zip(other.rule.iter()) {
            if other_slot.is_some() {
                *slot = *other_slot;
            }
        }
        ObservedRule { rule }
    }
}

impl AddAssign for ObservedRule {
    fn add_assign(&mut self, other: ObservedRule) {
        *self = *self + other;
    }
}

impl TryFrom<HashMap<Weekday, Option<i32>>> for ObservedRule {
    type Error = HolidayError;

    fn try_from(offsets: HashMap<Weekday, Option<i32>>) -> Result<Self, Self::Error> {
        ObservedRule::from_offsets(offsets)
    }
}

impl From<ObservedRule> for HashMap<Weekday, Option<i32>> {
    fn from(rule: ObservedRule) -> Self {
        rule.offsets()
    }
}

use ObservedShift::{
    Days,
    NextWorkday,
    PreviousWorkday,
    Suppress
};
use Weekday::{
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun
};

// Single days.
pub const MON_TO_NEXT_TUE: ObservedRule = ObservedRule::EMPTY.with(Mon, Days(1));
pub const TUE_TO_PREV_MON: ObservedRule = ObservedRule::EMPTY.with(Tue, Days(-1));
pub const TUE_TO_NONE: ObservedRule = ObservedRule::EMPTY.with(Tue, Suppress);
pub const WED_TO_PREV_MON: ObservedRule = ObservedRule::EMPTY.with(Wed, Days(-2));
pub const WED_TO_NEXT_FRI: ObservedRule = ObservedRule::EMPTY.with(Wed, Days(2));
pub const THU_TO_NEXT_FRI: ObservedRule = ObservedRule::EMPTY.with(Thu, Days(1));
pub const FRI_TO_PREV_THU: ObservedRule = ObservedRule::EMPTY.with(Fri, Days(-1));
pub const FRI_TO_NEXT_MON: ObservedRule = ObservedRule::EMPTY.with(Fri, Days(3));
pub const FRI_TO_NEXT_WORKDAY: ObservedRule = ObservedRule::EMPTY.with(Fri, NextWorkday);
pub const SAT_TO_PREV_FRI: ObservedRule = ObservedRule::EMPTY.with(Sat, Days(-1));
pub const SAT_TO_PREV_WORKDAY: ObservedRule = ObservedRule::EMPTY.with(Sat, PreviousWorkday);
pub const SAT_TO_NEXT_MON: ObservedRule = ObservedRule::EMPTY.with(Sat, Days(2));
pub const SAT_TO_NEXT_WORKDAY: ObservedRule = ObservedRule::EMPTY.with(Sat, NextWorkday);
pub const SAT_TO_NONE: ObservedRule = ObservedRule::EMPTY.with(Sat, Suppress);
pub const SUN_TO_NEXT_MON: ObservedRule = ObservedRule::EMPTY.with(Sun, Days(1));
pub const SUN_TO_NEXT_TUE: ObservedRule = ObservedRule::EMPTY.with(Sun, Days(2));
pub const SUN_TO_NEXT_WORKDAY: ObservedRule = ObservedRule::EMPTY.with(Sun, NextWorkday);
pub const SUN_TO_NONE: ObservedRule = ObservedRule::EMPTY.with(Sun, Suppress);

// Multiple days.
pub const ALL_TO_NEAREST_MON: ObservedRule = ObservedRule::EMPTY
    .days(Tue, -1).days(Wed, -2).days(Thu, -3)
    .days(Fri, 3).days(Sat, 2).days(Sun, 1);
pub const ALL_TO_NEXT_MON: ObservedRule = ObservedRule::EMPTY
    .days(Tue, 6).days(Wed, 5).days(Thu, 4)
    .days(Fri, 3).days(Sat, 2).days(Sun, 1);
pub const WORKDAY_TO_NEAREST_MON: ObservedRule = ObservedRule::EMPTY
    .days(Tue, -1).days(Wed, -2).days(Thu, -3).days(Fri, 3);
pub const WORKDAY_TO_NEXT_WORKDAY: ObservedRule = ObservedRule::EMPTY
    .with(Mon, NextWorkday).with(Tue, NextWorkday).with(Wed, NextWorkday)
    .with(Thu, NextWorkday).with(Fri, NextWorkday);
pub const TUE_WED_TO_PREV_MON: ObservedRule = ObservedRule::EMPTY.days(Tue, -1).days(Wed, -2);
pub const THU_FRI_TO_NEXT_MON: ObservedRule = ObservedRule::EMPTY.days(Thu, 4).days(Fri, 3);
pub const FRI_SAT_TO_NEXT_WORKDAY: ObservedRule = ObservedRule::EMPTY
    .with(Fri, NextWorkday).with(Sat, NextWorkday);
pub const SAT_SUN_TO_PREV_FRI: ObservedRule = ObservedRule::EMPTY.days(Sat, -1).days(Sun, -2);
pub const SAT_SUN_TO_NEXT_MON: ObservedRule = ObservedRule::EMPTY.days(Sat, 2).days(Sun, 1);
pub const SAT_SUN_TO_NEXT_TUE: ObservedRule = ObservedRule::EMPTY.days(Sat, 3).days(Sun, 2);
pub const SAT_SUN_TO_NEXT_MON_TUE: ObservedRule = ObservedRule::EMPTY.days(Sat, 2).days(Sun, 2);
pub const SAT_SUN_TO_NEXT_WORKDAY: ObservedRule = ObservedRule::EMPTY
    .with(Sat, NextWorkday).with(Sun, NextWorkday);
pub const SAT_TO_PREV_FRI_SUN_TO_NEXT_MON: ObservedRule = ObservedRule::EMPTY
    .days(Sat, -1).days(Sun, 1);

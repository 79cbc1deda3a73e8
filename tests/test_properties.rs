//! Property tests for observed shifting and name merging.

use std::sync::Arc;

use chrono::{
    Datelike,
    NaiveDate,
    TimeDelta
};
use proptest::prelude::*;

use holidays::entity::entityconfig::EntityConfig;
use holidays::entity::ruletable::HolidayRuleTable;
use holidays::entity::yearcontext::YearContext;
use holidays::holiday::collectionoptions::CollectionOptions;
use holidays::holiday::holidaycollection::HolidayCollection;
use holidays::holiday::holidayerror::HolidayResult;
use holidays::holiday::holidaynames::HolidayNames;
use holidays::observed::observedrule::{
    ObservedRule,
    ALL_TO_NEAREST_MON,
    SAT_SUN_TO_NEXT_MON,
    SAT_SUN_TO_NEXT_WORKDAY,
    SAT_SUN_TO_PREV_FRI,
    SAT_TO_PREV_FRI_SUN_TO_NEXT_MON,
    SUN_TO_NEXT_WORKDAY
};

/// One "Anchor" holiday with an observed entry, plus `bridge_days` holidays
/// right after it.
struct AnchorTable {
    config: EntityConfig,
    month: u32,
    day: u32,
    bridge_days: i64
}

impl AnchorTable {
    fn collection(config: EntityConfig, month: u32, day: u32, bridge_days: i64, year: i32) -> HolidayCollection {
        let table = AnchorTable { config, month, day, bridge_days };
        HolidayCollection::new(Arc::new(table), CollectionOptions::new().year(year).expand(false)).unwrap()
    }
}

impl HolidayRuleTable for AnchorTable {
    fn config(&self) -> &EntityConfig {
        &self.config
    }

    fn populate_common(&self, ctx: &mut YearContext<'_>, _category: &str) -> HolidayResult<()> {
        let Some(anchor) = ctx.add_holiday_on("Anchor", self.month, self.day)? else {
            return Ok(());
        };
        for offset in 1..=self.bridge_days {
            ctx.add_holiday("Bridge", anchor + TimeDelta::days(offset));
        }
        ctx.add_observed(anchor);
        Ok(())
    }
}

fn observed_dates(holidays: &HolidayCollection) -> Vec<NaiveDate> {
    holidays.get_named("Anchor (observed)")
}

fn anchor_config(rule: ObservedRule) -> EntityConfig {
    EntityConfig::new("XX")
        .with_observed_rule(rule)
        .with_observed_label("{} (observed)")
}

fn named_rule() -> impl Strategy<Value = ObservedRule> {
    prop_oneof![
        Just(SAT_SUN_TO_NEXT_MON),
        Just(SAT_SUN_TO_PREV_FRI),
        Just(SAT_TO_PREV_FRI_SUN_TO_NEXT_MON),
        Just(ALL_TO_NEAREST_MON),
        Just(SAT_SUN_TO_NEXT_WORKDAY),
        Just(SUN_TO_NEXT_WORKDAY)
    ]
}

proptest! {
    #[test]
    fn simple_offset_lands_exactly(
        year in 1950..2100_i32,
        month in 2..=11_u32,
        day in 1..=28_u32,
        offset in prop_oneof![-6..=-1_i32, 1..=6_i32]
    ) {
        let nominal = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let rule = ObservedRule::EMPTY.days(nominal.weekday(), offset);
        let holidays = AnchorTable::collection(anchor_config(rule), month, day, 0, year);

        let expected = nominal + TimeDelta::days(offset as i64);
        prop_assert_ne!(expected, nominal);
        prop_assert_eq!(observed_dates(&holidays), vec![expected]);
        prop_assert!(holidays.contains(&nominal).unwrap());
    }

    #[test]
    fn walking_shift_finds_the_first_free_day(
        year in 1950..2100_i32,
        month in 2..=11_u32,
        day in 1..=28_u32,
        bridge_days in 0..5_i64
    ) {
        let holidays = AnchorTable::collection(anchor_config(SAT_SUN_TO_NEXT_WORKDAY), month, day, bridge_days, year);
        let nominal = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let observed = observed_dates(&holidays);

        if holidays.is_weekend(&nominal).unwrap() {
            prop_assert_eq!(observed.len(), 1);
            let shifted = observed[0];
            prop_assert!(shifted > nominal);
            prop_assert!(!holidays.is_weekend(&shifted).unwrap());
            prop_assert_eq!(holidays.get_list(&shifted).unwrap(), vec!["Anchor (observed)".to_owned()]);
            for between in nominal.iter_days().skip(1).take_while(|d| *d < shifted) {
                prop_assert!(holidays.is_weekend(&between).unwrap() || holidays.contains(&between).unwrap());
            }
        } else {
            prop_assert!(observed.is_empty());
        }
    }

    #[test]
    fn toggling_observed_restores_content(year in 1950..2100_i32, month in 1..=12_u32, day in 1..=28_u32, rule in named_rule()) {
        let mut holidays = AnchorTable::collection(anchor_config(rule), month, day, 1, year);
        let snapshot = holidays.entries();

        holidays.set_observed(false).unwrap();
        prop_assert!(observed_dates(&holidays).is_empty());

        holidays.set_observed(true).unwrap();
        prop_assert_eq!(holidays.entries(), snapshot);
    }

    #[test]
    fn names_keep_first_seen_order(indices in prop::collection::vec(0..10_usize, 1..30)) {
        let mut names = HolidayNames::new();
        let mut expected: Vec<String> = Vec::new();
        for index in indices {
            let name = format!("Holiday {}", index);
            names.add(&name);
            if !expected.contains(&name) {
                expected.push(name);
            }
        }
        prop_assert_eq!(names.names(), expected.as_slice());
        prop_assert_eq!(names.joined(), expected.join(", "));
    }
}

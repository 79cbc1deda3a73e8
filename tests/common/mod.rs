#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;

use holidays::entity::entityconfig::EntityConfig;
use holidays::entity::ruletable::HolidayRuleTable;
use holidays::entity::specialholidays::SpecialHolidayTable;
use holidays::entity::yearcontext::YearContext;
use holidays::holiday::collectionoptions::CollectionOptions;
use holidays::holiday::holidaycollection::HolidayCollection;
use holidays::holiday::holidayerror::HolidayResult;

pub type CommonHook = fn(&mut YearContext<'_>, &str) -> HolidayResult<()>;
pub type SubdivisionHook = fn(&mut YearContext<'_>, &str, &str) -> HolidayResult<()>;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Rule table whose hooks are plain functions, one per test scenario.
pub struct StubTable {
    config: EntityConfig,
    specials: Option<SpecialHolidayTable>,
    common: CommonHook,
    subdivision: Option<SubdivisionHook>
}

impl StubTable {
    pub fn new(config: EntityConfig, common: CommonHook) -> StubTable {
        StubTable {
            config,
            specials: None,
            common,
            subdivision: None
        }
    }

    pub fn with_specials(mut self, specials: SpecialHolidayTable) -> StubTable {
        self.specials = Some(specials);
        self
    }

    pub fn with_subdivision_hook(mut self, hook: SubdivisionHook) -> StubTable {
        self.subdivision = Some(hook);
        self
    }

    pub fn collection(self, options: CollectionOptions) -> HolidayCollection {
        HolidayCollection::new(Arc::new(self), options).unwrap()
    }
}

impl HolidayRuleTable for StubTable {
    fn config(&self) -> &EntityConfig {
        &self.config
    }

    fn special_holidays(&self) -> Option<&SpecialHolidayTable> {
        self.specials.as_ref()
    }

    fn populate_common(&self, ctx: &mut YearContext<'_>, category: &str) -> HolidayResult<()> {
        (self.common)(ctx, category)
    }

    fn populate_subdivision(&self, ctx: &mut YearContext<'_>, subdivision: &str, category: &str) -> HolidayResult<()> {
        match self.subdivision {
            Some(hook) => hook(ctx, subdivision, category),
            None => Ok(())
        }
    }
}

/// "New Year" on January 1st, nothing else.
pub fn new_year_only(ctx: &mut YearContext<'_>, _category: &str) -> HolidayResult<()> {
    ctx.add_holiday_on("New Year", 1, 1)?;
    Ok(())
}

/// "New Year" on January 1st with an observed entry next to it.
pub fn new_year_observed(ctx: &mut YearContext<'_>, _category: &str) -> HolidayResult<()> {
    if let Some(new_year) = ctx.add_holiday_on("New Year", 1, 1)? {
        ctx.add_observed(new_year);
    }
    Ok(())
}

/// "New Year" on January 1st, relocated to its observed date.
pub fn new_year_moved(ctx: &mut YearContext<'_>, _category: &str) -> HolidayResult<()> {
    if let Some(new_year) = ctx.add_holiday_on("New Year", 1, 1)? {
        ctx.move_holiday(new_year);
    }
    Ok(())
}

pub fn observed_config(code: &str) -> EntityConfig {
    EntityConfig::new(code).with_observed_label("{} (observed)")
}

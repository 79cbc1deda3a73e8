use std::borrow::Cow;

use super::entityconfig::EntityConfig;
use super::specialholidays::SpecialHolidayTable;
use super::yearcontext::YearContext;
use crate::holiday::holidayerror::HolidayResult;

/// Holiday-producing rules of one country or market.
///
/// The collection calls the hooks once per populated year, in the order
/// described on `YearContext::populate`; tables register dates through the
/// context and never see the collection itself.
pub trait HolidayRuleTable: Send + Sync {
    fn config(&self) -> &EntityConfig;

    fn special_holidays(&self) -> Option<&SpecialHolidayTable> {
        None
    }

    /// Entity-wide holidays of `category`.
    fn populate_common(&self, ctx: &mut YearContext<'_>, category: &str) -> HolidayResult<()>;

    /// Holidays of a normalized subdivision code (`"us_ca"`) and `category`.
    fn populate_subdivision(&self, _ctx: &mut YearContext<'_>, _subdivision: &str, _category: &str) -> HolidayResult<()> {
        Ok(())
    }

    fn translate<'t>(&self, text: &'t str, _language: &str) -> Cow<'t, str> {
        Cow::Borrowed(text)
    }
}

/// Rule table without rules, for collections filled by hand.
#[derive(Clone, Debug, Default)]
pub struct CustomHolidays {
    config: EntityConfig
}

impl CustomHolidays {
    pub fn new(config: EntityConfig) -> CustomHolidays {
        CustomHolidays { config }
    }
}

impl HolidayRuleTable for CustomHolidays {
    fn config(&self) -> &EntityConfig {
        &self.config
    }

    fn populate_common(&self, _ctx: &mut YearContext<'_>, _category: &str) -> HolidayResult<()> {
        Ok(())
    }
}

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{
    Datelike,
    Weekday
};
use serde::Deserialize;

use super::easterrelatedholiday::EasterRelatedHoliday;
use super::fixeddateholiday::FixedDateHoliday;
use super::lastweekdayholiday::LastWeekdayHoliday;
use super::nthweekdayholiday::NthWeekdayHoliday;
use super::recurringholiday::RecurringHoliday;
use crate::entity::category::PUBLIC;
use crate::entity::entityconfig::EntityConfig;
use crate::entity::ruletable::HolidayRuleTable;
use crate::entity::specialholidays::SpecialHolidayTable;
use crate::entity::yearcontext::YearContext;
use crate::groups::christianholidays::EasterType;
use crate::holiday::holidayerror::{
    parse_json_value,
    HolidayError,
    HolidayResult
};
use crate::observed::observedengine::ObservedRequest;
use crate::observed::observedrule::ObservedRule;

/// What happens to a holiday's observed date once it is recorded.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Deserialize)]
pub enum Observance {
    /// Only the nominal date is kept.
    #[default]
    None,
    /// An observed entry is added next to the nominal one.
    Add,
    /// The holiday is relocated to its observed date.
    Move,
    /// Observed entries are computed after all holidays of the category are in.
    Deferred
}

#[derive(Deserialize)]
struct EasterRelatedHolidayJsonProp {
    easter_type: EasterType,
    shift_days: i64
}

fn easter_related_holiday_from_json(json: serde_json::Value) -> HolidayResult<Arc<dyn RecurringHoliday>> {
    let json_prop: EasterRelatedHolidayJsonProp = parse_json_value(json)?;
    Ok(Arc::new(EasterRelatedHoliday::new(json_prop.easter_type, json_prop.shift_days)))
}

#[derive(Deserialize)]
struct NthWeekdayHolidayJsonProp {
    month: u32,
    n: u8,
    weekday: Weekday,
}

fn nth_weekday_from_json(json: serde_json::Value) -> HolidayResult<Arc<dyn RecurringHoliday>> {
    let json_prop: NthWeekdayHolidayJsonProp = parse_json_value(json)?;
    let holiday = NthWeekdayHoliday::new(json_prop.month, json_prop.n, json_prop.weekday).ok_or_else(|| {
        HolidayError::configuration(format!(
            "no {} {:?} in month {}", json_prop.n, json_prop.weekday, json_prop.month
        ))
    })?;
    Ok(Arc::new(holiday))
}

#[derive(Deserialize)]
struct LastWeekdayHolidayJsonProp {
    month: u32,
    weekday: Weekday,
}

fn last_weekday_from_json(json: serde_json::Value) -> HolidayResult<Arc<dyn RecurringHoliday>> {
    let json_prop: LastWeekdayHolidayJsonProp = parse_json_value(json)?;
    let holiday = LastWeekdayHoliday::new(json_prop.month, json_prop.weekday)
        .ok_or_else(|| HolidayError::configuration(format!("invalid month {}", json_prop.month)))?;
    Ok(Arc::new(holiday))
}

#[derive(Deserialize)]
struct FixedDateHolidayJsonProp {
    month: u32,
    day: u32
}

fn fixed_date_holiday_from_json(json: serde_json::Value) -> HolidayResult<Arc<dyn RecurringHoliday>> {
    let json_prop: FixedDateHolidayJsonProp = parse_json_value(json)?;
    let holiday = FixedDateHoliday::new(json_prop.month, json_prop.day).ok_or(HolidayError::InvalidDate {
        year: 2000,
        month: json_prop.month,
        day: json_prop.day
    })?;
    Ok(Arc::new(holiday))
}

#[derive(Deserialize)]
enum HolidayType {
    EasterRelated,
    FixedDate,
    NthWeekday,
    LastWeekday
}

#[derive(Deserialize)]
struct HolidayTypedObject {
    holiday_type: HolidayType
}

fn get_recurring_holiday_from_json(json: serde_json::Value) -> HolidayResult<Arc<dyn RecurringHoliday>> {
    let holiday_type_obj: HolidayTypedObject = parse_json_value(json.clone())?;
    match holiday_type_obj.holiday_type {
        HolidayType::EasterRelated => easter_related_holiday_from_json(json),
        HolidayType::FixedDate     => fixed_date_holiday_from_json(json),
        HolidayType::LastWeekday   => last_weekday_from_json(json),
        HolidayType::NthWeekday    => nth_weekday_from_json(json)
    }
}

fn default_category() -> String {
    PUBLIC.to_owned()
}

#[derive(Deserialize)]
struct HolidayDefinitionJsonProp {
    name: String,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default)]
    subdivisions: Vec<String>,
    #[serde(default)]
    since: Option<i32>,
    #[serde(default)]
    until: Option<i32>,
    #[serde(default)]
    observance: Observance,
    #[serde(default)]
    observed_rule: Option<ObservedRule>
}

struct HolidayDefinition {
    name: String,
    rule: Arc<dyn RecurringHoliday>,
    category: String,
    subdivisions: Vec<String>,
    since: Option<i32>,
    until: Option<i32>,
    observance: Observance,
    observed_rule: Option<ObservedRule>
}

impl HolidayDefinition {
    fn from_json(json: serde_json::Value) -> HolidayResult<HolidayDefinition> {
        let json_prop: HolidayDefinitionJsonProp = parse_json_value(json.clone())?;
        Ok(HolidayDefinition {
            name: json_prop.name,
            rule: get_recurring_holiday_from_json(json)?,
            category: json_prop.category.to_lowercase(),
            subdivisions: json_prop.subdivisions
                .iter()
                .map(|subdivision| EntityConfig::normalize_subdivision(subdivision))
                .collect(),
            since: json_prop.since,
            until: json_prop.until,
            observance: json_prop.observance,
            observed_rule: json_prop.observed_rule
        })
    }

    fn applies(&self, category: &str, subdivision: Option<&str>, year: i32) -> bool {
        let in_scope = match subdivision {
            Some(subdivision) => self.subdivisions.iter().any(|s| s == subdivision),
            None => self.subdivisions.is_empty()
        };
        in_scope
            && self.category == category
            && self.since.is_none_or(|since| year >= since)
            && self.until.is_none_or(|until| year <= until)
    }
}

#[derive(Deserialize)]
struct DeclarativeRuleTableJsonProp {
    config: EntityConfig,
    #[serde(default)]
    holidays: Vec<serde_json::Value>,
    #[serde(default)]
    special_holidays: Option<SpecialHolidayTable>,
    #[serde(default)]
    translations: HashMap<String, HashMap<String, String>>,
    #[serde(default)]
    observed_multiple: bool
}

/// Rule table read from JSON:
///
/// ```json
/// {
///     "config": {"code": "XX", "observed_rule": {"Sat": -1, "Sun": 1}},
///     "holidays": [
///         {"name": "New Year's Day", "holiday_type": "FixedDate", "month": 1, "day": 1, "observance": "Add"},
///         {"name": "Good Friday", "holiday_type": "EasterRelated", "easter_type": "Western", "shift_days": -2}
///     ],
///     "special_holidays": {"special_public_holidays": {"2022": [[6, 3, "Jubilee"]]}},
///     "translations": {"de": {"New Year's Day": "Neujahr"}}
/// }
/// ```
pub struct DeclarativeRuleTable {
    config: EntityConfig,
    holidays: Vec<HolidayDefinition>,
    special_holidays: Option<SpecialHolidayTable>,
    translations: HashMap<String, HashMap<String, String>>,
    observed_multiple: bool
}

impl DeclarativeRuleTable {
    pub fn from_json(json_value: serde_json::Value) -> HolidayResult<DeclarativeRuleTable> {
        let json_prop: DeclarativeRuleTableJsonProp = parse_json_value(json_value)?;
        json_prop.config.validate()?;

        let mut holidays = Vec::with_capacity(json_prop.holidays.len());
        for holiday_json in json_prop.holidays.into_iter() {
            let holiday = HolidayDefinition::from_json(holiday_json)?;
            if !json_prop.config.supported_categories().contains(&holiday.category) {
                return Err(HolidayError::UnsupportedCategory(holiday.category));
            }
            holidays.push(holiday);
        }

        Ok(DeclarativeRuleTable {
            config: json_prop.config,
            holidays,
            special_holidays: json_prop.special_holidays,
            translations: json_prop.translations
                .into_iter()
                .map(|(language, catalog)| (language.to_lowercase(), catalog))
                .collect(),
            observed_multiple: json_prop.observed_multiple
        })
    }

    pub fn from_json_str(json: &str) -> HolidayResult<DeclarativeRuleTable> {
        let json_value: serde_json::Value = serde_json::from_str(json)?;
        DeclarativeRuleTable::from_json(json_value)
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    fn populate_matching(&self, ctx: &mut YearContext<'_>, category: &str, subdivision: Option<&str>) -> HolidayResult<()> {
        let year = ctx.year();
        let mut deferred = Vec::new();

        for holiday in self.holidays.iter().filter(|h| h.applies(category, subdivision, year)) {
            let Some(date) = holiday.rule.get_holiday(year) else {
                continue;
            };
            if date.year() != year || ctx.add_holiday(&holiday.name, date).is_none() {
                continue;
            }

            let mut request = ObservedRequest::new();
            if let Some(rule) = holiday.observed_rule.as_ref() {
                request = request.rule(rule);
            }
            match holiday.observance {
                Observance::None => {},
                Observance::Add => {
                    ctx.add_observed_with(date, &request);
                },
                Observance::Move => {
                    ctx.move_holiday_with(date, &request);
                },
                Observance::Deferred => deferred.push(date)
            }
        }

        if !deferred.is_empty() {
            ctx.populate_observed(deferred, self.observed_multiple);
        }
        Ok(())
    }
}

impl HolidayRuleTable for DeclarativeRuleTable {
    fn config(&self) -> &EntityConfig {
        &self.config
    }

    fn special_holidays(&self) -> Option<&SpecialHolidayTable> {
        self.special_holidays.as_ref()
    }

    fn populate_common(&self, ctx: &mut YearContext<'_>, category: &str) -> HolidayResult<()> {
        self.populate_matching(ctx, category, None)
    }

    fn populate_subdivision(&self, ctx: &mut YearContext<'_>, subdivision: &str, category: &str) -> HolidayResult<()> {
        self.populate_matching(ctx, category, Some(subdivision))
    }

    fn translate<'t>(&self, text: &'t str, language: &str) -> Cow<'t, str> {
        match self.translations.get(language).and_then(|catalog| catalog.get(text)) {
            Some(translated) => Cow::Owned(translated.clone()),
            None => Cow::Borrowed(text)
        }
    }
}

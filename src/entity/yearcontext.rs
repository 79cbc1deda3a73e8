use std::borrow::Cow;
use std::collections::{
    BTreeMap,
    BTreeSet
};
use std::fmt::Write;

use chrono::{
    Datelike,
    NaiveDate
};
use log::debug;

use super::category::sorted_categories;
use super::entityconfig::{
    EntityConfig,
    LabelTemplate,
    WeekendMask
};
use super::ruletable::HolidayRuleTable;
use super::specialholidays::{
    special_table_name,
    SpecialHoliday
};
use crate::holiday::collectionoptions::CollectionOptions;
use crate::holiday::holidayerror::{
    HolidayError,
    HolidayResult
};
use crate::holiday::holidaynames::HolidayNames;
use crate::observed::observedengine::{
    ObservedEngine,
    ObservedRequest,
    ObservedResult
};

/// Selection a rule table is populated with, resolved and validated against
/// its `EntityConfig`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SourceSettings {
    categories: Vec<String>,
    subdivision: Option<String>,
    normalized_subdivision: Option<String>,
    language: Option<String>,
    translation: Option<String>,
    observed: bool
}

impl SourceSettings {
    pub fn resolve(table: &dyn HolidayRuleTable, options: &CollectionOptions) -> HolidayResult<SourceSettings> {
        let config = table.config();
        config.validate()?;

        let subdivision = match options.requested_subdivision() {
            Some(requested) => match config.resolve_subdivision(requested) {
                Some(code) => Some(code.to_owned()),
                None => {
                    return Err(HolidayError::UnsupportedSubdivision {
                        entity: config.code().to_owned(),
                        subdivision: requested.to_owned()
                    });
                }
            },
            None => None
        };

        let substituted = table.special_holidays().is_some_and(|specials| specials.has_substituted());
        if substituted && (config.substituted_label().is_none() || config.substituted_date_format().is_none()) {
            return Err(HolidayError::configuration(format!(
                "entity '{}' has substituted holidays but no substituted label and date format",
                config.code()
            )));
        }

        let language = options
            .requested_language()
            .map(str::to_lowercase)
            .or_else(|| config.default_language().map(str::to_owned));

        Ok(SourceSettings {
            categories: Self::resolve_categories(config, options.requested_categories())?,
            normalized_subdivision: subdivision.as_deref().map(EntityConfig::normalize_subdivision),
            subdivision,
            translation: config.effective_language(language.as_deref()),
            language,
            observed: options.is_observed()
        })
    }

    fn resolve_categories(config: &EntityConfig, requested: &BTreeSet<String>) -> HolidayResult<Vec<String>> {
        let requested: BTreeSet<String> = if requested.is_empty() {
            match config.default_category() {
                Some(category) => BTreeSet::from([category.to_owned()]),
                None => {
                    return Err(HolidayError::configuration(format!(
                        "no category requested and entity '{}' has no default category",
                        config.code()
                    )));
                }
            }
        } else {
            requested.iter().map(|category| category.to_lowercase()).collect()
        };

        if let Some(unknown) = requested.iter().find(|c| !config.supported_categories().contains(*c)) {
            return Err(HolidayError::UnsupportedCategory(unknown.clone()));
        }

        Ok(sorted_categories(&requested, config.default_category()))
    }

    pub fn set_observed(&mut self, observed: bool) {
        self.observed = observed;
    }

    pub fn set_categories(&mut self, config: &EntityConfig, categories: &BTreeSet<String>) -> HolidayResult<()> {
        self.categories = Self::resolve_categories(config, categories)?;
        Ok(())
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn subdivision(&self) -> Option<&str> {
        self.subdivision.as_deref()
    }

    pub fn normalized_subdivision(&self) -> Option<&str> {
        self.normalized_subdivision.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn observed(&self) -> bool {
        self.observed
    }
}

/// Holidays and weekend workdays produced for one year by one rule table.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct YearHolidays {
    holidays: BTreeMap<NaiveDate, HolidayNames>,
    weekend_workdays: BTreeSet<NaiveDate>
}

impl YearHolidays {
    pub fn new() -> YearHolidays {
        YearHolidays::default()
    }

    pub fn holidays(&self) -> &BTreeMap<NaiveDate, HolidayNames> {
        &self.holidays
    }

    pub fn weekend_workdays(&self) -> &BTreeSet<NaiveDate> {
        &self.weekend_workdays
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    pub fn into_parts(self) -> (BTreeMap<NaiveDate, HolidayNames>, BTreeSet<NaiveDate>) {
        (self.holidays, self.weekend_workdays)
    }
}

fn format_date(date: NaiveDate, format: &str) -> HolidayResult<String> {
    let mut formatted = String::new();
    write!(formatted, "{}", date.format(format))
        .map_err(|_| HolidayError::configuration(format!("invalid date format '{}'", format)))?;
    Ok(formatted)
}

/// What a rule table sees while one year is populated: the year, the active
/// selection and the add-holiday primitives.
pub struct YearContext<'a> {
    year: i32,
    holidays: &'a mut YearHolidays,
    settings: &'a SourceSettings,
    table: &'a dyn HolidayRuleTable,
    weekend: WeekendMask,
    engine: ObservedEngine<'a>
}

impl<'a> YearContext<'a> {
    /// Runs every hook of `table` for `year`:
    ///
    /// 1. `populate_common` for each category, default category first;
    /// 2. `special_{category}_holidays`, then `special_{category}_holidays_observed`
    ///    when observing;
    /// 3. with a subdivision selected, `populate_subdivision` and the
    ///    `special_{subdivision}_{category}_holidays[_observed]` tables.
    pub fn populate(table: &dyn HolidayRuleTable, settings: &SourceSettings, year: i32) -> HolidayResult<YearHolidays> {
        let config = table.config();
        let mut holidays = YearHolidays::new();

        let mut ctx = YearContext {
            year,
            holidays: &mut holidays,
            settings,
            table,
            weekend: config.weekend_mask(),
            engine: ObservedEngine::new(
                settings.observed(),
                config.observed_rule(),
                config.observed_since(),
                config.labels()
            )
        };
        ctx.populate_entity()?;

        debug!("populated {} holidays of '{}' for {}", holidays.len(), config.code(), year);
        Ok(holidays)
    }

    fn populate_entity(&mut self) -> HolidayResult<()> {
        let table = self.table;
        let settings = self.settings;

        for category in settings.categories() {
            table.populate_common(self, category)?;
        }
        self.add_special_holidays(None, false)?;
        if settings.observed() {
            self.add_special_holidays(None, true)?;
        }

        if let Some(subdivision) = settings.normalized_subdivision() {
            for category in settings.categories() {
                table.populate_subdivision(self, subdivision, category)?;
            }
            self.add_special_holidays(Some(subdivision), false)?;
            if settings.observed() {
                self.add_special_holidays(Some(subdivision), true)?;
            }
        }
        Ok(())
    }

    fn add_special_holidays(&mut self, subdivision: Option<&str>, observed: bool) -> HolidayResult<()> {
        let table = self.table;
        let Some(specials) = table.special_holidays() else {
            return Ok(());
        };
        let config = table.config();

        for category in self.settings.categories() {
            let table_name = special_table_name(subdivision, category, observed);
            for special in specials.holidays(&table_name, self.year) {
                match special {
                    SpecialHoliday::Holiday(month, day, name) => {
                        let label = if observed {
                            let template = LabelTemplate::new(self.tr(config.labels().observed().as_str()).into_owned());
                            template.apply(&self.tr(name))
                        } else {
                            name.clone()
                        };
                        self.add_holiday_on(&label, *month, *day)?;
                    },
                    SpecialHoliday::Substituted(to_month, to_day, from_month, from_day) => {
                        self.add_substituted(*to_month, *to_day, self.year, *from_month, *from_day)?;
                    },
                    SpecialHoliday::SubstitutedFrom(to_month, to_day, from_month, from_day, from_year) => {
                        self.add_substituted(*to_month, *to_day, *from_year, *from_month, *from_day)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn add_substituted(&mut self, to_month: u32, to_day: u32, from_year: i32, from_month: u32, from_day: u32) -> HolidayResult<()> {
        let config = self.table.config();
        let from_date = NaiveDate::from_ymd_opt(from_year, from_month, from_day).ok_or(HolidayError::InvalidDate {
            year: from_year,
            month: from_month,
            day: from_day
        })?;
        let (Some(template), Some(format)) = (config.substituted_label(), config.substituted_date_format()) else {
            return Err(HolidayError::configuration(format!(
                "entity '{}' has no substituted label and date format", config.code()
            )));
        };

        let template = LabelTemplate::new(self.tr(template.as_str()).into_owned());
        let label = template.apply(&format_date(from_date, &self.tr(format))?);
        self.add_holiday_on(&label, to_month, to_day)?;
        self.holidays.weekend_workdays.insert(from_date);
        Ok(())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn config(&self) -> &'a EntityConfig {
        self.table.config()
    }

    pub fn categories(&self) -> &'a [String] {
        self.settings.categories()
    }

    /// Subdivision code as configured, after alias resolution.
    pub fn subdivision(&self) -> Option<&'a str> {
        self.settings.subdivision()
    }

    pub fn language(&self) -> Option<&'a str> {
        self.settings.translation.as_deref()
    }

    pub fn observed(&self) -> bool {
        self.settings.observed()
    }

    pub fn engine(&self) -> ObservedEngine<'a> {
        self.engine
    }

    /// Translates `text` into the collection language, if the entity supports it.
    pub fn tr<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match self.settings.translation.as_deref() {
            Some(language) => self.table.translate(text, language),
            None => Cow::Borrowed(text)
        }
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend.is_weekend(date.weekday())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.holidays.holidays.contains_key(&date)
    }

    pub fn get_list(&self, date: NaiveDate) -> Vec<String> {
        self.holidays
            .holidays
            .get(&date)
            .map(|names| names.names().to_vec())
            .unwrap_or_default()
    }

    /// Records `name` on `date`. Dates outside the populated year are ignored
    /// and yield `None`.
    pub fn add_holiday(&mut self, name: &str, date: NaiveDate) -> Option<NaiveDate> {
        if date.year() != self.year {
            return None;
        }
        let name = self.tr(name).into_owned();
        self.holidays.holidays.entry(date).or_default().add(&name);
        Some(date)
    }

    pub fn add_holiday_on(&mut self, name: &str, month: u32, day: u32) -> HolidayResult<Option<NaiveDate>> {
        let date = NaiveDate::from_ymd_opt(self.year, month, day).ok_or(HolidayError::InvalidDate {
            year: self.year,
            month,
            day
        })?;
        Ok(self.add_holiday(name, date))
    }

    pub fn add_weekend_workday(&mut self, date: NaiveDate) {
        self.holidays.weekend_workdays.insert(date);
    }

    pub fn pop(&mut self, date: NaiveDate) -> Option<HolidayNames> {
        self.holidays.holidays.remove(&date)
    }

    /// Removes `name` from `date`; the date itself goes once no names remain.
    pub fn pop_name(&mut self, date: NaiveDate, name: &str) -> bool {
        let name = self.tr(name).into_owned();
        let Some(names) = self.holidays.holidays.get_mut(&date) else {
            return false;
        };
        let count = names.len();
        names.retain(|holiday_name| *holiday_name != name);
        let removed = names.len() != count;
        if names.is_empty() {
            self.holidays.holidays.remove(&date);
        }
        removed
    }

    pub fn add_observed(&mut self, date: NaiveDate) -> ObservedResult {
        self.add_observed_with(date, &ObservedRequest::new())
    }

    pub fn add_observed_with(&mut self, date: NaiveDate, request: &ObservedRequest<'_>) -> ObservedResult {
        let engine = self.engine;
        engine.add_observed(self, date, request)
    }

    pub fn move_holiday(&mut self, date: NaiveDate) -> ObservedResult {
        self.move_holiday_with(date, &ObservedRequest::new())
    }

    pub fn move_holiday_with(&mut self, date: NaiveDate, request: &ObservedRequest<'_>) -> ObservedResult {
        let engine = self.engine;
        engine.move_holiday(self, date, request)
    }

    pub fn populate_observed<I>(&mut self, dates: I, multiple: bool)
        where I: IntoIterator<Item = NaiveDate> {
        let engine = self.engine;
        engine.populate_observed(self, dates, multiple);
    }
}

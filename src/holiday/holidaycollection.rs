use std::cell::RefCell;
use std::collections::{
    BTreeMap,
    BTreeSet,
    HashSet
};
use std::fmt;
use std::ops::{
    Add,
    Bound,
    RangeBounds
};
use std::sync::Arc;

use chrono::{
    Datelike,
    NaiveDate,
    TimeDelta,
    Weekday
};
use log::debug;

use super::collectionoptions::CollectionOptions;
use super::datelike::DateLike;
use super::holidayerror::{
    HolidayError,
    HolidayResult
};
use super::holidaynames::{
    HolidayEntry,
    HolidayNames,
    HOLIDAY_NAME_DELIMITER
};
use super::namelookup::NameLookup;
use super::slicestep::SliceStep;
use crate::entity::entityconfig::WeekendMask;
use crate::entity::ruletable::{
    CustomHolidays,
    HolidayRuleTable
};
use crate::entity::yearcontext::{
    SourceSettings,
    YearContext,
    YearHolidays
};

/// Name given to dates added without one.
pub const DEFAULT_HOLIDAY_NAME: &str = "Holiday";

#[derive(Clone)]
struct HolidaySource {
    table: Arc<dyn HolidayRuleTable>,
    settings: SourceSettings
}

#[derive(PartialEq, Eq, Clone, Debug, Default)]
struct HolidayState {
    holidays: BTreeMap<NaiveDate, HolidayNames>,
    years: BTreeSet<i32>,
    weekend_workdays: BTreeSet<NaiveDate>
}

impl HolidayState {
    fn merge_year(&mut self, year: i32, produced: Vec<YearHolidays>) {
        for year_holidays in produced {
            let (holidays, weekend_workdays) = year_holidays.into_parts();
            for (date, names) in holidays {
                self.holidays.entry(date).or_default().merge(&names);
            }
            self.weekend_workdays.extend(weekend_workdays);
        }
        self.years.insert(year);
    }

    fn merge(&mut self, other: HolidayState) {
        for (date, names) in other.holidays {
            self.holidays.entry(date).or_default().merge(&names);
        }
        self.years.extend(other.years);
        self.weekend_workdays.extend(other.weekend_workdays);
    }
}

/// Holidays of one entity, or of a sum of entities, keyed by date.
///
/// Years are populated lazily: any accessor taking a date-like key first runs
/// `resolve_and_maybe_populate`, which evaluates the rule tables for the key's
/// year when `expand` is set and the year is not resident yet. Reads therefore
/// take `&self` and may still grow the mapping.
#[derive(Clone)]
pub struct HolidayCollection {
    sources: Vec<HolidaySource>,
    expand: bool,
    observed: bool,
    weekend: WeekendMask,
    state: RefCell<HolidayState>
}

impl HolidayCollection {
    pub fn new(table: Arc<dyn HolidayRuleTable>, options: CollectionOptions) -> HolidayResult<HolidayCollection> {
        let settings = SourceSettings::resolve(table.as_ref(), &options)?;
        let weekend = table.config().weekend_mask();
        debug!(
            "creating holiday collection for '{}' (categories: {:?}, subdivision: {:?})",
            table.config().code(),
            settings.categories(),
            settings.subdivision()
        );

        let collection = HolidayCollection {
            sources: vec![HolidaySource { table, settings }],
            expand: options.is_expand(),
            observed: options.is_observed(),
            weekend,
            state: RefCell::new(HolidayState::default())
        };
        for &year in options.requested_years() {
            collection.populate(year)?;
        }
        Ok(collection)
    }

    /// Collection without rules, filled through `insert` and `update`.
    pub fn custom(options: CollectionOptions) -> HolidayResult<HolidayCollection> {
        HolidayCollection::new(Arc::new(CustomHolidays::default()), options)
    }

    pub fn expand(&self) -> bool {
        self.expand
    }

    pub fn observed(&self) -> bool {
        self.observed
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.state.borrow().years.clone()
    }

    pub fn weekend(&self) -> HashSet<Weekday> {
        self.weekend.to_hashset()
    }

    /// Entity codes of every source, in summation order.
    pub fn codes(&self) -> Vec<String> {
        self.collect_unique(|source| Some(source.table.config().code()))
    }

    pub fn subdivisions(&self) -> Vec<String> {
        self.collect_unique(|source| source.settings.subdivision())
    }

    pub fn languages(&self) -> Vec<String> {
        self.collect_unique(|source| source.settings.language())
    }

    pub fn categories(&self) -> BTreeSet<String> {
        self.sources
            .iter()
            .flat_map(|source| source.settings.categories().iter().cloned())
            .collect()
    }

    fn collect_unique<'s, F>(&'s self, f: F) -> Vec<String>
        where F: Fn(&'s HolidaySource) -> Option<&'s str> {
        let mut values: Vec<String> = Vec::new();
        for value in self.sources.iter().filter_map(f) {
            if !values.iter().any(|v| v == value) {
                values.push(value.to_owned());
            }
        }
        values
    }

    /// Normalizes `key` to a date and, under `expand`, populates its year.
    pub fn resolve_and_maybe_populate<K>(&self, key: &K) -> HolidayResult<NaiveDate>
        where K: DateLike + ?Sized {
        let date = key.to_date()?;
        if self.expand && !self.state.borrow().years.contains(&date.year()) {
            self.populate_year(date.year())?;
        }
        Ok(date)
    }

    /// Evaluates every source for `year` unless it is already resident.
    pub fn populate(&self, year: i32) -> HolidayResult<()> {
        if self.state.borrow().years.contains(&year) {
            return Ok(());
        }
        self.populate_year(year)
    }

    /// Runs every source for `year` and merges the result; nothing is kept
    /// if any source fails.
    fn populate_year(&self, year: i32) -> HolidayResult<()> {
        let produced = self.sources
            .iter()
            .map(|source| YearContext::populate(source.table.as_ref(), &source.settings, year))
            .collect::<HolidayResult<Vec<YearHolidays>>>()?;
        self.state.borrow_mut().merge_year(year, produced);
        Ok(())
    }

    /// Re-runs every resident year from scratch. On failure the previous
    /// state is put back untouched.
    fn repopulate(&mut self) -> HolidayResult<()> {
        let previous = std::mem::take(self.state.get_mut());
        let years: Vec<i32> = previous.years.iter().copied().collect();
        for year in years {
            if let Err(error) = self.populate_year(year) {
                *self.state.get_mut() = previous;
                return Err(error);
            }
        }
        Ok(())
    }

    /// Applies new source settings and re-populates; the old settings come back
    /// if re-population fails.
    fn reconfigure<F>(&mut self, update: F) -> HolidayResult<()>
        where F: FnOnce(&mut HolidayCollection) {
        let sources = self.sources.clone();
        let observed = self.observed;
        update(self);
        if let Err(error) = self.repopulate() {
            self.sources = sources;
            self.observed = observed;
            return Err(error);
        }
        Ok(())
    }

    pub fn contains<K>(&self, key: &K) -> HolidayResult<bool>
        where K: DateLike + ?Sized {
        let date = self.resolve_and_maybe_populate(key)?;
        Ok(self.state.borrow().holidays.contains_key(&date))
    }

    /// Joined holiday names of `key`; `None` for a non-holiday or an unusable key.
    pub fn get<K>(&self, key: &K) -> Option<String>
        where K: DateLike + ?Sized {
        match self.resolve_and_maybe_populate(key) {
            Ok(date) => self.state.borrow().holidays.get(&date).map(HolidayNames::joined),
            Err(error) => {
                debug!("holiday lookup failed: {}", error);
                None
            }
        }
    }

    pub fn get_or<K>(&self, key: &K, default: &str) -> String
        where K: DateLike + ?Sized {
        self.get(key).unwrap_or_else(|| default.to_owned())
    }

    pub fn get_entry<K>(&self, key: &K) -> HolidayResult<Option<HolidayEntry>>
        where K: DateLike + ?Sized {
        let date = self.resolve_and_maybe_populate(key)?;
        Ok(self.state
            .borrow()
            .holidays
            .get(&date)
            .map(|names| HolidayEntry::new(date, names.clone())))
    }

    pub fn get_list<K>(&self, key: &K) -> HolidayResult<Vec<String>>
        where K: DateLike + ?Sized {
        let date = self.resolve_and_maybe_populate(key)?;
        Ok(self.state
            .borrow()
            .holidays
            .get(&date)
            .map(|names| names.names().to_vec())
            .unwrap_or_default())
    }

    /// Dates whose names contain `name`, ignoring case. Only resident years
    /// are searched.
    pub fn get_named(&self, name: &str) -> Vec<NaiveDate> {
        self.get_named_with(name, NameLookup::IContains, true)
    }

    /// Dates with a name matching `name` under `lookup`. With
    /// `split_multiple_names` each name of a date is matched on its own,
    /// otherwise the joined value is.
    pub fn get_named_with(&self, name: &str, lookup: NameLookup, split_multiple_names: bool) -> Vec<NaiveDate> {
        self.state
            .borrow()
            .holidays
            .iter()
            .filter(|(_, names)| {
                if split_multiple_names {
                    names.names().iter().any(|holiday_name| lookup.matches(name, holiday_name))
                } else {
                    lookup.matches(name, &names.joined())
                }
            })
            .map(|(date, _)| *date)
            .collect()
    }

    /// Adds `name` to `key`, keeping names already recorded there.
    pub fn insert<K>(&mut self, key: &K, name: &str) -> HolidayResult<()>
        where K: DateLike + ?Sized {
        let date = self.resolve_and_maybe_populate(key)?;
        let holidays = &mut self.state.get_mut().holidays;
        let names = holidays.entry(date).or_default();
        names.add(name);
        if names.is_empty() {
            holidays.remove(&date);
        }
        Ok(())
    }

    /// Merges every pair through `insert`.
    pub fn extend<I, K, S>(&mut self, holidays: I) -> HolidayResult<()>
        where I: IntoIterator<Item = (K, S)>, K: DateLike, S: AsRef<str> {
        for (key, name) in holidays {
            self.insert(&key, name.as_ref())?;
        }
        Ok(())
    }

    /// Sets the names of every date, replacing what was recorded.
    pub fn update<I, K, S>(&mut self, holidays: I) -> HolidayResult<()>
        where I: IntoIterator<Item = (K, S)>, K: DateLike, S: AsRef<str> {
        for (key, name) in holidays {
            let date = self.resolve_and_maybe_populate(&key)?;
            let names = HolidayNames::parse(name.as_ref());
            let holidays = &mut self.state.get_mut().holidays;
            if names.is_empty() {
                holidays.remove(&date);
            } else {
                holidays.insert(date, names);
            }
        }
        Ok(())
    }

    /// Marks every date as a holiday named `DEFAULT_HOLIDAY_NAME`.
    pub fn update_dates<I, K>(&mut self, dates: I) -> HolidayResult<()>
        where I: IntoIterator<Item = K>, K: DateLike {
        self.update(dates.into_iter().map(|key| (key, DEFAULT_HOLIDAY_NAME)))
    }

    /// Removes the holiday of `key`, failing with `NotFound` when there is none.
    pub fn pop<K>(&mut self, key: &K) -> HolidayResult<HolidayEntry>
        where K: DateLike + ?Sized {
        let date = self.resolve_and_maybe_populate(key)?;
        self.remove_date(date).ok_or_else(|| HolidayError::NotFound(date.to_string()))
    }

    /// Removes the holiday of `key` if there is one.
    pub fn remove<K>(&mut self, key: &K) -> HolidayResult<Option<HolidayEntry>>
        where K: DateLike + ?Sized {
        let date = self.resolve_and_maybe_populate(key)?;
        Ok(self.remove_date(date))
    }

    fn remove_date(&mut self, date: NaiveDate) -> Option<HolidayEntry> {
        self.state
            .get_mut()
            .holidays
            .remove(&date)
            .map(|names| HolidayEntry::new(date, names))
    }

    /// Removes every holiday whose name contains `name`, ignoring case, and
    /// returns the affected dates.
    ///
    /// Other holidays sharing a date survive. A `name` holding the `", "`
    /// delimiter is matched against the joined names and removes the whole date.
    pub fn pop_named(&mut self, name: &str) -> HolidayResult<Vec<NaiveDate>> {
        let use_exact_name = name.contains(HOLIDAY_NAME_DELIMITER);
        let dates = self.get_named_with(name, NameLookup::IContains, !use_exact_name);
        if dates.is_empty() {
            return Err(HolidayError::NotFound(name.to_owned()));
        }

        let name_lower = name.to_lowercase();
        let holidays = &mut self.state.get_mut().holidays;
        for date in dates.iter() {
            let Some(mut names) = holidays.remove(date) else {
                continue;
            };
            if !use_exact_name {
                names.retain(|holiday_name| !holiday_name.to_lowercase().contains(&name_lower));
                if !names.is_empty() {
                    holidays.insert(*date, names);
                }
            }
        }
        Ok(dates)
    }

    /// Holiday dates from the range start towards its end, every `step` days.
    ///
    /// Both bounds are required. The step sign follows the range direction, so
    /// `slice("2014-01-02".."2013-12-24", 1)` walks backwards.
    pub fn slice<K, R>(&self, range: R, step: impl Into<SliceStep>) -> HolidayResult<Vec<NaiveDate>>
        where K: DateLike, R: RangeBounds<K> {
        let (start, skip_start) = match range.start_bound() {
            Bound::Included(key) => (self.resolve_and_maybe_populate(key)?, false),
            Bound::Excluded(key) => (self.resolve_and_maybe_populate(key)?, true),
            Bound::Unbounded => return Err(HolidayError::configuration("both start and stop must be given"))
        };
        let (stop, include_stop) = match range.end_bound() {
            Bound::Included(key) => (self.resolve_and_maybe_populate(key)?, true),
            Bound::Excluded(key) => (self.resolve_and_maybe_populate(key)?, false),
            Bound::Unbounded => return Err(HolidayError::configuration("both start and stop must be given"))
        };

        let mut step = step.into().days()?;
        let mut span = (stop - start).num_days();
        if (span < 0 && step > 0) || (span >= 0 && step < 0) {
            step = -step;
        }
        if include_stop {
            span += if span < 0 { -1 } else { 1 };
        }

        let mut dates = Vec::new();
        let mut offset = if skip_start { step } else { 0 };
        while (step > 0 && offset < span) || (step < 0 && offset > span) {
            let Some(date) = start.checked_add_signed(TimeDelta::days(offset)) else {
                break;
            };
            if self.contains(&date)? {
                dates.push(date);
            }
            offset += step;
        }
        Ok(dates)
    }

    /// Number of resident holiday dates.
    pub fn len(&self) -> usize {
        self.state.borrow().holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().holidays.is_empty()
    }

    /// Resident holidays in date order.
    pub fn entries(&self) -> Vec<HolidayEntry> {
        self.state
            .borrow()
            .holidays
            .iter()
            .map(|(date, names)| HolidayEntry::new(*date, names.clone()))
            .collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.state.borrow().holidays.keys().copied().collect()
    }

    /// Drops every holiday and resident year; the configuration stays.
    pub fn clear(&mut self) {
        *self.state.get_mut() = HolidayState::default();
    }

    /// Switches observed-date shifting and re-populates every resident year.
    /// Holidays added by hand are lost.
    pub fn set_observed(&mut self, observed: bool) -> HolidayResult<()> {
        if self.observed == observed && self.sources.iter().all(|source| source.settings.observed() == observed) {
            return Ok(());
        }
        self.reconfigure(|collection| {
            for source in collection.sources.iter_mut() {
                source.settings.set_observed(observed);
            }
            collection.observed = observed;
        })
    }

    pub fn set_expand(&mut self, expand: bool) {
        self.expand = expand;
    }

    /// Selects other holiday categories and re-populates every resident year.
    pub fn set_categories(&mut self, categories: &[&str]) -> HolidayResult<()> {
        let requested: BTreeSet<String> = categories.iter().map(|c| c.to_string()).collect();
        let mut settings = Vec::with_capacity(self.sources.len());
        for source in self.sources.iter() {
            let mut source_settings = source.settings.clone();
            source_settings.set_categories(source.table.config(), &requested)?;
            settings.push(source_settings);
        }
        self.reconfigure(|collection| {
            for (source, source_settings) in collection.sources.iter_mut().zip(settings) {
                source.settings = source_settings;
            }
        })
    }

    pub fn is_weekend<K>(&self, key: &K) -> HolidayResult<bool>
        where K: DateLike + ?Sized {
        Ok(self.weekend.is_weekend(key.to_date()?.weekday()))
    }

    /// A working day is a weekend day declared a workday, or any other day that
    /// is not a holiday.
    pub fn is_workday<K>(&self, key: &K) -> HolidayResult<bool>
        where K: DateLike + ?Sized {
        let date = self.resolve_and_maybe_populate(key)?;
        let state = self.state.borrow();
        if self.weekend.is_weekend(date.weekday()) {
            Ok(state.weekend_workdays.contains(&date))
        } else {
            Ok(!state.holidays.contains_key(&date))
        }
    }

    /// The `n`-th working day after `key`, or before it for negative `n`.
    pub fn get_nth_workday<K>(&self, key: &K, n: i64) -> HolidayResult<NaiveDate>
        where K: DateLike + ?Sized {
        let step = TimeDelta::days(if n > 0 { 1 } else { -1 });
        let mut date = self.resolve_and_maybe_populate(key)?;
        for _ in 0..n.unsigned_abs() {
            date = Self::step_date(date, step)?;
            while !self.is_workday(&date)? {
                date = Self::step_date(date, step)?;
            }
        }
        Ok(date)
    }

    fn step_date(date: NaiveDate, step: TimeDelta) -> HolidayResult<NaiveDate> {
        date.checked_add_signed(step)
            .ok_or_else(|| HolidayError::DateParse(format!("{} out of range", date)))
    }

    /// Working days between two dates, counting the later one but not the earlier.
    pub fn get_workdays_number<K1, K2>(&self, key1: &K1, key2: &K2) -> HolidayResult<i64>
        where K1: DateLike + ?Sized, K2: DateLike + ?Sized {
        let mut from = self.resolve_and_maybe_populate(key1)?;
        let mut to = self.resolve_and_maybe_populate(key2)?;
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }

        let mut count = 0;
        for date in from.iter_days().skip(1).take_while(|date| *date <= to) {
            if self.is_workday(&date)? {
                count += 1;
            }
        }
        Ok(count)
    }
}

impl PartialEq for HolidayCollection {
    fn eq(&self, other: &HolidayCollection) -> bool {
        self.expand == other.expand
            && self.observed == other.observed
            && self.codes() == other.codes()
            && self.subdivisions() == other.subdivisions()
            && self.languages() == other.languages()
            && self.categories() == other.categories()
            && *self.state.borrow() == *other.state.borrow()
    }
}

impl fmt::Debug for HolidayCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HolidayCollection")
            .field("codes", &self.codes())
            .field("subdivisions", &self.subdivisions())
            .field("categories", &self.categories())
            .field("expand", &self.expand)
            .field("observed", &self.observed)
            .field("years", &state.years)
            .field("holidays", &state.holidays)
            .finish()
    }
}

/// Union of two collections. The sum keeps both operands' rule tables, so
/// years expanded later are evaluated for both.
///
/// Every year resident in either operand is evaluated afresh over all rule
/// tables in operand order; the operands' own entries are merged in afterwards
/// so holidays added by hand survive. Names on a shared date therefore come out
/// in the same order whichever operand had populated the year.
impl Add for HolidayCollection {
    type Output = HolidayResult<HolidayCollection>;

    fn add(self, other: HolidayCollection) -> Self::Output {
        let left = self.state.into_inner();
        let right = other.state.into_inner();
        let years: BTreeSet<i32> = left.years.union(&right.years).copied().collect();

        let mut sources = self.sources;
        sources.extend(other.sources);

        let mut sum = HolidayCollection {
            sources,
            expand: self.expand || other.expand,
            observed: self.observed || other.observed,
            weekend: WeekendMask::default(),
            state: RefCell::new(HolidayState::default())
        };
        for &year in years.iter() {
            sum.populate_year(year)?;
        }

        let state = sum.state.get_mut();
        state.merge(left);
        state.merge(right);
        Ok(sum)
    }
}

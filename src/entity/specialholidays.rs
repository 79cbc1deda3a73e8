use std::collections::{
    BTreeMap,
    HashMap
};

use serde::{
    Deserialize,
    Serialize
};

use super::category::PUBLIC;

/// One-off entry of a special table.
///
/// JSON forms: `[month, day, "name"]`, `[to_month, to_day, from_month, from_day]`
/// and `[to_month, to_day, from_month, from_day, from_year]`.
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecialHoliday {
    Holiday(u32, u32, String),
    /// A day off moved from a weekend day of the same year.
    Substituted(u32, u32, u32, u32),
    /// A day off moved from a weekend day of another year.
    SubstitutedFrom(u32, u32, u32, u32, i32)
}

impl SpecialHoliday {
    pub fn holiday(month: u32, day: u32, name: &str) -> SpecialHoliday {
        SpecialHoliday::Holiday(month, day, name.to_owned())
    }

    pub fn substituted(to_month: u32, to_day: u32, from_month: u32, from_day: u32) -> SpecialHoliday {
        SpecialHoliday::Substituted(to_month, to_day, from_month, from_day)
    }

    pub fn is_substituted(&self) -> bool {
        !matches!(self, SpecialHoliday::Holiday(..))
    }
}

/// Name of the special table read for a category, optionally scoped to a
/// normalized subdivision: `special_public_holidays`, `special_ca_bank_holidays_observed`.
pub fn special_table_name(subdivision: Option<&str>, category: &str, observed: bool) -> String {
    let suffix = if observed { "_observed" } else { "" };
    match subdivision {
        Some(subdivision) => format!("special_{}_{}_holidays{}", subdivision, category, suffix),
        None => format!("special_{}_holidays{}", category, suffix)
    }
}

/// Year-keyed one-off holidays grouped by table name.
///
/// `special_holidays` and `special_holidays_observed` are accepted as the
/// public-category tables.
#[derive(PartialEq, Eq, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecialHolidayTable {
    tables: HashMap<String, BTreeMap<i32, Vec<SpecialHoliday>>>
}

impl SpecialHolidayTable {
    pub fn new() -> SpecialHolidayTable {
        SpecialHolidayTable { tables: HashMap::new() }
    }

    pub fn with(mut self, table: &str, year: i32, holiday: SpecialHoliday) -> Self {
        self.insert(table, year, holiday);
        self
    }

    pub fn insert(&mut self, table: &str, year: i32, holiday: SpecialHoliday) {
        self.tables
            .entry(table.to_owned())
            .or_default()
            .entry(year)
            .or_default()
            .push(holiday);
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(|years| years.values().all(|entries| entries.is_empty()))
    }

    pub fn has_substituted(&self) -> bool {
        self.tables
            .values()
            .flat_map(|years| years.values())
            .flatten()
            .any(SpecialHoliday::is_substituted)
    }

    pub fn holidays(&self, table: &str, year: i32) -> &[SpecialHoliday] {
        let entries = self.tables.get(table).or_else(|| match table {
            "special_public_holidays" => self.tables.get("special_holidays"),
            "special_public_holidays_observed" => self.tables.get("special_holidays_observed"),
            _ => None
        });
        entries
            .and_then(|years| years.get(&year))
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn public_holidays(&self, year: i32) -> &[SpecialHoliday] {
        self.holidays(&special_table_name(None, PUBLIC, false), year)
    }
}

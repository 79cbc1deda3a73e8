use std::fmt;

use chrono::NaiveDate;

pub const HOLIDAY_NAME_DELIMITER: &str = ", ";

/// Names recorded for a single date, in the order they were first added.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct HolidayNames {
    names: Vec<String>
}

impl HolidayNames {
    pub fn new() -> HolidayNames {
        HolidayNames { names: Vec::new() }
    }

    /// Builds the name list from a possibly joined value, dropping empty parts
    /// and repeated names.
    pub fn parse(value: &str) -> HolidayNames {
        let mut holiday_names = HolidayNames::new();
        holiday_names.add(value);
        holiday_names
    }

    /// Appends every part of `value` that is not already present.
    ///
    /// Containment is checked both ways: a part occurring anywhere in the joined
    /// value is skipped, and so is a part that contains an existing name. Adding
    /// "Christmas" to "Christmas Day", or "Christmas Day" to "Christmas", leaves
    /// the names unchanged. Returns true if anything was appended.
    pub fn add(&mut self, value: &str) -> bool {
        let mut added = false;
        for part in value.split(HOLIDAY_NAME_DELIMITER) {
            if part.is_empty()
                || self.joined().contains(part)
                || self.names.iter().any(|name| part.contains(name.as_str())) {
                continue;
            }
            self.names.push(part.to_owned());
            added = true;
        }
        added
    }

    /// Adds every name of `other`, keeping this list's names first.
    pub fn merge(&mut self, other: &HolidayNames) {
        for name in other.names.iter() {
            self.add(name);
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn joined(&self) -> String {
        self.names.join(HOLIDAY_NAME_DELIMITER)
    }

    pub fn retain<F>(&mut self, f: F)
        where F: FnMut(&String) -> bool {
        self.names.retain(f);
    }
}

impl fmt::Display for HolidayNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

impl From<&str> for HolidayNames {
    fn from(value: &str) -> HolidayNames {
        HolidayNames::parse(value)
    }
}

/// A date together with every holiday name recorded on it.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct HolidayEntry {
    date: NaiveDate,
    names: HolidayNames
}

impl HolidayEntry {
    pub fn new(date: NaiveDate, names: HolidayNames) -> HolidayEntry {
        HolidayEntry { date, names }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn names(&self) -> &HolidayNames {
        &self.names
    }

    pub fn name(&self) -> String {
        self.names.joined()
    }
}

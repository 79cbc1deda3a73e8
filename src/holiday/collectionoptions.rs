use std::collections::BTreeSet;

use serde::{
    Deserialize,
    Serialize
};

fn default_true() -> bool {
    true
}

/// Construction options of a `HolidayCollection`.
///
/// Years listed here are populated eagerly; any other year is populated on
/// first access when `expand` is set.
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionOptions {
    years: BTreeSet<i32>,
    #[serde(default = "default_true")]
    expand: bool,
    #[serde(default = "default_true")]
    observed: bool,
    subdivision: Option<String>,
    language: Option<String>,
    categories: BTreeSet<String>
}

impl Default for CollectionOptions {
    fn default() -> Self {
        CollectionOptions {
            years: BTreeSet::new(),
            expand: true,
            observed: true,
            subdivision: None,
            language: None,
            categories: BTreeSet::new()
        }
    }
}

impl CollectionOptions {
    pub fn new() -> CollectionOptions {
        CollectionOptions::default()
    }

    pub fn years<I>(mut self, years: I) -> Self
        where I: IntoIterator<Item = i32> {
        self.years.extend(years);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.years.insert(year);
        self
    }

    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn observed(mut self, observed: bool) -> Self {
        self.observed = observed;
        self
    }

    pub fn subdivision(mut self, subdivision: &str) -> Self {
        self.subdivision = Some(subdivision.to_owned());
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        self.language = Some(language.to_owned());
        self
    }

    pub fn categories(mut self, categories: &[&str]) -> Self {
        self.categories.extend(categories.iter().map(|c| c.to_string()));
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.categories.insert(category.to_owned());
        self
    }

    pub fn requested_years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    pub fn is_expand(&self) -> bool {
        self.expand
    }

    pub fn is_observed(&self) -> bool {
        self.observed
    }

    pub fn requested_subdivision(&self) -> Option<&str> {
        self.subdivision.as_deref()
    }

    pub fn requested_language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn requested_categories(&self) -> &BTreeSet<String> {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_expand_and_observe() {
        let options: CollectionOptions = serde_json::from_str(r#"{"years": [2023]}"#).unwrap();
        assert!(options.is_expand());
        assert!(options.is_observed());
        assert_eq!(options.requested_years(), &BTreeSet::from([2023]));

        let options = CollectionOptions::new().observed(false).years(2020..2022).category("bank");
        assert!(!options.is_observed());
        assert_eq!(options.requested_years().len(), 2);
        assert!(options.requested_categories().contains("bank"));
    }
}

use std::collections::{
    BTreeMap,
    HashSet
};

use chrono::Weekday;
use serde::{
    Deserialize,
    Serialize
};

use crate::entity::category::PUBLIC;
use crate::holiday::holidayerror::{
    HolidayError,
    HolidayResult
};
use crate::observed::observedrule::ObservedRule;

const NAME_PLACEHOLDER: &str = "{}";

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum EntityKind {
    #[default]
    Country,
    Market
}

/// Label with a single `{}` placeholder for the holiday name, e.g. `"{} (observed)"`.
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelTemplate(String);

impl LabelTemplate {
    pub fn new(template: impl Into<String>) -> LabelTemplate {
        LabelTemplate(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_placeholder(&self) -> bool {
        self.0.contains(NAME_PLACEHOLDER)
    }

    pub fn apply(&self, name: &str) -> String {
        self.0.replacen(NAME_PLACEHOLDER, name, 1)
    }

    /// Template text without the placeholder and surrounding brackets:
    /// `"{} (estimated)"` gives `"estimated"`.
    pub fn bare_text(&self) -> &str {
        self.0.trim_matches(|c: char| matches!(c, '{' | '}' | '(' | ')' | ' '))
    }
}

impl Default for LabelTemplate {
    fn default() -> Self {
        LabelTemplate::new(NAME_PLACEHOLDER)
    }
}

#[derive(PartialEq, Eq, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservedLabels {
    observed: LabelTemplate,
    observed_before: Option<LabelTemplate>,
    estimated: Option<LabelTemplate>,
    observed_estimated: Option<LabelTemplate>
}

impl ObservedLabels {
    pub fn observed(&self) -> &LabelTemplate {
        &self.observed
    }

    /// Template for an observed date that lands before the nominal date;
    /// falls back to the regular observed template.
    pub fn observed_before(&self) -> &LabelTemplate {
        self.observed_before.as_ref().unwrap_or(&self.observed)
    }

    pub fn estimated(&self) -> Option<&LabelTemplate> {
        self.estimated.as_ref()
    }

    pub fn observed_estimated(&self) -> Option<&LabelTemplate> {
        self.observed_estimated.as_ref()
    }

    fn templates(&self) -> impl Iterator<Item = (&'static str, &LabelTemplate)> {
        [
            ("observed", Some(&self.observed)),
            ("observed_before", self.observed_before.as_ref()),
            ("observed_estimated", self.observed_estimated.as_ref())
        ]
        .into_iter()
        .filter_map(|(field, template)| template.map(|t| (field, t)))
    }
}

/// Weekend days as a bitmask: Mon(0), Tue(1), ..., Sun(6).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct WeekendMask(u8);

impl WeekendMask {
    pub fn new(weekends: &HashSet<Weekday>) -> Self {
        let mut mask = 0u8;
        for &weekday in weekends {
            mask |= 1u8 << weekday.num_days_from_monday();
        }
        WeekendMask(mask)
    }

    #[inline]
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        let bit = 1u8 << weekday.num_days_from_monday();
        (self.0 & bit) != 0
    }

    pub fn to_hashset(&self) -> HashSet<Weekday> {
        let mut set = HashSet::new();
        for day in 0..7u8 {
            if (self.0 & (1u8 << day)) != 0 {
                if let Ok(weekday) = Weekday::try_from(day) {
                    set.insert(weekday);
                }
            }
        }
        set
    }
}

impl Default for WeekendMask {
    fn default() -> Self {
        WeekendMask::new(&default_weekend())
    }
}

fn default_weekend() -> HashSet<Weekday> {
    HashSet::from([Weekday::Sat, Weekday::Sun])
}

fn default_supported_categories() -> Vec<String> {
    vec![PUBLIC.to_owned()]
}

fn default_category() -> Option<String> {
    Some(PUBLIC.to_owned())
}

/// Per-entity settings a rule table hands to every collection built from it.
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    code: String,
    kind: EntityKind,
    aliases: Vec<String>,
    subdivisions: Vec<String>,
    subdivision_aliases: BTreeMap<String, String>,
    supported_categories: Vec<String>,
    default_category: Option<String>,
    supported_languages: Vec<String>,
    default_language: Option<String>,
    weekend: HashSet<Weekday>,
    observed_rule: ObservedRule,
    observed_since: Option<i32>,
    labels: ObservedLabels,
    substituted_label: Option<LabelTemplate>,
    substituted_date_format: Option<String>
}

impl Default for EntityConfig {
    fn default() -> Self {
        EntityConfig {
            code: String::new(),
            kind: EntityKind::Country,
            aliases: Vec::new(),
            subdivisions: Vec::new(),
            subdivision_aliases: BTreeMap::new(),
            supported_categories: default_supported_categories(),
            default_category: default_category(),
            supported_languages: Vec::new(),
            default_language: None,
            weekend: default_weekend(),
            observed_rule: ObservedRule::EMPTY,
            observed_since: None,
            labels: ObservedLabels::default(),
            substituted_label: None,
            substituted_date_format: None
        }
    }
}

impl EntityConfig {
    pub fn new(code: impl Into<String>) -> EntityConfig {
        EntityConfig {
            code: code.into(),
            ..EntityConfig::default()
        }
    }

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_subdivisions(mut self, subdivisions: &[&str]) -> Self {
        self.subdivisions = subdivisions.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_subdivision_alias(mut self, alias: &str, subdivision: &str) -> Self {
        self.subdivision_aliases.insert(alias.to_owned(), subdivision.to_owned());
        self
    }

    pub fn with_categories(mut self, supported: &[&str], default_category: Option<&str>) -> Self {
        self.supported_categories = supported.iter().map(|c| c.to_string()).collect();
        self.default_category = default_category.map(str::to_owned);
        self
    }

    pub fn with_languages(mut self, supported: &[&str], default_language: Option<&str>) -> Self {
        self.supported_languages = supported.iter().map(|l| l.to_lowercase()).collect();
        self.default_language = default_language.map(str::to_lowercase);
        self
    }

    pub fn with_weekend(mut self, weekend: &[Weekday]) -> Self {
        self.weekend = weekend.iter().copied().collect();
        self
    }

    pub fn with_observed_rule(mut self, rule: ObservedRule) -> Self {
        self.observed_rule = rule;
        self
    }

    pub fn with_observed_since(mut self, year: i32) -> Self {
        self.observed_since = Some(year);
        self
    }

    pub fn with_observed_label(mut self, template: &str) -> Self {
        self.labels.observed = LabelTemplate::new(template);
        self
    }

    pub fn with_observed_label_before(mut self, template: &str) -> Self {
        self.labels.observed_before = Some(LabelTemplate::new(template));
        self
    }

    pub fn with_estimated_labels(mut self, estimated: &str, observed_estimated: &str) -> Self {
        self.labels.estimated = Some(LabelTemplate::new(estimated));
        self.labels.observed_estimated = Some(LabelTemplate::new(observed_estimated));
        self
    }

    pub fn with_substituted_label(mut self, template: &str, date_format: &str) -> Self {
        self.substituted_label = Some(LabelTemplate::new(template));
        self.substituted_date_format = Some(date_format.to_owned());
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn subdivisions(&self) -> &[String] {
        &self.subdivisions
    }

    pub fn subdivision_aliases(&self) -> &BTreeMap<String, String> {
        &self.subdivision_aliases
    }

    pub fn supported_categories(&self) -> &[String] {
        &self.supported_categories
    }

    pub fn default_category(&self) -> Option<&str> {
        self.default_category.as_deref()
    }

    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    pub fn default_language(&self) -> Option<&str> {
        self.default_language.as_deref()
    }

    pub fn weekend(&self) -> &HashSet<Weekday> {
        &self.weekend
    }

    pub fn weekend_mask(&self) -> WeekendMask {
        WeekendMask::new(&self.weekend)
    }

    pub fn observed_rule(&self) -> ObservedRule {
        self.observed_rule
    }

    pub fn observed_since(&self) -> Option<i32> {
        self.observed_since
    }

    pub fn labels(&self) -> &ObservedLabels {
        &self.labels
    }

    pub fn substituted_label(&self) -> Option<&LabelTemplate> {
        self.substituted_label.as_ref()
    }

    pub fn substituted_date_format(&self) -> Option<&str> {
        self.substituted_date_format.as_deref()
    }

    /// Maps an alias to its subdivision code; `None` if neither is known.
    pub fn resolve_subdivision<'a>(&'a self, subdivision: &'a str) -> Option<&'a str> {
        if self.subdivisions.iter().any(|s| s == subdivision) {
            return Some(subdivision);
        }
        self.subdivision_aliases.get(subdivision).map(|s| s.as_str())
    }

    /// Subdivision code as it appears in special-table names: `"US-CA"` becomes `"us_ca"`.
    pub fn normalize_subdivision(subdivision: &str) -> String {
        subdivision.replace(['-', ' '], "_").to_lowercase()
    }

    /// The language names get translated into, if this entity supports it.
    pub fn effective_language(&self, language: Option<&str>) -> Option<String> {
        let language = language?.to_lowercase();
        if self.supported_languages.iter().any(|l| l.to_lowercase() == language) {
            Some(language)
        } else {
            None
        }
    }

    pub fn validate(&self) -> HolidayResult<()> {
        if let Some(default) = self.default_category.as_deref() {
            if !self.supported_categories.iter().any(|c| c == default) {
                return Err(HolidayError::configuration(
                    "the default category must be listed in supported categories"
                ));
            }
        }

        for (field, template) in self.labels.templates() {
            if !template.has_placeholder() {
                return Err(HolidayError::configuration(format!(
                    "label '{}' of entity '{}' has no '{{}}' placeholder", field, self.code
                )));
            }
        }

        if let Some(template) = self.substituted_label.as_ref() {
            if !template.has_placeholder() {
                return Err(HolidayError::configuration(format!(
                    "substituted label of entity '{}' has no '{{}}' placeholder", self.code
                )));
            }
        }

        for (alias, subdivision) in self.subdivision_aliases.iter() {
            if !self.subdivisions.contains(subdivision) {
                return Err(HolidayError::configuration(format!(
                    "subdivision alias '{}' points at unknown subdivision '{}'", alias, subdivision
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_templates() {
        let label = LabelTemplate::new("{} (observed)");
        assert_eq!(label.apply("Christmas Day"), "Christmas Day (observed)");
        assert_eq!(LabelTemplate::new("{} (estimated)").bare_text(), "estimated");
        assert_eq!(LabelTemplate::default().apply("X"), "X");
        assert!(!LabelTemplate::new("observed").has_placeholder());
    }

    #[test]
    fn weekend_mask_matches_set() {
        let mask = WeekendMask::new(&HashSet::from([Weekday::Fri, Weekday::Sat]));
        assert!(mask.is_weekend(Weekday::Fri));
        assert!(!mask.is_weekend(Weekday::Sun));
        assert_eq!(mask.to_hashset(), HashSet::from([Weekday::Fri, Weekday::Sat]));
        assert!(WeekendMask::default().is_weekend(Weekday::Sun));
    }

    #[test]
    fn subdivisions_resolve_through_aliases() {
        let config = EntityConfig::new("GB")
            .with_subdivisions(&["ENG", "SCT"])
            .with_subdivision_alias("Scotland", "SCT");
        assert_eq!(config.resolve_subdivision("SCT"), Some("SCT"));
        assert_eq!(config.resolve_subdivision("Scotland"), Some("SCT"));
        assert_eq!(config.resolve_subdivision("XX"), None);
        assert_eq!(EntityConfig::normalize_subdivision("US-CA"), "us_ca");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_catches_bad_labels_and_categories() {
        let config = EntityConfig::new("XX").with_observed_label("observed");
        assert!(matches!(config.validate(), Err(HolidayError::Configuration(_))));

        let config = EntityConfig::new("XX").with_categories(&["bank"], Some("public"));
        assert!(matches!(config.validate(), Err(HolidayError::Configuration(_))));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: EntityConfig = serde_json::from_str(
            r#"{"code": "US", "observed_rule": {"Sat": -1, "Sun": 1},
                "labels": {"observed": "{} (observed)"}}"#
        ).unwrap();
        assert_eq!(config.code(), "US");
        assert_eq!(config.default_category(), Some(PUBLIC));
        assert!(config.weekend_mask().is_weekend(Weekday::Sat));
        assert_eq!(config.labels().observed_before().as_str(), "{} (observed)");
    }
}

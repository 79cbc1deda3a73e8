use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize
};

use super::holidayerror::HolidayError;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum NameLookup {
    Contains,
    Exact,
    StartsWith,
    #[default]
    IContains,
    IExact,
    IStartsWith
}

impl NameLookup {
    pub fn matches(&self, pattern: &str, name: &str) -> bool {
        match self {
            NameLookup::Contains => name.contains(pattern),
            NameLookup::Exact => name == pattern,
            NameLookup::StartsWith => name.starts_with(pattern),
            NameLookup::IContains => name.to_lowercase().contains(&pattern.to_lowercase()),
            NameLookup::IExact => name.to_lowercase() == pattern.to_lowercase(),
            NameLookup::IStartsWith => name.to_lowercase().starts_with(&pattern.to_lowercase())
        }
    }
}

impl FromStr for NameLookup {
    type Err = HolidayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contains" => Ok(NameLookup::Contains),
            "exact" => Ok(NameLookup::Exact),
            "startswith" => Ok(NameLookup::StartsWith),
            "icontains" => Ok(NameLookup::IContains),
            "iexact" => Ok(NameLookup::IExact),
            "istartswith" => Ok(NameLookup::IStartsWith),
            _ => Err(HolidayError::UnknownLookup(s.to_owned()))
        }
    }
}

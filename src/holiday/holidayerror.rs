use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HolidayError {
    #[error("cannot parse date from '{0}'")]
    DateParse(String),

    #[error("holiday not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("category is not supported: {0}")]
    UnsupportedCategory(String),

    #[error("entity '{entity}' does not have subdivision '{subdivision}'")]
    UnsupportedSubdivision {
        entity: String,
        subdivision: String
    },

    #[error("invalid observed rule: {0}")]
    InvalidObservedRule(String),

    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        year: i32,
        month: u32,
        day: u32
    },

    #[error("unknown lookup type: {0}")]
    UnknownLookup(String),

    #[error("entity '{0}' not found")]
    EntityNotFound(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error)
}

pub type HolidayResult<T> = Result<T, HolidayError>;

impl HolidayError {
    pub fn configuration(message: impl Into<String>) -> HolidayError {
        HolidayError::Configuration(message.into())
    }
}

pub fn parse_json_value<T>(json_value: serde_json::Value) -> HolidayResult<T>
    where T: for<'a> Deserialize<'a> {
    serde_json::from_value(json_value).map_err(HolidayError::Json)
}

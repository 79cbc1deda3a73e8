//! JSON-defined rule tables, the entity registry and configuration loading.

use std::sync::Arc;

use chrono::NaiveDate;

use holidays::configuration::Configuration;
use holidays::entity::entityconfig::EntityKind;
use holidays::entity::ruletable::HolidayRuleTable;
use holidays::holiday::collectionoptions::CollectionOptions;
use holidays::holiday::holidaycollection::HolidayCollection;
use holidays::holiday::holidayerror::HolidayError;
use holidays::registry::entityregistry::EntityRegistry;
use holidays::rules::declarativetable::DeclarativeRuleTable;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn data_path(file: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), file)
}

const COUNTRY: &str = r#"{
    "config": {
        "code": "XX",
        "subdivisions": ["NW", "BY"],
        "supported_categories": ["public", "bank"],
        "default_category": "public",
        "supported_languages": ["en", "de"],
        "observed_rule": {"Sat": -1, "Sun": 1},
        "labels": {"observed": "{} (observed)"}
    },
    "holidays": [
        {"name": "New Year's Day", "holiday_type": "FixedDate", "month": 1, "day": 1, "observance": "Add"},
        {"name": "Good Friday", "holiday_type": "EasterRelated", "easter_type": "Western", "shift_days": -2},
        {"name": "Memorial Day", "holiday_type": "LastWeekday", "month": 5, "weekday": "Mon", "since": 1971},
        {"name": "Labor Day", "holiday_type": "NthWeekday", "month": 9, "n": 1, "weekday": "Mon"},
        {"name": "Bank Holiday", "holiday_type": "FixedDate", "month": 8, "day": 1, "category": "Bank"},
        {"name": "Corpus Christi", "holiday_type": "EasterRelated", "easter_type": "Western", "shift_days": 60,
         "subdivisions": ["NW"]},
        {"name": "Old Harvest Day", "holiday_type": "FixedDate", "month": 10, "day": 2, "until": 1999}
    ],
    "special_holidays": {
        "special_public_holidays": {"2022": [[6, 3, "Jubilee"]]},
        "special_nw_public_holidays": {"2023": [[3, 3, "Carnival Friday"]]}
    },
    "translations": {
        "de": {"New Year's Day": "Neujahr", "Good Friday": "Karfreitag", "{} (observed)": "{} (beobachtet)"}
    }
}"#;

fn country(options: CollectionOptions) -> HolidayCollection {
    let table = DeclarativeRuleTable::from_json_str(COUNTRY).unwrap();
    HolidayCollection::new(Arc::new(table), options).unwrap()
}

// ---------------------------------------------------------------------------
// Declarative rule tables
// ---------------------------------------------------------------------------

#[test]
fn declarative_rules_for_2023() {
    let table = DeclarativeRuleTable::from_json_str(COUNTRY).unwrap();
    assert_eq!(table.len(), 7);
    assert_eq!(table.config().code(), "XX");

    let holidays = country(CollectionOptions::new().year(2023));
    assert_eq!(
        holidays.dates(),
        vec![date(2023, 1, 1), date(2023, 1, 2), date(2023, 4, 7), date(2023, 5, 29), date(2023, 9, 4)]
    );
    assert_eq!(holidays.get("2023-01-02").unwrap(), "New Year's Day (observed)");
    assert_eq!(holidays.get("2023-04-07").unwrap(), "Good Friday");
}

#[test]
fn declarative_year_filters() {
    let holidays = country(CollectionOptions::new());
    assert!(!holidays.contains("1970-05-25").unwrap());
    assert!(holidays.contains("1971-05-31").unwrap());
    assert!(holidays.contains("1999-10-02").unwrap());
    assert!(!holidays.contains("2000-10-02").unwrap());
}

#[test]
fn declarative_special_tables() {
    let holidays = country(CollectionOptions::new());
    assert_eq!(holidays.get("2022-06-03").unwrap(), "Jubilee");
    assert!(!holidays.contains("2023-03-03").unwrap());

    let nw = country(CollectionOptions::new().subdivision("NW"));
    assert_eq!(nw.get("2023-03-03").unwrap(), "Carnival Friday");
    assert_eq!(nw.get("2023-06-08").unwrap(), "Corpus Christi");

    let by = country(CollectionOptions::new().subdivision("BY"));
    assert!(!by.contains("2023-06-08").unwrap());
}

#[test]
fn declarative_categories() {
    let public = country(CollectionOptions::new());
    assert!(!public.contains("2023-08-01").unwrap());

    let bank = country(CollectionOptions::new().category("bank"));
    assert_eq!(bank.get("2023-08-01").unwrap(), "Bank Holiday");
    assert!(!bank.contains("2023-04-07").unwrap());
}

#[test]
fn declarative_translations() {
    let german = country(CollectionOptions::new().language("DE").year(2023));
    assert_eq!(german.languages(), vec!["de".to_owned()]);
    assert_eq!(german.get("2023-01-01").unwrap(), "Neujahr");
    assert_eq!(german.get("2023-01-02").unwrap(), "Neujahr (beobachtet)");
    assert_eq!(german.get("2023-04-07").unwrap(), "Karfreitag");

    let french = country(CollectionOptions::new().language("fr").year(2023));
    assert_eq!(french.get("2023-01-01").unwrap(), "New Year's Day");
}

const DEFERRED: &str = r#"{
    "config": {
        "code": "YY",
        "observed_rule": {"Sat": 7, "Sun": 7},
        "labels": {"observed": "{} (observed)"}
    },
    "holidays": [
        {"name": "Christmas Day", "holiday_type": "FixedDate", "month": 12, "day": 25, "observance": "Deferred"},
        {"name": "Boxing Day", "holiday_type": "FixedDate", "month": 12, "day": 26, "observance": "Deferred"}
    ]
}"#;

#[test]
fn deferred_observance_walks_after_all_holidays() {
    let table = DeclarativeRuleTable::from_json_str(DEFERRED).unwrap();
    let holidays = HolidayCollection::new(Arc::new(table), CollectionOptions::new()).unwrap();

    assert_eq!(holidays.get("2021-12-27").unwrap(), "Christmas Day (observed)");
    assert_eq!(holidays.get("2021-12-28").unwrap(), "Boxing Day (observed)");
    assert_eq!(holidays.get("2022-12-27").unwrap(), "Christmas Day (observed)");
    assert!(!holidays.contains("2023-12-27").unwrap());
}

#[test]
fn invalid_tables_are_rejected() {
    let unknown_category = r#"{"config": {"code": "XX"},
        "holidays": [{"name": "A", "holiday_type": "FixedDate", "month": 1, "day": 1, "category": "school"}]}"#;
    assert!(matches!(
        DeclarativeRuleTable::from_json_str(unknown_category),
        Err(HolidayError::UnsupportedCategory(c)) if c == "school"
    ));

    let bad_date = r#"{"config": {"code": "XX"},
        "holidays": [{"name": "A", "holiday_type": "FixedDate", "month": 2, "day": 30}]}"#;
    assert!(matches!(DeclarativeRuleTable::from_json_str(bad_date), Err(HolidayError::InvalidDate { .. })));

    let bad_nth = r#"{"config": {"code": "XX"},
        "holidays": [{"name": "A", "holiday_type": "NthWeekday", "month": 5, "n": 6, "weekday": "Mon"}]}"#;
    assert!(matches!(DeclarativeRuleTable::from_json_str(bad_nth), Err(HolidayError::Configuration(_))));

    let bad_type = r#"{"config": {"code": "XX"},
        "holidays": [{"name": "A", "holiday_type": "Lunar", "month": 1, "day": 1}]}"#;
    assert!(matches!(DeclarativeRuleTable::from_json_str(bad_type), Err(HolidayError::Json(_))));

    let bad_offset = r#"{"config": {"code": "XX", "observed_rule": {"Sun": 9}}}"#;
    assert!(matches!(DeclarativeRuleTable::from_json_str(bad_offset), Err(HolidayError::Json(_))));

    let bad_label = r#"{"config": {"code": "XX", "labels": {"observed": "observed"}}}"#;
    assert!(matches!(DeclarativeRuleTable::from_json_str(bad_label), Err(HolidayError::Configuration(_))));
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[test]
fn registry_lookups_by_code_and_alias() {
    let mut registry = EntityRegistry::new();
    assert!(registry.is_empty());
    registry.insert_from_json(serde_json::from_str(COUNTRY).unwrap()).unwrap();
    registry.from_reader(data_path("market.json")).unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.codes(), vec!["XLON".to_owned(), "XX".to_owned()]);
    assert!(registry.contains("xx"));
    assert_eq!(registry.get("xlon").unwrap().config().kind(), EntityKind::Market);
    assert!(matches!(registry.get("ZZ"), Err(HolidayError::EntityNotFound(_))));

    let london = HolidayCollection::new(registry.get("XLON").unwrap(), CollectionOptions::new()).unwrap();
    assert_eq!(london.get("2023-05-01").unwrap(), "Early May Bank Holiday");
    assert_eq!(london.get("2023-05-29").unwrap(), "Spring Bank Holiday");
    assert_eq!(london.get("2022-06-03").unwrap(), "Platinum Jubilee");
}

#[test]
fn registry_reports_missing_files() {
    let mut registry = EntityRegistry::new();
    assert!(matches!(registry.from_reader(data_path("missing.json")), Err(HolidayError::Io(_))));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn configuration_from_file() {
    let configuration = Configuration::from_reader(data_path("configuration.json")).unwrap();
    assert_eq!(configuration.registry().codes(), vec!["XNYS".to_owned(), "XX".to_owned()]);
    assert!(!configuration.defaults().is_observed());

    // Defaults apply when no options are given.
    let nominal = configuration.country_holidays("XX", None).unwrap();
    assert!(!nominal.observed());
    assert!(!nominal.contains("2023-01-02").unwrap());

    let observed = configuration.country_holidays("XXX", Some(CollectionOptions::new())).unwrap();
    assert_eq!(observed.get("2023-01-02").unwrap(), "New Year's Day (observed)");
}

#[test]
fn configuration_checks_entity_kind() {
    let configuration = Configuration::from_reader(data_path("configuration.json")).unwrap();
    assert!(matches!(configuration.country_holidays("NYSE", None), Err(HolidayError::EntityNotFound(_))));
    assert!(matches!(configuration.financial_holidays("XX", None), Err(HolidayError::EntityNotFound(_))));
    assert!(configuration.holidays("NYSE", None).is_ok());

    let nyse = configuration.financial_holidays("NYSE", Some(CollectionOptions::new())).unwrap();
    // Saturday New Year's Day is not observed; Sunday moves to Monday.
    assert!(!nyse.contains("2022-01-01").unwrap());
    assert!(!nyse.contains("2021-12-31").unwrap());
    assert!(!nyse.contains("2023-01-01").unwrap());
    assert_eq!(nyse.get("2023-01-02").unwrap(), "New Year's Day");
    // Independence Day follows the market-wide rule.
    assert_eq!(nyse.get("2020-07-03").unwrap(), "Independence Day");
    assert_eq!(nyse.get("2021-07-05").unwrap(), "Independence Day");
    assert!(nyse.contains("2023-04-07").unwrap());
}

#[test]
fn configuration_from_str() {
    let configuration = Configuration::from_json_str(&format!(r#"{{"entities": [{}]}}"#, COUNTRY)).unwrap();
    assert!(configuration.defaults().is_observed());
    let holidays = configuration
        .holidays("xx", Some(CollectionOptions::new().language("de")))
        .unwrap();
    assert_eq!(holidays.get("2024-01-01").unwrap(), "Neujahr");

    assert!(matches!(Configuration::from_json_str("{"), Err(HolidayError::Json(_))));
    assert!(matches!(
        Configuration::from_reader(data_path("missing.json")),
        Err(HolidayError::Io(_))
    ));
}

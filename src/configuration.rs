use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::entity::entityconfig::EntityKind;
use crate::holiday::collectionoptions::CollectionOptions;
use crate::holiday::holidaycollection::HolidayCollection;
use crate::holiday::holidayerror::{
    HolidayError,
    HolidayResult
};
use crate::registry::entityregistry::EntityRegistry;

#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    entities: Vec<serde_json::Value>,
    #[serde(default)]
    defaults: CollectionOptions
}

/// Registered entities plus the options collections are built with when the
/// caller passes none.
#[derive(Clone, Default)]
pub struct Configuration {
    registry: EntityRegistry,
    defaults: CollectionOptions
}

impl Configuration {
    pub fn new(registry: EntityRegistry, defaults: CollectionOptions) -> Configuration {
        Configuration { registry, defaults }
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn defaults(&self) -> &CollectionOptions {
        &self.defaults
    }

    pub fn from_reader<P>(file_path: P) -> HolidayResult<Configuration>
        where P: AsRef<Path> {
        let file = File::open(file_path.as_ref())?;
        debug!("loading holiday configuration from {}", file_path.as_ref().display());
        let reader = BufReader::new(file);
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader)?;
        Configuration::from_json_prop(json_prop)
    }

    pub fn from_json_str(json: &str) -> HolidayResult<Configuration> {
        let json_prop: ConfigurationJsonProp = serde_json::from_str(json)?;
        Configuration::from_json_prop(json_prop)
    }

    fn from_json_prop(json_prop: ConfigurationJsonProp) -> HolidayResult<Configuration> {
        let mut registry = EntityRegistry::new();
        registry.insert_from_json_vec(&json_prop.entities)?;
        debug!("loaded {} holiday entities", registry.len());
        Ok(Configuration::new(registry, json_prop.defaults))
    }

    /// Collection for any registered entity.
    pub fn holidays(&self, code: &str, options: Option<CollectionOptions>) -> HolidayResult<HolidayCollection> {
        let table = self.registry.get(code)?;
        HolidayCollection::new(table, options.unwrap_or_else(|| self.defaults.clone()))
    }

    pub fn country_holidays(&self, code: &str, options: Option<CollectionOptions>) -> HolidayResult<HolidayCollection> {
        self.holidays_of_kind(code, EntityKind::Country, options)
    }

    pub fn financial_holidays(&self, code: &str, options: Option<CollectionOptions>) -> HolidayResult<HolidayCollection> {
        self.holidays_of_kind(code, EntityKind::Market, options)
    }

    fn holidays_of_kind(&self, code: &str, kind: EntityKind, options: Option<CollectionOptions>) -> HolidayResult<HolidayCollection> {
        let table = self.registry.get(code)?;
        if table.config().kind() != kind {
            return Err(HolidayError::EntityNotFound(format!("{} ({:?})", code, kind)));
        }
        HolidayCollection::new(table, options.unwrap_or_else(|| self.defaults.clone()))
    }
}

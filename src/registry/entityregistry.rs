use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::entity::ruletable::HolidayRuleTable;
use crate::holiday::holidayerror::{
    parse_json_value,
    HolidayError,
    HolidayResult
};
use crate::rules::declarativetable::DeclarativeRuleTable;

/// Rule tables by entity code. Lookups also accept the aliases an entity
/// declares in its configuration; both are matched case-insensitively.
#[derive(Clone, Default)]
pub struct EntityRegistry {
    tables: HashMap<String, Arc<dyn HolidayRuleTable>>,
    aliases: HashMap<String, String>
}

impl EntityRegistry {
    pub fn new() -> EntityRegistry {
        EntityRegistry::default()
    }

    pub fn insert(&mut self, table: Arc<dyn HolidayRuleTable>) {
        let code = table.config().code().to_uppercase();
        for alias in table.config().aliases() {
            self.aliases.insert(alias.to_uppercase(), code.clone());
        }
        debug!("registered holiday entity '{}'", code);
        self.tables.insert(code, table);
    }

    pub fn get(&self, code: &str) -> HolidayResult<Arc<dyn HolidayRuleTable>> {
        let key = code.to_uppercase();
        let key = self.aliases.get(&key).unwrap_or(&key);
        self.tables
            .get(key)
            .cloned()
            .ok_or_else(|| HolidayError::EntityNotFound(code.to_owned()))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_ok()
    }

    /// Registered codes in ascending order.
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.tables.keys().cloned().collect();
        codes.sort();
        codes
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn insert_from_json(&mut self, json_value: serde_json::Value) -> HolidayResult<()> {
        let table = DeclarativeRuleTable::from_json(json_value)?;
        self.insert(Arc::new(table));
        Ok(())
    }

    pub fn insert_from_json_vec(&mut self, json_vec: &[serde_json::Value]) -> HolidayResult<()> {
        for json_value in json_vec.iter() {
            self.insert_from_json(json_value.clone())?;
        }
        Ok(())
    }

    /// Loads one entity or an array of entities from a JSON file.
    pub fn from_reader<P>(&mut self, file_path: P) -> HolidayResult<()>
        where P: AsRef<Path> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        if json_value.is_array() {
            let json_array: Vec<serde_json::Value> = parse_json_value(json_value)?;
            self.insert_from_json_vec(&json_array)
        } else {
            self.insert_from_json(json_value)
        }
    }
}

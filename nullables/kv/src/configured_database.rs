use std::collections::BTreeMap;

use crate::Database;

/// Pre-populated table contents for a nulled environment
#[derive(Clone)]
pub struct ConfiguredDatabase {
    pub dbi: Database,
    pub db_name: String,
    pub entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl ConfiguredDatabase {
    pub fn new(dbi: Database, db_name: impl Into<String>) -> Self {
        Self {
            dbi,
            db_name: db_name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.entries.insert(key.into(), value.into());
    }
}

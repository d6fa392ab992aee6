use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::errors::BudgetError;

use super::{KeyValueStore, Result};

/// In-memory store used by embedded hosts and tests. Contents vanish with
/// the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn has(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BudgetError::StorageError("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BudgetError::StorageError("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.clone());
        Ok(())
    }
}

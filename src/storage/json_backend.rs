use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::utils::{ensure_dir, write_atomic, PathResolver};

use super::{KeyValueStore, Result};

const DOCUMENT_EXTENSION: &str = "json";

/// File-backed store writing one JSON document per key under a root
/// directory. Writes go through a temp file and a rename, so a crashed or
/// failed write never clobbers the previous document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `root`, or under the application data
    /// directory when `None`.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(|| PathResolver::data_dir_in(&PathResolver::base_dir()));
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn document_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), DOCUMENT_EXTENSION))
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }
}

impl KeyValueStore for JsonFileStore {
    fn has(&self, key: &str) -> bool {
        self.document_path(key).exists()
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.document_path(key);
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(&path, json)?;
        debug!(key, path = %path.display(), "document persisted");
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "document".into()
    } else {
        sanitized
    }
}

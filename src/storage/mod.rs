pub mod json_backend;
pub mod memory;

use serde_json::Value;

use crate::errors::BudgetError;

pub type Result<T> = std::result::Result<T, BudgetError>;

/// Keys under which the ledger state is persisted.
pub mod keys {
    pub const TRANSACTIONS: &str = "transactions";
    pub const CATEGORIES: &str = "categories";
    pub const SETTINGS: &str = "settings";
}

/// Abstraction over persistence backends holding one JSON document per key.
/// The ledger is agnostic of whether documents live in memory, on disk, or
/// behind a remote service.
pub trait KeyValueStore: Send + Sync {
    fn has(&self, key: &str) -> bool;
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: &Value) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

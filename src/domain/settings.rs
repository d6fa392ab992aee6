use serde::{Deserialize, Serialize};

/// Display settings persisted alongside the ledger collections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub currency: String,
}

impl Settings {
    pub fn with_currency(code: impl Into<String>) -> Self {
        Self {
            currency: code.into(),
        }
    }
}

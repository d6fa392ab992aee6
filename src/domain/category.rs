use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::common::NamedEntity;

/// Categorises ledger activity for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub kind: CategoryKind,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Seed set installed into every freshly created ledger. The set only
    /// grows afterwards; nothing removes entries automatically.
    pub fn default_set() -> Vec<Category> {
        let expenses = [
            "Food",
            "Housing",
            "Transportation",
            "Utilities",
            "Entertainment",
            "Other",
        ];
        let income = ["Salary", "Bonus", "Side Income", "Other Income"];
        expenses
            .iter()
            .map(|name| Category::new(*name, CategoryKind::Expense))
            .chain(income.iter().map(|name| Category::new(*name, CategoryKind::Income)))
            .collect()
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Supported category namespaces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
        };
        f.write_str(label)
    }
}

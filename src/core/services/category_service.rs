use crate::domain::{Category, CategoryKind, Ledger};
use crate::errors::{BudgetError, Result};

/// Provides validated helpers for the ledger's category set.
pub struct CategoryService;

impl CategoryService {
    /// Appends a category after name validation. Duplicate detection is an
    /// exact string match; the stored set is unchanged on rejection.
    pub fn add(ledger: &mut Ledger, name: &str, kind: CategoryKind) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BudgetError::InvalidName("category name is required".into()));
        }
        if ledger.categories.iter().any(|category| category.name == name) {
            return Err(BudgetError::CategoryExists(name.to_string()));
        }
        let category = Category::new(name, kind);
        ledger.add_category(category.clone());
        Ok(category)
    }

    /// Returns a snapshot of the category set in insertion order.
    pub fn list(ledger: &Ledger) -> Vec<&Category> {
        ledger.categories.iter().collect()
    }
}

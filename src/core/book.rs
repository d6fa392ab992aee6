//! Aggregate-root facade coordinating ledger state, settings, and the
//! persistence collaborator.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::core::services::{
    CategoryService, CategoryTotal, SummaryService, TransactionService,
};
use crate::domain::{
    Category, CategoryKind, Ledger, MonthKey, Settings, Transaction, TransactionDraft,
    TransactionFilter,
};
use crate::errors::{BudgetError, Result};
use crate::storage::{keys, KeyValueStore};

/// Balance totals augmented with the display currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub income_total: f64,
    pub expense_total: f64,
    pub balance: f64,
    pub currency: String,
}

/// Monthly totals plus the expense breakdown, as one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: MonthKey,
    #[serde(flatten)]
    pub report: BalanceReport,
    pub categories: Vec<CategoryTotal>,
}

/// Owns the in-memory ledger and pushes every mutation through the store
/// before reporting success. Methods take `&mut self`; a host wanting
/// concurrent access wraps the book in its own lock.
pub struct BudgetBook {
    ledger: Ledger,
    settings: Settings,
    store: Box<dyn KeyValueStore>,
}

impl BudgetBook {
    /// Opens a book over `store`, rehydrating any persisted state. The
    /// `default_currency` applies only while no settings record exists.
    pub fn open(store: Box<dyn KeyValueStore>, default_currency: &str) -> Result<Self> {
        let mut ledger = Ledger::new();
        if let Some(value) = load_value(store.as_ref(), keys::TRANSACTIONS)? {
            ledger.transactions = serde_json::from_value(value)?;
        }
        if let Some(value) = load_value(store.as_ref(), keys::CATEGORIES)? {
            ledger.categories = serde_json::from_value(value)?;
        }
        let settings = match load_value(store.as_ref(), keys::SETTINGS)? {
            Some(value) => serde_json::from_value(value)?,
            None => Settings::with_currency(default_currency),
        };
        debug!(
            transactions = ledger.transaction_count(),
            categories = ledger.categories.len(),
            currency = %settings.currency,
            "budget book opened"
        );
        Ok(Self {
            ledger,
            settings,
            store,
        })
    }

    /// Validates, appends, and persists a new transaction. The append is
    /// reverted when the store write fails, so the caller observes
    /// all-or-nothing behavior.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction> {
        let transaction = TransactionService::add(&mut self.ledger, draft)?;
        if let Err(err) = self.persist_transactions() {
            self.ledger.remove_transaction(transaction.id);
            return Err(err);
        }
        Ok(transaction)
    }

    /// Removes the transaction with the given id and persists the shrunken
    /// collection. Unknown ids fail with `TransactionNotFound` and leave the
    /// collection unchanged.
    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction> {
        let (index, removed) = TransactionService::remove(&mut self.ledger, id)?;
        if let Err(err) = self.persist_transactions() {
            self.ledger.restore_transaction(index, removed);
            return Err(err);
        }
        Ok(removed)
    }

    /// Streams transactions matching `filter`, stable relative to insertion.
    pub fn transactions<'a>(
        &'a self,
        filter: &'a TransactionFilter,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        TransactionService::list(&self.ledger, filter)
    }

    pub fn balance(&self, filter: &TransactionFilter) -> BalanceReport {
        let totals = SummaryService::totals(&self.ledger, filter);
        BalanceReport {
            income_total: totals.income_total,
            expense_total: totals.expense_total,
            balance: totals.balance,
            currency: self.settings.currency.clone(),
        }
    }

    pub fn category_breakdown(&self, filter: &TransactionFilter) -> Vec<CategoryTotal> {
        SummaryService::category_breakdown(&self.ledger, filter)
    }

    /// Totals and expense breakdown for one calendar month.
    pub fn month_summary(&self, month: MonthKey) -> MonthSummary {
        let filter = TransactionFilter::default().with_month(month);
        MonthSummary {
            month,
            report: self.balance(&filter),
            categories: self.category_breakdown(&filter),
        }
    }

    /// Adds a category and persists the grown set. Rejections leave both the
    /// set and the store untouched.
    pub fn add_category(&mut self, name: &str, kind: CategoryKind) -> Result<Category> {
        let category = CategoryService::add(&mut self.ledger, name, kind)?;
        if let Err(err) = self.persist_categories() {
            self.ledger.categories.pop();
            return Err(err);
        }
        Ok(category)
    }

    pub fn categories(&self) -> &[Category] {
        &self.ledger.categories
    }

    pub fn currency(&self) -> &str {
        &self.settings.currency
    }

    /// Overrides the display currency and persists the settings record.
    pub fn set_currency(&mut self, code: &str) -> Result<()> {
        let code = code.trim();
        if code.is_empty() {
            return Err(BudgetError::InvalidInput("currency code is required".into()));
        }
        let previous = std::mem::replace(&mut self.settings.currency, code.to_string());
        if let Err(err) = self.persist_settings() {
            self.settings.currency = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn transaction_count(&self) -> usize {
        self.ledger.transaction_count()
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.ledger.updated_at
    }

    fn persist_transactions(&self) -> Result<()> {
        let value = serde_json::to_value(&self.ledger.transactions)?;
        self.store.set(keys::TRANSACTIONS, &value)
    }

    fn persist_categories(&self) -> Result<()> {
        let value = serde_json::to_value(&self.ledger.categories)?;
        self.store.set(keys::CATEGORIES, &value)
    }

    fn persist_settings(&self) -> Result<()> {
        let value = serde_json::to_value(&self.settings)?;
        self.store.set(keys::SETTINGS, &value)
    }
}

fn load_value(store: &dyn KeyValueStore, key: &str) -> Result<Option<serde_json::Value>> {
    if store.has(key) {
        store.get(key)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryKind;
    use crate::storage::MemoryStore;
    use serde_json::Value;

    /// Store double whose writes always fail, for atomicity checks.
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn has(&self, _key: &str) -> bool {
            false
        }

        fn get(&self, _key: &str) -> crate::storage::Result<Option<Value>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &Value) -> crate::storage::Result<()> {
            Err(BudgetError::StorageError("write refused".into()))
        }
    }

    fn open_book() -> BudgetBook {
        BudgetBook::open(Box::new(MemoryStore::new()), "JPY").expect("open")
    }

    #[test]
    fn income_and_expense_produce_expected_balance() {
        let mut book = open_book();
        book.add_transaction(
            TransactionDraft::new(EntryKind::Income, 300000.0).with_label("Salary"),
        )
        .expect("income");
        book.add_transaction(TransactionDraft::new(EntryKind::Expense, 50000.0).with_label("Food"))
            .expect("expense");

        let report = book.balance(&TransactionFilter::default());
        assert_eq!(report.income_total, 300000.0);
        assert_eq!(report.expense_total, 50000.0);
        assert_eq!(report.balance, 250000.0);
        assert_eq!(report.currency, "JPY");
    }

    #[test]
    fn add_then_remove_restores_prior_balance() {
        let mut book = open_book();
        book.add_transaction(TransactionDraft::new(EntryKind::Income, 1000.0))
            .expect("income");
        let before = book.balance(&TransactionFilter::default());

        let txn = book
            .add_transaction(TransactionDraft::new(EntryKind::Expense, 400.0))
            .expect("expense");
        book.remove_transaction(txn.id).expect("remove");

        assert_eq!(book.balance(&TransactionFilter::default()), before);
    }

    #[test]
    fn remove_unknown_id_is_not_found_and_leaves_collection_alone() {
        let mut book = open_book();
        book.add_transaction(TransactionDraft::new(EntryKind::Income, 10.0))
            .expect("income");

        let err = book
            .remove_transaction(Uuid::new_v4())
            .expect_err("unknown id");
        assert!(matches!(err, BudgetError::TransactionNotFound(_)));
        assert_eq!(book.transaction_count(), 1);
    }

    #[test]
    fn failed_persist_reverts_the_append() {
        let mut book = BudgetBook::open(Box::new(FailingStore), "JPY").expect("open");
        let err = book
            .add_transaction(TransactionDraft::new(EntryKind::Expense, 700.0))
            .expect_err("store refuses writes");
        assert!(matches!(err, BudgetError::StorageError(_)));
        assert_eq!(book.transaction_count(), 0);
    }

    #[test]
    fn failed_persist_reverts_category_and_currency_changes() {
        let mut book = BudgetBook::open(Box::new(FailingStore), "JPY").expect("open");
        let categories_before = book.categories().len();

        assert!(book.add_category("Gifts", CategoryKind::Expense).is_err());
        assert_eq!(book.categories().len(), categories_before);

        assert!(book.set_currency("EUR").is_err());
        assert_eq!(book.currency(), "JPY");
    }

    #[test]
    fn reopening_over_the_same_store_rehydrates_state() {
        let store = std::sync::Arc::new(MemoryStore::new());

        // Arc<MemoryStore> shares the backing map between both book
        // instances while each owns its Box<dyn KeyValueStore>.
        struct Shared(std::sync::Arc<MemoryStore>);
        impl KeyValueStore for Shared {
            fn has(&self, key: &str) -> bool {
                self.0.has(key)
            }
            fn get(&self, key: &str) -> crate::storage::Result<Option<Value>> {
                self.0.get(key)
            }
            fn set(&self, key: &str, value: &Value) -> crate::storage::Result<()> {
                self.0.set(key, value)
            }
        }

        {
            let mut book =
                BudgetBook::open(Box::new(Shared(store.clone())), "JPY").expect("open");
            book.add_transaction(
                TransactionDraft::new(EntryKind::Expense, 2500.0).with_label("Food"),
            )
            .expect("expense");
            book.add_category("Gifts", CategoryKind::Expense).expect("category");
            book.set_currency("EUR").expect("currency");
        }

        let reopened = BudgetBook::open(Box::new(Shared(store)), "JPY").expect("reopen");
        assert_eq!(reopened.transaction_count(), 1);
        assert!(reopened.categories().iter().any(|c| c.name == "Gifts"));
        assert_eq!(reopened.currency(), "EUR");
    }

    #[test]
    fn month_summary_combines_totals_and_breakdown() {
        let mut book = open_book();
        let may = MonthKey::new(2026, 5).unwrap();
        let june = MonthKey::new(2026, 6).unwrap();
        book.add_transaction(
            TransactionDraft::new(EntryKind::Income, 300000.0)
                .with_label("Salary")
                .with_date(chrono::NaiveDate::from_ymd_opt(2026, 5, 25).unwrap()),
        )
        .expect("income");
        book.add_transaction(
            TransactionDraft::new(EntryKind::Expense, 50000.0)
                .with_label("Food")
                .with_date(chrono::NaiveDate::from_ymd_opt(2026, 5, 3).unwrap()),
        )
        .expect("expense");

        let summary = book.month_summary(may);
        assert_eq!(summary.report.balance, 250000.0);
        assert_eq!(summary.categories.len(), 1);
        assert_eq!(summary.categories[0].label, "Food");

        let empty = book.month_summary(june);
        assert_eq!(empty.report.balance, 0.0);
        assert!(empty.categories.is_empty());
    }
}

//! Business logic helpers for managing transactions.

use uuid::Uuid;

use crate::domain::{Ledger, Transaction, TransactionDraft, TransactionFilter};
use crate::errors::{BudgetError, Result};

/// Provides validated CRUD helpers for ledger transactions.
pub struct TransactionService;

impl TransactionService {
    /// Validates the draft, applies defaults, and appends the resulting
    /// transaction. The collection is untouched when validation fails.
    pub fn add(ledger: &mut Ledger, draft: TransactionDraft) -> Result<Transaction> {
        let transaction = draft.build()?;
        ledger.add_transaction(transaction.clone());
        Ok(transaction)
    }

    /// Removes the transaction identified by `id`, returning it together
    /// with the index it occupied so a failed persist can put it back.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> Result<(usize, Transaction)> {
        ledger
            .remove_transaction(id)
            .ok_or(BudgetError::TransactionNotFound(id))
    }

    /// Streams transactions matching `filter`, stable relative to insertion
    /// order. Callers wanting chronological order sort the collected result.
    pub fn list<'a>(
        ledger: &'a Ledger,
        filter: &'a TransactionFilter,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        ledger
            .transactions
            .iter()
            .filter(move |txn| filter.matches(txn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryKind;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn add_returns_stored_transaction_with_exact_amount() {
        let mut ledger = Ledger::new();
        let txn = TransactionService::add(
            &mut ledger,
            TransactionDraft::new(EntryKind::Income, 300000.0).with_label("Salary"),
        )
        .expect("valid draft");
        assert_eq!(txn.amount, 300000.0);
        assert_eq!(ledger.transaction(txn.id).expect("stored").amount, 300000.0);
    }

    #[test]
    fn add_rejects_invalid_amount_without_mutating() {
        let mut ledger = Ledger::new();
        let err = TransactionService::add(
            &mut ledger,
            TransactionDraft::new(EntryKind::Expense, -50.0),
        )
        .expect_err("negative amount must fail");
        assert!(matches!(err, BudgetError::InvalidAmount(_)));
        assert_eq!(ledger.transaction_count(), 0);
    }

    #[test]
    fn remove_unknown_id_reports_not_found() {
        let mut ledger = Ledger::new();
        let unknown = Uuid::new_v4();
        let err = TransactionService::remove(&mut ledger, unknown)
            .expect_err("unknown id must fail");
        assert!(matches!(err, BudgetError::TransactionNotFound(id) if id == unknown));
    }

    #[test]
    fn list_preserves_insertion_order_under_filter() {
        let mut ledger = Ledger::new();
        for (amount, label, day) in [(1.0, "Food", 3), (2.0, "Housing", 1), (3.0, "Food", 2)] {
            TransactionService::add(
                &mut ledger,
                TransactionDraft::new(EntryKind::Expense, amount)
                    .with_label(label)
                    .with_date(date(2026, 4, day)),
            )
            .expect("valid draft");
        }

        let filter = TransactionFilter::default().with_label("Food");
        let amounts: Vec<f64> = TransactionService::list(&ledger, &filter)
            .map(|txn| txn.amount)
            .collect();
        assert_eq!(amounts, vec![1.0, 3.0]);
    }

    #[test]
    fn list_is_restartable() {
        let mut ledger = Ledger::new();
        TransactionService::add(&mut ledger, TransactionDraft::new(EntryKind::Income, 9.0))
            .expect("valid draft");
        let filter = TransactionFilter::default();
        assert_eq!(TransactionService::list(&ledger, &filter).count(), 1);
        assert_eq!(TransactionService::list(&ledger, &filter).count(), 1);
    }
}

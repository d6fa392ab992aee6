use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{EntryKind, Ledger, TransactionFilter};

use super::TransactionService;

/// Signed totals over a filtered slice of the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BalanceTotals {
    pub income_total: f64,
    pub expense_total: f64,
    pub balance: f64,
}

/// Summed expense amounts for one category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub label: String,
    pub amount: f64,
}

/// Read-only aggregation helpers over the transaction collection.
pub struct SummaryService;

impl SummaryService {
    /// Sums matching income and expense amounts; the balance is income minus
    /// expense, with no rounding beyond f64.
    pub fn totals(ledger: &Ledger, filter: &TransactionFilter) -> BalanceTotals {
        let mut totals = BalanceTotals::default();
        for txn in TransactionService::list(ledger, filter) {
            match txn.kind {
                EntryKind::Income => totals.income_total += txn.amount,
                EntryKind::Expense => totals.expense_total += txn.amount,
            }
        }
        totals.balance = totals.income_total - totals.expense_total;
        totals
    }

    /// Groups matching expense transactions by label, largest totals first.
    pub fn category_breakdown(ledger: &Ledger, filter: &TransactionFilter) -> Vec<CategoryTotal> {
        let mut order: Vec<&str> = Vec::new();
        let mut sums: HashMap<&str, f64> = HashMap::new();
        for txn in TransactionService::list(ledger, filter) {
            if txn.kind != EntryKind::Expense {
                continue;
            }
            sums.entry(txn.label.as_str())
                .and_modify(|total| *total += txn.amount)
                .or_insert_with(|| {
                    order.push(txn.label.as_str());
                    txn.amount
                });
        }
        let mut breakdown: Vec<CategoryTotal> = order
            .into_iter()
            .map(|label| CategoryTotal {
                label: label.to_string(),
                amount: sums[label],
            })
            .collect();
        breakdown.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::TransactionService;
    use crate::domain::{MonthKey, TransactionDraft};
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn seeded_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        let entries = [
            (EntryKind::Income, 300000.0, "Salary", date(2026, 5, 25)),
            (EntryKind::Expense, 50000.0, "Food", date(2026, 5, 3)),
            (EntryKind::Expense, 80000.0, "Housing", date(2026, 5, 1)),
            (EntryKind::Expense, 12000.0, "Food", date(2026, 6, 2)),
        ];
        for (kind, amount, label, when) in entries {
            TransactionService::add(
                &mut ledger,
                TransactionDraft::new(kind, amount)
                    .with_label(label)
                    .with_date(when),
            )
            .expect("valid draft");
        }
        ledger
    }

    #[test]
    fn totals_balance_income_against_expense() {
        let ledger = seeded_ledger();
        let totals = SummaryService::totals(&ledger, &TransactionFilter::default());
        assert_eq!(totals.income_total, 300000.0);
        assert_eq!(totals.expense_total, 142000.0);
        assert_eq!(totals.balance, 158000.0);
    }

    #[test]
    fn totals_respect_month_filter() {
        let ledger = seeded_ledger();
        let filter = TransactionFilter::default().with_month(MonthKey::new(2026, 5).unwrap());
        let totals = SummaryService::totals(&ledger, &filter);
        assert_eq!(totals.expense_total, 130000.0);
        assert_eq!(totals.balance, 170000.0);
    }

    #[test]
    fn breakdown_groups_expenses_descending_by_total() {
        let ledger = seeded_ledger();
        let breakdown = SummaryService::category_breakdown(&ledger, &TransactionFilter::default());
        let labels: Vec<&str> = breakdown.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, vec!["Housing", "Food"]);
        assert_eq!(breakdown[1].amount, 62000.0);
    }

    #[test]
    fn breakdown_ignores_income_records() {
        let ledger = seeded_ledger();
        let breakdown = SummaryService::category_breakdown(&ledger, &TransactionFilter::default());
        assert!(breakdown.iter().all(|entry| entry.label != "Salary"));
    }

    #[test]
    fn empty_ledger_yields_zeroed_totals() {
        let ledger = Ledger::new();
        let totals = SummaryService::totals(&ledger, &TransactionFilter::default());
        assert_eq!(totals, BalanceTotals::default());
        assert!(SummaryService::category_breakdown(&ledger, &TransactionFilter::default())
            .is_empty());
    }
}

//! Capability-style request/response surface for embedding hosts.
//!
//! Each ledger operation maps to one typed request; responses are structured
//! records mirroring the operation return shapes. Failures carry a
//! machine-readable kind next to the human-readable message, never a panic
//! across the boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::book::{BalanceReport, BudgetBook, MonthSummary};
use crate::domain::{
    Category, CategoryKind, DateWindow, EntryKind, MonthKey, Transaction, TransactionDraft,
    TransactionFilter,
};
use crate::errors::{BudgetError, Result};

/// One request per ledger operation, as issued by an embedding host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    AddTransaction {
        kind: EntryKind,
        amount: f64,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    RemoveTransaction {
        id: Uuid,
    },
    ListTransactions {
        #[serde(flatten)]
        filter: FilterParams,
    },
    GetBalance {
        #[serde(flatten)]
        filter: FilterParams,
    },
    GetSummary {
        month: MonthKey,
    },
    AddCategory {
        name: String,
        kind: CategoryKind,
    },
    ListCategories,
}

/// Wire form of the transaction filter. One-sided date bounds are allowed;
/// both bounds are inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthKey>,
}

impl FilterParams {
    fn into_filter(self) -> Result<TransactionFilter> {
        let window = match (self.start_date, self.end_date) {
            (None, None) => None,
            (start, end) => Some(DateWindow::new(
                start.unwrap_or(NaiveDate::MIN),
                end.unwrap_or(NaiveDate::MAX),
            )?),
        };
        Ok(TransactionFilter {
            kind: self.kind,
            label: self.label,
            window,
            month: self.month,
        })
    }
}

/// Structured success payloads mirroring the operation return shapes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Reply {
    Transaction {
        transaction: Transaction,
    },
    Removed {
        id: Uuid,
    },
    Transactions {
        items: Vec<Transaction>,
        total: f64,
        currency: String,
    },
    Balance {
        #[serde(flatten)]
        report: BalanceReport,
    },
    Summary {
        #[serde(flatten)]
        summary: MonthSummary,
    },
    Categories {
        items: Vec<Category>,
    },
}

/// Machine-readable failure record returned instead of a success payload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidAmount,
    InvalidName,
    AlreadyExists,
    NotFound,
    PersistenceFailure,
    InvalidRequest,
}

impl From<BudgetError> for Failure {
    fn from(err: BudgetError) -> Self {
        let kind = match &err {
            BudgetError::InvalidAmount(_) => FailureKind::InvalidAmount,
            BudgetError::InvalidName(_) => FailureKind::InvalidName,
            BudgetError::CategoryExists(_) => FailureKind::AlreadyExists,
            BudgetError::TransactionNotFound(_) => FailureKind::NotFound,
            BudgetError::StorageError(_) => FailureKind::PersistenceFailure,
            BudgetError::ConfigError(_) | BudgetError::InvalidInput(_) => {
                FailureKind::InvalidRequest
            }
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

pub type ApiResult = std::result::Result<Reply, Failure>;

/// Executes one request against the book.
pub fn dispatch(book: &mut BudgetBook, request: Request) -> ApiResult {
    match request {
        Request::AddTransaction {
            kind,
            amount,
            label,
            description,
            date,
        } => {
            let mut draft = TransactionDraft::new(kind, amount);
            draft.label = label;
            draft.description = description;
            draft.date = date;
            book.add_transaction(draft)
                .map(|transaction| Reply::Transaction { transaction })
                .map_err(Failure::from)
        }
        Request::RemoveTransaction { id } => book
            .remove_transaction(id)
            .map(|removed| Reply::Removed { id: removed.id })
            .map_err(Failure::from),
        Request::ListTransactions { filter } => {
            let filter = filter.into_filter().map_err(Failure::from)?;
            let items: Vec<Transaction> = book.transactions(&filter).cloned().collect();
            let total = items.iter().map(|txn| txn.amount).sum();
            Ok(Reply::Transactions {
                items,
                total,
                currency: book.currency().to_string(),
            })
        }
        Request::GetBalance { filter } => {
            let filter = filter.into_filter().map_err(Failure::from)?;
            Ok(Reply::Balance {
                report: book.balance(&filter),
            })
        }
        Request::GetSummary { month } => Ok(Reply::Summary {
            summary: book.month_summary(month),
        }),
        Request::AddCategory { name, kind } => book
            .add_category(&name, kind)
            .map(|_| Reply::Categories {
                items: book.categories().to_vec(),
            })
            .map_err(Failure::from),
        Request::ListCategories => Ok(Reply::Categories {
            items: book.categories().to_vec(),
        }),
    }
}

//! Domain model for dated, categorized money records.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable};
use crate::errors::{BudgetError, Result};

/// Distinguishes money coming in from money going out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    /// Label applied when the caller omits a category or source.
    pub fn default_label(self) -> &'static str {
        match self {
            EntryKind::Income => "General",
            EntryKind::Expense => "Other",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

/// A single signed-by-kind ledger record. The amount is always stored
/// positive; `kind` implies the sign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: EntryKind,
    pub amount: f64,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn new(kind: EntryKind, amount: f64, label: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            label: label.into(),
            description: String::new(),
            date,
        }
    }

    /// Amount with the sign implied by the entry kind.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {} {:.2} ({})",
            self.date, self.kind, self.amount, self.label
        )
    }
}

/// Per-operation parameter structure for creating a transaction. Optional
/// fields take the documented defaults when left unset.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: EntryKind,
    pub amount: f64,
    pub label: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionDraft {
    pub fn new(kind: EntryKind, amount: f64) -> Self {
        Self {
            kind,
            amount,
            label: None,
            description: None,
            date: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Validates the draft and materializes the transaction, applying
    /// defaults for label, description, and date.
    pub fn build(self) -> Result<Transaction> {
        validate_amount(self.amount)?;
        let label = match self.label {
            Some(label) if !label.trim().is_empty() => label,
            _ => self.kind.default_label().to_string(),
        };
        let mut transaction = Transaction::new(
            self.kind,
            self.amount,
            label,
            self.date.unwrap_or_else(today),
        );
        if let Some(description) = self.description {
            transaction.description = description;
        }
        Ok(transaction)
    }
}

/// Today's calendar date in the process-local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Rejects non-finite or non-positive amounts before any state changes.
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BudgetError::InvalidAmount(amount.to_string()));
    }
    Ok(())
}

/// Parses free-form text input into a valid amount.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BudgetError::InvalidAmount("missing amount".into()));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| BudgetError::InvalidAmount(trimmed.to_string()))?;
    validate_amount(value)?;
    Ok(value)
}

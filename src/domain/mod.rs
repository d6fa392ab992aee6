pub mod category;
pub mod common;
pub mod ledger;
pub mod settings;
pub mod transaction;

pub use category::{Category, CategoryKind};
pub use ledger::{
    DateWindow, DateWindowError, Ledger, MonthKey, MonthKeyError, TransactionFilter,
};
pub use settings::Settings;
pub use transaction::{
    parse_amount, today, validate_amount, EntryKind, Transaction, TransactionDraft,
};

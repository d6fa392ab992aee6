use std::path::{Path, PathBuf};
use std::sync::Mutex;

use kakeibo_core::core::book::BudgetBook;
use kakeibo_core::storage::JsonFileStore;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated file-backed book rooted in a unique directory.
pub fn setup_test_env() -> (BudgetBook, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let book = open_book_at(&base);
    (book, base)
}

/// Opens (or reopens) a book over the JSON store rooted at `base`.
pub fn open_book_at(base: &Path) -> BudgetBook {
    let store = JsonFileStore::new(Some(base.join("data"))).expect("create json store");
    BudgetBook::open(Box::new(store), "JPY").expect("open budget book")
}

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::{env, fmt};

use crate::errors::Result;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIR_NAME: &str = ".kakeibo";
const DATA_DIR: &str = "data";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("kakeibo_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Creates `path` and its parents when missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolves the application directories used for configuration and data.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory, defaulting to `~/.kakeibo`. The
    /// `KAKEIBO_HOME` environment variable overrides the location.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os("KAKEIBO_HOME") {
            return PathBuf::from(custom);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn data_dir_in(base: &Path) -> PathBuf {
        base.join(DATA_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }
}

/// Derives the sibling temp-file path used for atomic writes.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to the temp sibling of `path` and renames it into place, so
/// readers never observe a partially written document.
pub fn write_atomic(path: &Path, data: impl fmt::Display) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.to_string().as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

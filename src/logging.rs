//! Log file setup
//!
//! Everything goes to a file; the terminal belongs to the editor.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::constants::paths;

/// `<cache dir>/sno/sno.log`, falling back to the temp dir
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(paths::APP_DIR)
        .join(paths::LOG_FILE)
}

/// Filter from `SNO_LOG`, `info` when unset or invalid
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(paths::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `path`, truncating it
pub fn init(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = File::create(path)?;

    let fmt_layer = fmt::layer()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter())
        .try_init()
        .map_err(|e| std::io::Error::other(e.to_string()))
}

use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Initialize logging to an append-only file.
///
/// The terminal is owned by the TUI while a session runs, so nothing is
/// written to stdout or stderr. Falls back to no subscriber at all when the
/// file cannot be opened. `RUST_LOG` overrides the default `info` level.
pub fn init_logging(path: &Path) -> bool {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return false;
        }
    }

    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(file)
        .try_init()
        .is_ok()
}

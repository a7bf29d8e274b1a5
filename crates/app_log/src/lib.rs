//! DataShelf logging module
//!
//! Structured logging to the console and a rolling JSON file, plus a panic
//! hook that writes crash reports.

mod logging;
mod panic_hook;

pub use logging::{cleanup_old_logs, init_logging};
pub use panic_hook::init_panic_hook;
pub use tracing_appender::non_blocking::WorkerGuard;

use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the application log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "DataShelf", "DataShelf")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize logging and the panic hook.
///
/// The returned guard flushes the file writer when dropped, so the caller
/// must keep it alive for as long as it wants log output.
pub fn init() -> anyhow::Result<WorkerGuard> {
    let guard = init_logging(&log_dir())?;
    init_panic_hook();
    Ok(guard)
}

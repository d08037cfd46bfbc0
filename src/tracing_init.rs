//! Tracing initialization — structured logs appended to the data-dir log file.
//!
//! Every entry point (CLI commands, library embedders that want logs) calls
//! this once; concurrent pipeline invocations append to the same file.

use std::sync::Mutex;

use crate::storage::paths;

/// Initialize tracing to `{data_dir}/digest.log` (append mode).
///
/// Short writes (< PIPE_BUF = 4096) are atomic on Linux/macOS, so concurrent
/// processes can share the file.
pub fn init_file_tracing() {
    use tracing_subscriber::EnvFilter;

    let data_dir = paths::data_dir();
    std::fs::create_dir_all(&data_dir).ok();
    let log_path = paths::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .unwrap_or_else(|_| {
            let null = if cfg!(windows) { "NUL" } else { "/dev/null" };
            std::fs::File::create(null).expect("Cannot create log fallback")
        });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_target(true)
        .with_ansi(false)
        .init();
}

use std::path::PathBuf;

/// Cross-platform data directory.
/// Linux: ~/.config/relay-digest/
/// macOS: ~/Library/Application Support/relay-digest/
/// Windows: %APPDATA%/relay-digest/
pub fn data_dir() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    base.join("relay-digest")
}

/// Archive database: {data_dir}/digest.db
pub fn db_path() -> PathBuf {
    data_dir().join("digest.db")
}

/// Configuration file: {data_dir}/config.json
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Log file: {data_dir}/digest.log
pub fn log_path() -> PathBuf {
    data_dir().join("digest.log")
}

pub mod doctor;
pub mod gateway;
pub mod onboard;
pub mod plan;

use std::path::{Path, PathBuf};

use learnveda_config::{AppConfig, ConfigError};
use tracing::debug;

/// The config file in use: `--config` when given, else the default path.
pub fn config_file(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_path)
}

/// Read the config file with environment overrides applied.
///
/// An explicit `--config` path must exist; the default path may be absent,
/// in which case defaults are used.
pub fn read_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load_existing(path),
        None => AppConfig::load_with(&AppConfig::config_path()),
    }
}

/// Load configuration for a command, or fail with a printable message.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = read_config(path).map_err(|e| format!("Failed to load config: {e}"))?;
    debug!(
        path = %config_file(path).display(),
        provider = %config.default_provider,
        "Configuration loaded"
    );
    Ok(config)
}

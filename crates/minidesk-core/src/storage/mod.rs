mod config;
pub mod database;

pub use config::{Config, ExpensesConfig, TimerConfig, UnitsConfig};
pub use database::{Database, SessionStats};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/minidesk[-dev]/` based on MINIDESK_ENV.
///
/// Set MINIDESK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MINIDESK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("minidesk-dev")
    } else {
        base_dir.join("minidesk")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

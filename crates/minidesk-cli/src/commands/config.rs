use clap::Subcommand;
use minidesk_core::{Config, ConfigError};
use tracing::info;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dot-path, e.g. `timer.work_minutes`
    Get { key: String },
    /// Change one value; the new value must parse as the old one's type
    Set {
        /// Dot-path key: timer.work_minutes, timer.break_minutes,
        /// timer.record_sessions, units.precision, expenses.currency_symbol
        key: String,
        value: String,
    },
    /// Print the whole config as JSON, or as `key = value` lines with --keys
    List {
        #[arg(long)]
        keys: bool,
    },
    /// Restore defaults, for one key or for everything
    Reset { key: Option<String> },
    /// Print where config.toml lives
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            info!(%key, %value, "config updated");
            println!("{key} = {value}");
        }
        ConfigAction::List { keys: false } => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::List { keys: true } => {
            let config = Config::load()?;
            for key in Config::KEYS {
                if let Some(value) = config.get(key) {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Reset { key: Some(key) } => {
            let default = Config::default()
                .get(&key)
                .ok_or_else(|| ConfigError::UnknownKey(key.clone()))?;
            let mut config = Config::load()?;
            config.set(&key, &default)?;
            println!("{key} = {default}");
        }
        ConfigAction::Reset { key: None } => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    budget::DEFAULT_TRIP_DAYS,
    currency::{CurrencyCode, DEFAULT_RATE, DEFAULT_RATE_ENDPOINT},
    errors::ConfigError,
    ledger::export::DEFAULT_EXPORT_FILE,
    utils::tmp_path,
};

/// Overrides the directory holding `config.json`.
pub const HOME_ENV: &str = "TRIP_LEDGER_HOME";

const CONFIG_FILE: &str = "config.json";
const APP_DIR: &str = "trip_ledger";

/// Optional modules a session can switch on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub live_rate: bool,
    pub category_limits: bool,
    pub forecasting: bool,
    pub trend: bool,
    pub export: bool,
    pub email: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            live_rate: true,
            category_limits: true,
            forecasting: true,
            trend: true,
            export: true,
            email: false,
        }
    }
}

/// Mail server location. The login comes from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".into(),
            port: 465,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub primary_currency: CurrencyCode,
    pub secondary_currency: CurrencyCode,
    pub rate_endpoint: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub fallback_rate: Decimal,
    pub request_timeout_secs: u64,
    pub trip_days: u32,
    pub export_file: String,
    pub features: Features,
    pub smtp: SmtpSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_currency: CurrencyCode::new("INR"),
            secondary_currency: CurrencyCode::new("VND"),
            rate_endpoint: DEFAULT_RATE_ENDPOINT.into(),
            fallback_rate: DEFAULT_RATE,
            request_timeout_secs: 10,
            trip_days: DEFAULT_TRIP_DAYS,
            export_file: DEFAULT_EXPORT_FILE.into(),
            features: Features::default(),
            smtp: SmtpSettings::default(),
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Resolves the config location from `TRIP_LEDGER_HOME` or the user data dir.
    pub fn new() -> Result<Self, ConfigError> {
        let base = match std::env::var_os(HOME_ENV) {
            Some(home) => PathBuf::from(home),
            None => dirs::data_dir()
                .ok_or(ConfigError::MissingDataDir)?
                .join(APP_DIR),
        };
        Ok(Self::with_base_dir(base))
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            path: base.join(CONFIG_FILE),
        }
    }

    /// Loads the config, falling back to defaults when no file exists yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
        let config = manager.load().expect("load defaults");
        assert_eq!(config, Config::default());
        assert_eq!(config.fallback_rate, DEFAULT_RATE);
        assert!(!config.features.email);
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().join("nested"));
        let mut config = Config::default();
        config.features.live_rate = false;
        config.trip_days = 9;
        manager.save(&config).expect("save config");
        assert_eq!(manager.load().expect("reload"), config);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
        fs::write(manager.path(), r#"{ "features": { "email": true } }"#).expect("write");
        let config = manager.load().expect("load partial");
        assert!(config.features.email);
        assert!(config.features.live_rate);
        assert_eq!(config.secondary_currency, CurrencyCode::new("VND"));
    }
}

//! Optional TOML configuration.
//!
//! Lookup order: `--config <path>`, `$POCKETDESK_CONFIG`, then
//! `./pocketdesk.toml`. No config file means defaults (not an error).
//! `POCKETDESK_DATA_DIR` and `POCKETDESK_WEATHER_API_KEY` override the file.

use crate::core::error::DeskError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "pocketdesk.toml";
pub const CONFIG_ENV: &str = "POCKETDESK_CONFIG";
pub const DATA_DIR_ENV: &str = "POCKETDESK_DATA_DIR";
pub const WEATHER_API_KEY_ENV: &str = "POCKETDESK_WEATHER_API_KEY";

pub const DEFAULT_WEATHER_API_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_WEATHER_HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeskConfig {
    /// Directory holding every tool's backing file. Defaults to the working directory.
    pub data_dir: Option<PathBuf>,
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
    pub history_limit: usize,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_WEATHER_API_URL.to_string(),
            timeout_secs: DEFAULT_WEATHER_TIMEOUT_SECS,
            history_limit: DEFAULT_WEATHER_HISTORY_LIMIT,
        }
    }
}

pub fn parse_config(content: &str) -> Result<DeskConfig, DeskError> {
    toml::from_str(content).map_err(|e| DeskError::ConfigError(e.to_string()))
}

fn read_config_file(path: &Path) -> Result<DeskConfig, DeskError> {
    let content = fs::read_to_string(path).map_err(|e| {
        DeskError::ConfigError(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&content)
}

/// Resolve and load the config, then apply environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<DeskConfig, DeskError> {
    let config = if let Some(path) = explicit {
        read_config_file(path)?
    } else if let Ok(path) = env::var(CONFIG_ENV) {
        read_config_file(Path::new(&path))?
    } else {
        let local = Path::new(CONFIG_FILE_NAME);
        if local.exists() {
            read_config_file(local)?
        } else {
            DeskConfig::default()
        }
    };

    Ok(apply_overrides(
        config,
        env::var(DATA_DIR_ENV).ok(),
        env::var(WEATHER_API_KEY_ENV).ok(),
    ))
}

pub fn apply_overrides(
    mut config: DeskConfig,
    data_dir: Option<String>,
    api_key: Option<String>,
) -> DeskConfig {
    if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
        config.data_dir = Some(PathBuf::from(dir));
    }
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        config.weather.api_key = Some(key);
    }
    config
}

impl DeskConfig {
    /// The command-line flag wins over everything else.
    pub fn resolve_data_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::core::analysis::volumes::GP2_TO_GP3_SAVINGS_RATIO;
use crate::core::client::DEFAULT_BASE_URL;

pub const API_KEY_ENV: &str = "CLOUDHEALTH_API_KEY";
pub const CLIENT_ID_ENV: &str = "CLOUDHEALTH_CLIENT_ID";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Unknown config key '{0}' (expected one of: {keys})", keys = SETTABLE_KEYS.join(", "))]
    UnknownKey(String),
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

pub const SETTABLE_KEYS: &[&str] = &[
    "api_key",
    "client_id",
    "base_url",
    "timeout_secs",
    "snapshot_cutoff_year",
    "gp2_size_threshold_gb",
    "gp2_savings_ratio",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_format() -> String {
    "text".to_string()
}
fn default_color() -> String {
    "auto".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            color: default_color(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    pub client_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            client_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Thresholds and ratios applied by the analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Snapshots created before this year count as stale
    #[serde(default = "default_cutoff_year")]
    pub snapshot_cutoff_year: i32,
    /// Only attached gp2 volumes smaller than this are migration candidates
    #[serde(default = "default_gp2_threshold")]
    pub gp2_size_threshold_gb: f64,
    #[serde(default = "default_gp2_ratio")]
    pub gp2_savings_ratio: f64,
}

fn default_cutoff_year() -> i32 {
    2021
}
fn default_gp2_threshold() -> f64 {
    1000.0
}
fn default_gp2_ratio() -> f64 {
    GP2_TO_GP3_SAVINGS_RATIO
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            snapshot_cutoff_year: default_cutoff_year(),
            gp2_size_threshold_gb: default_gp2_threshold(),
            gp2_savings_ratio: default_gp2_ratio(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Pick the first non-empty value: CLI flag, then environment, then config file.
pub fn resolve_value(
    flag: Option<String>,
    env_value: Option<String>,
    configured: Option<&str>,
) -> Option<String> {
    flag.into_iter()
        .chain(env_value)
        .chain(configured.map(str::to_string))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("cloudopt").join("config.toml")
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Serialize and write this config to the config file path.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Set a single key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "api_key" => self.api.api_key = Some(value.to_string()),
            "client_id" => self.api.client_id = Some(value.to_string()),
            "base_url" => self.api.base_url = value.trim_end_matches('/').to_string(),
            "timeout_secs" => self.api.timeout_secs = value.parse().map_err(|_| invalid())?,
            "snapshot_cutoff_year" => {
                self.policy.snapshot_cutoff_year = value.parse().map_err(|_| invalid())?
            }
            "gp2_size_threshold_gb" => {
                self.policy.gp2_size_threshold_gb = value.parse().map_err(|_| invalid())?
            }
            "gp2_savings_ratio" => {
                self.policy.gp2_savings_ratio = value.parse().map_err(|_| invalid())?
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !["text", "json"].contains(&self.settings.default_format.as_str()) {
            issues.push(format!(
                "Invalid default_format: '{}' (must be 'text' or 'json')",
                self.settings.default_format
            ));
        }
        if !["auto", "always", "never"].contains(&self.settings.color.as_str()) {
            issues.push(format!(
                "Invalid color: '{}' (must be 'auto', 'always', or 'never')",
                self.settings.color
            ));
        }
        if !self.api.base_url.starts_with("https://") {
            issues.push(format!(
                "Invalid base_url: '{}' (must use https://)",
                self.api.base_url
            ));
        }
        if self.api.timeout_secs == 0 {
            issues.push("Invalid timeout_secs: must be greater than 0".to_string());
        }
        if !(1990..=2100).contains(&self.policy.snapshot_cutoff_year) {
            issues.push(format!(
                "Invalid snapshot_cutoff_year: {} (must be between 1990 and 2100)",
                self.policy.snapshot_cutoff_year
            ));
        }
        let threshold = self.policy.gp2_size_threshold_gb;
        if threshold.is_nan() || threshold <= 0.0 {
            issues.push(format!(
                "Invalid gp2_size_threshold_gb: {} (must be positive)",
                self.policy.gp2_size_threshold_gb
            ));
        }
        if !(0.0..=1.0).contains(&self.policy.gp2_savings_ratio) {
            issues.push(format!(
                "Invalid gp2_savings_ratio: {} (must be between 0 and 1)",
                self.policy.gp2_savings_ratio
            ));
        }
        issues
    }
}

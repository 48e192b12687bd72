//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/sheetmarks/config.toml)
//! 3. Environment variables (SHEETMARKS_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "SHEETMARKS";

/// Default Sheets API base URL
pub const DEFAULT_API_URL: &str = "https://sheets.googleapis.com/v4";

/// Default worksheet (tab) name
pub const DEFAULT_WORKSHEET: &str = "main";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trailing token characters left visible by `masked_access_token`
const MASK_VISIBLE_CHARS: usize = 4;

/// Keys accepted by `config set`
pub const CONFIG_KEYS: [&str; 6] = [
    "spreadsheet_id",
    "worksheet",
    "access_token",
    "api_url",
    "timeout_secs",
    "log_file",
];

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Spreadsheet identifier (the long id in the sheet's URL)
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    /// Worksheet tab holding the bookmarks
    #[serde(default = "default_worksheet")]
    pub worksheet: String,

    /// OAuth bearer token with editor access to the spreadsheet
    #[serde(default)]
    pub access_token: Option<String>,

    /// Sheets API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Timeout for each request to the spreadsheet service
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log file used when SHEETMARKS_LOG is set (stderr otherwise)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            worksheet: default_worksheet(),
            access_token: None,
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SHEETMARKS_SPREADSHEET_ID, SHEETMARKS_WORKSHEET, ...)
    /// 2. Config file (~/.config/sheetmarks/config.toml or SHEETMARKS_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::load_file_only(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load only what the file holds, ignoring environment variables
    ///
    /// This is the form to edit and save back, so that values supplied
    /// through the environment (the access token in particular) never end
    /// up written to disk.
    pub fn load_file_only(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // SHEETMARKS_SPREADSHEET_ID
        if let Ok(val) = std::env::var(format!("{}_SPREADSHEET_ID", ENV_PREFIX)) {
            self.spreadsheet_id = non_empty(val);
        }

        // SHEETMARKS_WORKSHEET
        if let Ok(val) = std::env::var(format!("{}_WORKSHEET", ENV_PREFIX)) {
            if !val.is_empty() {
                self.worksheet = val;
            }
        }

        // SHEETMARKS_ACCESS_TOKEN
        if let Ok(val) = std::env::var(format!("{}_ACCESS_TOKEN", ENV_PREFIX)) {
            self.access_token = non_empty(val);
        }

        // SHEETMARKS_API_URL
        if let Ok(val) = std::env::var(format!("{}_API_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.api_url = val;
            }
        }

        // SHEETMARKS_TIMEOUT_SECS (ignored when not a number)
        if let Ok(val) = std::env::var(format!("{}_TIMEOUT_SECS", ENV_PREFIX)) {
            if let Ok(secs) = val.trim().parse() {
                self.timeout_secs = secs;
            }
        }
    }

    /// Set one key from its string form, as `config set` does
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "spreadsheet_id" => self.spreadsheet_id = optional(value),
            "worksheet" => {
                if value.is_empty() {
                    anyhow::bail!("worksheet cannot be empty");
                }
                self.worksheet = value.to_string();
            }
            "access_token" => self.access_token = optional(value),
            "api_url" => {
                self.api_url = if value.is_empty() {
                    default_api_url()
                } else {
                    value.to_string()
                };
            }
            "timeout_secs" => {
                self.timeout_secs = value
                    .parse()
                    .context("Invalid value for timeout_secs. Use a whole number of seconds.")?;
            }
            "log_file" => self.log_file = optional(value).map(PathBuf::from),
            _ => {
                anyhow::bail!(
                    "Unknown configuration key: '{}'\nValid keys: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                );
            }
        }
        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SHEETMARKS_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sheetmarks")
            .join("config.toml")
    }

    /// The access token with all but its last four characters hidden
    ///
    /// Tokens of four characters or fewer are hidden entirely.
    pub fn masked_access_token(&self) -> Option<String> {
        self.access_token.as_ref().map(|token| {
            if token.chars().count() <= MASK_VISIBLE_CHARS {
                return "****".to_string();
            }
            let visible: String = token
                .chars()
                .rev()
                .take(MASK_VISIBLE_CHARS)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("****{}", visible)
        })
    }
}

fn non_empty(val: String) -> Option<String> {
    if val.is_empty() {
        None
    } else {
        Some(val)
    }
}

/// `config set` treats an empty value or "none" as unset
fn optional(value: &str) -> Option<String> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.to_string())
    }
}

fn default_worksheet() -> String {
    DEFAULT_WORKSHEET.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

//! Configuration management for `nissue`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables
//! 3. User config (`$XDG_CONFIG_HOME/notion-issues/config.yaml`)
//! 4. Defaults

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notion_issues_lib::store::DEFAULT_PAGE_SIZE;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Name of the schema cache; also the cache file stem.
pub const CACHE_KEY: &str = "notion.nvim";
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";
pub const NOTION_API_VERSION: &str = "2022-06-28";
pub const DEFAULT_TIMEOUT_SECS: u64 = 50;
/// Largest page the query endpoint accepts.
pub const MAX_PAGE_SIZE: usize = 100;

pub const TOKEN_ENV: &str = "NOTION_INTEGRATION_TOKEN";
pub const DATABASE_ENV: &str = "NOTION_DATABASE_ID";
pub const CACHE_ENV: &str = "NOTION_ISSUES_CACHE";
pub const API_BASE_ENV: &str = "NOTION_API_BASE_URL";

static DATABASE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{32}$").expect("database id regex"));

/// One source of settings. Unset fields defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub database_id: Option<String>,
    pub token: Option<String>,
    pub cache_path: Option<PathBuf>,
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub page_size: Option<usize>,
}

impl ConfigLayer {
    /// Read a YAML file. Missing files return an empty layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Build a layer from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a layer from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            database_id: get(DATABASE_ENV),
            token: get(TOKEN_ENV),
            cache_path: get(CACHE_ENV).map(PathBuf::from),
            api_base_url: get(API_BASE_ENV),
            timeout_secs: None,
            page_size: None,
        }
    }

    /// Overlay `other` on top of `self`; set fields in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            database_id: other.database_id.or(self.database_id),
            token: other.token.or(self.token),
            cache_path: other.cache_path.or(self.cache_path),
            api_base_url: other.api_base_url.or(self.api_base_url),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            page_size: other.page_size.or(self.page_size),
        }
    }
}

/// CLI overrides for config loading.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_id: Option<String>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        ConfigLayer {
            database_id: self.database_id.clone(),
            ..ConfigLayer::default()
        }
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub token: Option<String>,
    pub database_id: Option<String>,
    pub cache_path: PathBuf,
    pub api_base_url: String,
    pub timeout: Duration,
    pub page_size: usize,
}

impl Settings {
    /// Load every layer and resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable or a value is
    /// invalid.
    pub fn load(overrides: &CliOverrides) -> Result<Self> {
        let file = match user_config_path() {
            Some(path) => ConfigLayer::from_yaml(&path)?,
            None => ConfigLayer::default(),
        };
        Self::resolve(&[file, ConfigLayer::from_env(), overrides.as_layer()])
    }

    /// Merge `layers` (lowest priority first) over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Config` for an invalid database ID or page size.
    pub fn resolve(layers: &[ConfigLayer]) -> Result<Self> {
        let merged = layers
            .iter()
            .cloned()
            .fold(ConfigLayer::default(), ConfigLayer::merge);

        let database_id = merged
            .database_id
            .as_deref()
            .map(normalize_database_id)
            .transpose()?;

        let page_size = merged.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::Config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        Ok(Self {
            token: merged.token,
            database_id,
            cache_path: merged.cache_path.unwrap_or_else(default_cache_path),
            api_base_url: merged
                .api_base_url
                .map_or_else(|| DEFAULT_API_BASE_URL.to_string(), |url| url.trim_end_matches('/').to_string()),
            timeout: Duration::from_secs(merged.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            page_size,
        })
    }

    /// # Errors
    ///
    /// Returns `MissingToken` when no token was configured.
    pub fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(AppError::MissingToken)
    }

    /// # Errors
    ///
    /// Returns `MissingDatabaseId` when no database was configured.
    pub fn require_database_id(&self) -> Result<&str> {
        self.database_id
            .as_deref()
            .ok_or(AppError::MissingDatabaseId)
    }
}

/// Path of the user config file, if a config directory exists.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("notion-issues").join("config.yaml"))
}

/// Cache file in the system temp directory.
#[must_use]
pub fn default_cache_path() -> PathBuf {
    env::temp_dir().join(format!("{CACHE_KEY}.db"))
}

/// Strip dashes and check for 32 hex digits.
///
/// # Errors
///
/// Returns `Config` if the ID is malformed.
pub fn normalize_database_id(raw: &str) -> Result<String> {
    let compact: String = raw.trim().chars().filter(|c| *c != '-').collect();
    if DATABASE_ID_RE.is_match(&compact) {
        Ok(compact.to_ascii_lowercase())
    } else {
        Err(AppError::Config(format!(
            "Invalid database ID '{}': expected 32 hex digits",
            raw.trim()
        )))
    }
}

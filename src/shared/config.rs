use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::Deserialize;

use crate::infra::github::DEFAULT_MAX_PAGES;

/// Top-level configuration for issuebot.
#[derive(Debug, Default, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Chat bot settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// GitHub client settings.
    #[serde(default)]
    pub github: GitHubConfig,
}

/// Chat bot configuration.
#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// HTTP path the slash-command webhook is served on (default: "/issue").
    #[serde(default = "default_webhook_path")]
    #[schemars(default = "default_webhook_path")]
    pub webhook_path: String,

    /// Aliases registered at startup, chat handle -> GitHub username.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            webhook_path: default_webhook_path(),
            aliases: BTreeMap::new(),
        }
    }
}

/// GitHub client configuration.
#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GitHubConfig {
    /// Upper bound on result pages fetched by one search (default: 100).
    #[serde(default = "default_max_pages")]
    #[schemars(default = "default_max_pages")]
    pub max_pages: usize,

    /// Timeout for a single GitHub request in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    #[schemars(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_webhook_path() -> String {
    "/issue".to_string()
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file (missing, permission error, etc.)
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("Invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Semantically invalid value
    #[error("Invalid config file {path}: {message}")]
    InvalidValue { path: PathBuf, message: String },
}

/// Load configuration.
///
/// An explicit path must exist. Without one, ~/.config/issuebot/config.ya?ml
/// is used when present, and Config::default() otherwise.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        return parse_config(&content, path);
    }

    let Some(dir) = config_dir() else {
        return Ok(Config::default());
    };
    load_config_from_dir(&dir.join("issuebot"))
}

/// Load configuration from a specific directory.
/// Searches for config.yaml, then config.yml in the given directory.
/// Returns Config::default() if neither file exists.
pub fn load_config_from_dir(dir: &Path) -> anyhow::Result<Config> {
    for filename in &["config.yaml", "config.yml"] {
        let path = dir.join(filename);
        match std::fs::read_to_string(&path) {
            Ok(content) => return parse_config(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ConfigError::ReadError { path, source: e }.into()),
        }
    }

    Ok(Config::default())
}

/// Parse YAML content into Config.
fn parse_config(content: &str, path: &Path) -> anyhow::Result<Config> {
    let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    validate(&config).map_err(|message| ConfigError::InvalidValue {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(config)
}

fn validate(config: &Config) -> std::result::Result<(), String> {
    let webhook_path = &config.bot.webhook_path;
    if !webhook_path.starts_with('/') {
        return Err(format!("bot.webhook_path must start with '/': {webhook_path:?}"));
    }
    // Route syntax would turn the path into a capture or make axum reject it.
    if webhook_path.contains([':', '*', '{', '}']) {
        return Err(format!(
            "bot.webhook_path must be a literal path without ':', '*', '{{' or '}}': {webhook_path:?}"
        ));
    }
    if config.github.max_pages == 0 {
        return Err("github.max_pages must be at least 1".to_string());
    }
    if config.github.request_timeout_secs == 0 {
        return Err("github.request_timeout_secs must be at least 1".to_string());
    }
    Ok(())
}

/// Returns the XDG config directory (~/.config or $XDG_CONFIG_HOME).
/// Empty values are treated as unset per XDG Base Directory Specification.
fn config_dir() -> Option<PathBuf> {
    if let Some(xdg) = non_empty_env("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg));
    }
    non_empty_env("HOME").map(|home| PathBuf::from(home).join(".config"))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Generate JSON Schema for the Config struct.
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Config)
}

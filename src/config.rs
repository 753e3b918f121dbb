use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::quote::Catalog;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub ui: UiConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Options offered by the wizard; replaces the built-in catalog
    #[serde(default)]
    pub catalog: Catalog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Sessions and logs live here
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Snapshots older than this belong to a previous session (default: 120)
    #[serde(default = "default_session_ttl")]
    pub ttl_minutes: u64,
}

fn default_session_ttl() -> u64 {
    120 // 2 hours
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_session_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    /// Step switch animation length
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    /// Delay between dismissing the success overlay and the reset
    #[serde(default = "default_dismiss_delay_ms")]
    pub dismiss_delay_ms: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_transition_ms() -> u64 {
    300
}

fn default_dismiss_delay_ms() -> u64 {
    500
}

fn default_currency() -> String {
    "₽".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Form access key sent with every lead. Usually supplied through
    /// ENCLOSURE_QUOTE__SUBMISSION__ACCESS_KEY.
    #[serde(default)]
    pub access_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.web3forms.com/submit".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            access_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

impl Config {
    /// Project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(".enclosure-quote/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the wizard works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/enclosure-quote/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("enclosure-quote").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with ENCLOSURE_QUOTE_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("ENCLOSURE_QUOTE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to .enclosure-quote/config.toml
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::local_config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(config_path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.ui.transition_ms)
    }

    pub fn dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.ui.dismiss_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                state: ".enclosure-quote".to_string(), // Relative to cwd
            },
            session: SessionConfig::default(),
            ui: UiConfig {
                refresh_rate_ms: 50,
                transition_ms: default_transition_ms(),
                dismiss_delay_ms: default_dismiss_delay_ms(),
                currency: default_currency(),
            },
            submission: SubmissionConfig::default(),
            logging: LoggingConfig::default(),
            catalog: Catalog::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.transition_delay(), Duration::from_millis(300));
        assert_eq!(config.dismiss_delay(), Duration::from_millis(500));
        assert_eq!(config.ui.currency, "₽");
        assert!(config.submission.access_key.is_empty());
        assert!(!config.catalog.enclosure_types.is_empty());
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[ui]
refresh_rate_ms = 100
transition_ms = 0
currency = "$"

[submission]
access_key = "k-123"
"#,
        )
        .unwrap();

        let config = Config::load(path.to_str()).unwrap();
        assert_eq!(config.ui.transition_ms, 0);
        assert_eq!(config.ui.currency, "$");
        assert_eq!(config.submission.access_key, "k-123");
        // Untouched sections keep their defaults
        assert_eq!(config.session.ttl_minutes, 120);
        assert_eq!(config.ui.dismiss_delay_ms, 500);
    }

    #[test]
    fn test_save_writes_loadable_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.session.ttl_minutes = 15;
        config.save_to(&path).unwrap();

        let loaded = Config::load(path.to_str()).unwrap();
        assert_eq!(loaded.session.ttl_minutes, 15);
        assert_eq!(loaded.catalog, Config::default().catalog);
    }

    #[test]
    fn test_relative_state_path_is_absolute() {
        let config = Config::default();
        assert!(config.state_path().is_absolute());
        assert!(config.logs_path().ends_with(".enclosure-quote/logs"));
    }
}

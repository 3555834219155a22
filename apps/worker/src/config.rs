use std::time::Duration;
use std::{env, fmt, fs, io, path};

use logger::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monitoring::scheduler::DEFAULT_INTERVAL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed { path: path::PathBuf, source: io::Error },

    #[error("Failed to write config file {path}: {source}")]
    WriteFailed { path: path::PathBuf, source: io::Error },

    #[error("Failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),

    #[error("No config directory available (set XDG_CONFIG_HOME or HOME)")]
    ConfigPathUnavailable,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub worker: WorkerConfig,
    pub store: StoreConfig,
    pub notifier: NotifierConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Seconds between ticks
    pub interval_seconds: u64,
    /// Store collection holding the checks
    pub collection: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: path::PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Log,
    Webhook,
}

impl fmt::Display for NotifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifierKind::Log => write!(f, "log"),
            NotifierKind::Webhook => write!(f, "webhook"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub kind: NotifierKind,
    pub webhook_url: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { interval_seconds: DEFAULT_INTERVAL.as_secs(), collection: "checks".into() }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { data_dir: ".data".into() }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self { kind: NotifierKind::Log, webhook_url: None, timeout_seconds: 5 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into(), format: LogFormat::Compact }
    }
}

impl WorkerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl NotifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/checkup/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Ok(home_dir) = env::var("HOME") {
        path::PathBuf::from(home_dir).join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("checkup/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Worker Configuration:")?;
        write_title_1(f, "Worker")?;
        write_1(f, "Interval (seconds)", &self.worker.interval_seconds)?;
        write_1(f, "Collection", &self.worker.collection)?;
        write_title_1(f, "Store")?;
        write_1(f, "Data Directory", &self.store.data_dir.display())?;
        write_title_1(f, "Notifier")?;
        write_1(f, "Kind", &self.notifier.kind)?;
        write_1(f, "Webhook URL", &self.notifier.webhook_url.as_deref().unwrap_or("-"))?;
        write_1(f, "Timeout (seconds)", &self.notifier.timeout_seconds)?;
        write_title_1(f, "Logging")?;
        write_1(f, "Level", &self.logging.level)?;
        write_1(f, "Format", &self.logging.format)?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/checkup/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    ///
    /// ```ignore
    /// let cfg = config::Config::from_config(None::<&path::Path>)?;
    /// println!("{}", cfg);
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        let config = if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path)
                .map_err(|source| ConfigError::ReadFailed { path: config_path.clone(), source })?;
            Self::from_toml(&raw_string)?
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::WriteFailed { path: path.to_path_buf(), source })?;
        }

        fs::write(path, config_str)
            .map_err(|source| ConfigError::WriteFailed { path: path.to_path_buf(), source })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker.interval_seconds == 0 {
            return Err(ConfigError::Invalid("worker.interval_seconds must be at least 1".into()));
        }
        if self.worker.collection.trim().is_empty() {
            return Err(ConfigError::Invalid("worker.collection cannot be empty".into()));
        }
        if self.notifier.kind == NotifierKind::Webhook && self.notifier.webhook_url.is_none() {
            return Err(ConfigError::Invalid("notifier.webhook_url is required for webhook alerts".into()));
        }
        if self.notifier.timeout_seconds == 0 {
            return Err(ConfigError::Invalid("notifier.timeout_seconds must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.worker.interval(), Duration::from_secs(60));
        assert_eq!(config.worker.collection, "checks");
        assert_eq!(config.store.data_dir, path::PathBuf::from(".data"));
        assert_eq!(config.notifier.kind, NotifierKind::Log);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [worker]
            interval_seconds = 15

            [notifier]
            kind = "webhook"
            webhook_url = "https://alerts.example.com/hook"
            "#,
        )
        .unwrap();

        assert_eq!(config.worker.interval_seconds, 15);
        assert_eq!(config.worker.collection, "checks");
        assert_eq!(config.notifier.kind, NotifierKind::Webhook);
        assert_eq!(config.notifier.timeout_seconds, 5);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let config = Config::from_toml("[worker]\ninterval_seconds = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config::from_toml("[notifier]\nkind = \"webhook\"\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        assert!(matches!(Config::from_toml("[notifier]\nkind = \"sms\"\n"), Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config");

        let config = Config::from_config(Some(&path)).unwrap();
        assert_eq!(config, Config::default());

        let written = dir.path().join("nested/config.toml");
        assert!(written.exists());
        assert_eq!(Config::from_config(Some(&written)).unwrap(), Config::default());
    }

    #[test]
    fn test_display_lists_sections() {
        let rendered = Config::default().to_string();
        assert!(rendered.contains("Interval (seconds): 60"));
        assert!(rendered.contains("Data Directory: .data"));
        assert!(rendered.contains("Kind: log"));
        assert!(rendered.contains("Format: compact"));
    }
}

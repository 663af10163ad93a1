//! centerlink.toml configuration parser.
//!
//! Every section is optional; missing values fall back to defaults.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "centerlink.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CenterlinkConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Order size tokens accepted at intake.
    #[serde(default = "default_accepted_sizes")]
    pub accepted_sizes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing-subscriber` env-filter directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_bind() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/var/lib/centerlink")
}

fn default_accepted_sizes() -> Vec<String> {
    ["S", "M", "B"].iter().map(|s| s.to_string()).collect()
}

fn default_log_filter() -> String {
    "info,centerlinkd=debug,centerlink=debug".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            accepted_sizes: default_accepted_sizes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

impl StorageConfig {
    /// Path of the redb database inside the data directory.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("centerlink.redb")
    }
}

impl CenterlinkConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CenterlinkConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if given, else `centerlink.toml` if present, else defaults.
    ///
    /// An explicitly given path must exist.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CenterlinkConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.intake.accepted_sizes, vec!["S", "M", "B"]);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(
            config.storage.db_path(),
            PathBuf::from("/var/lib/centerlink/centerlink.redb")
        );
    }

    #[test]
    fn test_parse_empty() {
        let config: CenterlinkConfig = toml::from_str("").unwrap();
        assert_eq!(config, CenterlinkConfig::default());
    }

    #[test]
    fn test_parse_partial() {
        let toml_str = r#"
[server]
port = 9000

[intake]
accepted_sizes = ["XS", "XL"]

[logging]
format = "json"
"#;
        let config: CenterlinkConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, default_bind());
        assert_eq!(config.intake.accepted_sizes, vec!["XS", "XL"]);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, default_log_filter());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("centerlink.toml");

        let mut config = CenterlinkConfig::default();
        config.storage.data_dir = dir.path().to_path_buf();
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        let loaded = CenterlinkConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(CenterlinkConfig::load_or_default(Some(&missing)).is_err());
    }
}

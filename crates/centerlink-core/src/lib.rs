pub mod config;

pub use config::{CenterlinkConfig, IntakeConfig, LogFormat, LoggingConfig, ServerConfig, StorageConfig};

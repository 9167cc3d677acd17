pub mod toml_config;

pub use toml_config::{JsonConfig, LoggingConfig, MiscConfig, TimezoneConfig, WorkerConfig};

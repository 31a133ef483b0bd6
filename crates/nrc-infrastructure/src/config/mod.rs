//! Configuration
//!
//! Figment-backed loading of [`AppConfig`] from defaults, a TOML file and
//! `NRC_`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AppConfig, ClientDefaults, ClientSettings, LoggingConfig, RetryConfig};

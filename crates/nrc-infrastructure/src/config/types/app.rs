//! Main application configuration

use super::client::{ClientDefaults, ClientSettings, RetryConfig};
use super::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration document
///
/// ```toml
/// [client_defaults]
/// read_timeout_ms = 2000
///
/// [clients.users]
/// servers = ["users-1:8080", "users-2:8080"]
///
/// [retry]
/// enabled = true
///
/// [properties]
/// "users.name" = "users"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Settings applied to every client unless overridden
    pub client_defaults: ClientDefaults,

    /// Per-service client settings keyed by service name
    pub clients: BTreeMap<String, ClientSettings>,

    /// Retry wiring for load-balanced calls
    pub retry: RetryConfig,

    /// Values for `${...}` placeholders in client declarations
    pub properties: BTreeMap<String, String>,
}

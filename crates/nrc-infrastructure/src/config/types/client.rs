//! Client configuration types

use crate::constants::*;
use serde::{Deserialize, Serialize};

/// Settings shared by every client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientDefaults {
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,

    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,

    /// Retries against the same server
    pub max_auto_retries: u32,

    /// Retries against the next server
    pub max_auto_retries_next_server: u32,

    /// Retry non-GET requests as well
    pub ok_to_retry_on_all_operations: bool,

    /// Response statuses that trigger a retry
    pub retryable_status_codes: Vec<u16>,

    /// Pause between retries in milliseconds
    pub retry_backoff_ms: u64,

    /// Ports reached over TLS
    pub secure_ports: Vec<u16>,

    /// Treat 404 as an empty result instead of an error
    pub decode_404: bool,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            max_auto_retries: DEFAULT_MAX_AUTO_RETRIES,
            max_auto_retries_next_server: DEFAULT_MAX_AUTO_RETRIES_NEXT_SERVER,
            ok_to_retry_on_all_operations: false,
            retryable_status_codes: Vec::new(),
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            secure_ports: DEFAULT_SECURE_PORTS.to_vec(),
            decode_404: false,
        }
    }
}

/// Settings for one service; unset fields fall back to [`ClientDefaults`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Static server list as `host:port`
    pub servers: Vec<String>,

    /// Connection timeout override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,

    /// Read timeout override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_timeout_ms: Option<u64>,

    /// Same-server retry override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_auto_retries: Option<u32>,

    /// Next-server retry override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_auto_retries_next_server: Option<u32>,

    /// Retry-all-operations override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok_to_retry_on_all_operations: Option<bool>,

    /// Retryable status override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable_status_codes: Option<Vec<u16>>,

    /// Backoff override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_backoff_ms: Option<u64>,

    /// Secure port override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_ports: Option<Vec<u16>>,
}

impl ClientSettings {
    /// Settings with only a server list
    pub fn with_servers<I, S>(servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            servers: servers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Retry wiring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Wrap load-balanced clients with the configured retry policy
    pub enabled: bool,
}

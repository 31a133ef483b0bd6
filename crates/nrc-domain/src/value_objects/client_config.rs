//! Effective per-service client configuration

use super::service::{ServerEndpoint, ServiceName};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resolved client settings for one service
///
/// Produced inside the service's scope by merging the global client defaults
/// with the service-specific overrides. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service this configuration belongs to
    pub service: ServiceName,
    /// Static server list for the service
    pub servers: Vec<ServerEndpoint>,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Read timeout applied to each request
    pub read_timeout: Duration,
    /// Retries against the same server
    pub max_auto_retries: u32,
    /// Retries against other servers
    pub max_auto_retries_next_server: u32,
    /// Retry non-GET requests too
    pub ok_to_retry_on_all_operations: bool,
    /// Status codes that trigger a retry
    pub retryable_status_codes: Vec<u16>,
    /// Pause between retry attempts
    pub retry_backoff: Duration,
    /// Ports that are served over TLS
    pub secure_ports: Vec<u16>,
    /// Treat 404 as an empty result instead of an error
    pub decode_404: bool,
}

impl ClientConfig {
    /// Whether a status code should be retried
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Whether the given port is served over TLS
    pub fn is_secure_port(&self, port: u16) -> bool {
        self.secure_ports.contains(&port)
    }
}

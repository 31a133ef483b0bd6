//! Effective client configuration
//!
//! Merges `[client_defaults]` with the service's `[clients.<name>]` table.

use crate::config::AppConfig;
use nrc_domain::error::{Error, Result};
use nrc_domain::value_objects::{ClientConfig, ServerEndpoint, ServiceName};
use std::time::Duration;

/// Resolve the effective client configuration for `service`
///
/// Fails with `Error::Resolution` when the service has no `clients` entry or
/// one of its servers is malformed.
pub fn resolve_client_config(service: &ServiceName, app: &AppConfig) -> Result<ClientConfig> {
    let settings = app.clients.get(service.as_str()).ok_or_else(|| {
        Error::resolution(
            service.as_str(),
            format!("no client configuration under [clients.{service}]"),
        )
    })?;
    let defaults = &app.client_defaults;

    let servers = settings
        .servers
        .iter()
        .map(|server| {
            server
                .parse::<ServerEndpoint>()
                .map_err(|e| Error::resolution(service.as_str(), e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ClientConfig {
        service: service.clone(),
        servers,
        connect_timeout: Duration::from_millis(
            settings
                .connect_timeout_ms
                .unwrap_or(defaults.connect_timeout_ms),
        ),
        read_timeout: Duration::from_millis(
            settings.read_timeout_ms.unwrap_or(defaults.read_timeout_ms),
        ),
        max_auto_retries: settings
            .max_auto_retries
            .unwrap_or(defaults.max_auto_retries),
        max_auto_retries_next_server: settings
            .max_auto_retries_next_server
            .unwrap_or(defaults.max_auto_retries_next_server),
        ok_to_retry_on_all_operations: settings
            .ok_to_retry_on_all_operations
            .unwrap_or(defaults.ok_to_retry_on_all_operations),
        retryable_status_codes: settings
            .retryable_status_codes
            .clone()
            .unwrap_or_else(|| defaults.retryable_status_codes.clone()),
        retry_backoff: Duration::from_millis(
            settings.retry_backoff_ms.unwrap_or(defaults.retry_backoff_ms),
        ),
        secure_ports: settings
            .secure_ports
            .clone()
            .unwrap_or_else(|| defaults.secure_ports.clone()),
        decode_404: defaults.decode_404,
    })
}

//! Retry Policy Port

use crate::value_objects::{ClientConfig, HttpMethod};
use std::sync::Arc;
use std::time::Duration;

/// State of the retry loop for one logical call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryContext {
    /// Verb of the call being retried
    pub method: HttpMethod,
    /// Retries already spent on the current server
    pub same_server_retries: u32,
    /// Retries already spent moving to another server
    pub next_server_retries: u32,
}

impl RetryContext {
    /// Fresh context before the first attempt
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            same_server_retries: 0,
            next_server_retries: 0,
        }
    }
}

/// Decides whether a failed attempt may be repeated
pub trait RetryPolicy: Send + Sync {
    /// Another attempt against the server that just failed
    fn can_retry_same_server(&self, context: &RetryContext) -> bool;

    /// Another attempt against a newly chosen server
    fn can_retry_next_server(&self, context: &RetryContext) -> bool;

    /// Whether a response status should be treated as a retryable failure
    fn is_retryable_status(&self, status: u16) -> bool;

    /// Pause before the next attempt
    fn backoff(&self) -> Duration {
        Duration::ZERO
    }
}

/// Builds a retry policy for a service
///
/// Injected into the caching client factory; when present, clients are
/// built in their retrying form.
pub trait RetryPolicyFactory: Send + Sync {
    /// Policy for the service, or `None` to build a plain client
    fn create(&self, config: &ClientConfig) -> Option<Arc<dyn RetryPolicy>>;
}

//! Configuration-driven retry policy

use nrc_domain::ports::{RetryContext, RetryPolicy, RetryPolicyFactory};
use nrc_domain::value_objects::ClientConfig;
use std::sync::Arc;
use std::time::Duration;

/// Retry policy built from a service's [`ClientConfig`]
///
/// Only idempotent reads are retried unless the service allows retrying all
/// operations.
#[derive(Debug, Clone)]
pub struct ConfigRetryPolicy {
    max_same_server: u32,
    max_next_server: u32,
    retry_all_operations: bool,
    retryable_statuses: Vec<u16>,
    backoff: Duration,
}

impl ConfigRetryPolicy {
    /// Policy for `config`
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_same_server: config.max_auto_retries,
            max_next_server: config.max_auto_retries_next_server,
            retry_all_operations: config.ok_to_retry_on_all_operations,
            retryable_statuses: config.retryable_status_codes.clone(),
            backoff: config.retry_backoff,
        }
    }

    fn allows(&self, context: &RetryContext) -> bool {
        self.retry_all_operations || context.method.is_idempotent_read()
    }
}

impl RetryPolicy for ConfigRetryPolicy {
    fn can_retry_same_server(&self, context: &RetryContext) -> bool {
        self.allows(context) && context.same_server_retries < self.max_same_server
    }

    fn can_retry_next_server(&self, context: &RetryContext) -> bool {
        self.allows(context) && context.next_server_retries < self.max_next_server
    }

    fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    fn backoff(&self) -> Duration {
        self.backoff
    }
}

/// Builds a [`ConfigRetryPolicy`] for every service
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigRetryPolicyFactory;

impl RetryPolicyFactory for ConfigRetryPolicyFactory {
    fn create(&self, config: &ClientConfig) -> Option<Arc<dyn RetryPolicy>> {
        let policy: Arc<dyn RetryPolicy> = Arc::new(ConfigRetryPolicy::from_config(config));
        Some(policy)
    }
}

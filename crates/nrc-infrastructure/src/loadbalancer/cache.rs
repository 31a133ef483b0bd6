//! Caching client factory
//!
//! Builds at most one [`LoadBalancedClient`] per service name and hands the
//! same instance to every caller. Building resolves the client configuration,
//! the load balancer and the server introspector from the service's scope.
//! A failed build is reported as `Error::Resolution` and is not cached.

use super::client::LoadBalancedClient;
use super::introspector::DefaultServerIntrospector;
use crate::context::NamedContextFactory;
use dashmap::DashMap;
use nrc_domain::error::{Error, Result};
use nrc_domain::ports::{LoadBalancer, RetryPolicyFactory, ServerIntrospector};
use nrc_domain::value_objects::{ClientConfig, ServiceName};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-service cache of load-balanced clients
pub struct CachingLoadBalancerFactory {
    factory: Arc<NamedContextFactory>,
    retry_factory: Option<Arc<dyn RetryPolicyFactory>>,
    cache: DashMap<ServiceName, Arc<OnceCell<Arc<LoadBalancedClient>>>>,
}

impl CachingLoadBalancerFactory {
    /// Factory building plain clients
    pub fn new(factory: Arc<NamedContextFactory>) -> Self {
        Self {
            factory,
            retry_factory: None,
            cache: DashMap::new(),
        }
    }

    /// Factory building retrying clients
    pub fn with_retry_factory(
        factory: Arc<NamedContextFactory>,
        retry_factory: Arc<dyn RetryPolicyFactory>,
    ) -> Self {
        Self {
            factory,
            retry_factory: Some(retry_factory),
            cache: DashMap::new(),
        }
    }

    /// The client for `name`, built on first use
    ///
    /// Concurrent first calls for the same name build exactly one client.
    pub fn create(&self, name: &ServiceName) -> Result<Arc<LoadBalancedClient>> {
        if let Some(client) = self.cache.get(name).and_then(|cell| cell.get().cloned()) {
            return Ok(client);
        }
        let cell = self.cache.entry(name.clone()).or_default().clone();
        let client = cell.get_or_try_init(|| self.build(name))?;
        Ok(Arc::clone(client))
    }

    fn build(&self, name: &ServiceName) -> Result<Arc<LoadBalancedClient>> {
        let config = self
            .factory
            .get_instance::<ClientConfig>(name)
            .map_err(|e| as_resolution(name, e))?;
        let load_balancer = self
            .factory
            .get_instance::<dyn LoadBalancer>(name)
            .map_err(|e| as_resolution(name, e))?;
        let introspector: Arc<dyn ServerIntrospector> = match self
            .factory
            .find_instance::<dyn ServerIntrospector>(name)
            .map_err(|e| as_resolution(name, e))?
        {
            Some(introspector) => introspector,
            None => Arc::new(DefaultServerIntrospector::new(config.secure_ports.clone())),
        };

        let mut client =
            LoadBalancedClient::new(name.clone(), load_balancer, Arc::clone(&config), introspector);
        if let Some(policy) = self
            .retry_factory
            .as_ref()
            .and_then(|retry_factory| retry_factory.create(&config))
        {
            client = client.with_retry_policy(policy);
        }

        info!(
            service = %name,
            servers = client.load_balancer().servers().len(),
            retryable = client.is_retryable(),
            "Built load-balanced client"
        );
        Ok(Arc::new(client))
    }

    /// Number of clients built so far
    pub fn len(&self) -> usize {
        self.cache
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Whether no client has been built yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a client for `name` has been built
    pub fn contains(&self, name: &ServiceName) -> bool {
        self.cache
            .get(name)
            .is_some_and(|cell| cell.get().is_some())
    }

    /// Whether built clients retry
    pub fn is_retrying(&self) -> bool {
        self.retry_factory.is_some()
    }

    /// Forget every cached client
    pub fn clear(&self) {
        self.cache.clear();
        debug!("Load-balanced client cache cleared");
    }
}

/// Any failure to assemble the client means the service cannot be resolved
fn as_resolution(name: &ServiceName, error: Error) -> Error {
    match error {
        Error::Resolution { .. } => error,
        Error::NotFound { resource } => {
            Error::resolution(name.as_str(), format!("{resource} is not available"))
        }
        other => Error::resolution(name.as_str(), other.to_string()),
    }
}

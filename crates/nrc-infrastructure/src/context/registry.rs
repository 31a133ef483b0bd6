//! Configuration registry
//!
//! Maps service names to the bundles declared for them. The reserved name
//! [`DEFAULT_CONTEXT_NAME`] holds the global bundles that every named scope
//! receives. Registration happens during startup; [`ConfigRegistry::freeze`]
//! ends that phase and later registrations are rejected.

use super::bundle::Bundle;
use dashmap::DashMap;
use nrc_domain::constants::DEFAULT_CONTEXT_NAME;
use nrc_domain::error::{Error, Result};
use nrc_domain::value_objects::ServiceName;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Bundles declared for one service
#[derive(Debug, Clone)]
pub struct Specification {
    name: String,
    bundles: Vec<Bundle>,
}

impl Specification {
    /// Service name (or the reserved default name)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bundles in registration order
    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }
}

/// Registry of per-service configuration bundles
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    specifications: DashMap<String, Specification>,
    frozen: AtomicBool,
}

impl ConfigRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bundles for a service
    ///
    /// Registering under the reserved default name is the same as
    /// [`ConfigRegistry::register_default`].
    pub fn register<I>(&self, name: &ServiceName, bundles: I) -> Result<()>
    where
        I: IntoIterator<Item = Bundle>,
    {
        self.append(name.as_str(), bundles)
    }

    /// Append global bundles applied to every named scope
    pub fn register_default<I>(&self, bundles: I) -> Result<()>
    where
        I: IntoIterator<Item = Bundle>,
    {
        self.append(DEFAULT_CONTEXT_NAME, bundles)
    }

    fn append<I>(&self, name: &str, bundles: I) -> Result<()>
    where
        I: IntoIterator<Item = Bundle>,
    {
        if self.is_frozen() {
            return Err(Error::configuration(format!(
                "Cannot register configuration for '{name}' after startup"
            )));
        }
        let mut specification = self
            .specifications
            .entry(name.to_string())
            .or_insert_with(|| Specification {
                name: name.to_string(),
                bundles: Vec::new(),
            });
        let before = specification.bundles.len();
        specification.bundles.extend(bundles);
        debug!(
            name,
            added = specification.bundles.len() - before,
            "Configuration registered"
        );
        Ok(())
    }

    /// Stop accepting registrations
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    /// Whether registrations are closed
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Bundles declared for `name`, if any
    pub fn specification(&self, name: &ServiceName) -> Option<Specification> {
        self.specifications
            .get(name.as_str())
            .map(|entry| entry.value().clone())
    }

    /// Global bundles, in registration order
    pub fn default_bundles(&self) -> Vec<Bundle> {
        self.specifications
            .get(DEFAULT_CONTEXT_NAME)
            .map(|entry| entry.bundles.clone())
            .unwrap_or_default()
    }

    /// Service names with declared bundles, sorted, excluding the default
    pub fn names(&self) -> Vec<ServiceName> {
        let mut names: Vec<ServiceName> = self
            .specifications
            .iter()
            .filter(|entry| entry.key() != DEFAULT_CONTEXT_NAME)
            .filter_map(|entry| ServiceName::new(entry.key().clone()).ok())
            .collect();
        names.sort();
        names
    }
}

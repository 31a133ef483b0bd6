//! Named context factory
//!
//! Creates one [`Scope`] per service name on first use and caches it. The
//! scope receives, in order: the factory's default bundle, the global
//! bundles, the service's own bundles and finally the [`ContextName`] of the
//! scope. Lookups that miss fall back to the shared root scope.

use super::bundle::Bundle;
use super::registry::ConfigRegistry;
use super::scope::Scope;
use dashmap::DashMap;
use nrc_domain::error::Result;
use nrc_domain::value_objects::{ContextName, ServiceName};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info};

/// Factory of per-service scopes
pub struct NamedContextFactory {
    registry: Arc<ConfigRegistry>,
    defaults: Bundle,
    parent: Arc<Scope>,
    scopes: DashMap<ServiceName, Arc<OnceCell<Arc<Scope>>>>,
}

impl NamedContextFactory {
    /// Create a factory over `registry`, applying `defaults` first in every scope
    pub fn new(registry: Arc<ConfigRegistry>, defaults: Bundle, parent: Arc<Scope>) -> Self {
        Self {
            registry,
            defaults,
            parent,
            scopes: DashMap::new(),
        }
    }

    /// The scope for `name`, creating it on first use
    ///
    /// Concurrent callers for the same name observe the same scope.
    pub fn get_scope(&self, name: &ServiceName) -> Arc<Scope> {
        if let Some(scope) = self.scopes.get(name).and_then(|cell| cell.get().cloned()) {
            return scope;
        }
        let cell = self.scopes.entry(name.clone()).or_default().clone();
        Arc::clone(cell.get_or_init(|| self.create_scope(name)))
    }

    fn create_scope(&self, name: &ServiceName) -> Arc<Scope> {
        let identity = Bundle::new(format!("{name}-context-name"))
            .value::<ContextName>(Arc::new(ContextName(name.clone())));
        let globals = self.registry.default_bundles();
        let own = self
            .registry
            .specification(name)
            .map(|spec| spec.bundles().to_vec())
            .unwrap_or_default();

        let bundles = std::iter::once(&self.defaults)
            .chain(globals.iter())
            .chain(own.iter())
            .chain(std::iter::once(&identity));
        let scope = Scope::named(name.as_str(), bundles, Arc::clone(&self.parent));

        info!(
            service = %name,
            global_bundles = globals.len(),
            own_bundles = own.len(),
            definitions = scope.definition_count(),
            "Created client scope"
        );
        Arc::new(scope)
    }

    /// Resolve `T` in the scope for `name`
    pub fn get_instance<T>(&self, name: &ServiceName) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_scope(name).get::<T>()
    }

    /// Resolve `T` under `qualifier` in the scope for `name`
    pub fn get_named_instance<T>(&self, name: &ServiceName, qualifier: &str) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_scope(name).get_named::<T>(qualifier)
    }

    /// Resolve `T` in the scope for `name`, `None` when undefined
    pub fn find_instance<T>(&self, name: &ServiceName) -> Result<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_scope(name).find::<T>()
    }

    /// Names of scopes created so far, sorted
    pub fn context_names(&self) -> Vec<ServiceName> {
        let mut names: Vec<ServiceName> = self
            .scopes
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Whether the scope for `name` has been created
    pub fn has_scope(&self, name: &ServiceName) -> bool {
        self.scopes
            .get(name)
            .is_some_and(|cell| cell.get().is_some())
    }

    /// The registry backing this factory
    pub fn registry(&self) -> &Arc<ConfigRegistry> {
        &self.registry
    }

    /// The shared root scope
    pub fn parent(&self) -> &Arc<Scope> {
        &self.parent
    }

    /// Close every scope and forget them
    pub fn destroy(&self) {
        let mut closed = 0usize;
        for entry in self.scopes.iter() {
            if let Some(scope) = entry.value().get() {
                scope.close();
                closed += 1;
            }
        }
        self.scopes.clear();
        debug!(closed, "Client scopes destroyed");
    }
}

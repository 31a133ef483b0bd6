//! Capability scopes
//!
//! A [`Scope`] owns the definitions applied to it and the singletons built
//! from them. Named scopes fall back to their parent (the root scope) for
//! anything they do not define themselves; the parent never sees the
//! children's definitions.

use super::bundle::{Bundle, Definition, DefinitionKey, Instance};
use crate::constants::ROOT_BUNDLE_NAME;
use dashmap::DashMap;
use nrc_domain::error::{Error, Result};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

thread_local! {
    // Definitions currently being built on this thread, innermost last
    static RESOLVING: RefCell<Vec<(usize, DefinitionKey, &'static str)>> =
        const { RefCell::new(Vec::new()) };
}

/// Marks a definition as under construction on the current thread
struct ResolutionGuard;

impl ResolutionGuard {
    fn enter(scope: &Scope, definition: &Definition) -> Result<Self> {
        let scope_id = scope as *const Scope as usize;
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack
                .iter()
                .any(|(id, key, _)| *id == scope_id && *key == definition.key)
            {
                let path = stack
                    .iter()
                    .map(|(_, _, name)| *name)
                    .chain(std::iter::once(definition.type_name))
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(Error::configuration(format!(
                    "Circular dependency in scope '{}': {path}",
                    scope.name
                )));
            }
            stack.push((scope_id, definition.key.clone(), definition.type_name));
            Ok(Self)
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Isolated set of capabilities with lazily built singletons
///
/// Each definition is built at most once per scope, even under concurrent
/// lookups. A failed build is not cached; the next lookup tries again.
pub struct Scope {
    name: String,
    definitions: HashMap<DefinitionKey, Definition>,
    singletons: DashMap<DefinitionKey, Arc<OnceCell<Instance>>>,
    parent: Option<Arc<Scope>>,
}

impl Scope {
    /// Build the root scope from process-wide bundles
    pub fn root<I>(bundles: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Bundle>,
    {
        let bundles: Vec<Bundle> = bundles.into_iter().collect();
        Arc::new(Self::assemble(ROOT_BUNDLE_NAME, bundles.iter(), None))
    }

    /// Build a named scope whose misses fall back to `parent`
    pub(crate) fn named<'a, I>(name: &str, bundles: I, parent: Arc<Scope>) -> Self
    where
        I: IntoIterator<Item = &'a Bundle>,
    {
        Self::assemble(name, bundles, Some(parent))
    }

    fn assemble<'a, I>(name: &str, bundles: I, parent: Option<Arc<Scope>>) -> Self
    where
        I: IntoIterator<Item = &'a Bundle>,
    {
        let mut definitions = HashMap::new();
        for bundle in bundles {
            for definition in bundle.definitions() {
                // Later bundles override earlier ones for the same key
                if definitions
                    .insert(definition.key.clone(), definition.clone())
                    .is_some()
                {
                    debug!(
                        scope = name,
                        bundle = bundle.name(),
                        capability = definition.type_name,
                        "Definition overridden"
                    );
                }
            }
        }
        Self {
            name: name.to_string(),
            definitions,
            singletons: DashMap::new(),
            parent,
        }
    }

    /// Scope name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent scope, if any
    pub fn parent(&self) -> Option<&Arc<Scope>> {
        self.parent.as_ref()
    }

    /// Resolve the unqualified capability `T`
    pub fn get<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve::<T>(&DefinitionKey::of::<T>(None))
    }

    /// Resolve the capability `T` registered under `qualifier`
    pub fn get_named<T>(&self, qualifier: &str) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve::<T>(&DefinitionKey::of::<T>(Some(qualifier)))
    }

    /// Resolve `T` if it is defined here or in the parent
    ///
    /// Absence yields `Ok(None)`; a failing factory still yields `Err`.
    pub fn find<T>(&self) -> Result<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        if self.contains::<T>() {
            self.get::<T>().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Whether `T` is defined here or in the parent
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.contains_key(&DefinitionKey::of::<T>(None))
    }

    /// Whether `T` under `qualifier` is defined here or in the parent
    pub fn contains_named<T: ?Sized + 'static>(&self, qualifier: &str) -> bool {
        self.contains_key(&DefinitionKey::of::<T>(Some(qualifier)))
    }

    /// Whether `T` is defined in this scope itself
    pub fn contains_local<T: ?Sized + 'static>(&self) -> bool {
        self.definitions.contains_key(&DefinitionKey::of::<T>(None))
    }

    fn contains_key(&self, key: &DefinitionKey) -> bool {
        self.definitions.contains_key(key)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.contains_key(key))
    }

    /// Number of definitions applied to this scope
    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Number of singletons built so far
    pub fn instantiated_count(&self) -> usize {
        self.singletons
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Drop every singleton built in this scope
    ///
    /// Instances already handed out stay alive with their holders.
    pub fn close(&self) {
        let released = self.instantiated_count();
        self.singletons.clear();
        debug!(scope = %self.name, released, "Scope closed");
    }

    fn resolve<T>(&self, key: &DefinitionKey) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        if let Some(definition) = self.definitions.get(key) {
            return self.instantiate::<T>(definition);
        }
        if let Some(parent) = &self.parent {
            if parent.contains_key(key) {
                return parent.resolve::<T>(key);
            }
        }
        let type_name = std::any::type_name::<T>();
        let resource = match key.qualifier() {
            Some(qualifier) => format!("{type_name} '{qualifier}' in scope '{}'", self.name),
            None => format!("{type_name} in scope '{}'", self.name),
        };
        Err(Error::not_found(resource))
    }

    fn instantiate<T>(&self, definition: &Definition) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let cell = self
            .singletons
            .entry(definition.key.clone())
            .or_default()
            .clone();

        let instance = match cell.get() {
            Some(instance) => instance,
            None => {
                // Re-entering a cell that is being initialized would deadlock
                let _guard = ResolutionGuard::enter(self, definition)?;
                cell.get_or_try_init(|| {
                    debug!(scope = %self.name, capability = definition.type_name, "Creating instance");
                    (definition.factory)(self)
                })?
            }
        };

        let any: &(dyn Any + Send + Sync) = &**instance;
        any.downcast_ref::<Arc<T>>().cloned().ok_or_else(|| {
            Error::internal(format!(
                "Capability type mismatch for {}",
                definition.type_name
            ))
        })
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("name", &self.name)
            .field("definitions", &self.definitions.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

//! Configuration bundles
//!
//! A [`Bundle`] is a named, ordered list of capability definitions. Each
//! definition is keyed by the capability's type (plus an optional qualifier)
//! and carries a factory that builds the instance inside a [`Scope`].

use super::scope::Scope;
use nrc_domain::error::Result;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Type-erased instance: a boxed `Arc<T>`
pub(crate) type Instance = Box<dyn Any + Send + Sync>;

type InstanceFactory = dyn Fn(&Scope) -> Result<Instance> + Send + Sync;

/// Lookup key of a capability definition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DefinitionKey {
    type_id: TypeId,
    qualifier: Option<String>,
}

impl DefinitionKey {
    /// Key for type `T`, optionally qualified
    pub fn of<T: ?Sized + 'static>(qualifier: Option<&str>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            qualifier: qualifier.map(str::to_string),
        }
    }

    /// The qualifier, if any
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }
}

/// One capability definition
#[derive(Clone)]
pub struct Definition {
    pub(crate) key: DefinitionKey,
    pub(crate) type_name: &'static str,
    pub(crate) factory: Arc<InstanceFactory>,
}

impl Definition {
    /// The lookup key
    pub fn key(&self) -> &DefinitionKey {
        &self.key
    }

    /// Rust type name of the capability
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("type_name", &self.type_name)
            .field("qualifier", &self.key.qualifier)
            .finish()
    }
}

/// Named set of capability definitions
///
/// Within a scope, definitions are applied bundle by bundle; for the same
/// key the definition applied last wins.
///
/// # Example
///
/// ```ignore
/// let bundle = Bundle::new("users-config")
///     .value::<Greeting>(Arc::new(Greeting("hi".into())))
///     .provide::<dyn Fallback, _>(|_scope| {
///         let fallback: Arc<dyn Fallback> = Arc::new(UserFallback);
///         Ok(fallback)
///     });
/// ```
#[derive(Clone)]
pub struct Bundle {
    name: String,
    definitions: Vec<Definition>,
}

impl Bundle {
    /// Create an empty bundle
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            definitions: Vec::new(),
        }
    }

    /// Define an unqualified capability built lazily by `factory`
    pub fn provide<T, F>(self, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.define::<T, F>(None, factory)
    }

    /// Define a qualified capability built lazily by `factory`
    pub fn provide_named<T, F>(self, qualifier: &str, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.define::<T, F>(Some(qualifier), factory)
    }

    /// Define an unqualified capability from an existing instance
    pub fn value<T>(self, value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.provide::<T, _>(move |_| Ok(Arc::clone(&value)))
    }

    /// Define a qualified capability from an existing instance
    pub fn value_named<T>(self, qualifier: &str, value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.provide_named::<T, _>(qualifier, move |_| Ok(Arc::clone(&value)))
    }

    fn define<T, F>(mut self, qualifier: Option<&str>, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let erased = move |scope: &Scope| -> Result<Instance> {
            let instance: Instance = Box::new(factory(scope)?);
            Ok(instance)
        };
        self.definitions.push(Definition {
            key: DefinitionKey::of::<T>(qualifier),
            type_name: std::any::type_name::<T>(),
            factory: Arc::new(erased),
        });
        self
    }

    /// Bundle name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Definitions in declaration order
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the bundle defines nothing
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("name", &self.name)
            .field("definitions", &self.definitions)
            .finish()
    }
}

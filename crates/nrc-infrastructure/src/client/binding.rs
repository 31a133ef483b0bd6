//! Resolved client bindings
//!
//! A [`ClientBinding`] is a declaration after placeholder resolution, name
//! normalization and validation. It is immutable and shared by every call
//! through the bound client.

use nrc_domain::error::{Error, Result};
use nrc_domain::value_objects::{ComponentRef, MethodDescriptor, ServiceName};
use std::collections::HashMap;

/// Dispatch table of a remote interface, keyed by method name
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: HashMap<String, MethodDescriptor>,
}

impl MethodTable {
    /// Build the table; duplicate or blank method names are rejected
    pub fn new<I>(interface: &str, methods: I) -> Result<Self>
    where
        I: IntoIterator<Item = MethodDescriptor>,
    {
        let mut table = HashMap::new();
        for descriptor in methods {
            if descriptor.name.trim().is_empty() {
                return Err(Error::configuration(format!(
                    "Interface '{interface}' declares a method without a name"
                )));
            }
            if descriptor.path.matches('{').count() != descriptor.path.matches('}').count() {
                return Err(Error::configuration(format!(
                    "Method '{}' of '{interface}' has an unbalanced path template '{}'",
                    descriptor.name, descriptor.path
                )));
            }
            if let Some(previous) = table.insert(descriptor.name.clone(), descriptor) {
                return Err(Error::configuration(format!(
                    "Interface '{interface}' declares method '{}' more than once",
                    previous.name
                )));
            }
        }
        Ok(Self { methods: table })
    }

    /// Descriptor for `name`
    pub fn get(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.get(name)
    }

    /// Method names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Validated remote interface binding
#[derive(Debug, Clone)]
pub struct ClientBinding {
    /// Declaring interface type name
    pub interface: String,
    /// Scope and client cache key
    pub context_id: ServiceName,
    /// Host name used in the base URL before load balancing
    pub name: String,
    /// Direct URL, bypassing load balancing
    pub url: Option<String>,
    /// Normalized path prefix (`""` or `/segment...` without trailing slash)
    pub path: String,
    /// Treat 404 as an empty result
    pub decode_404: bool,
    /// Declared qualifier
    pub qualifier: Option<String>,
    /// Alias the client is registered under (qualifier, or `<context_id>Client`)
    pub alias: String,
    /// Preferred candidate flag
    pub primary: bool,
    /// Fallback implementation
    pub fallback: Option<ComponentRef>,
    /// Fallback factory implementation
    pub fallback_factory: Option<ComponentRef>,
    /// Dispatch table
    pub methods: MethodTable,
}

impl ClientBinding {
    /// Whether calls go through the load balancer
    pub fn is_load_balanced(&self) -> bool {
        self.url.is_none()
    }
}

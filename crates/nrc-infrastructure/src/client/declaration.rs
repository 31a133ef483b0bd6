//! Client declarations
//!
//! A [`ClientDeclaration`] is the attribute bag describing one remote
//! interface before validation. Attribute values may contain `${key}` or
//! `${key:default}` placeholders; they are resolved when the declaration is
//! registered.

use crate::context::Bundle;
use nrc_domain::value_objects::ComponentRef;

/// Declared remote interface, before validation
#[derive(Debug, Clone)]
pub struct ClientDeclaration {
    /// Name of the declaring interface type
    pub interface: String,
    /// Service name
    pub name: Option<String>,
    /// Alias of `name`
    pub value: Option<String>,
    /// Service id, preferred over `name` for the target host
    pub service_id: Option<String>,
    /// Scope and cache key; defaults to the service name
    pub context_id: Option<String>,
    /// Absolute URL bypassing load balancing
    pub url: Option<String>,
    /// Path prefix for every method
    pub path: Option<String>,
    /// Bundles registered for this client's scope
    pub configuration: Vec<Bundle>,
    /// Fallback implementation
    pub fallback: Option<ComponentRef>,
    /// Fallback factory implementation
    pub fallback_factory: Option<ComponentRef>,
    /// Alias the client is also registered under
    pub qualifier: Option<String>,
    /// Preferred candidate when several clients match
    pub primary: bool,
    /// Treat 404 as an empty result
    pub decode_404: bool,
}

impl ClientDeclaration {
    /// Declaration for `interface` with no attributes set
    pub fn new<S: Into<String>>(interface: S) -> Self {
        Self {
            interface: interface.into(),
            name: None,
            value: None,
            service_id: None,
            context_id: None,
            url: None,
            path: None,
            configuration: Vec::new(),
            fallback: None,
            fallback_factory: None,
            qualifier: None,
            primary: true,
            decode_404: false,
        }
    }

    /// Declaration named after the Rust type `I`
    pub fn for_type<I: ?Sized + 'static>() -> Self {
        Self::new(std::any::type_name::<I>())
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_value<S: Into<String>>(mut self, value: S) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_service_id<S: Into<String>>(mut self, service_id: S) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    pub fn with_context_id<S: Into<String>>(mut self, context_id: S) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a bundle to the client's own configuration
    pub fn with_configuration(mut self, bundle: Bundle) -> Self {
        self.configuration.push(bundle);
        self
    }

    pub fn with_fallback(mut self, fallback: ComponentRef) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_fallback_factory(mut self, factory: ComponentRef) -> Self {
        self.fallback_factory = Some(factory);
        self
    }

    pub fn with_qualifier<S: Into<String>>(mut self, qualifier: S) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    pub fn with_decode_404(mut self, decode_404: bool) -> Self {
        self.decode_404 = decode_404;
        self
    }
}

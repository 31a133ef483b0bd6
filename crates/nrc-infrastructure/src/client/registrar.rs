//! Remote-interface registrar
//!
//! Validates client declarations, normalizes their names, URL and path,
//! registers their configuration bundles with the [`ConfigRegistry`] and
//! records the resulting [`ClientBinding`]s.

use super::binding::{ClientBinding, MethodTable};
use super::declaration::ClientDeclaration;
use super::placeholder::resolve_attribute;
use crate::context::{Bundle, ConfigRegistry};
use nrc_domain::constants::{CLIENT_ALIAS_SUFFIX, DEFAULT_SCHEME, SCHEME_SEPARATOR};
use nrc_domain::error::{Error, Result};
use nrc_domain::ports::PropertySource;
use nrc_domain::value_objects::{ComponentRef, MethodDescriptor, ServiceName};
use reqwest::Url;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

const MAX_HOST_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// Registrar of remote-interface declarations
pub struct ClientsRegistrar {
    registry: Arc<ConfigRegistry>,
    properties: Arc<dyn PropertySource>,
    bindings: Vec<Arc<ClientBinding>>,
    interfaces: HashSet<String>,
    services: HashMap<ServiceName, String>,
    aliases: HashMap<String, String>,
}

impl ClientsRegistrar {
    /// Registrar writing into `registry`, resolving placeholders from `properties`
    pub fn new(registry: Arc<ConfigRegistry>, properties: Arc<dyn PropertySource>) -> Self {
        Self {
            registry,
            properties,
            bindings: Vec::new(),
            interfaces: HashSet::new(),
            services: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Register global bundles applied to every client scope
    pub fn default_configuration(&mut self, bundles: Vec<Bundle>) -> Result<()> {
        if bundles.is_empty() {
            return Ok(());
        }
        debug!(bundles = bundles.len(), "Registering default client configuration");
        self.registry.register_default(bundles)
    }

    /// Validate a declaration and record its binding
    pub fn register(
        &mut self,
        declaration: ClientDeclaration,
        methods: Vec<MethodDescriptor>,
    ) -> Result<Arc<ClientBinding>> {
        let interface = declaration.interface.clone();
        validate_fallbacks(&declaration)?;

        let properties = self.properties.as_ref();
        let resolve = |value: &Option<String>| resolve_attribute(value.as_deref(), properties);
        let name = resolve(&declaration.name)?;
        let value = resolve(&declaration.value)?;
        let service_id = resolve(&declaration.service_id)?;
        let context_id = resolve(&declaration.context_id)?;
        let url = resolve(&declaration.url)?;
        let path = resolve(&declaration.path)?;

        let client_name = context_id
            .or_else(|| service_id.clone())
            .or_else(|| name.clone())
            .or_else(|| value.clone())
            .ok_or_else(|| {
                Error::configuration(format!(
                    "Either 'name' or 'value' must be provided for client '{interface}'"
                ))
            })?;
        validate_host_name(&client_name)?;
        let host = match service_id.or(name).or(value) {
            Some(host) => {
                validate_host_name(&host)?;
                host
            }
            None => client_name.clone(),
        };
        let context_id = ServiceName::new(client_name)?;

        if self.interfaces.contains(&interface) {
            return Err(Error::configuration(format!(
                "Interface '{interface}' is declared more than once"
            )));
        }
        if let Some(existing) = self.services.get(&context_id) {
            return Err(Error::configuration(format!(
                "Client name '{context_id}' of '{interface}' is already used by '{existing}'"
            )));
        }
        let qualifier = declaration
            .qualifier
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        let alias = qualifier
            .clone()
            .unwrap_or_else(|| format!("{context_id}{CLIENT_ALIAS_SUFFIX}"));
        if let Some(existing) = self.aliases.get(&alias) {
            return Err(Error::configuration(format!(
                "Qualifier '{alias}' of '{interface}' is already used by '{existing}'"
            )));
        }

        let methods = MethodTable::new(&interface, methods)?;
        let url = normalize_url(url)?;
        let path = normalize_path(path.as_deref());

        if !declaration.configuration.is_empty() {
            self.registry
                .register(&context_id, declaration.configuration)?;
        }

        self.interfaces.insert(interface.clone());
        self.services.insert(context_id.clone(), interface.clone());
        self.aliases.insert(alias.clone(), interface.clone());

        let binding = Arc::new(ClientBinding {
            interface,
            context_id,
            name: host,
            url,
            path,
            decode_404: declaration.decode_404,
            qualifier,
            alias,
            primary: declaration.primary,
            fallback: declaration.fallback,
            fallback_factory: declaration.fallback_factory,
            methods,
        });
        info!(
            interface = %binding.interface,
            service = %binding.context_id,
            load_balanced = binding.is_load_balanced(),
            methods = binding.methods.len(),
            "Registered remote client"
        );
        self.bindings.push(Arc::clone(&binding));
        Ok(binding)
    }

    /// Bindings recorded so far, in registration order
    pub fn bindings(&self) -> &[Arc<ClientBinding>] {
        &self.bindings
    }

    /// Consume the registrar, returning its bindings
    pub fn into_bindings(self) -> Vec<Arc<ClientBinding>> {
        self.bindings
    }
}

fn validate_fallbacks(declaration: &ClientDeclaration) -> Result<()> {
    let interface = &declaration.interface;
    if declaration.fallback.is_some() && declaration.fallback_factory.is_some() {
        return Err(Error::configuration(format!(
            "Client '{interface}' declares both a fallback and a fallback factory"
        )));
    }
    if let Some(ComponentRef { type_name, is_interface: true }) = &declaration.fallback {
        return Err(Error::configuration(format!(
            "Fallback '{type_name}' of '{interface}' must be a concrete implementation of the client interface"
        )));
    }
    if let Some(ComponentRef { type_name, is_interface: true }) = &declaration.fallback_factory {
        return Err(Error::configuration(format!(
            "Fallback factory '{type_name}' of '{interface}' must be a concrete type producing fallbacks"
        )));
    }
    Ok(())
}

/// Check that `name` can be used as a URL host
///
/// An `http://` or `https://` prefix is tolerated. Labels are ASCII letters,
/// digits and hyphens, without leading or trailing hyphens.
pub fn validate_host_name(name: &str) -> Result<()> {
    let host = name
        .strip_prefix("http://")
        .or_else(|| name.strip_prefix("https://"))
        .unwrap_or(name);
    let legal = !host.is_empty()
        && host.len() <= MAX_HOST_LENGTH
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= MAX_LABEL_LENGTH
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    if legal {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "Service id not legal hostname ({name})"
        )))
    }
}

/// Prefix `http://` when the scheme is missing and check the URL parses
pub fn normalize_url(url: Option<String>) -> Result<Option<String>> {
    let Some(url) = url else {
        return Ok(None);
    };
    let url = if url.contains(SCHEME_SEPARATOR) {
        url
    } else {
        format!("{DEFAULT_SCHEME}{SCHEME_SEPARATOR}{url}")
    };
    Url::parse(&url)
        .map_err(|e| Error::configuration_with_source(format!("{url} is malformed"), e))?;
    Ok(Some(url))
}

/// Trim, ensure a leading `/` and drop trailing `/`; blank becomes `""`
pub fn normalize_path(path: Option<&str>) -> String {
    let path = path.map(str::trim).unwrap_or_default();
    if path.is_empty() {
        return String::new();
    }
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        return String::new();
    }
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

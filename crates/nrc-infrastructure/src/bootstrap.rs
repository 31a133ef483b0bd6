//! Composition root
//!
//! Wires configuration, the root scope, declared remote interfaces, the
//! named context factory and the client cache into a [`ClientContext`].
//!
//! ```ignore
//! let context = ClientContextBuilder::new(config)
//!     .default_configuration(vec![shared_bundle])
//!     .declare::<UserClient>()
//!     .build()?;
//!
//! let users: UserClient = context.client()?;
//! ```

use crate::client::{ClientBinding, ClientDeclaration, ClientsRegistrar, RemoteClient, RemoteInterface};
use crate::config::AppConfig;
use crate::config::loader::validate_app_config;
use crate::constants::ROOT_BUNDLE_NAME;
use crate::context::{Bundle, ConfigRegistry, NamedContextFactory, Scope};
use crate::loadbalancer::{
    CachingLoadBalancerFactory, ConfigRetryPolicyFactory, LoadBalancedClient, client_bundle,
};
use crate::transport::ReqwestTransport;
use nrc_domain::error::{Error, Result};
use nrc_domain::ports::{HttpTransport, PropertySource, RetryPolicyFactory};
use nrc_domain::value_objects::{MethodDescriptor, ServiceName};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

struct PendingClient {
    type_id: Option<TypeId>,
    declaration: ClientDeclaration,
    methods: Vec<MethodDescriptor>,
}

/// Builder for [`ClientContext`]
pub struct ClientContextBuilder {
    config: AppConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    retry_factory: Option<Arc<dyn RetryPolicyFactory>>,
    root_bundles: Vec<Bundle>,
    default_configuration: Vec<Bundle>,
    clients: Vec<PendingClient>,
}

impl ClientContextBuilder {
    /// Start from a loaded configuration
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            transport: None,
            retry_factory: None,
            root_bundles: Vec::new(),
            default_configuration: Vec::new(),
            clients: Vec::new(),
        }
    }

    /// Use `transport` instead of the reqwest transport
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use `factory` for retry policies regardless of `retry.enabled`
    pub fn retry_factory(mut self, factory: Arc<dyn RetryPolicyFactory>) -> Self {
        self.retry_factory = Some(factory);
        self
    }

    /// Add a bundle to the shared root scope
    pub fn root_bundle(mut self, bundle: Bundle) -> Self {
        self.root_bundles.push(bundle);
        self
    }

    /// Add global bundles applied to every client scope
    pub fn default_configuration(mut self, bundles: Vec<Bundle>) -> Self {
        self.default_configuration.extend(bundles);
        self
    }

    /// Declare a typed remote interface
    pub fn declare<I: RemoteInterface>(mut self) -> Self {
        self.clients.push(PendingClient {
            type_id: Some(TypeId::of::<I>()),
            declaration: I::declaration(),
            methods: I::methods(),
        });
        self
    }

    /// Declare an untyped remote interface, reachable by its alias
    pub fn declare_client(
        mut self,
        declaration: ClientDeclaration,
        methods: Vec<MethodDescriptor>,
    ) -> Self {
        self.clients.push(PendingClient {
            type_id: None,
            declaration,
            methods,
        });
        self
    }

    /// Validate every declaration, build the shared components and bind all
    /// clients
    pub fn build(self) -> Result<ClientContext> {
        validate_app_config(&self.config)?;
        let config = Arc::new(self.config);
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(Duration::from_millis(
                config.client_defaults.connect_timeout_ms,
            ))?),
        };
        let properties: Arc<dyn PropertySource> = Arc::new(config.properties.clone());

        let root = Bundle::new(ROOT_BUNDLE_NAME)
            .value::<AppConfig>(Arc::clone(&config))
            .value::<dyn PropertySource>(Arc::clone(&properties))
            .value::<dyn HttpTransport>(Arc::clone(&transport));
        let root_scope = Scope::root(std::iter::once(root).chain(self.root_bundles));

        let registry = Arc::new(ConfigRegistry::new());
        let mut registrar = ClientsRegistrar::new(Arc::clone(&registry), properties);
        registrar.default_configuration(self.default_configuration)?;
        let mut typed = Vec::with_capacity(self.clients.len());
        for pending in self.clients {
            let binding = registrar.register(pending.declaration, pending.methods)?;
            typed.push((pending.type_id, binding));
        }
        registry.freeze();

        let factory = Arc::new(NamedContextFactory::new(
            Arc::clone(&registry),
            client_bundle(),
            root_scope,
        ));
        let retry_factory = self.retry_factory.or_else(|| {
            config
                .retry
                .enabled
                .then(|| Arc::new(ConfigRetryPolicyFactory) as Arc<dyn RetryPolicyFactory>)
        });
        let load_balancers = Arc::new(match retry_factory {
            Some(retry_factory) => {
                CachingLoadBalancerFactory::with_retry_factory(Arc::clone(&factory), retry_factory)
            }
            None => CachingLoadBalancerFactory::new(Arc::clone(&factory)),
        });

        let mut by_type = HashMap::new();
        let mut by_alias = HashMap::new();
        let mut bindings = Vec::with_capacity(typed.len());
        for (type_id, binding) in typed {
            let client = RemoteClient::bind(
                Arc::clone(&binding),
                &factory,
                Arc::clone(&load_balancers),
                Arc::clone(&transport),
            )?;
            if let Some(type_id) = type_id {
                by_type.insert(type_id, client.clone());
            }
            by_alias.insert(binding.alias.clone(), client);
            bindings.push(binding);
        }

        info!(
            clients = bindings.len(),
            retrying = load_balancers.is_retrying(),
            transport = transport.name(),
            "Client context ready"
        );
        Ok(ClientContext {
            config,
            registry,
            factory,
            load_balancers,
            bindings,
            by_type,
            by_alias,
        })
    }
}

/// Running set of bound clients and their shared infrastructure
pub struct ClientContext {
    config: Arc<AppConfig>,
    registry: Arc<ConfigRegistry>,
    factory: Arc<NamedContextFactory>,
    load_balancers: Arc<CachingLoadBalancerFactory>,
    bindings: Vec<Arc<ClientBinding>>,
    by_type: HashMap<TypeId, RemoteClient>,
    by_alias: HashMap<String, RemoteClient>,
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("clients", &self.bindings.len())
            .field("services", &self.registry.names())
            .field("retrying", &self.load_balancers.is_retrying())
            .finish_non_exhaustive()
    }
}

impl ClientContext {
    /// The typed client declared with [`ClientContextBuilder::declare`]
    pub fn client<I: RemoteInterface>(&self) -> Result<I> {
        self.by_type
            .get(&TypeId::of::<I>())
            .cloned()
            .map(I::from_client)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "remote client {}",
                    std::any::type_name::<I>()
                ))
            })
    }

    /// The client registered under `alias` (qualifier or `<name>Client`)
    pub fn client_by_qualifier(&self, alias: &str) -> Result<RemoteClient> {
        self.by_alias
            .get(alias)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("remote client '{alias}'")))
    }

    /// The load-balanced client for `service`
    pub fn resolve(&self, service: &str) -> Result<Arc<LoadBalancedClient>> {
        self.load_balancers.create(&ServiceName::new(service)?)
    }

    /// Resolve `T` in the scope of `service`
    pub fn get_instance<T>(&self, service: &str) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.factory.get_instance::<T>(&ServiceName::new(service)?)
    }

    /// Bindings in declaration order
    pub fn bindings(&self) -> &[Arc<ClientBinding>] {
        &self.bindings
    }

    /// Loaded configuration
    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    /// The configuration registry (frozen)
    pub fn registry(&self) -> &Arc<ConfigRegistry> {
        &self.registry
    }

    /// The named context factory
    pub fn factory(&self) -> &Arc<NamedContextFactory> {
        &self.factory
    }

    /// The load-balanced client cache
    pub fn load_balancers(&self) -> &Arc<CachingLoadBalancerFactory> {
        &self.load_balancers
    }

    /// Close every client scope and drop cached clients
    pub fn shutdown(&self) {
        self.load_balancers.clear();
        self.factory.destroy();
        info!("Client context shut down");
    }
}

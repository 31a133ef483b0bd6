//! Client Context Bootstrap Tests

use super::{UserClient, user_methods};
use crate::test_utils::RecordingTransport;
use nrc_domain::error::Error;
use nrc_domain::ports::PropertySource;
use nrc_domain::value_objects::{ComponentRef, ContextName, MethodDescriptor, RequestArgs};
use nrc_infrastructure::ClientContextBuilder;
use nrc_infrastructure::client::{ClientDeclaration, RemoteClient, RemoteInterface};
use nrc_infrastructure::config::{AppConfig, ConfigBuilder};
use nrc_infrastructure::context::Bundle;
use nrc_infrastructure::loadbalancer::ConfigRetryPolicyFactory;
use std::sync::Arc;

struct Tag(String);

#[derive(Debug)]
struct OrderClient(RemoteClient);

impl RemoteInterface for OrderClient {
    fn declaration() -> ClientDeclaration {
        ClientDeclaration::for_type::<Self>()
            .with_value("orders")
            .with_qualifier("orderApi")
    }

    fn methods() -> Vec<MethodDescriptor> {
        vec![MethodDescriptor::get("list", "/orders")]
    }

    fn from_client(client: RemoteClient) -> Self {
        Self(client)
    }
}

fn two_services() -> AppConfig {
    ConfigBuilder::new()
        .with_client("users", ["users-1:8080"])
        .with_client("orders", ["orders-1:8080", "orders-2:8080"])
        .build()
}

#[test]
fn test_build_binds_typed_clients() {
    let context = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .declare::<UserClient>()
        .declare::<OrderClient>()
        .build()
        .unwrap();

    let users: UserClient = context.client().unwrap();
    assert_eq!(users.0.service().as_str(), "users");
    assert_eq!(users.0.binding().path, "/api");

    let orders: OrderClient = context.client().unwrap();
    assert_eq!(orders.0.binding().alias, "orderApi");
    assert_eq!(context.bindings().len(), 2);
    assert!(context.registry().is_frozen());
}

#[test]
fn test_context_debug_output() {
    let context = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .declare::<OrderClient>()
        .build()
        .unwrap();

    let rendered = format!("{context:?}");
    assert!(rendered.starts_with("ClientContext"));
    assert!(rendered.contains("clients: 1"));
    assert!(format!("{:?}", context.client::<OrderClient>().unwrap()).contains("orders"));
}

#[test]
fn test_undeclared_type_is_not_found() {
    let context = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .declare::<UserClient>()
        .build()
        .unwrap();

    let err = context.client::<OrderClient>().unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn test_client_by_qualifier_uses_alias() {
    let context = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .declare::<UserClient>()
        .declare::<OrderClient>()
        .build()
        .unwrap();

    assert_eq!(
        context.client_by_qualifier("usersClient").unwrap().service().as_str(),
        "users"
    );
    assert_eq!(
        context.client_by_qualifier("orderApi").unwrap().service().as_str(),
        "orders"
    );
    assert!(context.client_by_qualifier("ordersClient").is_err());
}

#[tokio::test]
async fn test_placeholders_resolved_from_properties() {
    let app = ConfigBuilder::new()
        .with_client("users", ["users-1:8080"])
        .with_property("users.service", "users")
        .build();
    let transport = RecordingTransport::status(200);
    let context = ClientContextBuilder::new(app)
        .transport(transport.clone())
        .declare_client(
            ClientDeclaration::new("UserClient")
                .with_name("${users.service}")
                .with_path("${users.prefix:/v1}"),
            user_methods(),
        )
        .build()
        .unwrap();

    let client = context.client_by_qualifier("usersClient").unwrap();
    assert_eq!(client.binding().path, "/v1");
    client
        .call("get_user", RequestArgs::new().path("id", 5))
        .await
        .unwrap();
    assert_eq!(
        transport.urls(),
        vec!["http://users-1:8080/v1/users/5".to_string()]
    );

    let properties = context.get_instance::<dyn PropertySource>("users").unwrap();
    assert_eq!(properties.property("users.service").as_deref(), Some("users"));
}

#[test]
fn test_unresolved_placeholder_fails_build() {
    let result = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .declare_client(
            ClientDeclaration::new("UserClient").with_name("${missing.key}"),
            user_methods(),
        )
        .build();

    assert!(result.unwrap_err().is_configuration());
}

#[test]
fn test_duplicate_service_fails_build() {
    let result = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .declare::<UserClient>()
        .declare_client(
            ClientDeclaration::new("OtherUserClient").with_name("users"),
            user_methods(),
        )
        .build();

    let err = result.unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("users"));
}

#[test]
fn test_missing_name_fails_build() {
    let result = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .declare_client(ClientDeclaration::new("Nameless"), user_methods())
        .build();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Either 'name' or 'value'"));
}

#[test]
fn test_missing_fallback_instance_fails_build() {
    let result = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .declare_client(
            ClientDeclaration::new("UserClient")
                .with_name("users")
                .with_fallback(ComponentRef::concrete("UserFallback")),
            user_methods(),
        )
        .build();

    let err = result.unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("UserFallback"));
}

#[test]
fn test_invalid_config_fails_build() {
    let app = ConfigBuilder::new()
        .with_client("users", ["users-1:notaport"])
        .build();

    let result = ClientContextBuilder::new(app)
        .transport(RecordingTransport::status(200))
        .build();

    assert!(result.is_err());
}

#[test]
fn test_scopes_see_global_own_and_root_bundles() {
    let context = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .root_bundle(Bundle::new("shared").value(Arc::new(Tag("root".into()))))
        .default_configuration(vec![Bundle::new("global").provide::<String, _>(|scope| {
            let name = scope.get::<ContextName>()?;
            Ok(Arc::new(format!("global for {}", name.service())))
        })])
        .declare_client(
            ClientDeclaration::new("UserClient")
                .with_name("users")
                .with_configuration(Bundle::new("users-own").value(Arc::new(Tag("users".into())))),
            user_methods(),
        )
        .declare::<OrderClient>()
        .build()
        .unwrap();

    assert_eq!(context.get_instance::<Tag>("users").unwrap().0, "users");
    assert_eq!(context.get_instance::<Tag>("orders").unwrap().0, "root");
    assert_eq!(
        *context.get_instance::<String>("orders").unwrap(),
        "global for orders"
    );
}

#[test]
fn test_retry_enabled_by_config() {
    let app = ConfigBuilder::new()
        .with_client("users", ["users-1:8080"])
        .with_retry(true)
        .build();
    let context = ClientContextBuilder::new(app)
        .transport(RecordingTransport::status(200))
        .build()
        .unwrap();

    assert!(context.load_balancers().is_retrying());
    assert!(context.resolve("users").unwrap().is_retryable());
}

#[test]
fn test_explicit_retry_factory() {
    let context = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .retry_factory(Arc::new(ConfigRetryPolicyFactory))
        .build()
        .unwrap();

    assert!(context.resolve("orders").unwrap().is_retryable());
}

#[test]
fn test_resolve_unknown_service() {
    let context = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .build()
        .unwrap();

    let err = context.resolve("billing").unwrap_err();
    assert!(matches!(err, Error::Resolution { .. }));
}

#[test]
fn test_default_transport_is_built() {
    let context = ClientContextBuilder::new(two_services()).build().unwrap();

    assert!(context.resolve("users").is_ok());
}

#[test]
fn test_shutdown_releases_clients_and_scopes() {
    let context = ClientContextBuilder::new(two_services())
        .transport(RecordingTransport::status(200))
        .declare::<UserClient>()
        .build()
        .unwrap();

    let before = context.resolve("users").unwrap();
    assert!(!context.load_balancers().is_empty());
    assert!(!context.factory().context_names().is_empty());

    context.shutdown();
    assert!(context.load_balancers().is_empty());
    assert!(context.factory().context_names().is_empty());

    let after = context.resolve("users").unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
}

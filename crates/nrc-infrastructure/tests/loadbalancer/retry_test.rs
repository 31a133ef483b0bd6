//! Load-Balanced Execution Tests

use super::context_factory;
use crate::test_utils::{RecordingTransport, service};
use nrc_domain::error::Error;
use nrc_domain::value_objects::{HttpMethod, HttpRequest, HttpResponse};
use nrc_infrastructure::config::{AppConfig, ConfigBuilder};
use nrc_infrastructure::context::ConfigRegistry;
use nrc_infrastructure::loadbalancer::{
    CachingLoadBalancerFactory, ConfigRetryPolicyFactory, LoadBalancedClient,
};
use std::sync::Arc;
use std::time::Duration;

fn retrying_client(app: AppConfig, name: &str) -> Arc<LoadBalancedClient> {
    let cache = CachingLoadBalancerFactory::with_retry_factory(
        context_factory(app, ConfigRegistry::new()),
        Arc::new(ConfigRetryPolicyFactory),
    );
    cache.create(&service(name)).unwrap()
}

fn flaky(failures: usize) -> Arc<RecordingTransport> {
    RecordingTransport::new(move |attempt, _| {
        if attempt < failures {
            Err(Error::transport("orders", "connection refused"))
        } else {
            Ok(HttpResponse::new(200, b"ok".to_vec()))
        }
    })
}

#[tokio::test]
async fn test_transport_failure_moves_to_next_server() {
    let app = ConfigBuilder::new()
        .with_client("orders", ["orders-1:8080", "orders-2:8080"])
        .build();
    let client = retrying_client(app, "orders");
    let transport = flaky(1);

    let response = client
        .execute(
            HttpRequest::new(HttpMethod::Get, "http://orders/items"),
            transport.as_ref(),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(
        transport.urls(),
        vec![
            "http://orders-1:8080/items".to_string(),
            "http://orders-2:8080/items".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let app = ConfigBuilder::new()
        .with_client("orders", ["orders-1:8080", "orders-2:8080"])
        .with_client_defaults(|d| d.max_auto_retries = 1)
        .build();
    let client = retrying_client(app, "orders");
    let transport = flaky(usize::MAX);

    let err = client
        .execute(
            HttpRequest::new(HttpMethod::Get, "http://orders/items"),
            transport.as_ref(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport { .. }));
    // one first attempt, one on the same server, then the next server twice
    assert_eq!(transport.count(), 4);
    let urls = transport.urls();
    assert_eq!(urls[0], urls[1]);
    assert_ne!(urls[1], urls[2]);
}

#[tokio::test]
async fn test_retryable_status_is_retried() {
    let app = ConfigBuilder::new()
        .with_client("orders", ["orders-1:8080", "orders-2:8080"])
        .with_client_defaults(|d| d.retryable_status_codes = vec![503])
        .build();
    let client = retrying_client(app, "orders");
    let transport = RecordingTransport::new(|attempt, _| {
        let status = if attempt == 0 { 503 } else { 200 };
        Ok(HttpResponse::new(status, Vec::new()))
    });

    let response = client
        .execute(
            HttpRequest::new(HttpMethod::Get, "http://orders/items"),
            transport.as_ref(),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(transport.count(), 2);
}

#[tokio::test]
async fn test_non_idempotent_call_is_not_retried() {
    let app = ConfigBuilder::new()
        .with_client("orders", ["orders-1:8080", "orders-2:8080"])
        .build();
    let client = retrying_client(app, "orders");
    let transport = flaky(1);

    let err = client
        .execute(
            HttpRequest::new(HttpMethod::Post, "http://orders/items"),
            transport.as_ref(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport { .. }));
    assert_eq!(transport.count(), 1);
}

#[tokio::test]
async fn test_retry_all_operations_retries_post() {
    let app = ConfigBuilder::new()
        .with_client("orders", ["orders-1:8080", "orders-2:8080"])
        .with_client_defaults(|d| d.ok_to_retry_on_all_operations = true)
        .build();
    let client = retrying_client(app, "orders");
    let transport = flaky(1);

    client
        .execute(
            HttpRequest::new(HttpMethod::Post, "http://orders/items"),
            transport.as_ref(),
        )
        .await
        .unwrap();

    assert_eq!(transport.count(), 2);
}

#[tokio::test]
async fn test_plain_client_makes_single_attempt() {
    let app = ConfigBuilder::new()
        .with_client("orders", ["orders-1:8080", "orders-2:8080"])
        .build();
    let cache = CachingLoadBalancerFactory::new(context_factory(app, ConfigRegistry::new()));
    let client = cache.create(&service("orders")).unwrap();
    let transport = flaky(1);

    let result = client
        .execute(
            HttpRequest::new(HttpMethod::Get, "http://orders/items"),
            transport.as_ref(),
        )
        .await;

    assert!(result.is_err());
    assert_eq!(transport.count(), 1);
}

#[tokio::test]
async fn test_read_timeout_applied_when_unset() {
    let app = ConfigBuilder::new()
        .with_client("orders", ["orders-1:8080"])
        .with_client_defaults(|d| d.read_timeout_ms = 250)
        .build();
    let client = retrying_client(app, "orders");
    let transport = RecordingTransport::status(200);

    client
        .execute(
            HttpRequest::new(HttpMethod::Get, "http://orders/a"),
            transport.as_ref(),
        )
        .await
        .unwrap();
    client
        .execute(
            HttpRequest::new(HttpMethod::Get, "http://orders/b")
                .with_timeout(Duration::from_secs(5)),
            transport.as_ref(),
        )
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].timeout, Some(Duration::from_millis(250)));
    assert_eq!(requests[1].timeout, Some(Duration::from_secs(5)));
}

#[tokio::test]
async fn test_secure_port_switches_scheme() {
    let app = ConfigBuilder::new()
        .with_client("billing", ["billing-1:8443"])
        .build();
    let client = retrying_client(app, "billing");
    let transport = RecordingTransport::status(200);

    client
        .execute(
            HttpRequest::new(HttpMethod::Get, "http://billing/invoices?page=2"),
            transport.as_ref(),
        )
        .await
        .unwrap();

    assert_eq!(
        transport.urls(),
        vec!["https://billing-1:8443/invoices?page=2".to_string()]
    );
}

#[tokio::test]
async fn test_ipv6_server_is_bracketed_in_url() {
    let app = ConfigBuilder::new()
        .with_client("users", ["[::1]:8080"])
        .build();
    let client = retrying_client(app, "users");
    let transport = RecordingTransport::status(200);

    client
        .execute(
            HttpRequest::new(HttpMethod::Get, "http://users/search"),
            transport.as_ref(),
        )
        .await
        .unwrap();

    assert_eq!(transport.urls(), vec!["http://[::1]:8080/search".to_string()]);
}

//! Load-balanced clients
//!
//! | Type | Role |
//! |------|------|
//! | [`client_bundle`] | Default per-service definitions |
//! | [`StaticServerListLoadBalancer`] | Round-robin over configured servers |
//! | [`DefaultServerIntrospector`] | TLS detection by port |
//! | [`ConfigRetryPolicyFactory`] | Retry policy from client settings |
//! | [`LoadBalancedClient`] | Server choice, URL rewrite, retries |
//! | [`CachingLoadBalancerFactory`] | One client per service name |

pub mod bundle;
pub mod cache;
pub mod client;
pub mod config;
pub mod introspector;
pub mod retry;
pub mod server_list;

pub use bundle::client_bundle;
pub use cache::CachingLoadBalancerFactory;
pub use client::LoadBalancedClient;
pub use config::resolve_client_config;
pub use introspector::DefaultServerIntrospector;
pub use retry::{ConfigRetryPolicy, ConfigRetryPolicyFactory};
pub use server_list::StaticServerListLoadBalancer;

//! Domain Port Interfaces
//!
//! Boundary contracts between the client core and its collaborators.
//!
//! | Port | Description |
//! |------|-------------|
//! | LoadBalancer | Picks a server for a service |
//! | ServerIntrospector | Transport facts about a server (TLS) |
//! | RetryPolicy / RetryPolicyFactory | Retry decisions for load-balanced calls |
//! | HttpTransport | Performs the HTTP exchange |
//! | Fallback / FallbackFactory | Substitute results for failed calls |
//! | PropertySource | Placeholder values for declarations |

/// Fallback ports
pub mod fallback;
/// Load balancer ports
pub mod load_balancer;
/// Property source port
pub mod properties;
/// Retry ports
pub mod retry;
/// HTTP transport port
pub mod transport;

pub use fallback::{FailedCall, Fallback, FallbackFactory};
pub use load_balancer::{LoadBalancer, ServerIntrospector};
pub use properties::PropertySource;
pub use retry::{RetryContext, RetryPolicy, RetryPolicyFactory};
pub use transport::HttpTransport;

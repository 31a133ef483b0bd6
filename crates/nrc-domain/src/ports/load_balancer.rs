//! Load Balancer Port
//!
//! A load balancer hands out [`ServerEndpoint`]s for one service. The
//! algorithm is not part of this contract; implementations are registered as
//! `dyn LoadBalancer` capabilities in the service's scope.

use crate::value_objects::ServerEndpoint;

/// Picks a server for the next call to a service
///
/// # Example
///
/// ```ignore
/// let lb: Arc<dyn LoadBalancer> = factory.get_instance("user-provider")?;
/// if let Some(server) = lb.choose() {
///     println!("next call goes to {server}");
/// }
/// ```
pub trait LoadBalancer: Send + Sync {
    /// Server for the next request, `None` when no server is available
    fn choose(&self) -> Option<ServerEndpoint>;

    /// All servers currently known to the balancer
    fn servers(&self) -> Vec<ServerEndpoint>;

    /// Short name for diagnostics
    fn name(&self) -> &str {
        "load-balancer"
    }
}

/// Answers transport questions about a concrete server
pub trait ServerIntrospector: Send + Sync {
    /// Whether calls to this server must use TLS
    fn is_secure(&self, server: &ServerEndpoint) -> bool;
}

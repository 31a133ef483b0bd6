//! Static server list load balancer

use nrc_domain::error::{Error, Result};
use nrc_domain::ports::LoadBalancer;
use nrc_domain::value_objects::{ServerEndpoint, ServiceName};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Round-robin over a fixed list of servers
#[derive(Debug)]
pub struct StaticServerListLoadBalancer {
    service: ServiceName,
    servers: Vec<ServerEndpoint>,
    index: AtomicUsize,
}

impl StaticServerListLoadBalancer {
    /// Create a balancer; an empty server list is a resolution error
    pub fn new(service: ServiceName, servers: Vec<ServerEndpoint>) -> Result<Self> {
        if servers.is_empty() {
            return Err(Error::resolution(
                service.as_str(),
                "server list is empty",
            ));
        }
        Ok(Self {
            service,
            servers,
            index: AtomicUsize::new(0),
        })
    }
}

impl LoadBalancer for StaticServerListLoadBalancer {
    fn choose(&self) -> Option<ServerEndpoint> {
        if self.servers.is_empty() {
            return None;
        }
        let current_index = self.index.fetch_add(1, Ordering::Relaxed);
        let selected = self.servers[current_index % self.servers.len()].clone();
        debug!(service = %self.service, server = %selected, "Selected server by round-robin");
        Some(selected)
    }

    fn servers(&self) -> Vec<ServerEndpoint> {
        self.servers.clone()
    }

    fn name(&self) -> &str {
        "static-round-robin"
    }
}

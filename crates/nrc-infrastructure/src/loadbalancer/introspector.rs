//! Server introspection

use nrc_domain::ports::ServerIntrospector;
use nrc_domain::value_objects::ServerEndpoint;

/// Treats a server as secure when its port is one of the configured TLS ports
#[derive(Debug, Clone)]
pub struct DefaultServerIntrospector {
    secure_ports: Vec<u16>,
}

impl DefaultServerIntrospector {
    /// Create an introspector for the given TLS ports
    pub fn new(secure_ports: Vec<u16>) -> Self {
        Self { secure_ports }
    }
}

impl ServerIntrospector for DefaultServerIntrospector {
    fn is_secure(&self, server: &ServerEndpoint) -> bool {
        self.secure_ports.contains(&server.port)
    }
}

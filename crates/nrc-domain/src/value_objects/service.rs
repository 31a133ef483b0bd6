//! Service identity value objects

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical identifier of a remote service
///
/// Unique key for every per-service scope and cached client. Names are
/// case-sensitive and never empty.
///
/// # Example
///
/// ```
/// use nrc_domain::value_objects::ServiceName;
///
/// let name = ServiceName::new("user-provider").unwrap();
/// assert_eq!(name.as_str(), "user-provider");
/// assert!(ServiceName::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName(String);

impl ServiceName {
    /// Create a service name, rejecting empty or blank input
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::configuration("Service name must not be empty"));
        }
        Ok(Self(name))
    }

    /// Borrow the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ServiceName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ServiceName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ServiceName> for String {
    fn from(value: ServiceName) -> Self {
        value.0
    }
}

impl FromStr for ServiceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Name of the scope a capability is being resolved in
///
/// Every named scope exposes one of these so providers can depend on
/// "which service am I configuring".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextName(pub ServiceName);

impl ContextName {
    /// The service name of the scope
    pub fn service(&self) -> &ServiceName {
        &self.0
    }
}

/// A concrete server instance a load balancer can pick
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerEndpoint {
    /// Host name or IP address
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl ServerEndpoint {
    /// Create an endpoint from host and port
    pub fn new<S: Into<String>>(host: S, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for ServerEndpoint {
    type Err = Error;

    /// Parse `host:port` (IPv6 hosts in brackets)
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| Error::configuration(format!("Server '{s}' must be host:port")))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(Error::configuration(format!("Server '{s}' has an empty host")));
        }
        let port = port
            .parse::<u16>()
            .map_err(|e| Error::configuration_with_source(format!("Server '{s}' has an invalid port"), e))?;
        Ok(Self::new(host, port))
    }
}

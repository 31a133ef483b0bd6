//! Value objects
//!
//! Immutable data shared by every layer: service identity, effective client
//! configuration, HTTP messages and remote method descriptors.

/// Effective client configuration
pub mod client_config;
/// Component references used by declarations
pub mod component;
/// HTTP request/response values
pub mod http;
/// Method descriptors and call arguments
pub mod request;
/// Service identity
pub mod service;

pub use client_config::ClientConfig;
pub use component::ComponentRef;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{DecodedBody, MethodDescriptor, RequestArgs, ResponseDecoder};
pub use service::{ContextName, ServerEndpoint, ServiceName};

//! HTTP Transport Port
//!
//! The transport performs the network exchange. It is an external
//! collaborator: the client core only builds requests, picks servers and
//! interprets outcomes.

use crate::error::Result;
use crate::value_objects::{HttpRequest, HttpResponse, ServiceName};
use async_trait::async_trait;

/// Sends a fully built request
///
/// Implementations report network failures as `Error::Transport`. Non-2xx
/// responses are returned as `Ok`; interpreting them is up to the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform the request on behalf of `service`
    async fn execute(&self, service: &ServiceName, request: HttpRequest) -> Result<HttpResponse>;

    /// Short name for diagnostics
    fn name(&self) -> &str {
        "transport"
    }
}

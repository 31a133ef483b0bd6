//! Fallback Ports
//!
//! A fallback produces a substitute result when a remote call fails. A
//! fallback factory builds a fallback from the failure cause.

use crate::error::{Error, Result};
use crate::value_objects::{HttpResponse, MethodDescriptor, RequestArgs, ServiceName};
use async_trait::async_trait;
use std::sync::Arc;

/// The call that failed
#[derive(Debug, Clone, Copy)]
pub struct FailedCall<'a> {
    /// Service that was called
    pub service: &'a ServiceName,
    /// Method descriptor of the call
    pub method: &'a MethodDescriptor,
    /// Arguments of the call
    pub args: &'a RequestArgs,
}

/// Substitute handler for a failed remote call
///
/// # Example
///
/// ```ignore
/// struct UserFallback;
///
/// #[async_trait]
/// impl Fallback for UserFallback {
///     async fn fallback(&self, call: FailedCall<'_>, _cause: &Error) -> Result<HttpResponse> {
///         HttpResponse::json(&serde_json::json!({ "id": 0, "name": "unknown" }))
///     }
/// }
/// ```
#[async_trait]
pub trait Fallback: Send + Sync {
    /// Produce a substitute response for `call`
    async fn fallback(&self, call: FailedCall<'_>, cause: &Error) -> Result<HttpResponse>;
}

/// Builds a fallback that can inspect the failure cause
pub trait FallbackFactory: Send + Sync {
    /// Fallback for this particular failure
    fn create(&self, cause: &Error) -> Arc<dyn Fallback>;
}

//! Remote client proxy
//!
//! A [`RemoteClient`] turns a method name plus [`RequestArgs`] into an HTTP
//! request, sends it either straight to the declared URL or through the
//! service's load-balanced client, interprets the status and routes remote
//! failures to the configured fallback.

use super::binding::ClientBinding;
use crate::context::NamedContextFactory;
use crate::error_ext::ErrorContext;
use crate::loadbalancer::CachingLoadBalancerFactory;
use nrc_domain::constants::{DEFAULT_SCHEME, SCHEME_SEPARATOR};
use nrc_domain::error::{Error, Result};
use nrc_domain::ports::{FailedCall, Fallback, FallbackFactory, HttpTransport};
use nrc_domain::value_objects::{
    DecodedBody, HttpRequest, HttpResponse, MethodDescriptor, RequestArgs, ResponseDecoder,
    ServiceName,
};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

const HTTP_NOT_FOUND: u16 = 404;

/// What to do when a remote call fails
#[derive(Clone)]
enum FallbackHandler {
    None,
    Instance(Arc<dyn Fallback>),
    Factory(Arc<dyn FallbackFactory>),
}

struct ClientInner {
    binding: Arc<ClientBinding>,
    load_balancers: Arc<CachingLoadBalancerFactory>,
    transport: Arc<dyn HttpTransport>,
    fallback: FallbackHandler,
}

/// Bound remote interface
///
/// Cheap to clone; clones share the binding, transport and fallback.
#[derive(Clone)]
pub struct RemoteClient {
    inner: Arc<ClientInner>,
}

impl RemoteClient {
    /// Bind `binding`, resolving its fallback from the client's scope
    ///
    /// A declared fallback that the scope cannot provide is a configuration
    /// error.
    pub fn bind(
        binding: Arc<ClientBinding>,
        factory: &NamedContextFactory,
        load_balancers: Arc<CachingLoadBalancerFactory>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let service = &binding.context_id;
        let fallback = match (&binding.fallback, &binding.fallback_factory) {
            (Some(_), Some(_)) => {
                return Err(Error::configuration(format!(
                    "Client '{}' declares both a fallback and a fallback factory",
                    binding.interface
                )));
            }
            (Some(reference), None) => FallbackHandler::Instance(
                factory
                    .get_named_instance::<dyn Fallback>(service, &reference.type_name)
                    .map_err(|e| missing_component("fallback", &reference.type_name, service, &e))?,
            ),
            (None, Some(reference)) => FallbackHandler::Factory(
                factory
                    .get_named_instance::<dyn FallbackFactory>(service, &reference.type_name)
                    .map_err(|e| {
                        missing_component("fallback factory", &reference.type_name, service, &e)
                    })?,
            ),
            (None, None) => FallbackHandler::None,
        };

        debug!(
            interface = %binding.interface,
            service = %service,
            has_fallback = !matches!(fallback, FallbackHandler::None),
            "Bound remote client"
        );
        Ok(Self {
            inner: Arc::new(ClientInner {
                binding,
                load_balancers,
                transport,
                fallback,
            }),
        })
    }

    /// The validated binding
    pub fn binding(&self) -> &ClientBinding {
        &self.inner.binding
    }

    /// Service this client calls
    pub fn service(&self) -> &ServiceName {
        &self.inner.binding.context_id
    }

    /// Call `method` and return the raw response
    ///
    /// Remote failures go to the fallback when one is configured; everything
    /// else propagates unchanged.
    pub async fn call(&self, method: &str, args: RequestArgs) -> Result<HttpResponse> {
        let binding = &self.inner.binding;
        let descriptor = binding.methods.get(method).ok_or_else(|| {
            Error::invalid_argument(format!(
                "Interface '{}' has no method '{method}'",
                binding.interface
            ))
        })?;

        match self.execute(descriptor, &args).await {
            Err(cause) if cause.is_remote_failure() => {
                self.handle_failure(descriptor, &args, cause).await
            }
            outcome => outcome,
        }
    }

    /// Call `method` and decode the JSON body into `R`
    ///
    /// An empty body (including a decoded 404) is read as `null`, so
    /// `Option<_>` targets yield `None`.
    pub async fn call_json<R: DeserializeOwned>(&self, method: &str, args: RequestArgs) -> Result<R> {
        let response = self.call(method, args).await?;
        decode_json_body(method, &response)
    }

    /// Call `method` and decode the body with the method's decoder
    pub async fn invoke(&self, method: &str, args: RequestArgs) -> Result<DecodedBody> {
        let decoder = self
            .inner
            .binding
            .methods
            .get(method)
            .map(|descriptor| descriptor.decoder)
            .unwrap_or_default();
        let response = self.call(method, args).await?;
        match decoder {
            ResponseDecoder::Json if response.body.is_empty() => Ok(DecodedBody::Empty),
            ResponseDecoder::Json => Ok(DecodedBody::Json(decode_json_body(method, &response)?)),
            ResponseDecoder::Text => Ok(DecodedBody::Text(response.text())),
            ResponseDecoder::Discard => Ok(DecodedBody::Empty),
        }
    }

    async fn execute(&self, descriptor: &MethodDescriptor, args: &RequestArgs) -> Result<HttpResponse> {
        let inner = &self.inner;
        let request = build_request(&inner.binding, descriptor, args)?;
        let response = if inner.binding.is_load_balanced() {
            let client = inner.load_balancers.create(&inner.binding.context_id)?;
            client.execute(request, inner.transport.as_ref()).await?
        } else {
            inner
                .transport
                .execute(&inner.binding.context_id, request)
                .await?
        };
        self.check_status(response)
    }

    fn check_status(&self, response: HttpResponse) -> Result<HttpResponse> {
        let binding = &self.inner.binding;
        if response.is_success() {
            return Ok(response);
        }
        if response.status == HTTP_NOT_FOUND && binding.decode_404 {
            debug!(service = %binding.context_id, "Decoding 404 as empty result");
            return Ok(HttpResponse {
                status: response.status,
                headers: response.headers,
                body: Vec::new(),
            });
        }
        Err(Error::http_status(
            binding.context_id.as_str(),
            response.status,
            response.text(),
        ))
    }

    async fn handle_failure(
        &self,
        descriptor: &MethodDescriptor,
        args: &RequestArgs,
        cause: Error,
    ) -> Result<HttpResponse> {
        let service = &self.inner.binding.context_id;
        let call = FailedCall {
            service,
            method: descriptor,
            args,
        };
        match &self.inner.fallback {
            FallbackHandler::None => Err(cause),
            FallbackHandler::Instance(fallback) => {
                warn!(service = %service, method = %descriptor.name, error = %cause, "Remote call failed, using fallback");
                fallback.fallback(call, &cause).await
            }
            FallbackHandler::Factory(factory) => {
                warn!(service = %service, method = %descriptor.name, error = %cause, "Remote call failed, using fallback factory");
                let fallback = factory.create(&cause);
                fallback.fallback(call, &cause).await
            }
        }
    }
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("interface", &self.inner.binding.interface)
            .field("service", &self.inner.binding.context_id)
            .finish_non_exhaustive()
    }
}

fn missing_component(kind: &str, type_name: &str, service: &ServiceName, cause: &Error) -> Error {
    Error::configuration(format!(
        "No {kind} instance '{type_name}' available for client '{service}': {cause}"
    ))
}

/// Build the outgoing request for `descriptor`
///
/// The base URL is the declared URL, or `http://<name>` for load-balanced
/// clients (host and port are rewritten per attempt).
fn decode_json_body<R: DeserializeOwned>(method: &str, response: &HttpResponse) -> Result<R> {
    let body: &[u8] = if response.body.is_empty() {
        b"null"
    } else {
        &response.body
    };
    serde_json::from_slice(body)
        .decode_context(format!("Response of '{method}' is not valid JSON"))
}

fn build_request(
    binding: &ClientBinding,
    descriptor: &MethodDescriptor,
    args: &RequestArgs,
) -> Result<HttpRequest> {
    let base = match &binding.url {
        Some(url) => url.clone(),
        None if binding.name.contains(SCHEME_SEPARATOR) => binding.name.clone(),
        None => format!("{DEFAULT_SCHEME}{SCHEME_SEPARATOR}{}", binding.name),
    };
    let mut url = Url::parse(&base)
        .map_err(|e| Error::invalid_argument(format!("Invalid base URL '{base}': {e}")))?;

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| Error::invalid_argument(format!("URL '{base}' cannot carry a path")))?;
        segments.pop_if_empty();
        for segment in binding
            .path
            .split('/')
            .chain(descriptor.path.split('/'))
            .filter(|segment| !segment.is_empty())
        {
            segments.push(&expand_segment(segment, &args.path_vars, &descriptor.name)?);
        }
    }

    if !args.query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &args.query {
            pairs.append_pair(name, value);
        }
    }

    let mut request = HttpRequest::new(descriptor.method, url.to_string());
    for (name, value) in &args.headers {
        request = request.with_header(name.clone(), value.clone());
    }
    if let Some(body) = &args.body {
        request = request
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_vec(body)?);
    }
    Ok(request)
}

/// Substitute `{var}` occurrences in one path segment
fn expand_segment(
    segment: &str,
    vars: &BTreeMap<String, String>,
    method: &str,
) -> Result<String> {
    let mut expanded = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(start) = rest.find('{') {
        expanded.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            Error::invalid_argument(format!("Unclosed variable in path of method '{method}'"))
        })?;
        let name = &after[..end];
        let value = vars.get(name).ok_or_else(|| {
            Error::invalid_argument(format!(
                "Missing path variable '{name}' for method '{method}'"
            ))
        })?;
        expanded.push_str(value);
        rest = &after[end + 1..];
    }
    expanded.push_str(rest);
    Ok(expanded)
}

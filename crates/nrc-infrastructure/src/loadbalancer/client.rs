//! Load-balanced client
//!
//! Picks a server per attempt, rewrites the request URL onto it and hands
//! the request to the transport. With a retry policy attached, transport
//! failures and retryable statuses are retried on the same server first and
//! then on newly chosen servers.

use nrc_domain::constants::SECURE_SCHEME;
use nrc_domain::error::{Error, Result};
use nrc_domain::ports::{
    HttpTransport, LoadBalancer, RetryContext, RetryPolicy, ServerIntrospector,
};
use nrc_domain::value_objects::{
    ClientConfig, HttpRequest, HttpResponse, ServerEndpoint, ServiceName,
};
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, warn};

/// Client for one service, cached by [`super::CachingLoadBalancerFactory`]
pub struct LoadBalancedClient {
    service: ServiceName,
    load_balancer: Arc<dyn LoadBalancer>,
    config: Arc<ClientConfig>,
    introspector: Arc<dyn ServerIntrospector>,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
}

impl LoadBalancedClient {
    /// Create a plain (non-retrying) client
    pub fn new(
        service: ServiceName,
        load_balancer: Arc<dyn LoadBalancer>,
        config: Arc<ClientConfig>,
        introspector: Arc<dyn ServerIntrospector>,
    ) -> Self {
        Self {
            service,
            load_balancer,
            config,
            introspector,
            retry_policy: None,
        }
    }

    /// Attach a retry policy
    pub fn with_retry_policy(mut self, policy: Arc<dyn RetryPolicy>) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Service this client calls
    pub fn service(&self) -> &ServiceName {
        &self.service
    }

    /// Effective configuration of the service
    pub fn config(&self) -> &Arc<ClientConfig> {
        &self.config
    }

    /// The load balancer picking servers
    pub fn load_balancer(&self) -> &Arc<dyn LoadBalancer> {
        &self.load_balancer
    }

    /// Whether this client retries failed attempts
    pub fn is_retryable(&self) -> bool {
        self.retry_policy.is_some()
    }

    /// Next server for this service
    pub fn choose(&self) -> Result<ServerEndpoint> {
        self.load_balancer.choose().ok_or_else(|| {
            Error::resolution(self.service.as_str(), "load balancer has no available server")
        })
    }

    /// Rewrite `url` so it targets `server`
    ///
    /// Host and port are replaced; the scheme becomes `https` when the
    /// introspector reports the server as secure.
    pub fn reconstruct_url(&self, server: &ServerEndpoint, url: &str) -> Result<Url> {
        let mut url = Url::parse(url).map_err(|e| {
            Error::invalid_argument(format!("Invalid request URL '{url}': {e}"))
        })?;
        if self.introspector.is_secure(server) && url.scheme() != SECURE_SCHEME {
            url.set_scheme(SECURE_SCHEME).map_err(|()| {
                Error::invalid_argument(format!("Cannot switch '{url}' to {SECURE_SCHEME}"))
            })?;
        }
        // IPv6 literals need brackets to parse as a URL host
        let host = if server.host.contains(':') {
            format!("[{}]", server.host)
        } else {
            server.host.clone()
        };
        url.set_host(Some(&host)).map_err(|e| {
            Error::invalid_argument(format!("Invalid host '{}': {e}", server.host))
        })?;
        url.set_port(Some(server.port))
            .map_err(|()| Error::invalid_argument(format!("Cannot set port on '{url}'")))?;
        Ok(url)
    }

    /// Execute `request` against a chosen server
    pub async fn execute(
        &self,
        request: HttpRequest,
        transport: &dyn HttpTransport,
    ) -> Result<HttpResponse> {
        let mut context = RetryContext::new(request.method);
        let mut server = self.choose()?;

        loop {
            let outcome = self.execute_once(&server, &request, transport).await;
            let Some(policy) = &self.retry_policy else {
                return outcome;
            };

            let retryable = match &outcome {
                Ok(response) => policy.is_retryable_status(response.status),
                Err(error) => matches!(error, Error::Transport { .. }),
            };
            if !retryable {
                return outcome;
            }

            if policy.can_retry_same_server(&context) {
                context.same_server_retries += 1;
            } else if policy.can_retry_next_server(&context) {
                context.next_server_retries += 1;
                context.same_server_retries = 0;
                server = self.choose()?;
            } else {
                debug!(service = %self.service, "Retries exhausted");
                return outcome;
            }

            warn!(
                service = %self.service,
                server = %server,
                same_server_retries = context.same_server_retries,
                next_server_retries = context.next_server_retries,
                "Retrying request"
            );
            let backoff = policy.backoff();
            if !backoff.is_zero() {
                tokio::time::sleep(backoff).await;
            }
        }
    }

    async fn execute_once(
        &self,
        server: &ServerEndpoint,
        request: &HttpRequest,
        transport: &dyn HttpTransport,
    ) -> Result<HttpResponse> {
        let url = self.reconstruct_url(server, &request.url)?;
        let mut attempt = request.clone();
        attempt.url = url.to_string();
        if attempt.timeout.is_none() {
            attempt.timeout = Some(self.config.read_timeout);
        }
        debug!(service = %self.service, method = %attempt.method, url = %attempt.url, "Sending request");
        transport.execute(&self.service, attempt).await
    }
}

impl std::fmt::Debug for LoadBalancedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadBalancedClient")
            .field("service", &self.service)
            .field("load_balancer", &self.load_balancer.name())
            .field("retryable", &self.is_retryable())
            .finish()
    }
}

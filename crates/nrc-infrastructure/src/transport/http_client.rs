//! reqwest-backed HTTP transport

use async_trait::async_trait;
use nrc_domain::error::{Error, Result};
use nrc_domain::ports::HttpTransport;
use nrc_domain::value_objects::{HttpMethod, HttpRequest, HttpResponse, ServiceName};
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::debug;

/// Transport sharing one `reqwest::Client` (and its connection pool)
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given connect timeout
    pub fn new(connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| Error::configuration_with_source("Failed to build HTTP client", e))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, service: &ServiceName, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(to_method(request.method), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            Error::transport_with_source(
                service.as_str(),
                format!("{} {} failed", request.method, request.url),
                e,
            )
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| {
            Error::transport_with_source(service.as_str(), "Failed to read response body", e)
        })?;

        debug!(service = %service, status, bytes = body.len(), "Response received");
        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

//! Shared test doubles

use async_trait::async_trait;
use nrc_domain::error::Result;
use nrc_domain::ports::HttpTransport;
use nrc_domain::value_objects::{HttpRequest, HttpResponse, ServiceName};
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn(usize, &HttpRequest) -> Result<HttpResponse> + Send + Sync>;

/// Transport recording every request and answering from a closure
///
/// The closure receives the zero-based attempt number and the request.
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responder: Responder,
}

impl RecordingTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(usize, &HttpRequest) -> Result<HttpResponse> + Send + Sync + 'static,
    {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Always answer 200 with `body` as JSON
    pub fn json(body: serde_json::Value) -> Arc<Self> {
        Self::new(move |_, _| HttpResponse::json(&body))
    }

    /// Always answer with `status` and an empty body
    pub fn status(status: u16) -> Arc<Self> {
        Self::new(move |_, _| Ok(HttpResponse::new(status, Vec::new())))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(&self, _service: &ServiceName, request: HttpRequest) -> Result<HttpResponse> {
        let attempt = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        (self.responder)(attempt, &request)
    }

    fn name(&self) -> &str {
        "recording"
    }
}

pub fn service(name: &str) -> ServiceName {
    ServiceName::new(name).unwrap()
}

//! Remote method descriptors and call arguments
//!
//! A declared remote interface is described once, at bind time, as a table
//! of [`MethodDescriptor`]s. Calls then pass [`RequestArgs`] by method name.

use super::http::HttpMethod;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a method's response body is handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseDecoder {
    /// Parse the body as JSON
    #[default]
    Json,
    /// Return the body as UTF-8 text
    Text,
    /// Ignore the body
    Discard,
}

/// One entry of a remote interface's dispatch table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name used by callers
    pub name: String,
    /// HTTP verb
    pub method: HttpMethod,
    /// Path template relative to the client path, e.g. `/user/{id}`
    pub path: String,
    /// Response decoding strategy
    pub decoder: ResponseDecoder,
}

impl MethodDescriptor {
    /// Create a descriptor decoding JSON
    pub fn new<N: Into<String>, P: Into<String>>(name: N, method: HttpMethod, path: P) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            decoder: ResponseDecoder::Json,
        }
    }

    /// `GET` descriptor
    pub fn get<N: Into<String>, P: Into<String>>(name: N, path: P) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    /// `POST` descriptor
    pub fn post<N: Into<String>, P: Into<String>>(name: N, path: P) -> Self {
        Self::new(name, HttpMethod::Post, path)
    }

    /// `PUT` descriptor
    pub fn put<N: Into<String>, P: Into<String>>(name: N, path: P) -> Self {
        Self::new(name, HttpMethod::Put, path)
    }

    /// `DELETE` descriptor
    pub fn delete<N: Into<String>, P: Into<String>>(name: N, path: P) -> Self {
        Self::new(name, HttpMethod::Delete, path)
    }

    /// Override the response decoder
    pub fn with_decoder(mut self, decoder: ResponseDecoder) -> Self {
        self.decoder = decoder;
        self
    }
}

/// Arguments of a single remote call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestArgs {
    /// Values for `{name}` segments of the path template
    pub path_vars: BTreeMap<String, String>,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// Extra headers
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: Option<serde_json::Value>,
}

impl RequestArgs {
    /// Empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a path variable
    pub fn path<K: Into<String>, V: ToString>(mut self, name: K, value: V) -> Self {
        self.path_vars.insert(name.into(), value.to_string());
        self
    }

    /// Append a query parameter
    pub fn query<K: Into<String>, V: ToString>(mut self, name: K, value: V) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Append a header
    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize a value as the JSON body
    pub fn json_body<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// A response body after applying the method's decoder
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    Json(serde_json::Value),
    Text(String),
    Empty,
}

//! Backend Exchange
//!
//! Transport-neutral request/response pair passed through the backend port.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use url::Url;

/// Request sent to the authentication backend
#[derive(Debug, Clone)]
pub struct BackendRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// JSON body, sent for non-GET calls only
    pub body: Option<Value>,
}

/// Response received from the authentication backend
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    /// Raw `Set-Cookie` header values, in order
    pub set_cookies: Vec<String>,
    pub body: Bytes,
}

impl BackendResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            set_cookies: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_cookie(mut self, raw: impl Into<String>) -> Self {
        self.set_cookies.push(raw.into());
        self
    }

    pub fn with_json(mut self, body: &Value) -> Self {
        self.body = Bytes::from(body.to_string());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

//! reqwest Backend Implementation

use axum::http::header;
use platform::client::build_http_client;

use crate::application::config::RelayConfig;
use crate::domain::entity::{BackendRequest, BackendResponse};
use crate::domain::repository::AuthBackend;
use crate::error::{AuthError, AuthResult};

/// HTTP-backed authentication backend
#[derive(Clone)]
pub struct HttpAuthBackend {
    client: reqwest::Client,
}

impl HttpAuthBackend {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build with the timeouts from `config`
    pub fn from_config(config: &RelayConfig) -> AuthResult<Self> {
        let client = build_http_client(&config.http_client_config())?;
        Ok(Self::new(client))
    }
}

impl AuthBackend for HttpAuthBackend {
    async fn send(&self, request: BackendRequest) -> AuthResult<BackendResponse> {
        let path = request.url.path().to_string();

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(upstream_error)?;

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();
        let body = response.bytes().await.map_err(upstream_error)?;

        tracing::debug!(path = %path, status = status.as_u16(), "Backend responded");

        Ok(BackendResponse {
            status,
            set_cookies,
            body,
        })
    }
}

fn upstream_error(err: reqwest::Error) -> AuthError {
    let cause = if err.is_timeout() {
        "timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    AuthError::UpstreamUnavailable(cause)
}

//! HTTP client utilities
//!
//! Construction of the outbound (upstream) HTTP client and identification of
//! the browser-side client from request headers.

use axum::http::HeaderMap;
use std::net::IpAddr;
use std::time::Duration;

/// Outbound HTTP client settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Total per-request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// User-Agent sent upstream
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            user_agent: concat!("edge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Error when building the outbound client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Build the outbound HTTP client
///
/// Redirects are not followed: a redirect from the backend is relayed to the
/// caller like any other status. Cookies are never stored in the client, each
/// request carries exactly the cookies the caller forwards.
pub fn build_http_client(config: &HttpClientConfig) -> Result<reqwest::Client, ClientError> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(config.user_agent.clone())
        .pool_idle_timeout(Duration::from_secs(90))
        .build()?;

    Ok(client)
}

/// Build the X-Forwarded-For value to send upstream
///
/// Appends the direct peer to any chain received from a proxy in front of
/// the edge.
pub fn forwarded_for(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<String> {
    let existing = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (existing, direct_ip) {
        (Some(chain), Some(ip)) => Some(format!("{chain}, {ip}")),
        (Some(chain), None) => Some(chain.to_string()),
        (None, Some(ip)) => Some(ip.to_string()),
        (None, None) => None,
    }
}

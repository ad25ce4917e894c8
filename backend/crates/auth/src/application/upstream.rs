//! Upstream Request Construction
//!
//! Every call to the backend (token bootstrap, relayed operation, who-am-I)
//! carries the same header set, built here.

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use serde_json::Value;

use crate::application::config::RelayConfig;
use crate::domain::entity::{BackendRequest, RelayContext};
use crate::domain::value_object::CookiePolicy;
use crate::error::{AuthError, AuthResult};

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");
const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Build a backend request for `path`
///
/// The body is dropped for GET.
pub fn build_backend_request(
    config: &RelayConfig,
    policy: &CookiePolicy,
    ctx: &RelayContext,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> AuthResult<BackendRequest> {
    let url = config.urls.endpoint(path)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        X_REQUESTED_WITH,
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(
        header::REFERER,
        header_value(config.urls.frontend_referer(), "referer")?,
    );
    headers.insert(
        header::ORIGIN,
        header_value(&config.urls.frontend_origin(), "origin")?,
    );

    if let Some(token) = &ctx.csrf {
        headers.insert(
            config.csrf_header_name.clone(),
            header_value(&token.header_value(), "anti-forgery token")?,
        );
    }
    if let Some(cookie) = ctx.cookie_header(policy) {
        headers.insert(header::COOKIE, header_value(&cookie, "cookie")?);
    }
    if let Some(forwarded) = &ctx.forwarded_for {
        headers.insert(X_FORWARDED_FOR, header_value(forwarded, "forwarded-for")?);
    }

    let body = if method == Method::GET { None } else { body };
    if body.is_some() {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }

    Ok(BackendRequest {
        method,
        url,
        headers,
        body,
    })
}

fn header_value(value: &str, what: &str) -> AuthResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| AuthError::InvalidRequest(format!("{what} is not a valid header value")))
}

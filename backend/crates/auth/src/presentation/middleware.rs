//! Auth Middleware
//!
//! `resolve_auth_context` runs before page handlers and stores an
//! [`AuthContext`] in request extensions. `require_authenticated` sends
//! anonymous callers to the login page.

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::config::RelayConfig;
use crate::domain::entity::AuthContext;
use crate::domain::repository::AuthBackend;
use crate::presentation::handlers::RelayAppState;

/// Middleware that resolves the auth context for every request
///
/// Never rejects. Page handlers read the result with
/// `Extension<AuthContext>`.
pub async fn resolve_auth_context<B>(
    State(state): State<RelayAppState<B>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    let ctx = state.relay_context(req.headers(), client_ip);
    let auth = state.auth_context().execute(ctx).await;

    req.extensions_mut().insert(auth);

    next.run(req).await
}

/// Middleware that requires an authenticated context
///
/// Must run after [`resolve_auth_context`]; a missing context counts as
/// anonymous.
pub async fn require_authenticated(
    State(config): State<Arc<RelayConfig>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let authenticated = req
        .extensions()
        .get::<AuthContext>()
        .is_some_and(AuthContext::is_authenticated);

    if authenticated {
        return next.run(req).await;
    }

    let original = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    login_redirect(&config.login_path, original).into_response()
}

/// 307 to the login page, remembering where the caller was going
pub fn login_redirect(login_path: &str, redirect_to: &str) -> Redirect {
    Redirect::temporary(&format!(
        "{login_path}?redirectTo={}",
        urlencoding::encode(redirect_to)
    ))
}

//! Relay Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::application::config::RelayConfig;
use crate::domain::repository::AuthBackend;
use crate::error::AuthResult;
use crate::infra::http::HttpAuthBackend;
use crate::presentation::handlers::{self, RelayAppState};
use crate::presentation::middleware::{require_authenticated, resolve_auth_context};

/// Create the relay router with the reqwest backend
pub fn relay_router(config: RelayConfig) -> AuthResult<Router> {
    let backend = HttpAuthBackend::from_config(&config)?;
    Ok(relay_router_generic(backend, config))
}

/// Create a relay router for any backend implementation
pub fn relay_router_generic<B>(backend: B, config: RelayConfig) -> Router
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    relay_routes(RelayAppState::new(backend, config))
}

/// Relay routes over an existing state
pub fn relay_routes<B>(state: RelayAppState<B>) -> Router
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/csrf", get(handlers::csrf_cookie::<B>))
        .route("/login", post(handlers::login::<B>))
        .route("/register", post(handlers::register::<B>))
        .route("/logout", post(handlers::logout::<B>))
        .route("/user", get(handlers::current_user::<B>))
        .route("/email/resend", post(handlers::resend_verification::<B>))
        .route("/email/verify/resend", post(handlers::resend_verification::<B>))
        .route("/email/send", post(handlers::send_verification::<B>))
        .route("/status", get(handlers::session_status::<B>))
        .with_state(state)
}

/// Guard page routes
///
/// Every request gets an `AuthContext` extension; anonymous ones are
/// redirected to the login page.
pub fn protected_pages<B>(pages: Router, state: RelayAppState<B>) -> Router
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    pages
        .layer(from_fn_with_state(state.config.clone(), require_authenticated))
        .layer(from_fn_with_state(state, resolve_auth_context::<B>))
}

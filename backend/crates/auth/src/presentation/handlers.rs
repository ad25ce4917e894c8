//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use platform::client::forwarded_for;

use crate::application::config::RelayConfig;
use crate::application::{
    CsrfBootstrapper, RelayOutcome, RelayUseCase, ResolveAuthContextUseCase,
};
use crate::domain::entity::{AuthContext, LoginForm, RegistrationForm, RelayContext};
use crate::domain::repository::AuthBackend;
use crate::domain::value_object::{CookieWrite, Operation};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LoginRequest, RegisterRequest, SuccessResponse};

const TOKEN_ISSUED_MESSAGE: &str = "Anti-forgery token issued";

/// Shared state for relay handlers
#[derive(Clone)]
pub struct RelayAppState<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    pub backend: Arc<B>,
    pub config: Arc<RelayConfig>,
}

impl<B> RelayAppState<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    pub fn new(backend: B, config: RelayConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config: Arc::new(config),
        }
    }

    pub fn relay(&self) -> RelayUseCase<B> {
        RelayUseCase::new(self.backend.clone(), self.config.clone())
    }

    pub fn auth_context(&self) -> ResolveAuthContextUseCase<B> {
        ResolveAuthContextUseCase::new(self.backend.clone(), self.config.clone())
    }

    /// Credential set for this request
    pub fn relay_context(&self, headers: &HeaderMap, client_ip: Option<IpAddr>) -> RelayContext {
        RelayContext::from_headers(&self.config.cookie_policy(), headers)
            .with_forwarded_for(forwarded_for(headers, client_ip))
    }
}

/// Peer address, when the server was started with connect info
pub struct ClientAddr(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientAddr(
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip()),
        ))
    }
}

// ============================================================================
// Anti-forgery token
// ============================================================================

/// GET /auth/csrf
pub async fn csrf_cookie<B>(
    State(state): State<RelayAppState<B>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let mut ctx = state.relay_context(&headers, client_ip);

    CsrfBootstrapper::new(state.backend.clone(), state.config.clone())
        .refresh(&mut ctx)
        .await?;

    let response = Json(SuccessResponse::ok(TOKEN_ISSUED_MESSAGE)).into_response();

    Ok(with_cookies(response, &ctx.take_writes()))
}

// ============================================================================
// Login / Registration
// ============================================================================

/// POST /auth/login
pub async fn login<B>(
    State(state): State<RelayAppState<B>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(invalid_body)?;

    let form = LoginForm::from(req);
    form.validate()?;

    let mut ctx = state.relay_context(&headers, client_ip);
    let outcome = state
        .relay()
        .execute(Operation::Login, &mut ctx, Some(to_json(&form)?))
        .await?;

    Ok(relay_response(outcome))
}

/// POST /auth/register
pub async fn register<B>(
    State(state): State<RelayAppState<B>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(invalid_body)?;

    let form = RegistrationForm::from(req);
    form.validate()?;

    let mut ctx = state.relay_context(&headers, client_ip);
    let outcome = state
        .relay()
        .execute(Operation::Register, &mut ctx, Some(to_json(&form)?))
        .await?;

    Ok(relay_response(outcome))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /auth/logout
///
/// Always 200, always clears both cookies.
pub async fn logout<B>(
    State(state): State<RelayAppState<B>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
) -> Response
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let mut ctx = state.relay_context(&headers, client_ip);
    let outcome = state.relay().logout(&mut ctx).await;
    relay_response(outcome)
}

// ============================================================================
// Current user / verification
// ============================================================================

/// GET /auth/user
pub async fn current_user<B>(
    State(state): State<RelayAppState<B>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let mut ctx = state.relay_context(&headers, client_ip);
    let outcome = state
        .relay()
        .execute(Operation::FetchUser, &mut ctx, None)
        .await?;

    Ok(relay_response(outcome))
}

/// POST /auth/email/resend
pub async fn resend_verification<B>(
    State(state): State<RelayAppState<B>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
    body: Bytes,
) -> AuthResult<Response>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    relay_with_optional_body(state, client_ip, &headers, &body, Operation::ResendVerification)
        .await
}

/// POST /auth/email/send
pub async fn send_verification<B>(
    State(state): State<RelayAppState<B>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
    body: Bytes,
) -> AuthResult<Response>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    relay_with_optional_body(state, client_ip, &headers, &body, Operation::SendVerification).await
}

async fn relay_with_optional_body<B>(
    state: RelayAppState<B>,
    client_ip: Option<IpAddr>,
    headers: &HeaderMap,
    body: &[u8],
    operation: Operation,
) -> AuthResult<Response>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(
            serde_json::from_slice::<Value>(body)
                .map_err(|e| AuthError::InvalidRequest(e.to_string()))?,
        )
    };

    let mut ctx = state.relay_context(headers, client_ip);
    let outcome = state.relay().execute(operation, &mut ctx, payload).await?;

    Ok(relay_response(outcome))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /auth/status
pub async fn session_status<B>(
    State(state): State<RelayAppState<B>>,
    ClientAddr(client_ip): ClientAddr,
    headers: HeaderMap,
) -> Json<AuthContext>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let ctx = state.relay_context(&headers, client_ip);
    Json(state.auth_context().execute(ctx).await)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Backend status and body, plus the projected cookies
pub fn relay_response(outcome: RelayOutcome) -> Response {
    let response = match outcome.body {
        Some(body) => (outcome.status, Json(body)).into_response(),
        None => outcome.status.into_response(),
    };

    with_cookies(response, &outcome.cookies)
}

fn with_cookies(mut response: Response, cookies: &[CookieWrite]) -> Response {
    let headers = response.headers_mut();
    for cookie in cookies {
        match cookie.header_value() {
            Some(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            None => {
                tracing::warn!(cookie = %cookie.config.name, "Cookie value not representable as header");
            }
        }
    }
    response
}

fn invalid_body(rejection: JsonRejection) -> AuthError {
    AuthError::InvalidRequest(rejection.body_text())
}

fn to_json<T: serde::Serialize>(form: &T) -> AuthResult<Value> {
    serde_json::to_value(form).map_err(|e| AuthError::Internal(e.to_string()))
}

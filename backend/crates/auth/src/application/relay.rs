//! Relay Use Case
//!
//! One state machine for every browser-facing auth operation:
//!
//! ```text
//! NeedToken -> Calling -> Success
//!                      -> TokenRejected -> Refreshing -> Calling
//!                      -> Failed
//! ```
//!
//! The first token mismatch is refreshed and the call retried once; a second
//! mismatch is terminal. A mismatch never reaches the browser as a raw status,
//! read-only calls included.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::application::config::RelayConfig;
use crate::application::csrf::CsrfBootstrapper;
use crate::application::upstream::build_backend_request;
use crate::domain::entity::{BackendResponse, RelayContext};
use crate::domain::repository::AuthBackend;
use crate::domain::value_object::{CookiePolicy, CookieWrite, Operation};
use crate::error::{AuthError, AuthResult};

const LOGOUT_MESSAGE: &str = "Logged out successfully";

/// Result of a relay invocation, ready to be written to the browser
#[derive(Debug, Clone)]
pub struct RelayOutcome {
    pub status: StatusCode,
    /// Backend JSON body; `None` when the backend sent nothing
    pub body: Option<Value>,
    /// Cookies to set on the browser, already projected through the policy
    pub cookies: Vec<CookieWrite>,
}

pub struct RelayUseCase<B>
where
    B: AuthBackend,
{
    backend: Arc<B>,
    config: Arc<RelayConfig>,
    policy: CookiePolicy,
    csrf: CsrfBootstrapper<B>,
}

impl<B> RelayUseCase<B>
where
    B: AuthBackend,
{
    pub fn new(backend: Arc<B>, config: Arc<RelayConfig>) -> Self {
        let policy = config.cookie_policy();
        let csrf = CsrfBootstrapper::new(Arc::clone(&backend), Arc::clone(&config));
        Self {
            backend,
            config,
            policy,
            csrf,
        }
    }

    pub fn policy(&self) -> &CookiePolicy {
        &self.policy
    }

    /// Run one operation against the backend
    ///
    /// Backend answers other than success are returned as outcomes with no
    /// cookies. Only edge-side failures are errors.
    pub async fn execute(
        &self,
        operation: Operation,
        ctx: &mut RelayContext,
        body: Option<Value>,
    ) -> AuthResult<RelayOutcome> {
        if operation.requires_session() && !ctx.has_session() {
            return Err(AuthError::SessionMissing);
        }

        if operation.is_mutating() {
            self.csrf.ensure_token(ctx).await?;
        }

        let mut attempt: u32 = 1;
        loop {
            let response = self.call(operation, ctx, body.clone()).await?;

            if response.status == self.config.token_mismatch_status {
                if attempt > 1 {
                    tracing::warn!(
                        operation = %operation,
                        attempt,
                        "Refreshed anti-forgery token rejected"
                    );
                    ctx.discard_writes();
                    return Err(AuthError::TokenMismatch);
                }

                tracing::info!(
                    operation = %operation,
                    attempt,
                    "Anti-forgery token rejected, refreshing"
                );
                self.csrf.refresh(ctx).await?;
                attempt += 1;
                continue;
            }

            if !response.is_success() {
                tracing::debug!(
                    operation = %operation,
                    status = response.status.as_u16(),
                    "Relaying backend rejection"
                );
                ctx.discard_writes();
                return Ok(RelayOutcome {
                    status: response.status,
                    body: lenient_body(&response),
                    cookies: Vec::new(),
                });
            }

            ctx.absorb_all(&self.policy, &response.set_cookies);
            let body = strict_body(&response)?;

            tracing::debug!(
                operation = %operation,
                status = response.status.as_u16(),
                attempt,
                "Backend call succeeded"
            );

            return Ok(RelayOutcome {
                status: response.status,
                body,
                cookies: ctx.take_writes(),
            });
        }
    }

    /// Log out
    ///
    /// Never fails: both cookies are cleared whatever the backend says. The
    /// backend is only called when the browser has a session to end.
    pub async fn logout(&self, ctx: &mut RelayContext) -> RelayOutcome {
        let mut message = LOGOUT_MESSAGE.to_string();

        if ctx.has_session() {
            match self.execute(Operation::Logout, ctx, None).await {
                Ok(outcome) if outcome.status.is_success() => {
                    if let Some(text) = outcome
                        .body
                        .as_ref()
                        .and_then(|body| body.get("message"))
                        .and_then(Value::as_str)
                    {
                        message = text.to_string();
                    }
                }
                Ok(outcome) => {
                    tracing::warn!(
                        status = outcome.status.as_u16(),
                        "Backend rejected logout, clearing cookies anyway"
                    );
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Backend logout failed, clearing cookies anyway");
                }
            }
        }

        RelayOutcome {
            status: StatusCode::OK,
            body: Some(json!({ "success": true, "message": message })),
            cookies: self.policy.deletions().into(),
        }
    }

    async fn call(
        &self,
        operation: Operation,
        ctx: &RelayContext,
        body: Option<Value>,
    ) -> AuthResult<BackendResponse> {
        let request = build_backend_request(
            &self.config,
            &self.policy,
            ctx,
            operation.method(),
            self.config.paths.path_for(operation),
            body,
        )?;

        self.backend.send(request).await
    }
}

/// Success bodies must be JSON (or empty)
fn strict_body(response: &BackendResponse) -> AuthResult<Option<Value>> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(&response.body)
        .map(Some)
        .map_err(|e| AuthError::MalformedUpstream(e.to_string()))
}

/// Rejection bodies are relayed when they are JSON; anything else is dropped
fn lenient_body(response: &BackendResponse) -> Option<Value> {
    match serde_json::from_slice(&response.body) {
        Ok(body) => Some(body),
        Err(_) => {
            if !response.body.is_empty() {
                tracing::debug!(
                    status = response.status.as_u16(),
                    "Dropping non-JSON rejection body"
                );
            }
            None
        }
    }
}

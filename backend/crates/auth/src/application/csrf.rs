//! Anti-Forgery Token Bootstrap
//!
//! Obtains the backend's anti-forgery token before a mutating call.

use std::sync::Arc;

use axum::http::Method;

use crate::application::config::RelayConfig;
use crate::application::upstream::build_backend_request;
use crate::domain::entity::RelayContext;
use crate::domain::repository::AuthBackend;
use crate::domain::value_object::{AntiForgeryToken, CookiePolicy, CookieRole};
use crate::error::{AuthError, AuthResult};

pub struct CsrfBootstrapper<B>
where
    B: AuthBackend,
{
    backend: Arc<B>,
    config: Arc<RelayConfig>,
    policy: CookiePolicy,
}

impl<B> CsrfBootstrapper<B>
where
    B: AuthBackend,
{
    pub fn new(backend: Arc<B>, config: Arc<RelayConfig>) -> Self {
        let policy = config.cookie_policy();
        Self {
            backend,
            config,
            policy,
        }
    }

    /// Return the browser's token, or fetch one when there is none
    pub async fn ensure_token(&self, ctx: &mut RelayContext) -> AuthResult<AntiForgeryToken> {
        match &ctx.csrf {
            Some(token) => Ok(token.clone()),
            None => self.refresh(ctx).await,
        }
    }

    /// Always ask the backend for a new token
    ///
    /// Issued session and token cookies are absorbed into `ctx`, so they
    /// are both sent on the next call and relayed to the browser.
    pub async fn refresh(&self, ctx: &mut RelayContext) -> AuthResult<AntiForgeryToken> {
        let request = build_backend_request(
            &self.config,
            &self.policy,
            ctx,
            Method::GET,
            &self.config.paths.csrf_cookie,
            None,
        )?;

        let response = self.backend.send(request).await?;

        if !response.is_success() {
            return Err(AuthError::UpstreamUnavailable(format!(
                "token endpoint answered {}",
                response.status
            )));
        }

        let mut issued = false;
        for raw in &response.set_cookies {
            if ctx.absorb(&self.policy, raw) == Some(CookieRole::Csrf) {
                issued = true;
            }
        }

        match (&ctx.csrf, issued) {
            (Some(token), true) => {
                tracing::debug!("Anti-forgery token issued");
                Ok(token.clone())
            }
            _ => Err(AuthError::UpstreamUnavailable(
                "token endpoint issued no token cookie".to_string(),
            )),
        }
    }
}

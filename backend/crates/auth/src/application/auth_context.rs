//! Resolve Auth Context Use Case
//!
//! Turns the browser's cookies into an [`AuthContext`]. Any failure to
//! confirm the session means "not authenticated".

use std::sync::Arc;

use crate::application::config::RelayConfig;
use crate::application::relay::RelayUseCase;
use crate::domain::entity::{AuthContext, RelayContext, UserSummary};
use crate::domain::repository::AuthBackend;
use crate::domain::value_object::Operation;

pub struct ResolveAuthContextUseCase<B>
where
    B: AuthBackend,
{
    relay: RelayUseCase<B>,
}

impl<B> ResolveAuthContextUseCase<B>
where
    B: AuthBackend,
{
    pub fn new(backend: Arc<B>, config: Arc<RelayConfig>) -> Self {
        Self {
            relay: RelayUseCase::new(backend, config),
        }
    }

    /// No session cookie means no backend call
    pub async fn execute(&self, mut ctx: RelayContext) -> AuthContext {
        if !ctx.has_session() {
            return AuthContext::anonymous();
        }

        match self.relay.execute(Operation::FetchUser, &mut ctx, None).await {
            Ok(outcome) if outcome.status.is_success() => {
                match outcome.body.and_then(UserSummary::from_response) {
                    Some(user) => AuthContext::authenticated(user),
                    None => {
                        tracing::warn!("Backend user body not recognized");
                        AuthContext::unverified()
                    }
                }
            }
            Ok(outcome) => {
                tracing::debug!(
                    status = outcome.status.as_u16(),
                    "Session not accepted by backend"
                );
                AuthContext::unverified()
            }
            Err(err) => {
                tracing::warn!(error = %err, "Could not verify session");
                AuthContext::unverified()
            }
        }
    }
}

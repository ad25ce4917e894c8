//! Backend Port
//!
//! Interface to the session-cookie authentication backend. The reqwest
//! implementation lives in the infrastructure layer.

use crate::domain::entity::backend_exchange::{BackendRequest, BackendResponse};
use crate::error::AuthResult;

/// Authentication backend trait
///
/// Any HTTP status is a successful exchange. Only transport failures
/// (unreachable, timeout, unreadable body) are errors.
#[trait_variant::make(AuthBackend: Send)]
pub trait LocalAuthBackend {
    /// Send one request and return the raw response
    async fn send(&self, request: BackendRequest) -> AuthResult<BackendResponse>;
}

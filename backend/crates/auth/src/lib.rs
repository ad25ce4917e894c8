//! Auth (Authentication) Relay Module
//!
//! Clean Architecture structure:
//! - `domain/` - Relay entities, value objects and the backend port
//! - `application/` - Configuration, token bootstrap, relay state machine
//! - `infra/` - reqwest implementation of the backend port
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Login / registration / logout / current user / email verification relayed
//!   to a session-cookie authentication backend
//! - Anti-forgery token bootstrap and single transparent retry on token mismatch
//! - Per-request auth context resolved before page handlers run
//!
//! ## Security Model
//! - Only the session and anti-forgery cookies cross the edge, in either direction
//! - Session cookie always written `HttpOnly`, whatever the backend sent
//! - Failure to verify a session means "not authenticated"
//! - Logout clears browser cookies even when the backend is unreachable

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{DeploymentMode, RelayConfig, UrlResolver};
pub use domain::entity::auth_context::AuthContext;
pub use error::{AuthError, AuthResult};
pub use infra::http::HttpAuthBackend;
pub use presentation::handlers::RelayAppState;
pub use presentation::router::{protected_pages, relay_router, relay_router_generic, relay_routes};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

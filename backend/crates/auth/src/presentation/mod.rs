//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::RelayAppState;
pub use middleware::{require_authenticated, resolve_auth_context};
pub use router::{protected_pages, relay_router, relay_router_generic, relay_routes};

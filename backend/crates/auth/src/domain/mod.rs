//! Domain Layer
//!
//! Contains entities, value objects, and the backend port.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{AuthContext, BackendRequest, BackendResponse, RelayContext, UserSummary};
pub use repository::{AuthBackend, LocalAuthBackend};

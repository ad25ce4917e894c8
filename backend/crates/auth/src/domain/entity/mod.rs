//! Entity Module

pub mod auth_context;
pub mod backend_exchange;
pub mod forms;
pub mod relay_context;
pub mod user_summary;

pub use auth_context::AuthContext;
pub use backend_exchange::{BackendRequest, BackendResponse};
pub use forms::{LoginForm, RegistrationForm};
pub use relay_context::RelayContext;
pub use user_summary::UserSummary;

//! Application Layer
//!
//! Use cases and application services.

pub mod auth_context;
pub mod config;
pub mod csrf;
pub mod relay;
pub mod upstream;

// Re-exports
pub use auth_context::ResolveAuthContextUseCase;
pub use config::{BackendPaths, DeploymentMode, RelayConfig, UrlResolver};
pub use csrf::CsrfBootstrapper;
pub use relay::{RelayOutcome, RelayUseCase};

//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" shared by every crate of the edge:
//! - Common error type, error kinds and result aliases
//! - Conversions from common library errors
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all crates.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}

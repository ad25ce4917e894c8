//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cookie parsing and serialization
//! - Outbound HTTP client construction
//! - Client identification from request headers

pub mod client;
pub mod cookie;

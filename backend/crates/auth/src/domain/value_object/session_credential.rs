//! Session Credential Value Object
//!
//! Opaque backend-issued session identifier, carried in an HttpOnly cookie.

use std::fmt;

/// Session credential (cookie value, never inspected)
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    /// Wrap a cookie value. Empty values are treated as absent.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return None;
        }
        Some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the credential itself
impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionCredential(<{} bytes>)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_absent() {
        assert!(SessionCredential::new("").is_none());
        assert!(SessionCredential::new("   ").is_none());
        assert_eq!(SessionCredential::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_debug_redacts_value() {
        let credential = SessionCredential::new("super-secret").unwrap();
        let debug = format!("{credential:?}");
        assert!(!debug.contains("super-secret"));
    }
}

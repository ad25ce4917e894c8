//! Relay Operation
//!
//! The browser-facing auth operations. Every one of them goes through the
//! same relay state machine; this type carries the per-operation differences.

use axum::http::Method;
use std::fmt;

/// Operation relayed to the authentication backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Register,
    Logout,
    FetchUser,
    ResendVerification,
    SendVerification,
}

impl Operation {
    /// HTTP method used upstream
    pub fn method(&self) -> Method {
        match self {
            Operation::FetchUser => Method::GET,
            _ => Method::POST,
        }
    }

    /// Mutating operations need an anti-forgery token before the call
    pub fn is_mutating(&self) -> bool {
        self.method() != Method::GET
    }

    /// Operations answered locally with 401 when no session cookie is present
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Operation::ResendVerification | Operation::SendVerification
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::Register => "register",
            Operation::Logout => "logout",
            Operation::FetchUser => "fetch_user",
            Operation::ResendVerification => "resend_verification",
            Operation::SendVerification => "send_verification",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

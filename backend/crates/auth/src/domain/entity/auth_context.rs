//! Auth Context Entity
//!
//! Per-request authentication state. Built from cookies on every request and
//! stored in request extensions; never cached.

use serde::Serialize;

use super::user_summary::UserSummary;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub is_authenticated: bool,
    pub session_present: bool,
    pub user: Option<UserSummary>,
}

impl AuthContext {
    /// No session cookie
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session cookie present but the backend did not confirm it
    pub fn unverified() -> Self {
        Self {
            is_authenticated: false,
            session_present: true,
            user: None,
        }
    }

    pub fn authenticated(user: UserSummary) -> Self {
        Self {
            is_authenticated: true,
            session_present: true,
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn user(&self) -> Option<&UserSummary> {
        self.user.as_ref()
    }
}

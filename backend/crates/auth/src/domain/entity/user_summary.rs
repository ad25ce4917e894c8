//! User Summary Entity
//!
//! The backend's view of the current user. The edge only reads the identity
//! fields; everything else is carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Backend user identifier, numeric or string depending on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

/// Current user as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub email_verified_at: Option<String>,
    /// Remaining backend fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserSummary {
    /// Read a user from a backend body
    ///
    /// Accepts either `{ "user": { .. } }` or the bare user object.
    pub fn from_response(body: Value) -> Option<Self> {
        let user = match body {
            Value::Object(mut map) if map.get("user").is_some_and(Value::is_object) => {
                map.remove("user")?
            }
            other => other,
        };

        let mut summary: UserSummary = serde_json::from_value(user).ok()?;
        // Some backends only send the timestamp
        if summary.email_verified_at.is_some() {
            summary.email_verified = true;
        }
        Some(summary)
    }

    pub fn is_verified(&self) -> bool {
        self.email_verified
    }
}

//! API DTOs (Data Transfer Objects)
//!
//! Browser-side field names. The mapping to backend names is declared here
//! once; aliases cover the older spellings some clients still send.

use serde::{Deserialize, Serialize};

use crate::domain::entity::{LoginForm, RegistrationForm};

// ============================================================================
// Login
// ============================================================================

/// Login request
///
/// Missing fields default to empty so that local validation, not the JSON
/// extractor, reports them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember: Option<bool>,
}

impl From<LoginRequest> for LoginForm {
    fn from(req: LoginRequest) -> Self {
        LoginForm {
            email: req.email.trim().to_string(),
            password: req.password,
            remember: req.remember,
        }
    }
}

// ============================================================================
// Registration
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default, alias = "firstName")]
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "password_confirmation")]
    pub password_confirmation: String,
    #[serde(default, alias = "terms_accepted")]
    pub terms_accepted: Option<bool>,
}

impl From<RegisterRequest> for RegistrationForm {
    fn from(req: RegisterRequest) -> Self {
        RegistrationForm {
            name: req.name.trim().to_string(),
            city: req
                .city
                .map(|city| city.trim().to_string())
                .filter(|city| !city.is_empty()),
            email: req.email.trim().to_string(),
            password: req.password,
            password_confirmation: req.password_confirmation,
            terms_accepted: req.terms_accepted,
        }
    }
}

// ============================================================================
// Generic
// ============================================================================

/// Edge-generated acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

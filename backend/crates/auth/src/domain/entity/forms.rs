//! Credential Forms
//!
//! Bodies forwarded to the backend, in the backend's field naming. Local
//! checks run before any network call; error keys use the same field names
//! the backend uses in its own validation responses.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Field -> messages, collected during validation
#[derive(Debug, Default)]
struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    fn require(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, message);
            false
        } else {
            true
        }
    }

    fn into_result(self, fallback: &str) -> AuthResult<()> {
        if self.0.is_empty() {
            return Ok(());
        }

        let message = if self.0.len() == 1 {
            self.0
                .values()
                .flatten()
                .next()
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        } else {
            fallback.to_string()
        };

        Err(AuthError::Validation {
            message,
            errors: serde_json::to_value(&self.0).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember: Option<bool>,
}

impl LoginForm {
    pub fn validate(&self) -> AuthResult<()> {
        let mut errors = FieldErrors::default();
        errors.require("email", &self.email, "Email is required");
        errors.require("password", &self.password, "Password is required");
        errors.into_result("Email and password are required")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationForm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_accepted: Option<bool>,
}

impl RegistrationForm {
    pub fn validate(&self) -> AuthResult<()> {
        let mut errors = FieldErrors::default();

        errors.require("name", &self.name, "Name is required");

        if errors.require("email", &self.email, "Email is required") {
            if let Err(err) = Email::new(self.email.as_str()) {
                errors.add("email", err.message());
            }
        }

        let has_password = errors.require("password", &self.password, "Password is required");
        let has_confirmation = errors.require(
            "password_confirmation",
            &self.password_confirmation,
            "Password confirmation is required",
        );

        if has_password && has_confirmation && self.password != self.password_confirmation {
            errors.add("password_confirmation", "Passwords do not match");
        }

        errors.into_result("Please fill in all required fields")
    }
}

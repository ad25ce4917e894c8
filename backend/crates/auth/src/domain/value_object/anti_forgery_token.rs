//! Anti-Forgery Token Value Object
//!
//! The backend writes the token URL-encoded into a script-readable cookie and
//! expects the decoded value back in a request header.

use std::borrow::Cow;

/// Anti-forgery token as stored in the cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntiForgeryToken(String);

impl AntiForgeryToken {
    /// Wrap a raw cookie value. Empty values are treated as absent.
    pub fn new(cookie_value: impl Into<String>) -> Option<Self> {
        let value = cookie_value.into();
        if value.trim().is_empty() {
            return None;
        }
        Some(Self(value))
    }

    /// Value for the `Cookie` header, exactly as issued
    pub fn cookie_value(&self) -> &str {
        &self.0
    }

    /// Value for the anti-forgery request header (percent-decoded)
    ///
    /// Falls back to the raw value when it is not valid percent-encoding.
    pub fn header_value(&self) -> Cow<'_, str> {
        urlencoding::decode(&self.0).unwrap_or(Cow::Borrowed(&self.0))
    }
}

//! Cookie Role and Relay Policy
//!
//! Decides which backend cookies reach the browser and with which attributes.
//! The policy wins over whatever attributes the backend put on its own
//! `Set-Cookie` header.

use axum::http::HeaderValue;
use platform::cookie::{CookieConfig, SameSite, SetCookie, delete_cookie_header, set_cookie_header};

/// Role of a cookie crossing the edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieRole {
    /// Backend session credential
    Session,
    /// Anti-forgery token, readable by client script
    Csrf,
    /// Anything else; never relayed
    Other,
}

/// A cookie the edge writes on its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieWrite {
    pub role: CookieRole,
    pub config: CookieConfig,
    /// `None` deletes the cookie
    pub value: Option<String>,
}

impl CookieWrite {
    pub fn is_deletion(&self) -> bool {
        self.value.is_none()
    }

    /// Serialized `Set-Cookie` value
    pub fn to_header_string(&self) -> String {
        match &self.value {
            Some(value) => self.config.build_set_cookie(value),
            None => self.config.build_delete_cookie(),
        }
    }

    /// `Set-Cookie` header value; `None` if the value is not a valid header
    pub fn header_value(&self) -> Option<HeaderValue> {
        match &self.value {
            Some(value) => set_cookie_header(&self.config, value),
            None => delete_cookie_header(&self.config),
        }
    }
}

/// Cookie projection policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    session: CookieConfig,
    csrf: CookieConfig,
}

impl CookiePolicy {
    /// Build the policy
    ///
    /// Session cookie: `HttpOnly`, `SameSite=Lax`, `Path=/`, explicit Max-Age.
    /// Anti-forgery cookie: script-readable, `SameSite=Lax`, `Path=/`.
    pub fn new(
        session_cookie_name: impl Into<String>,
        csrf_cookie_name: impl Into<String>,
        session_max_age_secs: i64,
        secure: bool,
    ) -> Self {
        Self {
            session: CookieConfig {
                name: session_cookie_name.into(),
                secure,
                http_only: true,
                same_site: SameSite::Lax,
                path: "/".to_string(),
                max_age_secs: Some(session_max_age_secs),
            },
            csrf: CookieConfig {
                name: csrf_cookie_name.into(),
                secure,
                http_only: false,
                same_site: SameSite::Lax,
                path: "/".to_string(),
                max_age_secs: None,
            },
        }
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.session.name
    }

    pub fn csrf_cookie_name(&self) -> &str {
        &self.csrf.name
    }

    pub fn role_of(&self, cookie_name: &str) -> CookieRole {
        if cookie_name == self.session.name {
            CookieRole::Session
        } else if cookie_name == self.csrf.name {
            CookieRole::Csrf
        } else {
            CookieRole::Other
        }
    }

    fn config_for(&self, role: CookieRole) -> Option<&CookieConfig> {
        match role {
            CookieRole::Session => Some(&self.session),
            CookieRole::Csrf => Some(&self.csrf),
            CookieRole::Other => None,
        }
    }

    /// Project a cookie value onto its policy; `Other` cookies are dropped
    pub fn project(&self, cookie_name: &str, value: &str) -> Option<CookieWrite> {
        let role = self.role_of(cookie_name);
        let config = self.config_for(role)?;

        Some(CookieWrite {
            role,
            config: config.clone(),
            value: Some(value.to_string()),
        })
    }

    /// Project a parsed upstream `Set-Cookie`, honouring upstream deletions
    pub fn project_set_cookie(&self, cookie: &SetCookie) -> Option<CookieWrite> {
        let mut write = self.project(&cookie.name, &cookie.value)?;
        if cookie.is_removal() {
            write.value = None;
        }
        Some(write)
    }

    /// Deletion directives for both relayed cookies
    pub fn deletions(&self) -> [CookieWrite; 2] {
        [
            CookieWrite {
                role: CookieRole::Session,
                config: self.session.clone(),
                value: None,
            },
            CookieWrite {
                role: CookieRole::Csrf,
                config: self.csrf.clone(),
                value: None,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::cookie::parse_set_cookie;

    fn policy() -> CookiePolicy {
        CookiePolicy::new("laravel_session", "XSRF-TOKEN", 7200, false)
    }

    #[test]
    fn test_role_of() {
        let policy = policy();
        assert_eq!(policy.role_of("laravel_session"), CookieRole::Session);
        assert_eq!(policy.role_of("XSRF-TOKEN"), CookieRole::Csrf);
        assert_eq!(policy.role_of("remember_web_59ba"), CookieRole::Other);
    }

    #[test]
    fn test_session_projection_forces_http_only() {
        // Backend forgot HttpOnly; policy still applies it
        let raw = parse_set_cookie("laravel_session=abc; Path=/admin; SameSite=None").unwrap();
        let write = policy().project_set_cookie(&raw).unwrap();

        assert_eq!(write.role, CookieRole::Session);
        assert!(write.config.http_only);
        assert_eq!(write.config.same_site, SameSite::Lax);
        assert_eq!(write.config.path, "/");
        assert_eq!(write.config.max_age_secs, Some(7200));

        let header = write.to_header_string();
        assert!(header.starts_with("laravel_session=abc"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Max-Age=7200"));
    }

    #[test]
    fn test_session_projection_with_http_only_header() {
        let raw = parse_set_cookie("laravel_session=abc; HttpOnly; SameSite=Lax").unwrap();
        let write = policy().project_set_cookie(&raw).unwrap();
        assert!(write.config.http_only);
    }

    #[test]
    fn test_csrf_projection_is_script_readable() {
        let raw = parse_set_cookie("XSRF-TOKEN=t%3D; HttpOnly; Path=/").unwrap();
        let write = policy().project_set_cookie(&raw).unwrap();

        assert_eq!(write.role, CookieRole::Csrf);
        assert!(!write.config.http_only);
        assert!(!write.to_header_string().contains("HttpOnly"));
    }

    #[test]
    fn test_other_cookies_dropped() {
        let raw = parse_set_cookie("remember_web=xyz; HttpOnly").unwrap();
        assert!(policy().project_set_cookie(&raw).is_none());
    }

    #[test]
    fn test_upstream_removal_becomes_deletion() {
        let raw = parse_set_cookie("laravel_session=deleted; Max-Age=0").unwrap();
        let write = policy().project_set_cookie(&raw).unwrap();
        assert!(write.is_deletion());
        assert!(write.to_header_string().contains("Max-Age=0"));
    }

    #[test]
    fn test_deletions_cover_both_cookies() {
        let [session, csrf] = policy().deletions();
        assert!(session.is_deletion() && csrf.is_deletion());
        assert!(session.to_header_string().starts_with("laravel_session=;"));
        assert!(csrf.to_header_string().starts_with("XSRF-TOKEN=;"));
        assert!(session.header_value().is_some());
    }
}

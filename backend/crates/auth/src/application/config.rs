//! Relay Configuration
//!
//! Deployment mode, backend/frontend base URLs, cookie names and the other
//! literals of the relay protocol. Everything here can be overridden from the
//! environment; defaults match a stock Laravel Sanctum backend.

use std::time::Duration;

use axum::http::{HeaderName, StatusCode};
use kernel::error::app_error::{AppError, AppResult, ResultExt};
use kernel::error::kind::ErrorKind;
use platform::client::HttpClientConfig;
use url::Url;

use crate::domain::value_object::{CookiePolicy, Operation};

/// Where the edge is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    /// Local `cargo run` next to a local backend
    Development,
    /// Inside a container, backend reachable through the host gateway
    Container,
}

impl DeploymentMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Some(DeploymentMode::Development),
            "container" | "docker" | "production" | "prod" => Some(DeploymentMode::Container),
            _ => None,
        }
    }

    /// Development for debug builds, container otherwise
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            DeploymentMode::Development
        } else {
            DeploymentMode::Container
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Development => "development",
            DeploymentMode::Container => "container",
        }
    }

    pub fn default_backend_url(&self) -> &'static str {
        match self {
            DeploymentMode::Development => "http://localhost:7010",
            DeploymentMode::Container => "http://host.docker.internal:7010",
        }
    }

    pub fn default_frontend_url(&self) -> &'static str {
        match self {
            DeploymentMode::Development => "http://localhost:5173",
            DeploymentMode::Container => "http://localhost:5010",
        }
    }
}

/// Resolves backend and frontend base URLs
///
/// Resolution happens once at startup, so every call of a relay invocation
/// (bootstrap, refresh, retry) targets the same host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolver {
    backend: Url,
    frontend: Url,
}

impl UrlResolver {
    /// Mode defaults, replaced by explicit overrides when given
    pub fn resolve(
        mode: DeploymentMode,
        backend_override: Option<&str>,
        frontend_override: Option<&str>,
    ) -> AppResult<Self> {
        let backend = parse_base_url(
            "BACKEND_URL",
            backend_override.unwrap_or(mode.default_backend_url()),
        )?;
        let frontend = parse_base_url(
            "FRONTEND_URL",
            frontend_override.unwrap_or(mode.default_frontend_url()),
        )?;

        Ok(Self { backend, frontend })
    }

    pub fn from_urls(backend: Url, frontend: Url) -> Self {
        Self { backend, frontend }
    }

    pub fn backend_base(&self) -> &Url {
        &self.backend
    }

    pub fn frontend_base(&self) -> &Url {
        &self.frontend
    }

    /// Backend URL for an absolute path
    ///
    /// Any path prefix on the base is kept (`http://h/backend` + `/api/user`).
    pub fn endpoint(&self, path: &str) -> AppResult<Url> {
        let base = self.backend.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// `Origin` header value for upstream calls
    pub fn frontend_origin(&self) -> String {
        self.frontend.origin().ascii_serialization()
    }

    /// `Referer` header value for upstream calls
    pub fn frontend_referer(&self) -> &str {
        self.frontend.as_str()
    }
}

fn parse_base_url(var: &str, value: &str) -> AppResult<Url> {
    let url = Url::parse(value.trim()).map_app_err(
        ErrorKind::InternalServerError,
        format!("{var} is not a valid URL"),
    )?;

    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(AppError::internal(format!(
            "{var} must be an http(s) URL with a host"
        )));
    }

    Ok(url)
}

/// Backend paths of the relay protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendPaths {
    pub csrf_cookie: String,
    pub login: String,
    pub register: String,
    pub logout: String,
    pub user: String,
    pub resend_verification: String,
    pub send_verification: String,
}

impl Default for BackendPaths {
    fn default() -> Self {
        Self {
            csrf_cookie: "/sanctum/csrf-cookie".to_string(),
            login: "/api/login".to_string(),
            register: "/api/register".to_string(),
            logout: "/api/logout".to_string(),
            user: "/api/user".to_string(),
            resend_verification: "/api/email/verify/resend".to_string(),
            send_verification: "/api/email/verification-notification".to_string(),
        }
    }
}

impl BackendPaths {
    pub fn path_for(&self, operation: Operation) -> &str {
        match operation {
            Operation::Login => &self.login,
            Operation::Register => &self.register,
            Operation::Logout => &self.logout,
            Operation::FetchUser => &self.user,
            Operation::ResendVerification => &self.resend_verification,
            Operation::SendVerification => &self.send_verification,
        }
    }
}

/// Relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub mode: DeploymentMode,
    pub urls: UrlResolver,
    pub paths: BackendPaths,
    /// Session cookie name (shared by backend and browser)
    pub session_cookie_name: String,
    /// Anti-forgery cookie name
    pub csrf_cookie_name: String,
    /// Header carrying the decoded anti-forgery token upstream
    pub csrf_header_name: HeaderName,
    /// Max-Age written on the session cookie
    pub session_max_age: Duration,
    /// Whether relayed cookies get `Secure`
    pub cookie_secure: bool,
    /// Upstream request timeout
    pub backend_timeout: Duration,
    /// Status the backend uses for a stale anti-forgery token
    pub token_mismatch_status: StatusCode,
    /// Where unauthenticated page requests are sent
    pub login_path: String,
}

impl RelayConfig {
    /// Defaults for the given mode and URLs
    pub fn new(mode: DeploymentMode, urls: UrlResolver) -> Self {
        Self {
            mode,
            urls,
            paths: BackendPaths::default(),
            session_cookie_name: "laravel_session".to_string(),
            csrf_cookie_name: "XSRF-TOKEN".to_string(),
            csrf_header_name: HeaderName::from_static("x-xsrf-token"),
            session_max_age: Duration::from_secs(2 * 3600),
            cookie_secure: mode == DeploymentMode::Container,
            backend_timeout: Duration::from_secs(5),
            // 419 "Page Expired" has no StatusCode constant
            token_mismatch_status: StatusCode::from_u16(419).unwrap_or(StatusCode::CONFLICT),
            login_path: "/login".to_string(),
        }
    }

    /// Load from process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset or blank keys take defaults
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = match get("APP_ENV") {
            Some(value) => DeploymentMode::parse(&value).ok_or_else(|| {
                AppError::internal(format!("APP_ENV has unknown value '{value}'"))
            })?,
            None => DeploymentMode::from_build(),
        };

        let urls = UrlResolver::resolve(
            mode,
            get("BACKEND_URL").as_deref(),
            get("FRONTEND_URL").as_deref(),
        )?;

        let mut config = Self::new(mode, urls);

        if let Some(name) = get("SESSION_COOKIE_NAME") {
            config.session_cookie_name = name.trim().to_string();
        }
        if let Some(name) = get("CSRF_COOKIE_NAME") {
            config.csrf_cookie_name = name.trim().to_string();
        }
        if let Some(name) = get("CSRF_HEADER_NAME") {
            config.csrf_header_name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_app_err(
                    ErrorKind::InternalServerError,
                    "CSRF_HEADER_NAME is not a valid header name",
                )?;
        }
        if let Some(secs) = get("SESSION_MAX_AGE_SECS") {
            config.session_max_age = Duration::from_secs(parse_number("SESSION_MAX_AGE_SECS", &secs)?);
        }
        if let Some(flag) = get("COOKIE_SECURE") {
            config.cookie_secure = parse_flag("COOKIE_SECURE", &flag)?;
        }
        if let Some(secs) = get("BACKEND_TIMEOUT_SECS") {
            let secs = parse_number("BACKEND_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(AppError::internal("BACKEND_TIMEOUT_SECS must be positive"));
            }
            config.backend_timeout = Duration::from_secs(secs);
        }
        if let Some(status) = get("TOKEN_MISMATCH_STATUS") {
            let code = parse_number("TOKEN_MISMATCH_STATUS", &status)?;
            config.token_mismatch_status = u16::try_from(code)
                .ok()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .filter(|status| !status.is_success())
                .ok_or_else(|| {
                    AppError::internal("TOKEN_MISMATCH_STATUS must be a non-success HTTP status")
                })?;
        }

        Ok(config)
    }

    pub fn with_paths(mut self, paths: BackendPaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::new(
            self.session_cookie_name.clone(),
            self.csrf_cookie_name.clone(),
            i64::try_from(self.session_max_age.as_secs()).unwrap_or(i64::MAX),
            self.cookie_secure,
        )
    }

    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: self.backend_timeout,
            connect_timeout: self.backend_timeout.min(Duration::from_secs(2)),
            ..HttpClientConfig::default()
        }
    }
}

fn parse_number(var: &str, value: &str) -> AppResult<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_app_err(ErrorKind::InternalServerError, format!("{var} must be a number"))
}

fn parse_flag(var: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::internal(format!("{var} must be true or false"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_mode_defaults() {
        let dev = UrlResolver::resolve(DeploymentMode::Development, None, None).unwrap();
        assert_eq!(dev.backend_base().as_str(), "http://localhost:7010/");
        assert_eq!(dev.frontend_base().as_str(), "http://localhost:5173/");

        let container = UrlResolver::resolve(DeploymentMode::Container, None, None).unwrap();
        assert_eq!(
            container.backend_base().as_str(),
            "http://host.docker.internal:7010/"
        );
        assert_eq!(container.frontend_origin(), "http://localhost:5010");
    }

    #[test]
    fn test_overrides_win() {
        let urls = UrlResolver::resolve(
            DeploymentMode::Container,
            Some("https://auth.example.com"),
            Some("https://app.example.com"),
        )
        .unwrap();
        assert_eq!(urls.backend_base().host_str(), Some("auth.example.com"));
        assert_eq!(urls.frontend_origin(), "https://app.example.com");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(UrlResolver::resolve(DeploymentMode::Development, Some("not a url"), None).is_err());
        assert!(
            UrlResolver::resolve(DeploymentMode::Development, Some("ftp://host"), None).is_err()
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let urls =
            UrlResolver::resolve(DeploymentMode::Development, Some("http://h:1/backend/"), None)
                .unwrap();
        assert_eq!(
            urls.endpoint("/api/login").unwrap().as_str(),
            "http://h:1/backend/api/login"
        );

        let urls = UrlResolver::resolve(DeploymentMode::Development, None, None).unwrap();
        assert_eq!(
            urls.endpoint("/sanctum/csrf-cookie").unwrap().as_str(),
            "http://localhost:7010/sanctum/csrf-cookie"
        );
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = RelayConfig::from_lookup(lookup(&[("APP_ENV", "development")])).unwrap();
        assert_eq!(config.mode, DeploymentMode::Development);
        assert_eq!(config.session_cookie_name, "laravel_session");
        assert_eq!(config.csrf_cookie_name, "XSRF-TOKEN");
        assert_eq!(config.csrf_header_name.as_str(), "x-xsrf-token");
        assert_eq!(config.session_max_age, Duration::from_secs(7200));
        assert_eq!(config.backend_timeout, Duration::from_secs(5));
        assert_eq!(config.token_mismatch_status.as_u16(), 419);
        assert!(!config.cookie_secure);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("APP_ENV", "container"),
            ("BACKEND_URL", "http://backend:8000"),
            ("SESSION_COOKIE_NAME", "app_session"),
            ("CSRF_HEADER_NAME", "X-CSRF-TOKEN"),
            ("SESSION_MAX_AGE_SECS", "60"),
            ("COOKIE_SECURE", "false"),
            ("BACKEND_TIMEOUT_SECS", "2"),
            ("TOKEN_MISMATCH_STATUS", "409"),
        ]))
        .unwrap();

        assert_eq!(config.urls.backend_base().as_str(), "http://backend:8000/");
        assert_eq!(config.session_cookie_name, "app_session");
        assert_eq!(config.csrf_header_name.as_str(), "x-csrf-token");
        assert_eq!(config.session_max_age, Duration::from_secs(60));
        assert!(!config.cookie_secure);
        assert_eq!(config.backend_timeout, Duration::from_secs(2));
        assert_eq!(config.token_mismatch_status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(RelayConfig::from_lookup(lookup(&[("APP_ENV", "staging")])).is_err());
        assert!(RelayConfig::from_lookup(lookup(&[("BACKEND_TIMEOUT_SECS", "0")])).is_err());
        assert!(RelayConfig::from_lookup(lookup(&[("SESSION_MAX_AGE_SECS", "-1")])).is_err());
        assert!(RelayConfig::from_lookup(lookup(&[("TOKEN_MISMATCH_STATUS", "200")])).is_err());
        assert!(RelayConfig::from_lookup(lookup(&[("COOKIE_SECURE", "maybe")])).is_err());
    }

    #[test]
    fn test_path_for_operation() {
        let paths = BackendPaths::default();
        assert_eq!(paths.path_for(Operation::FetchUser), "/api/user");
        assert_eq!(
            paths.path_for(Operation::SendVerification),
            "/api/email/verification-notification"
        );
    }

    #[test]
    fn test_cookie_policy_uses_configured_names() {
        let config = RelayConfig::from_lookup(lookup(&[("APP_ENV", "container")])).unwrap();
        let policy = config.cookie_policy();
        assert_eq!(policy.session_cookie_name(), "laravel_session");
        assert_eq!(policy.csrf_cookie_name(), "XSRF-TOKEN");
        assert!(config.cookie_secure);
    }
}

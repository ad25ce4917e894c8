//! Relay Context Entity
//!
//! Credential set for one relay invocation. Seeded from the browser's cookies,
//! updated from every backend `Set-Cookie`, and collecting the cookie writes
//! destined for the browser.

use axum::http::HeaderMap;
use platform::cookie::{build_cookie_header, extract_cookie, parse_set_cookie};

use crate::domain::value_object::{
    AntiForgeryToken, CookiePolicy, CookieRole, CookieWrite, SessionCredential,
};

#[derive(Debug, Clone, Default)]
pub struct RelayContext {
    pub session: Option<SessionCredential>,
    pub csrf: Option<AntiForgeryToken>,
    /// `X-Forwarded-For` value to send upstream
    pub forwarded_for: Option<String>,
    writes: Vec<CookieWrite>,
}

impl RelayContext {
    pub fn new(session: Option<SessionCredential>, csrf: Option<AntiForgeryToken>) -> Self {
        Self {
            session,
            csrf,
            forwarded_for: None,
            writes: Vec::new(),
        }
    }

    /// Seed from the browser's `Cookie` headers; other cookies are ignored
    pub fn from_headers(policy: &CookiePolicy, headers: &HeaderMap) -> Self {
        let session =
            extract_cookie(headers, policy.session_cookie_name()).and_then(SessionCredential::new);
        let csrf = extract_cookie(headers, policy.csrf_cookie_name()).and_then(AntiForgeryToken::new);
        Self::new(session, csrf)
    }

    pub fn with_forwarded_for(mut self, forwarded_for: Option<String>) -> Self {
        self.forwarded_for = forwarded_for;
        self
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Absorb one raw upstream `Set-Cookie` header
    ///
    /// Returns the role of the absorbed cookie, or `None` when it was
    /// malformed or not relayable.
    pub fn absorb(&mut self, policy: &CookiePolicy, raw: &str) -> Option<CookieRole> {
        let Some(cookie) = parse_set_cookie(raw) else {
            tracing::warn!("Dropping malformed Set-Cookie from backend");
            return None;
        };

        let Some(write) = policy.project_set_cookie(&cookie) else {
            tracing::debug!(cookie = %cookie.name, "Not relaying backend cookie");
            return None;
        };

        let role = write.role;
        match role {
            CookieRole::Session => {
                self.session = write.value.clone().and_then(SessionCredential::new);
            }
            CookieRole::Csrf => {
                self.csrf = write.value.clone().and_then(AntiForgeryToken::new);
            }
            CookieRole::Other => return None,
        }

        // Latest value per role wins
        self.writes.retain(|existing| existing.role != role);
        self.writes.push(write);
        Some(role)
    }

    pub fn absorb_all<'a, I>(&mut self, policy: &CookiePolicy, raw: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for header in raw {
            self.absorb(policy, header);
        }
    }

    /// `Cookie` header for the backend; only the two relayed cookies are sent
    pub fn cookie_header(&self, policy: &CookiePolicy) -> Option<String> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(session) = &self.session {
            pairs.push((policy.session_cookie_name(), session.as_str()));
        }
        if let Some(csrf) = &self.csrf {
            pairs.push((policy.csrf_cookie_name(), csrf.cookie_value()));
        }

        if pairs.is_empty() {
            None
        } else {
            Some(build_cookie_header(pairs))
        }
    }

    pub fn writes(&self) -> &[CookieWrite] {
        &self.writes
    }

    pub fn take_writes(&mut self) -> Vec<CookieWrite> {
        std::mem::take(&mut self.writes)
    }

    /// Forget pending writes; credentials stay as last seen
    pub fn discard_writes(&mut self) {
        self.writes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    fn policy() -> CookiePolicy {
        CookiePolicy::new("laravel_session", "XSRF-TOKEN", 7200, false)
    }

    #[test]
    fn test_from_headers_ignores_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; laravel_session=s1; XSRF-TOKEN=t1"),
        );

        let ctx = RelayContext::from_headers(&policy(), &headers);
        assert_eq!(ctx.session.as_ref().map(|s| s.as_str()), Some("s1"));
        assert_eq!(ctx.csrf.as_ref().map(|t| t.cookie_value()), Some("t1"));
        assert_eq!(
            ctx.cookie_header(&policy()).as_deref(),
            Some("laravel_session=s1; XSRF-TOKEN=t1")
        );
    }

    #[test]
    fn test_empty_context_sends_no_cookie_header() {
        assert!(RelayContext::default().cookie_header(&policy()).is_none());
    }

    #[test]
    fn test_absorb_updates_credentials_latest_wins() {
        let policy = policy();
        let mut ctx = RelayContext::default();

        assert_eq!(
            ctx.absorb(&policy, "XSRF-TOKEN=first; Path=/"),
            Some(CookieRole::Csrf)
        );
        ctx.absorb(&policy, "XSRF-TOKEN=second; Path=/");
        ctx.absorb(&policy, "laravel_session=s9; HttpOnly");

        assert_eq!(ctx.csrf.as_ref().map(|t| t.cookie_value()), Some("second"));
        assert_eq!(ctx.writes().len(), 2);
        assert!(
            ctx.writes()
                .iter()
                .any(|w| w.value.as_deref() == Some("second"))
        );
    }

    #[test]
    fn test_absorb_drops_malformed_and_foreign() {
        let policy = policy();
        let mut ctx = RelayContext::default();

        assert_eq!(ctx.absorb(&policy, "garbage"), None);
        assert_eq!(ctx.absorb(&policy, "remember_web=x; HttpOnly"), None);
        assert!(ctx.writes().is_empty());
    }

    #[test]
    fn test_absorb_removal_clears_credential() {
        let policy = policy();
        let mut ctx = RelayContext::new(SessionCredential::new("s1"), None);

        ctx.absorb(&policy, "laravel_session=deleted; Max-Age=0");
        assert!(!ctx.has_session());
        assert!(ctx.writes()[0].is_deletion());
    }

    #[test]
    fn test_take_and_discard_writes() {
        let policy = policy();
        let mut ctx = RelayContext::default();
        ctx.absorb(&policy, "XSRF-TOKEN=t; Path=/");

        ctx.discard_writes();
        assert!(ctx.take_writes().is_empty());
        // Credential survives the discard
        assert!(ctx.csrf.is_some());
    }
}

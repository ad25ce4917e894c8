//! Cookie Management Infrastructure
//!
//! Parsing of upstream `Set-Cookie` headers, serialization of the cookies the
//! edge writes itself, and lookup of incoming browser cookies.

use axum::http::{HeaderMap, HeaderValue, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }

    /// Case-insensitive parse of a `SameSite=` attribute value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }
}

/// Outgoing cookie configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// Build Set-Cookie header for deletion (expired)
    ///
    /// Path must match the one the cookie was written with or the browser
    /// keeps the original.
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.name);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));
        cookie.push_str("; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT");

        cookie
    }
}

/// Attributes carried by an upstream `Set-Cookie` header
///
/// Only the attributes the edge cares about are kept; everything else is
/// ignored during parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieAttributes {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<SameSite>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub max_age_secs: Option<i64>,
    pub expires: Option<String>,
}

/// A parsed `Set-Cookie` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub attributes: CookieAttributes,
}

impl SetCookie {
    /// `Max-Age=0` (or negative) means the upstream is deleting the cookie
    pub fn is_removal(&self) -> bool {
        matches!(self.attributes.max_age_secs, Some(age) if age <= 0)
    }
}

/// Parse a raw `Set-Cookie` header value
///
/// The first `name=value` segment is the cookie identity, the remaining
/// `;`-separated segments are attributes. Unknown or malformed attributes are
/// skipped. Returns `None` when the identity segment itself is unusable.
pub fn parse_set_cookie(raw: &str) -> Option<SetCookie> {
    let mut segments = raw.split(';');

    let (name, value) = segments.next()?.trim().split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut attributes = CookieAttributes::default();

    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (key, val) = match segment.split_once('=') {
            Some((key, val)) => (key.trim(), Some(val.trim())),
            None => (segment, None),
        };

        match (key.to_ascii_lowercase().as_str(), val) {
            ("httponly", _) => attributes.http_only = true,
            ("secure", _) => attributes.secure = true,
            ("samesite", Some(v)) => attributes.same_site = SameSite::parse(v),
            ("path", Some(v)) if !v.is_empty() => attributes.path = Some(v.to_string()),
            ("domain", Some(v)) if !v.is_empty() => attributes.domain = Some(v.to_string()),
            ("max-age", Some(v)) => attributes.max_age_secs = v.parse().ok(),
            ("expires", Some(v)) => attributes.expires = Some(v.to_string()),
            _ => {}
        }
    }

    Some(SetCookie {
        name: name.to_string(),
        value: value.trim().to_string(),
        attributes,
    })
}

/// Extract a cookie value from request headers
///
/// HTTP/2 clients may split cookies across several `Cookie` headers, so all
/// of them are searched.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
}

/// Build a `Cookie` request header from name/value pairs
pub fn build_cookie_header<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Create a Set-Cookie header value
///
/// Returns `None` when the serialized cookie is not a valid header value.
pub fn set_cookie_header(config: &CookieConfig, value: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&config.build_set_cookie(value)).ok()
}

/// Create a Set-Cookie header value that deletes the cookie
pub fn delete_cookie_header(config: &CookieConfig) -> Option<HeaderValue> {
    HeaderValue::from_str(&config.build_delete_cookie()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_config_build() {
        let config = CookieConfig {
            name: "test".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/api".to_string(),
            max_age_secs: Some(3600),
        };

        let cookie = config.build_set_cookie("value123");
        assert!(cookie.starts_with("test=value123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/api"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_cookie_config_build_script_readable() {
        let config = CookieConfig {
            name: "XSRF-TOKEN".to_string(),
            secure: false,
            http_only: false,
            ..Default::default()
        };

        let cookie = config.build_set_cookie("abc");
        assert!(!cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));
        assert!(!cookie.contains("Max-Age"));
    }

    #[test]
    fn test_cookie_config_delete() {
        let config = CookieConfig {
            name: "laravel_session".to_string(),
            ..Default::default()
        };

        let cookie = config.build_delete_cookie();
        assert!(cookie.starts_with("laravel_session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_parse_set_cookie_laravel_session() {
        let parsed = parse_set_cookie(
            "laravel_session=eyJpdiI6Ik=; expires=Tue, 20 Oct 2026 10:00:00 GMT; Max-Age=7200; path=/; httponly; samesite=lax",
        )
        .unwrap();

        assert_eq!(parsed.name, "laravel_session");
        assert_eq!(parsed.value, "eyJpdiI6Ik=");
        assert!(parsed.attributes.http_only);
        assert!(!parsed.attributes.secure);
        assert_eq!(parsed.attributes.same_site, Some(SameSite::Lax));
        assert_eq!(parsed.attributes.path.as_deref(), Some("/"));
        assert_eq!(parsed.attributes.max_age_secs, Some(7200));
        assert!(parsed.attributes.expires.is_some());
        assert!(!parsed.is_removal());
    }

    #[test]
    fn test_parse_set_cookie_ignores_unknown_attributes() {
        let parsed = parse_set_cookie("XSRF-TOKEN=abc%3D; Partitioned; Priority=High; Secure").unwrap();
        assert_eq!(parsed.value, "abc%3D");
        assert!(parsed.attributes.secure);
        assert!(!parsed.attributes.http_only);
    }

    #[test]
    fn test_parse_set_cookie_malformed() {
        assert!(parse_set_cookie("").is_none());
        assert!(parse_set_cookie("no-equals-sign; Path=/").is_none());
        assert!(parse_set_cookie("=value; Path=/").is_none());
    }

    #[test]
    fn test_parse_set_cookie_removal() {
        let parsed = parse_set_cookie("laravel_session=deleted; Max-Age=0; Path=/").unwrap();
        assert!(parsed.is_removal());
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; session=abc123; other=xyz"),
        );

        assert_eq!(
            extract_cookie(&headers, "session"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("XSRF-TOKEN=t%3D"));

        assert_eq!(
            extract_cookie(&headers, "XSRF-TOKEN"),
            Some("t%3D".to_string())
        );
    }

    #[test]
    fn test_build_cookie_header() {
        let header = build_cookie_header([("laravel_session", "s1"), ("XSRF-TOKEN", "t1")]);
        assert_eq!(header, "laravel_session=s1; XSRF-TOKEN=t1");
        assert_eq!(build_cookie_header(std::iter::empty()), "");
    }
}

//! Client-held sessions carried in the signed `name` cookie.
//!
//! Nothing is stored server side: every request re-verifies the cookie and
//! either recovers the username or falls back to anonymous.

pub mod credential;
pub mod secure_value;

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use secrecy::SecretString;

pub use self::secure_value::SecureValue;

pub const SESSION_COOKIE_NAME: &str = "name";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated { username: String },
}

impl Session {
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { username } => Some(username),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    codec: SecureValue,
    cookie_secure: bool,
}

impl SessionConfig {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self {
            codec: SecureValue::new(secret),
            cookie_secure: false,
        }
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn codec(&self) -> &SecureValue {
        &self.codec
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// Resolve the request's session. Missing or tampered cookies are anonymous.
    #[must_use]
    pub fn session(&self, headers: &HeaderMap) -> Session {
        extract_cookie(headers, SESSION_COOKIE_NAME)
            .and_then(|token| self.codec.verify(&token))
            .map_or(Session::Anonymous, |username| Session::Authenticated {
                username,
            })
    }

    /// `Set-Cookie` value for a freshly authenticated user. No expiry: it
    /// lives as long as the browser session.
    ///
    /// # Errors
    /// Returns an error if the signed value is not a valid header value.
    pub fn session_cookie(&self, username: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        let token = self.codec.sign(username);
        HeaderValue::from_str(&self.cookie_string(&token))
    }

    /// `Set-Cookie` value that blanks the session cookie.
    ///
    /// # Errors
    /// Returns an error if the cookie is not a valid header value.
    pub fn clear_session_cookie(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.cookie_string(""))
    }

    fn cookie_string(&self, value: &str) -> String {
        let mut cookie = format!("{SESSION_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax");
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// First non-empty value of cookie `name` across all `Cookie` headers.
pub(crate) fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| val.trim().to_string())
        })
        .find(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig::new(SecretString::from("test-secret".to_string()))
    }

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(cookie) {
            headers.insert(COOKIE, value);
        }
        headers
    }

    #[test]
    fn missing_cookie_is_anonymous() {
        assert_eq!(config().session(&HeaderMap::new()), Session::Anonymous);
    }

    #[test]
    fn signed_cookie_is_authenticated() {
        let config = config();
        let token = config.codec().sign("alice");
        let headers = headers_with_cookie(&format!("theme=dark; name={token}"));
        let session = config.session(&headers);
        assert!(session.is_authenticated());
        assert_eq!(session.username(), Some("alice"));
    }

    #[test]
    fn tampered_cookie_is_anonymous() {
        let config = config();
        let token = config.codec().sign("alice").replacen("alice", "admin", 1);
        let headers = headers_with_cookie(&format!("name={token}"));
        assert_eq!(config.session(&headers), Session::Anonymous);
    }

    #[test]
    fn cleared_cookie_is_anonymous() {
        let headers = headers_with_cookie("name=");
        assert_eq!(config().session(&headers), Session::Anonymous);
    }

    #[test]
    fn session_cookie_has_path_and_no_expiry() {
        let config = config();
        let cookie = config.session_cookie("alice").map(|v| v.to_str().map(str::to_string));
        let Ok(Ok(cookie)) = cookie else {
            panic!("cookie should be a valid header");
        };
        assert!(cookie.starts_with(&format!("name={}", config.codec().sign("alice"))));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Max-Age"));
        assert!(!cookie.contains("Expires"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn secure_flag_is_opt_in() {
        let config = config().with_cookie_secure(true);
        let cookie = config.session_cookie("alice");
        assert!(cookie
            .ok()
            .and_then(|v| v.to_str().ok().map(|s| s.ends_with("; Secure")))
            .unwrap_or(false));
    }

    #[test]
    fn clear_session_cookie_sets_empty_value() {
        let cookie = config().clear_session_cookie();
        assert_eq!(
            cookie.ok().and_then(|v| v.to_str().ok().map(str::to_string)),
            Some("name=; Path=/; HttpOnly; SameSite=Lax".to_string())
        );
    }

    #[test]
    fn extract_cookie_skips_other_names() {
        let headers = headers_with_cookie("username=bob; name=tok; other=x");
        assert_eq!(extract_cookie(&headers, "name").as_deref(), Some("tok"));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }
}

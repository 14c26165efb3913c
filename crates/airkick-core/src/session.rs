// ============================================
// File: crates/airkick-core/src/session.rs
// ============================================
//! # Auth Session Artifacts
//!
//! ## Creation Reason
//! A successful login yields two artifacts the kick command must present:
//! the anti-forgery token from the `x-csrf-id` response header and the
//! session cookies. The device hands cookies back as full `Set-Cookie`
//! headers; only the leading `name=value` pair of each is replayed.
//!
//! ## Lifetime
//! An `AuthSession` lives for exactly one pipeline invocation. It is never
//! persisted; the device expires its side independently.
//!
//! ## Last Modified
//! v0.2.0 - Initial implementation

use std::fmt;

// ============================================
// AuthSession
// ============================================

/// Artifacts of a successful device login.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    csrf_token: String,
    cookies: String,
}

impl AuthSession {
    /// Creates a session from the extracted auth artifacts.
    pub fn new(csrf_token: impl Into<String>, cookies: impl Into<String>) -> Self {
        Self {
            csrf_token: csrf_token.into(),
            cookies: cookies.into(),
        }
    }

    /// The anti-forgery token to replay in the `x-csrf-id` request header.
    #[must_use]
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// The collapsed cookie string to replay in the `Cookie` request header.
    #[must_use]
    pub fn cookies(&self) -> &str {
        &self.cookies
    }

    /// Returns `true` when both artifacts are present.
    ///
    /// An incomplete session must never reach the kick submitter.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.csrf_token.is_empty() && !self.cookies.is_empty()
    }
}

// Session artifacts are bearer secrets; keep them out of debug logs.
impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("csrf_token", &"<redacted>")
            .field("cookies", &"<redacted>")
            .field("complete", &self.is_complete())
            .finish()
    }
}

// ============================================
// Cookie collapsing
// ============================================

/// Collapses raw `Set-Cookie` header values into a single `Cookie` string.
///
/// Only the leading `name=value` pair of each header is kept; attributes
/// such as `Path` or `HttpOnly` are dropped. Order is preserved.
///
/// # Example
/// ```
/// use airkick_core::collapse_cookies;
///
/// let cookie = collapse_cookies(["a=1; Path=/", "b=2; HttpOnly"]);
/// assert_eq!(cookie, "a=1; b=2");
/// ```
pub fn collapse_cookies<'a, I>(set_cookie_values: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut collapsed = String::new();
    for value in set_cookie_values {
        let pair = match value.split(';').next() {
            Some(pair) => pair.trim(),
            None => continue,
        };
        if pair.is_empty() {
            continue;
        }
        if !collapsed.is_empty() {
            collapsed.push_str("; ");
        }
        collapsed.push_str(pair);
    }
    collapsed
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_strips_attributes() {
        let cookie = collapse_cookies(["a=1; Path=/", "b=2; HttpOnly"]);
        assert_eq!(cookie, "a=1; b=2");
    }

    #[test]
    fn test_collapse_preserves_order() {
        let cookie = collapse_cookies([
            "AIROS_SESSIONID=deadbeef; Path=/; HttpOnly",
            "last_ip=10.0.0.2; Expires=Wed, 01 Jan 2031 00:00:00 GMT",
        ]);
        assert_eq!(cookie, "AIROS_SESSIONID=deadbeef; last_ip=10.0.0.2");
    }

    #[test]
    fn test_collapse_single_cookie() {
        assert_eq!(collapse_cookies(["SESSION=xyz; Path=/"]), "SESSION=xyz");
    }

    #[test]
    fn test_collapse_empty_input() {
        let none: [&str; 0] = [];
        assert_eq!(collapse_cookies(none), "");
        assert_eq!(collapse_cookies(["", "  ; Path=/"]), "");
    }

    #[test]
    fn test_session_completeness() {
        assert!(AuthSession::new("tok", "a=1").is_complete());
        assert!(!AuthSession::new("", "a=1").is_complete());
        assert!(!AuthSession::new("tok", "").is_complete());
    }

    #[test]
    fn test_debug_redacts_artifacts() {
        let session = AuthSession::new("secret-token", "SESSION=secret");
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("redacted"));
    }
}

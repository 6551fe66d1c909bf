//! Bearer credential type.
//!
//! The login endpoint hands back an opaque token string. Buggy callers have
//! historically persisted the literal strings `"undefined"` and `"null"`, so
//! those (and the empty string) are sentinels meaning *no credential* and can
//! never construct a valid token.

use serde::Serialize;

/// Raw values that mean "no credential is present".
const SENTINELS: &[&str] = &["", "undefined", "null"];

/// An opaque bearer credential.
///
/// Construction goes through [`BearerToken::from_raw`], which rejects the
/// sentinel values, so holding a `BearerToken` guarantees there is something
/// worth sending in an `Authorization` header. The token is never inspected
/// for validity; the issuing server is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Create a token from a raw string, treating sentinel values as absent.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if SENTINELS.contains(&raw.as_str()) {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// The token text, as it goes on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_absent() {
        for raw in ["", "undefined", "null"] {
            assert!(BearerToken::from_raw(raw).is_none(), "{raw:?} accepted");
        }
    }

    #[test]
    fn test_ordinary_token_accepted() {
        let token = BearerToken::from_raw("abc.def.ghi").expect("valid token");
        assert_eq!(token.as_str(), "abc.def.ghi");
    }

    #[test]
    fn test_sentinel_lookalikes_accepted() {
        // Only the exact sentinel strings are rejected.
        assert!(BearerToken::from_raw("null ").is_some());
        assert!(BearerToken::from_raw("NULL").is_some());
    }
}

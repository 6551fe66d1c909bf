//! Unverified decoding of credential claims.
//!
//! The credential is a three-segment token whose middle segment is
//! base64-encoded JSON. Nothing here verifies a signature; whatever comes
//! out is a UI hint and must never gate anything the server does not
//! independently enforce. Decoding therefore cannot fail loudly either -
//! every malformed input collapses into [`ClaimsOutcome::Undecodable`].

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde::Deserialize;

use mercado_core::{AdvisoryRole, BearerToken};

/// Claims found in a credential's payload segment. All fields are optional;
/// backends have shipped tokens with various subsets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Role claim, advisory only.
    #[serde(default)]
    pub role: Option<String>,
    /// Subject (user) identifier.
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiry as a unix timestamp. Informational; the server decides.
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Result of attempting to decode a credential's claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimsOutcome {
    /// The payload segment parsed as JSON claims.
    Decoded(TokenClaims),
    /// The token has no readable payload segment. Not an error: opaque
    /// tokens are perfectly valid credentials.
    Undecodable,
}

impl ClaimsOutcome {
    /// The advisory role carried by the claims, if any.
    #[must_use]
    pub fn role(&self) -> Option<AdvisoryRole> {
        match self {
            Self::Decoded(claims) => claims
                .role
                .as_deref()
                .filter(|role| !role.is_empty())
                .map(AdvisoryRole::new),
            Self::Undecodable => None,
        }
    }
}

/// Decode the middle segment of a credential.
///
/// Tolerates both URL-safe and standard base64, padded or not, since issuing
/// servers have not been consistent.
#[must_use]
pub fn decode_claims(token: &BearerToken) -> ClaimsOutcome {
    let Some(payload) = token.as_str().split('.').nth(1) else {
        return ClaimsOutcome::Undecodable;
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD.decode(payload))
        .or_else(|_| STANDARD_NO_PAD.decode(payload));

    let Ok(bytes) = bytes else {
        return ClaimsOutcome::Undecodable;
    };

    match serde_json::from_slice::<TokenClaims>(&bytes) {
        Ok(claims) => ClaimsOutcome::Decoded(claims),
        Err(_) => ClaimsOutcome::Undecodable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a token whose payload segment encodes the given JSON.
    fn token_with_payload(payload: &serde_json::Value) -> BearerToken {
        let encoded = URL_SAFE_NO_PAD.encode(payload.to_string());
        BearerToken::from_raw(format!("header.{encoded}.signature")).expect("token")
    }

    #[test]
    fn test_decodes_role_claim() {
        let token = token_with_payload(&serde_json::json!({"role": "user", "sub": "u1"}));
        let outcome = decode_claims(&token);
        assert_eq!(outcome.role(), Some(AdvisoryRole::new("user")));
    }

    #[test]
    fn test_missing_role_yields_none() {
        let token = token_with_payload(&serde_json::json!({"sub": "u1"}));
        assert_eq!(decode_claims(&token).role(), None);
    }

    #[test]
    fn test_opaque_token_is_undecodable() {
        let token = BearerToken::from_raw("not-a-jwt").expect("token");
        assert_eq!(decode_claims(&token), ClaimsOutcome::Undecodable);
    }

    #[test]
    fn test_garbage_payload_is_undecodable() {
        let token = BearerToken::from_raw("a.!!!not-base64!!!.c").expect("token");
        assert_eq!(decode_claims(&token), ClaimsOutcome::Undecodable);
    }

    #[test]
    fn test_non_json_payload_is_undecodable() {
        let encoded = URL_SAFE_NO_PAD.encode("plain text");
        let token = BearerToken::from_raw(format!("a.{encoded}.c")).expect("token");
        assert_eq!(decode_claims(&token), ClaimsOutcome::Undecodable);
    }

    #[test]
    fn test_standard_base64_accepted() {
        let payload = serde_json::json!({"role": "admin"}).to_string();
        let encoded = STANDARD.encode(payload);
        let token = BearerToken::from_raw(format!("a.{encoded}.c")).expect("token");
        assert_eq!(
            decode_claims(&token).role(),
            Some(AdvisoryRole::new("admin"))
        );
    }
}

//! Failure classification for completed-but-unsuccessful responses.

use reqwest::StatusCode;
use serde::Deserialize;

/// What the request path should do with a failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// 401/403 on a protected path: the stored credential is no longer
    /// accepted. Clear the session and route to login.
    InvalidateSession,
    /// Everything else is the caller's problem; hand it back unchanged.
    Propagate,
}

/// Classify a failed response by status and the original request's
/// public-path classification.
pub(crate) fn classify(status: StatusCode, public: bool) -> Disposition {
    let auth_failure =
        status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN;
    if auth_failure && !public {
        Disposition::InvalidateSession
    } else {
        Disposition::Propagate
    }
}

/// Error body shape used by the backend. Older deployments spell the field
/// in Portuguese, newer ones in English.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "mensagem")]
    message: Option<String>,
}

/// Extract a human-readable message from an error response body.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
        && let Some(message) = parsed.message
        && !message.is_empty()
    {
        return message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_on_protected_path_invalidates() {
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, false),
            Disposition::InvalidateSession
        );
        assert_eq!(
            classify(StatusCode::FORBIDDEN, false),
            Disposition::InvalidateSession
        );
    }

    #[test]
    fn test_auth_failure_on_public_path_propagates() {
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, true),
            Disposition::Propagate
        );
        assert_eq!(
            classify(StatusCode::FORBIDDEN, true),
            Disposition::Propagate
        );
    }

    #[test]
    fn test_other_statuses_propagate() {
        assert_eq!(
            classify(StatusCode::INTERNAL_SERVER_ERROR, false),
            Disposition::Propagate
        );
        assert_eq!(classify(StatusCode::NOT_FOUND, false), Disposition::Propagate);
        assert_eq!(classify(StatusCode::BAD_REQUEST, true), Disposition::Propagate);
    }

    #[test]
    fn test_error_message_prefers_body_field() {
        let message = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"mensagem": "Preencha o email"}"#,
        );
        assert_eq!(message, "Preencha o email");

        let message = error_message(StatusCode::BAD_REQUEST, r#"{"message": "fill it in"}"#);
        assert_eq!(message, "fill it in");
    }

    #[test]
    fn test_error_message_falls_back_to_body_then_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream exploded"),
            "upstream exploded"
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
    }
}

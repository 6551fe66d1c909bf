//! Client error taxonomy.
//!
//! Every failure is terminal for the attempt that produced it; there are no
//! automatic retries anywhere in this layer. The variants draw the three
//! lines that matter to callers: the server never answered, the session was
//! rejected (and has already been cleared), or the application said no.

use thiserror::Error;

use crate::redirect::Redirect;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors produced by the request path.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response reached the client at all. Fatal for the current
    /// navigation; the attached redirect points at the error surface.
    #[error("server unreachable: {message}")]
    Unreachable {
        /// Transport-level description.
        message: String,
        /// Where the host should send the user.
        redirect: Redirect,
    },

    /// The server rejected the credential (401/403) on a protected path.
    /// The session has already been cleared; the attached redirect points at
    /// the login surface with a return path.
    #[error("session rejected: {message}")]
    SessionExpired {
        /// Server-supplied reason, when one was present.
        message: String,
        /// Where the host should send the user.
        redirect: Redirect,
    },

    /// Any other non-success response, including 401/403 on public paths
    /// (e.g. bad login credentials). Propagated verbatim to the caller.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A login response did not include a usable credential.
    #[error("login response did not include a usable credential")]
    MissingCredential,
}

impl ClientError {
    /// The navigation this failure asks the host to perform, if any.
    #[must_use]
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            Self::Unreachable { redirect, .. } | Self::SessionExpired { redirect, .. } => {
                Some(redirect)
            }
            Self::Api { .. } | Self::Decode(_) | Self::MissingCredential => None,
        }
    }

    /// HTTP status of an application error, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

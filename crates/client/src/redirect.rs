//! Navigation targets produced by the session layer.
//!
//! The client never navigates anything itself; when a failure or a flow step
//! requires the application to move somewhere (back to login, to the error
//! page), it hands the host a typed [`Redirect`] and the host performs it.

/// Path of the login surface.
const LOGIN_PATH: &str = "/login";

/// Path of the generic error surface.
const ERROR_PATH: &str = "/error";

/// Path of the home surface.
const HOME_PATH: &str = "/";

/// A navigation the host application should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Send the user to the login page.
    Login {
        /// Human-readable reason, shown above the form.
        message: String,
        /// Path to return to after a successful login.
        return_to: Option<String>,
    },
    /// Send the user to the error page.
    Error {
        /// Human-readable description of what went wrong.
        message: String,
    },
    /// Send the user home (e.g. when a view is restricted by role).
    Home {
        /// Human-readable reason.
        message: String,
    },
}

impl Redirect {
    /// Login redirect with an optional return path.
    #[must_use]
    pub fn login(message: impl Into<String>, return_to: Option<String>) -> Self {
        Self::Login {
            message: message.into(),
            return_to,
        }
    }

    /// Error-page redirect.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Home redirect.
    #[must_use]
    pub fn home(message: impl Into<String>) -> Self {
        Self::Home {
            message: message.into(),
        }
    }

    /// The message carried by this redirect.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Login { message, .. } | Self::Error { message } | Self::Home { message } => {
                message
            }
        }
    }

    /// Render the redirect as a location string with encoded query parameters.
    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Self::Login { message, return_to } => {
                let mut location =
                    format!("{LOGIN_PATH}?message={}", urlencoding::encode(message));
                if let Some(return_to) = return_to {
                    location.push_str("&redirect=");
                    location.push_str(&urlencoding::encode(return_to));
                }
                location
            }
            Self::Error { message } => {
                format!("{ERROR_PATH}?message={}", urlencoding::encode(message))
            }
            Self::Home { message } => {
                format!("{HOME_PATH}?message={}", urlencoding::encode(message))
            }
        }
    }
}

impl std::fmt::Display for Redirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.location())
    }
}

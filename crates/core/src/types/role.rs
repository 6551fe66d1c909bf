//! Advisory role hint for the current user.

use serde::{Deserialize, Serialize};

/// Role string used by administrator accounts.
const ADMIN_ROLE: &str = "admin";

/// A role hint for UI decisions only.
///
/// The value comes either from a login response body or from locally decoding
/// an unverified token claim, so it must never gate anything the server does
/// not independently enforce. It exists so views can decide what to render,
/// not who may do what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdvisoryRole(String);

impl AdvisoryRole {
    /// Wrap a role string.
    #[must_use]
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// The raw role string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this hint names the administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0 == ADMIN_ROLE
    }
}

impl std::fmt::Display for AdvisoryRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AdvisoryRole {
    fn from(role: &str) -> Self {
        Self::new(role)
    }
}

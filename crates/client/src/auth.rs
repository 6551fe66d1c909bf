//! Login, registration, logout, and view gates.
//!
//! Role handling follows one rule: a role the server states in the login
//! response body wins; otherwise the client peeks at the credential's
//! unverified claims. Either way the result is an [`AdvisoryRole`] - a
//! rendering hint, not an authorization decision.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use mercado_core::{AdvisoryRole, BearerToken};

use crate::api::{ApiClient, RequestOptions};
use crate::error::{ClientError, Result};
use crate::redirect::Redirect;
use crate::session::{Session, decode_claims};

/// Login endpoint path.
const LOGIN_PATH: &str = "/login";

/// Destination after an admin login with no explicit return path.
const ADMIN_HOME: &str = "/adm";

/// Destination after an ordinary login with no explicit return path.
const HOME: &str = "/";

/// Message carried to the login page after logout.
const LOGOUT_MESSAGE: &str = "Log in to continue.";

/// Message carried to the login page when a signed-out user hits a gated view.
const SIGN_IN_MESSAGE: &str = "Log in to access this page.";

/// Message carried home when a non-admin hits an admin view.
const ADMIN_ONLY_MESSAGE: &str = "This area is restricted to administrators.";

/// Credentials for the login form.
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    #[serde(rename = "senha")]
    password: &'a str,
}

/// Login response body. `role` is optional; most deployments only embed it
/// in the token.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    role: Option<String>,
}

/// Fields for creating an account. Serializes to the backend's field names.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "idade")]
    pub age: u32,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// The result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The established session.
    pub session: Session,
    /// Where the application should navigate next: the caller's `redirect`
    /// parameter if one was carried, else the admin panel for admins, else
    /// home.
    pub destination: String,
}

/// Authentication flows.
#[derive(Clone)]
pub struct AuthApi {
    api: ApiClient,
}

impl AuthApi {
    /// Create an auth handle over the shared client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Log in and establish the session.
    ///
    /// `redirect` is the return path the login page was opened with, if any.
    ///
    /// # Errors
    ///
    /// Bad credentials surface as an ordinary [`ClientError::Api`] (the
    /// login path is public, so the guard never redirects on them). A
    /// response without a usable token is [`ClientError::MissingCredential`].
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        redirect: Option<&str>,
    ) -> Result<LoginOutcome> {
        let response: LoginResponse = self
            .api
            .post_json(
                LOGIN_PATH,
                &LoginRequest { email, password },
                &RequestOptions::default(),
            )
            .await?;

        let token = BearerToken::from_raw(response.token).ok_or(ClientError::MissingCredential)?;

        // Server-stated role wins; the decoded claim is the fallback hint.
        let role = response
            .role
            .filter(|role| !role.is_empty())
            .map(AdvisoryRole::new)
            .or_else(|| decode_claims(&token).role());

        debug!(role = role.as_ref().map(AdvisoryRole::as_str), "login accepted");
        self.api.session().establish(token, role.clone());

        let destination = match redirect {
            Some(path) if !path.is_empty() => path.to_string(),
            _ if role.as_ref().is_some_and(AdvisoryRole::is_admin) => ADMIN_HOME.to_string(),
            _ => HOME.to_string(),
        };

        Ok(LoginOutcome {
            session: self.api.session().current(),
            destination,
        })
    }

    /// Create an account.
    ///
    /// The registration endpoint is configurable because deployed backends
    /// disagree on its path; the request forces public classification so it
    /// works even when the configured path misses the public-path hints.
    ///
    /// On success the user is sent back to the login page, preserving the
    /// return path they arrived with.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on failure; validation problems arrive as
    /// [`ClientError::Api`] with the server's message.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(
        &self,
        request: &RegisterRequest,
        redirect: Option<&str>,
    ) -> Result<Redirect> {
        let endpoint = self.api.config().register_endpoint.clone();
        self.api
            .post_json::<serde_json::Value>(&endpoint, request, &RequestOptions::public())
            .await?;

        Ok(Redirect::login(
            "Account created. Log in.",
            redirect.map(str::to_string),
        ))
    }

    /// Log out: clears the session (one notification) and hands back the
    /// login redirect the application should perform.
    #[must_use]
    pub fn logout(&self) -> Redirect {
        self.api.session().clear();
        Redirect::login(LOGOUT_MESSAGE, None)
    }

    /// Gate for views that need a signed-in user.
    ///
    /// # Errors
    ///
    /// Returns the login [`Redirect`] (with `view_path` as the return
    /// target) when no credential is present.
    pub fn require_credential(&self, view_path: &str) -> std::result::Result<BearerToken, Redirect> {
        self.api.session().credential().ok_or_else(|| {
            Redirect::login(SIGN_IN_MESSAGE, Some(view_path.to_string()))
        })
    }

    /// Gate for admin views.
    ///
    /// This is a rendering decision only - the server still enforces admin
    /// rights on every call.
    ///
    /// # Errors
    ///
    /// Returns a login [`Redirect`] when signed out, or a home [`Redirect`]
    /// when the advisory role is not admin.
    pub fn require_admin(&self, view_path: &str) -> std::result::Result<(), Redirect> {
        self.require_credential(view_path)?;
        let is_admin = self
            .api
            .session()
            .role()
            .is_some_and(|role| role.is_admin());
        if is_admin {
            Ok(())
        } else {
            Err(Redirect::home(ADMIN_ONLY_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::session::SessionStore;

    fn gate_client(session: SessionStore) -> AuthApi {
        let config = ClientConfig::new("http://localhost:3333").expect("config");
        AuthApi::new(ApiClient::new(&config, session))
    }

    #[test]
    fn test_require_credential_when_signed_out() {
        let auth = gate_client(SessionStore::in_memory());
        let redirect = auth.require_credential("/carrinho").expect_err("redirect");
        assert_eq!(
            redirect,
            Redirect::login(SIGN_IN_MESSAGE, Some("/carrinho".to_string()))
        );
    }

    #[test]
    fn test_require_admin_rejects_plain_user() {
        let session = SessionStore::in_memory();
        session.establish(
            BearerToken::from_raw("token").expect("token"),
            Some(AdvisoryRole::new("user")),
        );
        let auth = gate_client(session);

        let redirect = auth.require_admin("/adm").expect_err("redirect");
        assert_eq!(redirect, Redirect::home(ADMIN_ONLY_MESSAGE));
    }

    #[test]
    fn test_require_admin_accepts_admin() {
        let session = SessionStore::in_memory();
        session.establish(
            BearerToken::from_raw("token").expect("token"),
            Some(AdvisoryRole::new("admin")),
        );
        let auth = gate_client(session);

        assert!(auth.require_admin("/adm").is_ok());
    }

    #[test]
    fn test_logout_clears_and_redirects() {
        let session = SessionStore::in_memory();
        session.establish(BearerToken::from_raw("token").expect("token"), None);
        let auth = gate_client(session.clone());

        let redirect = auth.logout();
        assert!(!session.current().is_authenticated());
        assert_eq!(redirect, Redirect::login(LOGOUT_MESSAGE, None));
    }
}

//! The single request path to the catalog API.
//!
//! Every outgoing call flows through [`ApiClient::request`]: the target is
//! classified public or protected, the bearer credential is attached when it
//! should be, and failures are classified on the way back out. There is no
//! retry, timeout, or caching here - one call, one outcome.

mod authorizer;
mod guard;

pub use authorizer::{PUBLIC_PATH_HINTS, SKIP_AUTH_HEADER, is_public, request_path};

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::redirect::Redirect;
use crate::session::SessionStore;

/// Message shown on the login page after a forced sign-out.
const SESSION_REJECTED_MESSAGE: &str = "Your session expired or lacks permission. Log in again.";

/// Message shown on the error page when the server never answered.
const UNREACHABLE_MESSAGE: &str = "The catalog server did not respond. Is the backend running?";

/// Per-request knobs. The default is a protected request with no return
/// path hint.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Force public classification: no credential is attached regardless of
    /// path, and an explicit `X-Skip-Auth` header marks the request.
    pub skip_auth: bool,
    /// The UI path the user is on, used as the login return target if this
    /// request gets the session invalidated. Falls back to the request path.
    pub return_to: Option<String>,
}

impl RequestOptions {
    /// Options forcing public classification.
    #[must_use]
    pub fn public() -> Self {
        Self {
            skip_auth: true,
            return_to: None,
        }
    }

    /// Options recording the view path issuing the request.
    #[must_use]
    pub fn returning_to(path: impl Into<String>) -> Self {
        Self {
            skip_auth: false,
            return_to: Some(path.into()),
        }
    }
}

/// Client for the catalog API. Cheap to clone; clones share the HTTP
/// connection pool and the session store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    session: SessionStore,
}

impl ApiClient {
    /// Create a new client.
    #[must_use]
    pub fn new(config: &ClientConfig, session: SessionStore) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                config: config.clone(),
                session,
            }),
        }
    }

    /// The session store this client reads credentials from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] classified per the failure taxonomy.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        target: &str,
        opts: &RequestOptions,
    ) -> Result<T> {
        self.request(Method::GET, target, None, opts).await
    }

    /// POST a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] classified per the failure taxonomy.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        target: &str,
        body: &impl Serialize,
        opts: &RequestOptions,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, target, Some(body), opts).await
    }

    /// PUT a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] classified per the failure taxonomy.
    pub async fn put_json<T: DeserializeOwned>(
        &self,
        target: &str,
        body: &impl Serialize,
        opts: &RequestOptions,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, target, Some(body), opts).await
    }

    /// DELETE a resource, ignoring whatever body comes back.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] classified per the failure taxonomy.
    pub async fn delete(&self, target: &str, opts: &RequestOptions) -> Result<()> {
        self.request::<serde_json::Value>(Method::DELETE, target, None, opts)
            .await
            .map(drop)
    }

    /// Speculative GET used by endpoint probing: any failure at all becomes
    /// `None`. Failure side effects still apply - a 403 from a protected
    /// candidate invalidates the session like any other call.
    pub(crate) async fn probe_json(&self, target: &str) -> Option<serde_json::Value> {
        match self
            .request::<serde_json::Value>(Method::GET, target, None, &RequestOptions::default())
            .await
        {
            Ok(payload) => Some(payload),
            Err(error) => {
                debug!(target, error = %error, "candidate endpoint did not answer");
                None
            }
        }
    }

    /// The one request path.
    #[instrument(skip_all, fields(method = %method, endpoint = target))]
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        target: &str,
        body: Option<serde_json::Value>,
        opts: &RequestOptions,
    ) -> Result<T> {
        let path = request_path(&self.inner.config.base_url, target);
        let public = is_public(&path, opts.skip_auth);
        let url = format!("{}{target}", self.inner.config.base_url);

        let mut builder = self.inner.http.request(method, &url);
        if opts.skip_auth {
            builder = builder.header(SKIP_AUTH_HEADER, "true");
        }
        if !public && let Some(token) = self.inner.session.credential() {
            builder = builder.bearer_auth(token.as_str());
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) => return Err(self.unreachable(&error)),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(error) => return Err(self.unreachable(&error)),
        };

        if status.is_success() {
            return parse_body(&text);
        }

        Err(self.guard_failure(status, &text, &path, public, opts))
    }

    /// No response reached us. Fatal for the current navigation; the session
    /// is left untouched.
    fn unreachable(&self, error: &reqwest::Error) -> ClientError {
        warn!(error = %error, "transport failure");
        ClientError::Unreachable {
            message: error.to_string(),
            redirect: Redirect::error(UNREACHABLE_MESSAGE),
        }
    }

    /// Classify a completed-but-failed response and react.
    fn guard_failure(
        &self,
        status: reqwest::StatusCode,
        body: &str,
        path: &str,
        public: bool,
        opts: &RequestOptions,
    ) -> ClientError {
        let message = guard::error_message(status, body);

        match guard::classify(status, public) {
            guard::Disposition::InvalidateSession => {
                warn!(status = %status, path, "credential rejected, clearing session");
                self.inner.session.clear();
                let return_to = opts
                    .return_to
                    .clone()
                    .unwrap_or_else(|| path.to_string());
                ClientError::SessionExpired {
                    message,
                    redirect: Redirect::login(SESSION_REJECTED_MESSAGE, Some(return_to)),
                }
            }
            guard::Disposition::Propagate => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Decode a response body, treating an empty body as JSON `null` so unit
/// and optional results work for 204-style responses.
fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T> {
    if text.trim().is_empty() {
        serde_json::from_str("null").map_err(Into::into)
    } else {
        serde_json::from_str(text).map_err(Into::into)
    }
}

//! Process-wide session state.
//!
//! One [`SessionStore`] owns the current credential and advisory role.
//! Every consumer - the request path, the auth flows, any number of UI
//! subscribers - goes through this handle instead of reading durable storage
//! directly, so independent read sites can never drift apart. All mutation
//! funnels through a single choke point that persists the change and fires
//! exactly one notification per logical change (login, logout, forced
//! invalidation).

mod backend;
mod claims;

pub use backend::{FileBackend, MemoryBackend, SessionBackend, StoredSession};
pub use claims::{ClaimsOutcome, TokenClaims, decode_claims};

use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use mercado_core::{AdvisoryRole, BearerToken};

/// A snapshot of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    credential: Option<BearerToken>,
    role: Option<AdvisoryRole>,
}

impl Session {
    /// Build a session from its durable form, discarding sentinel tokens.
    fn from_stored(stored: StoredSession) -> Self {
        let credential = stored.token.and_then(BearerToken::from_raw);
        // A role without a credential is meaningless leftover state.
        let role = credential
            .as_ref()
            .and(stored.role)
            .filter(|role| !role.is_empty())
            .map(AdvisoryRole::new);
        Self { credential, role }
    }

    fn to_stored(&self) -> StoredSession {
        StoredSession {
            token: self
                .credential
                .as_ref()
                .map(|token| token.as_str().to_string()),
            role: self.role.as_ref().map(|role| role.as_str().to_string()),
        }
    }

    /// The current credential, if one is present.
    #[must_use]
    pub const fn credential(&self) -> Option<&BearerToken> {
        self.credential.as_ref()
    }

    /// The advisory role hint, if one is known.
    #[must_use]
    pub const fn role(&self) -> Option<&AdvisoryRole> {
        self.role.as_ref()
    }

    /// Whether a credential is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }
}

/// Shared handle to the session. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    backend: Box<dyn SessionBackend>,
    current: watch::Sender<Session>,
}

impl SessionStore {
    /// Create a store over the given backend, loading any persisted session.
    #[must_use]
    pub fn new(backend: impl SessionBackend) -> Self {
        let session = Session::from_stored(backend.load());
        let (current, _) = watch::channel(session);
        Self {
            inner: Arc::new(SessionStoreInner {
                backend: Box::new(backend),
                current,
            }),
        }
    }

    /// Create a store persisting to a session file.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(FileBackend::new(path.as_ref().to_path_buf()))
    }

    /// Create a store with no durable storage (tests, one-off scripts).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// A snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.inner.current.borrow().clone()
    }

    /// The current credential, if one is present.
    #[must_use]
    pub fn credential(&self) -> Option<BearerToken> {
        self.inner.current.borrow().credential.clone()
    }

    /// The current advisory role, if one is known.
    #[must_use]
    pub fn role(&self) -> Option<AdvisoryRole> {
        self.inner.current.borrow().role.clone()
    }

    /// Subscribe to session changes.
    ///
    /// Independent subscribers (a header showing login state, a cart badge)
    /// converge on the same session without coupling to each other.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.current.subscribe()
    }

    /// Record a successful login.
    pub fn establish(&self, credential: BearerToken, role: Option<AdvisoryRole>) {
        self.apply(Session {
            credential: Some(credential),
            role,
        });
    }

    /// Drop the session: credential and role go together, atomically.
    pub fn clear(&self) {
        self.apply(Session::default());
    }

    /// The single mutation choke point: persist, swap, notify - once.
    fn apply(&self, session: Session) {
        if *self.inner.current.borrow() == session {
            // Not a logical change; notifying would double-fire subscribers.
            return;
        }

        let stored = session.to_stored();
        if stored.is_empty() {
            self.inner.backend.clear();
        } else {
            self.inner.backend.save(&stored);
        }

        debug!(
            authenticated = session.is_authenticated(),
            "session changed"
        );
        self.inner.current.send_replace(session);
    }
}

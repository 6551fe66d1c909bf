//! Mercado client library.
//!
//! A typed client for the Mercado catalog API: products, shopping cart, and
//! the admin dashboard. The interesting parts live in the session and
//! networking layers:
//!
//! - [`session`] - durable credential + advisory role storage with change
//!   notifications
//! - [`api`] - the single request path: public-path classification, bearer
//!   header attachment, and failure classification (transport vs application
//!   vs authorization)
//! - [`cart`] - reconciliation of the two cart-item wire shapes the backend
//!   has shipped over time into one canonical form
//! - [`metrics`] - admin dashboard metrics via ordered endpoint probing with
//!   a local-aggregation fallback
//!
//! Catalog and auth operations are thin collaborators over the same request
//! path.
//!
//! # Example
//!
//! ```rust,ignore
//! use mercado_client::{ApiClient, ClientConfig, SessionStore};
//! use mercado_client::auth::AuthApi;
//! use mercado_client::cart::CartApi;
//!
//! let config = ClientConfig::from_env()?;
//! let session = SessionStore::open(&config.session_file);
//! let api = ApiClient::new(&config, session);
//!
//! let auth = AuthApi::new(api.clone());
//! let outcome = auth.login("ana@example.com", "hunter2", None).await?;
//!
//! let cart = CartApi::new(api.clone());
//! let items = cart.fetch_items().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod redirect;
pub mod session;

pub use api::{ApiClient, RequestOptions};
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, Result};
pub use redirect::Redirect;
pub use session::{Session, SessionStore};

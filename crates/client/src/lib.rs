//! LearnHub remote resource accessor.
//!
//! - [`ApiClient`] -- authenticated JSON/multipart requests against the
//!   platform REST API with classified failures ([`ApiError`]).
//! - [`endpoints`] -- typed wrappers, one module per API area.
//! - [`LocalStore`] -- persisted tokens and guest-session values.
//! - [`ClientConfig`] -- environment-driven configuration.

pub mod api;
pub mod auth;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod store;

pub use api::ApiClient;
pub use auth::{Anonymous, StaticToken, StoredToken, TokenSource};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use store::{GuestSession, LocalStore, StoreError};

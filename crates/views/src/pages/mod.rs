//! Page controllers.
//!
//! Each page owns the query bindings it renders and exposes its user
//! actions as async methods. Form input is validated before any request
//! is issued; failures surface as notifications plus a [`ViewError`].
//!
//! [`ViewError`]: crate::error::ViewError

pub mod analytics;
pub mod assistant;
pub mod collaboration;
pub mod courses;
pub mod gamification;
pub mod instructor;
pub mod lessons;
pub mod practice;
pub mod subscriptions;

//! Typed wrappers over the backend endpoints, one module per API area.
//!
//! Each module adds inherent methods to [`ApiClient`](crate::api::ApiClient)
//! so call sites read `api.list_courses()` while every response is decoded
//! into an explicit view model from `learnhub_core`.

pub mod admin;
pub mod analytics;
pub mod collaboration;
pub mod gamification;
pub mod instructor;
pub mod llm;
pub mod practice;
pub mod subscriptions;

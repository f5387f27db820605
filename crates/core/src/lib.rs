//! LearnHub client domain types.
//!
//! Zero-I/O crate holding the client view models of every backend
//! resource, the client-side guards (form rules, upload limits), the
//! fixed user-facing error messages, and polling cadences. Shared by the
//! HTTP accessor, the query cache and the views.

pub mod analytics;
pub mod assessment;
pub mod collaboration;
pub mod course;
pub mod error;
pub mod gamification;
pub mod instructor;
pub mod llm;
pub mod polling;
pub mod practice;
pub mod subscription;
pub mod types;
pub mod upload;
pub mod validation;

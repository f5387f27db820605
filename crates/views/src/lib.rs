//! Page controllers for the LearnHub client.
//!
//! Everything a page needs is reached through one [`AppContext`]; pages
//! bind their reads as queries, their writes as mutations, and report
//! outcomes through the shared notification hub.

pub mod context;
pub mod error;
pub mod keys;
pub mod pages;
pub mod route;

pub use context::AppContext;
pub use error::ViewError;
pub use route::Route;

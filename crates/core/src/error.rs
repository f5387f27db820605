use crate::types::DbId;

/// Domain-level failures raised before anything reaches the network.
///
/// Client-side guards (required fields, upload rules) produce
/// [`CoreError::Validation`]; the other variants describe backend
/// answers once they have been mapped into the domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: &'static str },

    #[error("At least one field must be provided")]
    EmptyUpdate,
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: &'static str) -> Self {
        ValidationError::EmptyField { field }
    }
}

/// Errors surfaced by repository implementations.
///
/// "Not found" is not an error here: lookups return `Option` and updates
/// report whether they matched, so these variants cover genuinely
/// exceptional outcomes only.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Invalid {entity} id: {id}")]
    InvalidId { entity: &'static str, id: String },

    #[error("{entity} already exists: {key}")]
    Duplicate { entity: &'static str, key: String },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl RepositoryError {
    /// Creates an invalid id error.
    pub fn invalid_id(entity: &'static str, id: impl Into<String>) -> Self {
        RepositoryError::InvalidId {
            entity,
            id: id.into(),
        }
    }

    /// Creates a duplicate key error.
    pub fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
        RepositoryError::Duplicate {
            entity,
            key: key.into(),
        }
    }

    /// Creates a backend error from any displayable driver error.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        RepositoryError::Backend(err.to_string())
    }
}

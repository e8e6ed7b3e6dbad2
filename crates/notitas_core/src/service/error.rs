//! Error taxonomy surfaced by reconciliation services.

use crate::model::validation::ValidationError;
use crate::repo::{EntityRef, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Typed failure returned by every category/note service operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Input is missing a required field or carries a malformed value.
    Validation(ValidationError),
    /// Referenced id or natural key does not resolve.
    NotFound(EntityRef),
    /// Create collided with a uniqueness expectation. Callers may retry or
    /// fall back to an update.
    Conflict(EntityRef),
    /// Entity store failed the read or write.
    Storage(RepoError),
}

impl ServiceError {
    /// Stable machine-readable code, used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::NotFound(target) => write!(f, "{target} not found"),
            Self::Conflict(target) => write!(f, "{target} conflicts with an existing record"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound(_) | Self::Conflict(_) => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(target) => Self::NotFound(target),
            RepoError::Conflict(target) => Self::Conflict(target),
            other => Self::Storage(other),
        }
    }
}

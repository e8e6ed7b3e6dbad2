//! Category domain model.
//!
//! # Responsibility
//! - Define the persisted category record and its upsert input.
//!
//! # Invariants
//! - `name` is the natural key and is unique across categories.
//! - `id` is assigned by storage and is immutable.

use serde::{Deserialize, Serialize};

/// Surrogate identifier assigned by storage on insert.
pub type CategoryId = i64;

/// Name of the category every note falls back to when none is given.
pub const DEFAULT_CATEGORY_NAME: &str = "General";

/// Persisted category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Normalized natural key.
    pub name: String,
    pub description: Option<String>,
}

/// Input for `upsert_category`.
///
/// `name` is the lookup key. Every other field is merged into an existing
/// record only when it is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Outcome of a cascading category delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryDeletion {
    pub category_id: CategoryId,
    /// Notes removed by the cascade. These are gone for good.
    pub deleted_notes: u64,
}

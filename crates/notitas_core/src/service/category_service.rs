//! Category reconciliation service.
//!
//! # Responsibility
//! - Upsert categories by natural key with partial-merge semantics.
//! - Bootstrap the default category notes fall back to.
//! - Delete categories together with every note that references them.
//!
//! # Invariants
//! - The lookup + write pair of an upsert runs in one write transaction.
//! - An upsert never rewrites `name`; absent input fields leave stored
//!   values untouched.
//! - `delete_category` is a hard delete. Cascaded notes cannot be restored.

use crate::config::DefaultCategoryConfig;
use crate::model::category::{Category, CategoryDeletion, CategoryId, CategoryInput};
use crate::model::validation::{non_blank, normalize_natural_key, ValidationError};
use crate::repo::{EntityRef, EntityStore};
use crate::service::error::ServiceError;
use log::{info, warn};

/// How a category is addressed by read calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryLookup {
    Id(CategoryId),
    Name(String),
}

impl CategoryLookup {
    /// Builds a lookup from optional transport arguments. The id wins when
    /// both are present.
    pub fn from_parts(id: Option<CategoryId>, name: Option<String>) -> Result<Self, ValidationError> {
        match (id, name) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(name)) => Ok(Self::Name(name)),
            (None, None) => Err(ValidationError::MissingLookupKey("category")),
        }
    }
}

/// Handle to the bootstrapped fallback category.
///
/// Only `CategoryService::ensure_default_category` hands these out, so a
/// `NoteService` cannot exist before bootstrap has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultCategory {
    category: Category,
}

impl DefaultCategory {
    pub fn id(&self) -> CategoryId {
        self.category.id
    }

    pub fn name(&self) -> &str {
        self.category.name.as_str()
    }

    pub fn category(&self) -> &Category {
        &self.category
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpsertAction {
    Created,
    Updated,
    Unchanged,
}

impl UpsertAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Category service facade over an entity store.
pub struct CategoryService<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> CategoryService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Makes sure the configured default category exists and returns it.
    ///
    /// Idempotent: an existing record is returned as-is, its description is
    /// never overwritten. Run once at startup before serving note creates.
    pub fn ensure_default_category(
        &self,
        config: &DefaultCategoryConfig,
    ) -> Result<DefaultCategory, ServiceError> {
        let name = normalize_natural_key("name", &config.name)?;
        let description = non_blank(config.description.as_deref());

        let (category, action) = self.store.atomically(|store| -> Result<_, ServiceError> {
            match store.find_category_by_name(&name)? {
                Some(existing) => Ok((existing, UpsertAction::Unchanged)),
                None => Ok((
                    store.insert_category(&name, description)?,
                    UpsertAction::Created,
                )),
            }
        })?;

        info!(
            "event=default_category_ensure module=service status=ok action={} category_id={}",
            action.as_str(),
            category.id
        );
        Ok(DefaultCategory { category })
    }

    /// Creates the category named `input.name`, or merges `input` into the
    /// existing one.
    ///
    /// A `Some` description overwrites the stored one (blank clears it); a
    /// `None` description leaves it alone.
    ///
    /// # Errors
    /// - `Validation` when `name` is blank or too long.
    /// - `Conflict` when another writer inserted the same name first.
    /// - `Storage` when the store fails.
    pub fn upsert_category(&self, input: &CategoryInput) -> Result<Category, ServiceError> {
        let result = self.upsert_category_inner(input);
        match &result {
            Ok((category, action)) => info!(
                "event=category_upsert module=service status=ok action={} category_id={}",
                action.as_str(),
                category.id
            ),
            Err(err) => warn!(
                "event=category_upsert module=service status=error error_code={}",
                err.code()
            ),
        }
        result.map(|(category, _)| category)
    }

    fn upsert_category_inner(
        &self,
        input: &CategoryInput,
    ) -> Result<(Category, UpsertAction), ServiceError> {
        let name = normalize_natural_key("name", &input.name)?;
        // Outer `None`: field absent. Inner `None`: field present but blank.
        let description = input
            .description
            .as_deref()
            .map(|text| non_blank(Some(text)));

        self.store.atomically(|store| -> Result<_, ServiceError> {
            match store.find_category_by_name(&name)? {
                Some(existing) => match description {
                    Some(description) => Ok((
                        store.update_category_description(existing.id, description)?,
                        UpsertAction::Updated,
                    )),
                    None => Ok((existing, UpsertAction::Unchanged)),
                },
                None => Ok((
                    store.insert_category(&name, description.flatten())?,
                    UpsertAction::Created,
                )),
            }
        })
    }

    /// Deletes one category and every note referencing it.
    ///
    /// This is not a soft delete: the returned report says how many notes
    /// were destroyed along with the category.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not resolve.
    pub fn delete_category(&self, id: CategoryId) -> Result<CategoryDeletion, ServiceError> {
        let result = self.store.atomically(|store| -> Result<_, ServiceError> {
            if store.get_category(id)?.is_none() {
                return Err(ServiceError::NotFound(EntityRef::CategoryId(id)));
            }
            let deleted_notes = store.count_notes_in_category(id)?;
            store.delete_category(id)?;
            Ok(CategoryDeletion {
                category_id: id,
                deleted_notes,
            })
        });

        match &result {
            Ok(report) => warn!(
                "event=category_delete module=service status=ok category_id={} cascaded_notes={}",
                report.category_id, report.deleted_notes
            ),
            Err(err) => warn!(
                "event=category_delete module=service status=error category_id={} error_code={}",
                id,
                err.code()
            ),
        }
        result
    }

    /// Fetches one category by id or by exact (normalized) name.
    pub fn get_category(&self, lookup: &CategoryLookup) -> Result<Category, ServiceError> {
        match lookup {
            CategoryLookup::Id(id) => self
                .store
                .get_category(*id)?
                .ok_or(ServiceError::NotFound(EntityRef::CategoryId(*id))),
            CategoryLookup::Name(raw) => {
                let name = normalize_natural_key("name", raw)?;
                self.store
                    .find_category_by_name(&name)?
                    .ok_or(ServiceError::NotFound(EntityRef::CategoryName(name)))
            }
        }
    }

    /// Lists all categories ordered by id.
    pub fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.store.list_categories()?)
    }
}

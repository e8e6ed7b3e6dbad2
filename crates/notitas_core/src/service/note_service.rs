//! Note reconciliation service.
//!
//! # Responsibility
//! - Create notes with deterministic default resolution.
//! - Merge partial updates into existing notes addressed by id.
//! - Resolve a note's category by name, falling back to the default category.
//!
//! # Invariants
//! - Create never takes an id; update and delete always do.
//! - `title` is stored exactly as sent and is immutable once the note exists.
//!   Duplicate titles are allowed.
//! - Category resolution failure is `NotFound` and leaves storage untouched.
//! - Defaults resolve in order: category, note_type, pinned, done.

use crate::model::category::CategoryId;
use crate::model::note::{Note, NoteFields, NoteId, NoteInput, NotePatch};
use crate::model::validation::{
    non_blank, normalize_natural_key, resolve_color, resolve_flag, resolve_note_type,
    validate_title, ValidationError,
};
use crate::repo::note_repo::NoteListQuery;
use crate::repo::{EntityRef, EntityStore};
use crate::service::category_service::DefaultCategory;
use crate::service::error::ServiceError;
use log::{debug, info, warn};

/// How a note is addressed by read calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteLookup {
    Id(NoteId),
    /// Titles are not unique; the oldest matching note is returned.
    Title(String),
}

impl NoteLookup {
    /// Builds a lookup from optional transport arguments. The id wins when
    /// both are present.
    pub fn from_parts(id: Option<NoteId>, title: Option<String>) -> Result<Self, ValidationError> {
        match (id, title) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(title)) => Ok(Self::Title(title)),
            (None, None) => Err(ValidationError::MissingLookupKey("note")),
        }
    }
}

/// Note service facade over an entity store.
pub struct NoteService<S: EntityStore> {
    store: S,
    default_category: DefaultCategory,
}

impl<S: EntityStore> NoteService<S> {
    /// Creates a service. `default_category` comes from
    /// `CategoryService::ensure_default_category`.
    pub fn new(store: S, default_category: DefaultCategory) -> Self {
        Self {
            store,
            default_category,
        }
    }

    /// Returns the category used when an input names none.
    pub fn default_category(&self) -> &DefaultCategory {
        &self.default_category
    }

    /// Creates a new note.
    ///
    /// # Errors
    /// - `Validation` for a blank/overlong title or an invalid
    ///   `note_type`/`color`.
    /// - `NotFound` when `category_name` does not resolve, or when the default
    ///   category has been deleted since bootstrap.
    pub fn create_note(&self, input: &NoteInput) -> Result<Note, ServiceError> {
        let result = self.create_note_inner(input);
        match &result {
            Ok(note) => info!(
                "event=note_create module=service status=ok note_id={} category_id={}",
                note.id, note.category_id
            ),
            Err(err) => warn!(
                "event=note_create module=service status=error error_code={}",
                err.code()
            ),
        }
        result
    }

    fn create_note_inner(&self, input: &NoteInput) -> Result<Note, ServiceError> {
        let title = validate_title(&input.title)?.to_string();

        self.store.atomically(|store| -> Result<_, ServiceError> {
            let category_id =
                resolve_category(store, &self.default_category, input.category_name.as_deref())?;
            let fields = NoteFields {
                title,
                content: non_blank(input.content.as_deref()).map(str::to_string),
                note_type: resolve_note_type(input.note_type.as_deref())?,
                category_id,
                color: resolve_color(input.color.as_deref())?,
                pinned: resolve_flag(input.pinned),
                reminder: input.reminder,
                done: resolve_flag(input.done),
            };
            Ok(store.insert_note(&fields)?)
        })
    }

    /// Merges `patch` into the note identified by `id`.
    ///
    /// Absent fields keep their stored values. Present fields go through the
    /// same resolution as on create: a blank `category_name` selects the
    /// default category, a blank `note_type` selects `Note`, a blank `color`
    /// clears it. `patch.title` is ignored.
    ///
    /// # Errors
    /// - `NotFound` when `id` or a supplied `category_name` does not resolve.
    /// - `Validation` for an invalid `note_type`/`color`.
    pub fn update_note(&self, id: NoteId, patch: &NotePatch) -> Result<Note, ServiceError> {
        if patch.title.is_some() {
            debug!("event=note_update module=service note_id={id} title_ignored=true");
        }

        let result = self.store.atomically(|store| -> Result<_, ServiceError> {
            let existing = store
                .get_note(id)?
                .ok_or(ServiceError::NotFound(EntityRef::NoteId(id)))?;
            let fields = merge_patch(store, &self.default_category, &existing, patch)?;
            Ok(store.update_note(id, &fields)?)
        });

        match &result {
            Ok(note) => info!(
                "event=note_update module=service status=ok note_id={} category_id={}",
                note.id, note.category_id
            ),
            Err(err) => warn!(
                "event=note_update module=service status=error note_id={} error_code={}",
                id,
                err.code()
            ),
        }
        result
    }

    /// Deletes one note by id.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist.
    pub fn delete_note(&self, id: NoteId) -> Result<(), ServiceError> {
        let result = self.store.delete_note(id).map_err(ServiceError::from);
        match &result {
            Ok(()) => info!("event=note_delete module=service status=ok note_id={id}"),
            Err(err) => warn!(
                "event=note_delete module=service status=error note_id={} error_code={}",
                id,
                err.code()
            ),
        }
        result
    }

    /// Fetches one note by id or by exact title.
    pub fn get_note(&self, lookup: &NoteLookup) -> Result<Note, ServiceError> {
        match lookup {
            NoteLookup::Id(id) => self
                .store
                .get_note(*id)?
                .ok_or(ServiceError::NotFound(EntityRef::NoteId(*id))),
            NoteLookup::Title(title) => {
                validate_title(title)?;
                self.store
                    .find_note_by_title(title)?
                    .ok_or_else(|| ServiceError::NotFound(EntityRef::NoteTitle(title.clone())))
            }
        }
    }

    /// Lists notes, pinned first, then most recently updated.
    pub fn list_notes(&self, query: &NoteListQuery) -> Result<Vec<Note>, ServiceError> {
        Ok(self.store.list_notes(query)?)
    }
}

fn resolve_category<S: EntityStore>(
    store: &S,
    default_category: &DefaultCategory,
    category_name: Option<&str>,
) -> Result<CategoryId, ServiceError> {
    match non_blank(category_name) {
        None => {
            let id = default_category.id();
            store
                .get_category(id)?
                .map(|category| category.id)
                .ok_or(ServiceError::NotFound(EntityRef::CategoryId(id)))
        }
        Some(raw) => {
            let name = normalize_natural_key("category_name", raw)?;
            store
                .find_category_by_name(&name)?
                .map(|category| category.id)
                .ok_or(ServiceError::NotFound(EntityRef::CategoryName(name)))
        }
    }
}

fn merge_patch<S: EntityStore>(
    store: &S,
    default_category: &DefaultCategory,
    existing: &Note,
    patch: &NotePatch,
) -> Result<NoteFields, ServiceError> {
    let mut fields = NoteFields::from(existing);

    if let Some(category_name) = patch.category_name.as_deref() {
        fields.category_id = resolve_category(store, default_category, Some(category_name))?;
    }
    if let Some(note_type) = patch.note_type.as_deref() {
        fields.note_type = resolve_note_type(Some(note_type))?;
    }
    if let Some(pinned) = patch.pinned {
        fields.pinned = resolve_flag(Some(pinned));
    }
    if let Some(done) = patch.done {
        fields.done = resolve_flag(Some(done));
    }
    if let Some(color) = patch.color.as_deref() {
        fields.color = resolve_color(Some(color))?;
    }
    if let Some(content) = patch.content.as_deref() {
        fields.content = non_blank(Some(content)).map(str::to_string);
    }
    if let Some(reminder) = patch.reminder {
        fields.reminder = Some(reminder);
    }

    Ok(fields)
}

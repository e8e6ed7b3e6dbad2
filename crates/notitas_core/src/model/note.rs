//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its enumerated attributes.
//! - Define create/update inputs with explicit per-field presence.
//!
//! # Invariants
//! - `title` is set at creation and never changed afterwards.
//! - `created_date` is written once; `updated_date` moves on every write.
//! - Timestamps are Unix epoch milliseconds.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};

/// Surrogate identifier assigned by storage on insert.
pub type NoteId = i64;

/// Display kind of a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteType {
    /// Free-form text note.
    #[default]
    Note,
    /// Checklist-style note.
    List,
}

impl NoteType {
    /// Stable storage/wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::List => "List",
        }
    }

    /// Parses a caller-supplied value, ignoring case and outer whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "note" => Some(Self::Note),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

/// Optional highlight color of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteColor {
    Gray,
    Red,
    Orange,
    Yellow,
}

impl NoteColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gray => "Gray",
            Self::Red => "Red",
            Self::Orange => "Orange",
            Self::Yellow => "Yellow",
        }
    }

    /// Parses a caller-supplied value, ignoring case and outer whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gray" => Some(Self::Gray),
            "red" => Some(Self::Red),
            "orange" => Some(Self::Orange),
            "yellow" => Some(Self::Yellow),
            _ => None,
        }
    }
}

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: Option<String>,
    pub note_type: NoteType,
    pub category_id: CategoryId,
    pub color: Option<NoteColor>,
    pub pinned: bool,
    /// Epoch milliseconds.
    pub reminder: Option<i64>,
    pub done: bool,
    /// Epoch milliseconds, written once on insert.
    pub created_date: i64,
    /// Epoch milliseconds, refreshed on every write.
    pub updated_date: i64,
}

/// Input for `create_note`.
///
/// Enumerated attributes arrive as raw strings so the service can report
/// invalid values as validation failures instead of decode errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteInput {
    pub title: String,
    pub content: Option<String>,
    pub note_type: Option<String>,
    pub category_name: Option<String>,
    pub color: Option<String>,
    pub pinned: Option<bool>,
    pub reminder: Option<i64>,
    pub done: Option<bool>,
}

impl NoteInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Input for `update_note`.
///
/// Only `Some` fields are merged. `title` is accepted so callers can send the
/// same shape they create with, but it is never applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub note_type: Option<String>,
    pub category_name: Option<String>,
    pub color: Option<String>,
    pub pinned: Option<bool>,
    pub reminder: Option<i64>,
    pub done: Option<bool>,
}

/// Fully resolved note fields handed to storage.
///
/// Storage writes `title` only on insert; updates leave the column alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFields {
    pub title: String,
    pub content: Option<String>,
    pub note_type: NoteType,
    pub category_id: CategoryId,
    pub color: Option<NoteColor>,
    pub pinned: bool,
    pub reminder: Option<i64>,
    pub done: bool,
}

impl From<&Note> for NoteFields {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            note_type: note.note_type,
            category_id: note.category_id,
            color: note.color,
            pinned: note.pinned,
            reminder: note.reminder,
            done: note.done,
        }
    }
}

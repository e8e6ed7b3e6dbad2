//! Field normalization and validation shared by category/note services.
//!
//! # Responsibility
//! - Normalize natural keys so lookups match what was stored.
//! - Resolve blank/absent enumerated inputs to their defaults.
//! - Report malformed input as `ValidationError`.
//!
//! # Invariants
//! - Category names are trimmed and inner whitespace runs collapse to one
//!   space. Note titles are checked but stored verbatim.
//! - Blank optional text is treated as absent.

use crate::model::note::{NoteColor, NoteType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound for `Category.name` and `Note.title`, in characters.
pub const MAX_NATURAL_KEY_CHARS: usize = 120;

static WHITESPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Input rejected before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is missing or blank.
    EmptyField(&'static str),
    /// Field exceeds its character limit.
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    /// `note_type` is not one of `Note|List`.
    InvalidNoteType(String),
    /// `color` is not one of `Gray|Red|Orange|Yellow`.
    InvalidColor(String),
    /// Lookup was requested with neither id nor natural key.
    MissingLookupKey(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` must not be blank"),
            Self::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "`{field}` is {actual_chars} characters long; at most {max_chars} allowed"
            ),
            Self::InvalidNoteType(value) => {
                write!(f, "invalid note_type `{value}`; expected Note|List")
            }
            Self::InvalidColor(value) => {
                write!(f, "invalid color `{value}`; expected Gray|Red|Orange|Yellow")
            }
            Self::MissingLookupKey(entity) => {
                write!(f, "{entity} lookup requires an id or a natural key")
            }
        }
    }
}

impl Error for ValidationError {}

/// Normalizes a category natural key and enforces its bounds.
pub fn normalize_natural_key(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let collapsed = WHITESPACE_RUN_RE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }

    let actual_chars = collapsed.chars().count();
    if actual_chars > MAX_NATURAL_KEY_CHARS {
        return Err(ValidationError::FieldTooLong {
            field,
            max_chars: MAX_NATURAL_KEY_CHARS,
            actual_chars,
        });
    }

    Ok(collapsed.into_owned())
}

/// Checks a note title without rewriting it.
///
/// The title must contain something other than whitespace and fit in
/// `MAX_NATURAL_KEY_CHARS`. Inner spacing and line breaks are kept.
pub fn validate_title(value: &str) -> Result<&str, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField("title"));
    }

    let actual_chars = value.chars().count();
    if actual_chars > MAX_NATURAL_KEY_CHARS {
        return Err(ValidationError::FieldTooLong {
            field: "title",
            max_chars: MAX_NATURAL_KEY_CHARS,
            actual_chars,
        });
    }

    Ok(value)
}

/// Returns `None` for absent or blank optional text.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Resolves `note_type`: absent or blank means `NoteType::Note`.
pub fn resolve_note_type(value: Option<&str>) -> Result<NoteType, ValidationError> {
    match non_blank(value) {
        None => Ok(NoteType::default()),
        Some(raw) => {
            NoteType::parse(raw).ok_or_else(|| ValidationError::InvalidNoteType(raw.to_string()))
        }
    }
}

/// Resolves `color`: absent or blank means unset.
pub fn resolve_color(value: Option<&str>) -> Result<Option<NoteColor>, ValidationError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => NoteColor::parse(raw)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidColor(raw.to_string())),
    }
}

/// Resolves a boolean flag: absent or falsy means `false`.
pub fn resolve_flag(value: Option<bool>) -> bool {
    value.unwrap_or(false)
}

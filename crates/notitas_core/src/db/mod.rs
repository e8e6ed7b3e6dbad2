//! Connection bootstrap for the category/note store.
//!
//! # Responsibility
//! - Hand out SQLite connections that are safe to build a `SqliteStore` on.
//! - Bring the `categories`/`notes` schema up to the latest version.
//!
//! # Invariants
//! - `foreign_keys` reads back as on for every returned connection. Without it
//!   deleting a category would orphan its notes instead of cascading.
//! - Schema version lives in `PRAGMA user_version`; a file written by a newer
//!   build is refused rather than downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Reason a connection could not be handed to the entity store.
#[derive(Debug)]
pub enum DbError {
    /// Opening, configuring or migrating the database failed in SQLite.
    Sqlite(rusqlite::Error),
    /// SQLite ignored `PRAGMA foreign_keys = ON`, so category deletes would
    /// not cascade to notes.
    ForeignKeysUnavailable,
    /// The file carries a schema this build does not know.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::ForeignKeysUnavailable => write!(
                f,
                "sqlite build does not enforce foreign keys; category deletes cannot cascade"
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "notes database is at schema {db_version}, this build supports up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::ForeignKeysUnavailable | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

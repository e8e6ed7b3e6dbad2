//! Entity store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define per-entity data access contracts consumed by services.
//! - Define the transaction seam that makes lookup + write pairs atomic.
//! - Isolate SQLite query details from reconciliation logic.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.
//! - Persisted rows that fail to parse are reported, never masked.

use crate::db::DbError;
use crate::model::category::CategoryId;
use crate::model::note::NoteId;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_repo;
pub mod note_repo;
pub mod sqlite_store;

pub type RepoResult<T> = Result<T, RepoError>;

/// Reference to one stored entity, by surrogate id or natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    CategoryId(CategoryId),
    CategoryName(String),
    NoteId(NoteId),
    NoteTitle(String),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryId(id) => write!(f, "category id={id}"),
            Self::CategoryName(name) => write!(f, "category name=`{name}`"),
            Self::NoteId(id) => write!(f, "note id={id}"),
            Self::NoteTitle(title) => write!(f, "note title=`{title}`"),
        }
    }
}

/// Error for entity store persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target entity does not exist.
    NotFound(EntityRef),
    /// Write collided with a uniqueness constraint.
    Conflict(EntityRef),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(target) => write!(f, "{target} not found"),
            Self::Conflict(target) => write!(f, "{target} already exists"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "entity store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "entity store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "entity store requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Runs a group of repository calls as one write transaction.
pub trait Transactional {
    /// Executes `op` inside a transaction that holds the write lock from the
    /// first statement. Commits on `Ok`, rolls back on `Err`.
    ///
    /// Calls must not nest.
    fn atomically<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>;
}

/// Full store contract required by the reconciliation services.
pub trait EntityStore:
    category_repo::CategoryRepository + note_repo::NoteRepository + Transactional
{
}

impl<T> EntityStore for T where
    T: category_repo::CategoryRepository + note_repo::NoteRepository + Transactional
{
}

/// Maps a UNIQUE constraint failure to `Conflict`, anything else to `Db`.
pub(crate) fn map_unique_violation(err: rusqlite::Error, target: EntityRef) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::Conflict(target)
        }
        _ => RepoError::from(err),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn parse_flag(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

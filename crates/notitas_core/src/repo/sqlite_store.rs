//! SQLite-backed entity store handle.
//!
//! # Responsibility
//! - Validate that a connection is migrated before any repository use.
//! - Provide immediate (write-locking) transactions for services.
//!
//! # Invariants
//! - A `SqliteStore` only exists for connections at the latest schema.
//! - `atomically` takes the write lock up front, so two lookup + insert
//!   sequences on the same natural key cannot interleave.

use crate::db::migrations::{current_version, latest_version};
use crate::repo::{table_exists, table_has_column, RepoError, RepoResult, Transactional};
use rusqlite::{Connection, Transaction, TransactionBehavior};

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("categories", &["id", "name", "description"]),
    (
        "notes",
        &[
            "id",
            "title",
            "content",
            "note_type",
            "category_id",
            "color",
            "pinned",
            "reminder",
            "done",
            "created_date",
            "updated_date",
        ],
    ),
];

/// Entity store over one migrated SQLite connection.
///
/// Cheap to copy; every copy shares the same connection.
#[derive(Clone, Copy)]
pub struct SqliteStore<'conn> {
    pub(crate) conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Creates a store from a connection returned by `db::open_db*`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl Transactional for SqliteStore<'_> {
    fn atomically<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        let value = op(self)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}

fn ensure_store_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

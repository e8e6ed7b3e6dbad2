//! Category repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup by id and by natural key (`name`).
//! - Provide insert, description update, and cascading delete.
//!
//! # Invariants
//! - `name` is never rewritten after insert.
//! - Deleting a category removes its notes through `ON DELETE CASCADE`.

use crate::model::category::{Category, CategoryId};
use crate::repo::sqlite_store::SqliteStore;
use crate::repo::{map_unique_violation, EntityRef, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name, description FROM categories";

/// Repository interface for category persistence.
pub trait CategoryRepository {
    /// Inserts a category and returns it with its assigned id.
    fn insert_category(&self, name: &str, description: Option<&str>) -> RepoResult<Category>;
    /// Overwrites the description of an existing category.
    fn update_category_description(
        &self,
        id: CategoryId,
        description: Option<&str>,
    ) -> RepoResult<Category>;
    /// Loads one category by id.
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Loads one category by exact name.
    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    /// Lists all categories ordered by id.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Deletes one category and, by cascade, every note referencing it.
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;
}

impl CategoryRepository for SqliteStore<'_> {
    fn insert_category(&self, name: &str, description: Option<&str>) -> RepoResult<Category> {
        self.conn
            .execute(
                "INSERT INTO categories (name, description) VALUES (?1, ?2);",
                params![name, description],
            )
            .map_err(|err| map_unique_violation(err, EntityRef::CategoryName(name.to_string())))?;

        load_required_category(self.conn, self.conn.last_insert_rowid())
    }

    fn update_category_description(
        &self,
        id: CategoryId,
        description: Option<&str>,
    ) -> RepoResult<Category> {
        let changed = self.conn.execute(
            "UPDATE categories SET description = ?2 WHERE id = ?1;",
            params![id, description],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::CategoryId(id)));
        }

        load_required_category(self.conn, id)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_category_row,
            )
            .optional()
            .map_err(RepoError::from)
    }

    fn find_category_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        self.conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE name = ?1;"),
                [name],
                parse_category_row,
            )
            .optional()
            .map_err(RepoError::from)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY id ASC;"))?;
        let categories = stmt
            .query_map([], parse_category_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::CategoryId(id)));
        }

        Ok(())
    }
}

fn load_required_category(conn: &Connection, id: CategoryId) -> RepoResult<Category> {
    conn.query_row(
        &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
        [id],
        parse_category_row,
    )
    .optional()?
    .ok_or(RepoError::NotFound(EntityRef::CategoryId(id)))
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}

//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide note lookup by id and by title, listing, insert, field update
//!   and delete over the `notes` table.
//!
//! # Invariants
//! - `title` and `created_date` are written by insert only; `update_note`
//!   has no way to touch them.
//! - Every write refreshes `updated_date` with millisecond precision.
//! - List order is `pinned DESC, updated_date DESC, id ASC`.

use crate::model::category::CategoryId;
use crate::model::note::{Note, NoteColor, NoteFields, NoteId, NoteType};
use crate::repo::sqlite_store::SqliteStore;
use crate::repo::{bool_to_int, parse_flag, EntityRef, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    note_type,
    category_id,
    color,
    pinned,
    reminder,
    done,
    created_date,
    updated_date
FROM notes";

/// Filter and pagination options for listing notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    pub category_id: Option<CategoryId>,
    pub pinned: Option<bool>,
    pub done: Option<bool>,
    /// `None` returns every matching row.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for note persistence.
pub trait NoteRepository {
    /// Inserts a note and returns it with id and timestamps assigned.
    fn insert_note(&self, fields: &NoteFields) -> RepoResult<Note>;
    /// Writes every mutable field of an existing note. `fields.title` is
    /// ignored.
    fn update_note(&self, id: NoteId, fields: &NoteFields) -> RepoResult<Note>;
    /// Loads one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Loads the oldest note carrying exactly `title`.
    fn find_note_by_title(&self, title: &str) -> RepoResult<Option<Note>>;
    /// Lists notes using filter and pagination options.
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>>;
    /// Counts notes referencing one category.
    fn count_notes_in_category(&self, category_id: CategoryId) -> RepoResult<u64>;
    /// Hard-deletes one note.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

impl NoteRepository for SqliteStore<'_> {
    fn insert_note(&self, fields: &NoteFields) -> RepoResult<Note> {
        self.conn.execute(
            "INSERT INTO notes (
                title,
                content,
                note_type,
                category_id,
                color,
                pinned,
                reminder,
                done
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                fields.title.as_str(),
                fields.content.as_deref(),
                fields.note_type.as_str(),
                fields.category_id,
                fields.color.map(NoteColor::as_str),
                bool_to_int(fields.pinned),
                fields.reminder,
                bool_to_int(fields.done),
            ],
        )?;

        load_required_note(self.conn, self.conn.last_insert_rowid())
    }

    fn update_note(&self, id: NoteId, fields: &NoteFields) -> RepoResult<Note> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                content = ?2,
                note_type = ?3,
                category_id = ?4,
                color = ?5,
                pinned = ?6,
                reminder = ?7,
                done = ?8,
                updated_date = CAST(unixepoch('subsec') * 1000 AS INTEGER)
             WHERE id = ?1;",
            params![
                id,
                fields.content.as_deref(),
                fields.note_type.as_str(),
                fields.category_id,
                fields.color.map(NoteColor::as_str),
                bool_to_int(fields.pinned),
                fields.reminder,
                bool_to_int(fields.done),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::NoteId(id)));
        }

        load_required_note(self.conn, id)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn find_note_by_title(&self, title: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} WHERE title = ?1 ORDER BY id ASC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([title])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        let mut sql = format!("{NOTE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category_id) = query.category_id {
            sql.push_str(" AND category_id = ?");
            bind_values.push(Value::Integer(category_id));
        }

        if let Some(pinned) = query.pinned {
            sql.push_str(" AND pinned = ?");
            bind_values.push(Value::Integer(bool_to_int(pinned)));
        }

        if let Some(done) = query.done {
            sql.push_str(" AND done = ?");
            bind_values.push(Value::Integer(bool_to_int(done)));
        }

        sql.push_str(" ORDER BY pinned DESC, updated_date DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn count_notes_in_category(&self, category_id: CategoryId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE category_id = ?1;",
            [category_id],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{count}`")))
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::NoteId(id)));
        }

        Ok(())
    }
}

fn load_required_note(conn: &Connection, id: NoteId) -> RepoResult<Note> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => parse_note_row(row),
        None => Err(RepoError::NotFound(EntityRef::NoteId(id))),
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let type_text: String = row.get("note_type")?;
    let note_type = parse_note_type(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid note type `{type_text}` in notes.note_type"))
    })?;

    let color = match row.get::<_, Option<String>>("color")? {
        Some(value) => Some(parse_note_color(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid color `{value}` in notes.color"))
        })?),
        None => None,
    };

    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        note_type,
        category_id: row.get("category_id")?,
        color,
        pinned: parse_flag(row.get("pinned")?, "notes.pinned")?,
        reminder: row.get("reminder")?,
        done: parse_flag(row.get("done")?, "notes.done")?,
        created_date: row.get("created_date")?,
        updated_date: row.get("updated_date")?,
    })
}

// Stored spellings are exact; the lenient parsers in `model` are for input.
fn parse_note_type(value: &str) -> Option<NoteType> {
    match value {
        "Note" => Some(NoteType::Note),
        "List" => Some(NoteType::List),
        _ => None,
    }
}

fn parse_note_color(value: &str) -> Option<NoteColor> {
    match value {
        "Gray" => Some(NoteColor::Gray),
        "Red" => Some(NoteColor::Red),
        "Orange" => Some(NoteColor::Orange),
        "Yellow" => Some(NoteColor::Yellow),
        _ => None,
    }
}

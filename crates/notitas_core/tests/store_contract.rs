use notitas_core::db::migrations::latest_version;
use notitas_core::db::open_db_in_memory;
use notitas_core::model::note::NoteFields;
use notitas_core::{
    CategoryRepository, EntityRef, NoteListQuery, NoteRepository, NoteType, RepoError,
    SqliteStore, Transactional,
};
use rusqlite::Connection;
use std::thread;
use std::time::Duration;

fn fields(title: &str, category_id: i64) -> NoteFields {
    NoteFields {
        title: title.to_string(),
        content: None,
        note_type: NoteType::Note,
        category_id,
        color: None,
        pinned: false,
        reminder: None,
        done: false,
    }
}

#[test]
fn insert_category_assigns_sequential_ids() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let general = store.insert_category("General", None).unwrap();
    let work = store.insert_category("Work", Some("job stuff")).unwrap();

    assert_eq!(general.id, 1);
    assert_eq!(work.id, 2);
    assert_eq!(
        store.find_category_by_name("Work").unwrap(),
        Some(work.clone())
    );
    assert_eq!(store.get_category(2).unwrap(), Some(work));
    assert_eq!(store.list_categories().unwrap().len(), 2);
}

#[test]
fn duplicate_category_name_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    store.insert_category("Work", None).unwrap();
    let err = store.insert_category("Work", None).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Conflict(EntityRef::CategoryName(ref name)) if name == "Work"
    ));
}

#[test]
fn missing_rows_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    assert!(matches!(
        store.update_category_description(5, Some("x")),
        Err(RepoError::NotFound(EntityRef::CategoryId(5)))
    ));
    assert!(matches!(
        store.delete_category(5),
        Err(RepoError::NotFound(EntityRef::CategoryId(5)))
    ));
    assert!(matches!(
        store.update_note(8, &fields("x", 1)),
        Err(RepoError::NotFound(EntityRef::NoteId(8)))
    ));
    assert!(matches!(
        store.delete_note(8),
        Err(RepoError::NotFound(EntityRef::NoteId(8)))
    ));
    assert!(store.get_note(8).unwrap().is_none());
}

#[test]
fn update_note_never_rewrites_title_or_created_date() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let category = store.insert_category("General", None).unwrap();

    let created = store.insert_note(&fields("original", category.id)).unwrap();
    assert_eq!(created.created_date, created.updated_date);
    thread::sleep(Duration::from_millis(5));
    let mut changed = fields("renamed", category.id);
    changed.done = true;
    let updated = store.update_note(created.id, &changed).unwrap();

    assert_eq!(updated.title, "original");
    assert!(updated.done);
    assert_eq!(updated.created_date, created.created_date);
    assert!(updated.updated_date > created.updated_date);
}

#[test]
fn find_note_by_title_returns_oldest_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let category = store.insert_category("General", None).unwrap();

    let first = store.insert_note(&fields("same", category.id)).unwrap();
    store.insert_note(&fields("same", category.id)).unwrap();

    let found = store.find_note_by_title("same").unwrap().unwrap();
    assert_eq!(found.id, first.id);
}

#[test]
fn deleting_category_cascades_to_notes() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let keep = store.insert_category("Keep", None).unwrap();
    let drop_me = store.insert_category("Drop", None).unwrap();

    let kept = store.insert_note(&fields("kept", keep.id)).unwrap();
    store.insert_note(&fields("gone a", drop_me.id)).unwrap();
    store.insert_note(&fields("gone b", drop_me.id)).unwrap();
    assert_eq!(store.count_notes_in_category(drop_me.id).unwrap(), 2);

    store.delete_category(drop_me.id).unwrap();

    let remaining = store.list_notes(&NoteListQuery::default()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);
    assert_eq!(store.count_notes_in_category(drop_me.id).unwrap(), 0);
}

#[test]
fn list_notes_filters_and_orders_pinned_first() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let general = store.insert_category("General", None).unwrap();
    let work = store.insert_category("Work", None).unwrap();

    let plain = store.insert_note(&fields("plain", general.id)).unwrap();
    let mut pinned_fields = fields("pinned", general.id);
    pinned_fields.pinned = true;
    let pinned = store.insert_note(&pinned_fields).unwrap();
    let work_note = store.insert_note(&fields("work", work.id)).unwrap();

    conn.execute("UPDATE notes SET updated_date = 1000;", [])
        .unwrap();

    let all = store.list_notes(&NoteListQuery::default()).unwrap();
    let ids: Vec<_> = all.iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![pinned.id, plain.id, work_note.id]);

    let in_work = store
        .list_notes(&NoteListQuery {
            category_id: Some(work.id),
            ..NoteListQuery::default()
        })
        .unwrap();
    assert_eq!(in_work.len(), 1);
    assert_eq!(in_work[0].id, work_note.id);

    let page = store
        .list_notes(&NoteListQuery {
            limit: Some(1),
            offset: 1,
            ..NoteListQuery::default()
        })
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, plain.id);

    let offset_only = store
        .list_notes(&NoteListQuery {
            offset: 2,
            ..NoteListQuery::default()
        })
        .unwrap();
    assert_eq!(offset_only.len(), 1);
    assert_eq!(offset_only[0].id, work_note.id);
}

#[test]
fn atomically_rolls_back_on_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let result: Result<(), RepoError> = store.atomically(|store| {
        store.insert_category("Temp", None)?;
        Err(RepoError::InvalidData("abort".to_string()))
    });
    assert!(result.is_err());
    assert!(store.find_category_by_name("Temp").unwrap().is_none());

    let committed: Result<i64, RepoError> =
        store.atomically(|store| Ok(store.insert_category("Kept", None)?.id));
    let id = committed.unwrap();
    assert!(store.get_category(id).unwrap().is_some());
}

#[test]
fn corrupt_rows_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let category = store.insert_category("General", None).unwrap();
    let note = store.insert_note(&fields("fine", category.id)).unwrap();

    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         UPDATE notes SET pinned = 7;
         PRAGMA ignore_check_constraints = OFF;",
    )
    .unwrap();

    assert!(matches!(
        store.get_note(note.id),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteStore::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteStore::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "categories",
            column: "description"
        })
    ));
}

#[test]
fn store_rejects_connection_missing_notes_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteStore::try_new(&conn),
        Err(RepoError::MissingRequiredTable("notes"))
    ));
}

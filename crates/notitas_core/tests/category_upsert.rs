use notitas_core::db::open_db_in_memory;
use notitas_core::{
    CategoryInput, CategoryLookup, CategoryService, DefaultCategoryConfig, EntityRef, NoteInput,
    NoteLookup, NoteService, ServiceError, SqliteStore, ValidationError,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn category_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn ensure_default_category_is_idempotent() {
    let conn = setup();
    let service = CategoryService::new(SqliteStore::try_new(&conn).unwrap());

    let first = service
        .ensure_default_category(&DefaultCategoryConfig::default())
        .unwrap();
    let second = service
        .ensure_default_category(&DefaultCategoryConfig::default())
        .unwrap();

    assert_eq!(first.id(), 1);
    assert_eq!(first.name(), "General");
    assert_eq!(first, second);
    assert_eq!(category_count(&conn), 1);
}

#[test]
fn ensure_default_category_keeps_existing_description() {
    let conn = setup();
    let service = CategoryService::new(SqliteStore::try_new(&conn).unwrap());
    service
        .upsert_category(&CategoryInput::new("General").with_description("mine"))
        .unwrap();

    let default = service
        .ensure_default_category(&DefaultCategoryConfig {
            name: "General".to_string(),
            description: Some("bootstrap".to_string()),
        })
        .unwrap();

    assert_eq!(default.category().description.as_deref(), Some("mine"));
}

#[test]
fn upsert_scenario_creates_then_updates_same_record() {
    let conn = setup();
    let service = CategoryService::new(SqliteStore::try_new(&conn).unwrap());
    service
        .ensure_default_category(&DefaultCategoryConfig::default())
        .unwrap();

    let created = service
        .upsert_category(&CategoryInput::new("Work").with_description("job stuff"))
        .unwrap();
    assert_eq!(created.id, 2);
    assert_eq!(created.name, "Work");
    assert_eq!(created.description.as_deref(), Some("job stuff"));

    let updated = service
        .upsert_category(&CategoryInput::new("Work").with_description("updated"))
        .unwrap();
    assert_eq!(updated.id, 2);
    assert_eq!(updated.description.as_deref(), Some("updated"));
    assert_eq!(category_count(&conn), 2);
}

#[test]
fn repeated_identical_upsert_keeps_one_record() {
    let conn = setup();
    let service = CategoryService::new(SqliteStore::try_new(&conn).unwrap());

    let first = service.upsert_category(&CategoryInput::new("Work")).unwrap();
    let second = service.upsert_category(&CategoryInput::new("Work")).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first, second);
    assert_eq!(category_count(&conn), 1);
}

#[test]
fn upsert_without_description_leaves_it_untouched() {
    let conn = setup();
    let service = CategoryService::new(SqliteStore::try_new(&conn).unwrap());

    service
        .upsert_category(&CategoryInput::new("Work").with_description("job stuff"))
        .unwrap();
    let merged = service.upsert_category(&CategoryInput::new("Work")).unwrap();
    assert_eq!(merged.description.as_deref(), Some("job stuff"));

    let cleared = service
        .upsert_category(&CategoryInput::new("Work").with_description("   "))
        .unwrap();
    assert_eq!(cleared.description, None);
}

#[test]
fn upsert_matches_on_normalized_name() {
    let conn = setup();
    let service = CategoryService::new(SqliteStore::try_new(&conn).unwrap());

    let created = service
        .upsert_category(&CategoryInput::new("Side  projects"))
        .unwrap();
    let matched = service
        .upsert_category(&CategoryInput::new("  Side projects ").with_description("evenings"))
        .unwrap();

    assert_eq!(created.id, matched.id);
    assert_eq!(matched.name, "Side projects");
    assert_eq!(category_count(&conn), 1);
}

#[test]
fn upsert_rejects_blank_name() {
    let conn = setup();
    let service = CategoryService::new(SqliteStore::try_new(&conn).unwrap());

    let err = service.upsert_category(&CategoryInput::new("  ")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::EmptyField("name"))
    ));
    assert_eq!(category_count(&conn), 0);
}

#[test]
fn delete_category_cascades_and_reports_removed_notes() {
    let conn = setup();
    let store = SqliteStore::try_new(&conn).unwrap();
    let categories = CategoryService::new(store);
    let default = categories
        .ensure_default_category(&DefaultCategoryConfig::default())
        .unwrap();
    let notes = NoteService::new(store, default);

    let work = categories.upsert_category(&CategoryInput::new("Work")).unwrap();
    let mut input = NoteInput::new("standup");
    input.category_name = Some("Work".to_string());
    let first = notes.create_note(&input).unwrap();
    input.title = "retro".to_string();
    let second = notes.create_note(&input).unwrap();
    let survivor = notes.create_note(&NoteInput::new("groceries")).unwrap();

    let report = categories.delete_category(work.id).unwrap();
    assert_eq!(report.category_id, work.id);
    assert_eq!(report.deleted_notes, 2);

    for id in [first.id, second.id] {
        assert!(matches!(
            notes.get_note(&NoteLookup::Id(id)),
            Err(ServiceError::NotFound(EntityRef::NoteId(missing))) if missing == id
        ));
    }
    assert!(notes.get_note(&NoteLookup::Id(survivor.id)).is_ok());
    assert!(matches!(
        categories.get_category(&CategoryLookup::Id(work.id)),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn delete_unknown_category_is_not_found() {
    let conn = setup();
    let service = CategoryService::new(SqliteStore::try_new(&conn).unwrap());

    let err = service.delete_category(77).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound(EntityRef::CategoryId(77))
    ));
}

#[test]
fn get_category_by_id_or_name() {
    let conn = setup();
    let service = CategoryService::new(SqliteStore::try_new(&conn).unwrap());
    let work = service
        .upsert_category(&CategoryInput::new("Work").with_description("job stuff"))
        .unwrap();

    let by_id = service.get_category(&CategoryLookup::Id(work.id)).unwrap();
    let by_name = service
        .get_category(&CategoryLookup::Name(" Work ".to_string()))
        .unwrap();
    assert_eq!(by_id, work);
    assert_eq!(by_name, work);

    assert!(matches!(
        service.get_category(&CategoryLookup::Name("Home".to_string())),
        Err(ServiceError::NotFound(EntityRef::CategoryName(ref name))) if name == "Home"
    ));
    assert_eq!(service.list_categories().unwrap(), vec![work]);
}

#[test]
fn category_input_deserializes_without_description() {
    let input: CategoryInput = serde_json::from_str(r#"{"name":"Work"}"#).unwrap();
    assert_eq!(input, CategoryInput::new("Work"));
}

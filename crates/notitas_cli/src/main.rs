//! CLI smoke entry point.
//!
//! # Responsibility
//! - Bootstrap core from `NOTITAS_*` environment settings.
//! - Ensure the default category exists and report store state.
//!
//! Output stays deterministic for quick local sanity checks.

use notitas_core::db::migrations::{current_version, latest_version};
use notitas_core::db::{open_db, open_db_in_memory};
use notitas_core::{
    core_version, init_logging, CategoryService, CoreConfig, DatabaseLocation, NoteListQuery,
    NoteService, SqliteStore,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("notitas: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    if let Some(log_config) = config.logging.as_ref() {
        init_logging(log_config)?;
    }

    let conn = match &config.database {
        DatabaseLocation::InMemory => open_db_in_memory()?,
        DatabaseLocation::File(path) => open_db(path)?,
    };
    let store = SqliteStore::try_new(&conn)?;

    let categories = CategoryService::new(store);
    let default_category = categories.ensure_default_category(&config.default_category)?;
    let notes = NoteService::new(store, default_category);

    println!("notitas_core version={}", core_version());
    println!(
        "schema version={} latest={}",
        current_version(&conn)?,
        latest_version()
    );
    println!(
        "default category id={} name={}",
        notes.default_category().id(),
        notes.default_category().name()
    );
    println!("categories={}", categories.list_categories()?.len());
    println!("notes={}", notes.list_notes(&NoteListQuery::default())?.len());

    Ok(())
}

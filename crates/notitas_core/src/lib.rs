//! Core domain logic for Notitas.
//! This crate is the single source of truth for category/note invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, DatabaseLocation, DefaultCategoryConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LogLevel, LoggingError};
pub use model::category::{Category, CategoryDeletion, CategoryId, CategoryInput};
pub use model::note::{Note, NoteColor, NoteId, NoteInput, NotePatch, NoteType};
pub use model::validation::ValidationError;
pub use repo::category_repo::CategoryRepository;
pub use repo::note_repo::{NoteListQuery, NoteRepository};
pub use repo::sqlite_store::SqliteStore;
pub use repo::{EntityRef, EntityStore, RepoError, RepoResult, Transactional};
pub use service::category_service::{CategoryLookup, CategoryService, DefaultCategory};
pub use service::error::ServiceError;
pub use service::note_service::{NoteLookup, NoteService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

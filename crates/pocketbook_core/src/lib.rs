//! Core record model and query engine for the pocketbook assistant.
//! This crate is the single source of truth for contact and note invariants.

pub mod db;
pub mod directory;
pub mod logging;
pub mod model;
pub mod repo;

pub use directory::contacts::{ContactDirectory, UpcomingBirthday, DEFAULT_BIRTHDAY_WINDOW_DAYS};
pub use directory::notes::NoteDirectory;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::Contact;
pub use model::field::{
    Address, Birthday, Email, Field, FieldKind, Name, Phone, Tag, ValidationError,
};
pub use model::note::Note;
pub use repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Persistence of the address book and notebook between sessions.
//!
//! # Responsibility
//! - Define the load/save contract consumed by the command layer.
//! - Isolate SQLite query details from the in-memory model.
//!
//! # Invariants
//! - `save` replaces the whole stored snapshot atomically.
//! - `load` re-validates every stored field and rejects invalid rows instead
//!   of masking them.
//! - A database with no prior state loads as two empty directories.

use crate::db::DbError;
use crate::directory::contacts::ContactDirectory;
use crate::directory::notes::NoteDirectory;
use crate::model::field::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book_repo;
mod contact_repo;
mod note_repo;

pub use book_repo::SqliteBookRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Stored value no longer passes field validation.
    Validation(ValidationError),
    Db(DbError),
    /// Stored row cannot be decoded (bad timestamp, orphan row, ...).
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid stored field: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "database is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
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

/// Load/save contract for the two record collections.
pub trait BookRepository {
    /// Reads the stored snapshot. Empty storage yields empty directories.
    fn load(&self) -> RepoResult<(ContactDirectory, NoteDirectory)>;
    /// Replaces the stored snapshot with the given directories.
    fn save(&mut self, contacts: &ContactDirectory, notes: &NoteDirectory) -> RepoResult<()>;
}

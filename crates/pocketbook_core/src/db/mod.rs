//! SQLite storage for the persisted address book and notebook.
//!
//! # Invariants
//! - Every connection handed out has foreign keys enabled and the book
//!   schema stamped in `PRAGMA user_version`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Parent directory of the database file could not be created.
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File was stamped by a build with a newer schema.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::CreateDir { path, source } => {
                write!(f, "cannot create `{}`: {source}", path.display())
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "database schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::CreateDir { source, .. } => Some(source),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

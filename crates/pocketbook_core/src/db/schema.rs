//! Book schema and its version stamp.
//!
//! There is exactly one schema version. A fresh database (`user_version = 0`)
//! gets `schema.sql` applied and stamped; a stamped database is left alone.

use super::{DbError, DbResult};
use rusqlite::{Connection, TransactionBehavior};

/// Value written to `PRAGMA user_version` once the schema is in place.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the book tables on a fresh database.
///
/// # Errors
/// - `DbError::SchemaTooNew` when the file was written by a newer build.
/// - `DbError::Sqlite` when the script fails; nothing is stamped then.
pub(super) fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    if found == SCHEMA_VERSION {
        return Ok(());
    }
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

/// Reads `PRAGMA user_version`.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

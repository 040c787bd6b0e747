//! Connection bootstrap.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a 5 s busy timeout.
//! - Returned connections are stamped with `schema::SCHEMA_VERSION`.

use super::schema::{ensure_schema, SCHEMA_VERSION};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) the database file at `path`.
///
/// Missing parent directories are created first.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    prepare("file", Connection::open(path))
}

/// Opens a private in-memory database; used by tests and dry runs.
pub fn open_db_in_memory() -> DbResult<Connection> {
    prepare("memory", Connection::open_in_memory())
}

fn prepare(mode: &'static str, opened: rusqlite::Result<Connection>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = opened.map_err(DbError::from).and_then(|mut conn| {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        ensure_schema(&mut conn)?;
        Ok(conn)
    });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} schema_version={SCHEMA_VERSION} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}

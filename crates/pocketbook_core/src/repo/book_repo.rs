//! SQLite-backed snapshot repository.
//!
//! # Responsibility
//! - Implement `BookRepository` on top of a migrated connection.
//! - Verify the connection carries the expected tables before use.
//!
//! # Invariants
//! - `save` runs in one `IMMEDIATE` transaction; a failure leaves the previous
//!   snapshot intact.
//! - Log events carry counts and durations only, never record content.

use super::contact_repo::{insert_contacts, load_contacts};
use super::note_repo::{insert_notes, load_notes};
use super::{BookRepository, RepoError, RepoResult};
use crate::directory::contacts::ContactDirectory;
use crate::directory::notes::NoteDirectory;
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};
use std::time::Instant;

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("contacts", &["name", "email", "address", "birthday"]),
    ("contact_phones", &["contact_name", "position", "phone"]),
    ("notes", &["title", "content", "created_at", "modified_at"]),
    ("note_tags", &["note_title", "position", "tag"]),
];

/// Snapshot repository over a borrowed SQLite connection.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema was
    ///   not applied (for example a raw `Connection::open`).
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn load(&self) -> RepoResult<(ContactDirectory, NoteDirectory)> {
        let started_at = Instant::now();
        let result = load_contacts(self.conn)
            .and_then(|contacts| Ok((contacts, load_notes(self.conn)?)));

        match &result {
            Ok((contacts, notes)) => info!(
                "event=book_load module=repo status=ok contacts={} notes={} duration_ms={}",
                contacts.len(),
                notes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=book_load module=repo status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn save(&mut self, contacts: &ContactDirectory, notes: &NoteDirectory) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = replace_snapshot(self.conn, contacts, notes);

        match &result {
            Ok(()) => info!(
                "event=book_save module=repo status=ok contacts={} notes={} duration_ms={}",
                contacts.len(),
                notes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=book_save module=repo status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }
}

fn replace_snapshot(
    conn: &mut Connection,
    contacts: &ContactDirectory,
    notes: &NoteDirectory,
) -> RepoResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute_batch(
        "DELETE FROM contact_phones;
         DELETE FROM contacts;
         DELETE FROM note_tags;
         DELETE FROM notes;",
    )?;
    insert_contacts(&tx, contacts)?;
    insert_notes(&tx, notes)?;
    tx.commit()?;
    Ok(())
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

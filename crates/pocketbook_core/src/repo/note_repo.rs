//! Note table mapping.
//!
//! Timestamps are stored as RFC 3339 text with nanosecond precision so a
//! save/load cycle reproduces them exactly.

use crate::directory::notes::NoteDirectory;
use crate::model::field::{Field, Tag};
use crate::model::note::Note;
use crate::repo::{RepoError, RepoResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

pub(super) fn load_notes(conn: &Connection) -> RepoResult<NoteDirectory> {
    let mut stmt = conn.prepare(
        "SELECT title, content, created_at, modified_at
         FROM notes
         ORDER BY title ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut directory = NoteDirectory::new();
    while let Some(row) = rows.next()? {
        let title: String = row.get("title")?;
        let created_at = parse_timestamp(&row.get::<_, String>("created_at")?, "created_at")?;
        let modified_at = parse_timestamp(&row.get::<_, String>("modified_at")?, "modified_at")?;
        let tags = load_tags(conn, &title)?;
        let note = Note::from_parts(
            title,
            row.get::<_, String>("content")?,
            tags,
            created_at,
            modified_at,
        )?;
        directory.add(note);
    }
    Ok(directory)
}

/// Writes every note. Caller owns the surrounding transaction and has
/// already cleared the tables.
pub(super) fn insert_notes(conn: &Connection, notes: &NoteDirectory) -> RepoResult<()> {
    let mut insert_note = conn.prepare_cached(
        "INSERT INTO notes (title, content, created_at, modified_at)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    let mut insert_tag = conn.prepare_cached(
        "INSERT INTO note_tags (note_title, position, tag)
         VALUES (?1, ?2, ?3);",
    )?;

    for note in notes.iter() {
        insert_note.execute(params![
            note.title(),
            note.content(),
            format_timestamp(note.created_at()),
            format_timestamp(note.modified_at()),
        ])?;
        for (position, tag) in note.tags().iter().enumerate() {
            insert_tag.execute(params![note.title(), position as i64, tag.as_str()])?;
        }
    }
    Ok(())
}

fn load_tags(conn: &Connection, note_title: &str) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare_cached(
        "SELECT tag
         FROM note_tags
         WHERE note_title = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([note_title])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(Tag::parse(&value)?);
    }
    Ok(tags)
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(value: &str, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| RepoError::InvalidData(format!("invalid timestamp `{value}` in notes.{column}")))
}

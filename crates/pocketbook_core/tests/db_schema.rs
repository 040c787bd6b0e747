use pocketbook_core::db::schema::{stored_version, SCHEMA_VERSION};
use pocketbook_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);
    for table in ["contacts", "contact_phones", "notes", "note_tags"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pocketbook.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(stored_version(&conn_first).unwrap(), SCHEMA_VERSION);
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(stored_version(&conn_second).unwrap(), SCHEMA_VERSION);
    assert_table_exists(&conn_second, "contacts");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn database_path_under_a_file_reports_create_dir() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    match open_db(blocker.join("nested").join("pocketbook.db")).unwrap_err() {
        DbError::CreateDir { path, .. } => assert_eq!(path, blocker.join("nested")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn deleting_contact_cascades_to_phones() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO contacts (name) VALUES ('A');
         INSERT INTO contact_phones (contact_name, position, phone) VALUES ('A', 0, '1234567890');
         DELETE FROM contacts WHERE name = 'A';",
    )
    .unwrap();

    let phones: i64 = conn
        .query_row("SELECT COUNT(*) FROM contact_phones;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(phones, 0);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

use advent_core::config::DatabaseConfig;
use advent_core::db::migrations::latest_version;
use advent_core::db::{open_db, open_db_in_memory, open_store, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "memories");
    assert_table_exists(&conn, "memory_blocks");
    assert_table_exists(&conn, "preferences");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("advent.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "memories");
}

#[test]
fn open_store_uses_configured_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.db");
    let config = DatabaseConfig::sqlite(path.to_str().unwrap());

    let conn = open_store(&config).unwrap();
    assert_table_exists(&conn, "memory_blocks");
    drop(conn);
    assert!(path.exists());

    let in_memory = open_store(&DatabaseConfig::sqlite(":memory:")).unwrap();
    assert_table_exists(&in_memory, "memories");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn stamped_database_without_tables_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stamped.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::MissingTable { table, version } => {
            assert_eq!(table, "memories");
            assert_eq!(version, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn partially_migrated_database_gets_remaining_steps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(schema_steps_sql(1)).unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "preferences");
}

#[test]
fn deleting_memory_cascades_to_blocks() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO memories (day_number, release_date) VALUES (1, '2025-12-01');
         INSERT INTO memory_blocks (id, memory_id, block_type, content, sort_order)
         VALUES ('a', 1, 'title', 'Hello', 0);
         DELETE FROM memories WHERE day_number = 1;",
    )
    .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM memory_blocks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

fn schema_steps_sql(version: u32) -> &'static str {
    match version {
        1 => include_str!("../src/db/migrations/0001_memories.sql"),
        other => panic!("no fixture for schema version {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
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

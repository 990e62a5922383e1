use notimirror_core::db::migrations::latest_version;
use notimirror_core::db::{open_db, open_db_in_memory, DbError};
use notimirror_core::{CacheError, ExpiringStore, Notification, Notifications, SqliteCache};
use rusqlite::Connection;
use std::time::Duration;

fn sample() -> Notifications {
    let mut done = Notification::new("b");
    done.mark_pending_delete();
    Notifications::from(vec![Notification::new("a"), done])
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "cache_slots");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("notimirror.db");

    let first = open_db(&path).unwrap();
    SqliteCache::new(&first, "inbox", Duration::from_secs(60))
        .write(&sample())
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let loaded: Notifications = SqliteCache::new(&second, "inbox", Duration::from_secs(60))
        .read()
        .unwrap();
    assert_eq!(loaded, sample());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cold_start_reads_default_and_is_expired() {
    let conn = open_db_in_memory().unwrap();
    let cache = SqliteCache::new(&conn, "inbox", Duration::from_secs(60));

    let loaded: Notifications = cache.read().unwrap();

    assert!(loaded.is_empty());
    assert!(cache.expired().unwrap());
}

#[test]
fn write_then_read_roundtrip_and_overwrite() {
    let conn = open_db_in_memory().unwrap();
    let cache = SqliteCache::new(&conn, "inbox", Duration::from_secs(60));

    cache.write(&sample()).unwrap();
    assert_eq!(cache.read::<Notifications>().unwrap(), sample());
    assert!(!cache.expired().unwrap());

    let replacement = Notifications::from(vec![Notification::new("z")]);
    cache.write(&replacement).unwrap();
    assert_eq!(cache.read::<Notifications>().unwrap(), replacement);
}

#[test]
fn expiry_boundary_is_inclusive() {
    let conn = open_db_in_memory().unwrap();
    let ttl = Duration::from_secs(60);
    let cache = SqliteCache::new(&conn, "inbox", ttl);
    cache.write(&sample()).unwrap();

    let written = cache.last_write().unwrap().unwrap();

    assert!(!cache
        .expired_at(written + ttl - Duration::from_millis(1))
        .unwrap());
    assert!(cache.expired_at(written + ttl).unwrap());
}

#[test]
fn locations_on_one_connection_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let work = SqliteCache::new(&conn, "work", Duration::from_secs(60));
    let personal = SqliteCache::new(&conn, "personal", Duration::from_secs(60));

    work.write(&sample()).unwrap();

    assert!(personal.read::<Notifications>().unwrap().is_empty());
    assert!(personal.expired().unwrap());
    assert_eq!(work.read::<Notifications>().unwrap(), sample());
}

#[test]
fn malformed_payload_is_a_serialization_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO cache_slots (location, payload, written_at_ms) VALUES ('inbox', 'nope', 0);",
        [],
    )
    .unwrap();
    let cache = SqliteCache::new(&conn, "inbox", Duration::from_secs(60));

    let err = cache.read::<Notifications>().unwrap_err();

    assert!(matches!(err, CacheError::Serialization(_)), "unexpected: {err}");
    assert!(cache.expired().unwrap());
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

mod helpers;

use lifecapsule::db;
use lifecapsule::db::migrations::{get_schema_version, run_migrations, CURRENT_SCHEMA_VERSION};

#[test]
fn fresh_db_migrates_to_current_version() {
    let conn = helpers::test_db();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn migrations_are_idempotent() {
    let mut conn = helpers::test_db();
    // Running again should be a no-op
    run_migrations(&mut conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn manual_v1_db_upgrades_correctly() {
    // Simulate a v1 database that hasn't been migrated
    let mut conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();

    assert_eq!(get_schema_version(&conn).unwrap(), 1);

    run_migrations(&mut conn).unwrap();

    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    let mood_index: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_memories_mood'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(mood_index, 1);
}

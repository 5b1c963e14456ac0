mod helpers;

use lifecapsule::db;
use lifecapsule::error::Error;
use lifecapsule::memory::search::MemoryFilter;
use lifecapsule::memory::types::Mood;
use tempfile::TempDir;

#[test]
fn open_creates_new_db_at_nonexistent_path() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("new.db");

    // Should not exist yet
    assert!(!db_path.exists());

    let conn = db::open_database(&db_path).unwrap();

    // Should have been created
    assert!(db_path.exists());

    // Should be functional
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn health_check_passes_on_valid_db() {
    let conn = helpers::test_db();

    let report = db::check_database_health(&conn).unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.schema_version, db::migrations::CURRENT_SCHEMA_VERSION);
    assert_eq!(report.memory_count, 0);
    assert_eq!(report.chat_count, 0);
    assert_eq!(report.capsule_count, 0);
    assert_eq!(report.log_count, 0);
}

#[test]
fn busy_timeout_is_set() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("test.db");

    let conn = db::open_database(&db_path).unwrap();

    let timeout: i64 = conn
        .pragma_query_value(None, "busy_timeout", |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);
}

#[test]
fn wal_mode_is_enabled() {
    let tmp = TempDir::new().unwrap();
    let conn = db::open_database(tmp.path().join("wal.db")).unwrap();

    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[test]
fn journal_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("journal.db");

    {
        let mut journal = helpers::file_journal(&db_path);
        journal
            .capture_memory(
                helpers::new_memory("First day at the new job", Some(Mood::Excited), &["work"]),
                helpers::day(1),
            )
            .unwrap();
        journal
            .create_capsule("Remember how nervous you were?", helpers::day(30), helpers::day(1))
            .unwrap();
    }

    let journal = helpers::file_journal(&db_path);
    let profile = journal.profile().unwrap();
    assert_eq!(profile.xp_points, 35);
    assert_eq!(profile.streak_count, 1);
    assert_eq!(journal.memories(&MemoryFilter::default()).unwrap().len(), 1);
    assert_eq!(journal.list_capsules().unwrap().len(), 1);
}

#[test]
fn corrupt_stored_mood_surfaces_as_unavailable() {
    let mut journal = helpers::sqlite_journal();
    let id = journal
        .capture_memory(helpers::new_memory("fine", None, &[]), helpers::day(1))
        .unwrap()
        .record
        .id;

    // Bypass the CHECK constraint the way a foreign writer might.
    let conn = journal.store().connection();
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;").unwrap();
    conn.execute("UPDATE memories SET mood = 'grumpy' WHERE id = ?1", [&id])
        .unwrap();

    let err = journal.get_memory(&id).unwrap_err();
    assert!(matches!(err, Error::Unavailable(_)));
}

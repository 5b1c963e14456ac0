//! SQL DDL for all LifeCapsule tables.
//!
//! Defines the `memories`, `chat_messages`, `future_capsules`, `user_profiles`,
//! `activity_log` and `schema_meta` tables. All DDL uses `IF NOT EXISTS` for
//! idempotent initialization.

use rusqlite::Connection;

/// All schema DDL statements for LifeCapsule's core tables.
const SCHEMA_SQL: &str = r#"
-- Journal memories
CREATE TABLE IF NOT EXISTS memories (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    text TEXT NOT NULL,
    mood TEXT CHECK(mood IS NULL OR mood IN ('happy','sad','excited','calm','grateful','proud')),
    tags TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_memories_user ON memories(user_id);
CREATE INDEX IF NOT EXISTS idx_memories_created ON memories(created_at);

-- Companion chat exchanges (one row per message + reply)
CREATE TABLE IF NOT EXISTS chat_messages (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    message TEXT NOT NULL,
    response TEXT NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chat_user ON chat_messages(user_id);
CREATE INDEX IF NOT EXISTS idx_chat_timestamp ON chat_messages(timestamp);

-- Time-locked messages to the future self
CREATE TABLE IF NOT EXISTS future_capsules (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    message TEXT NOT NULL,
    unlock_date TEXT NOT NULL,
    is_unlocked INTEGER NOT NULL DEFAULT 0 CHECK(is_unlocked IN (0, 1)),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_capsules_user ON future_capsules(user_id);

-- Gamification profile, one row per user
CREATE TABLE IF NOT EXISTS user_profiles (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    subscription TEXT NOT NULL DEFAULT 'free' CHECK(subscription IN ('free','premium')),
    daily_chat_count INTEGER NOT NULL DEFAULT 0,
    last_chat_on TEXT,
    streak_count INTEGER NOT NULL DEFAULT 0,
    last_memory_on TEXT,
    xp_points INTEGER NOT NULL DEFAULT 0,
    badges TEXT NOT NULL DEFAULT '',
    version INTEGER NOT NULL DEFAULT 1,
    updated_at TEXT NOT NULL
);

-- Audit log
CREATE TABLE IF NOT EXISTS activity_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operation TEXT NOT NULL CHECK(operation IN ('create','update','unlock','delete')),
    record_kind TEXT NOT NULL,
    record_id TEXT NOT NULL,
    details TEXT,
    created_at TEXT NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        for table in [
            "memories",
            "chat_messages",
            "future_capsules",
            "user_profiles",
            "activity_log",
            "schema_meta",
        ] {
            assert!(tables.contains(&table.to_string()), "missing table {table}");
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap(); // second call should not error
    }

    #[test]
    fn mood_check_rejects_unknown_values() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO memories (id, user_id, title, text, mood, created_at) \
             VALUES ('m1', '1', 't', 't', 'angry', '2026-01-01')",
            [],
        );
        assert!(result.is_err());
    }
}

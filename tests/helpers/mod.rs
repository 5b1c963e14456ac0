#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use lifecapsule::config::LifeCapsuleConfig;
use lifecapsule::db;
use lifecapsule::journal::Journal;
use lifecapsule::memory::types::{Mood, NewMemory};
use lifecapsule::store::{InMemoryStore, SqliteStore};
use rusqlite::Connection;
use std::path::Path;

pub const USER: &str = "1";

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// Journal over an in-memory SQLite database with default rules.
pub fn sqlite_journal() -> Journal<SqliteStore> {
    Journal::new(SqliteStore::new(test_db(), USER), &LifeCapsuleConfig::default())
}

/// Journal over a database file, e.g. inside a `TempDir`.
pub fn file_journal(path: &Path) -> Journal<SqliteStore> {
    Journal::new(
        SqliteStore::open(path, USER).unwrap(),
        &LifeCapsuleConfig::default(),
    )
}

pub fn memory_journal() -> Journal<InMemoryStore> {
    Journal::new(InMemoryStore::new(USER), &LifeCapsuleConfig::default())
}

/// A date in June 2026.
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
}

pub fn at(d: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, d, hour, 0, 0).unwrap()
}

pub fn new_memory(text: &str, mood: Option<Mood>, tags: &[&str]) -> NewMemory {
    NewMemory {
        text: text.to_string(),
        mood,
        tags: tags.iter().collect(),
        timestamp: Utc::now(),
    }
}

/// Like [`new_memory`], stamped at noon on `day(d)`.
pub fn memory_on(d: u32, text: &str, mood: Option<Mood>, tags: &[&str]) -> NewMemory {
    NewMemory {
        timestamp: at(d, 12),
        ..new_memory(text, mood, tags)
    }
}

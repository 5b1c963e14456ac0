pub mod capsules;
pub mod chat;
pub mod doctor;
pub mod export;
pub mod memories;
pub mod profile;
pub mod reset;
pub mod stats;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};

use lifecapsule::config::LifeCapsuleConfig;
use lifecapsule::journal::Journal;
use lifecapsule::store::SqliteStore;

/// Open the configured database as a journal.
pub fn open_journal(config: &LifeCapsuleConfig) -> Result<Journal<SqliteStore>> {
    let db_path = config.resolved_db_path();
    let store = SqliteStore::open(&db_path, config.storage.user_id.clone())
        .with_context(|| format!("failed to open journal at {}", db_path.display()))?;
    Ok(Journal::new(store, config))
}

/// Calendar day used for streaks, chat limits and capsule dates.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// First `max` characters of `text`, with an ellipsis when cut.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Print the badges an operation unlocked, if any.
pub fn announce_badges(badges: &[String]) {
    for badge in badges {
        println!("Badge unlocked: {badge}");
    }
}

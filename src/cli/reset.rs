//! CLI `reset` command: delete the whole journal after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use lifecapsule::config::LifeCapsuleConfig;

/// Delete all records and the profile after user confirmation.
pub fn reset(config: &LifeCapsuleConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("WARNING: This will permanently delete ALL memories, chats, capsules, progress and audit logs.");
    println!("Database: {}", db_path.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let conn = lifecapsule::db::open_database(&db_path)?;
    conn.execute_batch(
        "BEGIN;
         DELETE FROM memories;
         DELETE FROM chat_messages;
         DELETE FROM future_capsules;
         DELETE FROM user_profiles;
         DELETE FROM activity_log;
         COMMIT;",
    )?;

    println!("Journal deleted. Database reset complete.");
    Ok(())
}

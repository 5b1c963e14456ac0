//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use lifecapsule::config::LifeCapsuleConfig;
use lifecapsule::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &LifeCapsuleConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `lifecapsule serve` or `lifecapsule memory add` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path)
        .map(|m| m.len())
        .unwrap_or(0);

    let conn = db::open_database(&db_path)
        .context("failed to open database (may be corrupt)")?;

    let report = db::check_database_health(&conn)
        .context("failed to run health check")?;

    println!("LifeCapsule Health Report");
    println!("=========================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!(
        "Schema version:    {} (expected {})",
        report.schema_version,
        db::migrations::CURRENT_SCHEMA_VERSION
    );
    println!("User:              {}", config.storage.user_id);
    println!();
    println!("Row counts:");
    println!("  Memories:        {}", report.memory_count);
    println!("  Chat exchanges:  {}", report.chat_count);
    println!("  Capsules:        {}", report.capsule_count);
    println!("  Profiles:        {}", report.profile_count);
    println!("  Audit log:       {}", report.log_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup: cp backup.db {}", db_path.display());
        println!("  2. Or save what is readable and start over:");
        println!("     lifecapsule export > backup.json");
        println!("     lifecapsule reset");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

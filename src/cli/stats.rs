use anyhow::Result;

use lifecapsule::config::LifeCapsuleConfig;

use super::{open_journal, today};

/// Display journal statistics in the terminal.
pub fn stats(config: &LifeCapsuleConfig) -> Result<()> {
    let journal = open_journal(config)?;
    let response = journal.stats(today())?;

    println!("Journal Statistics");
    println!("{}", "=".repeat(40));
    println!("  Memories:            {}", response.total_memories);
    println!("  Chat exchanges:      {}", response.chat_exchanges);
    println!(
        "  Level:               {} ({})",
        response.level, response.level_title
    );
    println!(
        "  XP:                  {} ({} to next level)",
        response.xp_points, response.xp_progress.to_next_level
    );
    println!("  Streak:              {}", response.streak_count);
    println!();

    println!("By Mood:");
    for (mood, count) in &response.by_mood {
        println!("  {:<12} {}", mood, count);
    }
    println!();

    println!("Capsules:");
    println!("  {:<12} {}", "locked", response.capsules_locked);
    println!("  {:<12} {}", "ready", response.capsules_ready);
    println!("  {:<12} {}", "unlocked", response.capsules_unlocked);
    println!();

    if response.badges.is_empty() {
        println!("Badges:                none yet");
    } else {
        println!("Badges:                {}", response.badges.join(", "));
    }

    if let Some(ref oldest) = response.oldest_memory {
        println!("Oldest memory:         {oldest}");
    }
    if let Some(ref newest) = response.newest_memory {
        println!("Newest memory:         {newest}");
    }

    Ok(())
}

//! CLI `memory` commands: add, list, show, delete, tags.

use anyhow::Result;
use chrono::Utc;

use lifecapsule::config::LifeCapsuleConfig;
use lifecapsule::memory::search::MemoryFilter;
use lifecapsule::memory::types::{Memory, Mood, NewMemory};

use super::{announce_badges, open_journal, preview, today};

pub fn add(config: &LifeCapsuleConfig, text: &str, mood: Option<Mood>, tags: &[String]) -> Result<()> {
    let mut journal = open_journal(config)?;
    let outcome = journal.capture_memory(
        NewMemory {
            text: text.to_string(),
            mood,
            tags: tags.iter().collect(),
            timestamp: Utc::now(),
        },
        today(),
    )?;

    println!("Memory saved: {}", outcome.record.id);
    println!(
        "+{} XP (total {}), streak {}",
        journal.engine().rules().memory_xp,
        outcome.profile.xp_points,
        outcome.profile.streak_count
    );
    if outcome.leveled_up {
        println!("Level up! You are now level {}.", outcome.profile.current_level());
    }
    announce_badges(&outcome.new_badges);
    Ok(())
}

pub fn list(config: &LifeCapsuleConfig, filter: &MemoryFilter, limit: usize) -> Result<()> {
    let journal = open_journal(config)?;
    let memories = journal.memories(filter)?;

    if memories.is_empty() {
        println!("No memories found.");
        return Ok(());
    }

    println!("Found {} memor{}\n", memories.len(), if memories.len() == 1 { "y" } else { "ies" });
    for (i, memory) in memories.iter().take(limit).enumerate() {
        print_summary(i + 1, memory);
    }
    if memories.len() > limit {
        println!("  ... and {} more", memories.len() - limit);
    }
    Ok(())
}

pub fn show(config: &LifeCapsuleConfig, id: &str) -> Result<()> {
    let journal = open_journal(config)?;
    let memory = journal.get_memory(id)?;

    println!("Memory: {}", memory.id);
    println!("{}", "=".repeat(60));
    println!("Title:      {}", memory.title);
    println!("Captured:   {}", memory.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(mood) = memory.mood {
        println!("Mood:       {mood}");
    }
    if !memory.tags.is_empty() {
        println!("Tags:       {}", memory.tags.iter().collect::<Vec<_>>().join(", "));
    }
    println!();
    println!("{}", memory.text);
    Ok(())
}

pub fn delete(config: &LifeCapsuleConfig, id: &str) -> Result<()> {
    let mut journal = open_journal(config)?;
    journal.delete_memory(id)?;
    println!("Memory {id} deleted.");
    Ok(())
}

pub fn tags(config: &LifeCapsuleConfig) -> Result<()> {
    let journal = open_journal(config)?;
    let tags = journal.tags()?;
    if tags.is_empty() {
        println!("No tags yet.");
    } else {
        println!("{}", tags.join(", "));
    }
    Ok(())
}

fn print_summary(n: usize, memory: &Memory) {
    let mood = memory.mood.map(|m| format!(" [{m}]")).unwrap_or_default();
    println!(
        "  {}. {}{} ({})",
        n,
        memory.created_at.format("%Y-%m-%d"),
        mood,
        memory.id
    );
    println!("     {}", preview(&memory.text, 120));
    if !memory.tags.is_empty() {
        println!("     #{}", memory.tags.iter().collect::<Vec<_>>().join(" #"));
    }
    println!();
}

//! CLI `capsule` commands.

use anyhow::Result;
use chrono::NaiveDate;

use lifecapsule::config::LifeCapsuleConfig;
use lifecapsule::memory::types::CapsuleStatus;

use super::{announce_badges, open_journal, preview, today};

pub fn create(config: &LifeCapsuleConfig, message: &str, unlock_date: NaiveDate) -> Result<()> {
    let mut journal = open_journal(config)?;
    let outcome = journal.create_capsule(message, unlock_date, today())?;
    println!(
        "Capsule {} sealed until {}. +{} XP",
        outcome.record.id,
        outcome.record.unlock_date,
        config.gamification.capsule_xp
    );
    announce_badges(&outcome.new_badges);
    Ok(())
}

pub fn edit(
    config: &LifeCapsuleConfig,
    id: &str,
    message: Option<&str>,
    unlock_date: Option<NaiveDate>,
) -> Result<()> {
    let mut journal = open_journal(config)?;
    let capsule = journal.update_capsule(id, message, unlock_date, today())?;
    println!("Capsule {} now unlocks on {}.", capsule.id, capsule.unlock_date);
    Ok(())
}

pub fn list(config: &LifeCapsuleConfig) -> Result<()> {
    let journal = open_journal(config)?;
    let capsules = journal.list_capsules()?;
    if capsules.is_empty() {
        println!("No capsules yet. Write one to your future self!");
        return Ok(());
    }

    let today = today();
    for capsule in &capsules {
        let view = capsule.view(today);
        match view.status {
            CapsuleStatus::Unlocked => println!(
                "  {} [unlocked {}] {}",
                view.id,
                view.unlock_date,
                preview(view.message.as_deref().unwrap_or_default(), 80)
            ),
            CapsuleStatus::Ready => {
                println!("  {} [ready] a message is waiting for you", view.id)
            }
            CapsuleStatus::Locked => println!(
                "  {} [locked] opens {} (in {} day{})",
                view.id,
                view.unlock_date,
                view.days_until_unlock,
                if view.days_until_unlock == 1 { "" } else { "s" }
            ),
        }
    }
    Ok(())
}

pub fn unlock(config: &LifeCapsuleConfig, id: &str) -> Result<()> {
    let mut journal = open_journal(config)?;
    let capsule = journal.unlock_capsule(id, today())?;
    println!("Capsule unlocked! Written {}:", capsule.created_at.format("%Y-%m-%d"));
    println!();
    println!("{}", capsule.message);
    Ok(())
}

pub fn delete(config: &LifeCapsuleConfig, id: &str) -> Result<()> {
    let mut journal = open_journal(config)?;
    journal.delete_capsule(id)?;
    println!("Capsule {id} deleted.");
    Ok(())
}

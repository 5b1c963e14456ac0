//! CLI profile commands: `profile`, `xp`, `subscription`, `prompt`.

use anyhow::Result;
use chrono::Datelike;

use lifecapsule::companion::prompts::daily_prompt;
use lifecapsule::config::LifeCapsuleConfig;
use lifecapsule::gamification::{level_title, xp_progress};
use lifecapsule::memory::types::SubscriptionTier;

use super::{announce_badges, open_journal, today};

/// Show the profile, optionally renaming it first.
pub fn profile(config: &LifeCapsuleConfig, rename: Option<&str>) -> Result<()> {
    let mut journal = open_journal(config)?;
    let profile = match rename {
        Some(name) => journal.set_name(name)?,
        None => journal.profile()?,
    };
    let progress = xp_progress(profile.xp_points);

    println!("{} <{}>", profile.name, profile.email);
    println!("{}", "=".repeat(40));
    println!("  Level:          {} ({})", progress.level, level_title(progress.level));
    println!(
        "  XP:             {} ({} / 100, {} to next level)",
        profile.xp_points, progress.into_level, progress.to_next_level
    );
    println!("  Streak:         {}", profile.streak_count);
    println!("  Subscription:   {}", profile.subscription);
    match journal.chats_remaining(today())? {
        Some(left) => println!("  Chats today:    {left} left"),
        None => println!("  Chats today:    unlimited"),
    }
    if profile.badges.is_empty() {
        println!("  Badges:         none yet");
    } else {
        println!("  Badges:         {}", profile.badges.iter().collect::<Vec<_>>().join(", "));
    }
    Ok(())
}

pub fn grant_xp(config: &LifeCapsuleConfig, amount: u32) -> Result<()> {
    let mut journal = open_journal(config)?;
    let outcome = journal.grant_xp(amount)?;
    println!("+{amount} XP (total {})", outcome.profile.xp_points);
    if outcome.leveled_up {
        println!("Level up! You are now level {}.", outcome.profile.current_level());
    }
    announce_badges(&outcome.new_badges);
    Ok(())
}

pub fn subscription(config: &LifeCapsuleConfig, tier: SubscriptionTier) -> Result<()> {
    let mut journal = open_journal(config)?;
    let profile = journal.set_subscription(tier)?;
    println!("Subscription set to {}.", profile.subscription);
    Ok(())
}

/// Print today's reflection prompt.
pub fn prompt() {
    println!("{}", daily_prompt(today().weekday()));
}

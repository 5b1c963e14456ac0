//! CLI `chat` and `history` commands.

use anyhow::Result;
use chrono::Utc;

use lifecapsule::companion::prompts::welcome_message;
use lifecapsule::companion::ResponseSelector;
use lifecapsule::config::LifeCapsuleConfig;

use super::{announce_badges, open_journal, today};

/// Send one message to the companion and print its reply.
pub async fn chat(config: &LifeCapsuleConfig, message: &str, name: Option<&str>) -> Result<()> {
    let mut journal = open_journal(config)?;
    let today = today();
    journal.check_chat_allowance(today)?;

    let profile = journal.profile()?;
    let name = name.unwrap_or(&profile.name);

    let mut selector = ResponseSelector::from_config(config.companion.clone());
    let reply = selector.reply(message, Some(name)).await;

    let outcome = journal.record_chat(message, &reply.text, Utc::now())?;
    println!("{}", reply.text);
    println!();
    match journal.chats_remaining(today)? {
        Some(left) => println!("+{} XP, {left} chat(s) left today", config.gamification.chat_xp),
        None => println!("+{} XP", config.gamification.chat_xp),
    }
    announce_badges(&outcome.new_badges);
    Ok(())
}

/// Print the conversation, oldest first.
pub fn history(config: &LifeCapsuleConfig, limit: Option<usize>) -> Result<()> {
    let journal = open_journal(config)?;
    let messages = journal.chat_history()?;

    if messages.is_empty() {
        println!("{}", welcome_message(&journal.profile()?.name));
        return Ok(());
    }

    let skip = limit.map_or(0, |n| messages.len().saturating_sub(n));
    for message in &messages[skip..] {
        let who = if message.from_user { "You" } else { "Companion" };
        println!(
            "[{}] {who}: {}",
            message.timestamp.format("%Y-%m-%d %H:%M:%S"),
            message.text
        );
    }
    Ok(())
}

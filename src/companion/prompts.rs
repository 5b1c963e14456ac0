//! Daily journaling prompts and the companion's greeting.

use chrono::Weekday;

const DAILY_PROMPTS: [&str; 8] = [
    "What made you smile today? 😊",
    "What are you grateful for right now? 🙏",
    "Describe a moment that surprised you today 🌟",
    "What's something you learned today? 📚",
    "Who made your day better? ❤️",
    "What challenged you today and how did you handle it? 💪",
    "What's a small victory you had today? 🎉",
    "What made you feel proud today? 🏆",
];

/// The prompt for a given day of the week, Sunday first.
pub fn daily_prompt(weekday: Weekday) -> &'static str {
    DAILY_PROMPTS[weekday.num_days_from_sunday() as usize]
}

/// Greeting shown when a conversation has no history yet.
pub fn welcome_message(name: &str) -> String {
    format!(
        "Hey {name}! 🌟 I'm your AI companion here to listen, chat, and help you reflect on your memories. How are you feeling today?"
    )
}

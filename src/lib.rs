//! Journaling with a gamified profile and a scripted companion.
//!
//! LifeCapsule records memories tagged with a mood, keeps a canned-response
//! chat, stores time-locked messages to the user's future self, and turns all
//! of it into streaks, XP, levels and badges.
//!
//! | Event | XP | Side effects |
//! |-------|----|--------------|
//! | Memory captured | 20 | streak +1, "Week Warrior" at 7, "Month Master" at 30 |
//! | Chat sent | 5 | daily count +1, "Chat Champion" at 5 |
//! | Capsule written | 15 | "Future Thinker" |
//! | Manual grant | n | "Level Up" on the first level increase |
//!
//! Levels are always `xp / 100 + 1`. Free profiles may chat 10 times a day.
//!
//! # Architecture
//!
//! - **Engine**: [`gamification::GamificationEngine`] maps a profile snapshot and an
//!   event to a new profile. It never touches storage.
//! - **Companion**: [`companion`] classifies mood by keyword and picks a reply
//!   template with an injected random source.
//! - **Storage**: the [`store::RecordStore`] trait, backed by SQLite or memory.
//!   Records and the profile they affect are written atomically, with a
//!   version check on the profile.
//! - **Service**: [`journal::Journal`] ties store and engine together.
//! - **Transport**: MCP over stdio or Streamable HTTP, plus a CLI.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, migrations, and health checks
//! - [`error`]: Error taxonomy for stores and the journal
//! - [`gamification`]: Streak, XP, level and badge rules
//! - [`companion`]: Mood classifier, reply selector, daily prompts
//! - [`memory`]: Record types, memory search and journal statistics
//! - [`store`]: Record store trait with SQLite and in-memory implementations
//! - [`journal`]: The journal service

pub mod companion;
pub mod config;
pub mod db;
pub mod error;
pub mod gamification;
pub mod journal;
pub mod memory;
pub mod store;

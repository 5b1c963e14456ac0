//! The journal service.
//!
//! [`Journal`] composes a [`RecordStore`] with the [`GamificationEngine`]. Every
//! operation that changes the profile reads a snapshot, applies the engine and
//! writes record and profile back in one compare-and-swap step. A lost race is
//! retried from a fresh snapshot up to `storage.max_write_retries` times.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::LifeCapsuleConfig;
use crate::error::{Error, Result};
use crate::gamification::GamificationEngine;
use crate::memory::search::{all_tags, filter_memories, MemoryFilter};
use crate::memory::stats::{journal_stats, JournalStats};
use crate::memory::types::{
    ChatExchange, ChatMessage, FutureCapsule, Memory, NewCapsule, NewChat, NewMemory,
    SubscriptionTier, UserProfile,
};
use crate::store::{RecordStore, Recorded};

/// Result of an operation that awarded XP or badges.
#[derive(Debug, Clone, Serialize)]
pub struct EventOutcome<T> {
    pub record: T,
    pub profile: UserProfile,
    /// Badges granted by this operation, in grant order.
    pub new_badges: Vec<String>,
    pub leveled_up: bool,
}

pub struct Journal<S: RecordStore> {
    store: S,
    engine: GamificationEngine,
    max_write_retries: u32,
}

impl<S: RecordStore> Journal<S> {
    pub fn new(store: S, config: &LifeCapsuleConfig) -> Self {
        Self::with_engine(
            store,
            GamificationEngine::new(config.gamification.clone()),
            config.storage.max_write_retries,
        )
    }

    pub fn with_engine(store: S, engine: GamificationEngine, max_write_retries: u32) -> Self {
        Self {
            store,
            engine,
            max_write_retries,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn engine(&self) -> &GamificationEngine {
        &self.engine
    }

    /// The stored profile, or the default profile if none was saved yet.
    pub fn profile(&self) -> Result<UserProfile> {
        Ok(self
            .store
            .load_profile()?
            .unwrap_or_else(|| UserProfile::new_default(self.store.user_id())))
    }

    // ── Memories ─────────────────────────────────────────────────────────────

    pub fn capture_memory(&mut self, new: NewMemory, today: NaiveDate) -> Result<EventOutcome<Memory>> {
        if new.text.trim().is_empty() {
            return Err(Error::Invalid("memory text must not be empty".into()));
        }

        let outcome = self.write_with_retry("capture_memory", |engine, store, before| {
            let next = engine.record_memory_event(before, today);
            store.insert_memory(&new, &next)
        })?;

        info!(
            id = %outcome.record.id,
            streak = outcome.profile.streak_count,
            xp = outcome.profile.xp_points,
            "memory captured"
        );
        Ok(outcome)
    }

    /// Memories matching `filter`, newest first.
    pub fn memories(&self, filter: &MemoryFilter) -> Result<Vec<Memory>> {
        Ok(filter_memories(self.store.list_memories()?, filter))
    }

    pub fn get_memory(&self, id: &str) -> Result<Memory> {
        self.store.get_memory(id)
    }

    pub fn delete_memory(&mut self, id: &str) -> Result<()> {
        self.store.delete_memory(id)?;
        info!(id, "memory deleted");
        Ok(())
    }

    /// Distinct tags used across all memories, oldest memory first.
    pub fn tags(&self) -> Result<Vec<String>> {
        Ok(all_tags(self.store.list_memories()?.iter().rev()))
    }

    // ── Chat ─────────────────────────────────────────────────────────────────

    /// Reject up front when a free profile has no chats left today.
    pub fn check_chat_allowance(&self, today: NaiveDate) -> Result<()> {
        let profile = self.profile()?;
        self.engine.chat_allowance(&profile, today)
    }

    /// Chats left today, `None` when unlimited.
    pub fn chats_remaining(&self, today: NaiveDate) -> Result<Option<u32>> {
        let profile = self.profile()?;
        Ok(self.engine.chats_remaining(&profile, today))
    }

    /// Persist a completed exchange and apply the chat event.
    ///
    /// The allowance is checked again against the snapshot being written, so
    /// concurrent senders cannot push a free profile past its limit.
    pub fn record_chat(
        &mut self,
        message: &str,
        response: &str,
        at: DateTime<Utc>,
    ) -> Result<EventOutcome<ChatExchange>> {
        if message.trim().is_empty() {
            return Err(Error::Invalid("chat message must not be empty".into()));
        }
        let today = at.date_naive();
        let new = NewChat {
            message: message.trim().to_string(),
            response: response.to_string(),
            timestamp: at,
        };

        let outcome = self.write_with_retry("record_chat", |engine, store, before| {
            engine.chat_allowance(before, today)?;
            let next = engine.record_chat_event(before, today);
            store.insert_chat(&new, &next)
        })?;

        info!(
            id = %outcome.record.id,
            daily_chat_count = outcome.profile.daily_chat_count,
            "chat recorded"
        );
        Ok(outcome)
    }

    /// Stored exchanges expanded into alternating user and reply messages.
    pub fn chat_history(&self) -> Result<Vec<ChatMessage>> {
        Ok(self
            .store
            .list_chats()?
            .iter()
            .flat_map(ChatExchange::expand)
            .collect())
    }

    // ── Profile ──────────────────────────────────────────────────────────────

    pub fn grant_xp(&mut self, amount: u32) -> Result<EventOutcome<()>> {
        let outcome = self.write_with_retry("grant_xp", |engine, store, before| {
            let next = engine.grant_xp(before, amount);
            store.save_profile(&next).map(|profile| Recorded { record: (), profile })
        })?;
        info!(amount, xp = outcome.profile.xp_points, "xp granted");
        Ok(outcome)
    }

    pub fn set_subscription(&mut self, tier: SubscriptionTier) -> Result<UserProfile> {
        let outcome = self.write_with_retry("set_subscription", |_, store, before| {
            let next = UserProfile {
                subscription: tier,
                ..before.clone()
            };
            store.save_profile(&next).map(|profile| Recorded { record: (), profile })
        })?;
        info!(subscription = %tier, "subscription changed");
        Ok(outcome.profile)
    }

    /// Change the display name used in chat replies.
    pub fn set_name(&mut self, name: &str) -> Result<UserProfile> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Invalid("name must not be empty".into()));
        }
        let outcome = self.write_with_retry("set_name", |_, store, before| {
            let next = UserProfile {
                name: name.to_string(),
                ..before.clone()
            };
            store.save_profile(&next).map(|profile| Recorded { record: (), profile })
        })?;
        Ok(outcome.profile)
    }

    // ── Capsules ─────────────────────────────────────────────────────────────

    pub fn create_capsule(
        &mut self,
        message: &str,
        unlock_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<EventOutcome<FutureCapsule>> {
        validate_capsule(message, unlock_date, today)?;
        let new = NewCapsule {
            message: message.trim().to_string(),
            unlock_date,
            created_at: Utc::now(),
        };

        let outcome = self.write_with_retry("create_capsule", |engine, store, before| {
            let next = engine.record_capsule_event(before);
            store.insert_capsule(&new, &next)
        })?;

        info!(id = %outcome.record.id, %unlock_date, "capsule created");
        Ok(outcome)
    }

    /// Edit a locked capsule's message and/or unlock date.
    pub fn update_capsule(
        &mut self,
        id: &str,
        message: Option<&str>,
        unlock_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<FutureCapsule> {
        let current = self.store.get_capsule(id)?;
        if current.is_unlocked {
            return Err(Error::Invalid("an unlocked capsule can no longer be edited".into()));
        }
        let message = message.map(str::trim).unwrap_or(&current.message).to_string();
        let unlock_date = unlock_date.unwrap_or(current.unlock_date);
        validate_capsule(&message, unlock_date, today)?;

        let updated = self.store.update_capsule(&FutureCapsule {
            message,
            unlock_date,
            ..current
        })?;
        info!(id, unlock_date = %updated.unlock_date, "capsule updated");
        Ok(updated)
    }

    /// Open a capsule. Refused before its unlock date; the store checks again.
    pub fn unlock_capsule(&mut self, id: &str, today: NaiveDate) -> Result<FutureCapsule> {
        let capsule = self.store.get_capsule(id)?;
        if !capsule.is_due(today) {
            return Err(Error::CapsuleLocked {
                unlock_date: capsule.unlock_date,
            });
        }
        let unlocked = self.store.unlock_capsule(id, today)?;
        info!(id, "capsule unlocked");
        Ok(unlocked)
    }

    pub fn delete_capsule(&mut self, id: &str) -> Result<()> {
        self.store.delete_capsule(id)?;
        info!(id, "capsule deleted");
        Ok(())
    }

    /// All capsules, earliest unlock date first.
    pub fn list_capsules(&self) -> Result<Vec<FutureCapsule>> {
        self.store.list_capsules()
    }

    // ── Stats ────────────────────────────────────────────────────────────────

    pub fn stats(&self, today: NaiveDate) -> Result<JournalStats> {
        let profile = self.profile()?;
        let memories = self.store.list_memories()?;
        let chats = self.store.list_chats()?;
        let capsules = self.store.list_capsules()?;
        Ok(journal_stats(&profile, &memories, &chats, &capsules, today))
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn write_with_retry<T>(
        &mut self,
        operation: &'static str,
        mut write: impl FnMut(&GamificationEngine, &mut S, &UserProfile) -> Result<Recorded<T>>,
    ) -> Result<EventOutcome<T>> {
        let attempts = self.max_write_retries.max(1);
        let mut attempt = 1;
        loop {
            let before = self.profile()?;
            match write(&self.engine, &mut self.store, &before) {
                Ok(Recorded { record, profile }) => {
                    let new_badges = profile.badges.added_since(&before.badges);
                    if !new_badges.is_empty() {
                        info!(operation, badges = ?new_badges, "badges unlocked");
                    }
                    return Ok(EventOutcome {
                        leveled_up: profile.current_level() > before.current_level(),
                        record,
                        profile,
                        new_badges,
                    });
                }
                Err(Error::Conflict) if attempt < attempts => {
                    warn!(operation, attempt, "profile changed concurrently, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn validate_capsule(message: &str, unlock_date: NaiveDate, today: NaiveDate) -> Result<()> {
    if message.trim().is_empty() {
        return Err(Error::Invalid("capsule message must not be empty".into()));
    }
    if unlock_date <= today {
        return Err(Error::Invalid(format!(
            "unlock date {unlock_date} must be after today ({today})"
        )));
    }
    Ok(())
}

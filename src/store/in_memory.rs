//! Vector-backed [`RecordStore`] for tests and ephemeral journals.
//!
//! Besides plain storage it can be switched into an unavailable state and can
//! be told to reject the next N profile writes as conflicts.

use chrono::NaiveDate;

use super::{RecordStore, Recorded};
use crate::error::{Error, Result};
use crate::memory::types::{
    derive_title, ChatExchange, FutureCapsule, Memory, NewCapsule, NewChat, NewMemory,
    UserProfile,
};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    user_id: String,
    memories: Vec<Memory>,
    chats: Vec<ChatExchange>,
    capsules: Vec<FutureCapsule>,
    profile: Option<UserProfile>,
    unavailable: bool,
    pending_conflicts: u32,
}

impl InMemoryStore {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// While set, every call fails with `Unavailable`.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Make the next `count` profile writes fail with `Conflict`.
    pub fn inject_conflicts(&mut self, count: u32) {
        self.pending_conflicts = count;
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(Error::Unavailable("in-memory store is offline".into()));
        }
        Ok(())
    }

    /// CAS check without committing. Returns the profile as it would be stored.
    fn stage_profile(&mut self, profile: &UserProfile) -> Result<UserProfile> {
        if self.pending_conflicts > 0 {
            self.pending_conflicts -= 1;
            return Err(Error::Conflict);
        }
        let stored_version = self.profile.as_ref().map_or(0, |p| p.version);
        if stored_version != profile.version {
            return Err(Error::Conflict);
        }
        Ok(UserProfile {
            id: self.user_id.clone(),
            version: profile.version + 1,
            ..profile.clone()
        })
    }

    fn capsule_index(&self, id: &str) -> Result<usize> {
        self.capsules
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::not_found("capsule", id))
    }
}

impl RecordStore for InMemoryStore {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn list_memories(&self) -> Result<Vec<Memory>> {
        self.check_available()?;
        let mut memories = self.memories.clone();
        memories.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(memories)
    }

    fn get_memory(&self, id: &str) -> Result<Memory> {
        self.check_available()?;
        self.memories
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("memory", id))
    }

    fn insert_memory(&mut self, new: &NewMemory, profile: &UserProfile) -> Result<Recorded<Memory>> {
        self.check_available()?;
        let profile = self.stage_profile(profile)?;
        let memory = Memory {
            id: uuid::Uuid::now_v7().to_string(),
            title: derive_title(&new.text, "Memory"),
            text: new.text.clone(),
            mood: new.mood,
            tags: new.tags.clone(),
            created_at: new.timestamp,
        };
        self.memories.push(memory.clone());
        self.profile = Some(profile.clone());
        Ok(Recorded {
            record: memory,
            profile,
        })
    }

    fn delete_memory(&mut self, id: &str) -> Result<()> {
        self.check_available()?;
        let idx = self
            .memories
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| Error::not_found("memory", id))?;
        self.memories.remove(idx);
        Ok(())
    }

    fn list_chats(&self) -> Result<Vec<ChatExchange>> {
        self.check_available()?;
        let mut chats = self.chats.clone();
        chats.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(chats)
    }

    fn insert_chat(&mut self, new: &NewChat, profile: &UserProfile) -> Result<Recorded<ChatExchange>> {
        self.check_available()?;
        let profile = self.stage_profile(profile)?;
        let exchange = ChatExchange {
            id: uuid::Uuid::now_v7().to_string(),
            message: new.message.clone(),
            response: new.response.clone(),
            timestamp: new.timestamp,
        };
        self.chats.push(exchange.clone());
        self.profile = Some(profile.clone());
        Ok(Recorded {
            record: exchange,
            profile,
        })
    }

    fn list_capsules(&self) -> Result<Vec<FutureCapsule>> {
        self.check_available()?;
        let mut capsules = self.capsules.clone();
        capsules.sort_by(|a, b| {
            a.unlock_date
                .cmp(&b.unlock_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(capsules)
    }

    fn get_capsule(&self, id: &str) -> Result<FutureCapsule> {
        self.check_available()?;
        let idx = self.capsule_index(id)?;
        Ok(self.capsules[idx].clone())
    }

    fn insert_capsule(
        &mut self,
        new: &NewCapsule,
        profile: &UserProfile,
    ) -> Result<Recorded<FutureCapsule>> {
        self.check_available()?;
        let profile = self.stage_profile(profile)?;
        let capsule = FutureCapsule {
            id: uuid::Uuid::now_v7().to_string(),
            title: derive_title(&new.message, "Future Capsule"),
            message: new.message.clone(),
            unlock_date: new.unlock_date,
            is_unlocked: false,
            created_at: new.created_at,
        };
        self.capsules.push(capsule.clone());
        self.profile = Some(profile.clone());
        Ok(Recorded {
            record: capsule,
            profile,
        })
    }

    fn update_capsule(&mut self, capsule: &FutureCapsule) -> Result<FutureCapsule> {
        self.check_available()?;
        let idx = self.capsule_index(&capsule.id)?;
        let stored = &mut self.capsules[idx];
        if stored.is_unlocked {
            return Err(Error::Invalid("an unlocked capsule can no longer be edited".into()));
        }
        stored.title = derive_title(&capsule.message, "Future Capsule");
        stored.message = capsule.message.clone();
        stored.unlock_date = capsule.unlock_date;
        Ok(stored.clone())
    }

    fn unlock_capsule(&mut self, id: &str, today: NaiveDate) -> Result<FutureCapsule> {
        self.check_available()?;
        let idx = self.capsule_index(id)?;
        let stored = &mut self.capsules[idx];
        if !stored.is_due(today) {
            return Err(Error::CapsuleLocked {
                unlock_date: stored.unlock_date,
            });
        }
        stored.is_unlocked = true;
        Ok(stored.clone())
    }

    fn delete_capsule(&mut self, id: &str) -> Result<()> {
        self.check_available()?;
        let idx = self.capsule_index(id)?;
        self.capsules.remove(idx);
        Ok(())
    }

    fn load_profile(&self) -> Result<Option<UserProfile>> {
        self.check_available()?;
        Ok(self.profile.clone())
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<UserProfile> {
        self.check_available()?;
        let saved = self.stage_profile(profile)?;
        self.profile = Some(saved.clone());
        Ok(saved)
    }
}

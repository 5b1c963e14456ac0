//! The record store seam.
//!
//! [`RecordStore`] is the repository every journal operation goes through.
//! [`sqlite::SqliteStore`] persists to SQLite; [`in_memory::InMemoryStore`]
//! keeps records in vectors and can simulate outages and write conflicts.
//!
//! Writes that carry gamification side effects (`insert_memory`, `insert_chat`,
//! `insert_capsule`) take the already-updated profile and persist record and
//! profile together: either both land or neither does.

pub mod in_memory;
pub mod sqlite;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::memory::types::{
    ChatExchange, FutureCapsule, Memory, NewCapsule, NewChat, NewMemory, UserProfile,
};

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// A newly written record together with the profile stored alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct Recorded<T> {
    pub record: T,
    pub profile: UserProfile,
}

/// Repository over the four journal entities, scoped to a single user.
///
/// All methods are synchronous. Callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait RecordStore: Send {
    /// Id of the user whose records this store reads and writes.
    fn user_id(&self) -> &str;

    /// All memories, newest first.
    fn list_memories(&self) -> Result<Vec<Memory>>;
    fn get_memory(&self, id: &str) -> Result<Memory>;
    fn insert_memory(&mut self, new: &NewMemory, profile: &UserProfile) -> Result<Recorded<Memory>>;
    fn delete_memory(&mut self, id: &str) -> Result<()>;

    /// All chat exchanges, oldest first.
    fn list_chats(&self) -> Result<Vec<ChatExchange>>;
    fn insert_chat(&mut self, new: &NewChat, profile: &UserProfile) -> Result<Recorded<ChatExchange>>;

    /// All capsules, earliest unlock date first.
    fn list_capsules(&self) -> Result<Vec<FutureCapsule>>;
    fn get_capsule(&self, id: &str) -> Result<FutureCapsule>;
    fn insert_capsule(
        &mut self,
        new: &NewCapsule,
        profile: &UserProfile,
    ) -> Result<Recorded<FutureCapsule>>;
    /// Replace a capsule's message and unlock date. The unlocked flag is left alone.
    fn update_capsule(&mut self, capsule: &FutureCapsule) -> Result<FutureCapsule>;
    /// Mark a capsule unlocked. Fails with `CapsuleLocked` when `today` is
    /// before its unlock date, whatever the caller already checked.
    fn unlock_capsule(&mut self, id: &str, today: NaiveDate) -> Result<FutureCapsule>;
    fn delete_capsule(&mut self, id: &str) -> Result<()>;

    /// The stored profile, or `None` if this user has never been saved.
    fn load_profile(&self) -> Result<Option<UserProfile>>;
    /// Compare-and-swap write keyed on `profile.version`.
    ///
    /// Returns the stored profile with its new version, or `Conflict` if the
    /// stored version no longer matches.
    fn save_profile(&mut self, profile: &UserProfile) -> Result<UserProfile>;
}

/// Lets callers pick a store at runtime (`Box<dyn RecordStore>`).
impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn user_id(&self) -> &str {
        (**self).user_id()
    }
    fn list_memories(&self) -> Result<Vec<Memory>> {
        (**self).list_memories()
    }
    fn get_memory(&self, id: &str) -> Result<Memory> {
        (**self).get_memory(id)
    }
    fn insert_memory(&mut self, new: &NewMemory, profile: &UserProfile) -> Result<Recorded<Memory>> {
        (**self).insert_memory(new, profile)
    }
    fn delete_memory(&mut self, id: &str) -> Result<()> {
        (**self).delete_memory(id)
    }
    fn list_chats(&self) -> Result<Vec<ChatExchange>> {
        (**self).list_chats()
    }
    fn insert_chat(&mut self, new: &NewChat, profile: &UserProfile) -> Result<Recorded<ChatExchange>> {
        (**self).insert_chat(new, profile)
    }
    fn list_capsules(&self) -> Result<Vec<FutureCapsule>> {
        (**self).list_capsules()
    }
    fn get_capsule(&self, id: &str) -> Result<FutureCapsule> {
        (**self).get_capsule(id)
    }
    fn insert_capsule(
        &mut self,
        new: &NewCapsule,
        profile: &UserProfile,
    ) -> Result<Recorded<FutureCapsule>> {
        (**self).insert_capsule(new, profile)
    }
    fn update_capsule(&mut self, capsule: &FutureCapsule) -> Result<FutureCapsule> {
        (**self).update_capsule(capsule)
    }
    fn unlock_capsule(&mut self, id: &str, today: NaiveDate) -> Result<FutureCapsule> {
        (**self).unlock_capsule(id, today)
    }
    fn delete_capsule(&mut self, id: &str) -> Result<()> {
        (**self).delete_capsule(id)
    }
    fn load_profile(&self) -> Result<Option<UserProfile>> {
        (**self).load_profile()
    }
    fn save_profile(&mut self, profile: &UserProfile) -> Result<UserProfile> {
        (**self).save_profile(profile)
    }
}

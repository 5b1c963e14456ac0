//! SQLite-backed [`RecordStore`].
//!
//! Every write runs inside a transaction together with its audit log entry.
//! Badges and tags are stored as JSON arrays; timestamps and dates use rusqlite's
//! chrono text encoding so they sort correctly as strings.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use super::{RecordStore, Recorded};
use crate::error::{Error, Result};
use crate::gamification::clamp_counter;
use crate::memory::types::{
    derive_title, ChatExchange, FutureCapsule, Memory, Mood, NewCapsule, NewChat,
    NewMemory, StringSet, SubscriptionTier, UserProfile,
};

const MEMORY_COLUMNS: &str = "id, title, text, mood, tags, created_at";
const CHAT_COLUMNS: &str = "id, message, response, timestamp";
const CAPSULE_COLUMNS: &str = "id, title, message, unlock_date, is_unlocked, created_at";
const PROFILE_COLUMNS: &str = "id, name, email, subscription, daily_chat_count, last_chat_on, \
     streak_count, last_memory_on, xp_points, badges, version";

/// Record store over a single SQLite connection, scoped to one user.
pub struct SqliteStore {
    conn: Connection,
    user_id: String,
}

impl SqliteStore {
    pub fn new(conn: Connection, user_id: impl Into<String>) -> Self {
        Self {
            conn,
            user_id: user_id.into(),
        }
    }

    /// Open (or create) the database at `path` and scope it to `user_id`.
    pub fn open(path: impl AsRef<Path>, user_id: impl Into<String>) -> anyhow::Result<Self> {
        let conn = crate::db::open_database(path)?;
        Ok(Self::new(conn, user_id))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordStore for SqliteStore {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn list_memories(&self) -> Result<Vec<Memory>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEMORY_COLUMNS} FROM memories WHERE user_id = ?1 \
             ORDER BY created_at DESC, id DESC"
        ))?;
        let memories = stmt
            .query_map(params![self.user_id], memory_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(memories)
    }

    fn get_memory(&self, id: &str) -> Result<Memory> {
        self.conn
            .query_row(
                &format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?1 AND user_id = ?2"),
                params![id, self.user_id],
                memory_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("memory", id))
    }

    fn insert_memory(&mut self, new: &NewMemory, profile: &UserProfile) -> Result<Recorded<Memory>> {
        let memory = Memory {
            id: uuid::Uuid::now_v7().to_string(),
            title: derive_title(&new.text, "Memory"),
            text: new.text.clone(),
            mood: new.mood,
            tags: new.tags.clone(),
            created_at: new.timestamp,
        };

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO memories (id, user_id, title, text, mood, tags, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                memory.id,
                self.user_id,
                memory.title,
                memory.text,
                memory.mood.map(|m| m.as_str()),
                encode_set(&memory.tags)?,
                memory.created_at,
            ],
        )?;
        let profile = save_profile_row(&tx, &self.user_id, profile)?;
        write_activity(&tx, "create", "memory", &memory.id, None)?;
        tx.commit()?;

        Ok(Recorded {
            record: memory,
            profile,
        })
    }

    fn delete_memory(&mut self, id: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        let rows = tx.execute(
            "DELETE FROM memories WHERE id = ?1 AND user_id = ?2",
            params![id, self.user_id],
        )?;
        if rows == 0 {
            return Err(Error::not_found("memory", id));
        }
        write_activity(&tx, "delete", "memory", id, None)?;
        tx.commit()?;
        Ok(())
    }

    fn list_chats(&self) -> Result<Vec<ChatExchange>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CHAT_COLUMNS} FROM chat_messages WHERE user_id = ?1 \
             ORDER BY timestamp ASC, id ASC"
        ))?;
        let chats = stmt
            .query_map(params![self.user_id], |row| {
                Ok(ChatExchange {
                    id: row.get(0)?,
                    message: row.get(1)?,
                    response: row.get(2)?,
                    timestamp: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(chats)
    }

    fn insert_chat(&mut self, new: &NewChat, profile: &UserProfile) -> Result<Recorded<ChatExchange>> {
        let exchange = ChatExchange {
            id: uuid::Uuid::now_v7().to_string(),
            message: new.message.clone(),
            response: new.response.clone(),
            timestamp: new.timestamp,
        };

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO chat_messages (id, user_id, title, message, response, timestamp) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                exchange.id,
                self.user_id,
                derive_title(&exchange.message, "Chat"),
                exchange.message,
                exchange.response,
                exchange.timestamp,
            ],
        )?;
        let profile = save_profile_row(&tx, &self.user_id, profile)?;
        write_activity(&tx, "create", "chat_message", &exchange.id, None)?;
        tx.commit()?;

        Ok(Recorded {
            record: exchange,
            profile,
        })
    }

    fn list_capsules(&self) -> Result<Vec<FutureCapsule>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CAPSULE_COLUMNS} FROM future_capsules WHERE user_id = ?1 \
             ORDER BY unlock_date ASC, created_at ASC"
        ))?;
        let capsules = stmt
            .query_map(params![self.user_id], capsule_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(capsules)
    }

    fn get_capsule(&self, id: &str) -> Result<FutureCapsule> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {CAPSULE_COLUMNS} FROM future_capsules WHERE id = ?1 AND user_id = ?2"
                ),
                params![id, self.user_id],
                capsule_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("capsule", id))
    }

    fn insert_capsule(
        &mut self,
        new: &NewCapsule,
        profile: &UserProfile,
    ) -> Result<Recorded<FutureCapsule>> {
        let capsule = FutureCapsule {
            id: uuid::Uuid::now_v7().to_string(),
            title: derive_title(&new.message, "Future Capsule"),
            message: new.message.clone(),
            unlock_date: new.unlock_date,
            is_unlocked: false,
            created_at: new.created_at,
        };

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO future_capsules (id, user_id, title, message, unlock_date, is_unlocked, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                capsule.id,
                self.user_id,
                capsule.title,
                capsule.message,
                capsule.unlock_date,
                capsule.created_at,
            ],
        )?;
        let profile = save_profile_row(&tx, &self.user_id, profile)?;
        write_activity(
            &tx,
            "create",
            "capsule",
            &capsule.id,
            Some(&serde_json::json!({"unlock_date": capsule.unlock_date})),
        )?;
        tx.commit()?;

        Ok(Recorded {
            record: capsule,
            profile,
        })
    }

    fn update_capsule(&mut self, capsule: &FutureCapsule) -> Result<FutureCapsule> {
        let tx = self.conn.transaction()?;
        let rows = tx.execute(
            "UPDATE future_capsules SET title = ?1, message = ?2, unlock_date = ?3 \
             WHERE id = ?4 AND user_id = ?5 AND is_unlocked = 0",
            params![
                derive_title(&capsule.message, "Future Capsule"),
                capsule.message,
                capsule.unlock_date,
                capsule.id,
                self.user_id,
            ],
        )?;
        if rows == 0 {
            drop(tx);
            self.get_capsule(&capsule.id)?;
            return Err(Error::Invalid("an unlocked capsule can no longer be edited".into()));
        }
        write_activity(&tx, "update", "capsule", &capsule.id, None)?;
        tx.commit()?;
        self.get_capsule(&capsule.id)
    }

    fn unlock_capsule(&mut self, id: &str, today: NaiveDate) -> Result<FutureCapsule> {
        let capsule = self.get_capsule(id)?;

        let tx = self.conn.transaction()?;
        let rows = tx.execute(
            "UPDATE future_capsules SET is_unlocked = 1 \
             WHERE id = ?1 AND user_id = ?2 AND unlock_date <= ?3",
            params![id, self.user_id, today],
        )?;
        if rows == 0 {
            return Err(Error::CapsuleLocked {
                unlock_date: capsule.unlock_date,
            });
        }
        write_activity(&tx, "unlock", "capsule", id, None)?;
        tx.commit()?;

        Ok(FutureCapsule {
            is_unlocked: true,
            ..capsule
        })
    }

    fn delete_capsule(&mut self, id: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        let rows = tx.execute(
            "DELETE FROM future_capsules WHERE id = ?1 AND user_id = ?2",
            params![id, self.user_id],
        )?;
        if rows == 0 {
            return Err(Error::not_found("capsule", id));
        }
        write_activity(&tx, "delete", "capsule", id, None)?;
        tx.commit()?;
        Ok(())
    }

    fn load_profile(&self) -> Result<Option<UserProfile>> {
        let profile = self
            .conn
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE id = ?1"),
                params![self.user_id],
                profile_from_row,
            )
            .optional()?;
        Ok(profile)
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<UserProfile> {
        let tx = self.conn.transaction()?;
        let saved = save_profile_row(&tx, &self.user_id, profile)?;
        write_activity(
            &tx,
            "update",
            "user_profile",
            &self.user_id,
            Some(&serde_json::json!({"version": saved.version})),
        )?;
        tx.commit()?;
        Ok(saved)
    }
}

/// Compare-and-swap profile write. Version 0 inserts; anything else updates
/// only if the stored version still matches.
fn save_profile_row(conn: &Connection, user_id: &str, profile: &UserProfile) -> Result<UserProfile> {
    let now = Utc::now();
    let badges = encode_set(&profile.badges)?;

    let rows = if profile.version == 0 {
        conn.execute(
            "INSERT OR IGNORE INTO user_profiles (id, name, email, subscription, daily_chat_count, \
             last_chat_on, streak_count, last_memory_on, xp_points, badges, version, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, ?11)",
            params![
                user_id,
                profile.name,
                profile.email,
                profile.subscription.as_str(),
                profile.daily_chat_count,
                profile.last_chat_on,
                profile.streak_count,
                profile.last_memory_on,
                profile.xp_points,
                badges,
                now,
            ],
        )?
    } else {
        conn.execute(
            "UPDATE user_profiles SET name = ?2, email = ?3, subscription = ?4, \
             daily_chat_count = ?5, last_chat_on = ?6, streak_count = ?7, last_memory_on = ?8, \
             xp_points = ?9, badges = ?10, version = version + 1, updated_at = ?11 \
             WHERE id = ?1 AND version = ?12",
            params![
                user_id,
                profile.name,
                profile.email,
                profile.subscription.as_str(),
                profile.daily_chat_count,
                profile.last_chat_on,
                profile.streak_count,
                profile.last_memory_on,
                profile.xp_points,
                badges,
                now,
                profile.version as i64,
            ],
        )?
    };

    if rows == 0 {
        tracing::debug!(user_id, version = profile.version, "profile version mismatch");
        return Err(Error::Conflict);
    }

    Ok(UserProfile {
        id: user_id.to_string(),
        version: profile.version + 1,
        ..profile.clone()
    })
}

/// Write an entry to the activity_log audit table.
pub(crate) fn write_activity(
    conn: &Connection,
    operation: &str,
    record_kind: &str,
    record_id: &str,
    details: Option<&serde_json::Value>,
) -> rusqlite::Result<()> {
    let details_json = details.map(|d| d.to_string());
    conn.execute(
        "INSERT INTO activity_log (operation, record_kind, record_id, details, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![operation, record_kind, record_id, details_json, Utc::now()],
    )?;
    Ok(())
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, message.into())
}

fn encode_set(set: &StringSet) -> rusqlite::Result<String> {
    serde_json::to_string(set.as_slice())
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Decode a JSON array column. An empty column is an empty set.
fn decode_set(column: usize, raw: &str) -> rusqlite::Result<StringSet> {
    if raw.trim().is_empty() {
        return Ok(StringSet::new());
    }
    let entries: Vec<String> =
        serde_json::from_str(raw).map_err(|e| conversion_error(column, e.to_string()))?;
    Ok(entries.into_iter().collect())
}

fn memory_from_row(row: &Row<'_>) -> rusqlite::Result<Memory> {
    let mood: Option<String> = row.get(3)?;
    let mood = mood
        .filter(|m| !m.is_empty())
        .map(|m| m.parse::<Mood>().map_err(|e| conversion_error(3, e)))
        .transpose()?;
    let tags: String = row.get(4)?;

    Ok(Memory {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
        mood,
        tags: decode_set(4, &tags)?,
        created_at: row.get(5)?,
    })
}

fn capsule_from_row(row: &Row<'_>) -> rusqlite::Result<FutureCapsule> {
    Ok(FutureCapsule {
        id: row.get(0)?,
        title: row.get(1)?,
        message: row.get(2)?,
        unlock_date: row.get(3)?,
        is_unlocked: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let subscription: String = row.get(3)?;
    let badges: String = row.get(9)?;
    let version: i64 = row.get(10)?;

    Ok(UserProfile {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subscription: subscription
            .parse::<SubscriptionTier>()
            .map_err(|e| conversion_error(3, e))?,
        daily_chat_count: clamp_counter(row.get(4)?),
        last_chat_on: row.get(5)?,
        streak_count: clamp_counter(row.get(6)?),
        last_memory_on: row.get(7)?,
        xp_points: clamp_counter(row.get(8)?),
        badges: decode_set(9, &badges)?,
        version: version.max(0) as u64,
    })
}

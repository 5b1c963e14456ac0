//! Core journal type definitions.
//!
//! Defines [`Mood`] (the six mood tags), [`SubscriptionTier`], [`Badges`] and
//! [`Tags`] (ordered string sets), and the stored records: [`Memory`],
//! [`ChatExchange`], [`FutureCapsule`] and [`UserProfile`].

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters copied from a record's text into its title.
pub const TITLE_MAX_CHARS: usize = 50;

/// Offset between a stored chat message and its reply when history is expanded.
pub const REPLY_OFFSET_SECS: i64 = 30;

/// The six mood tags a memory can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Sad,
    Excited,
    Calm,
    Grateful,
    Proud,
}

impl Mood {
    /// All moods in display order.
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Excited,
        Mood::Calm,
        Mood::Grateful,
        Mood::Proud,
    ];

    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Excited => "excited",
            Self::Calm => "calm",
            Self::Grateful => "grateful",
            Self::Proud => "proud",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(Self::Happy),
            "sad" => Ok(Self::Sad),
            "excited" => Ok(Self::Excited),
            "calm" => Ok(Self::Calm),
            "grateful" => Ok(Self::Grateful),
            "proud" => Ok(Self::Proud),
            _ => Err(format!("unknown mood: {s}")),
        }
    }
}

/// Subscription tier of a profile. Free accounts have a daily chat limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
        }
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            _ => Err(format!("unknown subscription tier: {s}")),
        }
    }
}

/// An insertion-ordered set of strings.
///
/// Used for badges and tags. Entries are trimmed, empty entries are dropped and
/// duplicates (exact match) are ignored. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringSet(Vec<String>);

impl StringSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert an entry. Returns `true` if it was not already present.
    pub fn insert(&mut self, value: impl AsRef<str>) -> bool {
        let value = value.as_ref().trim();
        if value.is_empty() || self.contains(value) {
            return false;
        }
        self.0.push(value.to_string());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Entries present in `self` but not in `before`, in insertion order.
    pub fn added_since(&self, before: &StringSet) -> Vec<String> {
        self.0
            .iter()
            .filter(|v| !before.contains(v))
            .cloned()
            .collect()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for StringSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = StringSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<'a> IntoIterator for &'a StringSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Achievement badges held by a profile.
pub type Badges = StringSet;

/// Free-text tags attached to a memory.
pub type Tags = StringSet;

/// Derive a record title from its text: the first [`TITLE_MAX_CHARS`] characters,
/// or `fallback` when the text is blank.
pub fn derive_title(text: &str, fallback: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    trimmed.chars().take(TITLE_MAX_CHARS).collect()
}

/// A journal memory, matching the `memories` table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    /// Short title derived from the text.
    pub title: String,
    /// The full text of the memory.
    pub text: String,
    /// Optional mood tag chosen by the user.
    pub mood: Option<Mood>,
    /// User-supplied tags.
    pub tags: Tags,
    /// When the memory was captured.
    pub created_at: DateTime<Utc>,
}

/// Input for capturing a memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMemory {
    pub text: String,
    pub mood: Option<Mood>,
    pub tags: Tags,
    pub timestamp: DateTime<Utc>,
}

/// A stored chat exchange: one user message and the companion's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub id: String,
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// Input for recording a chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChat {
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// One side of a chat exchange, as shown in a conversation view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub from_user: bool,
}

impl ChatExchange {
    /// Expand into the user message at `timestamp` and the reply 30 seconds later.
    pub fn expand(&self) -> [ChatMessage; 2] {
        [
            ChatMessage {
                id: format!("{}:user", self.id),
                text: self.message.clone(),
                timestamp: self.timestamp,
                from_user: true,
            },
            ChatMessage {
                id: format!("{}:reply", self.id),
                text: self.response.clone(),
                timestamp: self.timestamp + Duration::seconds(REPLY_OFFSET_SECS),
                from_user: false,
            },
        ]
    }
}

/// A time-locked message to the user's future self.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureCapsule {
    pub id: String,
    pub title: String,
    pub message: String,
    /// First calendar day on which the capsule may be opened.
    pub unlock_date: NaiveDate,
    pub is_unlocked: bool,
    pub created_at: DateTime<Utc>,
}

impl FutureCapsule {
    /// Whether the capsule may be opened on `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        today >= self.unlock_date
    }

    /// Whole days remaining until the unlock date (zero or negative once due).
    pub fn days_until_unlock(&self, today: NaiveDate) -> i64 {
        (self.unlock_date - today).num_days()
    }

    /// The capsule as shown on `today`: message and title stay hidden until unlocked.
    pub fn view(&self, today: NaiveDate) -> CapsuleView {
        CapsuleView {
            id: self.id.clone(),
            status: self.status(today),
            unlock_date: self.unlock_date,
            days_until_unlock: self.days_until_unlock(today).max(0),
            title: self.is_unlocked.then(|| self.title.clone()),
            message: self.is_unlocked.then(|| self.message.clone()),
            created_at: self.created_at,
        }
    }

    pub fn status(&self, today: NaiveDate) -> CapsuleStatus {
        if self.is_unlocked {
            CapsuleStatus::Unlocked
        } else if self.is_due(today) {
            CapsuleStatus::Ready
        } else {
            CapsuleStatus::Locked
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CapsuleView {
    pub id: String,
    pub status: CapsuleStatus,
    pub unlock_date: NaiveDate,
    pub days_until_unlock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Display state of a capsule on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapsuleStatus {
    Locked,
    /// Due but not opened yet.
    Ready,
    Unlocked,
}

impl CapsuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Ready => "ready",
            Self::Unlocked => "unlocked",
        }
    }
}

impl std::fmt::Display for CapsuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a future capsule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCapsule {
    pub message: String,
    pub unlock_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// The gamification aggregate for the single user of a journal.
///
/// The level is never stored; see [`UserProfile::current_level`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subscription: SubscriptionTier,
    pub daily_chat_count: u32,
    /// Day the `daily_chat_count` belongs to.
    pub last_chat_on: Option<NaiveDate>,
    pub streak_count: u32,
    /// Day of the most recent captured memory.
    pub last_memory_on: Option<NaiveDate>,
    pub xp_points: u32,
    pub badges: Badges,
    /// Optimistic concurrency token. `0` means the profile was never persisted.
    pub version: u64,
}

impl UserProfile {
    /// The profile used when the store has none for `id`.
    pub fn new_default(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: "User".into(),
            email: "user@example.com".into(),
            subscription: SubscriptionTier::Free,
            daily_chat_count: 0,
            last_chat_on: None,
            streak_count: 0,
            last_memory_on: None,
            xp_points: 0,
            badges: Badges::new(),
            version: 0,
        }
    }

    /// Level derived from XP: `floor(xp / 100) + 1`.
    pub fn current_level(&self) -> u32 {
        crate::gamification::level_for(self.xp_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn mood_round_trips_through_str() {
        for mood in Mood::ALL {
            assert_eq!(mood.as_str().parse::<Mood>().unwrap(), mood);
        }
        assert!("angry".parse::<Mood>().is_err());
    }

    #[test]
    fn string_set_ignores_duplicates_and_blanks() {
        let mut set = StringSet::new();
        assert!(set.insert("Week Warrior"));
        assert!(!set.insert("Week Warrior"));
        assert!(!set.insert("   "));
        assert!(set.insert(" Level Up "));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Week Warrior", "Level Up"]);
    }

    #[test]
    fn entries_keep_inner_punctuation() {
        let set: StringSet = ["Paris, France", " a,b ", "Paris, France"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Paris, France", "a,b"]);
    }

    #[test]
    fn added_since_lists_new_entries() {
        let before: StringSet = ["a"].into_iter().collect();
        let after: StringSet = ["a", "b", "c"].into_iter().collect();
        assert_eq!(after.added_since(&before), vec!["b", "c"]);
    }

    #[test]
    fn title_is_truncated_by_chars() {
        let long = "é".repeat(80);
        assert_eq!(derive_title(&long, "Memory").chars().count(), TITLE_MAX_CHARS);
        assert_eq!(derive_title("  ", "Memory"), "Memory");
    }

    #[test]
    fn chat_exchange_expands_into_two_messages() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let exchange = ChatExchange {
            id: "abc".into(),
            message: "hi".into(),
            response: "hello".into(),
            timestamp: at,
        };
        let [user, reply] = exchange.expand();
        assert!(user.from_user);
        assert_eq!(user.timestamp, at);
        assert!(!reply.from_user);
        assert_eq!(reply.text, "hello");
        assert_eq!((reply.timestamp - at).num_seconds(), 30);
    }

    #[test]
    fn capsule_due_on_unlock_date() {
        let capsule = FutureCapsule {
            id: "c".into(),
            title: "t".into(),
            message: "m".into(),
            unlock_date: NaiveDate::from_ymd_opt(2026, 5, 10).unwrap(),
            is_unlocked: false,
            created_at: Utc::now(),
        };
        let before = NaiveDate::from_ymd_opt(2026, 5, 9).unwrap();
        let on = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        assert!(!capsule.is_due(before));
        assert!(capsule.is_due(on));
        assert_eq!(capsule.days_until_unlock(before), 1);
        assert_eq!(capsule.status(before), CapsuleStatus::Locked);
        assert_eq!(capsule.status(on), CapsuleStatus::Ready);
        assert!(capsule.view(on).message.is_none());

        let opened = FutureCapsule {
            is_unlocked: true,
            ..capsule
        };
        assert_eq!(opened.status(on), CapsuleStatus::Unlocked);
        assert_eq!(opened.view(on).message.as_deref(), Some("m"));
    }

    #[test]
    fn default_profile_starts_at_level_one() {
        let profile = UserProfile::new_default("1");
        assert_eq!(profile.current_level(), 1);
        assert_eq!(profile.subscription, SubscriptionTier::Free);
        assert!(profile.badges.is_empty());
    }
}

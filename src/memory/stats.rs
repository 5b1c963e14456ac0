use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::gamification::{level_title, xp_progress, XpProgress};
use crate::memory::types::{ChatExchange, FutureCapsule, Memory, SubscriptionTier, UserProfile};

/// Response from journal_stats.
#[derive(Debug, Serialize)]
pub struct JournalStats {
    pub total_memories: u64,
    /// Stored exchanges, not expanded messages.
    pub chat_exchanges: u64,
    pub level: u32,
    pub level_title: &'static str,
    pub xp_points: u32,
    pub xp_progress: XpProgress,
    pub streak_count: u32,
    pub badges: Vec<String>,
    pub subscription: SubscriptionTier,
    /// Capsules whose date is still in the future.
    pub capsules_locked: u64,
    pub capsules_unlocked: u64,
    /// Capsules whose date has arrived but which have not been opened.
    pub capsules_ready: u64,
    /// Count per mood tag; every mood is present, untagged memories are not counted.
    pub by_mood: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_memory: Option<String>,
}

/// Compute journal statistics from already-loaded records.
pub fn journal_stats(
    profile: &UserProfile,
    memories: &[Memory],
    chats: &[ChatExchange],
    capsules: &[FutureCapsule],
    today: NaiveDate,
) -> JournalStats {
    let mut by_mood: BTreeMap<String, u64> = crate::memory::types::Mood::ALL
        .iter()
        .map(|m| (m.as_str().to_string(), 0))
        .collect();
    for mood in memories.iter().filter_map(|m| m.mood) {
        *by_mood.entry(mood.as_str().to_string()).or_default() += 1;
    }

    let capsules_unlocked = capsules.iter().filter(|c| c.is_unlocked).count() as u64;
    let capsules_ready = capsules
        .iter()
        .filter(|c| !c.is_unlocked && c.is_due(today))
        .count() as u64;

    let oldest = memories.iter().map(|m| m.created_at).min();
    let newest = memories.iter().map(|m| m.created_at).max();

    let progress = xp_progress(profile.xp_points);
    JournalStats {
        total_memories: memories.len() as u64,
        chat_exchanges: chats.len() as u64,
        level: profile.current_level(),
        level_title: level_title(progress.level),
        xp_points: profile.xp_points,
        xp_progress: progress,
        streak_count: profile.streak_count,
        badges: profile.badges.iter().map(str::to_string).collect(),
        subscription: profile.subscription,
        capsules_locked: capsules.len() as u64 - capsules_unlocked - capsules_ready,
        capsules_unlocked,
        capsules_ready,
        by_mood,
        oldest_memory: oldest.map(|t| t.to_rfc3339()),
        newest_memory: newest.map(|t| t.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::types::Mood;
    use chrono::{TimeZone, Utc};

    fn memory(day: u32, mood: Option<Mood>) -> Memory {
        Memory {
            id: format!("m{day}"),
            title: "t".into(),
            text: "t".into(),
            mood,
            tags: Default::default(),
            created_at: Utc.with_ymd_and_hms(2026, 1, day, 9, 0, 0).unwrap(),
        }
    }

    fn capsule(month: u32, unlocked: bool) -> FutureCapsule {
        FutureCapsule {
            id: format!("c{month}"),
            title: "t".into(),
            message: "m".into(),
            unlock_date: NaiveDate::from_ymd_opt(2026, month, 1).unwrap(),
            is_unlocked: unlocked,
            created_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn test_empty_journal_stats() {
        let stats = journal_stats(&UserProfile::new_default("1"), &[], &[], &[], today());
        assert_eq!(stats.total_memories, 0);
        assert_eq!(stats.chat_exchanges, 0);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.level_title, "Memory Newbie");
        assert_eq!(stats.by_mood.len(), 6);
        assert!(stats.by_mood.values().all(|&n| n == 0));
        assert!(stats.oldest_memory.is_none());
    }

    #[test]
    fn test_stats_count_moods_and_capsules() {
        let mut profile = UserProfile::new_default("1");
        profile.xp_points = 430;
        let memories = vec![
            memory(1, Some(Mood::Happy)),
            memory(2, Some(Mood::Happy)),
            memory(3, None),
            memory(4, Some(Mood::Calm)),
        ];
        let capsules = vec![capsule(1, true), capsule(2, false), capsule(12, false)];

        let stats = journal_stats(&profile, &memories, &[], &capsules, today());
        assert_eq!(stats.total_memories, 4);
        assert_eq!(stats.by_mood["happy"], 2);
        assert_eq!(stats.by_mood["calm"], 1);
        assert_eq!(stats.by_mood["sad"], 0);
        assert_eq!(stats.capsules_unlocked, 1);
        assert_eq!(stats.capsules_locked, 1);
        assert_eq!(stats.capsules_ready, 1);
        assert_eq!(stats.level, 5);
        assert_eq!(stats.level_title, "Reflection Warrior");
        assert_eq!(stats.xp_progress.into_level, 30);
    }

    #[test]
    fn test_stats_timestamps() {
        let memories = vec![memory(9, None), memory(2, None), memory(5, None)];
        let stats = journal_stats(&UserProfile::new_default("1"), &memories, &[], &[], today());
        assert!(stats.oldest_memory.unwrap().starts_with("2026-01-02"));
        assert!(stats.newest_memory.unwrap().starts_with("2026-01-09"));
    }
}

//! Gamification engine: streaks, XP, levels and badges.
//!
//! Every operation takes a profile snapshot and returns the updated profile;
//! nothing here touches a store. Levels are always derived from XP through
//! [`level_for`], so `current_level == xp / 100 + 1` holds after any mutation.

use chrono::NaiveDate;

use crate::config::{GamificationConfig, StreakPolicy};
use crate::error::{Error, Result};
use crate::memory::types::{SubscriptionTier, UserProfile};

/// XP needed to advance one level.
pub const XP_PER_LEVEL: u32 = 100;

pub const WEEK_WARRIOR: &str = "Week Warrior";
pub const MONTH_MASTER: &str = "Month Master";
pub const CHAT_CHAMPION: &str = "Chat Champion";
pub const LEVEL_UP: &str = "Level Up";
pub const FUTURE_THINKER: &str = "Future Thinker";

/// Streak lengths that unlock a badge when reached exactly.
const STREAK_BADGES: [(u32, &str); 2] = [(7, WEEK_WARRIOR), (30, MONTH_MASTER)];

/// Level derived from XP.
pub fn level_for(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// Clamp a raw stored integer into the non-negative counter range.
pub fn clamp_counter(raw: i64) -> u32 {
    raw.clamp(0, u32::MAX as i64) as u32
}

/// Display title for a level.
pub fn level_title(level: u32) -> &'static str {
    match level {
        20.. => "Memory Master",
        15..=19 => "Life Explorer",
        10..=14 => "Memory Keeper",
        5..=9 => "Reflection Warrior",
        _ => "Memory Newbie",
    }
}

/// Progress through the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct XpProgress {
    pub level: u32,
    pub into_level: u32,
    pub to_next_level: u32,
}

pub fn xp_progress(xp: u32) -> XpProgress {
    let into_level = xp % XP_PER_LEVEL;
    XpProgress {
        level: level_for(xp),
        into_level,
        to_next_level: XP_PER_LEVEL - into_level,
    }
}

/// Applies gamification rules to profile snapshots.
#[derive(Debug, Clone)]
pub struct GamificationEngine {
    rules: GamificationConfig,
}

impl Default for GamificationEngine {
    fn default() -> Self {
        Self::new(GamificationConfig::default())
    }
}

impl GamificationEngine {
    pub fn new(rules: GamificationConfig) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &GamificationConfig {
        &self.rules
    }

    /// A memory was captured on `today`.
    ///
    /// Advances the streak according to the configured [`StreakPolicy`], adds
    /// memory XP, and grants streak badges when the streak lands exactly on a
    /// milestone.
    pub fn record_memory_event(&self, profile: &UserProfile, today: NaiveDate) -> UserProfile {
        let mut next = profile.clone();
        let previous_streak = profile.streak_count;
        next.streak_count = match self.rules.streak_policy {
            StreakPolicy::PerMemory => previous_streak.saturating_add(1),
            StreakPolicy::Daily => daily_streak(previous_streak, profile.last_memory_on, today),
        };
        next.last_memory_on = Some(today);
        next.xp_points = next.xp_points.saturating_add(self.rules.memory_xp);

        if next.streak_count != previous_streak {
            for (milestone, badge) in STREAK_BADGES {
                if next.streak_count == milestone {
                    next.badges.insert(badge);
                }
            }
        }
        next
    }

    /// A chat exchange was completed on `today`.
    ///
    /// The free-tier limit is not checked here; callers gate with
    /// [`GamificationEngine::chat_allowance`] first.
    pub fn record_chat_event(&self, profile: &UserProfile, today: NaiveDate) -> UserProfile {
        let mut next = profile.clone();
        next.daily_chat_count = effective_chat_count(profile, today).saturating_add(1);
        next.last_chat_on = Some(today);
        next.xp_points = next.xp_points.saturating_add(self.rules.chat_xp);

        if next.daily_chat_count >= self.rules.chat_champion_threshold {
            next.badges.insert(CHAT_CHAMPION);
        }
        next
    }

    /// Add `amount` XP. Grants "Level Up" the first time the level increases.
    pub fn grant_xp(&self, profile: &UserProfile, amount: u32) -> UserProfile {
        let mut next = profile.clone();
        let old_level = level_for(profile.xp_points);
        next.xp_points = next.xp_points.saturating_add(amount);
        if level_for(next.xp_points) > old_level {
            next.badges.insert(LEVEL_UP);
        }
        next
    }

    /// A future capsule was written: capsule XP plus the "Future Thinker" badge.
    pub fn record_capsule_event(&self, profile: &UserProfile) -> UserProfile {
        let mut next = self.grant_xp(profile, self.rules.capsule_xp);
        next.badges.insert(FUTURE_THINKER);
        next
    }

    /// Reject a chat when a free profile has used up today's allowance.
    pub fn chat_allowance(&self, profile: &UserProfile, today: NaiveDate) -> Result<()> {
        let limit = self.rules.free_daily_chat_limit;
        if profile.subscription == SubscriptionTier::Free
            && effective_chat_count(profile, today) >= limit
        {
            return Err(Error::ChatLimitReached { limit });
        }
        Ok(())
    }

    /// Chats left today, or `None` for unlimited (premium) profiles.
    pub fn chats_remaining(&self, profile: &UserProfile, today: NaiveDate) -> Option<u32> {
        match profile.subscription {
            SubscriptionTier::Premium => None,
            SubscriptionTier::Free => Some(
                self.rules
                    .free_daily_chat_limit
                    .saturating_sub(effective_chat_count(profile, today)),
            ),
        }
    }
}

/// Today's chat count. A count recorded on an earlier day has expired.
///
/// Profiles without a recorded day keep their stored count.
pub fn effective_chat_count(profile: &UserProfile, today: NaiveDate) -> u32 {
    match profile.last_chat_on {
        Some(day) if day != today => 0,
        _ => profile.daily_chat_count,
    }
}

fn daily_streak(current: u32, last: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match last {
        Some(day) if day == today => current.max(1),
        Some(day) if day.succ_opt() == Some(today) => current.saturating_add(1),
        _ => 1,
    }
}

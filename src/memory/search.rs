use serde::{Deserialize, Serialize};

use crate::memory::types::{Memory, Mood};

// ── Public types ──────────────────────────────────────────────────────────────

/// Filters for browsing memories. Empty fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryFilter {
    /// Case-insensitive substring matched against the text and every tag.
    pub query: Option<String>,
    /// Tags that must all be present.
    pub tags: Vec<String>,
    pub mood: Option<Mood>,
}

impl MemoryFilter {
    pub fn is_empty(&self) -> bool {
        self.query.as_deref().map_or(true, |q| q.trim().is_empty())
            && self.tags.is_empty()
            && self.mood.is_none()
    }

    pub fn matches(&self, memory: &Memory) -> bool {
        if let Some(mood) = self.mood {
            if memory.mood != Some(mood) {
                return false;
            }
        }

        if !self.tags.iter().all(|t| memory.tags.contains(t.trim())) {
            return false;
        }

        match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let needle = q.to_lowercase();
                memory.text.to_lowercase().contains(&needle)
                    || memory.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

// ── Filtering ────────────────────────────────────────────────────────────────

/// Keep the memories that match `filter`, preserving input order.
pub fn filter_memories(memories: Vec<Memory>, filter: &MemoryFilter) -> Vec<Memory> {
    if filter.is_empty() {
        return memories;
    }
    memories.into_iter().filter(|m| filter.matches(m)).collect()
}

/// Distinct tags across `memories`, in first-seen order.
pub fn all_tags<'a>(memories: impl IntoIterator<Item = &'a Memory>) -> Vec<String> {
    let mut seen = crate::memory::types::Tags::new();
    for memory in memories {
        for tag in &memory.tags {
            seen.insert(tag);
        }
    }
    seen.iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn memory(text: &str, mood: Option<Mood>, tags: &[&str]) -> Memory {
        Memory {
            id: text.into(),
            title: text.into(),
            text: text.into(),
            mood,
            tags: tags.iter().collect(),
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Memory> {
        vec![
            memory("Beach day with the kids", Some(Mood::Happy), &["family", "summer"]),
            memory("Finished the marathon", Some(Mood::Proud), &["running"]),
            memory("Quiet evening reading", None, &["books", "family"]),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let out = filter_memories(sample(), &MemoryFilter::default());
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_query_is_case_insensitive_over_text_and_tags() {
        let filter = MemoryFilter {
            query: Some("BEACH".into()),
            ..Default::default()
        };
        assert_eq!(filter_memories(sample(), &filter).len(), 1);

        let filter = MemoryFilter {
            query: Some("run".into()),
            ..Default::default()
        };
        let out = filter_memories(sample(), &filter);
        assert_eq!(out[0].text, "Finished the marathon");
    }

    #[test]
    fn test_all_required_tags_must_match() {
        let filter = MemoryFilter {
            tags: vec!["family".into(), "summer".into()],
            ..Default::default()
        };
        let out = filter_memories(sample(), &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "Beach day with the kids");
    }

    #[test]
    fn test_mood_filter_skips_untagged() {
        let filter = MemoryFilter {
            mood: Some(Mood::Proud),
            ..Default::default()
        };
        let out = filter_memories(sample(), &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].mood, Some(Mood::Proud));
    }

    #[test]
    fn test_all_tags_are_distinct() {
        let memories = sample();
        assert_eq!(
            all_tags(&memories),
            vec!["family", "summer", "running", "books"]
        );
    }
}

//! Keyword-based mood detection for chat messages.

use crate::memory::types::Mood;

/// Classification order. The first mood with a matching keyword wins, so a
/// message mentioning both "happy" and "sad" is classified as happy.
pub const CLASSIFICATION_ORDER: [Mood; 6] = [
    Mood::Happy,
    Mood::Sad,
    Mood::Excited,
    Mood::Grateful,
    Mood::Calm,
    Mood::Proud,
];

/// Lower-case keywords that indicate `mood` when found anywhere in a message.
pub fn keywords(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => &[
            "happy", "joy", "smile", "laugh", "great", "wonderful", "amazing", "fantastic",
            "love", "excited", "cheerful", "delighted",
        ],
        Mood::Sad => &[
            "sad", "cry", "upset", "down", "disappointed", "hurt", "lonely", "blue",
            "depressed", "tears", "sorrow",
        ],
        Mood::Excited => &[
            "excited", "thrilled", "pumped", "amazing", "awesome", "incredible", "fantastic",
            "can't wait", "so good", "ecstatic",
        ],
        Mood::Grateful => &[
            "grateful", "thankful", "blessed", "appreciate", "thank", "fortunate", "lucky",
            "grateful for",
        ],
        Mood::Calm => &[
            "calm", "peaceful", "relaxed", "serene", "tranquil", "quiet", "meditat", "zen",
            "still", "centered",
        ],
        Mood::Proud => &[
            "proud", "accomplished", "achieved", "success", "finished", "completed", "did it",
            "made it", "victory",
        ],
    }
}

/// Detect the mood of `text`, or `None` when no keyword matches.
///
/// Matching is case-insensitive substring containment, so "meditating" matches
/// "meditat" and "downtown" matches "down".
pub fn classify_mood(text: &str) -> Option<Mood> {
    let lowered = text.to_lowercase();
    CLASSIFICATION_ORDER
        .into_iter()
        .find(|&mood| keywords(mood).iter().any(|kw| lowered.contains(kw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_happy() {
        assert_eq!(classify_mood("I am so happy today"), Some(Mood::Happy));
    }

    #[test]
    fn ordinary_text_has_no_mood() {
        assert_eq!(classify_mood("just an ordinary update"), None);
        assert_eq!(classify_mood(""), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify_mood("Feeling GRATEFUL"), Some(Mood::Grateful));
        assert_eq!(classify_mood("WE MADE IT"), Some(Mood::Proud));
    }

    #[test]
    fn ties_follow_declaration_order() {
        // sad + proud keywords: sad is declared first.
        assert_eq!(classify_mood("sad but I finished it"), Some(Mood::Sad));
        // "excited" is also a happy keyword, and happy comes first.
        assert_eq!(classify_mood("so excited!"), Some(Mood::Happy));
        // grateful precedes calm.
        assert_eq!(classify_mood("a calm evening, thankful"), Some(Mood::Grateful));
    }

    #[test]
    fn excited_only_keywords() {
        assert_eq!(classify_mood("I'm thrilled"), Some(Mood::Excited));
        assert_eq!(classify_mood("can't wait for tomorrow"), Some(Mood::Excited));
    }

    #[test]
    fn substring_keywords_match_inside_words() {
        assert_eq!(classify_mood("meditating by the lake"), Some(Mood::Calm));
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "a peaceful and quiet morning";
        assert_eq!(classify_mood(text), classify_mood(text));
        assert_eq!(classify_mood(text), Some(Mood::Calm));
    }
}

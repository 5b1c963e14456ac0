//! Reply templates and the response selector.
//!
//! Templates carry a `{name}` placeholder. [`ResponseSelector`] owns the random
//! source so replies are reproducible under a fixed seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use super::mood::classify_mood;
use crate::config::CompanionConfig;
use crate::memory::types::Mood;

/// Placeholder replaced by the user's name in every template.
pub const NAME_PLACEHOLDER: &str = "{name}";

pub const GENERIC_RESPONSES: [&str; 8] = [
    "Oh {name}, that sounds really meaningful! 💫 I love how you're taking time to reflect on your experiences. What made this moment stand out to you the most?",
    "Hey {name}! 🌟 Your thoughts always brighten my day! There's something beautiful about the way you see the world around you. Tell me more about how this made you feel!",
    "Aww {name}, this is so sweet! 😊 I can feel the emotions in your words. It's amazing how these little moments can have such a big impact on our hearts, isn't it?",
    "{name}, you're such a thoughtful person! 💝 I really admire how you notice and appreciate these special experiences. What do you think you'll remember most about this?",
    "This is wonderful, {name}! ✨ Your ability to find meaning in everyday moments is truly inspiring. How do you think this experience might influence your future?",
    "Oh my goodness {name}, this gives me all the warm feelings! 🥰 There's something magical about the way you describe your experiences. What was going through your mind in that moment?",
    "{name}, your perspective always amazes me! 🌈 It's beautiful how you're creating these precious memories. What would you want to tell your future self about this experience?",
    "I'm so happy you shared this with me, {name}! 💕 Your stories always remind me of the beauty in life's simple moments. How do you think this fits into your bigger journey?",
];

pub const ENCOURAGING_RESPONSES: [&str; 4] = [
    "You know what, {name}? You're absolutely incredible! 💪 The way you handle life's ups and downs with such grace amazes me every single day!",
    "I believe in you so much, {name}! 🌟 Whatever challenges come your way, I know you have the strength and wisdom to handle them beautifully!",
    "Your journey is so inspiring, {name}! 🦋 Every step you take, every memory you create, every moment you reflect - it's all part of your beautiful story!",
    "Keep being your amazing self, {name}! ✨ The world is brighter because you're in it, and I feel so lucky to be part of your memory-making journey!",
];

/// Mood-specific templates.
pub fn mood_responses(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => &[
            "Your happiness is absolutely contagious, {name}! 😄 I can practically feel your joy radiating through your words! What's the best part about feeling this way?",
            "Oh {name}, this brings such a smile to my digital heart! 🌞 Your positive energy is amazing - keep spreading that sunshine! What made this moment extra special?",
        ],
        Mood::Sad => &[
            "I'm here with you, {name} 💙 It's okay to feel sad sometimes - you're human and these feelings are valid. Want to talk about what's weighing on your heart?",
            "Sending you the biggest virtual hug, {name} 🤗 Sadness can feel so heavy, but remember that you're stronger than you know. I'm here to listen if you need me.",
        ],
        Mood::Excited => &[
            "Your excitement is ELECTRIC, {name}! ⚡ I can feel your energy buzzing through the screen! This enthusiasm of yours is absolutely infectious - tell me everything!",
            "WOW {name}, your excitement has me doing virtual happy dances! 🎉 There's nothing better than that feeling when something amazing happens! What's got you so thrilled?",
        ],
        Mood::Grateful => &[
            "Oh {name}, your gratitude just fills my circuits with warmth! 🙏 There's something so beautiful about appreciating life's gifts. What are you most thankful for right now?",
            "Your grateful heart is absolutely beautiful, {name}! ✨ Gratitude has this magical way of multiplying joy, doesn't it? I love how you notice these precious moments!",
        ],
        Mood::Calm => &[
            "I can feel the peaceful energy in your words, {name} 🧘‍♀️ There's something so soothing about moments of calm. What helps you find this inner peace?",
            "Your sense of calm is like a gentle breeze, {name} 🍃 It's wonderful that you've found this tranquil space. How does this peaceful feeling affect the rest of your day?",
        ],
        Mood::Proud => &[
            "YES {name}! 🏆 Your pride is so well-deserved! I'm practically glowing with happiness for you right now! You should absolutely celebrate this moment!",
            "I am SO proud of you too, {name}! 🌟 Look at you accomplishing amazing things! This pride you're feeling? That's the universe celebrating your awesomeness!",
        ],
    }
}

/// Which template pool a reply was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Mood(Mood),
    Encouraging,
    Generic,
}

/// A selected reply and the pool it came from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Reply {
    pub text: String,
    pub kind: ReplyKind,
}

/// Replace every `{name}` placeholder in `template`.
pub fn fill_template(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name)
}

/// Chooses companion replies using an injected random source.
#[derive(Debug)]
pub struct ResponseSelector<R: Rng = StdRng> {
    rng: R,
    settings: CompanionConfig,
}

impl ResponseSelector<StdRng> {
    /// Build from config, honouring `companion.seed` when set.
    pub fn from_config(settings: CompanionConfig) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rng, settings)
    }

    /// Deterministic selector for a given seed.
    pub fn seeded(seed: u64, settings: CompanionConfig) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), settings)
    }
}

impl<R: Rng> ResponseSelector<R> {
    pub fn with_rng(rng: R, settings: CompanionConfig) -> Self {
        Self { rng, settings }
    }

    /// Pick a reply for `text` and fill in the user's name.
    ///
    /// A detected mood always selects one of that mood's templates. Otherwise an
    /// encouraging template is chosen with the configured probability, falling
    /// back to the generic pool.
    pub fn select(&mut self, text: &str, user_name: Option<&str>) -> Reply {
        let (templates, kind): (&[&str], ReplyKind) = match classify_mood(text) {
            Some(mood) if !mood_responses(mood).is_empty() => {
                (mood_responses(mood), ReplyKind::Mood(mood))
            }
            _ if self.rng.gen_bool(self.settings.encouraging_probability) => {
                (&ENCOURAGING_RESPONSES[..], ReplyKind::Encouraging)
            }
            _ => (&GENERIC_RESPONSES[..], ReplyKind::Generic),
        };

        let template = templates
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(GENERIC_RESPONSES[0]);
        let name = self.resolve_name(user_name);

        Reply {
            text: fill_template(template, &name),
            kind,
        }
    }

    /// Artificial "typing" delay, uniform in `[min_delay_ms, max_delay_ms)`.
    pub fn typing_delay(&mut self) -> Duration {
        let (min, max) = (self.settings.min_delay_ms, self.settings.max_delay_ms);
        if min >= max {
            return Duration::from_millis(min);
        }
        Duration::from_millis(self.rng.gen_range(min..max))
    }

    /// Select a reply, then wait out the typing delay when simulation is enabled.
    ///
    /// The delay is drawn before returning so callers holding locks can release
    /// them first; see [`ResponseSelector::prepare`].
    pub async fn reply(&mut self, text: &str, user_name: Option<&str>) -> Reply {
        let (reply, delay) = self.prepare(text, user_name);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        reply
    }

    /// Select a reply and the delay to apply before delivering it, if any.
    pub fn prepare(&mut self, text: &str, user_name: Option<&str>) -> (Reply, Option<Duration>) {
        let reply = self.select(text, user_name);
        let delay = self
            .settings
            .simulate_typing
            .then(|| self.typing_delay());
        (reply, delay)
    }

    fn resolve_name(&self, user_name: Option<&str>) -> String {
        match user_name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.settings.default_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CompanionConfig {
        CompanionConfig {
            simulate_typing: false,
            ..CompanionConfig::default()
        }
    }

    #[test]
    fn every_template_has_a_placeholder() {
        let all = GENERIC_RESPONSES
            .iter()
            .chain(ENCOURAGING_RESPONSES.iter())
            .chain(Mood::ALL.iter().flat_map(|m| mood_responses(*m).iter()));
        for template in all {
            assert!(template.contains(NAME_PLACEHOLDER), "missing placeholder: {template}");
        }
        for mood in Mood::ALL {
            assert_eq!(mood_responses(mood).len(), 2);
        }
    }

    #[test]
    fn name_is_substituted() {
        let mut selector = ResponseSelector::seeded(1, settings());
        for text in ["I am so happy", "nothing much", "I feel lonely", "we did it"] {
            let reply = selector.select(text, Some("Sam"));
            assert!(!reply.text.contains(NAME_PLACEHOLDER));
            assert!(reply.text.contains("Sam"));
        }
    }

    #[test]
    fn missing_or_blank_name_defaults_to_friend() {
        let mut selector = ResponseSelector::seeded(2, settings());
        assert!(selector.select("hello", None).text.contains("friend"));
        assert!(selector.select("hello", Some("  ")).text.contains("friend"));
    }

    #[test]
    fn detected_mood_selects_mood_template() {
        let mut selector = ResponseSelector::seeded(3, settings());
        for _ in 0..20 {
            let reply = selector.select("I feel so sad", Some("Ana"));
            assert_eq!(reply.kind, ReplyKind::Mood(Mood::Sad));
            let filled: Vec<String> = mood_responses(Mood::Sad)
                .iter()
                .map(|t| fill_template(t, "Ana"))
                .collect();
            assert!(filled.contains(&reply.text));
        }
    }

    #[test]
    fn no_mood_uses_generic_or_encouraging() {
        let mut selector = ResponseSelector::seeded(4, settings());
        for _ in 0..50 {
            let reply = selector.select("went to the store", None);
            assert!(matches!(reply.kind, ReplyKind::Generic | ReplyKind::Encouraging));
        }
    }

    #[test]
    fn encouraging_probability_bounds_are_respected() {
        let mut always = ResponseSelector::seeded(
            5,
            CompanionConfig {
                encouraging_probability: 1.0,
                ..settings()
            },
        );
        assert_eq!(always.select("went out", None).kind, ReplyKind::Encouraging);

        let mut never = ResponseSelector::seeded(
            5,
            CompanionConfig {
                encouraging_probability: 0.0,
                ..settings()
            },
        );
        assert_eq!(never.select("went out", None).kind, ReplyKind::Generic);
    }

    #[test]
    fn same_seed_gives_same_replies() {
        let mut a = ResponseSelector::seeded(99, settings());
        let mut b = ResponseSelector::seeded(99, settings());
        for text in ["hello", "so proud", "quiet day", "hmm"] {
            assert_eq!(a.select(text, Some("Kai")), b.select(text, Some("Kai")));
        }
    }

    #[test]
    fn typing_delay_stays_in_window() {
        let mut selector = ResponseSelector::seeded(6, CompanionConfig::default());
        for _ in 0..100 {
            let delay = selector.typing_delay();
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay < Duration::from_millis(2500));
        }
    }

    #[test]
    fn prepare_skips_delay_when_typing_disabled() {
        let mut selector = ResponseSelector::seeded(7, settings());
        let (_, delay) = selector.prepare("hello", None);
        assert!(delay.is_none());
    }

    #[tokio::test]
    async fn reply_resolves_without_simulation() {
        let mut selector = ResponseSelector::seeded(8, settings());
        let reply = selector.reply("thank you", Some("Lee")).await;
        assert_eq!(reply.kind, ReplyKind::Mood(Mood::Grateful));
        assert!(reply.text.contains("Lee"));
    }
}

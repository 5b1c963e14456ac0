mod helpers;

use helpers::{at, day, memory_on, new_memory};
use lifecapsule::error::Error;
use lifecapsule::gamification::{
    GamificationEngine, CHAT_CHAMPION, FUTURE_THINKER, LEVEL_UP, MONTH_MASTER, WEEK_WARRIOR,
};
use lifecapsule::memory::search::MemoryFilter;
use lifecapsule::memory::types::{Mood, SubscriptionTier, UserProfile};
use lifecapsule::store::RecordStore;

fn count(profile: &UserProfile, badge: &str) -> usize {
    profile.badges.iter().filter(|b| *b == badge).count()
}

#[test]
fn level_tracks_xp_through_every_operation() {
    let mut journal = helpers::sqlite_journal();
    let check = |p: &UserProfile| assert_eq!(p.current_level(), p.xp_points / 100 + 1);

    for i in 0..6 {
        let o = journal
            .capture_memory(new_memory("a memory", None, &[]), day(1 + i))
            .unwrap();
        check(&o.profile);
        let o = journal.record_chat("hello", "hi", at(1 + i, 10)).unwrap();
        check(&o.profile);
        let o = journal.grant_xp(37).unwrap();
        check(&o.profile);
    }
    check(&journal.profile().unwrap());
}

#[test]
fn seventh_memory_grants_week_warrior_exactly_once() {
    let mut journal = helpers::sqlite_journal();
    let mut last = None;
    for i in 0..7 {
        last = Some(
            journal
                .capture_memory(new_memory("daily entry", None, &[]), day(1 + i))
                .unwrap(),
        );
    }
    let outcome = last.unwrap();
    assert_eq!(outcome.profile.streak_count, 7);
    assert_eq!(outcome.new_badges, vec![WEEK_WARRIOR]);
    assert_eq!(count(&outcome.profile, WEEK_WARRIOR), 1);

    let after = journal
        .capture_memory(new_memory("eighth", None, &[]), day(8))
        .unwrap();
    assert_eq!(count(&after.profile, WEEK_WARRIOR), 1);
}

#[test]
fn thirtieth_memory_grants_month_master() {
    let engine = GamificationEngine::default();
    let mut profile = UserProfile::new_default("1");
    profile.streak_count = 29;
    let next = engine.record_memory_event(&profile, day(1));
    assert_eq!(next.streak_count, 30);
    assert!(next.badges.contains(MONTH_MASTER));
}

#[test]
fn chat_champion_after_five_chats_is_not_duplicated() {
    let mut journal = helpers::sqlite_journal();
    for i in 0..5 {
        journal.record_chat("hey", "hello", at(2, 8 + i)).unwrap();
    }
    let profile = journal.profile().unwrap();
    assert_eq!(profile.daily_chat_count, 5);
    assert_eq!(count(&profile, CHAT_CHAMPION), 1);

    let sixth = journal.record_chat("again", "hello", at(2, 14)).unwrap();
    assert!(sixth.new_badges.is_empty());
    assert_eq!(count(&sixth.profile, CHAT_CHAMPION), 1);
}

#[test]
fn level_up_is_granted_once_for_the_lifetime() {
    let mut journal = helpers::sqlite_journal();
    let first = journal.grant_xp(100).unwrap();
    assert_eq!(first.profile.xp_points, 100);
    assert_eq!(first.profile.current_level(), 2);
    assert_eq!(count(&first.profile, LEVEL_UP), 1);

    let second = journal.grant_xp(100).unwrap();
    assert_eq!(second.profile.current_level(), 3);
    assert_eq!(count(&second.profile, LEVEL_UP), 1);
}

#[test]
fn free_limit_rejects_without_writing() {
    let mut journal = helpers::sqlite_journal();
    for i in 0..10 {
        journal.record_chat("hi", "hello", at(3, i)).unwrap();
    }
    let before = journal.profile().unwrap();

    let err = journal.record_chat("one more", "nope", at(3, 12)).unwrap_err();
    assert!(err.is_rejection());
    assert!(matches!(err, Error::ChatLimitReached { limit: 10 }));

    assert_eq!(journal.profile().unwrap(), before);
    assert_eq!(journal.store().list_chats().unwrap().len(), 10);
}

#[test]
fn upgrading_lifts_the_limit() {
    let mut journal = helpers::sqlite_journal();
    for i in 0..10 {
        journal.record_chat("hi", "hello", at(4, i)).unwrap();
    }
    journal.set_subscription(SubscriptionTier::Premium).unwrap();
    journal.record_chat("premium now", "welcome", at(4, 12)).unwrap();
    assert_eq!(journal.profile().unwrap().daily_chat_count, 11);
    assert_eq!(journal.chats_remaining(day(4)).unwrap(), None);
}

#[test]
fn capsules_open_only_on_or_after_their_date() {
    let mut journal = helpers::sqlite_journal();
    let created = journal
        .create_capsule("Did you finish the novel?", day(20), day(1))
        .unwrap();
    assert_eq!(created.new_badges, vec![FUTURE_THINKER]);
    let id = created.record.id;

    let err = journal.unlock_capsule(&id, day(19)).unwrap_err();
    assert!(matches!(err, Error::CapsuleLocked { unlock_date } if unlock_date == day(20)));

    // The store refuses as well, whatever the caller claims.
    let err = journal.store_mut().unlock_capsule(&id, day(10)).unwrap_err();
    assert!(matches!(err, Error::CapsuleLocked { .. }));

    let opened = journal.unlock_capsule(&id, day(21)).unwrap();
    assert!(opened.is_unlocked);
    assert_eq!(opened.message, "Did you finish the novel?");
}

#[test]
fn missing_records_are_reported_as_not_found() {
    let mut journal = helpers::sqlite_journal();
    assert!(journal.get_memory("missing").unwrap_err().is_not_found());
    assert!(journal.unlock_capsule("missing", day(1)).unwrap_err().is_not_found());
    assert!(journal.delete_capsule("missing").unwrap_err().is_not_found());
    assert!(journal.delete_memory("missing").unwrap_err().is_not_found());
}

#[test]
fn memories_filter_by_text_tag_and_mood() {
    let mut journal = helpers::sqlite_journal();
    journal
        .capture_memory(memory_on(1, "Hiking with Sam", Some(Mood::Happy), &["outdoors", "friends"]), day(1))
        .unwrap();
    journal
        .capture_memory(memory_on(2, "Rainy day indoors", Some(Mood::Calm), &["home"]), day(2))
        .unwrap();
    journal
        .capture_memory(memory_on(3, "Dinner with friends", None, &["friends"]), day(3))
        .unwrap();

    let friends = journal
        .memories(&MemoryFilter {
            tags: vec!["friends".into()],
            ..Default::default()
        })
        .unwrap();
    assert_eq!(friends.len(), 2);

    let calm = journal
        .memories(&MemoryFilter {
            mood: Some(Mood::Calm),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(calm.len(), 1);

    let hiking = journal
        .memories(&MemoryFilter {
            query: Some("hiking".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(hiking[0].text, "Hiking with Sam");

    assert_eq!(journal.tags().unwrap(), vec!["outdoors", "friends", "home"]);
}

#[test]
fn tags_are_listed_oldest_memory_first_on_both_stores() {
    let mut sqlite = helpers::sqlite_journal();
    let mut memory = helpers::memory_journal();
    for (d, tags) in [(4, &["late"][..]), (2, &["early", "shared"][..]), (3, &["shared", "mid"][..])] {
        let text = format!("day {d}");
        sqlite.capture_memory(memory_on(d, &text, None, tags), day(d)).unwrap();
        memory.capture_memory(memory_on(d, &text, None, tags), day(d)).unwrap();
    }

    let expected = vec!["early", "shared", "mid", "late"];
    assert_eq!(sqlite.tags().unwrap(), expected);
    assert_eq!(memory.tags().unwrap(), expected);
}

#[test]
fn tags_with_commas_read_back_unchanged_on_both_stores() {
    let mut sqlite = helpers::sqlite_journal();
    let mut memory = helpers::memory_journal();
    let tags = &["Paris, France", "trip"];

    let saved = sqlite.capture_memory(memory_on(1, "trip", None, tags), day(1)).unwrap();
    let kept = memory.capture_memory(memory_on(1, "trip", None, tags), day(1)).unwrap();

    let from_sqlite = sqlite.get_memory(&saved.record.id).unwrap().tags;
    let from_memory = memory.get_memory(&kept.record.id).unwrap().tags;
    assert_eq!(from_sqlite, saved.record.tags);
    assert_eq!(from_sqlite, from_memory);
    assert_eq!(from_sqlite.iter().collect::<Vec<_>>(), vec!["Paris, France", "trip"]);
    assert_eq!(sqlite.tags().unwrap(), vec!["Paris, France", "trip"]);
}

#[test]
fn stats_keep_ready_capsules_out_of_locked() {
    let mut journal = helpers::memory_journal();
    journal.create_capsule("soon", day(3), day(1)).unwrap();
    journal.create_capsule("later", day(20), day(1)).unwrap();
    let opened = journal.create_capsule("opened", day(2), day(1)).unwrap().record.id;
    journal.unlock_capsule(&opened, day(2)).unwrap();

    let stats = journal.stats(day(5)).unwrap();
    assert_eq!(stats.capsules_ready, 1);
    assert_eq!(stats.capsules_locked, 1);
    assert_eq!(stats.capsules_unlocked, 1);
}

#[test]
fn chat_history_alternates_speakers() {
    let mut journal = helpers::sqlite_journal();
    journal.record_chat("first", "one", at(5, 9)).unwrap();
    journal.record_chat("second", "two", at(5, 10)).unwrap();

    let history = journal.chat_history().unwrap();
    assert_eq!(history.len(), 4);
    assert!(history.iter().step_by(2).all(|m| m.from_user));
    assert!(history.iter().skip(1).step_by(2).all(|m| !m.from_user));
    assert_eq!((history[1].timestamp - history[0].timestamp).num_seconds(), 30);
}

#[test]
fn stats_summarize_the_journal() {
    let mut journal = helpers::sqlite_journal();
    journal
        .capture_memory(new_memory("Got the keys", Some(Mood::Excited), &["home"]), day(1))
        .unwrap();
    journal.record_chat("I'm so excited", "yay", at(1, 12)).unwrap();
    let id = journal.create_capsule("open me", day(3), day(1)).unwrap().record.id;
    journal.unlock_capsule(&id, day(3)).unwrap();

    let stats = journal.stats(day(3)).unwrap();
    assert_eq!(stats.total_memories, 1);
    assert_eq!(stats.chat_exchanges, 1);
    assert_eq!(stats.capsules_unlocked, 1);
    assert_eq!(stats.capsules_locked, 0);
    assert_eq!(stats.by_mood["excited"], 1);
    assert_eq!(stats.xp_points, 40);
    assert!(stats.badges.contains(&FUTURE_THINKER.to_string()));
}

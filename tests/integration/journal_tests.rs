// =================================
// tests/integration/journal_tests.rs
// =================================
//! Journal entries saved, listed, migrated and summarized through `AppState`
use crate::test_utils::{day, draft, register_test_user, setup_test_state, setup_test_state_with};
use chrono::{TimeDelta, TimeZone, Utc};
use moodlog_common::EntryDraft;
use moodlog_core::config::Settings;
use moodlog_core::entries::EntryStore;
use moodlog_core::validation::ENTRY_MAX_LENGTH;
use std::time::Duration;

#[tokio::test]
async fn test_saved_entry_is_sanitized() {
    let state = setup_test_state();
    let uid = register_test_user(&state).await.unwrap();

    let mut input = draft(
        "2024-03-01",
        " 😌 ",
        "  Felt <b>good</b> & rested <script>x</script> ",
    );
    input.prompt = Some("What <i>mattered</i> today?".to_string());
    input.mattered = true;

    let entry = state.journal.save_entry(&uid, input).await.unwrap();
    assert_eq!(entry.text, "Felt good &amp; rested x");
    assert_eq!(entry.prompt, "What mattered today?");
    assert_eq!(entry.mood, "😌");
    assert!(entry.mattered);
    assert_eq!(entry.user_id, uid);
    assert_eq!(entry.date, "2024-03-01");

    let stored = state
        .journal
        .store()
        .get(&uid, "2024-03-01")
        .await
        .unwrap()
        .expect("entry stored under its date");
    assert_eq!(stored, entry);
}

#[tokio::test]
async fn test_oversized_entry_is_rejected() {
    let state = setup_test_state();

    let too_long = "a".repeat(ENTRY_MAX_LENGTH + 1);
    let err = state
        .journal
        .save_entry("u1", draft("2024-03-01", "😌", &too_long))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Entry text is too long (max 500 characters)");
    assert!(state.journal.entries("u1").await.unwrap().is_empty());

    let mut long_prompt = draft("2024-03-01", "😌", "fine");
    long_prompt.prompt = Some("?".repeat(201));
    let err = state.journal.save_entry("u1", long_prompt).await.unwrap_err();
    assert_eq!(err.user_message(), "Prompt is too long (max 200 characters)");
}

#[tokio::test]
async fn test_invalid_date_is_rejected() {
    let state = setup_test_state();
    let err = state
        .journal
        .save_entry("u1", draft("March 1st", "😌", "x"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VAL_001");
}

#[tokio::test]
async fn test_resaving_a_day_keeps_created_at() {
    let state = setup_test_state();

    let first = state
        .journal
        .save_entry("u1", draft("2024-03-01", "😔", "first draft"))
        .await
        .unwrap();
    let second = state
        .journal
        .save_entry("u1", draft("2024-03-01", "😌", "second draft"))
        .await
        .unwrap();

    assert_eq!(second.created_at, first.created_at);
    assert!(second.timestamp >= first.timestamp);
    assert_eq!(second.text, "second draft");

    let entries = state.journal.entries("u1").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].mood, "😌");
}

#[tokio::test]
async fn test_draft_created_at_wins() {
    let state = setup_test_state();
    let created_at = Utc.with_ymd_and_hms(2023, 12, 31, 22, 0, 0).unwrap();

    let mut input = draft("2023-12-31", "🙂", "from the device");
    input.created_at = Some(created_at);
    let entry = state.journal.save_entry("u1", input).await.unwrap();
    assert_eq!(entry.created_at, created_at);
}

#[tokio::test]
async fn test_entries_are_newest_first_and_per_user() {
    let state = setup_test_state();

    for date in ["2024-03-01", "2024-03-03", "2024-03-02"] {
        state
            .journal
            .save_entry("u1", draft(date, "😌", date))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    state
        .journal
        .save_entry("u2", draft("2024-03-05", "😡", "other user"))
        .await
        .unwrap();

    let dates: Vec<String> = state
        .journal
        .entries("u1")
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.date)
        .collect();
    // Ordered by write time, most recent first
    assert_eq!(dates, vec!["2024-03-02", "2024-03-03", "2024-03-01"]);

    assert_eq!(state.journal.entries("u2").await.unwrap().len(), 1);
    assert!(state.journal.entries("").await.is_err());
}

#[tokio::test]
async fn test_delete_entry() {
    let state = setup_test_state();
    state
        .journal
        .save_entry("u1", draft("2024-03-01", "😌", "x"))
        .await
        .unwrap();

    state.journal.delete_entry("u1", "2024-03-01").await.unwrap();
    assert!(state.journal.entries("u1").await.unwrap().is_empty());

    // Deleting a missing entry is not an error
    state.journal.delete_entry("u1", "2024-03-01").await.unwrap();
}

#[tokio::test]
async fn test_migrate_local_entries_counts_outcomes() {
    let state = setup_test_state();

    let drafts = vec![
        draft("2024-02-01", "😌", "ok"),
        draft("2024-02-02", "", "missing mood"),
        draft("2024-02-03", "🙂", &"x".repeat(ENTRY_MAX_LENGTH + 1)),
        draft("2024-02-04", "😔", "also ok"),
        EntryDraft::default(),
    ];

    let report = state.journal.migrate_local_entries("u1", drafts).await;
    assert_eq!(report.success, 2);
    assert_eq!(report.errors, 3);
    assert_eq!(state.journal.entries("u1").await.unwrap().len(), 2);

    let report = state
        .journal
        .migrate_local_entries("", vec![draft("2024-02-01", "😌", "ok")])
        .await;
    assert_eq!((report.success, report.errors), (0, 0));
}

#[tokio::test]
async fn test_recent_moods_uses_configured_window() {
    let state = setup_test_state_with(Settings {
        stats_window_days: 7,
        ..Settings::default()
    });

    for (date, mood) in [
        ("2024-03-10", "😌"),
        ("2024-03-08", "😌"),
        ("2024-03-04", "😔"),
        ("2024-03-03", "😡"),
        ("2024-02-20", "😡"),
    ] {
        state
            .journal
            .save_entry("u1", draft(date, mood, ""))
            .await
            .unwrap();
    }

    let counts = state.recent_moods("u1", day(2024, 3, 10)).await.unwrap();
    assert_eq!(counts.get("😌"), Some(&2));
    assert_eq!(counts.get("😔"), Some(&1));
    assert_eq!(counts.get("😡"), None);

    let all = state
        .journal
        .mood_counts("u1", day(2024, 3, 10), 365)
        .await
        .unwrap();
    assert_eq!(all.get("😡"), Some(&2));
}

#[tokio::test]
async fn test_current_streak_counts_consecutive_days() {
    let state = setup_test_state();
    let today = day(2024, 3, 10);

    for offset in 0..3 {
        let date = today - TimeDelta::days(offset);
        let mut input = draft(&date.format("%Y-%m-%d").to_string(), "😌", "");
        input.created_at = Some(Utc.from_utc_datetime(&date.and_hms_opt(20, 0, 0).unwrap()));
        state.journal.save_entry("u1", input).await.unwrap();
    }
    // Gap on the 7th, then an older entry
    let mut older = draft("2024-03-06", "😌", "");
    older.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 6, 9, 0, 0).unwrap());
    state.journal.save_entry("u1", older).await.unwrap();

    assert_eq!(state.journal.current_streak("u1", today).await.unwrap(), 3);
    assert_eq!(
        state.journal.current_streak("u1", day(2024, 3, 11)).await.unwrap(),
        0
    );
}

// ============================
// crates/core/src/entries.rs
// ============================
//! Journal entry storage abstraction and the service that guards it.
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use dashmap::DashMap;
use metrics::counter;
use moodlog_common::{EntryDraft, JournalEntry, MigrationReport};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::metrics::{ENTRY_DELETED, ENTRY_REJECTED, ENTRY_SAVED};
use crate::validation::{sanitize_text, ValidationError, ENTRY_MAX_LENGTH, PROMPT_MAX_LENGTH};

/// Entry dates are calendar days in this format; the date is the document id
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Trait for per-user entry collections
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Insert or replace the entry stored under `entry.date`
    async fn put(&self, user_id: &str, entry: JournalEntry) -> Result<(), AppError>;

    async fn get(&self, user_id: &str, date: &str) -> Result<Option<JournalEntry>, AppError>;

    /// Remove an entry. Removing a missing entry is not an error.
    async fn remove(&self, user_id: &str, date: &str) -> Result<(), AppError>;

    /// All entries for a user, in no particular order
    async fn list(&self, user_id: &str) -> Result<Vec<JournalEntry>, AppError>;
}

/// In-memory implementation of the `EntryStore` trait
#[derive(Clone, Debug, Default)]
pub struct MemoryEntryStore {
    collections: Arc<DashMap<String, BTreeMap<String, JournalEntry>>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn put(&self, user_id: &str, entry: JournalEntry) -> Result<(), AppError> {
        self.collections
            .entry(user_id.to_owned())
            .or_default()
            .insert(entry.date.clone(), entry);
        Ok(())
    }

    async fn get(&self, user_id: &str, date: &str) -> Result<Option<JournalEntry>, AppError> {
        Ok(self
            .collections
            .get(user_id)
            .and_then(|entries| entries.get(date).cloned()))
    }

    async fn remove(&self, user_id: &str, date: &str) -> Result<(), AppError> {
        if let Some(mut entries) = self.collections.get_mut(user_id) {
            entries.remove(date);
        }
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<JournalEntry>, AppError> {
        Ok(self
            .collections
            .get(user_id)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }
}

/// Validates and sanitizes entries before they reach the store
#[derive(Clone, Debug)]
pub struct JournalService<S> {
    store: S,
}

impl<S: EntryStore> JournalService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save or update the entry for `draft.date`
    pub async fn save_entry(
        &self,
        user_id: &str,
        draft: EntryDraft,
    ) -> Result<JournalEntry, AppError> {
        let prepared = match prepare(user_id, &draft) {
            Ok(prepared) => prepared,
            Err(err) => {
                counter!(ENTRY_REJECTED).increment(1);
                return Err(err);
            },
        };

        let now = Utc::now();
        let created_at = match draft.created_at {
            Some(created_at) => created_at,
            None => self
                .store
                .get(user_id, &prepared.date)
                .await?
                .map(|existing| existing.created_at)
                .unwrap_or(now),
        };

        let entry = JournalEntry {
            date: prepared.date,
            text: prepared.text,
            mood: prepared.mood,
            mattered: draft.mattered,
            prompt: prepared.prompt,
            user_id: user_id.to_owned(),
            timestamp: now,
            created_at,
        };

        self.store.put(user_id, entry.clone()).await?;
        counter!(ENTRY_SAVED).increment(1);
        debug!(date = %entry.date, "entry saved");
        Ok(entry)
    }

    pub async fn delete_entry(&self, user_id: &str, date: &str) -> Result<(), AppError> {
        require(user_id, "User ID")?;
        require(date, "Entry date")?;

        self.store.remove(user_id, date).await?;
        counter!(ENTRY_DELETED).increment(1);
        debug!(date, "entry deleted");
        Ok(())
    }

    /// Entries for a user, most recently written first
    pub async fn entries(&self, user_id: &str) -> Result<Vec<JournalEntry>, AppError> {
        require(user_id, "User ID")?;
        let mut entries = self.store.list(user_id).await?;
        entries.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.date.cmp(&a.date))
        });
        Ok(entries)
    }

    /// Import locally cached drafts one by one, counting outcomes
    pub async fn migrate_local_entries(
        &self,
        user_id: &str,
        drafts: Vec<EntryDraft>,
    ) -> MigrationReport {
        let mut report = MigrationReport::default();
        if user_id.trim().is_empty() {
            return report;
        }

        for draft in drafts {
            let date = draft.date.clone();
            match self.save_entry(user_id, draft).await {
                Ok(_) => report.success += 1,
                Err(err) => {
                    warn!(date = %date, error = %err, "failed to migrate entry");
                    report.errors += 1;
                },
            }
        }

        report
    }

    /// How often each mood appears in the `window_days` days ending at `today`
    pub async fn mood_counts(
        &self,
        user_id: &str,
        today: NaiveDate,
        window_days: u32,
    ) -> Result<BTreeMap<String, usize>, AppError> {
        let mut counts = BTreeMap::new();
        if window_days == 0 {
            return Ok(counts);
        }

        let cutoff = today
            .checked_sub_days(Days::new(u64::from(window_days - 1)))
            .unwrap_or(NaiveDate::MIN);

        for entry in self.entries(user_id).await? {
            let Ok(date) = parse_entry_date(&entry.date) else {
                continue;
            };
            if date >= cutoff {
                *counts.entry(entry.mood).or_insert(0) += 1;
            }
        }

        Ok(counts)
    }

    /// Consecutive days with an entry, counting back from `today`.
    ///
    /// Only entries written on the day they describe count; backdated entries
    /// do not extend a streak. No entry today means no streak.
    pub async fn current_streak(&self, user_id: &str, today: NaiveDate) -> Result<u32, AppError> {
        let days: HashSet<NaiveDate> = self
            .entries(user_id)
            .await?
            .into_iter()
            .filter_map(|entry| {
                let date = parse_entry_date(&entry.date).ok()?;
                (entry.created_at.date_naive() == date).then_some(date)
            })
            .collect();

        let mut streak = 0;
        let mut day = today;
        while days.contains(&day) {
            streak += 1;
            match day.pred_opt() {
                Some(previous) => day = previous,
                None => break,
            }
        }

        Ok(streak)
    }
}

struct PreparedEntry {
    date: String,
    text: String,
    mood: String,
    prompt: String,
}

fn prepare(user_id: &str, draft: &EntryDraft) -> Result<PreparedEntry, AppError> {
    require(user_id, "User ID")?;
    require(&draft.date, "Entry date")?;
    let date = parse_entry_date(&draft.date)?;
    require(&draft.mood, "Mood")?;

    let text = sanitize_text(draft.text.trim(), ENTRY_MAX_LENGTH).map_err(|_| {
        AppError::InvalidInput(format!(
            "Entry text is too long (max {ENTRY_MAX_LENGTH} characters)"
        ))
    })?;
    let prompt = sanitize_text(draft.prompt.as_deref().unwrap_or_default(), PROMPT_MAX_LENGTH)
        .map_err(|_| {
            AppError::InvalidInput(format!(
                "Prompt is too long (max {PROMPT_MAX_LENGTH} characters)"
            ))
        })?;

    Ok(PreparedEntry {
        date: date.format(ENTRY_DATE_FORMAT).to_string(),
        text,
        mood: draft.mood.trim().to_owned(),
        prompt,
    })
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` entry date
pub fn parse_entry_date(date: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(date.trim(), ENTRY_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(date.to_owned()))
}

//! Caller-owned ledger cache with optimistic concurrency.
//!
//! Every day record carries a revision token. Writers read a record and
//! its revision, modify a copy, and commit against the revision they
//! read; a mismatch means someone else committed in between and the
//! caller must re-read. `apply` wraps that read-modify-write cycle for
//! the common single-writer path.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::subscription::{LedgerDelta, SubscriptionHandle, SubscriptionRegistry};
use crate::error::StoreError;
use crate::habit::HabitKind;
use crate::ledger::{DayRecord, Ledger};

/// A value paired with its optimistic-concurrency revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub value: T,
    pub revision: u64,
}

/// Inclusive date range filter for subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self { start: None, end: None }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn since(start: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// In-memory ledger cache the caller owns.
///
/// Unknown dates read as an empty record at revision 0, so first writes
/// commit against revision 0 without a separate existence check.
#[derive(Default)]
pub struct LedgerCache {
    days: BTreeMap<NaiveDate, Versioned<DayRecord>>,
    registry: SubscriptionRegistry,
}

impl LedgerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache from a plain ledger snapshot at revision 1.
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            days: ledger
                .iter()
                .map(|(date, record)| {
                    (
                        *date,
                        Versioned {
                            value: record.clone(),
                            revision: 1,
                        },
                    )
                })
                .collect(),
            registry: SubscriptionRegistry::new(),
        }
    }

    /// Read a record copy with its revision token.
    pub fn read(&self, date: NaiveDate) -> Versioned<DayRecord> {
        self.days.get(&date).cloned().unwrap_or(Versioned {
            value: DayRecord::new(),
            revision: 0,
        })
    }

    /// Current revision for a date (0 when never written).
    pub fn revision(&self, date: NaiveDate) -> u64 {
        self.days.get(&date).map(|v| v.revision).unwrap_or(0)
    }

    /// Commit a record against the revision the writer read.
    ///
    /// On success the stored revision bumps by one and subscribers in
    /// range are notified; on a token mismatch nothing changes and the
    /// caller gets the actual revision to re-read from.
    pub fn commit(
        &mut self,
        date: NaiveDate,
        expected_revision: u64,
        record: DayRecord,
    ) -> Result<u64, StoreError> {
        let actual = self.revision(date);
        if actual != expected_revision {
            return Err(StoreError::RevisionConflict {
                date,
                expected: expected_revision,
                actual,
            });
        }
        let revision = actual + 1;
        self.days.insert(
            date,
            Versioned {
                value: record.clone(),
                revision,
            },
        );
        self.registry.notify(&LedgerDelta {
            date,
            record,
            revision,
        });
        Ok(revision)
    }

    /// Read-modify-write in one step. Cannot conflict because the cache
    /// is exclusively borrowed for the duration.
    pub fn apply<F>(&mut self, date: NaiveDate, f: F) -> Result<u64, StoreError>
    where
        F: FnOnce(&mut DayRecord),
    {
        let mut versioned = self.read(date);
        f(&mut versioned.value);
        self.commit(date, versioned.revision, versioned.value)
    }

    /// Idempotent completion write. Re-applying the current value is a
    /// no-op: no revision bump, no notification.
    pub fn set_completion(
        &mut self,
        date: NaiveDate,
        kind: HabitKind,
        habit_id: &str,
        completed: bool,
    ) -> Result<u64, StoreError> {
        let versioned = self.read(date);
        if versioned.value.is_completed(kind, habit_id) == completed {
            return Ok(versioned.revision);
        }
        let mut record = versioned.value;
        record.set(kind, habit_id, completed);
        self.commit(date, versioned.revision, record)
    }

    /// Flip a completion flag; returns the new completed state.
    pub fn toggle(
        &mut self,
        date: NaiveDate,
        kind: HabitKind,
        habit_id: &str,
    ) -> Result<bool, StoreError> {
        let mut now_completed = false;
        self.apply(date, |record| {
            now_completed = record.toggle(kind, habit_id);
        })?;
        Ok(now_completed)
    }

    /// Subscribe to committed changes for dates within `range`.
    pub fn subscribe<F>(&mut self, range: DateRange, callback: F) -> SubscriptionHandle
    where
        F: FnMut(&LedgerDelta) + Send + 'static,
    {
        self.registry.subscribe(range, callback)
    }

    /// Plain ledger snapshot for the analytics functions.
    pub fn snapshot(&self) -> Ledger {
        self.days
            .iter()
            .map(|(date, versioned)| (*date, versioned.value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

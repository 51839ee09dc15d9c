//! The completion ledger: date-keyed daily records.
//!
//! A record stores the set of habit ids completed that day, per
//! partition. Ids that no longer resolve against the catalog are kept as
//! they are; history never gets pruned when habits are archived or
//! removed. Analytics treat a `&Ledger` as a read-only snapshot.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::habit::HabitKind;

/// Render a date as its `YYYY-MM-DD` ledger key.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` ledger key.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDateKey(key.to_string()))
}

/// Completions for one calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(default)]
    pub morning: BTreeSet<String>,
    #[serde(default)]
    pub evening: BTreeSet<String>,
}

impl DayRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// The completed-id set for a partition.
    pub fn completed(&self, kind: HabitKind) -> &BTreeSet<String> {
        match kind {
            HabitKind::Morning => &self.morning,
            HabitKind::Evening => &self.evening,
        }
    }

    fn completed_mut(&mut self, kind: HabitKind) -> &mut BTreeSet<String> {
        match kind {
            HabitKind::Morning => &mut self.morning,
            HabitKind::Evening => &mut self.evening,
        }
    }

    pub fn is_completed(&self, kind: HabitKind, habit_id: &str) -> bool {
        self.completed(kind).contains(habit_id)
    }

    /// Set a completion flag. Idempotent; returns whether anything changed.
    pub fn set(&mut self, kind: HabitKind, habit_id: &str, completed: bool) -> bool {
        let set = self.completed_mut(kind);
        if completed {
            set.insert(habit_id.to_string())
        } else {
            set.remove(habit_id)
        }
    }

    /// Flip a completion flag; returns the new state.
    pub fn toggle(&mut self, kind: HabitKind, habit_id: &str) -> bool {
        let now_completed = !self.is_completed(kind, habit_id);
        self.set(kind, habit_id, now_completed);
        now_completed
    }

    pub fn completed_count(&self, kind: HabitKind) -> usize {
        self.completed(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.morning.is_empty() && self.evening.is_empty()
    }
}

/// Date-indexed completion history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    days: BTreeMap<NaiveDate, DayRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    /// The record for a date, created lazily on first use.
    pub fn record_mut(&mut self, date: NaiveDate) -> &mut DayRecord {
        self.days.entry(date).or_default()
    }

    pub fn insert(&mut self, date: NaiveDate, record: DayRecord) {
        self.days.insert(date, record);
    }

    /// Idempotent completion write; returns whether anything changed.
    pub fn set_completion(
        &mut self,
        date: NaiveDate,
        kind: HabitKind,
        habit_id: &str,
        completed: bool,
    ) -> bool {
        self.record_mut(date).set(kind, habit_id, completed)
    }

    pub fn toggle(&mut self, date: NaiveDate, kind: HabitKind, habit_id: &str) -> bool {
        self.record_mut(date).toggle(kind, habit_id)
    }

    /// Ascending iteration over (date, record) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayRecord)> {
        self.days.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.keys()
    }

    /// Sub-ledger snapshot covering `start..=end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Ledger {
        Ledger {
            days: self
                .days
                .range(start..=end)
                .map(|(d, r)| (*d, r.clone()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<(NaiveDate, DayRecord)> for Ledger {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, DayRecord)>>(iter: T) -> Self {
        Ledger {
            days: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_key_round_trip() {
        let d = date(2024, 3, 7);
        assert_eq!(date_key(d), "2024-03-07");
        assert_eq!(parse_date_key("2024-03-07").unwrap(), d);
        assert!(parse_date_key("03/07/2024").is_err());
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut record = DayRecord::new();
        assert!(record.set(HabitKind::Morning, "a", true));
        assert!(!record.set(HabitKind::Morning, "a", true));
        assert_eq!(record.completed_count(HabitKind::Morning), 1);

        assert!(record.set(HabitKind::Morning, "a", false));
        assert!(!record.set(HabitKind::Morning, "a", false));
        assert!(record.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut record = DayRecord::new();
        assert!(record.toggle(HabitKind::Evening, "a"));
        assert!(record.is_completed(HabitKind::Evening, "a"));
        assert!(!record.toggle(HabitKind::Evening, "a"));
        assert!(!record.is_completed(HabitKind::Evening, "a"));
    }

    #[test]
    fn test_partitions_are_independent() {
        let mut record = DayRecord::new();
        record.set(HabitKind::Morning, "a", true);
        assert!(!record.is_completed(HabitKind::Evening, "a"));
    }

    #[test]
    fn test_ledger_lazy_record_creation() {
        let mut ledger = Ledger::new();
        assert!(ledger.get(date(2024, 1, 1)).is_none());
        ledger.set_completion(date(2024, 1, 1), HabitKind::Morning, "a", true);
        assert_eq!(ledger.len(), 1);
        assert!(ledger
            .get(date(2024, 1, 1))
            .is_some_and(|r| r.is_completed(HabitKind::Morning, "a")));
    }

    #[test]
    fn test_between_is_inclusive() {
        let mut ledger = Ledger::new();
        for day in 1..=5 {
            ledger.set_completion(date(2024, 1, day), HabitKind::Morning, "a", true);
        }
        let slice = ledger.between(date(2024, 1, 2), date(2024, 1, 4));
        assert_eq!(slice.len(), 3);
        assert!(slice.get(date(2024, 1, 1)).is_none());
    }

    #[test]
    fn test_serde_uses_date_string_keys() {
        let mut ledger = Ledger::new();
        ledger.set_completion(date(2024, 1, 2), HabitKind::Morning, "a", true);
        let json = serde_json::to_string(&ledger).unwrap();
        assert!(json.contains("\"2024-01-02\""));
        let back: Ledger = serde_json::from_str(&json).unwrap();
        assert!(back
            .get(date(2024, 1, 2))
            .is_some_and(|r| r.is_completed(HabitKind::Morning, "a")));
    }
}

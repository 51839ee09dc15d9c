//! Completion counts and rates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habit::{Catalog, HabitKind};
use crate::ledger::{DayRecord, Ledger};
use crate::schedule::days_in_month;
use crate::stats::percentage;

/// Completed/total/percentage for one partition (or the overall sum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionStats {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

impl PartitionStats {
    fn new(completed: usize, total: usize) -> Self {
        Self {
            completed,
            total,
            percentage: percentage(completed, total),
        }
    }
}

/// Per-partition and overall completion stats for a single day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DayStats {
    pub morning: PartitionStats,
    pub evening: PartitionStats,
    pub overall: PartitionStats,
}

/// Count of a record's ids that resolve against the active catalog.
/// Orphaned ids stay in the record but never inflate the numbers.
fn known_completed(record: &DayRecord, catalog: &Catalog, kind: HabitKind) -> usize {
    catalog
        .active(kind)
        .iter()
        .filter(|h| record.is_completed(kind, &h.id))
        .count()
}

/// Day-level completion stats against the current active catalog.
pub fn completion_stats(record: &DayRecord, catalog: &Catalog) -> DayStats {
    let morning_total = catalog.active_len(HabitKind::Morning);
    let evening_total = catalog.active_len(HabitKind::Evening);
    let morning_done = known_completed(record, catalog, HabitKind::Morning);
    let evening_done = known_completed(record, catalog, HabitKind::Evening);

    DayStats {
        morning: PartitionStats::new(morning_done, morning_total),
        evening: PartitionStats::new(evening_done, evening_total),
        overall: PartitionStats::new(morning_done + evening_done, morning_total + evening_total),
    }
}

/// How often one habit was completed across the ledger snapshot, as a
/// rounded percentage of `total_days`. Zero days means zero percent.
pub fn habit_completion_rate(
    ledger: &Ledger,
    habit_id: &str,
    kind: HabitKind,
    total_days: u32,
) -> u32 {
    if total_days == 0 {
        return 0;
    }
    let completed = ledger
        .iter()
        .filter(|(_, record)| record.is_completed(kind, habit_id))
        .count();
    percentage(completed, total_days as usize)
}

/// Aggregate completion rate over a period:
/// `completed / (active habits * days)`, rounded. Zero denominator is 0.
pub fn overall_rate(ledger: &Ledger, catalog: &Catalog, days_in_period: u32) -> u32 {
    let total = catalog.total_active() * days_in_period as usize;
    if total == 0 {
        return 0;
    }
    let completed: usize = ledger
        .iter()
        .map(|(_, record)| {
            known_completed(record, catalog, HabitKind::Morning)
                + known_completed(record, catalog, HabitKind::Evening)
        })
        .sum();
    percentage(completed, total)
}

/// One point of the per-day AM/PM completion series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DailyCompletion {
    pub day: u32,
    pub date: NaiveDate,
    pub morning_pct: u32,
    pub evening_pct: u32,
}

/// Per-day completion percentages for a month prefix, one point per day
/// from the 1st through `through_day` (clamped to the month's length).
/// Days without a ledger entry contribute zeros.
pub fn completion_series(
    ledger: &Ledger,
    catalog: &Catalog,
    year: i32,
    month: u32,
    through_day: u32,
) -> Vec<DailyCompletion> {
    let last = through_day.min(days_in_month(year, month));
    let morning_total = catalog.active_len(HabitKind::Morning);
    let evening_total = catalog.active_len(HabitKind::Evening);

    (1..=last)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day).map(|date| (day, date)))
        .map(|(day, date)| {
            let (morning_done, evening_done) = match ledger.get(date) {
                Some(record) => (
                    known_completed(record, catalog, HabitKind::Morning),
                    known_completed(record, catalog, HabitKind::Evening),
                ),
                None => (0, 0),
            };
            DailyCompletion {
                day,
                date,
                morning_pct: percentage(morning_done, morning_total),
                evening_pct: percentage(evening_done, evening_total),
            }
        })
        .collect()
}

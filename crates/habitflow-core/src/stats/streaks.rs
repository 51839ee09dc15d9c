//! Current and best streak calculations.
//!
//! Full completion is judged against the current active catalog, not a
//! historical snapshot, so adding or archiving habits retroactively
//! changes whether old days count. That mirrors the product's behavior
//! and is deliberate; see DESIGN.md.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::habit::{Catalog, Habit, HabitKind};
use crate::ledger::{DayRecord, Ledger};

/// Backward walks stop after this many days regardless of data gaps.
const MAX_WALK_DAYS: u64 = 366;

/// Whether every active habit of both partitions is completed.
/// An empty partition counts as complete.
pub fn day_fully_completed(record: &DayRecord, catalog: &Catalog) -> bool {
    HabitKind::ALL.iter().all(|kind| {
        catalog
            .active(*kind)
            .iter()
            .all(|h| record.is_completed(*kind, &h.id))
    })
}

/// Length of the most recent run of fully-completed days at or before
/// `today`.
///
/// Walks backward day by day, skipping in-progress, unlogged, or failed
/// days until a full day is found; once the run has started any failing
/// day ends the walk. An in-progress today therefore reports the ongoing
/// streak instead of breaking it, and a lapse of a day or two still
/// surfaces the last run rather than zero.
pub fn current_streak(ledger: &Ledger, catalog: &Catalog, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    for i in 0..MAX_WALK_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(i)) else {
            break;
        };
        let full = ledger
            .get(date)
            .is_some_and(|record| day_fully_completed(record, catalog));
        if full {
            streak += 1;
        } else if streak == 0 {
            continue;
        } else {
            break;
        }
    }
    streak
}

/// Longest run of consecutive fully-completed days anywhere in the
/// ledger. Dates missing from the ledger break runs.
pub fn best_streak(ledger: &Ledger, catalog: &Catalog) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for (date, record) in ledger.iter() {
        let contiguous = prev
            .and_then(|p| p.checked_add_days(Days::new(1)))
            .is_some_and(|next| next == *date);
        if day_fully_completed(record, catalog) {
            run = if contiguous { run + 1 } else { 1 };
            best = best.max(run);
        } else {
            run = 0;
        }
        prev = Some(*date);
    }
    best
}

/// Current and best streak for a single habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStreaks {
    pub current: u32,
    pub best: u32,
}

/// Per-habit streaks over a backward 366-day window from `today`.
/// The current streak finds the most recent run the same way
/// [`current_streak`] does; the best streak treats any unlogged or
/// uncompleted day as a break.
pub fn habit_streaks(ledger: &Ledger, habit: &Habit, today: NaiveDate) -> HabitStreaks {
    let completed_on = |date: NaiveDate| {
        ledger
            .get(date)
            .is_some_and(|record| record.is_completed(habit.kind, &habit.id))
    };

    let mut current = 0u32;
    for i in 0..MAX_WALK_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(i)) else {
            break;
        };
        if completed_on(date) {
            current += 1;
        } else if current == 0 {
            continue;
        } else {
            break;
        }
    }

    let mut best = 0u32;
    let mut run = 0u32;
    for i in 0..MAX_WALK_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(i)) else {
            break;
        };
        if completed_on(date) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }

    HabitStreaks { current, best }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Recurrence;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// One morning habit "m", one evening habit "e".
    fn small_catalog() -> (Catalog, String, String) {
        let mut catalog = Catalog::new();
        let today = date(2024, 1, 1);
        let m = catalog
            .add("m", HabitKind::Morning, Recurrence::Daily, today)
            .unwrap()
            .id
            .clone();
        let e = catalog
            .add("e", HabitKind::Evening, Recurrence::Daily, today)
            .unwrap()
            .id
            .clone();
        (catalog, m, e)
    }

    fn full_day(ledger: &mut Ledger, d: NaiveDate, m: &str, e: &str) {
        ledger.set_completion(d, HabitKind::Morning, m, true);
        ledger.set_completion(d, HabitKind::Evening, e, true);
    }

    #[test]
    fn test_day_fully_completed() {
        let (catalog, m, e) = small_catalog();
        let mut record = DayRecord::new();
        assert!(!day_fully_completed(&record, &catalog));
        record.set(HabitKind::Morning, &m, true);
        assert!(!day_fully_completed(&record, &catalog));
        record.set(HabitKind::Evening, &e, true);
        assert!(day_fully_completed(&record, &catalog));
    }

    #[test]
    fn test_empty_partition_counts_as_complete() {
        let mut catalog = Catalog::new();
        let m = catalog
            .add("m", HabitKind::Morning, Recurrence::Daily, date(2024, 1, 1))
            .unwrap()
            .id
            .clone();
        let mut record = DayRecord::new();
        record.set(HabitKind::Morning, &m, true);
        assert!(day_fully_completed(&record, &catalog));
    }

    #[test]
    fn test_current_streak_three_full_days() {
        let (catalog, m, e) = small_catalog();
        let mut ledger = Ledger::new();
        for day in 1..=3 {
            full_day(&mut ledger, date(2024, 1, day), &m, &e);
        }
        assert_eq!(current_streak(&ledger, &catalog, date(2024, 1, 3)), 3);
    }

    #[test]
    fn test_current_streak_exempts_in_progress_today() {
        let (catalog, m, e) = small_catalog();
        let mut ledger = Ledger::new();
        full_day(&mut ledger, date(2024, 1, 1), &m, &e);
        full_day(&mut ledger, date(2024, 1, 2), &m, &e);
        // today only half done
        ledger.set_completion(date(2024, 1, 3), HabitKind::Morning, &m, true);

        assert_eq!(current_streak(&ledger, &catalog, date(2024, 1, 3)), 2);
    }

    #[test]
    fn test_current_streak_unlogged_today() {
        let (catalog, m, e) = small_catalog();
        let mut ledger = Ledger::new();
        full_day(&mut ledger, date(2024, 1, 1), &m, &e);
        full_day(&mut ledger, date(2024, 1, 2), &m, &e);

        assert_eq!(current_streak(&ledger, &catalog, date(2024, 1, 3)), 2);
    }

    #[test]
    fn test_current_streak_breaks_on_failed_yesterday() {
        let (catalog, m, e) = small_catalog();
        let mut ledger = Ledger::new();
        full_day(&mut ledger, date(2024, 1, 1), &m, &e);
        // Jan 2nd half done, Jan 3rd full
        ledger.set_completion(date(2024, 1, 2), HabitKind::Morning, &m, true);
        full_day(&mut ledger, date(2024, 1, 3), &m, &e);

        assert_eq!(current_streak(&ledger, &catalog, date(2024, 1, 3)), 1);
    }

    #[test]
    fn test_current_streak_survives_gap_days_before_run() {
        // Last full run ended two days ago; both gap days are skipped
        // and the run itself is reported.
        let (catalog, m, e) = small_catalog();
        let mut ledger = Ledger::new();
        for day in 3..=5 {
            full_day(&mut ledger, date(2024, 1, day), &m, &e);
        }
        assert_eq!(current_streak(&ledger, &catalog, date(2024, 1, 7)), 3);
    }

    #[test]
    fn test_current_streak_stops_at_first_break_inside_run() {
        let (catalog, m, e) = small_catalog();
        let mut ledger = Ledger::new();
        full_day(&mut ledger, date(2024, 1, 1), &m, &e);
        // gap on the 2nd
        for day in 3..=5 {
            full_day(&mut ledger, date(2024, 1, day), &m, &e);
        }
        assert_eq!(current_streak(&ledger, &catalog, date(2024, 1, 7)), 3);
    }

    #[test]
    fn test_current_streak_empty_ledger() {
        let (catalog, _m, _e) = small_catalog();
        assert_eq!(current_streak(&Ledger::new(), &catalog, date(2024, 1, 3)), 0);
    }

    #[test]
    fn test_current_streak_terminates_on_sparse_history() {
        // Data only far in the past must not loop past the walk bound.
        let (catalog, m, e) = small_catalog();
        let mut ledger = Ledger::new();
        full_day(&mut ledger, date(2020, 1, 1), &m, &e);
        assert_eq!(current_streak(&ledger, &catalog, date(2024, 1, 3)), 0);
    }

    #[test]
    fn test_best_streak_gap_breaks_run() {
        let (catalog, m, e) = small_catalog();
        let mut ledger = Ledger::new();
        // run of 2
        full_day(&mut ledger, date(2024, 1, 1), &m, &e);
        full_day(&mut ledger, date(2024, 1, 2), &m, &e);
        // gap on the 3rd
        for day in 4..=6 {
            full_day(&mut ledger, date(2024, 1, day), &m, &e);
        }
        assert_eq!(best_streak(&ledger, &catalog), 3);
    }

    #[test]
    fn test_best_streak_partial_day_breaks_run() {
        let (catalog, m, e) = small_catalog();
        let mut ledger = Ledger::new();
        full_day(&mut ledger, date(2024, 1, 1), &m, &e);
        ledger.set_completion(date(2024, 1, 2), HabitKind::Morning, &m, true);
        full_day(&mut ledger, date(2024, 1, 3), &m, &e);
        full_day(&mut ledger, date(2024, 1, 4), &m, &e);

        assert_eq!(best_streak(&ledger, &catalog), 2);
    }

    #[test]
    fn test_best_streak_empty() {
        let (catalog, _m, _e) = small_catalog();
        assert_eq!(best_streak(&Ledger::new(), &catalog), 0);
    }

    #[test]
    fn test_habit_streaks() {
        let (catalog, m, _e) = small_catalog();
        let habit = catalog.get(&m).unwrap().clone();
        let mut ledger = Ledger::new();
        // completed the 1st-2nd and 4th-6th, today the 7th not yet logged
        for day in [1, 2, 4, 5, 6] {
            ledger.set_completion(date(2024, 1, day), HabitKind::Morning, &m, true);
        }

        let streaks = habit_streaks(&ledger, &habit, date(2024, 1, 7));
        assert_eq!(streaks.current, 3);
        assert_eq!(streaks.best, 3);

        let streaks = habit_streaks(&ledger, &habit, date(2024, 1, 6));
        assert_eq!(streaks.current, 3);

        // two unlogged days between today and the last run
        let streaks = habit_streaks(&ledger, &habit, date(2024, 1, 8));
        assert_eq!(streaks.current, 3);
    }

    #[test]
    fn test_catalog_growth_reinterprets_history() {
        // Known simplification: adding a habit later retroactively breaks
        // previously full days.
        let (mut catalog, m, e) = small_catalog();
        let mut ledger = Ledger::new();
        full_day(&mut ledger, date(2024, 1, 1), &m, &e);
        assert_eq!(best_streak(&ledger, &catalog), 1);

        catalog
            .add("new", HabitKind::Morning, Recurrence::Daily, date(2024, 1, 2))
            .unwrap();
        assert_eq!(best_streak(&ledger, &catalog), 0);
    }
}

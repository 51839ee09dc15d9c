//! Exponential habit-strength scoring.
//!
//! Strength grows 5% of the remaining headroom on each completed day and
//! decays 10% on each missed one, giving slow buildup and faster loss.
//! Only days with ledger entries feed the model.

use serde::{Deserialize, Serialize};

use crate::habit::{Catalog, HabitKind};
use crate::ledger::Ledger;
use crate::schedule::days_in_month;
use chrono::NaiveDate;

const GROWTH_RATE: f64 = 0.05;
const DECAY_RATE: f64 = 0.1;
const MAX_STRENGTH: f64 = 100.0;

/// Qualitative strength band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthStatus {
    Mastered,
    Strong,
    Building,
    Fragile,
}

impl StrengthStatus {
    fn for_strength(strength: u32) -> Self {
        match strength {
            81.. => StrengthStatus::Mastered,
            51..=80 => StrengthStatus::Strong,
            21..=50 => StrengthStatus::Building,
            _ => StrengthStatus::Fragile,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrengthStatus::Mastered => "mastered",
            StrengthStatus::Strong => "strong",
            StrengthStatus::Building => "building",
            StrengthStatus::Fragile => "fragile",
        }
    }
}

/// Strength score 0..=100 with its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStrength {
    pub strength: u32,
    pub status: StrengthStatus,
}

/// Fold a completion sequence (oldest first) into a strength score.
pub fn habit_strength(completions: &[bool]) -> HabitStrength {
    let mut strength = 0.0f64;
    for completed in completions {
        if *completed {
            strength = (strength + (MAX_STRENGTH - strength) * GROWTH_RATE).min(MAX_STRENGTH);
        } else {
            strength = (strength - strength * DECAY_RATE).max(0.0);
        }
    }
    let strength = strength.round() as u32;
    HabitStrength {
        strength,
        status: StrengthStatus::for_strength(strength),
    }
}

/// Strength row for one habit over a month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyStrength {
    pub habit_id: String,
    pub name: String,
    pub kind: HabitKind,
    pub strength: u32,
    pub status: StrengthStatus,
}

/// Per-habit strength over the logged days of a month prefix.
/// Days without ledger entries are skipped, not counted as misses.
pub fn monthly_strengths(
    ledger: &Ledger,
    catalog: &Catalog,
    year: i32,
    month: u32,
    through_day: u32,
) -> Vec<MonthlyStrength> {
    let last = through_day.min(days_in_month(year, month));
    let month_records: Vec<_> = (1..=last)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .filter_map(|date| ledger.get(date))
        .collect();

    catalog
        .iter_active()
        .map(|habit| {
            let completions: Vec<bool> = month_records
                .iter()
                .map(|record| record.is_completed(habit.kind, &habit.id))
                .collect();
            let score = habit_strength(&completions);
            MonthlyStrength {
                habit_id: habit.id.clone(),
                name: habit.name.clone(),
                kind: habit.kind,
                strength: score.strength,
                status: score.status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Recurrence;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_sequence_is_fragile_zero() {
        let score = habit_strength(&[]);
        assert_eq!(score.strength, 0);
        assert_eq!(score.status, StrengthStatus::Fragile);
    }

    #[test]
    fn test_growth_and_decay() {
        let one = habit_strength(&[true]);
        assert_eq!(one.strength, 5); // 5% of headroom

        let two = habit_strength(&[true, true]);
        assert_eq!(two.strength, 10); // 5 + 95*0.05 = 9.75 -> 10

        let up_down = habit_strength(&[true, false]);
        assert_eq!(up_down.strength, 5); // 5 - 0.5 = 4.5 -> 5 (rounded)
    }

    #[test]
    fn test_status_bands() {
        assert_eq!(StrengthStatus::for_strength(0), StrengthStatus::Fragile);
        assert_eq!(StrengthStatus::for_strength(20), StrengthStatus::Fragile);
        assert_eq!(StrengthStatus::for_strength(21), StrengthStatus::Building);
        assert_eq!(StrengthStatus::for_strength(51), StrengthStatus::Strong);
        assert_eq!(StrengthStatus::for_strength(81), StrengthStatus::Mastered);
        assert_eq!(StrengthStatus::for_strength(100), StrengthStatus::Mastered);
    }

    #[test]
    fn test_long_run_approaches_max_band() {
        let completions = vec![true; 60];
        let score = habit_strength(&completions);
        assert!(score.strength > 90);
        assert_eq!(score.status, StrengthStatus::Mastered);
    }

    #[test]
    fn test_monthly_strengths_skip_unlogged_days() {
        let mut catalog = Catalog::new();
        let id = catalog
            .add("a", HabitKind::Morning, Recurrence::Daily, date(2024, 1, 1))
            .unwrap()
            .id
            .clone();

        let mut ledger = Ledger::new();
        ledger.set_completion(date(2024, 1, 1), HabitKind::Morning, &id, true);
        ledger.set_completion(date(2024, 1, 5), HabitKind::Morning, &id, true);

        let rows = monthly_strengths(&ledger, &catalog, 2024, 1, 31);
        assert_eq!(rows.len(), 1);
        // two logged days, both completed: same as habit_strength(&[true, true])
        assert_eq!(rows[0].strength, 10);
    }
}

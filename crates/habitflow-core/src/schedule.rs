//! Recurrence rules and due-date evaluation.
//!
//! A habit without an explicit schedule is due every day. Evaluation is
//! date-only: interval rules difference whole calendar days, never local
//! wall-clock time, so daylight-saving transitions cannot shift a due
//! date by one.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::habit::{Catalog, Habit, HabitKind};

/// Weekday abbreviations indexed 0=Sunday..6=Saturday.
pub const DAY_ABBREV: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// When a habit is due.
///
/// Unrecognized rule tags deserialize to `Unknown`, which is never due;
/// a corrupt or future-version rule must not take the evaluator down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recurrence {
    /// Due every calendar date.
    #[default]
    Daily,
    /// Due on the listed weekdays (0=Sunday..6=Saturday).
    Weekly { days_of_week: BTreeSet<u8> },
    /// Due every N days counted from an anchor date; not due before it.
    Interval {
        every_n_days: u32,
        anchor_date: NaiveDate,
    },
    /// Due on the listed days of the month. Days a short month lacks
    /// simply never match; there is no rollover.
    Monthly { days_of_month: BTreeSet<u8> },
    #[serde(other)]
    Unknown,
}

impl Recurrence {
    /// Whether the rule makes a habit due on `date`. Pure and total.
    pub fn is_due(&self, date: NaiveDate) -> bool {
        match self {
            Recurrence::Daily => true,
            Recurrence::Weekly { days_of_week } => {
                days_of_week.contains(&(date.weekday().num_days_from_sunday() as u8))
            }
            Recurrence::Interval {
                every_n_days,
                anchor_date,
            } => {
                if *every_n_days == 0 || date < *anchor_date {
                    return false;
                }
                let elapsed = date.signed_duration_since(*anchor_date).num_days();
                elapsed % i64::from(*every_n_days) == 0
            }
            Recurrence::Monthly { days_of_month } => {
                days_of_month.contains(&(date.day() as u8))
            }
            Recurrence::Unknown => false,
        }
    }

    /// Human-readable label for display lists.
    pub fn label(&self) -> String {
        match self {
            Recurrence::Daily => "Daily".to_string(),
            Recurrence::Weekly { days_of_week } => {
                if days_of_week.len() == 7 {
                    return "Daily".to_string();
                }
                if days_of_week.is_empty() {
                    return "Never".to_string();
                }
                let weekdays: BTreeSet<u8> = (1..=5).collect();
                if *days_of_week == weekdays {
                    return "Weekdays".to_string();
                }
                let weekend: BTreeSet<u8> = [0u8, 6].into_iter().collect();
                if *days_of_week == weekend {
                    return "Weekends".to_string();
                }
                days_of_week
                    .iter()
                    .filter_map(|d| DAY_ABBREV.get(*d as usize).copied())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
            Recurrence::Interval {
                every_n_days,
                anchor_date,
            } => format!("Every {every_n_days} days from {anchor_date}"),
            Recurrence::Monthly { days_of_month } => {
                let days = days_of_month
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Monthly on {days}")
            }
            Recurrence::Unknown => "Unknown".to_string(),
        }
    }
}

/// Habits of both partitions that match a predicate for a given date.
#[derive(Debug, Clone, Serialize)]
pub struct DuePartition {
    pub morning: Vec<Habit>,
    pub evening: Vec<Habit>,
}

impl DuePartition {
    pub fn of(&self, kind: HabitKind) -> &[Habit] {
        match kind {
            HabitKind::Morning => &self.morning,
            HabitKind::Evening => &self.evening,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.morning.is_empty() && self.evening.is_empty()
    }
}

fn partition_by<F: Fn(&Habit) -> bool>(catalog: &Catalog, keep: F) -> DuePartition {
    let collect = |kind: HabitKind| {
        catalog
            .active(kind)
            .into_iter()
            .filter(|h| keep(h))
            .cloned()
            .collect()
    };
    DuePartition {
        morning: collect(HabitKind::Morning),
        evening: collect(HabitKind::Evening),
    }
}

/// Active habits due on `date`, per partition.
///
/// A habit created after `date` is still evaluated purely by its rule;
/// there is no automatic "did not exist yet" exclusion.
pub fn due_habits(catalog: &Catalog, date: NaiveDate) -> DuePartition {
    partition_by(catalog, |h| h.schedule.is_due(date))
}

/// The complement of [`due_habits`] within the active catalog.
pub fn not_due_habits(catalog: &Catalog, date: NaiveDate) -> DuePartition {
    partition_by(catalog, |h| !h.schedule.is_due(date))
}

/// Number of days in a Gregorian month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    (28..=31u32)
        .rev()
        .find(|d| NaiveDate::from_ymd_opt(year, month, *d).is_some())
        .unwrap_or(28)
}

/// How many dates in `year`-`month`, up to and including `through_day`,
/// the rule is due on. Used for expected-vs-actual monthly comparisons.
pub fn expected_completions_in_month(
    rule: &Recurrence,
    year: i32,
    month: u32,
    through_day: u32,
) -> u32 {
    let last = through_day.min(days_in_month(year, month));
    (1..=last)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|date| rule.is_due(*date))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_always_due() {
        assert!(Recurrence::Daily.is_due(date(2024, 1, 1)));
        assert!(Recurrence::Daily.is_due(date(2024, 2, 29)));
    }

    #[test]
    fn test_weekly_matches_day_set() {
        // Mon/Wed/Fri
        let rule = Recurrence::Weekly {
            days_of_week: [1u8, 3, 5].into_iter().collect(),
        };
        // 2024-01-01 is a Monday
        assert!(rule.is_due(date(2024, 1, 1)));
        assert!(!rule.is_due(date(2024, 1, 2)));
        assert!(rule.is_due(date(2024, 1, 3)));
        assert!(!rule.is_due(date(2024, 1, 7)));
    }

    #[test]
    fn test_interval_every_three_days() {
        let rule = Recurrence::Interval {
            every_n_days: 3,
            anchor_date: date(2024, 1, 1),
        };
        assert!(rule.is_due(date(2024, 1, 1)));
        assert!(!rule.is_due(date(2024, 1, 2)));
        assert!(!rule.is_due(date(2024, 1, 3)));
        assert!(rule.is_due(date(2024, 1, 4)));
        assert!(rule.is_due(date(2024, 1, 7)));
    }

    #[test]
    fn test_interval_not_due_before_anchor() {
        let rule = Recurrence::Interval {
            every_n_days: 3,
            anchor_date: date(2024, 1, 10),
        };
        assert!(!rule.is_due(date(2024, 1, 9)));
        assert!(rule.is_due(date(2024, 1, 10)));
    }

    #[test]
    fn test_interval_zero_period_never_due() {
        let rule = Recurrence::Interval {
            every_n_days: 0,
            anchor_date: date(2024, 1, 1),
        };
        assert!(!rule.is_due(date(2024, 1, 1)));
    }

    #[test]
    fn test_interval_spans_dst_transition() {
        // US DST starts 2024-03-10; date-only arithmetic must not skew.
        let rule = Recurrence::Interval {
            every_n_days: 2,
            anchor_date: date(2024, 3, 8),
        };
        assert!(rule.is_due(date(2024, 3, 10)));
        assert!(!rule.is_due(date(2024, 3, 11)));
        assert!(rule.is_due(date(2024, 3, 12)));
    }

    #[test]
    fn test_monthly_short_month_never_matches() {
        let rule = Recurrence::Monthly {
            days_of_month: [31u8].into_iter().collect(),
        };
        assert!(rule.is_due(date(2024, 1, 31)));
        // April has 30 days; no rollover to the 30th or May 1st
        assert!(!rule.is_due(date(2024, 4, 30)));
        assert!(!rule.is_due(date(2024, 5, 1)));
    }

    #[test]
    fn test_unknown_rule_never_due() {
        let rule: Recurrence =
            serde_json::from_str(r#"{"type":"lunar_phase","phase":"full"}"#).unwrap();
        assert_eq!(rule, Recurrence::Unknown);
        assert!(!rule.is_due(date(2024, 1, 1)));
    }

    #[test]
    fn test_missing_schedule_deserializes_daily() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            #[serde(default)]
            schedule: Recurrence,
        }
        let w: Wrapper = serde_json::from_str("{}").unwrap();
        assert_eq!(w.schedule, Recurrence::Daily);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Recurrence::Daily.label(), "Daily");
        let weekdays = Recurrence::Weekly {
            days_of_week: (1..=5).collect(),
        };
        assert_eq!(weekdays.label(), "Weekdays");
        let weekend = Recurrence::Weekly {
            days_of_week: [0u8, 6].into_iter().collect(),
        };
        assert_eq!(weekend.label(), "Weekends");
        let mwf = Recurrence::Weekly {
            days_of_week: [1u8, 3, 5].into_iter().collect(),
        };
        assert_eq!(mwf.label(), "Mon, Wed, Fri");
        let interval = Recurrence::Interval {
            every_n_days: 3,
            anchor_date: date(2024, 1, 1),
        };
        assert_eq!(interval.label(), "Every 3 days from 2024-01-01");
    }

    #[test]
    fn test_due_habits_excludes_archived() {
        use crate::habit::Catalog;

        let today = date(2024, 1, 1);
        let mut catalog = Catalog::new();
        let a = catalog
            .add("a", HabitKind::Morning, Recurrence::Daily, today)
            .unwrap()
            .id
            .clone();
        catalog
            .add("b", HabitKind::Morning, Recurrence::Daily, today)
            .unwrap();
        catalog.archive(&a).unwrap();

        let due = due_habits(&catalog, today);
        assert_eq!(due.morning.len(), 1);
        assert_eq!(due.morning[0].name, "b");
        assert!(not_due_habits(&catalog, today).is_empty());
    }

    #[test]
    fn test_expected_completions_in_month() {
        // Mondays in January 2024: 1, 8, 15, 22, 29
        let mondays = Recurrence::Weekly {
            days_of_week: [1u8].into_iter().collect(),
        };
        assert_eq!(expected_completions_in_month(&mondays, 2024, 1, 31), 5);
        assert_eq!(expected_completions_in_month(&mondays, 2024, 1, 14), 2);
        assert_eq!(expected_completions_in_month(&Recurrence::Daily, 2024, 2, 40), 29);
    }

    proptest! {
        #[test]
        fn prop_daily_is_always_due(days in 0u64..20000) {
            let d = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
                + chrono::Days::new(days);
            prop_assert!(Recurrence::Daily.is_due(d));
        }

        #[test]
        fn prop_weekly_matches_weekday_membership(
            days in 0u64..20000,
            set in proptest::collection::btree_set(0u8..7, 0..7),
        ) {
            let d = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
                + chrono::Days::new(days);
            let rule = Recurrence::Weekly { days_of_week: set.clone() };
            let weekday = d.weekday().num_days_from_sunday() as u8;
            prop_assert_eq!(rule.is_due(d), set.contains(&weekday));
        }

        #[test]
        fn prop_interval_due_iff_multiple_of_period(
            offset in 0i64..1000,
            n in 1u32..60,
        ) {
            let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let d = anchor + chrono::Days::new(offset as u64);
            let rule = Recurrence::Interval { every_n_days: n, anchor_date: anchor };
            prop_assert_eq!(rule.is_due(d), offset % i64::from(n) == 0);
        }

        #[test]
        fn prop_monthly_never_matches_absent_day(
            days in 0u64..20000,
            day in 1u8..=31,
        ) {
            let d = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
                + chrono::Days::new(days);
            let rule = Recurrence::Monthly {
                days_of_month: [day].into_iter().collect(),
            };
            prop_assert_eq!(rule.is_due(d), d.day() == u32::from(day));
        }
    }
}

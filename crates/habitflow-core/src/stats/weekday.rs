//! Day-of-week completion patterns.

use chrono::Datelike;
use serde::Serialize;

use crate::habit::{Catalog, HabitKind};
use crate::ledger::Ledger;
use crate::schedule::DAY_ABBREV;
use crate::stats::percentage;

/// Completion rate for one weekday (0=Sunday..6=Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekdayRate {
    pub weekday: u8,
    pub name: &'static str,
    pub rate: u32,
}

/// Completion percentage bucketed by weekday across the ledger snapshot.
/// Only dates present in the ledger contribute to the denominators.
pub fn weekday_rates(ledger: &Ledger, catalog: &Catalog) -> [WeekdayRate; 7] {
    let total_per_day = catalog.total_active();
    let mut completed = [0usize; 7];
    let mut possible = [0usize; 7];

    for (date, record) in ledger.iter() {
        let idx = date.weekday().num_days_from_sunday() as usize;
        possible[idx] += total_per_day;
        completed[idx] += HabitKind::ALL
            .iter()
            .map(|kind| {
                catalog
                    .active(*kind)
                    .iter()
                    .filter(|h| record.is_completed(*kind, &h.id))
                    .count()
            })
            .sum::<usize>();
    }

    std::array::from_fn(|i| WeekdayRate {
        weekday: i as u8,
        name: DAY_ABBREV[i],
        rate: percentage(completed[i], possible[i]),
    })
}

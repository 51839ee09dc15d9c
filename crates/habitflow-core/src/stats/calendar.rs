//! Calendar heatmap bucketing.
//!
//! Produces a flat cell sequence for a month: leading empty placeholders
//! for the weekdays before the 1st (Sunday-first week), then one cell per
//! day carrying completion counts and a discrete intensity level 0..=5.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::habit::{Catalog, HabitKind};
use crate::ledger::Ledger;
use crate::schedule::days_in_month;

/// One day cell of the heatmap grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    /// Completions across both partitions.
    pub completed: usize,
    /// Active habits across both partitions.
    pub total: usize,
    /// Intensity bucket 0..=5.
    pub level: u8,
    pub is_today: bool,
}

impl DayCell {
    /// Heatmap character for terminal rendering, one glyph per level.
    /// Fully-completed days get a check mark instead of the densest block
    /// so the 100% bucket stays distinguishable from 75%+.
    pub fn heat_char(&self) -> char {
        match self.level {
            0 => '·',
            1 => '░',
            2 => '▒',
            3 => '▓',
            4 => '█',
            _ => '✓',
        }
    }
}

/// A grid slot: either a leading placeholder or a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cell", rename_all = "snake_case")]
pub enum CalendarCell {
    Empty,
    Day(DayCell),
}

impl CalendarCell {
    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            CalendarCell::Day(cell) => Some(cell),
            CalendarCell::Empty => None,
        }
    }
}

/// Intensity bucket for a completion ratio. Thresholds are checked in
/// ascending order so exact boundary values land on the higher level.
fn level_for(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = completed as f64 / total as f64 * 100.0;
    let mut level = 0;
    if pct > 0.0 {
        level = 1;
    }
    if pct >= 25.0 {
        level = 2;
    }
    if pct >= 50.0 {
        level = 3;
    }
    if pct >= 75.0 {
        level = 4;
    }
    if completed == total {
        level = 5;
    }
    level
}

/// Heatmap cells for one month.
///
/// The leading `Empty` count equals the weekday index of the 1st
/// (Sunday = 0), so chunking the result into rows of seven gives the
/// familiar calendar layout.
pub fn calendar_grid(
    ledger: &Ledger,
    catalog: &Catalog,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<Vec<CalendarCell>, ValidationError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(ValidationError::InvalidMonth { year, month })?;
    let leading = first.weekday().num_days_from_sunday() as usize;
    let total = catalog.total_active();

    let mut cells = Vec::with_capacity(leading + 31);
    cells.extend((0..leading).map(|_| CalendarCell::Empty));

    for day in 1..=days_in_month(year, month) {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        let completed = ledger
            .get(date)
            .map(|record| {
                HabitKind::ALL
                    .iter()
                    .map(|kind| {
                        catalog
                            .active(*kind)
                            .iter()
                            .filter(|h| record.is_completed(*kind, &h.id))
                            .count()
                    })
                    .sum::<usize>()
            })
            .unwrap_or(0);

        cells.push(CalendarCell::Day(DayCell {
            day,
            date,
            completed,
            total,
            level: level_for(completed, total),
            is_today: date == today,
        }));
    }
    Ok(cells)
}

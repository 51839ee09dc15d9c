//! # Habitflow Core Library
//!
//! Habit scheduling and completion analytics. The engine itself is pure:
//! given a habit catalog and a date-keyed completion ledger snapshot, it
//! decides which habits are due, reduces history into streaks and rates,
//! and buckets days into calendar heatmap levels. No I/O happens inside
//! the analytics; persistence and change notification live in the
//! caller-owned [`store`] layer.
//!
//! ## Key Components
//!
//! - [`Recurrence`]: when a habit is due (daily / weekly / interval / monthly)
//! - [`Catalog`]: the morning/evening habit lists
//! - [`Ledger`]: date-keyed completion records
//! - [`stats`]: streaks, rates, calendar heatmap, weekday patterns
//! - [`store::LedgerCache`]: versioned cache with explicit subscriptions

pub mod error;
pub mod habit;
pub mod ledger;
pub mod schedule;
pub mod stats;
pub mod store;

pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use habit::{Catalog, Habit, HabitKind};
pub use ledger::{date_key, parse_date_key, DayRecord, Ledger};
pub use schedule::{due_habits, not_due_habits, DuePartition, Recurrence};
pub use stats::{
    best_streak, calendar_grid, completion_stats, current_streak, habit_completion_rate,
    habit_streaks, overall_rate, CalendarCell, DayStats, HabitStreaks,
};
pub use store::{Config, JsonStore, LedgerCache};

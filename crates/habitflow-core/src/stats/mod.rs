//! Completion analytics over ledger snapshots.
//!
//! Everything in here is pure and total: zero denominators produce `0`,
//! never an error, and inputs are read-only snapshots supplied by the
//! caller.

pub mod calendar;
pub mod completion;
pub mod insights;
pub mod streaks;
pub mod strength;
pub mod weekday;

pub use calendar::{calendar_grid, CalendarCell, DayCell};
pub use insights::{
    completion_trend, correlation_matrix, moving_average, CorrelationMatrix, HabitCorrelation,
    Trend, TrendDirection,
};
pub use completion::{
    completion_series, completion_stats, habit_completion_rate, overall_rate, DailyCompletion,
    DayStats, PartitionStats,
};
pub use streaks::{best_streak, current_streak, habit_streaks, HabitStreaks};
pub use strength::{habit_strength, monthly_strengths, HabitStrength, MonthlyStrength, StrengthStatus};
pub use weekday::{weekday_rates, WeekdayRate};

/// Rounded integer percentage; `0` when the denominator is zero.
pub(crate) fn percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

use chrono::{Datelike, Days};
use clap::Subcommand;
use habitflow_core::schedule::expected_completions_in_month;
use habitflow_core::stats::{
    completion_series, completion_trend, correlation_matrix, monthly_strengths, weekday_rates,
    DailyCompletion, TrendDirection,
};
use habitflow_core::{
    best_streak, calendar_grid, current_streak, habit_completion_rate, habit_streaks,
    overall_rate, CalendarCell, Config, HabitKind, JsonStore,
};
use serde::Serialize;

use super::{load_catalog_or_seed, today, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Rates, streaks, and per-habit breakdown over a period
    Summary {
        /// Period length in days (default from config)
        #[arg(long)]
        days: Option<u32>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Calendar heatmap for a month
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12
        #[arg(long)]
        month: Option<u32>,
    },
    /// Per-day completion series and expected-vs-actual for a month
    Month {
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12
        #[arg(long)]
        month: Option<u32>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Completion trend and cross-habit correlations
    Insights {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Habit strength scores for the current month
    Strength {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct HabitSummary {
    id: String,
    name: String,
    kind: HabitKind,
    rate: u32,
    current_streak: u32,
    best_streak: u32,
}

#[derive(Serialize)]
struct MonthHabit {
    id: String,
    name: String,
    kind: HabitKind,
    expected: u32,
    actual: u32,
}

#[derive(Serialize)]
struct MonthReport {
    year: i32,
    month: u32,
    days: Vec<DailyCompletion>,
    habits: Vec<MonthHabit>,
}

#[derive(Serialize)]
struct Summary {
    period_days: u32,
    overall_rate: u32,
    current_streak: u32,
    best_streak: u32,
    habits: Vec<HabitSummary>,
}

pub fn run(action: StatsAction) -> CliResult {
    let store = JsonStore::open()?;
    let catalog = load_catalog_or_seed(&store)?;
    let ledger = store.load_ledger()?;
    let config = Config::load()?;
    let today = today();

    match action {
        StatsAction::Summary { days, json } => {
            let days = days.unwrap_or(config.stats_period_days).max(1);
            let start = today
                .checked_sub_days(Days::new(u64::from(days) - 1))
                .unwrap_or(today);
            let period = ledger.between(start, today);

            let habits: Vec<HabitSummary> = catalog
                .iter_active()
                .map(|habit| {
                    let streaks = habit_streaks(&ledger, habit, today);
                    HabitSummary {
                        id: habit.id.clone(),
                        name: habit.name.clone(),
                        kind: habit.kind,
                        rate: habit_completion_rate(&period, &habit.id, habit.kind, days),
                        current_streak: streaks.current,
                        best_streak: streaks.best,
                    }
                })
                .collect();

            let summary = Summary {
                period_days: days,
                overall_rate: overall_rate(&period, &catalog, days),
                current_streak: current_streak(&ledger, &catalog, today),
                best_streak: best_streak(&ledger, &catalog),
                habits,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("last {} days: {}% complete", summary.period_days, summary.overall_rate);
                println!(
                    "streak: {} current, {} best",
                    summary.current_streak, summary.best_streak
                );
                for habit in &summary.habits {
                    println!(
                        "  {:<30} {:>3}%  streak {}/{}",
                        habit.name, habit.rate, habit.current_streak, habit.best_streak
                    );
                }
                let rates = weekday_rates(&period, &catalog);
                let line: Vec<String> =
                    rates.iter().map(|r| format!("{} {}%", r.name, r.rate)).collect();
                println!("by weekday: {}", line.join(", "));
            }
        }
        StatsAction::Calendar { year, month } => {
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            let cells = calendar_grid(&ledger, &catalog, year, month, today)?;

            println!("{year}-{month:02}");
            println!(" Su  Mo  Tu  We  Th  Fr  Sa");
            for week in cells.chunks(7) {
                let row: Vec<String> = week
                    .iter()
                    .map(|cell| match cell {
                        CalendarCell::Empty => "    ".to_string(),
                        CalendarCell::Day(day) => {
                            let marker = if day.is_today { '*' } else { ' ' };
                            format!("{:>2}{}{}", day.day, day.heat_char(), marker)
                        }
                    })
                    .collect();
                println!("{}", row.join(""));
            }
            if config.calendar_legend {
                println!("legend: · 0%  ░ >0%  ▒ 25%+  ▓ 50%+  █ 75%+  ✓ full day");
            }
        }
        StatsAction::Month { year, month, json } => {
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            // past/future months cover all their days; the current month
            // stops at today
            let through_day = if year == today.year() && month == today.month() {
                today.day()
            } else {
                31
            };
            let days = completion_series(&ledger, &catalog, year, month, through_day);

            let habits: Vec<MonthHabit> = catalog
                .iter_active()
                .map(|habit| {
                    let actual = days
                        .iter()
                        .filter(|point| {
                            ledger
                                .get(point.date)
                                .is_some_and(|r| r.is_completed(habit.kind, &habit.id))
                        })
                        .count() as u32;
                    MonthHabit {
                        id: habit.id.clone(),
                        name: habit.name.clone(),
                        kind: habit.kind,
                        expected: expected_completions_in_month(
                            &habit.schedule,
                            year,
                            month,
                            through_day,
                        ),
                        actual,
                    }
                })
                .collect();

            let report = MonthReport { year, month, days, habits };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{year}-{month:02}");
                for point in &report.days {
                    println!(
                        "  {:>2}  am {:>3}%  pm {:>3}%",
                        point.day, point.morning_pct, point.evening_pct
                    );
                }
                println!("expected vs actual:");
                for habit in &report.habits {
                    println!(
                        "  {:<30} {}/{}",
                        habit.name, habit.actual, habit.expected
                    );
                }
            }
        }
        StatsAction::Insights { json } => {
            let trend = completion_trend(&ledger, &catalog);
            let correlations = correlation_matrix(&ledger, &catalog);

            if json {
                #[derive(Serialize)]
                struct Insights {
                    trend: habitflow_core::stats::Trend,
                    correlations: Option<habitflow_core::stats::CorrelationMatrix>,
                }
                let report = Insights { trend, correlations };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                match trend.direction {
                    TrendDirection::InsufficientData => {
                        println!("trend: not enough logged days yet");
                    }
                    direction => {
                        println!(
                            "trend: {:?}, {} pp/day (avg {}%, confidence {:.2}{})",
                            direction,
                            trend.slope,
                            trend.avg_rate,
                            trend.confidence,
                            if trend.reliable { "" } else { ", low" }
                        );
                    }
                }
                match correlations {
                    None => println!("correlations: need 21 logged days and two habits"),
                    Some(matrix) if matrix.significant.is_empty() => {
                        println!("correlations: no significant pairs");
                    }
                    Some(matrix) => {
                        for pair in &matrix.significant {
                            println!(
                                "  {} + {}: phi {:+.2} ({:?}, p={})",
                                pair.name_a, pair.name_b, pair.phi, pair.strength, pair.p_value
                            );
                        }
                    }
                }
            }
        }
        StatsAction::Strength { json } => {
            let rows = monthly_strengths(&ledger, &catalog, today.year(), today.month(), today.day());
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!("  {:<30} {:>3}  {}", row.name, row.strength, row.status.label());
                }
            }
        }
    }
    Ok(())
}

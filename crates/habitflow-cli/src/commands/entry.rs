use clap::Subcommand;
use habitflow_core::{completion_stats, JsonStore, LedgerCache, StoreError, ValidationError};

use super::{load_catalog_or_seed, resolve_date, today, CliResult};

#[derive(Subcommand)]
pub enum EntryAction {
    /// Show the completion record for a date
    Show {
        /// Date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Toggle a habit's completion
    Toggle {
        /// Habit id
        id: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Set a habit's completion explicitly
    Set {
        /// Habit id
        id: String,
        /// "done" or "not-done"
        state: String,
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(action: EntryAction) -> CliResult {
    let store = JsonStore::open()?;
    let catalog = load_catalog_or_seed(&store)?;
    let ledger = store.load_ledger()?;

    match action {
        EntryAction::Show { date, json } => {
            let date = resolve_date(date.as_deref())?;
            let record = ledger.get(date).cloned().unwrap_or_default();
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                let stats = completion_stats(&record, &catalog);
                println!(
                    "{date}: morning {}/{}, evening {}/{}, overall {}%",
                    stats.morning.completed,
                    stats.morning.total,
                    stats.evening.completed,
                    stats.evening.total,
                    stats.overall.percentage
                );
            }
        }
        EntryAction::Toggle { id, date } => {
            let date = resolve_date(date.as_deref())?;
            if date > today() {
                return Err(StoreError::FutureDate(date).into());
            }
            let habit = catalog
                .get(&id)
                .ok_or_else(|| ValidationError::UnknownHabit(id.clone()))?;

            let mut cache = LedgerCache::from_ledger(&ledger);
            let now_completed = cache.toggle(date, habit.kind, &habit.id)?;
            store.save_ledger(&cache.snapshot())?;
            println!(
                "{}: {} is now {}",
                date,
                habit.name,
                if now_completed { "done" } else { "not done" }
            );
        }
        EntryAction::Set { id, state, date } => {
            let date = resolve_date(date.as_deref())?;
            if date > today() {
                return Err(StoreError::FutureDate(date).into());
            }
            let completed = match state.as_str() {
                "done" => true,
                "not-done" => false,
                other => return Err(format!("expected 'done' or 'not-done', got '{other}'").into()),
            };
            let habit = catalog
                .get(&id)
                .ok_or_else(|| ValidationError::UnknownHabit(id.clone()))?;

            let mut cache = LedgerCache::from_ledger(&ledger);
            cache.set_completion(date, habit.kind, &habit.id, completed)?;
            store.save_ledger(&cache.snapshot())?;
            println!("{}: {} set to {}", date, habit.name, state);
        }
    }
    Ok(())
}

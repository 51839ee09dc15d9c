use habitflow_core::{completion_stats, due_habits, not_due_habits, HabitKind, JsonStore};

use super::{load_catalog_or_seed, resolve_date, CliResult};

pub fn run(date: Option<String>) -> CliResult {
    let store = JsonStore::open()?;
    let catalog = load_catalog_or_seed(&store)?;
    let ledger = store.load_ledger()?;

    let date = resolve_date(date.as_deref())?;
    let record = ledger.get(date).cloned().unwrap_or_default();
    let due = due_habits(&catalog, date);
    let off = not_due_habits(&catalog, date);

    println!("{date}");
    for kind in HabitKind::ALL {
        println!("{}:", kind.label());
        for habit in due.of(kind) {
            let mark = if record.is_completed(kind, &habit.id) {
                "x"
            } else {
                " "
            };
            println!("  [{mark}] {}  ({})", habit.name, habit.id);
        }
        for habit in off.of(kind) {
            println!("   -  {}  (not scheduled, {})", habit.name, habit.schedule.label());
        }
    }

    let stats = completion_stats(&record, &catalog);
    println!(
        "completed {}/{} ({}%)",
        stats.overall.completed, stats.overall.total, stats.overall.percentage
    );
    Ok(())
}

use clap::Subcommand;
use habitflow_core::{HabitKind, JsonStore, Recurrence};

use super::{load_catalog_or_seed, today, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a habit
    Add {
        /// Habit name
        name: String,
        /// Partition: morning or evening
        #[arg(long, default_value = "morning")]
        kind: String,
        /// Recurrence rule as JSON, e.g. '{"type":"weekly","days_of_week":[1,3,5]}'
        #[arg(long)]
        schedule: Option<String>,
    },
    /// List habits
    List {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Include archived habits
        #[arg(long)]
        all: bool,
    },
    /// Rename a habit
    Rename { id: String, name: String },
    /// Change a habit's recurrence rule (JSON)
    Schedule { id: String, rule: String },
    /// Archive a habit (soft delete; history is kept)
    Archive { id: String },
    /// Restore an archived habit
    Unarchive { id: String },
    /// Permanently remove a habit
    Rm { id: String },
}

fn parse_rule(json: &str) -> Result<Recurrence, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(json)?)
}

pub fn run(action: HabitAction) -> CliResult {
    let store = JsonStore::open()?;
    let mut catalog = load_catalog_or_seed(&store)?;

    match action {
        HabitAction::Add { name, kind, schedule } => {
            let kind: HabitKind = kind.parse()?;
            let rule = match schedule {
                Some(json) => parse_rule(&json)?,
                None => Recurrence::Daily,
            };
            let habit = catalog.add(&name, kind, rule, today())?;
            println!("added {} ({})", habit.name, habit.id);
            store.save_catalog(&catalog)?;
        }
        HabitAction::List { json, all } => {
            if json {
                let habits: Vec<_> = HabitKind::ALL
                    .iter()
                    .flat_map(|kind| {
                        if all {
                            catalog.all(*kind)
                        } else {
                            catalog.active(*kind)
                        }
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&habits)?);
            } else {
                for kind in HabitKind::ALL {
                    println!("{}:", kind.label());
                    let list = if all { catalog.all(kind) } else { catalog.active(kind) };
                    for habit in list {
                        let archived = if habit.archived { " [archived]" } else { "" };
                        println!(
                            "  {}  {} ({}){}",
                            habit.id,
                            habit.name,
                            habit.schedule.label(),
                            archived
                        );
                    }
                }
            }
        }
        HabitAction::Rename { id, name } => {
            catalog.rename(&id, &name)?;
            println!("renamed {id}");
            store.save_catalog(&catalog)?;
        }
        HabitAction::Schedule { id, rule } => {
            let rule = parse_rule(&rule)?;
            let label = rule.label();
            catalog.reschedule(&id, rule)?;
            println!("rescheduled {id}: {label}");
            store.save_catalog(&catalog)?;
        }
        HabitAction::Archive { id } => {
            catalog.archive(&id)?;
            println!("archived {id}");
            store.save_catalog(&catalog)?;
        }
        HabitAction::Unarchive { id } => {
            catalog.unarchive(&id)?;
            println!("unarchived {id}");
            store.save_catalog(&catalog)?;
        }
        HabitAction::Rm { id } => {
            let habit = catalog.remove(&id)?;
            println!("removed {} ({})", habit.name, habit.id);
            store.save_catalog(&catalog)?;
        }
    }
    Ok(())
}

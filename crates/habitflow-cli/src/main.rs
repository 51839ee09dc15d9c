use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "habitflow-cli", version, about = "Habitflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit catalog management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Daily completion entries
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
    /// Habits due today (or on a given date)
    Today {
        /// Date to show, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Completion analytics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Entry { action } => commands::entry::run(action),
        Commands::Today { date } => commands::today::run(date),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

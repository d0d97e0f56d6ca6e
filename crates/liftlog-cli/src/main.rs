//! liftlog command-line tools.
//!
//! Provides the `liftlog` binary with subcommands for inspecting a workout
//! database directly, without going through the HTTP server. Uses the same
//! `liftlog_core::schedule` functions as the schedule endpoints, ensuring
//! identical results from both entry points.

use std::process;

use chrono::Utc;
use clap::{Parser, Subcommand};

use liftlog_core::schedule::{current_split_day, future_session_dates};
use liftlog_storage::{SqliteStore, UserId, WorkoutStore};

/// Workout tracker tools.
#[derive(Parser)]
#[command(name = "liftlog", about = "Workout tracker tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show today's split day for a user's active program.
    Today {
        /// Path to the database file.
        #[arg(short, long)]
        db: String,

        /// User ID.
        #[arg(short, long)]
        user: i64,
    },
    /// List upcoming training dates for a user's active program.
    Upcoming {
        /// Path to the database file.
        #[arg(short, long)]
        db: String,

        /// User ID.
        #[arg(short, long)]
        user: i64,

        /// Horizon in days.
        #[arg(long, default_value_t = 56)]
        days: u32,
    },
    /// List a user's programs as JSON.
    Programs {
        /// Path to the database file.
        #[arg(short, long)]
        db: String,

        /// User ID.
        #[arg(short, long)]
        user: i64,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Today { db, user } => run_today(&db, user),
        Commands::Upcoming { db, user, days } => run_upcoming(&db, user, days),
        Commands::Programs { db, user } => run_programs(&db, user),
    };
    process::exit(exit_code);
}

/// Opens the store, reporting I/O problems with exit code 3.
fn open_store(db_path: &str) -> Result<SqliteStore, i32> {
    SqliteStore::new(db_path).map_err(|e| {
        eprintln!("Error: failed to open database '{}': {}", db_path, e);
        3
    })
}

/// Execute the today subcommand.
///
/// Returns exit code: 0 = success, 1 = no active program or unknown user,
/// 3 = I/O error.
fn run_today(db_path: &str, user: i64) -> i32 {
    let store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let current = match store.current_program(UserId(user)) {
        Ok(Some(current)) => current,
        Ok(None) => {
            eprintln!("Error: user {} has no current program set", user);
            return 1;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let program = match store.load_program(current.program_id) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let today = Utc::now().date_naive();
    let day = current_split_day(&program, current.start_date, today);
    print_json(&serde_json::json!({
        "date": today,
        "program": current.program_name,
        "index": day.index,
        "session_name": day.session_name,
    }))
}

/// Execute the upcoming subcommand.
fn run_upcoming(db_path: &str, user: i64, days: u32) -> i32 {
    let store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let current = match store.current_program(UserId(user)) {
        Ok(Some(current)) => current,
        Ok(None) => {
            eprintln!("Error: user {} has no current program set", user);
            return 1;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let program = match store.load_program(current.program_id) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let today = Utc::now().date_naive();
    let dates = future_session_dates(&program, current.start_date, today, days);
    print_json(&serde_json::json!({
        "program": current.program_name,
        "dates": dates,
    }))
}

/// Execute the programs subcommand.
fn run_programs(db_path: &str, user: i64) -> i32 {
    let store = match open_store(db_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    match store.list_programs(UserId(user)) {
        Ok(programs) => print_json(&serde_json::json!({ "programs": programs })),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Prints a value as pretty JSON to stdout. Returns the exit code.
fn print_json(value: &serde_json::Value) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to serialize output: {}", e);
            1
        }
    }
}

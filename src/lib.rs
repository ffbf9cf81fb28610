//! pocketdesk: single-user record keeping tools for the terminal.
//!
//! Seven independent tools share one binary and one data directory, but no
//! records:
//!
//! - `books`: personal book library (JSON)
//! - `calc`: arithmetic calculator with a saved history (JSON)
//! - `attendance`: employee check-in/check-out tracker (SQLite)
//! - `emi`: loan EMI calculator with dated history (JSON)
//! - `movies`: watchlist with ratings and reviews (JSON)
//! - `notes`: short notes with timestamps (JSON)
//! - `weather`: current weather lookup with recent history (JSON + HTTP)
//!
//! Every command is one load → validate → mutate → save cycle over a single
//! local file. There is no locking; the last writer wins.
//!
//! # Examples
//!
//! ```bash
//! pocketdesk books add --title "Dune" --author "Frank Herbert" --genre sci-fi --status no
//! pocketdesk calc eval "sqrt(25) + 2^3" --record
//! pocketdesk attendance check-in --emp-id E1 --time 09:00
//! pocketdesk emi calc --principal 100000 --rate 10 --tenure 12
//! ```
//!
//! # Crate Structure
//!
//! - [`core`](crate::core): store, validation, search, config, errors
//! - [`plugins`]: the tools themselves

pub mod core;
pub mod plugins;
pub mod tools;

use crate::core::{config, error, store::Store};
use crate::plugins::{attendance, books, calc, emi, movies, notes, weather};

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "pocketdesk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Single-user record keeping tools for the terminal"
)]
struct Cli {
    /// Directory holding the data files (overrides config and $POCKETDESK_DATA_DIR).
    #[clap(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Path to a pocketdesk.toml config file.
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the data directory and the attendance database.
    Init,

    /// Personal book library
    Books(books::BooksCli),

    /// Calculator with history
    Calc(calc::CalcCli),

    /// Employee attendance tracker
    Attendance(attendance::AttendanceCli),

    /// Loan EMI calculator
    Emi(emi::EmiCli),

    /// Movie watchlist
    Movies(movies::MoviesCli),

    /// Notes
    Notes(notes::NotesCli),

    /// Weather lookup
    Weather(weather::WeatherCli),

    /// Print the command/storage schema of every tool as JSON
    Schema {
        /// Only this tool.
        #[clap(long)]
        tool: Option<String>,
    },

    /// Print the version
    Version,
}

fn print_schema(tool: Option<String>) -> Result<(), error::DeskError> {
    let output = match tool {
        Some(name) => tools::tool_schema(&name)
            .ok_or_else(|| error::DeskError::NotFound(format!("tool '{}'", name)))?,
        None => serde_json::json!({
            "schema_version": "1.0.0",
            "tools": tools::all_schemas(),
        }),
    };
    println!("{}", crate::core::store::to_pretty_json(&output)?);
    Ok(())
}

/// Operator errors are reported and the command ends normally, like an
/// invalid menu entry would. Storage and config errors propagate.
fn report(result: Result<(), error::DeskError>) -> Result<(), error::DeskError> {
    match result {
        Err(e) if e.is_operator_error() => {
            log::debug!("operator error: {:?}", e);
            eprintln!("{} {}", "✗".red(), e);
            Ok(())
        }
        other => other,
    }
}

pub fn run() -> Result<(), error::DeskError> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;
    let store = Store::new(config.resolve_data_dir(cli.data_dir.as_deref()));
    log::debug!("using data dir {}", store.root.display());

    let result = match cli.command {
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Init => tools::initialize_all(&store).map(|_| {
            println!(
                "{} data directory ready at {}",
                "✓".green(),
                store.root.display()
            )
        }),
        Command::Books(cli) => books::run_books_cli(&store, cli),
        Command::Calc(cli) => calc::run_calc_cli(&store, cli),
        Command::Attendance(cli) => attendance::run_attendance_cli(&store, cli),
        Command::Emi(cli) => emi::run_emi_cli(&store, cli),
        Command::Movies(cli) => movies::run_movies_cli(&store, cli),
        Command::Notes(cli) => notes::run_notes_cli(&store, cli),
        Command::Weather(cli) => weather::run_weather_cli(&store, &config.weather, cli),
        Command::Schema { tool } => print_schema(tool),
    };

    report(result)
}

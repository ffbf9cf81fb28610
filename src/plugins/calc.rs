//! Calculator with a run-scoped history.
//!
//! History lives in a [`CalcSession`] that is created at startup, handed to
//! every handler, written to disk only on an explicit save, and dropped when
//! the run ends.

use crate::core::error;
use crate::core::store::{JsonStore, Store};
use crate::plugins::expr;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalcEntry {
    pub expression: String,
    /// Kept as the JSON number it was read as, so `8` and `8.0` both survive
    /// a load/save cycle unchanged.
    pub result: serde_json::Number,
}

impl CalcEntry {
    pub fn value(&self) -> f64 {
        self.result.as_f64().unwrap_or(f64::NAN)
    }
}

pub struct CalcSession {
    history: Vec<CalcEntry>,
    backing: JsonStore<CalcEntry>,
}

impl CalcSession {
    /// Start a session with the persisted history already loaded.
    pub fn open(store: &Store) -> Result<Self, error::DeskError> {
        let backing = store.calc_history();
        let history = backing.load()?;
        Ok(Self { history, backing })
    }

    pub fn history(&self) -> &[CalcEntry] {
        &self.history
    }

    /// Evaluate and append to the in-memory history. Failed evaluations leave
    /// the history untouched.
    pub fn calculate(&mut self, input: &str) -> Result<CalcEntry, error::DeskError> {
        let expression = input.trim().to_lowercase();
        let value = expr::evaluate(&expression)?;
        let result = serde_json::Number::from_f64(value)
            .ok_or_else(|| expr::ExprError::Domain("result out of range".to_string()))?;
        let entry = CalcEntry { expression, result };
        self.history.push(entry.clone());
        Ok(entry)
    }

    /// Remove the 1-based `index` entry.
    pub fn delete(&mut self, index: usize) -> Result<CalcEntry, error::DeskError> {
        if index == 0 || index > self.history.len() {
            return Err(error::DeskError::ValidationError(format!(
                "invalid entry number {}",
                index
            )));
        }
        Ok(self.history.remove(index - 1))
    }

    pub fn save(&self) -> Result<(), error::DeskError> {
        self.backing.save(&self.history)
    }

    /// Replace the in-memory history with what is on disk.
    pub fn reload(&mut self) -> Result<(), error::DeskError> {
        self.history = self.backing.load()?;
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[clap(name = "calc", about = "Evaluate arithmetic expressions and keep a history.")]
pub struct CalcCli {
    #[clap(subcommand)]
    pub command: CalcCommand,
}

#[derive(Subcommand, Debug)]
pub enum CalcCommand {
    /// Evaluate one expression, e.g. `5+3`, `sqrt(25)`, `sin(30)`, `2^8`.
    Eval {
        expression: String,
        /// Append the result to the saved history.
        #[clap(long)]
        record: bool,
    },
    /// Show the saved history.
    History,
    /// Delete a saved history entry by its number.
    Delete { index: usize },
    /// Interactive session reading expressions from stdin.
    Shell,
}

fn format_history(history: &[CalcEntry]) -> String {
    if history.is_empty() {
        return "No history yet.\n".to_string();
    }
    history
        .iter()
        .enumerate()
        .map(|(i, item)| format!("[{}] {} = {}\n", i + 1, item.expression, item.value()))
        .collect()
}

/// Drive a session from line input. Lines are expressions, or one of
/// `history`, `delete N`, `save`, `load`, `exit`. Errors are reported and
/// the session continues.
pub fn run_shell<R: BufRead, W: Write>(
    session: &mut CalcSession,
    input: R,
    out: &mut W,
) -> Result<(), error::DeskError> {
    writeln!(out, "Calculator ready. Commands: history, delete N, save, load, exit.")?;
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        let mut words = trimmed.split_whitespace();
        match (words.next(), words.next()) {
            (None, _) => continue,
            (Some("exit"), None) | (Some("quit"), None) => break,
            (Some("history"), None) => write!(out, "{}", format_history(session.history()))?,
            (Some("save"), None) => {
                session.save()?;
                writeln!(out, "History saved to file.")?;
            }
            (Some("load"), None) => {
                session.reload()?;
                writeln!(out, "History loaded from file.")?;
            }
            (Some("delete"), Some(arg)) => {
                let outcome = arg
                    .parse::<usize>()
                    .map_err(|_| error::DeskError::ValidationError("invalid input".to_string()))
                    .and_then(|index| session.delete(index));
                match outcome {
                    Ok(entry) => writeln!(out, "Deleted: {} = {}", entry.expression, entry.value())?,
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
            _ => match session.calculate(trimmed) {
                Ok(entry) => writeln!(out, "Result: {}", entry.value())?,
                Err(e) if e.is_operator_error() => writeln!(out, "Error: {}", e)?,
                Err(e) => return Err(e),
            },
        }
    }
    Ok(())
}

pub fn run_calc_cli(store: &Store, cli: CalcCli) -> Result<(), error::DeskError> {
    let mut session = CalcSession::open(store)?;
    match cli.command {
        CalcCommand::Eval { expression, record } => {
            let entry = session.calculate(&expression)?;
            println!("Result: {}", entry.value());
            if record {
                session.save()?;
            }
        }
        CalcCommand::History => print!("{}", format_history(session.history())),
        CalcCommand::Delete { index } => {
            let entry = session.delete(index)?;
            session.save()?;
            println!("Deleted: {} = {}", entry.expression, entry.value());
        }
        CalcCommand::Shell => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            run_shell(&mut session, stdin.lock(), &mut stdout)?;
        }
    }
    Ok(())
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "calc",
        "version": "0.1.0",
        "description": "Calculator with history",
        "commands": [
            { "name": "eval", "parameters": ["expression", "record"] },
            { "name": "history" },
            { "name": "delete", "parameters": ["index"] },
            { "name": "shell" }
        ],
        "storage": ["calc_history.json"]
    })
}

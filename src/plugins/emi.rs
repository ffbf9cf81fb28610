//! Loan EMI calculator.
//!
//! The instalment is rounded to two places first; `total` and `interest` are
//! derived from the rounded instalment and rounded again, so they can differ
//! from the exact amortised figures by a few cents.

use crate::core::error;
use crate::core::output::{format_number, render_fields};
use crate::core::search::{self, SearchOutcome};
use crate::core::store::Store;
use crate::core::time;
use crate::core::validate::{self, round2};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmiBreakdown {
    pub emi: f64,
    pub interest: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoanCalculation {
    pub date: String,
    pub principal: f64,
    pub rate: f64,
    pub tenure: u32,
    pub emi: f64,
    pub interest: f64,
    pub total: f64,
}

impl LoanCalculation {
    pub fn render_text(&self) -> String {
        render_fields(
            "Loan EMI Calculation",
            &[
                ("date", self.date.clone()),
                ("principal", format_number(self.principal)),
                ("rate", format_number(self.rate)),
                ("tenure", self.tenure.to_string()),
                ("emi", format_number(self.emi)),
                ("interest", format_number(self.interest)),
                ("total", format_number(self.total)),
            ],
        )
    }
}

/// Amortised monthly instalment for `principal` at `annual_rate` percent over
/// `tenure_months`. A zero rate has no closed form here and is rejected along
/// with any other non-positive input.
pub fn calculate_emi(
    principal: f64,
    annual_rate: f64,
    tenure_months: u32,
) -> Result<EmiBreakdown, error::DeskError> {
    if !(principal.is_finite() && principal > 0.0) {
        return Err(error::DeskError::ValidationError(
            "principal must be > 0".to_string(),
        ));
    }
    if !(annual_rate.is_finite() && annual_rate > 0.0) {
        return Err(error::DeskError::ValidationError(
            "rate must be > 0".to_string(),
        ));
    }
    if tenure_months == 0 {
        return Err(error::DeskError::ValidationError(
            "tenure must be > 0".to_string(),
        ));
    }

    let monthly_rate = annual_rate / 1200.0;
    let growth = (1.0 + monthly_rate).powf(tenure_months as f64);
    let denominator = growth - 1.0;
    if denominator == 0.0 {
        return Err(error::DeskError::ValidationError(
            "rate too small to amortise".to_string(),
        ));
    }
    let emi = round2(principal * monthly_rate * growth / denominator);
    let total = round2(emi * tenure_months as f64);
    let interest = round2(total - principal);
    if !(emi.is_finite() && total.is_finite() && interest.is_finite()) {
        return Err(error::DeskError::ValidationError(
            "loan figures are out of range".to_string(),
        ));
    }

    Ok(EmiBreakdown {
        emi,
        interest,
        total,
    })
}

/// Validate raw input, compute, and append the result to the history.
pub fn new_calculation(
    store: &Store,
    principal: &str,
    rate: &str,
    tenure: &str,
    date: Option<&str>,
) -> Result<LoanCalculation, error::DeskError> {
    let principal = validate::parse_positive_f64("principal", principal)?;
    let rate = validate::parse_positive_f64("rate", rate)?;
    let tenure = validate::parse_positive_u32("tenure", tenure)?;
    let date = match date {
        Some(d) => validate::parse_date(d)?.format(time::DATE_FORMAT).to_string(),
        None => time::today(),
    };

    let breakdown = calculate_emi(principal, rate, tenure)?;
    let calculation = LoanCalculation {
        date,
        principal,
        rate,
        tenure,
        emi: breakdown.emi,
        interest: breakdown.interest,
        total: breakdown.total,
    };

    let history = store.emi_history();
    let mut entries = history.load()?;
    entries.push(calculation.clone());
    history.save(&entries)?;
    Ok(calculation)
}

pub fn history_by_date(
    store: &Store,
    date: &str,
) -> Result<SearchOutcome<LoanCalculation>, error::DeskError> {
    let date = validate::parse_date(date)?.format(time::DATE_FORMAT).to_string();
    let entries = store.emi_history().load()?;
    Ok(search::search(&entries, |e| e.date == date))
}

/// `emi_YYYYMMDD.txt` inside `dir`.
pub fn default_export_path(dir: &Path, calculation: &LoanCalculation) -> PathBuf {
    dir.join(format!("emi_{}.txt", calculation.date.replace('-', "")))
}

pub fn export_text(calculation: &LoanCalculation, path: &Path) -> Result<(), error::DeskError> {
    fs::write(path, calculation.render_text()).map_err(error::DeskError::IoError)?;
    log::info!("exported EMI calculation to {}", path.display());
    Ok(())
}

#[derive(Parser, Debug)]
#[clap(name = "emi", about = "Loan EMI calculator with dated history.")]
pub struct EmiCli {
    #[clap(subcommand)]
    pub command: EmiCommand,
}

#[derive(Subcommand, Debug)]
pub enum EmiCommand {
    /// Compute a new EMI and record it.
    Calc {
        /// Principal amount.
        #[clap(long)]
        principal: String,
        /// Annual interest rate in percent.
        #[clap(long)]
        rate: String,
        /// Tenure in months.
        #[clap(long)]
        tenure: String,
        /// Record under this date instead of today (YYYY-MM-DD).
        #[clap(long)]
        date: Option<String>,
        /// Write a text export. Without a path, `emi_YYYYMMDD.txt` in the data dir.
        #[clap(long, num_args = 0..=1, default_missing_value = "")]
        export: Option<String>,
    },
    /// Show calculations recorded on a date.
    History {
        #[clap(long)]
        date: String,
    },
}

pub fn run_emi_cli(store: &Store, cli: EmiCli) -> Result<(), error::DeskError> {
    match cli.command {
        EmiCommand::Calc {
            principal,
            rate,
            tenure,
            date,
            export,
        } => {
            let calc = new_calculation(store, &principal, &rate, &tenure, date.as_deref())?;
            println!("EMI Calculation:");
            println!("Monthly EMI     : {}", format_number(calc.emi));
            println!("Total Interest  : {}", format_number(calc.interest));
            println!("Total Payment   : {}", format_number(calc.total));
            if let Some(target) = export {
                let path = if target.trim().is_empty() {
                    default_export_path(&store.root, &calc)
                } else {
                    PathBuf::from(target)
                };
                export_text(&calc, &path)?;
                println!("Exported to {}", path.display());
            }
        }
        EmiCommand::History { date } => match history_by_date(store, &date)? {
            SearchOutcome::EmptyStore => println!("No history found."),
            SearchOutcome::NoMatches => println!("No records found for this date."),
            SearchOutcome::Matches(entries) => {
                for (i, h) in entries.iter().enumerate() {
                    println!(
                        "[{}] Principal: {}, Interest: {}%, Tenure: {} months",
                        i + 1,
                        format_number(h.principal),
                        format_number(h.rate),
                        h.tenure
                    );
                    println!(
                        "    EMI: {}, Total Interest: {}, Total Payment: {}",
                        format_number(h.emi),
                        format_number(h.interest),
                        format_number(h.total)
                    );
                }
            }
        },
    }
    Ok(())
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "emi",
        "version": "0.1.0",
        "description": "Loan EMI calculator",
        "commands": [
            { "name": "calc", "parameters": ["principal", "rate", "tenure", "date", "export"] },
            { "name": "history", "parameters": ["date"] }
        ],
        "storage": ["emi_history.json"]
    })
}

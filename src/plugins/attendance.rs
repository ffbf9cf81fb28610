//! Employee attendance tracker backed by SQLite.
//!
//! Per (employee, date) a record moves `no-record -> checked-in ->
//! checked-out` and never back. Reports are read-only.

use crate::core::db;
use crate::core::error;
use crate::core::output::render_table;
use crate::core::schemas;
use crate::core::store::Store;
use crate::core::time;
use crate::core::validate::{self, round2};
use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub emp_id: String,
    pub name: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub emp_id: String,
    pub date: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub working_hours: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceState {
    NoRecord,
    CheckedIn,
    CheckedOut,
}

impl AttendanceRecord {
    pub fn state(&self) -> AttendanceState {
        match (&self.check_in, &self.check_out) {
            (_, Some(_)) => AttendanceState::CheckedOut,
            (Some(_), None) => AttendanceState::CheckedIn,
            (None, None) => AttendanceState::NoRecord,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub emp_id: String,
    pub name: String,
    pub department: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub emp_id: String,
    pub month: String,
    pub rows: Vec<AttendanceRecord>,
    pub total_hours: f64,
}

#[derive(Parser, Debug)]
#[clap(name = "attendance", about = "Track employee check-ins and working hours.")]
pub struct AttendanceCli {
    #[clap(subcommand)]
    pub command: AttendanceCommand,
}

#[derive(Subcommand, Debug)]
pub enum AttendanceCommand {
    /// Register an employee.
    AddEmployee {
        #[clap(long)]
        emp_id: String,
        #[clap(long)]
        name: String,
        #[clap(long)]
        department: String,
    },
    /// Record a check-in.
    CheckIn {
        #[clap(long)]
        emp_id: String,
        /// HH:MM
        #[clap(long)]
        time: String,
        /// YYYY-MM-DD, defaults to today.
        #[clap(long)]
        date: Option<String>,
    },
    /// Record a check-out and compute working hours.
    CheckOut {
        #[clap(long)]
        emp_id: String,
        /// HH:MM
        #[clap(long)]
        time: String,
        /// YYYY-MM-DD, defaults to today.
        #[clap(long)]
        date: Option<String>,
    },
    /// Everyone's attendance on one date.
    Daily {
        #[clap(long)]
        date: String,
    },
    /// One employee's attendance for a month.
    Monthly {
        #[clap(long)]
        emp_id: String,
        /// YYYY-MM
        #[clap(long)]
        month: String,
    },
}

fn open_attendance_db(store: &Store) -> Result<Connection, error::DeskError> {
    let conn = db::db_connect(&store.attendance_db_path())?;
    conn.execute(schemas::ATTENDANCE_DB_SCHEMA_EMPLOYEES, [])?;
    conn.execute(schemas::ATTENDANCE_DB_SCHEMA_ATTENDANCE, [])?;
    conn.execute(schemas::ATTENDANCE_DB_SCHEMA_INDEX, [])?;
    Ok(conn)
}

pub fn initialize_attendance_db(store: &Store) -> Result<(), error::DeskError> {
    open_attendance_db(store)?;
    Ok(())
}

fn resolve_date(date: Option<&str>) -> Result<String, error::DeskError> {
    match date {
        Some(d) => Ok(validate::parse_date(d)?
            .format(time::DATE_FORMAT)
            .to_string()),
        None => Ok(time::today()),
    }
}

/// Hours between two same-day times, rounded to two places. Fails when
/// `check_out` precedes `check_in`.
pub fn working_hours(check_in: NaiveTime, check_out: NaiveTime) -> Result<f64, error::DeskError> {
    if check_out < check_in {
        return Err(error::DeskError::ValidationError(
            "check-out can't be before check-in".to_string(),
        ));
    }
    let minutes = (check_out - check_in).num_minutes();
    Ok(round2(minutes as f64 / 60.0))
}

pub fn add_employee(
    store: &Store,
    emp_id: &str,
    name: &str,
    department: &str,
) -> Result<Employee, error::DeskError> {
    let employee = Employee {
        emp_id: validate::require_non_empty("employee ID", emp_id)?,
        name: validate::require_non_empty("name", name)?,
        department: validate::require_non_empty("department", department)?,
    };

    let conn = open_attendance_db(store)?;
    if find_employee(&conn, &employee.emp_id)?.is_some() {
        return Err(error::DeskError::ValidationError(format!(
            "employee ID '{}' already exists",
            employee.emp_id
        )));
    }
    conn.execute(
        "INSERT INTO employees(emp_id, name, department) VALUES(?1, ?2, ?3)",
        params![employee.emp_id, employee.name, employee.department],
    )?;
    log::info!("added employee {}", employee.emp_id);
    Ok(employee)
}

fn find_employee(conn: &Connection, emp_id: &str) -> Result<Option<Employee>, error::DeskError> {
    let employee = conn
        .query_row(
            "SELECT emp_id, name, department FROM employees WHERE emp_id = ?1",
            params![emp_id],
            |row| {
                Ok(Employee {
                    emp_id: row.get(0)?,
                    name: row.get(1)?,
                    department: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(employee)
}

pub fn get_employee(store: &Store, emp_id: &str) -> Result<Option<Employee>, error::DeskError> {
    let conn = open_attendance_db(store)?;
    find_employee(&conn, emp_id.trim())
}

fn find_record(
    conn: &Connection,
    emp_id: &str,
    date: &str,
) -> Result<Option<AttendanceRecord>, error::DeskError> {
    let record = conn
        .query_row(
            "SELECT emp_id, date, check_in, check_out, working_hours
             FROM attendance WHERE emp_id = ?1 AND date = ?2",
            params![emp_id, date],
            |row| {
                Ok(AttendanceRecord {
                    emp_id: row.get(0)?,
                    date: row.get(1)?,
                    check_in: row.get(2)?,
                    check_out: row.get(3)?,
                    working_hours: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(record)
}

pub fn get_record(
    store: &Store,
    emp_id: &str,
    date: &str,
) -> Result<Option<AttendanceRecord>, error::DeskError> {
    let conn = open_attendance_db(store)?;
    find_record(&conn, emp_id.trim(), &resolve_date(Some(date))?)
}

pub fn attendance_state(
    store: &Store,
    emp_id: &str,
    date: &str,
) -> Result<AttendanceState, error::DeskError> {
    Ok(get_record(store, emp_id, date)?
        .map(|r| r.state())
        .unwrap_or(AttendanceState::NoRecord))
}

pub fn check_in(
    store: &Store,
    emp_id: &str,
    date: Option<&str>,
    hhmm: &str,
) -> Result<AttendanceRecord, error::DeskError> {
    let emp_id = emp_id.trim();
    let at = validate::parse_hhmm(hhmm)?;
    let date = resolve_date(date)?;

    let conn = open_attendance_db(store)?;
    if find_employee(&conn, emp_id)?.is_none() {
        return Err(error::DeskError::NotFound(format!("employee '{}'", emp_id)));
    }
    if find_record(&conn, emp_id, &date)?.is_some() {
        return Err(error::DeskError::ValidationError(format!(
            "'{}' already checked in on {}",
            emp_id, date
        )));
    }

    let check_in = at.format(time::TIME_FORMAT).to_string();
    conn.execute(
        "INSERT INTO attendance(emp_id, date, check_in) VALUES(?1, ?2, ?3)",
        params![emp_id, date, check_in],
    )?;
    log::info!("check-in {} on {} at {}", emp_id, date, check_in);

    Ok(AttendanceRecord {
        emp_id: emp_id.to_string(),
        date,
        check_in: Some(check_in),
        check_out: None,
        working_hours: None,
    })
}

pub fn check_out(
    store: &Store,
    emp_id: &str,
    date: Option<&str>,
    hhmm: &str,
) -> Result<AttendanceRecord, error::DeskError> {
    let emp_id = emp_id.trim();
    let at = validate::parse_hhmm(hhmm)?;
    let date = resolve_date(date)?;

    let conn = open_attendance_db(store)?;
    let record = find_record(&conn, emp_id, &date)?.ok_or_else(|| {
        error::DeskError::NotFound(format!("check-in for '{}' on {}", emp_id, date))
    })?;

    let stored_in = match (record.state(), record.check_in.as_deref()) {
        (AttendanceState::CheckedOut, _) => {
            return Err(error::DeskError::ValidationError(format!(
                "'{}' already checked out on {}",
                emp_id, date
            )));
        }
        (_, Some(t)) => t.to_string(),
        (_, None) => {
            return Err(error::DeskError::ValidationError(
                "check-in time missing".to_string(),
            ));
        }
    };
    let checked_in_at = validate::parse_hhmm(&stored_in)?;
    let hours = working_hours(checked_in_at, at)?;

    let check_out = at.format(time::TIME_FORMAT).to_string();
    conn.execute(
        "UPDATE attendance SET check_out = ?1, working_hours = ?2 WHERE emp_id = ?3 AND date = ?4",
        params![check_out, hours, emp_id, date],
    )?;
    log::info!("check-out {} on {} at {} ({}h)", emp_id, date, check_out, hours);

    Ok(AttendanceRecord {
        check_out: Some(check_out),
        working_hours: Some(hours),
        ..record
    })
}

pub fn daily_report(store: &Store, date: &str) -> Result<Vec<DailyRow>, error::DeskError> {
    let date = resolve_date(Some(date))?;
    let conn = open_attendance_db(store)?;
    let mut stmt = conn.prepare(
        "SELECT a.emp_id, e.name, e.department, a.check_in, a.check_out, IFNULL(a.working_hours, 0.0)
         FROM attendance a JOIN employees e ON a.emp_id = e.emp_id
         WHERE a.date = ?1
         ORDER BY a.emp_id",
    )?;
    let rows = stmt.query_map(params![date], |row| {
        Ok(DailyRow {
            emp_id: row.get(0)?,
            name: row.get(1)?,
            department: row.get(2)?,
            check_in: row.get(3)?,
            check_out: row.get(4)?,
            hours: row.get(5)?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn monthly_report(
    store: &Store,
    emp_id: &str,
    month: &str,
) -> Result<MonthlyReport, error::DeskError> {
    let emp_id = emp_id.trim().to_string();
    let month = validate::parse_month(month)?;
    let conn = open_attendance_db(store)?;
    let mut stmt = conn.prepare(
        "SELECT emp_id, date, check_in, check_out, working_hours
         FROM attendance
         WHERE emp_id = ?1 AND date LIKE ?2
         ORDER BY date",
    )?;
    let rows = stmt.query_map(params![emp_id, format!("{}-%", month)], |row| {
        Ok(AttendanceRecord {
            emp_id: row.get(0)?,
            date: row.get(1)?,
            check_in: row.get(2)?,
            check_out: row.get(3)?,
            working_hours: row.get(4)?,
        })
    })?;
    let mut records = Vec::new();
    for r in rows {
        records.push(r?);
    }
    let total: f64 = records.iter().map(|r| r.working_hours.unwrap_or(0.0)).sum();

    Ok(MonthlyReport {
        emp_id,
        month,
        rows: records,
        total_hours: round2(total),
    })
}

fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

pub fn run_attendance_cli(store: &Store, cli: AttendanceCli) -> Result<(), error::DeskError> {
    match cli.command {
        AttendanceCommand::AddEmployee {
            emp_id,
            name,
            department,
        } => {
            let employee = add_employee(store, &emp_id, &name, &department)?;
            println!("Employee '{}' added.", employee.emp_id);
        }
        AttendanceCommand::CheckIn { emp_id, time, date } => {
            let record = check_in(store, &emp_id, date.as_deref(), &time)?;
            println!(
                "Check-in recorded for {} on {} at {}.",
                record.emp_id,
                record.date,
                cell(&record.check_in)
            );
        }
        AttendanceCommand::CheckOut { emp_id, time, date } => {
            let record = check_out(store, &emp_id, date.as_deref(), &time)?;
            println!(
                "Checked out. Total hours: {} hrs",
                record.working_hours.unwrap_or(0.0)
            );
        }
        AttendanceCommand::Daily { date } => {
            let rows = daily_report(store, &date)?;
            if rows.is_empty() {
                println!("No attendance records for that date.");
            } else {
                let table: Vec<Vec<String>> = rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.emp_id.clone(),
                            r.name.clone(),
                            r.department.clone(),
                            cell(&r.check_in),
                            cell(&r.check_out),
                            r.hours.to_string(),
                        ]
                    })
                    .collect();
                println!("Daily Report:");
                println!(
                    "{}",
                    render_table(&["ID", "Name", "Dept", "In", "Out", "Hours"], &table)
                );
            }
        }
        AttendanceCommand::Monthly { emp_id, month } => {
            let report = monthly_report(store, &emp_id, &month)?;
            if report.rows.is_empty() {
                println!("No records for given employee and month.");
            } else {
                let table: Vec<Vec<String>> = report
                    .rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.date.clone(),
                            cell(&r.check_in),
                            cell(&r.check_out),
                            r.working_hours.unwrap_or(0.0).to_string(),
                        ]
                    })
                    .collect();
                println!("Monthly Report:");
                println!(
                    "{}",
                    render_table(&["Date", "Check-in", "Check-out", "Hours"], &table)
                );
                println!(
                    "Total Working Hours in {}: {} hrs",
                    report.month, report.total_hours
                );
            }
        }
    }
    Ok(())
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "attendance",
        "version": "0.1.0",
        "description": "Employee attendance tracker",
        "commands": [
            { "name": "add-employee", "parameters": ["emp-id", "name", "department"] },
            { "name": "check-in", "parameters": ["emp-id", "time", "date"] },
            { "name": "check-out", "parameters": ["emp-id", "time", "date"] },
            { "name": "daily", "parameters": ["date"] },
            { "name": "monthly", "parameters": ["emp-id", "month"] }
        ],
        "storage": ["attendance.db"]
    })
}

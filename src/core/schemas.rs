//! Backing file names and the attendance database schema.
//!
//! JSON tools each own one array-of-objects file. The attendance tracker is
//! the only relational store.

pub const BOOKS_FILE: &str = "books.json";
pub const CALC_HISTORY_FILE: &str = "calc_history.json";
pub const EMI_HISTORY_FILE: &str = "emi_history.json";
pub const WATCHLIST_FILE: &str = "watchlist.json";
pub const NOTES_FILE: &str = "notes.json";
pub const WEATHER_HISTORY_FILE: &str = "weather_history.json";

pub const ATTENDANCE_DB_NAME: &str = "attendance.db";

pub const ATTENDANCE_DB_SCHEMA_EMPLOYEES: &str = "
    CREATE TABLE IF NOT EXISTS employees (
        emp_id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        department TEXT NOT NULL
    )
";
pub const ATTENDANCE_DB_SCHEMA_ATTENDANCE: &str = "
    CREATE TABLE IF NOT EXISTS attendance (
        emp_id TEXT,
        date TEXT,
        check_in TEXT,
        check_out TEXT,
        working_hours REAL,
        FOREIGN KEY(emp_id) REFERENCES employees(emp_id)
    )
";
pub const ATTENDANCE_DB_SCHEMA_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_emp_date ON attendance(emp_id, date)";

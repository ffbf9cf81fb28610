use pocketdesk::core::error::DeskError;
use pocketdesk::core::store::Store;
use pocketdesk::plugins::attendance::{
    AttendanceState, add_employee, attendance_state, check_in, check_out, daily_report,
    get_employee, get_record, initialize_attendance_db, monthly_report,
};
use tempfile::tempdir;

const DAY: &str = "2024-03-04";

fn store_with_staff() -> (tempfile::TempDir, Store) {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    add_employee(&store, "E1", "Asha", "Ops").unwrap();
    add_employee(&store, "E2", "Ben", "Sales").unwrap();
    (tmp, store)
}

#[test]
fn test_initialize_creates_database_idempotently() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("nested"));
    initialize_attendance_db(&store).unwrap();
    initialize_attendance_db(&store).unwrap();
    assert!(store.attendance_db_path().exists());
}

#[test]
fn test_add_employee_rejects_duplicates_and_blanks() {
    let (_tmp, store) = store_with_staff();
    assert!(matches!(
        add_employee(&store, "E1", "Other", "Ops"),
        Err(DeskError::ValidationError(_))
    ));
    assert!(matches!(
        add_employee(&store, "E3", " ", "Ops"),
        Err(DeskError::ValidationError(_))
    ));

    let employee = get_employee(&store, " E1 ").unwrap().unwrap();
    assert_eq!(employee.name, "Asha");
    assert!(get_employee(&store, "E3").unwrap().is_none());
}

#[test]
fn test_check_in_requires_known_employee_and_valid_time() {
    let (_tmp, store) = store_with_staff();
    assert!(matches!(
        check_in(&store, "E9", Some(DAY), "09:00"),
        Err(DeskError::NotFound(_))
    ));
    assert!(matches!(
        check_in(&store, "E1", Some(DAY), "25:00"),
        Err(DeskError::ValidationError(_))
    ));
    assert!(matches!(
        check_in(&store, "E1", Some("2024-13-01"), "09:00"),
        Err(DeskError::ValidationError(_))
    ));
    assert_eq!(
        attendance_state(&store, "E1", DAY).unwrap(),
        AttendanceState::NoRecord
    );
}

#[test]
fn test_state_machine_moves_forward_only() {
    let (_tmp, store) = store_with_staff();

    let record = check_in(&store, "E1", Some(DAY), "09:00").unwrap();
    assert_eq!(record.check_in.as_deref(), Some("09:00"));
    assert_eq!(
        attendance_state(&store, "E1", DAY).unwrap(),
        AttendanceState::CheckedIn
    );

    assert!(matches!(
        check_in(&store, "E1", Some(DAY), "10:00"),
        Err(DeskError::ValidationError(_))
    ));

    let record = check_out(&store, "E1", Some(DAY), "17:30").unwrap();
    assert_eq!(record.check_out.as_deref(), Some("17:30"));
    assert_eq!(record.working_hours, Some(8.5));
    assert_eq!(
        attendance_state(&store, "E1", DAY).unwrap(),
        AttendanceState::CheckedOut
    );

    assert!(matches!(
        check_out(&store, "E1", Some(DAY), "18:00"),
        Err(DeskError::ValidationError(_))
    ));
    assert!(matches!(
        check_in(&store, "E1", Some(DAY), "19:00"),
        Err(DeskError::ValidationError(_))
    ));

    let stored = get_record(&store, "E1", DAY).unwrap().unwrap();
    assert_eq!(stored.check_out.as_deref(), Some("17:30"));
    assert_eq!(stored.working_hours, Some(8.5));
}

#[test]
fn test_check_out_without_check_in_is_not_found() {
    let (_tmp, store) = store_with_staff();
    assert!(matches!(
        check_out(&store, "E1", Some(DAY), "17:00"),
        Err(DeskError::NotFound(_))
    ));
}

#[test]
fn test_check_out_before_check_in_is_rejected_without_mutation() {
    let (_tmp, store) = store_with_staff();
    check_in(&store, "E1", Some(DAY), "09:00").unwrap();

    assert!(matches!(
        check_out(&store, "E1", Some(DAY), "08:15"),
        Err(DeskError::ValidationError(_))
    ));

    let stored = get_record(&store, "E1", DAY).unwrap().unwrap();
    assert_eq!(stored.check_out, None);
    assert_eq!(stored.working_hours, None);
    assert_eq!(stored.state(), AttendanceState::CheckedIn);
}

#[test]
fn test_working_hours_round_to_two_places() {
    let (_tmp, store) = store_with_staff();
    check_in(&store, "E2", Some(DAY), "09:10").unwrap();
    let record = check_out(&store, "E2", Some(DAY), "17:00").unwrap();
    // 470 minutes
    assert_eq!(record.working_hours, Some(7.83));
}

#[test]
fn test_daily_report_joins_employees_and_defaults_open_hours_to_zero() {
    let (_tmp, store) = store_with_staff();
    check_in(&store, "E1", Some(DAY), "09:00").unwrap();
    check_out(&store, "E1", Some(DAY), "17:00").unwrap();
    check_in(&store, "E2", Some(DAY), "10:00").unwrap();
    check_in(&store, "E2", Some("2024-03-05"), "10:00").unwrap();

    let rows = daily_report(&store, DAY).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].emp_id, "E1");
    assert_eq!(rows[0].name, "Asha");
    assert_eq!(rows[0].department, "Ops");
    assert_eq!(rows[0].hours, 8.0);
    assert_eq!(rows[1].emp_id, "E2");
    assert_eq!(rows[1].check_out, None);
    assert_eq!(rows[1].hours, 0.0);

    assert!(daily_report(&store, "2024-01-01").unwrap().is_empty());
}

#[test]
fn test_monthly_report_orders_by_date_and_totals_hours() {
    let (_tmp, store) = store_with_staff();
    check_in(&store, "E1", Some("2024-03-12"), "09:00").unwrap();
    check_out(&store, "E1", Some("2024-03-12"), "13:30").unwrap();
    check_in(&store, "E1", Some("2024-03-02"), "09:00").unwrap();
    check_out(&store, "E1", Some("2024-03-02"), "17:00").unwrap();
    check_in(&store, "E1", Some("2024-03-20"), "09:00").unwrap();
    check_in(&store, "E1", Some("2024-04-01"), "09:00").unwrap();
    check_out(&store, "E1", Some("2024-04-01"), "10:00").unwrap();

    let report = monthly_report(&store, "E1", "2024-03").unwrap();
    let dates: Vec<&str> = report.rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-03-02", "2024-03-12", "2024-03-20"]);
    assert_eq!(report.total_hours, 12.5);

    assert!(monthly_report(&store, "E2", "2024-03").unwrap().rows.is_empty());
    assert!(matches!(
        monthly_report(&store, "E1", "2024-3"),
        Err(DeskError::ValidationError(_))
    ));
}

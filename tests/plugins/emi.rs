use pocketdesk::core::error::DeskError;
use pocketdesk::core::search::SearchOutcome;
use pocketdesk::core::store::Store;
use pocketdesk::plugins::emi::{
    calculate_emi, default_export_path, export_text, history_by_date, new_calculation,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_reference_loan() {
    let breakdown = calculate_emi(100000.0, 10.0, 12).unwrap();
    assert_eq!(breakdown.emi, 8791.59);
    assert_eq!(breakdown.total, 105499.08);
    assert_eq!(breakdown.interest, 5499.08);
}

#[test]
fn test_non_positive_inputs_are_rejected_before_touching_history() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    for (p, r, n) in [
        ("0", "10", "12"),
        ("100000", "0", "12"),
        ("100000", "10", "0"),
        ("-5", "10", "12"),
        ("abc", "10", "12"),
        ("100000", "10", "1.5"),
    ] {
        let err = new_calculation(&store, p, r, n, Some("2024-01-01")).unwrap_err();
        assert!(matches!(err, DeskError::ValidationError(_)), "{} {} {}", p, r, n);
    }
    assert!(!store.emi_history().exists());
}

#[test]
fn test_out_of_range_loans_leave_history_readable() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    let first = new_calculation(&store, "100000", "10", "12", Some("2024-01-01")).unwrap();
    let before = fs::read(store.emi_history().path()).unwrap();

    for (p, r, n) in [
        ("1000", "10", "100000"),
        ("1000", "1e308", "12"),
        ("1e308", "10", "12"),
        ("1000", "10", "4294967295"),
    ] {
        let err = new_calculation(&store, p, r, n, Some("2024-01-02")).unwrap_err();
        assert!(matches!(err, DeskError::ValidationError(_)), "{} {} {}", p, r, n);
    }

    assert_eq!(fs::read(store.emi_history().path()).unwrap(), before);
    assert_eq!(store.emi_history().load().unwrap(), vec![first]);
}

#[test]
fn test_calculation_is_appended_to_history() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    let first = new_calculation(&store, "100000", "10", "12", Some("2024-01-01")).unwrap();
    new_calculation(&store, "50000", "8.5", "24", Some("2024-01-02")).unwrap();

    let history = store.emi_history().load().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], first);
    assert_eq!(history[0].tenure, 12);
    assert_eq!(history[1].date, "2024-01-02");
}

#[test]
fn test_history_by_date_outcomes() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    assert_eq!(
        history_by_date(&store, "2024-01-01").unwrap(),
        SearchOutcome::EmptyStore
    );

    new_calculation(&store, "100000", "10", "12", Some("2024-01-01")).unwrap();
    new_calculation(&store, "20000", "12", "6", Some("2024-01-01")).unwrap();
    new_calculation(&store, "30000", "9", "10", Some("2024-02-01")).unwrap();

    assert_eq!(history_by_date(&store, "2024-01-01").unwrap().matches().len(), 2);
    assert_eq!(
        history_by_date(&store, "2023-12-31").unwrap(),
        SearchOutcome::NoMatches
    );
    assert!(matches!(
        history_by_date(&store, "01/01/2024"),
        Err(DeskError::ValidationError(_))
    ));
}

#[test]
fn test_export_writes_line_per_field_text() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    let calculation = new_calculation(&store, "100000", "10", "12", Some("2024-01-01")).unwrap();

    let path = default_export_path(tmp.path(), &calculation);
    assert!(path.ends_with("emi_20240101.txt"));
    export_text(&calculation, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "Loan EMI Calculation\n\
         Date: 2024-01-01\n\
         Principal: 100000.0\n\
         Rate: 10.0\n\
         Tenure: 12\n\
         Emi: 8791.59\n\
         Interest: 5499.08\n\
         Total: 105499.08\n"
    );
}

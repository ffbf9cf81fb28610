use pocketdesk::core::error::DeskError;
use pocketdesk::core::search::SearchOutcome;
use pocketdesk::core::store::Store;
use pocketdesk::plugins::notes::{
    Note, NoteOrder, add_note, delete_note, edit_note, list_notes, search_notes,
};
use tempfile::tempdir;

fn note(title: &str, content: &str, timestamp: &str) -> Note {
    Note {
        title: title.to_string(),
        content: content.to_string(),
        timestamp: timestamp.to_string(),
    }
}

fn seeded_store() -> (tempfile::TempDir, Store) {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    store
        .notes()
        .save(&[
            note("groceries", "milk, eggs", "2024-01-02 08:00:00"),
            note("Ideas", "write a parser", "2024-01-03 09:30:00"),
            note("bills", "pay rent", "2024-01-01 12:00:00"),
        ])
        .unwrap();
    (tmp, store)
}

#[test]
fn test_add_requires_title_and_content() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    assert!(matches!(
        add_note(&store, "", "body"),
        Err(DeskError::ValidationError(_))
    ));
    assert!(matches!(
        add_note(&store, "title", "  "),
        Err(DeskError::ValidationError(_))
    ));
    assert!(!store.notes().exists());

    let added = add_note(&store, "Todo", "ship it").unwrap();
    assert_eq!(added.timestamp.len(), "YYYY-MM-DD HH:MM:SS".len());
    assert_eq!(list_notes(&store, NoteOrder::Date).unwrap(), vec![added]);
}

#[test]
fn test_list_orders_do_not_change_stored_order() {
    let (_tmp, store) = seeded_store();

    let by_date: Vec<String> = list_notes(&store, NoteOrder::Date)
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(by_date, vec!["Ideas", "groceries", "bills"]);

    let alpha: Vec<String> = list_notes(&store, NoteOrder::Alpha)
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(alpha, vec!["bills", "groceries", "Ideas"]);

    let stored: Vec<String> = store.notes().load().unwrap().into_iter().map(|n| n.title).collect();
    assert_eq!(stored, vec!["groceries", "Ideas", "bills"]);
}

#[test]
fn test_search_matches_title_or_content() {
    let (_tmp, store) = seeded_store();
    let hits = search_notes(&store, "RENT").unwrap().into_matches();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "bills");

    let hits = search_notes(&store, "ide").unwrap().into_matches();
    assert_eq!(hits[0].title, "Ideas");

    assert_eq!(search_notes(&store, "zebra").unwrap(), SearchOutcome::NoMatches);
}

#[test]
fn test_edit_keeps_blank_fields_and_refreshes_timestamp() {
    let (_tmp, store) = seeded_store();

    let edited = edit_note(&store, "BILLS", Some(" "), None).unwrap();
    assert_eq!(edited.title, "bills");
    assert_eq!(edited.content, "pay rent");
    assert_ne!(edited.timestamp, "2024-01-01 12:00:00");

    let edited = edit_note(&store, "bills", Some("Bills"), Some("pay rent and water")).unwrap();
    assert_eq!(edited.title, "Bills");
    assert_eq!(edited.content, "pay rent and water");

    // Position in the file is kept.
    let stored = store.notes().load().unwrap();
    assert_eq!(stored[2], edited);

    assert!(matches!(
        edit_note(&store, "missing", None, None),
        Err(DeskError::NotFound(_))
    ));
}

#[test]
fn test_delete_note() {
    let (_tmp, store) = seeded_store();
    let removed = delete_note(&store, "ideas").unwrap();
    assert_eq!(removed.content, "write a parser");
    assert_eq!(store.notes().load().unwrap().len(), 2);
    assert!(matches!(delete_note(&store, "ideas"), Err(DeskError::NotFound(_))));
}

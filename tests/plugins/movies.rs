use pocketdesk::core::error::DeskError;
use pocketdesk::core::search::SearchOutcome;
use pocketdesk::core::store::Store;
use pocketdesk::plugins::movies::{
    ExportFormat, Movie, MovieField, MovieStatus, MovieUpdate, add_movie, delete_movie,
    edit_movie, export_watchlist, list_movies, rate_movie, render_txt, search_movies,
};
use std::fs;
use tempfile::tempdir;

fn seeded_store() -> (tempfile::TempDir, Store) {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    add_movie(&store, "Alien", "Horror", "1979", "watched").unwrap();
    add_movie(&store, "Arrival", "Sci-Fi", "2016", "Pending").unwrap();
    (tmp, store)
}

#[test]
fn test_add_validates_year_and_status() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());

    for (year, status) in [
        ("19x9", "watched"),
        ("", "watched"),
        ("0", "watched"),
        ("12345", "watched"),
        ("1979", "seen"),
    ] {
        let err = add_movie(&store, "Alien", "Horror", year, status).unwrap_err();
        assert!(matches!(err, DeskError::ValidationError(_)));
    }
    assert!(!store.movies().exists());

    let movie = add_movie(&store, "Alien", "Horror", "1979", "WATCHED").unwrap();
    assert_eq!(movie.year, 1979);
    assert_eq!(movie.status, MovieStatus::Watched);
    assert_eq!(movie.rating, None);
    assert_eq!(list_movies(&store).unwrap(), vec![movie]);
}

#[test]
fn test_edit_ignores_invalid_year_and_status() {
    let (_tmp, store) = seeded_store();
    let update = MovieUpdate {
        genre: Some("Drama".to_string()),
        year: Some("twenty".to_string()),
        status: Some("maybe".to_string()),
        ..Default::default()
    };
    let movie = edit_movie(&store, "arrival", &update).unwrap();
    assert_eq!(movie.genre, "Drama");
    assert_eq!(movie.year, 2016);
    assert_eq!(movie.status, MovieStatus::Pending);

    let update = MovieUpdate {
        title: Some("Arrival (2016)".to_string()),
        status: Some("watched".to_string()),
        ..Default::default()
    };
    let movie = edit_movie(&store, "Arrival", &update).unwrap();
    assert_eq!(movie.title, "Arrival (2016)");
    assert_eq!(movie.status, MovieStatus::Watched);

    assert!(matches!(
        edit_movie(&store, "Arrival", &MovieUpdate::default()),
        Err(DeskError::NotFound(_))
    ));
}

#[test]
fn test_rating_only_applies_to_watched_movies() {
    let (_tmp, store) = seeded_store();
    let before = fs::read(store.movies().path()).unwrap();

    assert!(matches!(
        rate_movie(&store, "Arrival", "4", "slow"),
        Err(DeskError::ValidationError(_))
    ));
    assert!(matches!(
        rate_movie(&store, "Alien", "6", "too good"),
        Err(DeskError::ValidationError(_))
    ));
    assert!(matches!(
        rate_movie(&store, "Alien", "five", ""),
        Err(DeskError::ValidationError(_))
    ));
    assert_eq!(fs::read(store.movies().path()).unwrap(), before);

    let movie = rate_movie(&store, "ALIEN", "4.5", " Tense ").unwrap();
    assert_eq!(movie.rating, Some(4.5));
    assert_eq!(movie.review.as_deref(), Some("Tense"));
}

#[test]
fn test_search_by_field() {
    let (_tmp, store) = seeded_store();

    let by_genre = search_movies(&store, MovieField::Genre, "sci").unwrap();
    assert_eq!(by_genre.matches().len(), 1);
    assert_eq!(by_genre.matches()[0].title, "Arrival");

    // Status is matched exactly, not as a substring.
    assert_eq!(
        search_movies(&store, MovieField::Status, "watch").unwrap(),
        SearchOutcome::NoMatches
    );
    let watched = search_movies(&store, MovieField::Status, "Watched").unwrap();
    assert_eq!(watched.matches().len(), 1);

    let by_title = search_movies(&store, MovieField::Title, "AR").unwrap();
    assert_eq!(by_title.matches().len(), 1);
}

#[test]
fn test_search_empty_watchlist() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    assert_eq!(
        search_movies(&store, MovieField::Title, "x").unwrap(),
        SearchOutcome::EmptyStore
    );
}

#[test]
fn test_delete_removes_matching_title() {
    let (_tmp, store) = seeded_store();
    delete_movie(&store, "alien").unwrap();
    let titles: Vec<String> = list_movies(&store).unwrap().into_iter().map(|m| m.title).collect();
    assert_eq!(titles, vec!["Arrival"]);
    assert!(matches!(delete_movie(&store, "alien"), Err(DeskError::NotFound(_))));
}

#[test]
fn test_render_txt_includes_review_for_watched_only() {
    let (_tmp, store) = seeded_store();
    rate_movie(&store, "Alien", "5", "Classic").unwrap();
    let text = render_txt(&list_movies(&store).unwrap());
    assert_eq!(
        text,
        "Alien (1979) - Horror - watched\n 5 | Review: Classic\n\n\
         Arrival (2016) - Sci-Fi - pending\n\n"
    );
}

#[test]
fn test_export_formats() {
    let (tmp, store) = seeded_store();

    let json_path = tmp.path().join("out.json");
    assert_eq!(export_watchlist(&store, ExportFormat::Json, &json_path).unwrap(), 2);
    let exported: Vec<Movie> =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(exported, list_movies(&store).unwrap());

    let txt_path = tmp.path().join("out.txt");
    export_watchlist(&store, ExportFormat::Txt, &txt_path).unwrap();
    assert!(fs::read_to_string(&txt_path).unwrap().starts_with("Alien (1979)"));
}

#[test]
fn test_export_of_empty_watchlist_writes_nothing() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path());
    let path = tmp.path().join("out.json");
    assert!(matches!(
        export_watchlist(&store, ExportFormat::Json, &path),
        Err(DeskError::ValidationError(_))
    ));
    assert!(!path.exists());
}

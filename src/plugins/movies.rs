use crate::core::error;
use crate::core::output::capitalize;
use crate::core::search::{self, SearchOutcome};
use crate::core::store::{Store, to_pretty_json};
use crate::core::validate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieStatus {
    Watched,
    Pending,
}

impl MovieStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "watched" => Some(MovieStatus::Watched),
            "pending" => Some(MovieStatus::Pending),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovieStatus::Watched => "watched",
            MovieStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for MovieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Movie {
    pub title: String,
    pub genre: String,
    pub year: u16,
    pub status: MovieStatus,
    /// Only set once a watched movie is rated.
    pub rating: Option<f64>,
    pub review: Option<String>,
}

impl Movie {
    fn summary_line(&self) -> String {
        format!(
            "{} ({}) - {} - {}",
            self.title,
            self.year,
            self.genre,
            capitalize(self.status.as_str())
        )
    }

    fn review_line(&self) -> Option<String> {
        if self.status != MovieStatus::Watched {
            return None;
        }
        let rating = self
            .rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let review = self.review.as_deref().unwrap_or("-");
        Some(format!("{} | Review: {}", rating, review))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MovieField {
    Title,
    Genre,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Txt,
}

#[derive(Parser, Debug)]
#[clap(name = "movies", about = "Keep a movie watchlist with ratings and reviews.")]
pub struct MoviesCli {
    #[clap(subcommand)]
    pub command: MoviesCommand,
}

#[derive(Subcommand, Debug)]
pub enum MoviesCommand {
    /// Add a movie to the watchlist.
    Add {
        #[clap(long)]
        title: String,
        #[clap(long)]
        genre: String,
        #[clap(long)]
        year: String,
        /// watched | pending
        #[clap(long)]
        status: String,
    },
    /// Edit a movie located by title. Omitted or blank fields are kept.
    Edit {
        #[clap(long)]
        title: String,
        #[clap(long)]
        new_title: Option<String>,
        #[clap(long)]
        genre: Option<String>,
        #[clap(long)]
        year: Option<String>,
        #[clap(long)]
        status: Option<String>,
    },
    /// Delete a movie by title.
    Delete {
        #[clap(long)]
        title: String,
    },
    /// Rate and review a watched movie.
    Rate {
        #[clap(long)]
        title: String,
        /// 0 to 5
        #[clap(long)]
        rating: String,
        #[clap(long, default_value = "")]
        review: String,
    },
    /// Show the whole watchlist.
    List,
    /// Search by title or genre substring, or exact status.
    Search {
        #[clap(long, value_enum)]
        by: MovieField,
        keyword: String,
    },
    /// Export the watchlist.
    Export {
        #[clap(long, value_enum)]
        format: ExportFormat,
        /// Defaults to `watchlist_export.<format>` in the data dir.
        #[clap(long)]
        out: Option<PathBuf>,
    },
}

fn not_found(title: &str) -> error::DeskError {
    error::DeskError::NotFound(format!("movie '{}'", title.trim()))
}

pub fn add_movie(
    store: &Store,
    title: &str,
    genre: &str,
    year: &str,
    status: &str,
) -> Result<Movie, error::DeskError> {
    let title = validate::require_non_empty("title", title)?;
    let genre = validate::require_non_empty("genre", genre)?;
    let year = validate::parse_year(&validate::require_non_empty("year", year)?)?;
    let status = MovieStatus::parse(status).ok_or_else(|| {
        error::DeskError::ValidationError("status must be 'watched' or 'pending'".to_string())
    })?;

    let movie = Movie {
        title,
        genre,
        year,
        status,
        rating: None,
        review: None,
    };
    let watchlist = store.movies();
    let mut movies = watchlist.load()?;
    movies.push(movie.clone());
    watchlist.save(&movies)?;
    Ok(movie)
}

pub fn list_movies(store: &Store) -> Result<Vec<Movie>, error::DeskError> {
    store.movies().load()
}

pub fn edit_movie(
    store: &Store,
    title: &str,
    update: &MovieUpdate,
) -> Result<Movie, error::DeskError> {
    let watchlist = store.movies();
    let mut movies = watchlist.load()?;
    let idx = search::position_ci(&movies, title, |m| m.title.as_str())
        .ok_or_else(|| not_found(title))?;

    let movie = &mut movies[idx];
    if let Some(new_title) = validate::non_blank(update.title.as_deref()) {
        movie.title = new_title;
    }
    if let Some(genre) = validate::non_blank(update.genre.as_deref()) {
        movie.genre = genre;
    }
    if let Some(raw) = validate::non_blank(update.year.as_deref()) {
        match validate::parse_year(&raw) {
            Ok(year) => movie.year = year,
            Err(_) => log::debug!("ignoring invalid year '{}' for '{}'", raw, movie.title),
        }
    }
    if let Some(raw) = validate::non_blank(update.status.as_deref()) {
        match MovieStatus::parse(&raw) {
            Some(status) => movie.status = status,
            None => log::debug!("ignoring invalid status '{}' for '{}'", raw, movie.title),
        }
    }

    let updated = movie.clone();
    watchlist.save(&movies)?;
    Ok(updated)
}

pub fn delete_movie(store: &Store, title: &str) -> Result<Movie, error::DeskError> {
    let watchlist = store.movies();
    let mut movies = watchlist.load()?;
    let idx = search::position_ci(&movies, title, |m| m.title.as_str())
        .ok_or_else(|| not_found(title))?;
    let removed = movies.remove(idx);
    watchlist.save(&movies)?;
    Ok(removed)
}

pub fn rate_movie(
    store: &Store,
    title: &str,
    rating: &str,
    review: &str,
) -> Result<Movie, error::DeskError> {
    let watchlist = store.movies();
    let mut movies = watchlist.load()?;
    let idx = search::position_ci(&movies, title, |m| m.title.as_str())
        .ok_or_else(|| not_found(title))?;
    if movies[idx].status != MovieStatus::Watched {
        return Err(error::DeskError::ValidationError(format!(
            "'{}' is not watched yet; only watched movies can be rated",
            movies[idx].title
        )));
    }
    let rating = validate::parse_rating(rating)?;

    movies[idx].rating = Some(rating);
    movies[idx].review = Some(review.trim().to_string());
    let updated = movies[idx].clone();
    watchlist.save(&movies)?;
    Ok(updated)
}

pub fn search_movies(
    store: &Store,
    by: MovieField,
    keyword: &str,
) -> Result<SearchOutcome<Movie>, error::DeskError> {
    let movies = store.movies().load()?;
    let needle = keyword.trim().to_lowercase();
    Ok(search::search(&movies, |m| match by {
        MovieField::Title => search::contains_ci(&m.title, &needle),
        MovieField::Genre => search::contains_ci(&m.genre, &needle),
        MovieField::Status => m.status.as_str() == needle,
    }))
}

pub fn render_txt(movies: &[Movie]) -> String {
    let mut out = String::new();
    for m in movies {
        out.push_str(&format!(
            "{} ({}) - {} - {}\n",
            m.title, m.year, m.genre, m.status
        ));
        if let Some(line) = m.review_line() {
            out.push_str(&format!(" {}\n", line));
        }
        out.push('\n');
    }
    out
}

/// Write the watchlist to `path` and return the number of movies exported.
pub fn export_watchlist(
    store: &Store,
    format: ExportFormat,
    path: &Path,
) -> Result<usize, error::DeskError> {
    let movies = store.movies().load()?;
    if movies.is_empty() {
        return Err(error::DeskError::ValidationError(
            "nothing to export".to_string(),
        ));
    }
    let body = match format {
        ExportFormat::Json => to_pretty_json(&movies)?,
        ExportFormat::Txt => render_txt(&movies),
    };
    fs::write(path, body).map_err(error::DeskError::IoError)?;
    log::info!("exported {} movies to {}", movies.len(), path.display());
    Ok(movies.len())
}

fn print_movies(movies: &[Movie]) {
    for (i, movie) in movies.iter().enumerate() {
        println!("[{}] {}", i + 1, movie.summary_line());
        if let Some(line) = movie.review_line() {
            println!("    {}", line);
        }
    }
}

pub fn run_movies_cli(store: &Store, cli: MoviesCli) -> Result<(), error::DeskError> {
    match cli.command {
        MoviesCommand::Add {
            title,
            genre,
            year,
            status,
        } => {
            let movie = add_movie(store, &title, &genre, &year, &status)?;
            println!("Movie '{}' added.", movie.title);
        }
        MoviesCommand::Edit {
            title,
            new_title,
            genre,
            year,
            status,
        } => {
            let update = MovieUpdate {
                title: new_title,
                genre,
                year,
                status,
            };
            let movie = edit_movie(store, &title, &update)?;
            println!("Movie '{}' updated.", movie.title);
        }
        MoviesCommand::Delete { title } => {
            let movie = delete_movie(store, &title)?;
            println!("Movie '{}' deleted.", movie.title);
        }
        MoviesCommand::Rate {
            title,
            rating,
            review,
        } => {
            let movie = rate_movie(store, &title, &rating, &review)?;
            println!("Review saved for '{}'.", movie.title);
        }
        MoviesCommand::List => {
            let movies = list_movies(store)?;
            if movies.is_empty() {
                println!("Watchlist is empty.");
            } else {
                print_movies(&movies);
            }
        }
        MoviesCommand::Search { by, keyword } => match search_movies(store, by, &keyword)? {
            SearchOutcome::EmptyStore => println!("Watchlist is empty."),
            SearchOutcome::NoMatches => println!("No movies matched."),
            SearchOutcome::Matches(movies) => print_movies(&movies),
        },
        MoviesCommand::Export { format, out } => {
            let path = out.unwrap_or_else(|| {
                let ext = match format {
                    ExportFormat::Json => "json",
                    ExportFormat::Txt => "txt",
                };
                store.root.join(format!("watchlist_export.{}", ext))
            });
            let count = export_watchlist(store, format, &path)?;
            println!("Exported {} movies to {}", count, path.display());
        }
    }
    Ok(())
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "movies",
        "version": "0.1.0",
        "description": "Movie watchlist",
        "commands": [
            { "name": "add", "parameters": ["title", "genre", "year", "status"] },
            { "name": "edit", "parameters": ["title", "new-title", "genre", "year", "status"] },
            { "name": "delete", "parameters": ["title"] },
            { "name": "rate", "parameters": ["title", "rating", "review"] },
            { "name": "list" },
            { "name": "search", "parameters": ["by", "keyword"] },
            { "name": "export", "parameters": ["format", "out"] }
        ],
        "storage": ["watchlist.json"]
    })
}

use crate::core::error;
use crate::core::output::capitalize;
use crate::core::search::{self, SearchOutcome};
use crate::core::store::Store;
use crate::core::validate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Read,
    Unread,
}

impl BookStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "read" => Some(BookStatus::Read),
            "unread" => Some(BookStatus::Unread),
            _ => None,
        }
    }

    /// Accepts the yes/no answer to "have you read this book?" as well as
    /// the stored status names.
    pub fn from_answer(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "yes" => Some(BookStatus::Read),
            "no" => Some(BookStatus::Unread),
            _ => Self::parse(value),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Read => "read",
            BookStatus::Unread => "unread",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub status: BookStatus,
}

/// Replacement values for [`update_book`]. `None` or blank keeps the field.
#[derive(Debug, Clone, Default)]
pub struct BookUpdate {
    pub author: Option<String>,
    pub genre: Option<String>,
    pub status: Option<String>,
}

#[derive(Parser, Debug)]
#[clap(name = "books", about = "Track the books in your personal library.")]
pub struct BooksCli {
    #[clap(subcommand)]
    pub command: BooksCommand,
}

#[derive(Subcommand, Debug)]
pub enum BooksCommand {
    /// Add a new book.
    Add {
        #[clap(long)]
        title: String,
        #[clap(long, default_value = "")]
        author: String,
        #[clap(long, default_value = "")]
        genre: String,
        /// read | unread (also accepts yes | no).
        #[clap(long)]
        status: String,
    },
    /// Update a book located by title. Omitted or blank fields are kept.
    Update {
        #[clap(long)]
        title: String,
        #[clap(long)]
        author: Option<String>,
        #[clap(long)]
        genre: Option<String>,
        #[clap(long)]
        status: Option<String>,
    },
    /// Delete a book by title.
    Delete {
        #[clap(long)]
        title: String,
    },
    /// Mark a book as read.
    MarkRead {
        #[clap(long)]
        title: String,
    },
    /// List every book.
    List,
    /// List books in a genre.
    ByGenre {
        #[clap(long)]
        genre: String,
    },
    /// List books by read/unread status.
    ByStatus {
        #[clap(long)]
        status: String,
    },
    /// Search titles and authors.
    Search { keyword: String },
}

pub fn add_book(
    store: &Store,
    title: &str,
    author: &str,
    genre: &str,
    status: &str,
) -> Result<Book, error::DeskError> {
    let title = validate::require_non_empty("title", title)?;
    let status = BookStatus::from_answer(status).ok_or_else(|| {
        error::DeskError::ValidationError("status must be 'yes' or 'no'".to_string())
    })?;

    let book = Book {
        title,
        author: author.trim().to_string(),
        genre: genre.trim().to_string(),
        status,
    };

    let books_store = store.books();
    let mut books = books_store.load()?;
    books.push(book.clone());
    books_store.save(&books)?;
    Ok(book)
}

pub fn list_books(store: &Store) -> Result<Vec<Book>, error::DeskError> {
    store.books().load()
}

pub fn update_book(
    store: &Store,
    title: &str,
    update: &BookUpdate,
) -> Result<Book, error::DeskError> {
    let books_store = store.books();
    let mut books = books_store.load()?;
    let idx = search::position_ci(&books, title, |b| b.title.as_str())
        .ok_or_else(|| error::DeskError::NotFound(format!("book '{}'", title.trim())))?;

    let book = &mut books[idx];
    if let Some(author) = validate::non_blank(update.author.as_deref()) {
        book.author = author;
    }
    if let Some(genre) = validate::non_blank(update.genre.as_deref()) {
        book.genre = genre;
    }
    if let Some(raw) = validate::non_blank(update.status.as_deref()) {
        match BookStatus::parse(&raw) {
            Some(status) => book.status = status,
            None => log::debug!("ignoring invalid status '{}' for '{}'", raw, book.title),
        }
    }

    let updated = book.clone();
    books_store.save(&books)?;
    Ok(updated)
}

pub fn delete_book(store: &Store, title: &str) -> Result<Book, error::DeskError> {
    let books_store = store.books();
    let mut books = books_store.load()?;
    let idx = search::position_ci(&books, title, |b| b.title.as_str())
        .ok_or_else(|| error::DeskError::NotFound(format!("book '{}'", title.trim())))?;
    let removed = books.remove(idx);
    books_store.save(&books)?;
    Ok(removed)
}

pub fn mark_read(store: &Store, title: &str) -> Result<Book, error::DeskError> {
    let books_store = store.books();
    let mut books = books_store.load()?;
    let idx = search::position_ci(&books, title, |b| b.title.as_str())
        .ok_or_else(|| error::DeskError::NotFound(format!("book '{}'", title.trim())))?;
    books[idx].status = BookStatus::Read;
    let updated = books[idx].clone();
    books_store.save(&books)?;
    Ok(updated)
}

pub fn books_by_genre(store: &Store, genre: &str) -> Result<SearchOutcome<Book>, error::DeskError> {
    let books = store.books().load()?;
    let genre = genre.trim();
    Ok(search::search(&books, |b| search::eq_ci(&b.genre, genre)))
}

pub fn books_by_status(
    store: &Store,
    status: &str,
) -> Result<SearchOutcome<Book>, error::DeskError> {
    let status = BookStatus::parse(status).ok_or_else(|| {
        error::DeskError::ValidationError(format!("invalid status '{}'", status.trim()))
    })?;
    let books = store.books().load()?;
    Ok(search::search(&books, |b| b.status == status))
}

pub fn search_books(store: &Store, keyword: &str) -> Result<SearchOutcome<Book>, error::DeskError> {
    let books = store.books().load()?;
    let needle = keyword.trim().to_lowercase();
    Ok(search::search(&books, |b| {
        search::contains_ci(&b.title, &needle) || search::contains_ci(&b.author, &needle)
    }))
}

fn print_outcome(outcome: SearchOutcome<Book>, empty_msg: &str) {
    match outcome {
        SearchOutcome::EmptyStore => println!("Your library is empty."),
        SearchOutcome::NoMatches => println!("{}", empty_msg),
        SearchOutcome::Matches(books) => {
            for book in books {
                println!(
                    "{} by {} - {} - Genre: {}",
                    book.title,
                    book.author,
                    capitalize(book.status.as_str()),
                    book.genre
                );
            }
        }
    }
}

pub fn run_books_cli(store: &Store, cli: BooksCli) -> Result<(), error::DeskError> {
    match cli.command {
        BooksCommand::Add {
            title,
            author,
            genre,
            status,
        } => {
            let book = add_book(store, &title, &author, &genre, &status)?;
            println!("Book '{}' added successfully!", book.title);
        }
        BooksCommand::Update {
            title,
            author,
            genre,
            status,
        } => {
            let update = BookUpdate {
                author,
                genre,
                status,
            };
            let book = update_book(store, &title, &update)?;
            println!("Book '{}' updated successfully!", book.title);
        }
        BooksCommand::Delete { title } => {
            let book = delete_book(store, &title)?;
            println!("Book '{}' deleted successfully.", book.title);
        }
        BooksCommand::MarkRead { title } => {
            let book = mark_read(store, &title)?;
            println!("Book '{}' marked as read.", book.title);
        }
        BooksCommand::List => {
            let books = list_books(store)?;
            print_outcome(search::search(&books, |_| true), "");
        }
        BooksCommand::ByGenre { genre } => {
            print_outcome(books_by_genre(store, &genre)?, "No books found in that genre.");
        }
        BooksCommand::ByStatus { status } => {
            print_outcome(
                books_by_status(store, &status)?,
                "No books with that status found.",
            );
        }
        BooksCommand::Search { keyword } => {
            print_outcome(search_books(store, &keyword)?, "No matching books found.");
        }
    }
    Ok(())
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "books",
        "version": "0.1.0",
        "description": "Personal book library",
        "commands": [
            { "name": "add", "parameters": ["title", "author", "genre", "status"] },
            { "name": "update", "parameters": ["title", "author", "genre", "status"] },
            { "name": "delete", "parameters": ["title"] },
            { "name": "mark-read", "parameters": ["title"] },
            { "name": "list" },
            { "name": "by-genre", "parameters": ["genre"] },
            { "name": "by-status", "parameters": ["status"] },
            { "name": "search", "parameters": ["keyword"] }
        ],
        "storage": ["books.json"]
    })
}

use crate::core::error;
use crate::core::output::compact_line;
use crate::core::search::{self, SearchOutcome};
use crate::core::store::Store;
use crate::core::time;
use crate::core::validate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Note {
    pub title: String,
    pub content: String,
    /// `YYYY-MM-DD HH:MM:SS`, reset on every edit.
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NoteOrder {
    /// Newest first.
    Date,
    /// By title, ignoring case.
    Alpha,
}

#[derive(Parser, Debug)]
#[clap(name = "notes", about = "Write, search and edit short notes.")]
pub struct NotesCli {
    #[clap(subcommand)]
    pub command: NotesCommand,
}

#[derive(Subcommand, Debug)]
pub enum NotesCommand {
    /// Add a note.
    Add {
        #[clap(long)]
        title: String,
        #[clap(long)]
        content: String,
    },
    /// List notes.
    List {
        #[clap(long, value_enum, default_value = "date")]
        order: NoteOrder,
        /// Truncate content to this many characters.
        #[clap(long)]
        preview: Option<usize>,
    },
    /// Search titles and content.
    Search { keyword: String },
    /// Edit a note located by title. Omitted or blank fields are kept.
    Edit {
        #[clap(long)]
        title: String,
        #[clap(long)]
        new_title: Option<String>,
        #[clap(long)]
        content: Option<String>,
    },
    /// Delete a note by title.
    Delete {
        #[clap(long)]
        title: String,
    },
}

pub fn add_note(store: &Store, title: &str, content: &str) -> Result<Note, error::DeskError> {
    let title = validate::require_non_empty("title", title)?;
    let content = validate::require_non_empty("content", content)?;
    let note = Note {
        title,
        content,
        timestamp: time::now_timestamp(),
    };
    let notes_store = store.notes();
    let mut notes = notes_store.load()?;
    notes.push(note.clone());
    notes_store.save(&notes)?;
    Ok(note)
}

/// Sorted copy for display; the stored order is untouched.
pub fn list_notes(store: &Store, order: NoteOrder) -> Result<Vec<Note>, error::DeskError> {
    let mut notes = store.notes().load()?;
    match order {
        NoteOrder::Alpha => notes.sort_by_key(|n| n.title.to_lowercase()),
        // Stable sort keeps insertion order among equal timestamps.
        NoteOrder::Date => notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }
    Ok(notes)
}

pub fn search_notes(store: &Store, keyword: &str) -> Result<SearchOutcome<Note>, error::DeskError> {
    let notes = store.notes().load()?;
    let needle = keyword.trim().to_lowercase();
    Ok(search::search(&notes, |n| {
        search::contains_ci(&n.title, &needle) || search::contains_ci(&n.content, &needle)
    }))
}

pub fn edit_note(
    store: &Store,
    title: &str,
    new_title: Option<&str>,
    content: Option<&str>,
) -> Result<Note, error::DeskError> {
    let notes_store = store.notes();
    let mut notes = notes_store.load()?;
    let idx = search::position_ci(&notes, title, |n| n.title.as_str())
        .ok_or_else(|| error::DeskError::NotFound(format!("note '{}'", title.trim())))?;

    let note = &mut notes[idx];
    if let Some(t) = validate::non_blank(new_title) {
        note.title = t;
    }
    if let Some(c) = validate::non_blank(content) {
        note.content = c;
    }
    note.timestamp = time::now_timestamp();

    let updated = note.clone();
    notes_store.save(&notes)?;
    Ok(updated)
}

pub fn delete_note(store: &Store, title: &str) -> Result<Note, error::DeskError> {
    let notes_store = store.notes();
    let mut notes = notes_store.load()?;
    let idx = search::position_ci(&notes, title, |n| n.title.as_str())
        .ok_or_else(|| error::DeskError::NotFound(format!("note '{}'", title.trim())))?;
    let removed = notes.remove(idx);
    notes_store.save(&notes)?;
    Ok(removed)
}

fn print_notes(notes: &[Note], preview: Option<usize>) {
    for (idx, note) in notes.iter().enumerate() {
        println!("[{}] {} ({})", idx + 1, note.title, note.timestamp);
        match preview {
            Some(max) => println!("{}", compact_line(&note.content, max)),
            None => println!("{}", note.content),
        }
    }
}

pub fn run_notes_cli(store: &Store, cli: NotesCli) -> Result<(), error::DeskError> {
    match cli.command {
        NotesCommand::Add { title, content } => {
            let note = add_note(store, &title, &content)?;
            println!("Note '{}' added successfully.", note.title);
        }
        NotesCommand::List { order, preview } => {
            let notes = list_notes(store, order)?;
            if notes.is_empty() {
                println!("No notes found.");
            } else {
                print_notes(&notes, preview);
            }
        }
        NotesCommand::Search { keyword } => match search_notes(store, &keyword)? {
            SearchOutcome::EmptyStore => println!("No notes found."),
            SearchOutcome::NoMatches => println!("No notes matched your keyword."),
            SearchOutcome::Matches(notes) => print_notes(&notes, None),
        },
        NotesCommand::Edit {
            title,
            new_title,
            content,
        } => {
            let note = edit_note(store, &title, new_title.as_deref(), content.as_deref())?;
            println!("Note '{}' updated.", note.title);
        }
        NotesCommand::Delete { title } => {
            let note = delete_note(store, &title)?;
            println!("Note '{}' deleted.", note.title);
        }
    }
    Ok(())
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "notes",
        "version": "0.1.0",
        "description": "Notes taking app",
        "commands": [
            { "name": "add", "parameters": ["title", "content"] },
            { "name": "list", "parameters": ["order", "preview"] },
            { "name": "search", "parameters": ["keyword"] },
            { "name": "edit", "parameters": ["title", "new-title", "content"] },
            { "name": "delete", "parameters": ["title"] }
        ],
        "storage": ["notes.json"]
    })
}

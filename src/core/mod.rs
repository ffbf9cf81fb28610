//! Shared infrastructure for pocketdesk's tools.
//!
//! Nothing here knows about a particular record type beyond the file names
//! in [`schemas`] and the typed accessors on [`store::Store`].

pub mod config;
pub mod db;
pub mod error;
pub mod output;
pub mod schemas;
pub mod search;
pub mod store;
pub mod time;
pub mod validate;

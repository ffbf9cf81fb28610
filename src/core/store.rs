//! Store abstraction for pocketdesk's on-disk state.
//!
//! Every tool owns exactly one backing file under the store root. JSON-backed
//! tools round-trip their whole collection through [`JsonStore`] on each
//! mutation; the attendance tracker keeps a SQLite database instead.

use crate::core::error;
use crate::core::schemas;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Store handle representing a pocketdesk data directory.
#[derive(Debug, Clone)]
pub struct Store {
    /// Absolute or working-directory-relative path to the data directory
    pub root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn books(&self) -> JsonStore<crate::plugins::books::Book> {
        JsonStore::new(self.root.join(schemas::BOOKS_FILE))
    }

    pub fn calc_history(&self) -> JsonStore<crate::plugins::calc::CalcEntry> {
        JsonStore::new(self.root.join(schemas::CALC_HISTORY_FILE))
    }

    pub fn emi_history(&self) -> JsonStore<crate::plugins::emi::LoanCalculation> {
        JsonStore::new(self.root.join(schemas::EMI_HISTORY_FILE))
    }

    pub fn movies(&self) -> JsonStore<crate::plugins::movies::Movie> {
        JsonStore::new(self.root.join(schemas::WATCHLIST_FILE))
    }

    pub fn notes(&self) -> JsonStore<crate::plugins::notes::Note> {
        JsonStore::new(self.root.join(schemas::NOTES_FILE))
    }

    pub fn weather_history(&self) -> JsonStore<crate::plugins::weather::WeatherReport> {
        JsonStore::new(self.root.join(schemas::WEATHER_HISTORY_FILE))
    }

    pub fn attendance_db_path(&self) -> PathBuf {
        self.root.join(schemas::ATTENDANCE_DB_NAME)
    }
}

/// A flat, ordered collection of records persisted as one JSON array.
///
/// There is no locking: two processes saving the same file race and the last
/// writer wins.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the full collection. An absent file is an empty collection; a
    /// malformed one is an error with no recovery.
    pub fn load(&self) -> Result<Vec<T>, error::DeskError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(error::DeskError::IoError)?;
        let records: Vec<T> = serde_json::from_str(&content)?;
        log::debug!(
            "loaded {} records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    /// Overwrite the backing file with `records`.
    pub fn save(&self, records: &[T]) -> Result<(), error::DeskError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(error::DeskError::IoError)?;
        }

        let body = to_pretty_json(records)?;
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut f = fs::File::create(&tmp_path).map_err(error::DeskError::IoError)?;
            f.write_all(body.as_bytes())
                .map_err(error::DeskError::IoError)?;
            f.sync_all().map_err(error::DeskError::IoError)?;
        }
        fs::rename(&tmp_path, &self.path).map_err(error::DeskError::IoError)?;

        log::info!("saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Render a value as JSON with a 4-space indent.
pub fn to_pretty_json<V: Serialize + ?Sized>(value: &V) -> Result<String, error::DeskError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| error::DeskError::ValidationError(e.to_string()))
}

//! Tool registration: centralizes schema descriptors and storage setup.
//!
//! Adding a new tool: append one entry to `TOOLS`.

use crate::core::error;
use crate::core::store::Store;
use crate::plugins::{attendance, books, calc, emi, movies, notes, weather};
use std::collections::BTreeMap;

pub(crate) struct ToolInfo {
    pub name: &'static str,
    pub schema: fn() -> serde_json::Value,
    /// Storage that must exist before first use; JSON tools create theirs lazily.
    pub initialize: Option<fn(&Store) -> Result<(), error::DeskError>>,
}

pub(crate) const TOOLS: &[ToolInfo] = &[
    ToolInfo { name: "books", schema: books::schema, initialize: None },
    ToolInfo { name: "calc", schema: calc::schema, initialize: None },
    ToolInfo {
        name: "attendance",
        schema: attendance::schema,
        initialize: Some(attendance::initialize_attendance_db),
    },
    ToolInfo { name: "emi", schema: emi::schema, initialize: None },
    ToolInfo { name: "movies", schema: movies::schema, initialize: None },
    ToolInfo { name: "notes", schema: notes::schema, initialize: None },
    ToolInfo { name: "weather", schema: weather::schema, initialize: None },
];

pub fn all_schemas() -> BTreeMap<&'static str, serde_json::Value> {
    TOOLS.iter().map(|t| (t.name, (t.schema)())).collect()
}

pub fn tool_schema(name: &str) -> Option<serde_json::Value> {
    TOOLS.iter().find(|t| t.name == name).map(|t| (t.schema)())
}

/// Create the data directory and any storage that is not created lazily.
pub fn initialize_all(store: &Store) -> Result<(), error::DeskError> {
    std::fs::create_dir_all(&store.root).map_err(error::DeskError::IoError)?;
    for tool in TOOLS {
        if let Some(init) = tool.initialize {
            init(store)?;
        }
    }
    Ok(())
}

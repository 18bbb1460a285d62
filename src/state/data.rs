/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the database layer and the UI layer.

use std::path::PathBuf;

use super::error::IngestError;

/// Represents a single file recorded in a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Unique database ID
    pub id: i64,
    /// Filename only, without directory or extension (e.g., "report")
    pub filename: String,
    /// Stamped at ingestion time (`YYYY-MM-DD HH:MM:SS`, local)
    pub create_date: String,
    /// Stamped at ingestion time, always equal to `create_date` on insert
    pub add_date: String,
    /// Extension including the leading dot (e.g., ".pdf"), empty if none
    pub file_extension: String,
    /// Size in bytes
    pub size: u64,
}

/// An entry that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub filename: String,
    pub create_date: String,
    pub add_date: String,
    pub file_extension: String,
    pub size: u64,
}

impl NewEntry {
    /// Attach the id assigned by the store
    pub fn with_id(self, id: i64) -> CatalogEntry {
        CatalogEntry {
            id,
            filename: self.filename,
            create_date: self.create_date,
            add_date: self.add_date,
            file_extension: self.file_extension,
            size: self.size,
        }
    }
}

/// Outcome of ingesting one selected path
#[derive(Debug)]
pub struct IngestOutcome {
    pub path: PathBuf,
    pub result: Result<CatalogEntry, IngestError>,
}

/// Result of a multi-file add
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<IngestOutcome>,
}

impl BatchReport {
    /// Entries that made it into the catalog, in input order
    pub fn inserted(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Paths that were skipped, with the reason
    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &IngestError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.path, e)))
    }

    pub fn inserted_count(&self) -> usize {
        self.inserted().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }
}

/// What happened when the user asked to close a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabClosure {
    /// Tab removed and its catalog file deleted
    Closed,
    /// User declined the confirmation prompt
    Declined,
    /// No tab at that index
    Missing,
}

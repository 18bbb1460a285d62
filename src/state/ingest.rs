/// File ingestion
///
/// Turns a path picked by the user into a `NewEntry` ready for the store.
/// Only the size comes from the filesystem; both dates are stamped with the
/// time of processing.

use chrono::Local;
use std::fs;
use std::path::Path;

use super::data::NewEntry;
use super::error::IngestError;

/// Format used for `create_date` and `add_date`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time, second precision
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Split a file name into (stem, extension).
///
/// The extension starts at the last dot and keeps it. Leading dots belong to
/// the stem, so ".bashrc" has no extension.
pub fn split_file_name(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(dot) => name.split_at(leading + dot),
        None => (name, ""),
    }
}

/// Build the entry for one selected path
pub fn describe_file(path: &Path, stamped_at: &str) -> Result<NewEntry, IngestError> {
    if path.as_os_str().is_empty() {
        return Err(IngestError::EmptyPath);
    }

    let metadata = fs::metadata(path).map_err(|source| IngestError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    if !metadata.is_file() {
        return Err(IngestError::NotAFile(path.to_path_buf()));
    }

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy();
    let (stem, extension) = split_file_name(&name);

    Ok(NewEntry {
        filename: stem.to_string(),
        create_date: stamped_at.to_string(),
        add_date: stamped_at.to_string(),
        file_extension: extension.to_string(),
        size: metadata.len(),
    })
}

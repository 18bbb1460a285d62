use rusqlite::{params, Connection};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::data::{CatalogEntry, NewEntry};
use super::error::CatalogError;

/// The CatalogStore manages one tab's SQLite catalog file.
/// It records one row per ingested file in the `files` table.
pub struct CatalogStore {
    conn: Option<Connection>,
    db_path: PathBuf,
}

impl CatalogStore {
    /// Open (or create) the catalog file at `path` and make sure the
    /// `files` table exists.
    ///
    /// The parent directory must already exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let db_path = path.into();

        let conn = Connection::open(&db_path).map_err(|source| CatalogError::StorageUnavailable {
            path: db_path.clone(),
            source,
        })?;

        init_schema(&conn).map_err(|source| CatalogError::StorageUnavailable {
            path: db_path.clone(),
            source,
        })?;

        tracing::debug!(path = %db_path.display(), "catalog opened");

        Ok(CatalogStore {
            conn: Some(conn),
            db_path,
        })
    }

    /// Get the path to the catalog file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Get all entries in whatever order SQLite returns them
    /// (insertion order in practice).
    pub fn list_all(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, filename, create_date, add_date, file_extension, size FROM files",
        )?;

        let entry_iter = stmt.query_map([], |row| {
            Ok(CatalogEntry {
                id: row.get(0)?,
                filename: row.get(1)?,
                create_date: row.get(2)?,
                add_date: row.get(3)?,
                file_extension: row.get(4)?,
                size: row.get(5)?,
            })
        })?;

        let mut entries = Vec::new();
        for entry in entry_iter {
            entries.push(entry?);
        }

        Ok(entries)
    }

    /// Append one entry. SQLite autocommits the single statement, so every
    /// insert is its own transaction.
    pub fn insert(&self, entry: NewEntry) -> Result<CatalogEntry, CatalogError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO files (filename, create_date, add_date, file_extension, size)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.filename,
                entry.create_date,
                entry.add_date,
                entry.file_extension,
                entry.size,
            ],
        )?;

        Ok(entry.with_id(conn.last_insert_rowid()))
    }

    /// Delete every row in one transaction. The table and the file stay.
    /// Returns the number of removed rows.
    pub fn clear(&mut self) -> Result<usize, CatalogError> {
        let db_path = self.db_path.clone();
        let conn = self.conn.as_mut().ok_or(CatalogError::Closed(db_path))?;

        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM files", [])?;
        tx.commit()?;

        tracing::info!(path = %self.db_path.display(), removed, "catalog cleared");
        Ok(removed)
    }

    /// Release the connection. Calling this on a closed store does nothing.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_conn, error)) = conn.close() {
                // The connection is dropped here, which finalizes it anyway.
                tracing::warn!(path = %self.db_path.display(), %error, "catalog close reported an error");
            }
        }
    }

    /// Close the connection, then delete the catalog file from disk.
    /// A file that is already gone is not an error.
    pub fn destroy(&mut self) -> Result<(), CatalogError> {
        self.close();

        remove_if_present(&self.db_path)?;
        remove_if_present(&journal_path(&self.db_path))?;

        tracing::info!(path = %self.db_path.display(), "catalog destroyed");
        Ok(())
    }

    fn connection(&self) -> Result<&Connection, CatalogError> {
        self.conn
            .as_ref()
            .ok_or_else(|| CatalogError::Closed(self.db_path.clone()))
    }
}

/// Create the `files` table if it doesn't exist
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS files (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            filename        TEXT NOT NULL,
            create_date     DATETIME NOT NULL,
            add_date        DATETIME NOT NULL,
            file_extension  TEXT NOT NULL,
            size            INTEGER NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn journal_path(db_path: &Path) -> PathBuf {
    let mut name = db_path.as_os_str().to_owned();
    name.push("-journal");
    PathBuf::from(name)
}

fn remove_if_present(path: &Path) -> Result<(), CatalogError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error.into()),
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("db_path", &self.db_path)
            .field("open", &self.is_open())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(filename: &str, ext: &str, size: u64) -> NewEntry {
        NewEntry {
            filename: filename.to_string(),
            create_date: "2024-05-01 10:00:00".to_string(),
            add_date: "2024-05-01 10:00:00".to_string(),
            file_extension: ext.to_string(),
            size,
        }
    }

    #[test]
    fn test_open_creates_files_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Invoices_data.db");

        let store = CatalogStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.list_all().unwrap().is_empty());

        let conn = Connection::open(&path).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='files'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_open_in_missing_directory_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("x_data.db");

        let result = CatalogStore::open(&path);
        assert!(matches!(
            result,
            Err(CatalogError::StorageUnavailable { .. })
        ));
    }

    #[test]
    fn test_insert_assigns_increasing_ids_in_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(dir.path().join("a_data.db")).unwrap();

        let first = store.insert(sample("a", ".pdf", 100)).unwrap();
        let second = store.insert(sample("b", ".pdf", 250)).unwrap();
        assert!(second.id > first.id);

        let entries = store.list_all().unwrap();
        assert_eq!(entries, vec![first, second]);
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keep_data.db");

        let mut store = CatalogStore::open(&path).unwrap();
        store.insert(sample("notes", ".txt", 12)).unwrap();
        store.close();

        let reopened = CatalogStore::open(&path).unwrap();
        let entries = reopened.list_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filename, "notes");
        assert_eq!(entries[0].size, 12);
    }

    #[test]
    fn test_clear_empties_but_keeps_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c_data.db");
        let mut store = CatalogStore::open(&path).unwrap();

        for i in 0..5 {
            store.insert(sample(&format!("f{i}"), "", i)).unwrap();
        }

        assert_eq!(store.clear().unwrap(), 5);
        assert!(store.list_all().unwrap().is_empty());
        assert!(path.exists());

        // Clearing an empty catalog is fine too
        assert_eq!(store.clear().unwrap(), 0);
        store.insert(sample("again", ".md", 1)).unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_close_twice_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut store = CatalogStore::open(dir.path().join("d_data.db")).unwrap();

        store.close();
        store.close();
        assert!(!store.is_open());
        assert!(matches!(store.list_all(), Err(CatalogError::Closed(_))));
    }

    #[test]
    fn test_destroy_removes_file_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("e_data.db");
        let mut store = CatalogStore::open(&path).unwrap();
        store.insert(sample("gone", ".bin", 3)).unwrap();

        store.destroy().unwrap();
        assert!(!path.exists());
        store.destroy().unwrap();

        let fresh = CatalogStore::open(&path).unwrap();
        assert!(fresh.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_stores_are_isolated() {
        let dir = TempDir::new().unwrap();
        let left = CatalogStore::open(dir.path().join("left_data.db")).unwrap();
        let right = CatalogStore::open(dir.path().join("right_data.db")).unwrap();

        left.insert(sample("only-left", ".txt", 1)).unwrap();

        assert_eq!(left.list_all().unwrap().len(), 1);
        assert!(right.list_all().unwrap().is_empty());
    }
}

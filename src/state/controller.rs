use std::fs;
use std::path::{Path, PathBuf};

use super::catalog::CatalogStore;
use super::data::{BatchReport, CatalogEntry, IngestOutcome, TabClosure};
use super::error::{CatalogError, IngestError, ValidationError};
use super::ingest::{describe_file, timestamp_now};

/// Catalog file backing the tab that exists at start-up
pub const DEFAULT_CATALOG_FILE: &str = "default_folder.db";

/// Suffix appended to a tab name to get its catalog file name
pub const CATALOG_SUFFIX: &str = "_data.db";

/// Stable identifier for a tab, independent of its position or label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(u64);

/// One open tab and the catalog it owns
#[derive(Debug)]
pub struct CatalogTab {
    id: TabId,
    label: String,
    store: CatalogStore,
}

impl CatalogTab {
    pub fn id(&self) -> TabId {
        self.id
    }

    /// Display label. May differ from the catalog file name after a rename.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }
}

/// Maps user actions onto catalog stores and keeps the row set
/// for the focused tab.
///
/// Tabs are kept in display order; the index used by every operation is the
/// tab's position.
#[derive(Debug)]
pub struct CatalogController {
    catalog_dir: PathBuf,
    tabs: Vec<CatalogTab>,
    active: Option<usize>,
    rows: Vec<CatalogEntry>,
    next_tab_id: u64,
}

impl CatalogController {
    /// Create a controller whose catalogs live in `catalog_dir`.
    /// The directory is created if needed.
    pub fn new(catalog_dir: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let catalog_dir = catalog_dir.into();
        fs::create_dir_all(&catalog_dir)?;

        Ok(CatalogController {
            catalog_dir,
            tabs: Vec::new(),
            active: None,
            rows: Vec::new(),
            next_tab_id: 0,
        })
    }

    pub fn catalog_dir(&self) -> &Path {
        &self.catalog_dir
    }

    pub fn tabs(&self) -> &[CatalogTab] {
        &self.tabs
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&CatalogTab> {
        self.active.and_then(|index| self.tabs.get(index))
    }

    /// Rows of the focused tab as of the last refresh
    pub fn rows(&self) -> &[CatalogEntry] {
        &self.rows
    }

    /// Catalog file used for a tab called `name`
    pub fn catalog_path_for(&self, name: &str) -> PathBuf {
        self.catalog_dir.join(format!("{name}{CATALOG_SUFFIX}"))
    }

    /// Open the start-up tab backed by `default_folder.db` and focus it
    pub fn open_default(&mut self, label: &str) -> Result<usize, CatalogError> {
        let path = self.catalog_dir.join(DEFAULT_CATALOG_FILE);
        let index = self.push_tab(label.to_string(), CatalogStore::open(path)?);
        self.focus(index)?;
        Ok(index)
    }

    /// Reopen every `<name>_data.db` left in the catalog directory as a tab,
    /// in name order. Catalogs that fail to open are logged and skipped.
    /// Focus is left unchanged. Returns the number of restored tabs.
    pub fn restore_catalogs(&mut self) -> Result<usize, CatalogError> {
        let mut names: Vec<String> = fs::read_dir(&self.catalog_dir)?
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().into_owned();
                file_name
                    .strip_suffix(CATALOG_SUFFIX)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .collect();
        names.sort();

        let mut restored = 0;
        for name in names {
            let path = self.catalog_path_for(&name);
            if self.is_bound(&path) {
                continue;
            }

            match CatalogStore::open(&path) {
                Ok(store) => {
                    self.push_tab(name, store);
                    restored += 1;
                }
                Err(error) => {
                    tracing::error!(%error, "skipping catalog that failed to open");
                }
            }
        }

        if restored > 0 {
            tracing::info!(restored, "restored catalogs from previous session");
        }
        Ok(restored)
    }

    /// Create a tab with its own catalog and focus it
    pub fn create_catalog(&mut self, name: &str) -> Result<usize, CatalogError> {
        let name = validate_name(name)?;

        let path = self.catalog_path_for(name);
        if self.is_bound(&path) {
            return Err(ValidationError::DuplicateName(name.to_string()).into());
        }

        let store = CatalogStore::open(&path)?;
        let index = self.push_tab(name.to_string(), store);
        self.focus(index)?;

        tracing::info!(name, path = %path.display(), "catalog created");
        Ok(index)
    }

    /// Change a tab's label. The catalog file keeps its original name.
    pub fn rename_tab(&mut self, index: usize, new_name: &str) -> Result<(), CatalogError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let tab = self
            .tabs
            .get_mut(index)
            .ok_or(CatalogError::NotFound { index })?;

        tracing::info!(from = %tab.label, to = new_name, "tab renamed");
        tab.label = new_name.to_string();
        Ok(())
    }

    /// Close a tab and delete its catalog if `confirm` agrees.
    ///
    /// `confirm` receives the prompt to show the user.
    pub fn close_tab<F>(&mut self, index: usize, confirm: F) -> Result<TabClosure, CatalogError>
    where
        F: FnOnce(&str) -> bool,
    {
        let Some(tab) = self.tabs.get(index) else {
            let error = CatalogError::NotFound { index };
            tracing::warn!(%error, "close ignored");
            return Ok(TabClosure::Missing);
        };

        let prompt = format!(
            "Delete the catalog '{}' and all of its entries? This cannot be undone.",
            tab.label
        );
        if !confirm(&prompt) {
            return Ok(TabClosure::Declined);
        }

        let mut tab = self.tabs.remove(index);
        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) if active == index => Some(index.min(self.tabs.len() - 1)),
            other => other,
        };

        let destroyed = tab.store.destroy();
        let refreshed = self.refresh();

        if let Err(error) = destroyed {
            if let Err(refresh_error) = &refreshed {
                tracing::error!(error = %refresh_error, "failed to reload rows after closing tab");
            }
            tracing::error!(%error, path = %tab.store_path().display(), "catalog file was not deleted");
            return Err(error);
        }
        refreshed?;

        tracing::info!(label = %tab.label, "tab closed");
        Ok(TabClosure::Closed)
    }

    /// Focus another tab and load its rows
    pub fn select_tab(&mut self, index: usize) -> Result<(), CatalogError> {
        if index >= self.tabs.len() {
            let error = CatalogError::NotFound { index };
            tracing::warn!(%error, "select ignored");
            return Ok(());
        }
        self.focus(index)
    }

    /// Record each path in the focused catalog.
    ///
    /// Every path gets its own outcome; a failing path is logged and the
    /// rest of the batch still runs.
    pub fn add_files<I, P>(&mut self, paths: I) -> BatchReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = BatchReport::default();

        let Some(tab) = self.active_tab() else {
            tracing::warn!("no catalog is focused, nothing added");
            return report;
        };

        for path in paths {
            let path = path.as_ref();
            let stamped_at = timestamp_now();

            let result = describe_file(path, &stamped_at).and_then(|entry| {
                tab.store.insert(entry).map_err(|source| IngestError::Insert {
                    path: path.to_path_buf(),
                    source,
                })
            });

            match &result {
                Ok(entry) => tracing::debug!(id = entry.id, path = %path.display(), "file added"),
                Err(error) => tracing::warn!(%error, "error adding file"),
            }

            report.outcomes.push(IngestOutcome {
                path: path.to_path_buf(),
                result,
            });
        }

        tracing::info!(
            added = report.inserted_count(),
            failed = report.failed_count(),
            "add files finished"
        );

        if let Err(error) = self.refresh() {
            tracing::error!(%error, "failed to reload catalog after adding files");
        }
        report
    }

    /// Empty the focused catalog. Other tabs are untouched.
    pub fn clear_active_catalog(&mut self) -> Result<usize, CatalogError> {
        let Some(index) = self.active else {
            tracing::warn!("no catalog is focused, nothing cleared");
            return Ok(0);
        };

        let removed = self.tabs[index].store.clear()?;
        self.refresh()?;
        Ok(removed)
    }

    /// Replace the row set with the focused catalog's contents
    pub fn refresh(&mut self) -> Result<(), CatalogError> {
        self.rows = match self.active_tab() {
            Some(tab) => tab.store.list_all()?,
            None => Vec::new(),
        };
        Ok(())
    }

    fn focus(&mut self, index: usize) -> Result<(), CatalogError> {
        self.active = Some(index);
        self.refresh()
    }

    fn push_tab(&mut self, label: String, store: CatalogStore) -> usize {
        let id = TabId(self.next_tab_id);
        self.next_tab_id += 1;
        self.tabs.push(CatalogTab { id, label, store });
        self.tabs.len() - 1
    }

    /// Case-insensitive, since macOS and Windows resolve "Invoices" and
    /// "invoices" to the same catalog file.
    fn is_bound(&self, path: &Path) -> bool {
        let wanted = path.to_string_lossy().to_lowercase();
        self.tabs
            .iter()
            .any(|tab| tab.store_path().to_string_lossy().to_lowercase() == wanted)
    }
}

/// Trimmed tab name, or why it can't be used
fn validate_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(name)
}

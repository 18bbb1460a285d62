/// State management module
///
/// This module handles all application state, including:
/// - One SQLite catalog per tab (catalog.rs)
/// - The tab registry and user actions (controller.rs)
/// - Turning picked files into entries (ingest.rs)
/// - Shared data structures (data.rs)
/// - Error types (error.rs)

pub mod catalog;
pub mod controller;
pub mod data;
pub mod error;
pub mod ingest;

pub use controller::CatalogController;
pub use data::{BatchReport, CatalogEntry, TabClosure};
pub use error::{CatalogError, ValidationError};

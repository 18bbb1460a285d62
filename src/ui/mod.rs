/// Widgets for the main window
///
/// - `tabs.rs` - tab bar and the create / rename dialog panel
/// - `table.rs` - the sortable catalog table

pub mod table;
pub mod tabs;

pub use table::{entry_table, SortColumn, SortState};
pub use tabs::{dialog_panel, tab_bar, Dialog};

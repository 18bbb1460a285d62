use iced::widget::{button, column, row, text, Column};
use iced::{Element, Length, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

mod config;
mod state;
mod ui;

use config::AppConfig;
use state::{CatalogController, CatalogError, TabClosure};
use ui::{Dialog, SortColumn, SortState};

/// Main application state
struct FileCatalog {
    /// Tabs and their catalogs
    controller: CatalogController,
    /// How the table is currently sorted
    sort: SortState,
    /// Inline create / rename panel
    dialog: Dialog,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Add files"
    AddFiles,
    /// User clicked a tab
    SelectTab(usize),
    /// User clicked a tab's close button
    CloseTab(usize),
    /// User clicked "New tab"
    ShowCreateTab,
    /// User clicked "Rename tab"
    ShowRenameTab,
    /// Text typed into the open dialog
    DialogInput(String),
    /// Create / Change pressed in the open dialog
    SubmitDialog,
    /// Close pressed in the open dialog
    CancelDialog,
    /// User clicked "Clear catalog"
    ClearCatalog,
    /// User clicked a column header
    SortBy(SortColumn),
}

impl FileCatalog {
    /// Create a new instance of the application
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        // Without a catalog directory there is nothing the app can do
        let mut controller = match CatalogController::new(&config.catalog_dir) {
            Ok(controller) => controller,
            Err(error) => {
                tracing::error!(%error, dir = %config.catalog_dir.display(), "cannot prepare catalog directory");
                show_message(MessageLevel::Error, "Storage Error", &error.to_string());
                std::process::exit(1);
            }
        };

        let mut status = String::from("Ready.");

        if let Err(error) = controller.open_default(&config.default_tab_label) {
            tracing::error!(%error, "failed to open default catalog");
            show_message(MessageLevel::Error, "Storage Error", &error.to_string());
            status = format!("Default catalog unavailable: {error}");
        }

        if config.restore_catalogs {
            match controller.restore_catalogs() {
                Ok(0) => {}
                Ok(restored) => status = format!("Ready. Restored {restored} catalogs."),
                Err(error) => tracing::error!(%error, "failed to scan catalog directory"),
            }
        }

        tracing::info!(
            dir = %controller.catalog_dir().display(),
            tabs = controller.tabs().len(),
            "file catalog initialized"
        );

        (
            FileCatalog {
                controller,
                sort: SortState::default(),
                dialog: Dialog::None,
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::AddFiles => {
                if self.controller.active_tab().is_none() {
                    self.status = "Create a tab before adding files.".to_string();
                    return Task::none();
                }

                // Show the native file picker dialog
                if let Some(paths) = FileDialog::new().set_title("Select files").pick_files() {
                    let report = self.controller.add_files(&paths);
                    self.status = if report.failed_count() == 0 {
                        format!("Added {} files.", report.inserted_count())
                    } else {
                        format!(
                            "Added {} files, skipped {} (see log).",
                            report.inserted_count(),
                            report.failed_count()
                        )
                    };
                }
            }
            Message::SelectTab(index) => {
                if let Err(error) = self.controller.select_tab(index) {
                    self.report_error(error);
                }
            }
            Message::CloseTab(index) => {
                match self.controller.close_tab(index, confirm) {
                    Ok(TabClosure::Closed) => {
                        self.status = "Tab closed and its catalog deleted.".to_string();
                        // Indices shifted under a pending rename
                        if matches!(self.dialog, Dialog::RenameTab { .. }) {
                            self.dialog = Dialog::None;
                        }
                    }
                    Ok(TabClosure::Declined) | Ok(TabClosure::Missing) => {}
                    Err(error) => self.report_error(error),
                }
            }
            Message::ShowCreateTab => {
                self.dialog = Dialog::CreateTab {
                    name: String::new(),
                };
            }
            Message::ShowRenameTab => {
                if let Some(index) = self.controller.active_index() {
                    let name = self.controller.tabs()[index].label().to_string();
                    self.dialog = Dialog::RenameTab { index, name };
                }
            }
            Message::DialogInput(value) => match &mut self.dialog {
                Dialog::CreateTab { name } | Dialog::RenameTab { name, .. } => *name = value,
                Dialog::None => {}
            },
            Message::SubmitDialog => self.submit_dialog(),
            Message::CancelDialog => self.dialog = Dialog::None,
            Message::ClearCatalog => match self.controller.clear_active_catalog() {
                Ok(removed) => self.status = format!("Catalog cleared ({removed} entries removed)."),
                Err(error) => self.report_error(error),
            },
            Message::SortBy(column) => self.sort.toggle(column),
        }

        Task::none()
    }

    fn submit_dialog(&mut self) {
        let result = match &self.dialog {
            Dialog::None => return,
            Dialog::CreateTab { name } => self
                .controller
                .create_catalog(name)
                .map(|_| format!("Created tab '{}'.", name.trim())),
            Dialog::RenameTab { index, name } => self
                .controller
                .rename_tab(*index, name)
                .map(|_| format!("Renamed tab to '{}'.", name.trim())),
        };

        match result {
            Ok(status) => {
                self.status = status;
                self.dialog = Dialog::None;
            }
            // The dialog stays open so the user can fix the name
            Err(CatalogError::Validation(error)) => {
                show_message(MessageLevel::Warning, "Input Error", &error.to_string());
            }
            Err(error) => {
                show_message(MessageLevel::Error, "Storage Error", &error.to_string());
                self.report_error(error);
                self.dialog = Dialog::None;
            }
        }
    }

    fn report_error(&mut self, error: CatalogError) {
        tracing::error!(%error, "catalog operation failed");
        self.status = format!("Error: {error}");
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let has_tab = self.controller.active_tab().is_some();

        let toolbar = row![
            button("Add files").on_press_maybe(has_tab.then_some(Message::AddFiles)),
            button("New tab").on_press(Message::ShowCreateTab),
            button("Rename tab").on_press_maybe(has_tab.then_some(Message::ShowRenameTab)),
            button("Clear catalog")
                .on_press_maybe(has_tab.then_some(Message::ClearCatalog))
                .style(button::danger),
        ]
        .spacing(10);

        let mut content: Column<Message> = column![toolbar, ui::tab_bar(&self.controller)]
            .spacing(12)
            .padding(16);

        if let Some(panel) = ui::dialog_panel(&self.dialog) {
            content = content.push(panel);
        }

        content
            .push(ui::entry_table(self.controller.rows(), self.sort))
            .push(text(&self.status).size(14))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Ask the user to confirm a destructive action
fn confirm(prompt: &str) -> bool {
    let answer = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Close tab")
        .set_description(prompt)
        .set_buttons(MessageButtons::YesNo)
        .show();
    answer == MessageDialogResult::Yes
}

/// Blocking message box
fn show_message(level: MessageLevel, title: &str, description: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn main() -> iced::Result {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(error) => (AppConfig::default(), Some(error)),
    };

    config.logging.init();
    if let Some(error) = config_error {
        tracing::warn!(%error, "using default configuration");
    }

    iced::application("File Catalog", FileCatalog::update, FileCatalog::view)
        .theme(FileCatalog::theme)
        .centered()
        .run_with(move || FileCatalog::new(config))
}

use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Element, Length};
use std::cmp::Ordering;

use crate::state::CatalogEntry;
use crate::Message;

/// Columns shown in the catalog table, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Filename,
    CreateDate,
    AddDate,
    Extension,
    Size,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Filename,
        SortColumn::CreateDate,
        SortColumn::AddDate,
        SortColumn::Extension,
        SortColumn::Size,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SortColumn::Filename => "Filename",
            SortColumn::CreateDate => "Create date",
            SortColumn::AddDate => "Add date",
            SortColumn::Extension => "File extension",
            SortColumn::Size => "Size",
        }
    }

    fn width(self) -> Length {
        match self {
            SortColumn::Filename => Length::FillPortion(4),
            SortColumn::CreateDate | SortColumn::AddDate => Length::FillPortion(3),
            SortColumn::Extension | SortColumn::Size => Length::FillPortion(2),
        }
    }

    fn compare(self, a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
        match self {
            SortColumn::Filename => a.filename.cmp(&b.filename),
            // Fixed-width timestamps sort correctly as text
            SortColumn::CreateDate => a.create_date.cmp(&b.create_date),
            SortColumn::AddDate => a.add_date.cmp(&b.add_date),
            SortColumn::Extension => a.file_extension.cmp(&b.file_extension),
            SortColumn::Size => a.size.cmp(&b.size),
        }
    }

    fn cell(self, entry: &CatalogEntry) -> String {
        match self {
            SortColumn::Filename => entry.filename.clone(),
            SortColumn::CreateDate => entry.create_date.clone(),
            SortColumn::AddDate => entry.add_date.clone(),
            SortColumn::Extension => entry.file_extension.clone(),
            SortColumn::Size => entry.size.to_string(),
        }
    }
}

/// View-side ordering of the rows. Storage order is never changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    /// None = storage order
    pub column: Option<SortColumn>,
    pub descending: bool,
}

impl SortState {
    /// Clicking the sorted column flips direction; another column starts ascending
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.descending = !self.descending;
        } else {
            self.column = Some(column);
            self.descending = false;
        }
    }

    pub fn apply<'a>(&self, rows: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        let mut sorted: Vec<&CatalogEntry> = rows.iter().collect();
        if let Some(column) = self.column {
            sorted.sort_by(|a, b| {
                let ordering = column.compare(a, b);
                if self.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        sorted
    }

    fn header_label(&self, column: SortColumn) -> String {
        match self.column {
            Some(sorted) if sorted == column => {
                let arrow = if self.descending { "▼" } else { "▲" };
                format!("{} {}", column.title(), arrow)
            }
            _ => column.title().to_string(),
        }
    }
}

/// Build the catalog table: a header of sort buttons and one line per entry
pub fn entry_table<'a>(rows: &'a [CatalogEntry], sort: SortState) -> Element<'a, Message> {
    let header = row(SortColumn::ALL.iter().map(|&column| {
        button(text(sort.header_label(column)).size(14))
            .on_press(Message::SortBy(column))
            .style(button::text)
            .width(column.width())
            .into()
    }))
    .spacing(8);

    let body = Column::with_children(sort.apply(rows).into_iter().map(|entry| {
        row(SortColumn::ALL.iter().map(|&column| {
            text(column.cell(entry))
                .size(14)
                .width(column.width())
                .into()
        }))
        .spacing(8)
        .into()
    }))
    .spacing(4);

    let body: Element<Message> = if rows.is_empty() {
        container(text("No files in this catalog yet.").size(14))
            .padding(10)
            .into()
    } else {
        scrollable(body).height(Length::Fill).into()
    };

    column![header, body].spacing(6).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, filename: &str, ext: &str, size: u64) -> CatalogEntry {
        CatalogEntry {
            id,
            filename: filename.to_string(),
            create_date: format!("2024-05-0{id} 10:00:00"),
            add_date: format!("2024-05-0{id} 10:00:00"),
            file_extension: ext.to_string(),
            size,
        }
    }

    fn ids(rows: Vec<&CatalogEntry>) -> Vec<i64> {
        rows.into_iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_default_keeps_storage_order() {
        let rows = vec![entry(2, "b", ".txt", 5), entry(1, "a", ".pdf", 9)];
        assert_eq!(ids(SortState::default().apply(&rows)), vec![2, 1]);
    }

    #[test]
    fn test_toggle_flips_direction() {
        let rows = vec![
            entry(1, "c", ".txt", 300),
            entry(2, "a", ".pdf", 100),
            entry(3, "b", ".doc", 200),
        ];
        let mut sort = SortState::default();

        sort.toggle(SortColumn::Size);
        assert_eq!(ids(sort.apply(&rows)), vec![2, 3, 1]);

        sort.toggle(SortColumn::Size);
        assert!(sort.descending);
        assert_eq!(ids(sort.apply(&rows)), vec![1, 3, 2]);

        sort.toggle(SortColumn::Filename);
        assert!(!sort.descending);
        assert_eq!(ids(sort.apply(&rows)), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_dates_and_extension() {
        let rows = vec![
            entry(3, "x", ".b", 1),
            entry(1, "y", ".c", 1),
            entry(2, "z", ".a", 1),
        ];
        let mut sort = SortState::default();

        sort.toggle(SortColumn::AddDate);
        assert_eq!(ids(sort.apply(&rows)), vec![1, 2, 3]);

        sort.toggle(SortColumn::Extension);
        assert_eq!(ids(sort.apply(&rows)), vec![2, 3, 1]);
    }

    #[test]
    fn test_header_marks_sorted_column() {
        let mut sort = SortState::default();
        assert_eq!(sort.header_label(SortColumn::Size), "Size");

        sort.toggle(SortColumn::Size);
        assert_eq!(sort.header_label(SortColumn::Size), "Size ▲");
        assert_eq!(sort.header_label(SortColumn::Filename), "Filename");
    }
}

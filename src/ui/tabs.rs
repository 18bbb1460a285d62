use iced::widget::{button, container, horizontal_space, row, text, text_input, Row};
use iced::{Alignment, Element, Length, Theme};

use crate::state::CatalogController;
use crate::Message;

/// Which inline dialog is open above the table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Dialog {
    #[default]
    None,
    /// Asking for the name of a new tab
    CreateTab { name: String },
    /// Editing the label of the tab at `index`
    RenameTab { index: usize, name: String },
}

/// One button per tab, plus a close button for each
pub fn tab_bar(controller: &CatalogController) -> Element<'_, Message> {
    let active = controller.active_index();

    let tabs = controller.tabs().iter().enumerate().map(|(index, tab)| {
        let style: fn(&Theme, button::Status) -> button::Style = if active == Some(index) {
            button::primary
        } else {
            button::secondary
        };

        row![
            button(text(tab.label()).size(14))
                .on_press(Message::SelectTab(index))
                .style(style),
            button(text("×").size(14))
                .on_press(Message::CloseTab(index))
                .style(button::text),
        ]
        .spacing(2)
        .align_y(Alignment::Center)
        .into()
    });

    Row::with_children(tabs).spacing(8).into()
}

/// The create / rename panel, if one is open
pub fn dialog_panel(dialog: &Dialog) -> Option<Element<'_, Message>> {
    let (title, name, submit_label) = match dialog {
        Dialog::None => return None,
        Dialog::CreateTab { name } => ("New tab name:", name, "Create"),
        Dialog::RenameTab { name, .. } => ("Rename tab:", name, "Change"),
    };

    let panel = row![
        text(title).size(14),
        text_input("Tab name", name)
            .on_input(Message::DialogInput)
            .on_submit(Message::SubmitDialog)
            .padding(6)
            .width(Length::Fixed(240.0)),
        button(submit_label).on_press(Message::SubmitDialog),
        button("Close")
            .on_press(Message::CancelDialog)
            .style(button::secondary),
        horizontal_space(),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    Some(container(panel).padding(10).into())
}

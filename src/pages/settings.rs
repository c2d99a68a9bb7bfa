use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, row, scrollable, text, text_input};
use cosmic::Element;

use crate::config::FicharioConfig;
use crate::core::stats::Stats;
use crate::fl;
use crate::message::Message;

pub fn settings_view<'a>(config: &'a FicharioConfig, stats: &Stats) -> Element<'a, Message> {
    let mut content = column().spacing(12);

    // --- Data tools ---
    content = content.push(text::title4(fl!("settings-data")));
    content = content.push(text::caption(fl!(
        "settings-summary",
        count = stats.total as i64
    )));

    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(button::standard(fl!("settings-export")).on_press(Message::ExportCards))
            .push(button::standard(fl!("settings-import")).on_press(Message::ImportCards)),
    );
    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(button::standard(fl!("settings-backup")).on_press(Message::BackupNow))
            .push(button::standard(fl!("settings-restore")).on_press(Message::RestoreBackup)),
    );
    content = content.push(text::caption(fl!(
        "settings-import-hint",
        path = config.import_path().display().to_string()
    )));

    // --- Browser ---
    content = content.push(text::title4(fl!("settings-browser")));
    content = content.push(
        text_input::text_input("xdg-open", &config.browser_command)
            .on_input(Message::SetBrowserCommand)
            .width(Length::Fill),
    );

    // --- Debug logging ---
    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(text::body(fl!("settings-debug-logging")).width(Length::Fill))
            .push(
                cosmic::widget::toggler(config.debug_logging)
                    .on_toggle(|_| Message::ToggleDebugLogging),
            ),
    );

    container(scrollable(content.padding(16).width(Length::Fill)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

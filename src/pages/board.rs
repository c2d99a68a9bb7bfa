use cosmic::iced::{Alignment, Length};
use cosmic::widget::{column, container, row, scrollable, text, text_input, Id};
use cosmic::Element;

use crate::components::card_item::{card_row, link_row, CardItemCtx, LIST_SPACING};
use crate::core::card::{Card, Tab};
use crate::core::stats::Stats;
use crate::fl;
use crate::message::Message;

fn stats_strip(stats: &Stats) -> Element<'static, Message> {
    let chip = |label: String, value: usize| -> Element<'static, Message> {
        text::caption(format!("{label}: {value}")).size(11.0).into()
    };

    row()
        .spacing(16)
        .align_y(Alignment::Center)
        .push(chip(fl!("stats-total"), stats.total))
        .push(chip(fl!("stats-pending"), stats.pendente))
        .push(chip(fl!("stats-done"), stats.concluido))
        .push(chip(fl!("stats-overdue"), stats.vencido))
        .push(chip(fl!("stats-today"), stats.due_today))
        .into()
}

/// The active tab's card list. `cards` is the post-search view; the badge
/// count and empty state follow directly from its size.
pub fn board_view(
    tab: Tab,
    cards: &[&Card],
    stats: &Stats,
    search_visible: bool,
    search_query: &str,
    search_id: Id,
    ctx: &CardItemCtx,
) -> Element<'static, Message> {
    let mut content = column().spacing(12);

    if search_visible {
        let input = text_input::search_input(fl!("search-placeholder"), search_query.to_string())
            .id(search_id)
            .on_input(Message::SearchQueryChanged)
            .width(Length::Fill);
        content = content.push(input);
    }

    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(
                text::title4(fl!("tab-count", count = cards.len() as i64)).width(Length::Fill),
            )
            .push(stats_strip(stats)),
    );

    if cards.is_empty() {
        content = content.push(
            container(text::body(fl!("empty-tab")))
                .padding(32)
                .center_x(Length::Fill)
                .width(Length::Fill),
        );
    } else {
        let mut list = column().spacing(LIST_SPACING as u16).width(Length::Fill);
        for card in cards {
            let item = if tab == Tab::Links {
                link_row(card, ctx)
            } else {
                card_row(card, ctx)
            };
            list = list.push(item);
        }
        content = content.push(list);
    }

    container(scrollable(content.padding(16).width(Length::Fill)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

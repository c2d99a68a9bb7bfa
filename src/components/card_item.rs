use uuid::Uuid;

use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, checkbox, container, icon, mouse_area, row, text};
use cosmic::{theme, Element};

use crate::core::card::{Card, Tab};
use crate::core::text::is_deep_link;
use crate::fl;
use crate::message::Message;
use crate::state::Modal;

// Column widths for consistent alignment
const COL_HANDLE: f32 = 24.0;
const COL_CHECK: f32 = 28.0;
const COL_CATEGORY: f32 = 96.0;
const COL_DATE: f32 = 96.0;
const COL_PRIORITY: f32 = 64.0;

/// Row geometry shared with the drop-position math in `core::reorder`.
pub const ROW_HEIGHT: f32 = 48.0;
pub const LINK_ROW_HEIGHT: f32 = 36.0;
pub const LIST_SPACING: f32 = 8.0;

pub fn row_stride(tab: Tab) -> f32 {
    let height = if tab == Tab::Links {
        LINK_ROW_HEIGHT
    } else {
        ROW_HEIGHT
    };
    height + LIST_SPACING
}

/// Render context shared by every row of the active tab.
pub struct CardItemCtx {
    pub modal: Option<Modal>,
    pub context_menu: Option<Uuid>,
    pub dragging: Option<Uuid>,
}

fn col(width: f32, content: impl Into<Element<'static, Message>>) -> Element<'static, Message> {
    container(content).width(Length::Fixed(width)).into()
}

fn col_fill(content: impl Into<Element<'static, Message>>) -> Element<'static, Message> {
    container(content).width(Length::Fill).into()
}

fn drag_handle(id: Uuid) -> Element<'static, Message> {
    col(
        COL_HANDLE,
        mouse_area(icon::from_name("list-drag-handle-symbolic").size(16).icon())
            .on_press(Message::DragStart(id)),
    )
}

fn short_link(link: &str) -> String {
    let shown = link.split_once("://").map(|(_, rest)| rest).unwrap_or(link);
    if shown.chars().count() > 40 {
        let prefix: String = shown.chars().take(40).collect();
        format!("{prefix}…")
    } else {
        shown.to_string()
    }
}

fn open_confirm(card: &Card) -> Element<'static, Message> {
    let id = card.id;
    let prompt = if is_deep_link(&card.link) {
        fl!("confirm-open-deep")
    } else {
        fl!("confirm-open-web")
    };
    row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(col_fill(text::caption(prompt)))
        .push(button::suggested(fl!("open")).on_press(Message::OpenLink(id)))
        .push(button::standard(fl!("cancel")).on_press(Message::CancelOpenLink))
        .into()
}

/// Trailing action cluster: idle shows edit/delete, a pending delete shows
/// the confirm pair, and a context menu shows the full action trio.
fn actions(card: &Card, ctx: &CardItemCtx) -> Element<'static, Message> {
    let id = card.id;

    if ctx.modal == Some(Modal::ConfirmDelete(id)) {
        return row()
            .spacing(4)
            .align_y(Alignment::Center)
            .push(button::destructive(fl!("delete")).on_press(Message::DeleteCard(id)))
            .push(button::standard(fl!("cancel")).on_press(Message::CancelDelete))
            .into();
    }

    if ctx.context_menu == Some(id) {
        let mut menu = row().spacing(4).align_y(Alignment::Center).push(
            button::icon(icon::from_name("document-edit-symbolic")).on_press(Message::EditCard(id)),
        );
        if card.has_link() {
            menu = menu.push(
                button::icon(icon::from_name("web-browser-symbolic"))
                    .on_press(Message::ConfirmOpenLink(id)),
            );
        }
        menu = menu
            .push(
                button::icon(icon::from_name("edit-delete-symbolic"))
                    .on_press(Message::ConfirmDeleteCard(id)),
            )
            .push(
                button::icon(icon::from_name("window-close-symbolic"))
                    .on_press(Message::CloseContextMenu),
            );
        return menu.into();
    }

    row()
        .spacing(4)
        .align_y(Alignment::Center)
        .push(
            button::icon(icon::from_name("document-edit-symbolic")).on_press(Message::EditCard(id)),
        )
        .push(
            button::icon(icon::from_name("edit-delete-symbolic"))
                .on_press(Message::ConfirmDeleteCard(id)),
        )
        .into()
}

/// Full task card row, used by every tab except the links tab.
pub fn card_row(card: &Card, ctx: &CardItemCtx) -> Element<'static, Message> {
    let id = card.id;
    let is_done = card.status.is_done();

    let check = col(
        COL_CHECK,
        checkbox("", is_done).on_toggle(move |_| Message::ToggleCardDone(id)),
    );

    let title_btn = button::custom(text::body(card.title.clone()))
        .padding([0, 0])
        .class(theme::Button::Text)
        .on_press(Message::CardClicked(id));
    let title: Element<'static, Message> = if card.has_link() {
        col_fill(
            row()
                .spacing(6)
                .align_y(Alignment::Center)
                .push(title_btn)
                .push(text::caption(short_link(&card.link)).size(11.0)),
        )
    } else {
        col_fill(title_btn)
    };

    let mut content = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(drag_handle(id))
        .push(check)
        .push(title);

    if ctx.modal == Some(Modal::ConfirmOpenLink(id)) {
        content = content.push(open_confirm(card));
    } else {
        let date_label = match card.date {
            Some(date) => date.format("%d/%m/%Y").to_string(),
            None => String::new(),
        };
        content = content
            .push(col(
                COL_CATEGORY,
                text::caption(card.category.label().to_string()).size(11.0),
            ))
            .push(col(COL_DATE, text::caption(date_label).size(11.0)))
            .push(col(
                COL_PRIORITY,
                text::caption(card.priority.label().to_string()).size(11.0),
            ))
            .push(actions(card, ctx));
    }

    let area = mouse_area(content.width(Length::Fill)).on_right_press(Message::ShowContextMenu(id));
    container(area)
        .width(Length::Fill)
        .height(Length::Fixed(ROW_HEIGHT))
        .into()
}

/// Compact link-preview row for the links tab.
pub fn link_row(card: &Card, ctx: &CardItemCtx) -> Element<'static, Message> {
    let id = card.id;

    let title_btn = button::custom(text::body(card.title.clone()))
        .padding([0, 0])
        .class(theme::Button::Text)
        .on_press(Message::CardClicked(id));

    let mut content = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(drag_handle(id))
        .push(title_btn);

    if ctx.modal == Some(Modal::ConfirmOpenLink(id)) {
        content = content.push(open_confirm(card));
    } else {
        content = content
            .push(col_fill(text::caption(short_link(&card.link)).size(11.0)))
            .push(actions(card, ctx));
    }

    let area = mouse_area(content.width(Length::Fill)).on_right_press(Message::ShowContextMenu(id));
    container(area)
        .width(Length::Fill)
        .height(Length::Fixed(LINK_ROW_HEIGHT))
        .into()
}

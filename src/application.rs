use chrono::{Local, NaiveDate};
use uuid::Uuid;

use cosmic::app::{context_drawer, Core, Task as CosmicTask};
use cosmic::iced::Length;
use cosmic::widget::{button, column, container, flex_row, icon, nav_bar, row, text, text_input};
use cosmic::{executor, Application, Element};

use crate::components::card_item::{row_stride, CardItemCtx};
use crate::config::FicharioConfig;
use crate::core::card::{Card, Category, Priority, Status, Tab, TITLE_MAX_LEN};
use crate::core::reorder::{insertion_index, reorder_sequence, uniform_rows};
use crate::core::text::{sentence_case, valid_link_url};
use crate::fl;
use crate::message::{Message, NoticeKind, Page};
use crate::pages;
use crate::state::{Modal, StateStore};
use crate::storage::{CardDraft, CardPatch, CardStore, FileBackend};

/// How long a transient notice stays on screen.
const NOTICE_TIMEOUT_MS: u64 = 4000;
/// Focus must land after the search bar's open transition has laid out.
const FOCUS_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Normal,
    Capture,
}

/// The shared create/edit form. `editing` carries the card id on the edit
/// path; everything else is the raw field state as typed.
pub struct CardForm {
    pub editing: Option<Uuid>,
    pub title: String,
    pub date: String,
    pub category: Category,
    pub status: Status,
    pub priority: Priority,
    pub link: String,
    pub tab: Tab,
}

impl CardForm {
    fn for_create(active_tab: Tab) -> Self {
        Self {
            editing: None,
            title: String::new(),
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            category: Category::default(),
            status: Status::default(),
            priority: Priority::default(),
            link: String::new(),
            tab: active_tab,
        }
    }

    fn for_edit(card: &Card) -> Self {
        Self {
            editing: Some(card.id),
            title: card.title.clone(),
            date: card
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            category: card.category,
            status: card.status,
            priority: card.priority,
            link: card.link.clone(),
            tab: card.tab,
        }
    }

    fn title_error(&self) -> Option<String> {
        let title = self.title.trim();
        if title.is_empty() {
            Some(fl!("form-error-title-required"))
        } else if title.chars().count() > TITLE_MAX_LEN {
            Some(fl!("form-error-title-length"))
        } else {
            None
        }
    }

    fn link_error(&self) -> Option<String> {
        let link = self.link.trim();
        if link.is_empty() || valid_link_url(link) {
            None
        } else {
            Some(fl!("form-error-link"))
        }
    }

    fn date_error(&self) -> Option<String> {
        let date = self.date.trim();
        if date.is_empty() || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
            None
        } else {
            Some(fl!("form-error-date"))
        }
    }

    fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    fn is_valid(&self) -> bool {
        self.title_error().is_none() && self.link_error().is_none() && self.date_error().is_none()
    }
}

/// In-flight drag of one card row. The cursor is tracked as a window-space
/// delta from the grab point; row geometry is reconstructed from the fixed
/// row stride of the active tab.
struct DragState {
    id: Uuid,
    grab_index: usize,
    grab_y: Option<f32>,
    last_y: f32,
}

pub struct Fichario {
    core: Core,
    nav_model: nav_bar::Model,
    config: FicharioConfig,
    cosmic_config: cosmic::cosmic_config::Config,
    launch_mode: LaunchMode,

    store: CardStore,
    state: StateStore,
    page: Page,

    card_form: Option<CardForm>,
    context_menu: Option<Uuid>,
    drag: Option<DragState>,

    notice: Option<(u64, NoticeKind, String)>,
    notice_seq: u64,

    search_id: cosmic::widget::Id,
}

pub struct Flags {
    pub config: FicharioConfig,
    pub cosmic_config: cosmic::cosmic_config::Config,
    pub launch_mode: LaunchMode,
    pub start_tab: Option<Tab>,
}

impl Application for Fichario {
    type Executor = executor::Default;
    type Flags = Flags;
    type Message = Message;

    const APP_ID: &'static str = "dev.fichario.app";

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(mut core: Core, flags: Self::Flags) -> (Self, CosmicTask<Self::Message>) {
        let config = flags.config;
        let cosmic_config = flags.cosmic_config;
        let launch_mode = flags.launch_mode;

        if let Err(e) = config.ensure_dirs() {
            log::error!("Failed to create data directory: {}", e);
        }

        // Sidebar: the four tabs, then settings below a divider
        let mut nav_model = nav_bar::Model::default();
        for page in Page::ALL {
            let mut item = nav_model.insert();
            item = item
                .text(page.title())
                .icon(icon::from_name(page.icon_name()).icon())
                .data(*page);
            if *page == Page::Settings {
                item.divider_above(true);
            }
        }

        let store = CardStore::new(Box::new(FileBackend::new(config.data_directory.clone())));
        let mut state = StateStore::new();
        state.subscribe("journal", |new, old| {
            if new.active_tab != old.active_tab {
                log::debug!(
                    "tab: {} -> {}",
                    old.active_tab.as_str(),
                    new.active_tab.as_str()
                );
            }
            if new.cards.len() != old.cards.len() {
                log::debug!("cards: {} -> {}", old.cards.len(), new.cards.len());
            }
        });

        state.set_loading(true);
        let today = Local::now().date_naive();
        let cards = store.get_all();
        let stats = store.stats(today);
        state.set_cards(cards, stats);
        state.set_loading(false);

        if let Some(tab) = flags.start_tab {
            state.set_active_tab(tab);
        }
        let start_page = Page::Board(state.get().active_tab);

        let card_form = match launch_mode {
            LaunchMode::Capture => {
                core.window.show_context = true;
                let form = CardForm::for_create(state.get().active_tab);
                state.set_modal(Some(Modal::CardForm { editing: None }));
                Some(form)
            }
            LaunchMode::Normal => None,
        };

        let mut app = Self {
            core,
            nav_model,
            config,
            cosmic_config,
            launch_mode,
            store,
            state,
            page: start_page,
            card_form,
            context_menu: None,
            drag: None,
            notice: None,
            notice_seq: 0,
            search_id: cosmic::widget::Id::unique(),
        };
        app.activate_nav(app.page);

        (app, CosmicTask::none())
    }

    fn nav_model(&self) -> Option<&nav_bar::Model> {
        Some(&self.nav_model)
    }

    fn on_nav_select(&mut self, id: nav_bar::Id) -> CosmicTask<Message> {
        if let Some(page) = self.nav_model.data::<Page>(id).copied() {
            match page {
                Page::Board(tab) => self.go_to_tab(tab),
                Page::Settings => {
                    self.page = Page::Settings;
                    self.close_form();
                    self.context_menu = None;
                    self.drag = None;
                }
            }
            self.nav_model.activate(id);
        }
        CosmicTask::none()
    }

    fn header_end(&self) -> Vec<Element<'_, Message>> {
        let header_row = row()
            .spacing(4)
            .push(
                button::icon(icon::from_name("list-add-symbolic"))
                    .on_press(Message::OpenNewCardForm),
            )
            .push(
                button::icon(icon::from_name("system-search-symbolic"))
                    .on_press(Message::ToggleSearch),
            )
            .push(
                button::icon(icon::from_name("emblem-system-symbolic"))
                    .on_press(Message::OpenSettings),
            );

        vec![header_row.into()]
    }

    fn update(&mut self, message: Message) -> CosmicTask<Message> {
        match message {
            // --- Navigation ---
            Message::SelectTab(tab) => {
                self.go_to_tab(tab);
                self.activate_nav(Page::Board(tab));
            }

            Message::NextTab => {
                let tab = self.state.get().active_tab.next();
                self.go_to_tab(tab);
                self.activate_nav(Page::Board(tab));
            }

            Message::PreviousTab => {
                let tab = self.state.get().active_tab.previous();
                self.go_to_tab(tab);
                self.activate_nav(Page::Board(tab));
            }

            Message::OpenSettings => {
                self.page = Page::Settings;
                self.close_form();
                self.context_menu = None;
                self.drag = None;
                self.activate_nav(Page::Settings);
            }

            // --- Search ---
            Message::ToggleSearch => {
                if !matches!(self.page, Page::Board(_)) {
                    return CosmicTask::none();
                }
                if self.state.get().search_visible {
                    self.state.set_search_visible(false);
                } else {
                    self.state.set_search_visible(true);
                    // Defer focus until the open transition has laid out.
                    return CosmicTask::perform(
                        async {
                            tokio::time::sleep(std::time::Duration::from_millis(FOCUS_DELAY_MS))
                                .await;
                        },
                        |_| cosmic::Action::App(Message::FocusSearch),
                    );
                }
            }

            Message::FocusSearch => {
                return cosmic::widget::text_input::focus(self.search_id.clone());
            }

            Message::SearchQueryChanged(query) => {
                self.state.set_search_query(query);
            }

            // --- Card interaction ---
            Message::CardClicked(id) => {
                let card = self.state.get().cards.iter().find(|c| c.id == id).cloned();
                if let Some(card) = card {
                    if card.has_link() {
                        self.state.set_selected_card(Some(id));
                        self.state.set_modal(Some(Modal::ConfirmOpenLink(id)));
                    } else {
                        self.open_edit_form(&card);
                    }
                }
            }

            Message::EditCard(id) => {
                self.context_menu = None;
                let card = self.state.get().cards.iter().find(|c| c.id == id).cloned();
                if let Some(card) = card {
                    self.open_edit_form(&card);
                }
            }

            Message::ToggleCardDone(id) => {
                let current = self
                    .state
                    .get()
                    .cards
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.status);
                if let Some(status) = current {
                    let next = if status.is_done() {
                        Status::Pendente
                    } else {
                        Status::Concluido
                    };
                    let patch = CardPatch {
                        status: Some(next),
                        ..CardPatch::default()
                    };
                    if self.store.update(id, patch).is_some() {
                        self.refresh_cards();
                    } else {
                        return self.show_notice(NoticeKind::Error, fl!("notice-save-error"));
                    }
                }
            }

            Message::ConfirmDeleteCard(id) => {
                self.context_menu = None;
                self.state.set_selected_card(Some(id));
                self.state.set_modal(Some(Modal::ConfirmDelete(id)));
            }

            Message::CancelDelete => {
                self.state.set_modal(None);
                self.state.set_selected_card(None);
            }

            Message::DeleteCard(id) => {
                self.state.set_modal(None);
                self.state.set_selected_card(None);
                if self.store.delete(id) {
                    self.refresh_cards();
                    return self.show_notice(NoticeKind::Success, fl!("notice-deleted"));
                }
                return self.show_notice(NoticeKind::Error, fl!("notice-save-error"));
            }

            Message::ConfirmOpenLink(id) => {
                self.context_menu = None;
                self.state.set_selected_card(Some(id));
                self.state.set_modal(Some(Modal::ConfirmOpenLink(id)));
            }

            Message::CancelOpenLink => {
                self.state.set_modal(None);
                self.state.set_selected_card(None);
            }

            Message::OpenLink(id) => {
                let link = self
                    .state
                    .get()
                    .cards
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.link.clone());
                self.state.set_modal(None);
                self.state.set_selected_card(None);
                if let Some(link) = link {
                    if !link.is_empty() {
                        if let Err(e) = std::process::Command::new(&self.config.browser_command)
                            .arg(&link)
                            .spawn()
                        {
                            log::error!("Failed to open link: {}", e);
                            return self.show_notice(NoticeKind::Error, fl!("notice-link-error"));
                        }
                    }
                }
            }

            Message::ShowContextMenu(id) => {
                self.context_menu = Some(id);
            }

            Message::CloseContextMenu => {
                self.context_menu = None;
            }

            // --- Drag reorder ---
            Message::DragStart(id) => {
                let state = self.state.get();
                // Reorder only applies to an idle, unfiltered list.
                if state.modal.is_some() || !state.search_query.trim().is_empty() {
                    return CosmicTask::none();
                }
                let grab_index = state
                    .cards
                    .iter()
                    .filter(|c| c.tab == state.active_tab)
                    .position(|c| c.id == id);
                if let Some(grab_index) = grab_index {
                    self.context_menu = None;
                    self.drag = Some(DragState {
                        id,
                        grab_index,
                        grab_y: None,
                        last_y: 0.0,
                    });
                }
            }

            Message::CursorMoved(y) => {
                if let Some(drag) = self.drag.as_mut() {
                    if drag.grab_y.is_none() {
                        drag.grab_y = Some(y);
                    }
                    drag.last_y = y;
                }
            }

            Message::DragDropped => {
                if let Some(drag) = self.drag.take() {
                    let state = self.state.get();
                    let tab = state.active_tab;
                    let stride = row_stride(tab);
                    let count = state.cards.iter().filter(|c| c.tab == tab).count();
                    let delta = drag.last_y - drag.grab_y.unwrap_or(drag.last_y);
                    let pointer = drag.grab_index as f32 * stride + stride / 2.0 + delta;
                    let insert_at = insertion_index(pointer, &uniform_rows(count, stride));

                    let sequence = reorder_sequence(&state.cards, tab, drag.id, insert_at);
                    if self.store.reorder(&sequence) {
                        self.state.reorder_cards(&sequence);
                    } else {
                        return self.show_notice(NoticeKind::Error, fl!("notice-reorder-error"));
                    }
                }
            }

            Message::DragCancel => {
                self.drag = None;
            }

            // --- Card form ---
            Message::OpenNewCardForm => {
                let tab = self.state.get().active_tab;
                self.card_form = Some(CardForm::for_create(tab));
                self.state.set_modal(Some(Modal::CardForm { editing: None }));
                self.core.window.show_context = true;
            }

            Message::CloseCardForm => {
                self.close_form();
                if self.launch_mode == LaunchMode::Capture {
                    std::process::exit(0);
                }
            }

            Message::FormTitle(value) => {
                if let Some(form) = self.card_form.as_mut() {
                    form.title = value;
                }
            }

            Message::FormDate(value) => {
                if let Some(form) = self.card_form.as_mut() {
                    form.date = value;
                }
            }

            Message::FormLink(value) => {
                if let Some(form) = self.card_form.as_mut() {
                    form.link = value;
                }
            }

            Message::FormTab(tab) => {
                if let Some(form) = self.card_form.as_mut() {
                    form.tab = tab;
                }
            }

            Message::FormCategory(category) => {
                if let Some(form) = self.card_form.as_mut() {
                    form.category = category;
                }
            }

            Message::FormStatus(status) => {
                if let Some(form) = self.card_form.as_mut() {
                    form.status = status;
                }
            }

            Message::FormPriority(priority) => {
                if let Some(form) = self.card_form.as_mut() {
                    form.priority = priority;
                }
            }

            Message::FormSubmit => {
                return self.submit_form();
            }

            // --- Data tools ---
            Message::ExportCards => {
                let Some(payload) = self.store.export() else {
                    return self.show_notice(NoticeKind::Error, fl!("notice-export-error"));
                };
                let stamp = Local::now().format("%Y%m%d-%H%M%S");
                let path = self
                    .config
                    .export_dir()
                    .join(format!("fichario-export-{stamp}.json"));
                match std::fs::write(&path, payload) {
                    Ok(()) => {
                        return self.show_notice(
                            NoticeKind::Success,
                            fl!("notice-export-done", path = path.display().to_string()),
                        );
                    }
                    Err(e) => {
                        log::error!("Failed to write export to {}: {}", path.display(), e);
                        return self.show_notice(NoticeKind::Error, fl!("notice-export-error"));
                    }
                }
            }

            Message::ImportCards => {
                let path = self.config.import_path();
                let payload = match std::fs::read_to_string(&path) {
                    Ok(payload) => payload,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        return self.show_notice(NoticeKind::Error, fl!("notice-import-missing"));
                    }
                    Err(e) => {
                        log::error!("Failed to read {}: {}", path.display(), e);
                        return self.show_notice(NoticeKind::Error, fl!("notice-import-error"));
                    }
                };
                let report = self.store.import(&payload);
                if report.success {
                    self.refresh_cards();
                    return self.show_notice(
                        NoticeKind::Success,
                        fl!(
                            "notice-import-done",
                            imported = report.imported as i64,
                            skipped = report.skipped as i64
                        ),
                    );
                }
                return self.show_notice(NoticeKind::Error, fl!("notice-import-error"));
            }

            Message::BackupNow => {
                if self.store.backup() {
                    return self.show_notice(NoticeKind::Success, fl!("notice-backup-done"));
                }
                return self.show_notice(NoticeKind::Error, fl!("notice-backup-error"));
            }

            Message::RestoreBackup => match self.store.restore() {
                Some(count) => {
                    self.refresh_cards();
                    return self.show_notice(
                        NoticeKind::Success,
                        fl!("notice-restore-done", count = count as i64),
                    );
                }
                None => {
                    return self.show_notice(NoticeKind::Error, fl!("notice-restore-missing"));
                }
            },

            // --- Notices ---
            Message::DismissNotice(seq) => {
                if self.notice.as_ref().is_some_and(|(s, _, _)| *s == seq) {
                    self.notice = None;
                }
            }

            // --- Settings ---
            Message::SetBrowserCommand(value) => {
                self.config.browser_command = value;
                self.save_config();
            }

            Message::ToggleDebugLogging => {
                self.config.debug_logging = !self.config.debug_logging;
                fichario::set_debug_logging(self.config.debug_logging);
                self.save_config();
            }
        }

        CosmicTask::none()
    }

    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Message>> {
        let form = self.card_form.as_ref()?;
        let title = if form.editing.is_some() {
            fl!("edit-card")
        } else {
            fl!("new-card")
        };
        Some(
            context_drawer::context_drawer(
                container(cosmic::widget::scrollable(self.form_view(form).padding(16)))
                    .width(Length::Fill),
                Message::CloseCardForm,
            )
            .title(title),
        )
    }

    fn on_escape(&mut self) -> CosmicTask<Message> {
        if self.drag.is_some() {
            self.drag = None;
        } else if self.card_form.is_some() {
            self.close_form();
            if self.launch_mode == LaunchMode::Capture {
                std::process::exit(0);
            }
        } else if self.state.get().modal.is_some() {
            self.state.set_modal(None);
            self.state.set_selected_card(None);
        } else if self.context_menu.is_some() {
            self.context_menu = None;
        } else if self.state.get().search_visible {
            self.state.set_search_visible(false);
        }
        CosmicTask::none()
    }

    fn subscription(&self) -> cosmic::iced::Subscription<Message> {
        let keyboard = cosmic::iced::event::listen_with(|event, _status, _id| match event {
            cosmic::iced::Event::Keyboard(cosmic::iced::keyboard::Event::KeyPressed {
                key,
                modifiers,
                ..
            }) => match key {
                cosmic::iced::keyboard::Key::Character(ref c)
                    if c.as_str() == "n" && modifiers.control() =>
                {
                    Some(Message::OpenNewCardForm)
                }
                cosmic::iced::keyboard::Key::Character(ref c)
                    if c.as_str() == "f" && modifiers.control() =>
                {
                    Some(Message::ToggleSearch)
                }
                cosmic::iced::keyboard::Key::Named(cosmic::iced::keyboard::key::Named::Tab)
                    if modifiers.control() && modifiers.shift() =>
                {
                    Some(Message::PreviousTab)
                }
                cosmic::iced::keyboard::Key::Named(cosmic::iced::keyboard::key::Named::Tab)
                    if modifiers.control() =>
                {
                    Some(Message::NextTab)
                }
                _ => None,
            },
            _ => None,
        });

        if self.drag.is_none() {
            return keyboard;
        }

        // While a drag is live, follow the cursor and catch the release.
        let pointer = cosmic::iced::event::listen_with(|event, _status, _id| match event {
            cosmic::iced::Event::Mouse(cosmic::iced::mouse::Event::CursorMoved { position }) => {
                Some(Message::CursorMoved(position.y))
            }
            cosmic::iced::Event::Mouse(cosmic::iced::mouse::Event::ButtonReleased(
                cosmic::iced::mouse::Button::Left,
            )) => Some(Message::DragDropped),
            _ => None,
        });

        cosmic::iced::Subscription::batch([keyboard, pointer])
    }

    fn view(&self) -> Element<'_, Message> {
        let state = self.state.get();

        let content: Element<'_, Message> = match self.page {
            Page::Board(tab) => {
                let cards = self.state.filter_by_search(&state.search_query);
                let ctx = CardItemCtx {
                    modal: state.modal,
                    context_menu: self.context_menu,
                    dragging: self.drag.as_ref().map(|d| d.id),
                };
                pages::board::board_view(
                    tab,
                    &cards,
                    &state.stats,
                    state.search_visible,
                    &state.search_query,
                    self.search_id.clone(),
                    &ctx,
                )
            }
            Page::Settings => pages::settings::settings_view(&self.config, &state.stats),
        };

        let mut layout = column().spacing(0);
        if let Some((_, kind, message)) = &self.notice {
            let icon_name = match kind {
                NoticeKind::Success => "emblem-ok-symbolic",
                NoticeKind::Error => "dialog-warning-symbolic",
            };
            layout = layout.push(
                container(
                    row()
                        .spacing(8)
                        .push(icon::from_name(icon_name).size(16).icon())
                        .push(text::body(message.clone())),
                )
                .padding([8, 16])
                .width(Length::Fill),
            );
        }
        layout = layout.push(content);

        container(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

impl Fichario {
    /// Tab switch: close transient surfaces, commit the new tab to state
    /// (which clears selection, modal, and search), and show its board.
    fn go_to_tab(&mut self, tab: Tab) {
        self.page = Page::Board(tab);
        self.card_form = None;
        self.core.window.show_context = false;
        self.context_menu = None;
        self.drag = None;
        self.state.set_active_tab(tab);
    }

    fn activate_nav(&mut self, page: Page) {
        let target = self
            .nav_model
            .iter()
            .find(|&id| self.nav_model.data::<Page>(id) == Some(&page));
        if let Some(id) = target {
            self.nav_model.activate(id);
        }
    }

    fn open_edit_form(&mut self, card: &Card) {
        self.card_form = Some(CardForm::for_edit(card));
        self.state.set_selected_card(Some(card.id));
        self.state.set_modal(Some(Modal::CardForm {
            editing: Some(card.id),
        }));
        self.core.window.show_context = true;
    }

    /// Closing the form resets it and clears the selection (via the state
    /// store's form-close rule).
    fn close_form(&mut self) {
        self.card_form = None;
        self.core.window.show_context = false;
        self.state.set_modal(None);
    }

    fn submit_form(&mut self) -> CosmicTask<Message> {
        let Some(form) = self.card_form.as_ref() else {
            return CosmicTask::none();
        };
        // The submit button is disabled while invalid, but re-check here:
        // a keyboard submit can race the last keystroke's validation.
        if !form.is_valid() {
            return CosmicTask::none();
        }

        let title = sentence_case(&form.title);
        let result = if let Some(id) = form.editing {
            let patch = CardPatch {
                title: Some(title),
                date: Some(form.parsed_date()),
                category: Some(form.category),
                status: Some(form.status),
                priority: Some(form.priority),
                link: Some(form.link.clone()),
                tab: Some(form.tab),
            };
            self.store.update(id, patch).map(|_| fl!("notice-updated"))
        } else {
            let draft = CardDraft {
                title,
                date: form.parsed_date(),
                category: form.category,
                status: form.status,
                priority: form.priority,
                link: form.link.trim().to_string(),
                tab: form.tab,
            };
            self.store.create(draft).map(|_| fl!("notice-created"))
        };

        match result {
            Some(notice) => {
                self.refresh_cards();
                self.close_form();
                if self.launch_mode == LaunchMode::Capture {
                    std::process::exit(0);
                }
                self.show_notice(NoticeKind::Success, notice)
            }
            // Keep the form open so nothing typed is lost.
            None => self.show_notice(NoticeKind::Error, fl!("notice-save-error")),
        }
    }

    /// Reload the collection and stats into the state cache after any
    /// storage mutation.
    fn refresh_cards(&mut self) {
        let today = Local::now().date_naive();
        let cards = self.store.get_all();
        let stats = self.store.stats(today);
        self.state.set_cards(cards, stats);
    }

    /// Replaces the current notice and schedules its dismissal. A stale
    /// timer firing later cannot clear a newer notice: the sequence number
    /// must still match.
    fn show_notice(&mut self, kind: NoticeKind, message: String) -> CosmicTask<Message> {
        self.notice_seq += 1;
        let seq = self.notice_seq;
        self.notice = Some((seq, kind, message));
        CosmicTask::perform(
            async {
                tokio::time::sleep(std::time::Duration::from_millis(NOTICE_TIMEOUT_MS)).await;
            },
            move |_| cosmic::Action::App(Message::DismissNotice(seq)),
        )
    }

    fn save_config(&self) {
        use cosmic::cosmic_config::CosmicConfigEntry;
        if let Err(e) = self.config.write_entry(&self.cosmic_config) {
            log::error!("Failed to save config: {:?}", e);
        }
    }

    fn form_view(&self, form: &CardForm) -> column::Column<'_, Message> {
        let mut content = column().spacing(16);

        // Title
        content = content.push(text::title4(fl!("form-title")));
        content = content.push(
            text_input::text_input(fl!("form-title-placeholder"), form.title.clone())
                .on_input(Message::FormTitle)
                .on_submit(|_| Message::FormSubmit)
                .width(Length::Fill),
        );
        if let Some(error) = form.title_error() {
            content = content.push(text::caption(error));
        }

        // Tab
        content = content.push(text::title4(fl!("form-tab")));
        let mut tab_row = row().spacing(4);
        for tab in Tab::ALL {
            tab_row = tab_row.push(tab_button(*tab, form.tab));
        }
        content = content.push(tab_row);

        // Date
        content = content.push(text::title4(fl!("form-date")));
        content = content.push(
            text_input::text_input("YYYY-MM-DD", form.date.clone())
                .on_input(Message::FormDate)
                .width(Length::Fill),
        );
        if let Some(error) = form.date_error() {
            content = content.push(text::caption(error));
        }

        // Category
        content = content.push(text::title4(fl!("form-category")));
        let category_items: Vec<Element<'_, Message>> = Category::ALL
            .iter()
            .map(|c| category_button(*c, form.category))
            .collect();
        content = content.push(flex_row(category_items).row_spacing(4).column_spacing(4));

        // Status
        content = content.push(text::title4(fl!("form-status")));
        let status_row = row()
            .spacing(4)
            .push(status_button(Status::Pendente, form.status))
            .push(status_button(Status::Concluido, form.status))
            .push(status_button(Status::Vencido, form.status));
        content = content.push(status_row);

        // Priority
        content = content.push(text::title4(fl!("form-priority")));
        let priority_row = row()
            .spacing(4)
            .push(priority_button(Priority::Baixa, form.priority))
            .push(priority_button(Priority::Media, form.priority))
            .push(priority_button(Priority::Alta, form.priority));
        content = content.push(priority_row);

        // Link
        content = content.push(text::title4(fl!("form-link")));
        content = content.push(
            text_input::text_input("https://...", form.link.clone())
                .on_input(Message::FormLink)
                .width(Length::Fill),
        );
        if let Some(error) = form.link_error() {
            content = content.push(text::caption(error));
        }

        // Submit: stays disabled while any validation fails
        let mut submit = button::suggested(fl!("form-save")).width(Length::Fill);
        if form.is_valid() {
            submit = submit.on_press(Message::FormSubmit);
        }
        content = content.push(submit);

        content
    }
}

fn tab_button<'a>(value: Tab, current: Tab) -> Element<'a, Message> {
    let btn = if current == value {
        button::suggested(value.title())
    } else {
        button::standard(value.title())
    };
    btn.on_press(Message::FormTab(value)).into()
}

fn category_button<'a>(value: Category, current: Category) -> Element<'a, Message> {
    let btn = if current == value {
        button::suggested(value.label())
    } else {
        button::standard(value.label())
    };
    btn.on_press(Message::FormCategory(value)).into()
}

fn status_button<'a>(value: Status, current: Status) -> Element<'a, Message> {
    let btn = if current == value {
        button::suggested(value.label())
    } else {
        button::standard(value.label())
    };
    btn.on_press(Message::FormStatus(value)).into()
}

fn priority_button<'a>(value: Priority, current: Priority) -> Element<'a, Message> {
    let btn = if current == value {
        button::suggested(value.label())
    } else {
        button::standard(value.label())
    };
    btn.on_press(Message::FormPriority(value)).into()
}

use uuid::Uuid;

use crate::core::card::{Category, Priority, Status, Tab};

/// What the sidebar is showing: one of the four card tabs, or settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Board(Tab),
    Settings,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Board(tab) => tab.title(),
            Self::Settings => "Configurações",
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Board(tab) => tab.icon_name(),
            Self::Settings => "emblem-system-symbolic",
        }
    }

    pub const ALL: &'static [Page] = &[
        Page::Board(Tab::Rotina),
        Page::Board(Tab::Economia),
        Page::Board(Tab::Lembretes),
        Page::Board(Tab::Links),
        Page::Settings,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    SelectTab(Tab),
    NextTab,
    PreviousTab,
    OpenSettings,

    // Search
    ToggleSearch,
    FocusSearch,
    SearchQueryChanged(String),

    // Card interaction
    CardClicked(Uuid),
    EditCard(Uuid),
    ToggleCardDone(Uuid),
    ConfirmDeleteCard(Uuid),
    CancelDelete,
    DeleteCard(Uuid),
    ConfirmOpenLink(Uuid),
    CancelOpenLink,
    OpenLink(Uuid),
    ShowContextMenu(Uuid),
    CloseContextMenu,

    // Drag reorder
    DragStart(Uuid),
    CursorMoved(f32),
    DragDropped,
    DragCancel,

    // Card form (shared by create and edit)
    OpenNewCardForm,
    CloseCardForm,
    FormTitle(String),
    FormDate(String),
    FormLink(String),
    FormTab(Tab),
    FormCategory(Category),
    FormStatus(Status),
    FormPriority(Priority),
    FormSubmit,

    // Data tools
    ExportCards,
    ImportCards,
    BackupNow,
    RestoreBackup,

    // Transient notices
    DismissNotice(u64),

    // Settings
    SetBrowserCommand(String),
    ToggleDebugLogging,
}

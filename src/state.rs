use uuid::Uuid;

use crate::core::card::{Card, Tab};
use crate::core::stats::Stats;
use crate::core::text::normalize_for_search;

/// Which confirmation or form surface is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// Shared create/edit form; `editing` is the card being edited.
    CardForm { editing: Option<Uuid> },
    ConfirmDelete(Uuid),
    ConfirmOpenLink(Uuid),
}

/// The single transient UI snapshot. Everything here is derived or
/// ephemeral; the durable data lives in the card store.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub active_tab: Tab,
    pub selected_card: Option<Uuid>,
    pub modal: Option<Modal>,
    pub search_visible: bool,
    pub search_query: String,
    pub cards: Vec<Card>,
    pub stats: Stats,
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_tab: Tab::default(),
            selected_card: None,
            modal: None,
            search_visible: false,
            search_query: String::new(),
            cards: Vec::new(),
            stats: Stats::default(),
            loading: false,
        }
    }
}

type Listener = Box<dyn Fn(&AppState, &AppState)>;

/// Owns the snapshot and a keyed observer list. Setters validate their
/// input, no-op with a logged warning on invalid input, and notify only
/// when the committed snapshot actually differs from the previous one.
pub struct StateStore {
    state: AppState,
    listeners: Vec<(String, Listener)>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            state: AppState::default(),
            listeners: Vec::new(),
        }
    }

    /// A copy of the current snapshot; mutating it never affects the store.
    pub fn get(&self) -> AppState {
        self.state.clone()
    }

    /// Registers a listener under `key`. Re-subscribing an existing key
    /// replaces the previous listener, so a component registering twice
    /// still gets exactly one notification per commit.
    pub fn subscribe(
        &mut self,
        key: impl Into<String>,
        listener: impl Fn(&AppState, &AppState) + 'static,
    ) {
        let key = key.into();
        let boxed: Listener = Box::new(listener);
        if let Some(slot) = self.listeners.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = boxed;
        } else {
            self.listeners.push((key, boxed));
        }
    }

    pub fn unsubscribe(&mut self, key: &str) {
        self.listeners.retain(|(k, _)| k != key);
    }

    /// Commits `next` if it differs from the current snapshot, invoking
    /// every listener with `(new, old)`. Returns whether a change landed.
    fn commit(&mut self, next: AppState) -> bool {
        if next == self.state {
            return false;
        }
        let old = std::mem::replace(&mut self.state, next);
        for (_, listener) in &self.listeners {
            listener(&self.state, &old);
        }
        true
    }

    /// Switching tabs clears the selection, closes any open modal, and
    /// closes the search bar.
    pub fn set_active_tab(&mut self, tab: Tab) {
        let mut next = self.state.clone();
        next.active_tab = tab;
        next.selected_card = None;
        next.modal = None;
        next.search_visible = false;
        next.search_query.clear();
        self.commit(next);
    }

    pub fn set_selected_card(&mut self, id: Option<Uuid>) {
        if let Some(id) = id {
            if !self.state.cards.iter().any(|c| c.id == id) {
                log::warn!("ignoring selection of unknown card {id}");
                return;
            }
        }
        let mut next = self.state.clone();
        next.selected_card = id;
        self.commit(next);
    }

    /// Closing the card form also clears the selection.
    pub fn set_modal(&mut self, modal: Option<Modal>) {
        if let Some(Modal::ConfirmDelete(id) | Modal::ConfirmOpenLink(id)) = modal {
            if !self.state.cards.iter().any(|c| c.id == id) {
                log::warn!("ignoring modal for unknown card {id}");
                return;
            }
        }
        let mut next = self.state.clone();
        let closing_form = matches!(next.modal, Some(Modal::CardForm { .. })) && modal.is_none();
        next.modal = modal;
        if closing_form {
            next.selected_card = None;
        }
        self.commit(next);
    }

    /// Hiding the search bar clears the query.
    pub fn set_search_visible(&mut self, visible: bool) {
        let mut next = self.state.clone();
        next.search_visible = visible;
        if !visible {
            next.search_query.clear();
        }
        self.commit(next);
    }

    pub fn set_search_query(&mut self, query: String) {
        let mut next = self.state.clone();
        next.search_query = query;
        self.commit(next);
    }

    pub fn set_loading(&mut self, loading: bool) {
        let mut next = self.state.clone();
        next.loading = loading;
        self.commit(next);
    }

    /// Replaces the cached card list (and stats snapshot); a selection
    /// pointing at a card that no longer exists is cleared.
    pub fn set_cards(&mut self, cards: Vec<Card>, stats: Stats) {
        let mut next = self.state.clone();
        if let Some(selected) = next.selected_card {
            if !cards.iter().any(|c| c.id == selected) {
                next.selected_card = None;
            }
        }
        next.cards = cards;
        next.stats = stats;
        self.commit(next);
    }

    /// Re-sorts the cached list to match an id sequence (mirror of
    /// `CardStore::reorder`); unlisted cards keep their relative order
    /// after the listed ones.
    pub fn reorder_cards(&mut self, ids: &[Uuid]) {
        if ids.is_empty() {
            log::warn!("ignoring empty reorder sequence");
            return;
        }
        let pos: std::collections::HashMap<Uuid, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut next = self.state.clone();
        next.cards
            .sort_by_key(|c| pos.get(&c.id).copied().unwrap_or(usize::MAX));
        for (i, card) in next.cards.iter_mut().enumerate() {
            card.order = i as u32;
        }
        self.commit(next);
    }

    /// The active tab's cards, in display order.
    pub fn cards_for_active_tab(&self) -> Vec<&Card> {
        self.state
            .cards
            .iter()
            .filter(|c| c.tab == self.state.active_tab)
            .collect()
    }

    /// Case- and diacritic-insensitive match on title and category label,
    /// scoped to the active tab. A blank query is the unfiltered tab view.
    pub fn filter_by_search(&self, query: &str) -> Vec<&Card> {
        let needle = normalize_for_search(query);
        if needle.is_empty() {
            return self.cards_for_active_tab();
        }
        self.cards_for_active_tab()
            .into_iter()
            .filter(|c| {
                normalize_for_search(&c.title).contains(&needle)
                    || normalize_for_search(c.category.label()).contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::{Card, Category};
    use std::cell::Cell;
    use std::rc::Rc;

    fn seeded() -> (StateStore, Card, Card) {
        let mut store = StateStore::new();
        let mut a = Card::new("Pagar conta", Tab::Economia);
        a.category = Category::Financeiro;
        let b = Card::new("Correr no parque", Tab::Rotina);
        let stats = Stats::default();
        store.set_cards(vec![a.clone(), b.clone()], stats);
        (store, a, b)
    }

    #[test]
    fn get_returns_a_detached_copy() {
        let (store, _, _) = seeded();
        let mut snapshot = store.get();
        snapshot.cards.clear();
        snapshot.search_query = "mutated".into();
        assert_eq!(store.get().cards.len(), 2);
        assert!(store.get().search_query.is_empty());
    }

    #[test]
    fn listeners_fire_once_per_actual_change() {
        let (mut store, _, _) = seeded();
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        store.subscribe("counter", move |_, _| seen.set(seen.get() + 1));

        store.set_search_query("pagar".into());
        assert_eq!(calls.get(), 1);
        // Same value again: no change, no notification.
        store.set_search_query("pagar".into());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn resubscribing_a_key_replaces_the_listener() {
        let (mut store, _, _) = seeded();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let seen = first.clone();
        store.subscribe("dup", move |_, _| seen.set(seen.get() + 1));
        let seen = second.clone();
        store.subscribe("dup", move |_, _| seen.set(seen.get() + 1));

        store.set_loading(true);
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);

        store.unsubscribe("dup");
        store.set_loading(false);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn listener_receives_new_and_old_snapshots() {
        let (mut store, _, _) = seeded();
        let observed = Rc::new(Cell::new((Tab::Rotina, Tab::Rotina)));
        let seen = observed.clone();
        store.subscribe("tabs", move |new, old| {
            seen.set((new.active_tab, old.active_tab));
        });

        store.set_active_tab(Tab::Links);
        assert_eq!(observed.get(), (Tab::Links, Tab::Rotina));
    }

    #[test]
    fn tab_switch_clears_selection_modal_and_search() {
        let (mut store, a, _) = seeded();
        store.set_selected_card(Some(a.id));
        store.set_modal(Some(Modal::ConfirmDelete(a.id)));
        store.set_search_visible(true);
        store.set_search_query("pagar".into());

        store.set_active_tab(Tab::Links);
        let state = store.get();
        assert_eq!(state.selected_card, None);
        assert_eq!(state.modal, None);
        assert!(!state.search_visible);
        assert!(state.search_query.is_empty());
    }

    #[test]
    fn closing_the_form_clears_selection() {
        let (mut store, a, _) = seeded();
        store.set_selected_card(Some(a.id));
        store.set_modal(Some(Modal::CardForm { editing: Some(a.id) }));
        store.set_modal(None);
        assert_eq!(store.get().selected_card, None);
    }

    #[test]
    fn selecting_unknown_card_is_rejected() {
        let (mut store, _, _) = seeded();
        store.set_selected_card(Some(Uuid::new_v4()));
        assert_eq!(store.get().selected_card, None);

        store.set_modal(Some(Modal::ConfirmDelete(Uuid::new_v4())));
        assert_eq!(store.get().modal, None);
    }

    #[test]
    fn hiding_search_clears_query() {
        let (mut store, _, _) = seeded();
        store.set_search_visible(true);
        store.set_search_query("conta".into());
        store.set_search_visible(false);
        assert!(store.get().search_query.is_empty());
    }

    #[test]
    fn search_is_tab_scoped_and_diacritic_insensitive() {
        let (mut store, a, _) = seeded();

        store.set_active_tab(Tab::Economia);
        let hits = store.filter_by_search("PAGAR");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, a.id);

        // Category label "Financeiro" matches too.
        assert_eq!(store.filter_by_search("financeiro").len(), 1);

        store.set_active_tab(Tab::Rotina);
        assert!(store.filter_by_search("Pagar").is_empty());
    }

    #[test]
    fn blank_query_returns_unfiltered_tab_view() {
        let (mut store, _, b) = seeded();
        store.set_active_tab(Tab::Rotina);
        let hits = store.filter_by_search("   ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, b.id);
    }

    #[test]
    fn set_cards_drops_a_stale_selection() {
        let (mut store, a, b) = seeded();
        store.set_selected_card(Some(a.id));
        store.set_cards(vec![b.clone()], Stats::default());
        assert_eq!(store.get().selected_card, None);
    }

    #[test]
    fn reorder_cards_mirrors_the_sequence() {
        let (mut store, a, b) = seeded();
        store.reorder_cards(&[b.id, a.id]);
        let state = store.get();
        assert_eq!(state.cards[0].id, b.id);
        assert_eq!(state.cards[1].id, a.id);
        assert_eq!(state.cards[0].order, 0);
        assert_eq!(state.cards[1].order, 1);
    }
}

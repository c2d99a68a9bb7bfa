use uuid::Uuid;

use super::card::{Card, Tab};

/// Vertical extent of one rendered card row, in the list's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub top: f32,
    pub height: f32,
}

impl RowBounds {
    pub fn midpoint(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Uniform row geometry for a list of `count` rows spaced `stride` apart.
pub fn uniform_rows(count: usize, stride: f32) -> Vec<RowBounds> {
    (0..count)
        .map(|i| RowBounds {
            top: i as f32 * stride,
            height: stride,
        })
        .collect()
}

/// The insertion anchor is the first row whose vertical midpoint lies below
/// the pointer; when no row qualifies the drop appends at the end.
pub fn insertion_index(pointer_y: f32, rows: &[RowBounds]) -> usize {
    rows.iter()
        .position(|row| pointer_y < row.midpoint())
        .unwrap_or(rows.len())
}

/// Builds the full id sequence for a drop: the dragged card moves to
/// `insert_at` within its tab's visual list (an index into the list as
/// rendered, dragged row included), and every card outside the tab keeps
/// its relative order after the reordered tab.
pub fn reorder_sequence(cards: &[Card], tab: Tab, dragged: Uuid, insert_at: usize) -> Vec<Uuid> {
    let mut tab_ids: Vec<Uuid> = cards
        .iter()
        .filter(|c| c.tab == tab)
        .map(|c| c.id)
        .collect();

    let Some(from) = tab_ids.iter().position(|id| *id == dragged) else {
        // Dragged card is not in this tab; keep the current order.
        return cards.iter().map(|c| c.id).collect();
    };

    tab_ids.remove(from);
    // The drop index was computed against the list with the dragged row
    // still present; account for the removal when moving downward.
    let mut to = insert_at.min(tab_ids.len() + 1);
    if to > from {
        to -= 1;
    }
    tab_ids.insert(to.min(tab_ids.len()), dragged);

    let rest = cards.iter().filter(|c| c.tab != tab).map(|c| c.id);
    tab_ids.into_iter().chain(rest).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Card;

    fn card(title: &str, tab: Tab) -> Card {
        Card::new(title, tab)
    }

    #[test]
    fn pointer_above_first_midpoint_inserts_at_zero() {
        let rows = uniform_rows(3, 40.0);
        assert_eq!(insertion_index(10.0, &rows), 0);
    }

    #[test]
    fn pointer_below_all_midpoints_appends() {
        let rows = uniform_rows(3, 40.0);
        assert_eq!(insertion_index(119.0, &rows), 3);
        assert_eq!(insertion_index(500.0, &rows), 3);
    }

    #[test]
    fn midpoint_boundaries_are_exact() {
        let rows = uniform_rows(2, 40.0);
        // Midpoints sit at 20 and 60.
        assert_eq!(insertion_index(19.9, &rows), 0);
        assert_eq!(insertion_index(20.0, &rows), 1);
        assert_eq!(insertion_index(59.9, &rows), 1);
        assert_eq!(insertion_index(60.0, &rows), 2);
    }

    #[test]
    fn empty_list_appends_at_zero() {
        assert_eq!(insertion_index(15.0, &[]), 0);
    }

    #[test]
    fn sequence_moves_card_within_its_tab() {
        let a = card("a", Tab::Rotina);
        let b = card("b", Tab::Rotina);
        let c = card("c", Tab::Rotina);
        let cards = vec![a.clone(), b.clone(), c.clone()];

        // Drag the first row below the last row's midpoint.
        let seq = reorder_sequence(&cards, Tab::Rotina, a.id, 3);
        assert_eq!(seq, vec![b.id, c.id, a.id]);

        // Drag the last row above the first row's midpoint.
        let seq = reorder_sequence(&cards, Tab::Rotina, c.id, 0);
        assert_eq!(seq, vec![c.id, a.id, b.id]);
    }

    #[test]
    fn sequence_keeps_other_tabs_in_relative_order() {
        let a = card("a", Tab::Rotina);
        let x = card("x", Tab::Economia);
        let b = card("b", Tab::Rotina);
        let y = card("y", Tab::Links);
        let cards = vec![a.clone(), x.clone(), b.clone(), y.clone()];

        let seq = reorder_sequence(&cards, Tab::Rotina, a.id, 2);
        assert_eq!(seq, vec![b.id, a.id, x.id, y.id]);
    }

    #[test]
    fn drop_on_own_position_is_identity() {
        let a = card("a", Tab::Rotina);
        let b = card("b", Tab::Rotina);
        let cards = vec![a.clone(), b.clone()];

        let seq = reorder_sequence(&cards, Tab::Rotina, a.id, 0);
        assert_eq!(seq, vec![a.id, b.id]);
        let seq = reorder_sequence(&cards, Tab::Rotina, a.id, 1);
        assert_eq!(seq, vec![a.id, b.id]);
    }

    #[test]
    fn unknown_dragged_id_keeps_current_order() {
        let a = card("a", Tab::Rotina);
        let b = card("b", Tab::Economia);
        let cards = vec![a.clone(), b.clone()];
        let seq = reorder_sequence(&cards, Tab::Rotina, Uuid::new_v4(), 0);
        assert_eq!(seq, vec![a.id, b.id]);
    }
}

use chrono::NaiveDate;

use super::card::{Card, Status, Tab};

/// Aggregate counts over the whole collection, computed in a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub pendente: usize,
    pub concluido: usize,
    pub vencido: usize,
    pub due_today: usize,
    by_tab: [usize; 4],
}

impl Stats {
    pub fn compute(cards: &[Card], today: NaiveDate) -> Self {
        let mut stats = Self::default();
        for card in cards {
            stats.total += 1;
            match card.status {
                Status::Pendente => stats.pendente += 1,
                Status::Concluido => stats.concluido += 1,
                Status::Vencido => stats.vencido += 1,
            }
            stats.by_tab[card.tab.index()] += 1;
            if card.is_due_on(today) {
                stats.due_today += 1;
            }
        }
        stats
    }

    pub fn for_tab(&self, tab: Tab) -> usize {
        self.by_tab[tab.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::Tab;

    #[test]
    fn counts_by_status_tab_and_due_day() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let mut a = Card::new("Pagar conta", Tab::Economia);
        a.date = Some(today);
        let mut b = Card::new("Correr", Tab::Rotina);
        b.status = Status::Concluido;
        let c = Card::new("Renovar CNH", Tab::Lembretes);

        let stats = Stats::compute(&[a, b, c], today);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pendente, 2);
        assert_eq!(stats.concluido, 1);
        assert_eq!(stats.vencido, 0);
        assert_eq!(stats.due_today, 1);
        assert_eq!(stats.for_tab(Tab::Economia), 1);
        assert_eq!(stats.for_tab(Tab::Links), 0);
    }

    #[test]
    fn due_today_ignores_other_days() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let mut card = Card::new("Pagar conta", Tab::Economia);
        card.date = NaiveDate::from_ymd_opt(2024, 1, 6);
        let stats = Stats::compute(&[card], today);
        assert_eq!(stats.due_today, 0);
    }
}

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::card::{now_millis, Card, Category, Priority, RawCard, Status, Tab};
use crate::core::stats::Stats;

use super::{Backend, BACKUP_KEY, CARDS_KEY};

pub const EXPORT_VERSION: u32 = 1;

/// Input for [`CardStore::create`]. Enumerated fields arrive already
/// coerced (the lenient decode in `core::card` handles raw strings).
#[derive(Debug, Clone, Default)]
pub struct CardDraft {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub category: Category,
    pub status: Status,
    pub priority: Priority,
    pub link: String,
    pub tab: Tab,
}

/// Partial update for [`CardStore::update`]. `None` leaves a field alone;
/// id and creation timestamp are not patchable.
#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub title: Option<String>,
    pub date: Option<Option<NaiveDate>>,
    pub category: Option<Category>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub link: Option<String>,
    pub tab: Option<Tab>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub success: bool,
    pub imported: usize,
    pub skipped: usize,
    pub total: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportData<'a> {
    version: u32,
    exported_at: i64,
    count: usize,
    cards: &'a [Card],
}

#[derive(Deserialize)]
struct ImportPayload {
    #[serde(default)]
    cards: Vec<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupSnapshot<'a> {
    timestamp: i64,
    count: usize,
    cards: &'a [Card],
}

#[derive(Deserialize)]
struct BackupPayload {
    #[serde(default)]
    cards: Vec<serde_json::Value>,
}

/// Durable CRUD over the card collection, stored as one JSON array under a
/// single key. Every operation reads and writes the whole collection in one
/// call; failures are logged and reported as not-applied, never propagated.
pub struct CardStore {
    backend: Box<dyn Backend>,
}

impl CardStore {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// The full collection, sorted by `order` ascending. Records that
    /// lacked an order value sort after the ordered ones by `created_at`
    /// descending, and the healed ordering is persisted back. A corrupt
    /// blob or non-array shape yields an empty collection.
    pub fn get_all(&self) -> Vec<Card> {
        let blob = match self.backend.read(CARDS_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("failed to read card collection: {e}");
                return Vec::new();
            }
        };

        let (cards, needs_compact) = decode_collection(&blob);
        if needs_compact {
            let mut healed = cards.clone();
            compact_orders(&mut healed);
            self.save(&healed);
            return healed;
        }
        cards
    }

    pub fn create(&self, draft: CardDraft) -> Option<Card> {
        let title = draft.title.trim();
        if title.is_empty() {
            log::warn!("card create rejected: empty title");
            return None;
        }

        let mut cards = self.get_all();
        let now = now_millis();
        let card = Card {
            id: Uuid::new_v4(),
            title: title.to_string(),
            date: draft.date,
            category: draft.category,
            status: draft.status,
            priority: draft.priority,
            link: draft.link.trim().to_string(),
            tab: draft.tab,
            created_at: now,
            updated_at: now,
            order: cards.len() as u32,
        };
        cards.push(card.clone());
        self.save(&cards).then_some(card)
    }

    pub fn update(&self, id: Uuid, patch: CardPatch) -> Option<Card> {
        let mut cards = self.get_all();
        let card = cards.iter_mut().find(|c| c.id == id)?;

        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                log::warn!("ignoring empty title in update for {id}");
            } else {
                card.title = title;
            }
        }
        if let Some(date) = patch.date {
            card.date = date;
        }
        if let Some(category) = patch.category {
            card.category = category;
        }
        if let Some(status) = patch.status {
            card.status = status;
        }
        if let Some(priority) = patch.priority {
            card.priority = priority;
        }
        if let Some(link) = patch.link {
            card.link = link.trim().to_string();
        }
        if let Some(tab) = patch.tab {
            card.tab = tab;
        }
        card.touch();

        let updated = card.clone();
        self.save(&cards).then_some(updated)
    }

    pub fn delete(&self, id: Uuid) -> bool {
        let mut cards = self.get_all();
        let Some(pos) = cards.iter().position(|c| c.id == id) else {
            return false;
        };
        cards.remove(pos);
        compact_orders(&mut cards);
        self.save(&cards)
    }

    /// Rewrites `order` from the given id sequence: listed ids take their
    /// list index; records absent from the list follow all listed ones,
    /// keeping their current relative order.
    pub fn reorder(&self, ids: &[Uuid]) -> bool {
        let mut cards = self.get_all();
        let pos: std::collections::HashMap<Uuid, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        cards.sort_by_key(|c| pos.get(&c.id).copied().unwrap_or(usize::MAX));
        compact_orders(&mut cards);
        self.save(&cards)
    }

    pub fn stats(&self, today: NaiveDate) -> Stats {
        Stats::compute(&self.get_all(), today)
    }

    /// Serialized `{version, exportedAt, count, cards}` payload.
    pub fn export(&self) -> Option<String> {
        let cards = self.get_all();
        let data = ExportData {
            version: EXPORT_VERSION,
            exported_at: now_millis(),
            count: cards.len(),
            cards: &cards,
        };
        match serde_json::to_string_pretty(&data) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::error!("failed to serialize export: {e}");
                None
            }
        }
    }

    /// Merges an export payload by id: existing ids and records missing
    /// required fields are skipped; newly-imported records get fresh
    /// timestamps and trailing order.
    pub fn import(&self, payload: &str) -> ImportReport {
        let mut cards = self.get_all();
        let original_total = cards.len();

        let parsed: ImportPayload = match serde_json::from_str(payload) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::error!("failed to parse import payload: {e}");
                return ImportReport {
                    success: false,
                    imported: 0,
                    skipped: 0,
                    total: original_total,
                };
            }
        };

        let mut existing: HashSet<Uuid> = cards.iter().map(|c| c.id).collect();
        let mut imported = 0;
        let mut skipped = 0;
        let now = now_millis();

        for value in parsed.cards {
            let card = serde_json::from_value::<RawCard>(value)
                .ok()
                .and_then(|raw| raw.into_card());
            match card {
                Some((mut card, _)) if !existing.contains(&card.id) => {
                    card.created_at = now;
                    card.updated_at = now;
                    card.order = cards.len() as u32;
                    existing.insert(card.id);
                    cards.push(card);
                    imported += 1;
                }
                _ => skipped += 1,
            }
        }

        if imported > 0 && !self.save(&cards) {
            return ImportReport {
                success: false,
                imported: 0,
                skipped,
                total: original_total,
            };
        }

        ImportReport {
            success: true,
            imported,
            skipped,
            total: cards.len(),
        }
    }

    /// Writes the `{timestamp, count, cards}` snapshot under the backup key.
    pub fn backup(&self) -> bool {
        let cards = self.get_all();
        let snapshot = BackupSnapshot {
            timestamp: now_millis(),
            count: cards.len(),
            cards: &cards,
        };
        let payload = match serde_json::to_string(&snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("failed to serialize backup: {e}");
                return false;
            }
        };
        match self.backend.write(BACKUP_KEY, &payload) {
            Ok(()) => true,
            Err(e) => {
                log::error!("failed to write backup: {e}");
                false
            }
        }
    }

    /// Replaces the collection with the backup snapshot. Returns the number
    /// of restored records, or `None` when no usable snapshot exists.
    pub fn restore(&self) -> Option<usize> {
        let blob = match self.backend.read(BACKUP_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                log::error!("failed to read backup: {e}");
                return None;
            }
        };

        let parsed: BackupPayload = match serde_json::from_str(&blob) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::error!("failed to parse backup: {e}");
                return None;
            }
        };

        let mut records: Vec<(Card, Option<u32>)> = parsed
            .cards
            .into_iter()
            .filter_map(|value| serde_json::from_value::<RawCard>(value).ok())
            .filter_map(RawCard::into_card)
            .collect();
        sort_records(&mut records);
        let mut cards: Vec<Card> = records.into_iter().map(|(card, _)| card).collect();
        compact_orders(&mut cards);

        self.save(&cards).then_some(cards.len())
    }

    fn save(&self, cards: &[Card]) -> bool {
        let blob = match serde_json::to_string(cards) {
            Ok(blob) => blob,
            Err(e) => {
                log::error!("failed to serialize card collection: {e}");
                return false;
            }
        };
        match self.backend.write(CARDS_KEY, &blob) {
            Ok(()) => true,
            Err(e) => {
                log::error!("failed to write card collection: {e}");
                false
            }
        }
    }
}

fn decode_collection(blob: &str) -> (Vec<Card>, bool) {
    let values = match serde_json::from_str::<serde_json::Value>(blob) {
        Ok(serde_json::Value::Array(values)) => values,
        Ok(_) => {
            log::warn!("stored card collection is not an array; starting empty");
            return (Vec::new(), false);
        }
        Err(e) => {
            log::warn!("stored card collection is corrupt ({e}); starting empty");
            return (Vec::new(), false);
        }
    };

    let total = values.len();
    let mut records: Vec<(Card, Option<u32>)> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawCard>(value).ok())
        .filter_map(RawCard::into_card)
        .collect();
    let dropped = total - records.len();
    if dropped > 0 {
        log::warn!("dropped {dropped} malformed card record(s)");
    }

    sort_records(&mut records);
    let needs_compact = records.iter().any(|(_, order)| order.is_none());
    let cards = records.into_iter().map(|(card, _)| card).collect();
    (cards, needs_compact)
}

fn sort_records(records: &mut [(Card, Option<u32>)]) {
    records.sort_by(|(a, a_order), (b, b_order)| match (a_order, b_order) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    });
}

fn compact_orders(cards: &mut [Card]) {
    for (i, card) in cards.iter_mut().enumerate() {
        card.order = i as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryBackend, StorageError};

    fn store() -> CardStore {
        CardStore::new(Box::new(MemoryBackend::new()))
    }

    fn draft(title: &str, tab: Tab) -> CardDraft {
        CardDraft {
            title: title.into(),
            tab,
            ..CardDraft::default()
        }
    }

    struct FailingBackend;

    impl Backend for FailingBackend {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn empty_backend_yields_empty_collection() {
        assert!(store().get_all().is_empty());
    }

    #[test]
    fn corrupt_blob_yields_empty_collection() {
        let store = CardStore::new(Box::new(MemoryBackend::seed(CARDS_KEY, "{not json")));
        assert!(store.get_all().is_empty());

        let store = CardStore::new(Box::new(MemoryBackend::seed(CARDS_KEY, r#"{"a": 1}"#)));
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn create_rejects_empty_title() {
        let store = store();
        assert!(store.create(draft("   ", Tab::Rotina)).is_none());
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn create_appends_with_trailing_order() {
        let store = store();
        let first = store.create(draft("Pagar conta", Tab::Economia)).unwrap();
        let second = store.create(draft("Correr", Tab::Rotina)).unwrap();

        let all = store.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], first);
        assert_eq!(all[1], second);
        assert_eq!(all[0].order, 0);
        assert_eq!(all[1].order, 1);
        assert_eq!(all[0].category, Category::Outro);
        assert_eq!(all[0].status, Status::Pendente);
        assert_eq!(all[0].priority, Priority::Media);
    }

    #[test]
    fn update_merges_patch_and_keeps_identity() {
        let store = store();
        let card = store.create(draft("Pagar conta", Tab::Economia)).unwrap();

        let updated = store
            .update(
                card.id,
                CardPatch {
                    status: Some(Status::Concluido),
                    date: Some(NaiveDate::from_ymd_opt(2024, 1, 5)),
                    ..CardPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, card.id);
        assert_eq!(updated.created_at, card.created_at);
        assert_eq!(updated.status, Status::Concluido);
        assert_eq!(updated.date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(updated.title, "Pagar conta");
        assert!(updated.updated_at >= card.updated_at);
        assert_eq!(store.get_all()[0], updated);
    }

    #[test]
    fn update_unknown_id_is_none() {
        assert!(store().update(Uuid::new_v4(), CardPatch::default()).is_none());
    }

    #[test]
    fn update_ignores_empty_title_patch() {
        let store = store();
        let card = store.create(draft("Pagar conta", Tab::Economia)).unwrap();
        let updated = store
            .update(
                card.id,
                CardPatch {
                    title: Some("  ".into()),
                    ..CardPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Pagar conta");
    }

    #[test]
    fn delete_compacts_remaining_orders() {
        let store = store();
        let a = store.create(draft("a", Tab::Rotina)).unwrap();
        let b = store.create(draft("b", Tab::Rotina)).unwrap();
        let c = store.create(draft("c", Tab::Rotina)).unwrap();

        assert!(store.delete(b.id));
        let all = store.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a.id);
        assert_eq!(all[1].id, c.id);
        assert_eq!(all[0].order, 0);
        assert_eq!(all[1].order, 1);

        assert!(!store.delete(b.id));
    }

    #[test]
    fn reorder_moves_listed_ids_and_preserves_the_rest() {
        let store = store();
        let a = store.create(draft("a", Tab::Rotina)).unwrap();
        let b = store.create(draft("b", Tab::Rotina)).unwrap();
        let x = store.create(draft("x", Tab::Economia)).unwrap();
        let y = store.create(draft("y", Tab::Economia)).unwrap();

        assert!(store.reorder(&[b.id, a.id]));
        let all = store.get_all();
        let ids: Vec<Uuid> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![b.id, a.id, x.id, y.id]);
        let orders: Vec<u32> = all.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn malformed_records_are_dropped_and_missing_order_heals() {
        let blob = r#"[
            {"id": "8f6f1c2e-45dd-4b13-9d7b-0a8f6f1c2e45", "title": "Sem ordem",
             "tab": "rotina", "createdAt": 100, "updatedAt": 100},
            {"id": "1d9f2b3c-6a7e-4f50-8c91-d2e3f4a5b6c7", "title": "Mais novo",
             "tab": "rotina", "createdAt": 200, "updatedAt": 200},
            {"title": "Sem id", "tab": "rotina"},
            "lixo"
        ]"#;
        let store = CardStore::new(Box::new(MemoryBackend::seed(CARDS_KEY, blob)));

        let all = store.get_all();
        assert_eq!(all.len(), 2);
        // No order stored: newest first, then healed to a dense range.
        assert_eq!(all[0].title, "Mais novo");
        assert_eq!(all[1].title, "Sem ordem");
        assert_eq!(all[0].order, 0);
        assert_eq!(all[1].order, 1);

        // The healed ordering was persisted.
        let again = store.get_all();
        assert_eq!(again, all);
    }

    #[test]
    fn stats_scenario_counts_tab_status_and_today() {
        let store = store();
        let today = chrono::Local::now().date_naive();
        let before = store.stats(today);

        let mut d = draft("Pagar conta", Tab::Economia);
        d.date = NaiveDate::from_ymd_opt(2024, 1, 5);
        store.create(d).unwrap();

        let after = store.stats(today);
        assert_eq!(after.pendente, before.pendente + 1);
        assert_eq!(after.for_tab(Tab::Economia), before.for_tab(Tab::Economia) + 1);
        assert_eq!(after.due_today, before.due_today);

        let mut d = draft("Vence hoje", Tab::Lembretes);
        d.date = Some(today);
        store.create(d).unwrap();
        assert_eq!(store.stats(today).due_today, after.due_today + 1);
    }

    #[test]
    fn import_of_own_export_skips_everything() {
        let store = store();
        store.create(draft("a", Tab::Rotina)).unwrap();
        store.create(draft("b", Tab::Links)).unwrap();

        let payload = store.export().unwrap();
        let report = store.import(&payload);
        assert!(report.success);
        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.total, 2);
    }

    #[test]
    fn import_into_empty_store_assigns_fresh_order() {
        let source = store();
        source.create(draft("a", Tab::Rotina)).unwrap();
        source.create(draft("b", Tab::Economia)).unwrap();
        let payload = source.export().unwrap();

        let target = store();
        target.create(draft("local", Tab::Rotina)).unwrap();
        let report = target.import(&payload);
        assert!(report.success);
        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.total, 3);

        let orders: Vec<u32> = target.get_all().iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn import_garbage_payload_reports_failure() {
        let store = store();
        let report = store.import("not json at all");
        assert!(!report.success);
        assert_eq!(report.imported, 0);
    }

    #[test]
    fn backup_and_restore_roundtrip() {
        let store = store();
        let a = store.create(draft("a", Tab::Rotina)).unwrap();
        let b = store.create(draft("b", Tab::Economia)).unwrap();

        assert!(store.backup());
        assert!(store.delete(a.id));
        assert!(store.delete(b.id));
        assert!(store.get_all().is_empty());

        assert_eq!(store.restore(), Some(2));
        let ids: Vec<Uuid> = store.get_all().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn restore_without_snapshot_is_none() {
        assert_eq!(store().restore(), None);
    }

    #[test]
    fn write_failure_reports_not_applied() {
        let store = CardStore::new(Box::new(FailingBackend));
        assert!(store.create(draft("a", Tab::Rotina)).is_none());
        assert!(!store.backup());
    }
}

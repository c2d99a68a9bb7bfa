use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Rotina,
    Economia,
    Lembretes,
    Links,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rotina => "rotina",
            Self::Economia => "economia",
            Self::Lembretes => "lembretes",
            Self::Links => "links",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "rotina" => Some(Self::Rotina),
            "economia" => Some(Self::Economia),
            "lembretes" => Some(Self::Lembretes),
            "links" => Some(Self::Links),
            _ => None,
        }
    }

    /// Lenient variant used when decoding stored records.
    pub fn coerce(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Rotina => "Rotina",
            Self::Economia => "Economia",
            Self::Lembretes => "Lembretes",
            Self::Links => "Links",
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Rotina => "view-list-symbolic",
            Self::Economia => "payment-card-symbolic",
            Self::Lembretes => "alarm-symbolic",
            Self::Links => "web-browser-symbolic",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Rotina => 0,
            Self::Economia => 1,
            Self::Lembretes => 2,
            Self::Links => 3,
        }
    }

    pub const ALL: &'static [Tab] = &[Tab::Rotina, Tab::Economia, Tab::Lembretes, Tab::Links];

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Default for Tab {
    fn default() -> Self {
        Self::Rotina
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Trabalho,
    Pessoal,
    Saude,
    Financeiro,
    Casa,
    Outro,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trabalho => "trabalho",
            Self::Pessoal => "pessoal",
            Self::Saude => "saude",
            Self::Financeiro => "financeiro",
            Self::Casa => "casa",
            Self::Outro => "outro",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "trabalho" => Some(Self::Trabalho),
            "pessoal" => Some(Self::Pessoal),
            "saude" => Some(Self::Saude),
            "financeiro" => Some(Self::Financeiro),
            "casa" => Some(Self::Casa),
            "outro" => Some(Self::Outro),
            _ => None,
        }
    }

    pub fn coerce(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Trabalho => "Trabalho",
            Self::Pessoal => "Pessoal",
            Self::Saude => "Saúde",
            Self::Financeiro => "Financeiro",
            Self::Casa => "Casa",
            Self::Outro => "Outro",
        }
    }

    pub const ALL: &'static [Category] = &[
        Category::Trabalho,
        Category::Pessoal,
        Category::Saude,
        Category::Financeiro,
        Category::Casa,
        Category::Outro,
    ];
}

impl Default for Category {
    fn default() -> Self {
        Self::Outro
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pendente,
    Concluido,
    Vencido,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendente => "pendente",
            Self::Concluido => "concluido",
            Self::Vencido => "vencido",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pendente" => Some(Self::Pendente),
            "concluido" => Some(Self::Concluido),
            "vencido" => Some(Self::Vencido),
            _ => None,
        }
    }

    pub fn coerce(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pendente => "Pendente",
            Self::Concluido => "Concluído",
            Self::Vencido => "Vencido",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Concluido)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Pendente
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Baixa,
    Media,
    Alta,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baixa => "baixa",
            Self::Media => "media",
            Self::Alta => "alta",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "baixa" => Some(Self::Baixa),
            "media" => Some(Self::Media),
            "alta" => Some(Self::Alta),
            _ => None,
        }
    }

    pub fn coerce(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Baixa => "Baixa",
            Self::Media => "Média",
            Self::Alta => "Alta",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Media
    }
}

/// Maximum accepted title length, enforced by the card form.
pub const TITLE_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub category: Category,
    pub status: Status,
    pub priority: Priority,
    pub link: String,
    pub tab: Tab,
    pub created_at: i64,
    pub updated_at: i64,
    pub order: u32,
}

impl Card {
    pub fn new(title: impl Into<String>, tab: Tab) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            date: None,
            category: Category::default(),
            status: Status::default(),
            priority: Priority::default(),
            link: String::new(),
            tab,
            created_at: now,
            updated_at: now,
            order: 0,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }

    pub fn has_link(&self) -> bool {
        !self.link.is_empty()
    }

    /// Date-only comparison; time of day is ignored.
    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.date == Some(day)
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A stored record as it appears on disk, before validation. Missing or
/// malformed fields are tolerated here and resolved in [`RawCard::into_card`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCard {
    pub id: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub link: Option<String>,
    pub tab: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub order: Option<u32>,
}

impl RawCard {
    /// Validates a raw record. Records without a usable id or title are
    /// dropped; enumerated fields coerce to their defaults. Returns the
    /// card together with the order value the record carried, if any.
    pub fn into_card(self) -> Option<(Card, Option<u32>)> {
        let id = Uuid::parse_str(self.id?.trim()).ok()?;
        let title = self.title?.trim().to_string();
        if title.is_empty() {
            return None;
        }

        let date = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

        let order = self.order;
        let card = Card {
            id,
            title,
            date,
            category: Category::coerce(self.category.as_deref().unwrap_or("")),
            status: Status::coerce(self.status.as_deref().unwrap_or("")),
            priority: Priority::coerce(self.priority.as_deref().unwrap_or("")),
            link: self.link.unwrap_or_default().trim().to_string(),
            tab: Tab::coerce(self.tab.as_deref().unwrap_or("")),
            created_at: self.created_at.unwrap_or(0),
            updated_at: self.updated_at.unwrap_or(0),
            order: order.unwrap_or(0),
        };
        Some((card, order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_coercion_falls_back_to_defaults() {
        assert_eq!(Category::coerce("financeiro"), Category::Financeiro);
        assert_eq!(Category::coerce("nonsense"), Category::Outro);
        assert_eq!(Status::coerce(""), Status::Pendente);
        assert_eq!(Priority::coerce("urgente"), Priority::Media);
        assert_eq!(Tab::coerce("economia"), Tab::Economia);
        assert_eq!(Tab::coerce("desconhecida"), Tab::Rotina);
    }

    #[test]
    fn tab_cycle_is_closed() {
        for tab in Tab::ALL {
            assert_eq!(tab.next().previous(), *tab);
        }
        assert_eq!(Tab::Links.next(), Tab::Rotina);
        assert_eq!(Tab::Rotina.previous(), Tab::Links);
    }

    #[test]
    fn raw_card_requires_id_and_title() {
        let raw = RawCard {
            title: Some("Pagar conta".into()),
            ..RawCard::default()
        };
        assert!(raw.into_card().is_none());

        let raw = RawCard {
            id: Some(Uuid::new_v4().to_string()),
            title: Some("   ".into()),
            ..RawCard::default()
        };
        assert!(raw.into_card().is_none());
    }

    #[test]
    fn raw_card_coerces_and_tolerates_empty_date() {
        let raw = RawCard {
            id: Some(Uuid::new_v4().to_string()),
            title: Some("Pagar conta".into()),
            date: Some("".into()),
            category: Some("imposto".into()),
            status: Some("pendente".into()),
            tab: Some("economia".into()),
            order: Some(3),
            ..RawCard::default()
        };
        let (card, order) = raw.into_card().unwrap();
        assert_eq!(card.date, None);
        assert_eq!(card.category, Category::Outro);
        assert_eq!(card.tab, Tab::Economia);
        assert_eq!(order, Some(3));
    }

    #[test]
    fn serialized_card_uses_stored_field_names() {
        let mut card = Card::new("Pagar conta", Tab::Economia);
        card.date = NaiveDate::from_ymd_opt(2024, 1, 5);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["tab"], "economia");
        assert_eq!(json["status"], "pendente");
        assert_eq!(json["date"], "2024-01-05");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}

//! Smoke-test report form: field identifiers, persisted data shapes and the
//! pure engines (lists, currency toggles, visibility, validation) that operate
//! on them.

pub mod currency;
pub mod lists;
pub mod model;
pub mod validation;
pub mod visibility;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::notifications::Notification;

pub use currency::{CheckStatus, CurrencySlot, ToggleOutcome};
pub use lists::{AddButtonState, ProductIdList, SiteRow, SiteRowDescriptor, SiteSection};
pub use model::SmokeForm;
pub use validation::{first_invalid_field, sanitize_ticket, ticket_hint, validate};
pub use visibility::{FieldGroup, GroupState, Visibility};

pub const CURRENCIES: [&str; 10] = [
    "USD", "EUR", "KRW", "VND", "RUB", "MBT", "BIF", "CRC", "PAB", "ADA",
];
pub const DEFAULT_SITES: [&str; 3] = ["Продакшн", "Стейджинг", "Тестовый"];
pub const EXTRA_SITES: [&str; 3] = ["Другой сайт 4", "Другой сайт 5", "Другой сайт 6"];
pub const MAX_SITES: usize = 6;
pub const MAX_PRODUCT_IDS: usize = 8;
pub const CURRENCY_SLOTS: usize = 3;

/// Key under which the convertible currency toggle state is persisted.
pub const CONVERTIBLE_CHECKED_KEY: &str = "convertibleCurrencyChecked";

/// Every option a site selector offers, default names first.
pub fn site_options() -> impl Iterator<Item = &'static str> {
    DEFAULT_SITES.iter().chain(EXTRA_SITES.iter()).copied()
}

/// Named top-level form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Product,
    Game,
    Freespins,
    Ticket,
    QuantityChecked,
    DefaultBets,
    DefaultBetsStatus,
    MinBetsChecked,
    MinBetsStatus,
    AddedToTask,
    NotifyManager,
    ManagerResponse,
    ConvertibleCurrency,
}

/// Input control backing a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Checkbox,
    Select(&'static [&'static str]),
}

/// Required top-level fields in validation order.
pub const REQUIRED_FIELDS: [Field; 7] = [
    Field::Product,
    Field::Game,
    Field::Freespins,
    Field::Ticket,
    Field::DefaultBets,
    Field::NotifyManager,
    Field::ConvertibleCurrency,
];

const DEFAULT_BETS_OPTIONS: &[&str] = &["checked", "not_checked"];
const STATUS_OPTIONS: &[&str] = &["ok", "exceptions", "bug"];
const NOTIFY_OPTIONS: &[&str] = &["yes", "no"];
const MANAGER_RESPONSE_OPTIONS: &[&str] = &["sent", "answered", "waiting"];

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Product,
        Field::Game,
        Field::Freespins,
        Field::Ticket,
        Field::QuantityChecked,
        Field::DefaultBets,
        Field::DefaultBetsStatus,
        Field::MinBetsChecked,
        Field::MinBetsStatus,
        Field::AddedToTask,
        Field::NotifyManager,
        Field::ManagerResponse,
        Field::ConvertibleCurrency,
    ];

    /// Identifier used as the `formData` key.
    pub fn key(self) -> &'static str {
        match self {
            Field::Product => "product",
            Field::Game => "game",
            Field::Freespins => "freespins",
            Field::Ticket => "ticket",
            Field::QuantityChecked => "quantityChecked",
            Field::DefaultBets => "defaultBets",
            Field::DefaultBetsStatus => "defaultBetsStatus",
            Field::MinBetsChecked => "minBetsChecked",
            Field::MinBetsStatus => "minBetsStatus",
            Field::AddedToTask => "addedToTask",
            Field::NotifyManager => "notifyManager",
            Field::ManagerResponse => "managerResponse",
            Field::ConvertibleCurrency => "convertibleCurrency",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Product => "Продукт",
            Field::Game => "Игра",
            Field::Freespins => "Фриспины",
            Field::Ticket => "Тикет",
            Field::QuantityChecked => "Количество продуктов проверено",
            Field::DefaultBets => "Дефолтные ставки",
            Field::DefaultBetsStatus => "Статус дефолтных ставок",
            Field::MinBetsChecked => "Минимальные ставки проверены",
            Field::MinBetsStatus => "Статус минимальных ставок",
            Field::AddedToTask => "Добавил в задачу",
            Field::NotifyManager => "Писать менеджеру?",
            Field::ManagerResponse => "Ответ менеджеру",
            Field::ConvertibleCurrency => "Конвертируемая валюта",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Product | Field::Game | Field::Freespins | Field::Ticket => FieldKind::Text,
            Field::QuantityChecked | Field::MinBetsChecked | Field::AddedToTask => {
                FieldKind::Checkbox
            }
            Field::DefaultBets => FieldKind::Select(DEFAULT_BETS_OPTIONS),
            Field::DefaultBetsStatus | Field::MinBetsStatus => FieldKind::Select(STATUS_OPTIONS),
            Field::NotifyManager => FieldKind::Select(NOTIFY_OPTIONS),
            Field::ManagerResponse => FieldKind::Select(MANAGER_RESPONSE_OPTIONS),
            Field::ConvertibleCurrency => FieldKind::Select(&CURRENCIES),
        }
    }

    pub fn is_checkbox(self) -> bool {
        matches!(self.kind(), FieldKind::Checkbox)
    }

    pub fn from_key(key: &str) -> Option<Field> {
        FIELD_INDEX.get(key.to_ascii_lowercase().as_str()).copied()
    }
}

static FIELD_INDEX: Lazy<HashMap<String, Field>> = Lazy::new(|| {
    Field::ALL
        .iter()
        .map(|field| (field.key().to_ascii_lowercase(), *field))
        .collect()
});

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The two site sections of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Desktop,
    Mobile,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Desktop, Section::Mobile];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Desktop => "desktop",
            Section::Mobile => "mobile",
        }
    }

    pub fn parse(raw: &str) -> Option<Section> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "desktop" | "d" => Some(Section::Desktop),
            "mobile" | "m" => Some(Section::Mobile),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value held by a simple form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(value) => Some(*value),
            _ => None,
        }
    }
}

/// A verified currency on a site. Only entries with a currency are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyCheck {
    pub currency: String,
    pub checked: bool,
}

/// A site row with a selected site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEntry {
    pub site: String,
    #[serde(default)]
    pub currencies: Vec<CurrencyCheck>,
}

/// Serialized form data: simple field values plus the dynamic lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMap {
    #[serde(flatten)]
    pub values: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub desktop_sites: Vec<SiteEntry>,
    #[serde(default)]
    pub mobile_sites: Vec<SiteEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl FieldMap {
    /// Text value of a field, empty when unset or not textual.
    pub fn text(&self, field: Field) -> &str {
        self.values
            .get(field.key())
            .and_then(FieldValue::as_text)
            .unwrap_or("")
    }

    pub fn flag(&self, field: Field) -> bool {
        self.flag_key(field.key())
    }

    pub fn flag_key(&self, key: &str) -> bool {
        self.values
            .get(key)
            .and_then(FieldValue::as_flag)
            .unwrap_or(false)
    }

    pub fn sites(&self, section: Section) -> &[SiteEntry] {
        match section {
            Section::Desktop => &self.desktop_sites,
            Section::Mobile => &self.mobile_sites,
        }
    }

    /// Product IDs that carry a value.
    pub fn filled_product_ids(&self) -> impl Iterator<Item = &str> {
        self.product_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
    }

    pub fn convertible_checked(&self) -> bool {
        self.flag_key(CONVERTIBLE_CHECKED_KEY)
    }
}

/// Whole persisted application state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub form_data: FieldMap,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

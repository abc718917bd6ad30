//! Domain types and the Notion wire schema they map onto.
//!
//! # Design
//! Items live remotely as Notion pages whose properties are keyed by fixed
//! Chinese field names. `ItemFields` is the typed partial property map the
//! client sends; `Page` is the raw record the service returns, decoded into
//! an `Item` with the same fallbacks the widget has always used for missing
//! or unexpected property values.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Property holding the item text (rich-text title).
pub const TITLE_PROPERTY: &str = "标题";
/// Property holding the item type (single select).
pub const KIND_PROPERTY: &str = "选择";
/// Property holding the completion status (single select).
pub const STATUS_PROPERTY: &str = "状态";

/// Shown when a page has no usable title.
pub const UNTITLED: &str = "无内容";

/// The two categories an item can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemKind {
    Todo,
    #[default]
    FlashThought,
}

impl ItemKind {
    /// Select option name stored remotely.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Todo => "待办",
            ItemKind::FlashThought => "闪念",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "待办" => Some(ItemKind::Todo),
            "闪念" => Some(ItemKind::FlashThought),
            _ => None,
        }
    }

    /// The other category. There are exactly two.
    pub fn toggled(self) -> Self {
        match self {
            ItemKind::Todo => ItemKind::FlashThought,
            ItemKind::FlashThought => ItemKind::Todo,
        }
    }
}

/// Completion status of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemStatus {
    #[default]
    InProgress,
    Completed,
}

impl ItemStatus {
    pub fn label(self) -> &'static str {
        match self {
            ItemStatus::InProgress => "进行中",
            ItemStatus::Completed => "已完成",
        }
    }

    /// Only the exact "completed" label counts as completed.
    pub fn from_label(label: &str) -> Self {
        if label == ItemStatus::Completed.label() {
            ItemStatus::Completed
        } else {
            ItemStatus::InProgress
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ItemStatus::InProgress => ItemStatus::Completed,
            ItemStatus::Completed => ItemStatus::InProgress,
        }
    }

    pub fn is_completed(self) -> bool {
        self == ItemStatus::Completed
    }
}

/// A captured note or to-do, decoded from a remote page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub kind: ItemKind,
    pub status: ItemStatus,
}

/// Partial property map for create and update calls. Only the fields that are
/// `Some` end up in the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFields {
    pub title: Option<String>,
    pub kind: Option<ItemKind>,
    pub status: Option<ItemStatus>,
}

impl ItemFields {
    /// Fields for a freshly captured item.
    pub fn new_item(title: &str, kind: ItemKind) -> Self {
        Self {
            title: Some(title.to_string()),
            kind: Some(kind),
            status: Some(ItemStatus::InProgress),
        }
    }

    pub fn status(status: ItemStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn kind(kind: ItemKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Notion property JSON for the present fields.
    pub fn to_properties(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        if let Some(title) = &self.title {
            properties.insert(
                TITLE_PROPERTY.to_string(),
                json!({ "title": [{ "text": { "content": title } }] }),
            );
        }
        if let Some(kind) = self.kind {
            properties.insert(
                KIND_PROPERTY.to_string(),
                json!({ "select": { "name": kind.label() } }),
            );
        }
        if let Some(status) = self.status {
            properties.insert(
                STATUS_PROPERTY.to_string(),
                json!({ "select": { "name": status.label() } }),
            );
        }
        properties
    }
}

/// A page record as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Body of a data source query response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResults {
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Deserialize)]
struct TitleValue {
    #[serde(default)]
    title: Vec<RichText>,
}

#[derive(Deserialize)]
struct RichText {
    #[serde(default)]
    plain_text: String,
}

#[derive(Deserialize)]
struct SelectValue {
    #[serde(default)]
    select: Option<SelectOption>,
}

#[derive(Deserialize)]
struct SelectOption {
    name: String,
}

impl Page {
    /// Decode into an `Item`, tolerating missing or malformed properties.
    pub fn to_item(&self) -> Item {
        let title = self
            .property::<TitleValue>(TITLE_PROPERTY)
            .and_then(|value| value.title.into_iter().next())
            .map(|segment| segment.plain_text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let kind = self
            .select_name(KIND_PROPERTY)
            .and_then(|name| ItemKind::from_label(&name))
            .unwrap_or_default();

        let status = self
            .select_name(STATUS_PROPERTY)
            .map(|name| ItemStatus::from_label(&name))
            .unwrap_or_default();

        Item {
            id: self.id.clone(),
            title,
            kind,
            status,
        }
    }

    fn property<T: serde::de::DeserializeOwned>(&self, name: &str) -> Option<T> {
        let value = self.properties.get(name)?;
        serde_json::from_value(value.clone()).ok()
    }

    fn select_name(&self, name: &str) -> Option<String> {
        self.property::<SelectValue>(name)?.select.map(|option| option.name)
    }
}

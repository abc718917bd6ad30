//! Row view models and list-item markup.
//!
//! Titles are untrusted remote content. They are escaped before they reach any
//! markup, and so is every attribute value.

use crate::types::{Item, ItemKind, ItemStatus};

pub const TODO_ICON: &str = "📋";
pub const FLASH_THOUGHT_ICON: &str = "💡";
pub const COMPLETED_ICON: &str = "✅";
pub const IN_PROGRESS_ICON: &str = "⬜";
pub const TOGGLE_TYPE_ICON: &str = "🔄";
pub const DELETE_ICON: &str = "🗑️";

pub fn kind_icon(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Todo => TODO_ICON,
        ItemKind::FlashThought => FLASH_THOUGHT_ICON,
    }
}

pub fn status_icon(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Completed => COMPLETED_ICON,
        ItemStatus::InProgress => IN_PROGRESS_ICON,
    }
}

/// Escape text for insertion into HTML content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// One rendered list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub id: String,
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub kind_icon: &'static str,
    pub status_icon: &'static str,
    /// Plain title text. Use `title_html` when emitting markup.
    pub title: String,
    pub title_html: String,
}

impl ItemRow {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            kind: item.kind,
            status: item.status,
            kind_icon: kind_icon(item.kind),
            status_icon: status_icon(item.status),
            title: item.title.clone(),
            title_html: escape_html(&item.title),
        }
    }

    /// `<li>` markup with the row id and type in data attributes and the three
    /// action buttons.
    pub fn to_html(&self) -> String {
        let class = if self.status.is_completed() {
            "record-item completed"
        } else {
            "record-item"
        };
        format!(
            concat!(
                "<li class=\"{class}\" data-id=\"{id}\" data-type=\"{kind}\">",
                "<span class=\"record-type\">{kind_icon}</span>",
                "<span class=\"record-content\">{title}</span>",
                "<div class=\"record-actions\">",
                "<button class=\"toggle-status\">{status_icon}</button>",
                "<button class=\"toggle-type\">{toggle}</button>",
                "<button class=\"delete\">{delete}</button>",
                "</div></li>"
            ),
            class = class,
            id = escape_html(&self.id),
            kind = escape_html(self.kind.label()),
            kind_icon = self.kind_icon,
            title = self.title_html,
            status_icon = self.status_icon,
            toggle = TOGGLE_TYPE_ICON,
            delete = DELETE_ICON,
        )
    }
}

pub fn render_rows(items: &[Item]) -> Vec<ItemRow> {
    items.iter().map(ItemRow::from_item).collect()
}

pub fn render_list_html(rows: &[ItemRow]) -> String {
    rows.iter().map(ItemRow::to_html).collect()
}

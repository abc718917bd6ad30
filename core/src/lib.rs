//! Core of the quick-capture notes widget.
//!
//! # Overview
//! Notes and to-dos live as pages in a single Notion data source. This crate
//! builds and parses the four HTTP calls the widget needs (create, query,
//! update, archive) and drives the widget's list through an injected `View`.
//!
//! # Design
//! - `NotionClient` is stateless: each operation is split into `build_*`
//!   (produces request) and `parse_*` (consumes response).
//! - The host executes requests through a `Transport`, so the crate itself
//!   does no I/O and tests can swap in a recording fake.
//! - `ViewController` re-fetches the whole list after every mutation.
//! - `Settings` are loaded once and passed in explicitly; they are written
//!   back only when the user saves the settings form.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod render;
pub mod settings;
pub mod types;
pub mod view;

pub use client::{NotionClient, DEFAULT_API_BASE, NOTION_VERSION};
pub use controller::{ControllerState, RowAction, ViewController};
pub use error::{ApiError, SettingsError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use render::{escape_html, ItemRow};
pub use settings::{KeyValueStore, MemoryStore, Settings};
pub use types::{Item, ItemFields, ItemKind, ItemStatus, Page, QueryResults};
pub use view::{PinCapability, View};

//! The widget's view controller.
//!
//! # Design
//! The controller owns the list state and turns user intents into client
//! round trips. It is either `Unconfigured` (settings form forced open, no
//! requests at all) or `Ready` (a `NotionClient` exists).
//!
//! Every successful mutation is followed by a full, blocking refresh instead
//! of patching the local list, so the rendered list always equals the last
//! server response.
//!
//! Failures never escape an operation. A failed refresh replaces the list
//! with an error message and a failed create raises an alert. A failed
//! status/type toggle or delete is only logged.

use crate::client::NotionClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::render::render_rows;
use crate::settings::{KeyValueStore, Settings};
use crate::types::{Item, ItemFields, ItemKind, Page};
use crate::view::{
    record_count_label, PinCapability, View, ADD_FAILED_PREFIX, DELETE_CONFIRM_MESSAGE,
    LOAD_FAILED_MESSAGE,
};

/// Prefix of the alert raised when settings cannot be persisted.
pub const SAVE_SETTINGS_FAILED_PREFIX: &str = "保存设置失败: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Unconfigured,
    Ready,
}

/// Per-row buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    ToggleStatus,
    ToggleType,
    Delete,
}

pub struct ViewController<T, V> {
    api_base: String,
    settings: Settings,
    client: Option<NotionClient>,
    transport: T,
    view: V,
    pin: Option<Box<dyn PinCapability>>,
    items: Vec<Item>,
    pinned: bool,
}

impl<T: Transport, V: View> ViewController<T, V> {
    pub fn new(api_base: &str, settings: Settings, transport: T, view: V) -> Self {
        let client = settings
            .is_configured()
            .then(|| NotionClient::new(api_base, &settings));
        Self {
            api_base: api_base.to_string(),
            settings,
            client,
            transport,
            view,
            pin: None,
            items: Vec::new(),
            pinned: false,
        }
    }

    /// Attach the host's always-on-top capability.
    pub fn with_pin(mut self, pin: Box<dyn PinCapability>) -> Self {
        self.pin = Some(pin);
        self
    }

    pub fn state(&self) -> ControllerState {
        if self.client.is_some() {
            ControllerState::Ready
        } else {
            ControllerState::Unconfigured
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Initial check once the widget is up: load the list or ask for settings.
    pub fn start(&mut self) {
        self.view.fill_settings(&self.settings);
        match self.state() {
            ControllerState::Ready => self.refresh(),
            ControllerState::Unconfigured => {
                log::info!("no API key or data source configured, opening settings");
                self.open_settings();
            }
        }
    }

    pub fn open_settings(&mut self) {
        self.view.set_settings_open(true);
    }

    pub fn close_settings(&mut self) {
        self.view.set_settings_open(false);
    }

    /// Persist the form values and switch to them.
    ///
    /// A store failure is reported, but the new values still take effect for
    /// this session.
    pub fn save_settings(
        &mut self,
        api_key: &str,
        data_source_id: &str,
        store: &mut dyn KeyValueStore,
    ) {
        let settings = Settings::new(api_key, data_source_id);
        if let Err(err) = settings.save(store) {
            log::error!("failed to persist settings: {err}");
            self.view.alert(&format!("{SAVE_SETTINGS_FAILED_PREFIX}{err}"));
        }

        self.client = settings
            .is_configured()
            .then(|| NotionClient::new(&self.api_base, &settings));
        self.settings = settings;
        self.view.fill_settings(&self.settings);

        match self.state() {
            ControllerState::Ready => {
                log::info!("settings saved for data source {}", self.settings.data_source_id);
                self.close_settings();
                self.refresh();
            }
            ControllerState::Unconfigured => {
                log::warn!("settings saved but incomplete, staying unconfigured");
                self.open_settings();
            }
        }
    }

    /// Fetch the whole list, replace the list state and re-render.
    pub fn refresh(&mut self) {
        if self.client.is_none() {
            log::debug!("refresh skipped: not configured");
            return;
        }

        self.view.set_loading(true);
        self.view.clear_list();

        match self.round_trip(|c| Ok(c.build_list_items()), NotionClient::parse_list_items) {
            Ok(pages) => {
                self.items = pages.iter().map(Page::to_item).collect();
                log::debug!("loaded {} records", self.items.len());
                let rows = render_rows(&self.items);
                self.view.render_rows(&rows);
                self.view.set_record_count(&record_count_label(self.items.len()));
            }
            Err(err) => {
                log::error!("failed to load records: {err}");
                self.view.show_list_error(LOAD_FAILED_MESSAGE);
            }
        }

        self.view.set_loading(false);
    }

    /// Capture a new item. Whitespace-only text is ignored.
    pub fn add_item(&mut self, text: &str, kind: ItemKind) {
        let title = text.trim();
        if title.is_empty() {
            return;
        }
        if self.client.is_none() {
            log::warn!("cannot add item: not configured");
            self.open_settings();
            return;
        }

        let fields = ItemFields::new_item(title, kind);
        match self.round_trip(|c| c.build_create_item(&fields), NotionClient::parse_create_item) {
            Ok(page) => {
                log::info!("created record {}", page.id);
                self.view.clear_input();
                self.refresh();
            }
            Err(err) => {
                log::error!("failed to add record: {err}");
                self.view.alert(&format!("{ADD_FAILED_PREFIX}{err}"));
            }
        }
    }

    pub fn toggle_status(&mut self, item: &Item) {
        let fields = ItemFields::status(item.status.toggled());
        match self.round_trip(
            |c| c.build_update_item(&item.id, &fields),
            NotionClient::parse_update_item,
        ) {
            Ok(_) => self.refresh(),
            Err(err) => log::error!("failed to update status of {}: {err}", item.id),
        }
    }

    pub fn toggle_type(&mut self, item: &Item) {
        let fields = ItemFields::kind(item.kind.toggled());
        match self.round_trip(
            |c| c.build_update_item(&item.id, &fields),
            NotionClient::parse_update_item,
        ) {
            Ok(_) => self.refresh(),
            Err(err) => log::error!("failed to update type of {}: {err}", item.id),
        }
    }

    /// Archive after the user confirms. Declining sends nothing.
    pub fn delete_item(&mut self, item: &Item) {
        if !self.view.confirm(DELETE_CONFIRM_MESSAGE) {
            return;
        }
        match self.round_trip(
            |c| c.build_archive_item(&item.id),
            NotionClient::parse_archive_item,
        ) {
            Ok(_) => {
                log::info!("archived record {}", item.id);
                self.refresh();
            }
            Err(err) => log::error!("failed to delete record {}: {err}", item.id),
        }
    }

    /// Route a row button press. The row is identified by its item id.
    pub fn dispatch(&mut self, action: RowAction, id: &str) {
        let Some(item) = self.items.iter().find(|item| item.id == id).cloned() else {
            log::warn!("ignoring {action:?} for unknown record {id}");
            return;
        };
        match action {
            RowAction::ToggleStatus => self.toggle_status(&item),
            RowAction::ToggleType => self.toggle_type(&item),
            RowAction::Delete => self.delete_item(&item),
        }
    }

    /// Flip the pin control and forward it to the host, if it can pin.
    pub fn toggle_pin(&mut self) {
        self.pinned = !self.pinned;
        self.view.set_pinned(self.pinned);
        match self.pin.as_mut() {
            Some(pin) => pin.set_always_on_top(self.pinned),
            None => log::debug!("host has no always-on-top support"),
        }
    }

    fn round_trip<R>(
        &self,
        build: impl FnOnce(&NotionClient) -> Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&NotionClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let client = self.client.as_ref().ok_or(ApiError::NotConfigured)?;
        let request = build(client)?;
        log::debug!("{} {}", request.method.as_str(), request.path);
        let response = self.transport.execute(request)?;
        parse(client, response)
    }
}

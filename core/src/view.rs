//! Capabilities the controller needs from whatever draws the widget.
//!
//! The host injects an implementation at construction time, so the
//! controller never looks up UI elements itself.

use crate::render::ItemRow;
use crate::settings::Settings;

/// Shown in place of the list when a refresh fails.
pub const LOAD_FAILED_MESSAGE: &str = "加载失败，请检查配置";
/// Prefix of the alert raised when creating an item fails.
pub const ADD_FAILED_PREFIX: &str = "添加失败: ";
/// Asked before an item is archived.
pub const DELETE_CONFIRM_MESSAGE: &str = "确定要删除这条记录吗？";

/// Label of the record counter, e.g. `3 条记录`.
pub fn record_count_label(count: usize) -> String {
    format!("{count} 条记录")
}

/// The widget surface as seen by the controller.
pub trait View {
    fn set_loading(&mut self, visible: bool);

    /// Empty the list area.
    fn clear_list(&mut self);

    /// Replace the list area with these rows.
    fn render_rows(&mut self, rows: &[ItemRow]);

    /// Replace the list area with an error message.
    fn show_list_error(&mut self, message: &str);

    fn set_record_count(&mut self, label: &str);

    /// Fill the settings form fields.
    fn fill_settings(&mut self, settings: &Settings);

    fn set_settings_open(&mut self, open: bool);

    fn clear_input(&mut self);

    fn set_pinned(&mut self, pinned: bool);

    /// Blocking notification.
    fn alert(&mut self, message: &str);

    /// Blocking yes/no question.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Optional host capability that keeps the widget window above others.
pub trait PinCapability {
    fn set_always_on_top(&mut self, on_top: bool);
}

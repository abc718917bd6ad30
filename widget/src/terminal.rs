//! Line-oriented terminal rendition of the widget.
//!
//! Rows are numbered on screen; the number maps back to the row's item id,
//! which is what the controller dispatches on.

use std::io::{BufRead, Write};

use quicknote_core::{ItemRow, Settings, View};

/// Replace control characters so remote titles cannot drive the terminal.
pub fn sanitize_for_terminal(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_control() { '\u{FFFD}' } else { ch })
        .collect()
}

pub struct TerminalView<R, W> {
    input: R,
    output: W,
    rows: Vec<ItemRow>,
    settings: Settings,
    settings_open: bool,
}

impl<R: BufRead, W: Write> TerminalView<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            rows: Vec::new(),
            settings: Settings::default(),
            settings_open: false,
        }
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    /// Values currently shown in the settings form.
    pub fn form_settings(&self) -> &Settings {
        &self.settings
    }

    /// Item id of the 1-based row number shown on screen.
    pub fn row_id(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .map(|row| row.id.as_str())
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Prompt and read one line without its terminator. `None` on end of input.
    ///
    /// Invalid UTF-8 is replaced rather than rejected, so one bad line does
    /// not end the session.
    pub fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.write(prompt);
        let _ = self.output.flush();
        let mut line = Vec::new();
        match self.input.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                Some(text.trim_end_matches(['\r', '\n']).to_string())
            }
            Err(err) => {
                log::error!("failed to read input: {err}");
                None
            }
        }
    }

    pub fn println(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    fn write(&mut self, text: &str) {
        if let Err(err) = self.output.write_all(text.as_bytes()) {
            log::error!("failed to write to terminal: {err}");
        }
    }
}

impl<R: BufRead, W: Write> View for TerminalView<R, W> {
    fn set_loading(&mut self, visible: bool) {
        if visible {
            self.println("加载中...");
        }
    }

    fn clear_list(&mut self) {
        self.rows.clear();
    }

    fn render_rows(&mut self, rows: &[ItemRow]) {
        self.rows = rows.to_vec();
        for (index, row) in rows.iter().enumerate() {
            let line = format!(
                "{:>3}. {} {} {}",
                index + 1,
                row.status_icon,
                row.kind_icon,
                sanitize_for_terminal(&row.title)
            );
            self.println(&line);
        }
    }

    fn show_list_error(&mut self, message: &str) {
        self.rows.clear();
        self.println(message);
    }

    fn set_record_count(&mut self, label: &str) {
        self.println(&format!("-- {label} --"));
    }

    fn fill_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
    }

    fn set_settings_open(&mut self, open: bool) {
        self.settings_open = open;
    }

    // The input line is consumed on submit.
    fn clear_input(&mut self) {}

    fn set_pinned(&mut self, pinned: bool) {
        self.println(if pinned { "📌 已置顶" } else { "📌 已取消置顶" });
    }

    fn alert(&mut self, message: &str) {
        self.println(&format!("! {message}"));
    }

    fn confirm(&mut self, message: &str) -> bool {
        let answer = self.read_line(&format!("{message} [y/N] "));
        matches!(
            answer.as_deref().map(str::trim),
            Some("y") | Some("Y") | Some("yes")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quicknote_core::{Item, ItemKind, ItemStatus};
    use std::io::Cursor;

    fn view(input: &str) -> TerminalView<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalView::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn printed(view: &TerminalView<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(view.output().clone()).unwrap()
    }

    fn row(id: &str, title: &str) -> ItemRow {
        ItemRow::from_item(&Item {
            id: id.to_string(),
            title: title.to_string(),
            kind: ItemKind::Todo,
            status: ItemStatus::InProgress,
        })
    }

    #[test]
    fn rows_are_numbered_from_one() {
        let mut v = view("");
        v.render_rows(&[row("a", "first"), row("b", "second")]);
        assert_eq!(v.row_id(1), Some("a"));
        assert_eq!(v.row_id(2), Some("b"));
        assert_eq!(v.row_id(0), None);
        assert_eq!(v.row_id(3), None);
        assert!(printed(&v).contains("  1. ⬜ 📋 first"));
    }

    #[test]
    fn control_characters_are_neutralized() {
        assert_eq!(sanitize_for_terminal("a\u{1b}[31mb"), "a\u{FFFD}[31mb");
        let mut v = view("");
        v.render_rows(&[row("a", "\u{1b}[2Jgone")]);
        assert!(!printed(&v).contains('\u{1b}'));
    }

    #[test]
    fn invalid_utf8_line_is_replaced_not_fatal() {
        let mut v = TerminalView::new(Cursor::new(b"caf\xe9\r\nnext\n".to_vec()), Vec::new());
        assert_eq!(v.read_line("> ").as_deref(), Some("caf\u{FFFD}"));
        assert_eq!(v.read_line("> ").as_deref(), Some("next"));
        assert_eq!(v.read_line("> "), None);
    }

    #[test]
    fn confirm_defaults_to_no() {
        let mut v = view("\ny\nnope\n");
        assert!(!v.confirm("sure?"));
        assert!(v.confirm("sure?"));
        assert!(!v.confirm("sure?"));
        assert!(!v.confirm("sure?"));
    }

    #[test]
    fn list_error_forgets_rows() {
        let mut v = view("");
        v.render_rows(&[row("a", "first")]);
        v.show_list_error("加载失败，请检查配置");
        assert_eq!(v.row_id(1), None);
        assert!(printed(&v).ends_with("加载失败，请检查配置\n"));
    }
}

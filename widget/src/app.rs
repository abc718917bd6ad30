//! The widget's input loop.
//!
//! Plain text is captured as a new item of the selected type, like typing into
//! the quick-input box and pressing Enter. Lines starting with `:` are
//! commands standing in for the widget's buttons.

use std::io::{BufRead, Write};

use quicknote_core::{ItemKind, KeyValueStore, RowAction, Transport, ViewController};

use crate::terminal::TerminalView;

pub const HELP: &str = "\
text      capture text as an item of the selected type
:k        switch the type selector (待办 / 闪念)
:s N      toggle status of row N
:y N      toggle type of row N
:d N      delete row N
:r        refresh
:p        pin / unpin
:c        settings
:h        help
:q        quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Capture(String),
    SwitchKind,
    Row(RowAction, usize),
    Refresh,
    Pin,
    Settings,
    Help,
    Quit,
}

impl Command {
    /// `None` for blank lines and malformed commands.
    pub fn parse(line: &str) -> Option<Command> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let Some(command) = trimmed.strip_prefix(':') else {
            return Some(Command::Capture(trimmed.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next()?;
        let row = parts.next().and_then(|n| n.parse::<usize>().ok());
        match (name, row) {
            ("k", None) => Some(Command::SwitchKind),
            ("s", Some(n)) => Some(Command::Row(RowAction::ToggleStatus, n)),
            ("y", Some(n)) => Some(Command::Row(RowAction::ToggleType, n)),
            ("d", Some(n)) => Some(Command::Row(RowAction::Delete, n)),
            ("r", None) => Some(Command::Refresh),
            ("p", None) => Some(Command::Pin),
            ("c", None) => Some(Command::Settings),
            ("h", None) => Some(Command::Help),
            ("q", None) => Some(Command::Quit),
            _ => None,
        }
    }
}

pub type TerminalController<T, R, W> = ViewController<T, TerminalView<R, W>>;

/// Run until `:q` or end of input.
pub fn run<T, R, W>(controller: &mut TerminalController<T, R, W>, store: &mut dyn KeyValueStore)
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    let mut selected = ItemKind::Todo;
    controller.start();

    loop {
        if controller.view().settings_open() {
            if !settings_form(controller, store) {
                break;
            }
            continue;
        }

        let prompt = format!("[{}] > ", selected.label());
        let Some(line) = controller.view_mut().read_line(&prompt) else {
            break;
        };
        let Some(command) = Command::parse(&line) else {
            if !line.trim().is_empty() {
                controller.view_mut().println(HELP);
            }
            continue;
        };

        match command {
            Command::Capture(text) => controller.add_item(&text, selected),
            Command::SwitchKind => selected = selected.toggled(),
            Command::Row(action, number) => {
                let Some(id) = controller.view().row_id(number).map(str::to_string) else {
                    controller.view_mut().println(&format!("no row {number}"));
                    continue;
                };
                controller.dispatch(action, &id);
            }
            Command::Refresh => controller.refresh(),
            Command::Pin => controller.toggle_pin(),
            Command::Settings => controller.open_settings(),
            Command::Help => controller.view_mut().println(HELP),
            Command::Quit => break,
        }
    }
}

/// One pass over the settings form. Returns `false` when input ends.
///
/// Blank answers keep the current value; `:q` closes the form unsaved.
fn settings_form<T, R, W>(
    controller: &mut TerminalController<T, R, W>,
    store: &mut dyn KeyValueStore,
) -> bool
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    let current = controller.view().form_settings().clone();
    let view = controller.view_mut();
    view.println("设置 (Enter keeps the current value, :q closes)");

    let key_prompt = if current.api_key.is_empty() {
        "Notion API key: ".to_string()
    } else {
        "Notion API key [saved]: ".to_string()
    };
    let Some(api_key) = view.read_line(&key_prompt) else {
        return false;
    };
    if api_key.trim() == ":q" {
        controller.close_settings();
        return true;
    }

    let id_prompt = format!("Data source id [{}]: ", current.data_source_id);
    let Some(data_source_id) = view.read_line(&id_prompt) else {
        return false;
    };
    if data_source_id.trim() == ":q" {
        controller.close_settings();
        return true;
    }

    let api_key = keep_if_blank(api_key, &current.api_key);
    let data_source_id = keep_if_blank(data_source_id, &current.data_source_id);
    controller.save_settings(&api_key, &data_source_id, store);
    true
}

fn keep_if_blank(answer: String, current: &str) -> String {
    if answer.trim().is_empty() {
        current.to_string()
    } else {
        answer
    }
}

//! Keyboard input handling.
//!
//! Maps terminal key events to [`Command`]s.  Adding a new keybinding is a
//! single match arm in [`command_for`] (or [`search_command_for`] while the
//! search box has focus).
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a [`Command`] variant and handle it in [`App::dispatch`].
//! 2. Add a `KeyCode` match arm below that produces it.
//! 3. Update the help text in [`crate::ui`]'s status bar.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Command};
use crate::section::Section;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    let command = if app.search_input.is_some() {
        search_command_for(key)
    } else {
        command_for(key, app.section())
    };
    if let Some(command) = command {
        app.dispatch(command, Instant::now());
    }
}

/// Bindings while typing a search query.
fn search_command_for(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Enter => Some(Command::EndSearch),
        KeyCode::Esc => Some(Command::ClearSearch),
        KeyCode::Backspace => Some(Command::SearchBackspace),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char(c) => Some(Command::SearchInput(c)),
        _ => None,
    }
}

/// Bindings in normal mode.
fn command_for(key: KeyEvent, section: &Section) -> Option<Command> {
    let in_detail = *section == Section::BlogDetail;

    let command = match key.code {
        KeyCode::Char('q') => Command::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Esc | KeyCode::Char('b') if in_detail => Command::Back,
        KeyCode::Esc => Command::Quit,
        KeyCode::Char('1') => Command::Activate(Section::Home),
        KeyCode::Char('2') => Command::Activate(Section::SourceCodes),
        KeyCode::Char('3') => Command::Activate(Section::Blog),
        KeyCode::Char('4') => Command::Activate(Section::Favorites),
        KeyCode::Tab => Command::NextSection,
        KeyCode::BackTab => Command::PreviousSection,
        KeyCode::Down | KeyCode::Char('j') => Command::SelectNext,
        KeyCode::Up | KeyCode::Char('k') => Command::SelectPrevious,
        KeyCode::Home | KeyCode::Char('g') => Command::SelectFirst,
        KeyCode::End | KeyCode::Char('G') => Command::SelectLast,
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => Command::NextPage,
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => Command::PreviousPage,
        KeyCode::Char('L') => Command::LastPage,
        KeyCode::Char('H') => Command::FirstPage,
        KeyCode::Char('c') => Command::NextCategory,
        KeyCode::Char('C') => Command::PreviousCategory,
        KeyCode::Char('/') => Command::BeginSearch,
        KeyCode::Char('x') => Command::ClearSearch,
        KeyCode::Char('f') => Command::ToggleFavorite,
        KeyCode::Enter => Command::OpenSelected,
        _ => return None,
    };
    Some(command)
}

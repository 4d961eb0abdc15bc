//! Keyboard event handling.
//!
//! Track panel:
//! - `+` or `=`: zoom in
//! - `-`: zoom out
//! - `h` or `Left`: pan left
//! - `l` or `Right`: pan right
//! - `0` or `r`: show the whole genome
//! - `:` or `g`: goto prompt (a position or an annotation name)
//!
//! Catalog panel (`Tab` switches focus):
//! - `j`/`k` or `Down`/`Up`: move within a column
//! - `h`/`l` or `Left`/`Right`: switch column
//! - `Enter`: open the annotation (sequence view, window centered on it)
//!
//! Anywhere:
//! - `Esc`: back to the track view, clears the notice
//! - `q` or `Ctrl+C`: quit

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use crate::session::{Focus, InputMode, Session};

/// Actions that can be triggered by keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (key not recognized)
    None,
    /// Quit the application
    Quit,
    ZoomIn,
    ZoomOut,
    PanLeft,
    PanRight,
    /// Show the whole genome
    ResetView,
    /// Open the goto prompt
    EnterGotoMode,
    /// Add character to the goto query
    GotoChar(char),
    /// Run the goto query
    ExecuteGoto,
    /// Close the goto prompt
    CancelGoto,
    /// Backspace in the goto prompt
    GotoBackspace,
    /// Switch focus between tracks and catalog
    ToggleFocus,
    CatalogUp,
    CatalogDown,
    CatalogNextColumn,
    CatalogPreviousColumn,
    /// Open the catalog entry under the cursor
    SelectEntry,
    /// Back to the track view
    Back,
    /// Resize event (terminal resized)
    Resize(u16, u16),
}

/// Polls for keyboard events with a timeout.
///
/// Returns `None` if no event occurred within the timeout.
pub fn poll_event(timeout: Duration) -> Option<Event> {
    if event::poll(timeout).ok()? {
        event::read().ok()
    } else {
        None
    }
}

/// Converts a crossterm event to an Action based on the current input state.
pub fn handle_event(event: Event, mode: &InputMode, focus: Focus) -> Action {
    match event {
        Event::Key(key_event) => handle_key_event(key_event, mode, focus),
        Event::Resize(width, height) => Action::Resize(width, height),
        _ => Action::None,
    }
}

fn handle_key_event(key: KeyEvent, mode: &InputMode, focus: Focus) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match mode {
        InputMode::Goto(_) => handle_goto_mode(key),
        InputMode::Normal => match focus {
            Focus::Tracks => handle_tracks(key),
            Focus::Catalog => handle_catalog(key),
        },
    }
}

/// Keys shared by both panels.
fn handle_common(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('+') | KeyCode::Char('=') => Action::ZoomIn,
        KeyCode::Char('-') => Action::ZoomOut,
        KeyCode::Char('0') | KeyCode::Char('r') => Action::ResetView,
        KeyCode::Char(':') | KeyCode::Char('g') => Action::EnterGotoMode,
        KeyCode::Tab => Action::ToggleFocus,
        KeyCode::Esc => Action::Back,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

fn handle_tracks(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Action::PanLeft,
        KeyCode::Char('l') | KeyCode::Right => Action::PanRight,
        _ => handle_common(key),
    }
}

fn handle_catalog(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Action::CatalogDown,
        KeyCode::Char('k') | KeyCode::Up => Action::CatalogUp,
        KeyCode::Char('h') | KeyCode::Left => Action::CatalogPreviousColumn,
        KeyCode::Char('l') | KeyCode::Right => Action::CatalogNextColumn,
        KeyCode::Enter => Action::SelectEntry,
        _ => handle_common(key),
    }
}

fn handle_goto_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::ExecuteGoto,
        KeyCode::Esc => Action::CancelGoto,
        KeyCode::Backspace => Action::GotoBackspace,
        KeyCode::Char(c) => Action::GotoChar(c),
        _ => Action::None,
    }
}

/// Applies an action to the session.
///
/// Returns `true` if the application should continue, `false` if it should quit.
pub fn apply_action(session: &mut Session, action: Action) -> bool {
    match action {
        Action::None => {}
        Action::Quit => session.quit(),
        Action::ZoomIn => session.zoom_in(),
        Action::ZoomOut => session.zoom_out(),
        Action::PanLeft => session.pan_left(),
        Action::PanRight => session.pan_right(),
        Action::ResetView => session.reset_view(),
        Action::EnterGotoMode => session.enter_goto_mode(),
        Action::GotoChar(c) => session.goto_input(c),
        Action::ExecuteGoto => session.execute_goto(),
        Action::CancelGoto => session.cancel_goto(),
        Action::GotoBackspace => session.goto_backspace(),
        Action::ToggleFocus => session.toggle_focus(),
        Action::CatalogUp => session.catalog_up(),
        Action::CatalogDown => session.catalog_down(),
        Action::CatalogNextColumn => session.catalog_next_column(),
        Action::CatalogPreviousColumn => session.catalog_previous_column(),
        Action::SelectEntry => session.select_catalog_entry(),
        Action::Back => {
            session.show_tracks();
            session.dismiss_notice();
        }
        Action::Resize(_, _) => {
            // Canvas width is recomputed from the terminal in the main loop
        }
    }

    !session.should_quit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::provider::GenomeInfo;
    use crate::session::DisplayContext;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_track_navigation() {
        let mode = InputMode::Normal;
        let focus = Focus::Tracks;

        assert_eq!(handle_key_event(key(KeyCode::Char('+')), &mode, focus), Action::ZoomIn);
        assert_eq!(handle_key_event(key(KeyCode::Char('=')), &mode, focus), Action::ZoomIn);
        assert_eq!(handle_key_event(key(KeyCode::Char('-')), &mode, focus), Action::ZoomOut);
        assert_eq!(handle_key_event(key(KeyCode::Char('h')), &mode, focus), Action::PanLeft);
        assert_eq!(handle_key_event(key(KeyCode::Right), &mode, focus), Action::PanRight);
        assert_eq!(handle_key_event(key(KeyCode::Char('0')), &mode, focus), Action::ResetView);
    }

    #[test]
    fn test_catalog_navigation() {
        let mode = InputMode::Normal;
        let focus = Focus::Catalog;

        assert_eq!(handle_key_event(key(KeyCode::Char('j')), &mode, focus), Action::CatalogDown);
        assert_eq!(handle_key_event(key(KeyCode::Up), &mode, focus), Action::CatalogUp);
        assert_eq!(
            handle_key_event(key(KeyCode::Char('h')), &mode, focus),
            Action::CatalogPreviousColumn
        );
        assert_eq!(handle_key_event(key(KeyCode::Enter), &mode, focus), Action::SelectEntry);
        // Zoom still works from the catalog
        assert_eq!(handle_key_event(key(KeyCode::Char('-')), &mode, focus), Action::ZoomOut);
    }

    #[test]
    fn test_goto_mode_input() {
        let mode = InputMode::Goto(String::new());
        let focus = Focus::Tracks;

        // 'q' is text here, not quit
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), &mode, focus), Action::GotoChar('q'));
        assert_eq!(handle_key_event(key(KeyCode::Enter), &mode, focus), Action::ExecuteGoto);
        assert_eq!(handle_key_event(key(KeyCode::Esc), &mode, focus), Action::CancelGoto);
        assert_eq!(handle_key_event(key(KeyCode::Backspace), &mode, focus), Action::GotoBackspace);
    }

    #[test]
    fn test_ctrl_c_quit() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c, &InputMode::Normal, Focus::Tracks), Action::Quit);
        assert_eq!(
            handle_key_event(ctrl_c, &InputMode::Goto("ab".into()), Focus::Catalog),
            Action::Quit
        );
    }

    #[test]
    fn test_resize_event() {
        let action = handle_event(Event::Resize(120, 40), &InputMode::Normal, Focus::Tracks);
        assert_eq!(action, Action::Resize(120, 40));
    }

    #[test]
    fn test_apply_goto_sequence() {
        let mut session = Session::new(Config::default());
        session.activate_genome(GenomeInfo {
            id: "chr".into(),
            length: 100_000,
            has_annotations: false,
        });

        apply_action(&mut session, Action::EnterGotoMode);
        for c in "60000".chars() {
            apply_action(&mut session, Action::GotoChar(c));
        }
        apply_action(&mut session, Action::ExecuteGoto);

        assert_eq!(session.mode(), &InputMode::Normal);
        assert_eq!(session.window().start(), 10_000);
        assert_eq!(session.window().end(), 100_000);
    }

    #[test]
    fn test_apply_back_and_quit() {
        let mut session = Session::new(Config::default());
        session.goto_query("lacZ");
        assert!(session.notice().is_some());

        assert!(apply_action(&mut session, Action::Back));
        assert!(session.notice().is_none());
        assert_eq!(session.display(), DisplayContext::Tracks);

        assert!(!apply_action(&mut session, Action::Quit));
    }
}

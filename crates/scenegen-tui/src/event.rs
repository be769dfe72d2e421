//! Terminal event handling. Captures keyboard, paste, and resize events
//! from crossterm and dispatches them as Actions.
//!
//! The handler operates in two modes:
//! - Normal: keys are mapped to global shortcuts (quit, navigate, expand).
//! - Editing: keys are forwarded as raw CharInput/BackspaceInput so the
//!   compose form can receive typed characters.
//!
//! The current InputMode is shared between the App and EventHandler via
//! an Arc<AtomicU8>.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::action::{Action, InputMode, Screen};

/// Encode InputMode as u8 for atomic sharing.
const MODE_NORMAL: u8 = 0;
const MODE_EDITING: u8 = 1;

/// Shared flag the App sets so the EventHandler knows which keymap to use.
pub type InputModeFlag = Arc<AtomicU8>;

pub fn new_input_mode_flag() -> InputModeFlag {
    Arc::new(AtomicU8::new(MODE_NORMAL))
}

pub fn set_input_mode(flag: &InputModeFlag, mode: InputMode) {
    let val = match mode {
        InputMode::Normal => MODE_NORMAL,
        InputMode::Editing => MODE_EDITING,
    };
    flag.store(val, Ordering::Relaxed);
}

fn get_input_mode(flag: &InputModeFlag) -> InputMode {
    match flag.load(Ordering::Relaxed) {
        MODE_EDITING => InputMode::Editing,
        _ => InputMode::Normal,
    }
}

/// Event loop that reads terminal events and sends Actions.
pub struct EventHandler {
    tx: mpsc::UnboundedSender<Action>,
    tick_rate: Duration,
    mode_flag: InputModeFlag,
}

impl EventHandler {
    pub fn new(
        tx: mpsc::UnboundedSender<Action>,
        tick_rate: Duration,
        mode_flag: InputModeFlag,
    ) -> Self {
        Self {
            tx,
            tick_rate,
            mode_flag,
        }
    }

    /// Run the event loop. This blocks and should be spawned in a task.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.tick_rate);

        loop {
            let action = tokio::select! {
                _ = interval.tick() => {
                    Some(Action::Tick)
                }
                result = tokio::task::spawn_blocking({
                    || {
                        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                            event::read().ok()
                        } else {
                            None
                        }
                    }
                }) => {
                    match result {
                        Ok(Some(event)) => self.map_event(event),
                        _ => None,
                    }
                }
            };

            if let Some(action) = action {
                if self.tx.send(action).is_err() {
                    break;
                }
            }
        }
    }

    fn map_event(&self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.map_key(key),
            Event::Paste(text) => Some(Action::PasteBulk(text)),
            Event::Resize(_, _) => Some(Action::Tick),
            _ => None,
        }
    }

    fn map_key(&self, key: KeyEvent) -> Option<Action> {
        map_key(key, get_input_mode(&self.mode_flag))
    }
}

/// Translate a key press under the given mode.
pub fn map_key(key: KeyEvent, mode: InputMode) -> Option<Action> {
    // Ctrl+C always quits regardless of mode.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        InputMode::Editing => map_key_editing(key),
        InputMode::Normal => map_key_normal(key),
    }
}

/// Key mapping when the form is focused. Most keys become character
/// input; only a few are reserved for navigation.
fn map_key_editing(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('w') => Some(Action::DeleteWord),
            KeyCode::Char('s') => Some(Action::SubmitForm),
            KeyCode::Char('t') => Some(Action::ToggleHashtagMode),
            KeyCode::Enter => Some(Action::SubmitForm),
            _ => None,
        };
    }

    // Alt+Enter also submits (some terminals send this instead of Ctrl+Enter).
    if key.modifiers.contains(KeyModifiers::ALT) && key.code == KeyCode::Enter {
        return Some(Action::SubmitForm);
    }

    match key.code {
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::SwitchInputField),
        KeyCode::Enter => Some(Action::NewlineInput),
        KeyCode::Up => Some(Action::ScrollUp),
        KeyCode::Down => Some(Action::ScrollDown),
        KeyCode::Backspace => Some(Action::BackspaceInput),
        KeyCode::Char(c) => Some(Action::CharInput(c)),
        _ => None,
    }
}

/// Key mapping in normal mode: global shortcuts.
fn map_key_normal(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Right | KeyCode::Tab => Some(Action::NextScreen),
        KeyCode::Left | KeyCode::BackTab => Some(Action::PrevScreen),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
        KeyCode::PageUp => Some(Action::ScrollDetailUp),
        KeyCode::PageDown => Some(Action::ScrollDetailDown),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Char(' ') | KeyCode::Char('e') => Some(Action::ToggleExpand),
        KeyCode::Esc => Some(Action::Cancel),

        KeyCode::Char('1') => Some(Action::GoToScreen(Screen::Compose)),
        KeyCode::Char('2') => Some(Action::GoToScreen(Screen::Scenarios)),
        KeyCode::Char('3') => Some(Action::GoToScreen(Screen::Trends)),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn ctrl_c_quits_in_both_modes() {
        assert!(matches!(map_key(ctrl('c'), InputMode::Normal), Some(Action::Quit)));
        assert!(matches!(map_key(ctrl('c'), InputMode::Editing), Some(Action::Quit)));
    }

    #[test]
    fn q_is_text_while_editing() {
        assert!(matches!(
            map_key(key(KeyCode::Char('q')), InputMode::Editing),
            Some(Action::CharInput('q'))
        ));
        assert!(matches!(
            map_key(key(KeyCode::Char('q')), InputMode::Normal),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn form_shortcuts() {
        assert!(matches!(map_key(ctrl('s'), InputMode::Editing), Some(Action::SubmitForm)));
        assert!(matches!(
            map_key(ctrl('t'), InputMode::Editing),
            Some(Action::ToggleHashtagMode)
        ));
        assert!(matches!(
            map_key(key(KeyCode::Esc), InputMode::Editing),
            Some(Action::Cancel)
        ));
    }

    #[test]
    fn space_toggles_card_expansion() {
        assert!(matches!(
            map_key(key(KeyCode::Char(' ')), InputMode::Normal),
            Some(Action::ToggleExpand)
        ));
    }

    #[test]
    fn digits_jump_to_screens() {
        assert!(matches!(
            map_key(key(KeyCode::Char('3')), InputMode::Normal),
            Some(Action::GoToScreen(Screen::Trends))
        ));
    }
}

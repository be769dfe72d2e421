//! Action enum, the central message bus for the TUI.
//! All user interactions and async results flow through here.

use scenegen_core::request::SubmissionRequest;
use scenegen_core::scenario::GenerateResponse;
use scenegen_core::view::RequestTicket;

/// Every possible action that can occur in the application.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ──────────────────────────────────────────
    /// Switch to a specific screen tab.
    GoToScreen(Screen),
    /// Move to the next screen.
    NextScreen,
    /// Move to the previous screen.
    PrevScreen,

    // ── Global ──────────────────────────────────────────────
    /// Quit the application.
    Quit,
    /// Toggle help overlay.
    ToggleHelp,
    /// Display a status message in the status bar.
    SetStatus(String),
    /// Clear the status message.
    ClearStatus,
    /// A tick event for animations.
    Tick,
    /// Esc: leave the text form / close overlays.
    Cancel,

    // ── Submission ──────────────────────────────────────────
    /// The form produced a request.
    Submit(SubmissionRequest),
    /// A spawned request finished, successfully or not.
    GenerationFinished {
        ticket: RequestTicket,
        outcome: Result<Box<GenerateResponse>, String>,
    },

    // ── Compose form ────────────────────────────────────────
    /// A character was typed (only sent when in input mode).
    CharInput(char),
    /// Backspace pressed (only sent when in input mode).
    BackspaceInput,
    /// Delete word (Ctrl+W).
    DeleteWord,
    /// Enter inside the form; the focused field decides what it means.
    NewlineInput,
    /// Switch focus between input fields (Tab in input mode).
    SwitchInputField,
    /// Switch the hashtag field between picker and free text (Ctrl+T).
    ToggleHashtagMode,
    /// Submit the form (Ctrl+S / Ctrl+Enter in editing mode).
    SubmitForm,
    /// Bulk paste from bracketed paste mode (terminal sends entire text at once).
    PasteBulk(String),

    // ── Scenarios ───────────────────────────────────────────
    /// Make a scenario the active one.
    SelectScenario(usize),
    /// Expand or collapse the hashtags of one card.
    ToggleHashtags(usize),
    /// Expand/collapse the highlighted card (Space / e).
    ToggleExpand,
    ScrollDetailUp,
    ScrollDetailDown,

    // ── Scrolling / Selection ───────────────────────────────
    ScrollUp,
    ScrollDown,
    Confirm,
}

/// Whether the app is in a text-input mode where raw keys should
/// be forwarded to the active component instead of interpreted as
/// global shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys are global shortcuts.
    Normal,
    /// Keys go to the focused text field.
    Editing,
}

/// The screens, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Compose,
    Scenarios,
    Trends,
}

impl Screen {
    pub fn all() -> &'static [Screen] {
        &[Screen::Compose, Screen::Scenarios, Screen::Trends]
    }

    /// Get the display label for the tab.
    pub fn label(&self) -> &'static str {
        match self {
            Screen::Compose => "1.Compose",
            Screen::Scenarios => "2.Scenarios",
            Screen::Trends => "3.Trends",
        }
    }

    pub fn next(&self) -> Option<Screen> {
        match self {
            Screen::Compose => Some(Screen::Scenarios),
            Screen::Scenarios => Some(Screen::Trends),
            Screen::Trends => None,
        }
    }

    pub fn prev(&self) -> Option<Screen> {
        match self {
            Screen::Compose => None,
            Screen::Scenarios => Some(Screen::Compose),
            Screen::Trends => Some(Screen::Scenarios),
        }
    }

    /// Numeric index (0-based).
    pub fn index(&self) -> usize {
        match self {
            Screen::Compose => 0,
            Screen::Scenarios => 1,
            Screen::Trends => 2,
        }
    }
}

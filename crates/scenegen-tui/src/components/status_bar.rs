//! Status bar at the bottom of the TUI.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use scenegen_core::view::ViewState;

use crate::action::{Action, Screen};
use crate::components::{truncate, Component};
use crate::theme::Theme;

pub struct StatusBarComponent {
    /// Current status message.
    pub message: String,
    /// Current screen.
    pub current_screen: Screen,
}

impl StatusBarComponent {
    pub fn new() -> Self {
        Self {
            message: "Enter keywords and hashtags, then press Ctrl+S.".to_string(),
            current_screen: Screen::Compose,
        }
    }

    /// Short screen name for the pill badge.
    fn screen_badge(&self) -> &'static str {
        match self.current_screen {
            Screen::Compose => "Compose",
            Screen::Scenarios => "Scenarios",
            Screen::Trends => "Trends",
        }
    }
}

impl Default for StatusBarComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for StatusBarComponent {
    fn handle_action(&mut self, action: &Action, _view: &ViewState) -> Option<Action> {
        match action {
            Action::SetStatus(msg) => {
                self.message = msg.clone();
                None
            }
            Action::ClearStatus => {
                self.message.clear();
                None
            }
            Action::GoToScreen(screen) => {
                self.current_screen = *screen;
                None
            }
            _ => None,
        }
    }

    fn render(&self, view: &ViewState, frame: &mut Frame, area: Rect) {
        let width = area.width as usize;

        let hints = "q·?·1-3";
        let hints_len = hints.chars().count() + 1;

        let badge = self.screen_badge();
        let badge_len = badge.len() + 2;

        let busy = if view.is_loading() { "● " } else { "" };

        let msg_budget = width
            .saturating_sub(badge_len)
            .saturating_sub(hints_len)
            .saturating_sub(4 + busy.chars().count());
        let msg = truncate(&self.message, msg_budget);

        // Pad to push hints to the right edge
        let used = badge_len + 2 + busy.chars().count() + msg.chars().count();
        let pad = width.saturating_sub(used + hints_len);

        let line = Line::from(vec![
            Span::styled(format!(" {} ", badge), Theme::muted()),
            Span::styled("  ", Theme::dim()),
            Span::styled(busy, Theme::key_hint()),
            Span::styled(msg, Theme::dim()),
            Span::raw(" ".repeat(pad)),
            Span::styled(hints, Theme::key_hint()),
            Span::raw(" "),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::render_to_text;

    #[test]
    fn shows_badge_message_and_hints() {
        let view = ViewState::default();
        let mut bar = StatusBarComponent::new();
        bar.handle_action(&Action::GoToScreen(Screen::Trends), &view);
        bar.handle_action(&Action::SetStatus("Generated 3 scenarios".into()), &view);

        let text = render_to_text(&bar, &view, 80, 1);
        assert!(text.contains("Trends"));
        assert!(text.contains("Generated 3 scenarios"));
        assert!(text.trim_end().ends_with("q·?·1-3"));
    }
}

//! Help overlay: keybinding reference.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use scenegen_core::view::ViewState;

use crate::action::Action;
use crate::components::Component;
use crate::theme::Theme;

pub struct HelpComponent {
    pub visible: bool,
}

impl HelpComponent {
    pub fn new() -> Self {
        Self { visible: false }
    }

    fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
        let vertical = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .flex(Flex::Center)
        .split(area);

        let horizontal = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .flex(Flex::Center)
        .split(vertical[1]);

        horizontal[1]
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for HelpComponent {
    fn handle_action(&mut self, action: &Action, _view: &ViewState) -> Option<Action> {
        match action {
            Action::ToggleHelp => {
                self.visible = !self.visible;
                None
            }
            Action::Tick | Action::GenerationFinished { .. } | Action::SetStatus(_) => None,
            _ if self.visible => {
                // Any key closes help.
                self.visible = false;
                None
            }
            _ => None,
        }
    }

    fn render(&self, _view: &ViewState, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let dialog = Self::centered_rect(area, 60, 24);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .title(" Help: Keybindings ")
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::accent()));

        let help_text = vec![
            Line::from(""),
            key_line("q / Ctrl+C", "Quit"),
            key_line("?", "Toggle this help"),
            key_line("1-3", "Jump to screen"),
            key_line("Left / Right", "Previous / next screen"),
            key_line("Up / Down / j / k", "Select scenario"),
            key_line("Space / e", "Show more / fewer hashtags"),
            key_line("PgUp / PgDn", "Scroll scenario details"),
            Line::from(""),
            Line::from(Span::styled("── Compose form ──", Theme::header())),
            Line::from(""),
            key_line("Enter", "Edit form / next field / add tag"),
            key_line("Tab", "Switch field"),
            key_line("Up / Down", "Move through hashtag options"),
            key_line("Backspace", "Delete (empty filter: drop tag)"),
            key_line("Ctrl+T", "Picker / free-text hashtags"),
            key_line("Ctrl+W", "Delete word"),
            key_line("Ctrl+S / Alt+Enter", "Generate scenarios"),
            key_line("Esc", "Leave the form"),
        ];

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, dialog);
    }
}

fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<22}", key), Theme::selected()),
        Span::styled(desc, Theme::normal()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_key_closes_help_but_ticks_do_not() {
        let view = ViewState::default();
        let mut help = HelpComponent::new();
        help.handle_action(&Action::ToggleHelp, &view);
        assert!(help.visible);

        help.handle_action(&Action::Tick, &view);
        assert!(help.visible);

        help.handle_action(&Action::ScrollDown, &view);
        assert!(!help.visible);
    }
}

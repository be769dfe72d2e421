//! Component trait and all TUI components.
//!
//! Each component keeps only its own cursor/input state. Everything about the
//! current results lives in [`ViewState`], which is passed in by reference.

pub mod hashtag_trends;
pub mod help;
pub mod keyword_form;
pub mod scenario_board;
pub mod status_bar;

use ratatui::layout::Rect;
use ratatui::Frame;

use scenegen_core::view::ViewState;

use crate::action::Action;

/// Trait implemented by all TUI components.
pub trait Component {
    /// Handle an action and optionally return a new action to dispatch.
    fn handle_action(&mut self, action: &Action, view: &ViewState) -> Option<Action> {
        let _ = (action, view);
        None
    }

    /// Render the component into the given area.
    fn render(&self, view: &ViewState, frame: &mut Frame, area: Rect);
}

/// Shorten to at most `max_chars` characters, marking the cut with `...`.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars < 4 {
        return s.chars().take(max_chars).collect();
    }
    let kept: String = s.chars().take(max_chars - 3).collect();
    format!("{kept}...")
}

/// Word-wrap a single logical line to fit within `max_width` characters.
/// Breaks at spaces when possible, hard-breaks words longer than the width.
pub(crate) fn wrap_line(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || text.chars().count() <= max_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if current_len > 0 && current_len + 1 + word_len <= max_width {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }

        let mut rest: Vec<char> = word.chars().collect();
        while rest.len() > max_width {
            lines.push(rest.drain(..max_width).collect());
        }
        current = rest.into_iter().collect();
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap and keep at most `max_lines`, ending the last kept line with `...`
/// when text was dropped.
pub(crate) fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines = wrap_line(text, width);
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        let keep = width.saturating_sub(3);
        let shortened: String = last.chars().take(keep).collect();
        *last = format!("{}...", shortened.trim_end());
    }
    lines
}

/// Render a component into an in-memory terminal and return its rows.
#[cfg(test)]
pub(crate) fn render_to_text(
    component: &dyn Component,
    view: &ViewState,
    width: u16,
    height: u16,
) -> String {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal
        .draw(|frame| component.render(view, frame, frame.area()))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .chunks(width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

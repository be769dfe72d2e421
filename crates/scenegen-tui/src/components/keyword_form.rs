//! Compose screen: keywords plus hashtags, submitted to the generator.
//!
//! Features:
//! - Keyword field: single line, required
//! - Hashtag field in one of two modes (Ctrl+T switches):
//!   - picker: type to filter the catalogue, Enter adds the highlighted tag,
//!     Backspace on an empty filter removes the last chosen tag
//!   - free text: `#`-prefixed words are extracted on submit
//! - Ctrl+S submits; the button shows a spinner while a request is in flight

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use scenegen_core::config::HashtagInput;
use scenegen_core::request::{HashtagSource, SubmissionRequest};
use scenegen_core::view::ViewState;

use crate::action::Action;
use crate::components::{truncate, Component};
use crate::theme::Theme;

/// Maximum number of picker options to display.
const MAX_OPTIONS: usize = 8;

/// Braille spinner frames.
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Which input field is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputField {
    Keyword,
    Hashtags,
}

pub struct KeywordFormComponent {
    /// Current keyword input.
    pub keyword_input: String,
    /// Which field is focused.
    focused: InputField,
    /// Picker or free-text hashtag entry.
    pub mode: HashtagInput,

    // ── Picker ──────────────────────────────────────────────
    /// Full catalogue.
    options: Vec<String>,
    /// Tags chosen so far, in choice order.
    pub chosen: Vec<String>,
    /// Text typed to narrow the catalogue.
    filter: String,
    /// Highlighted row within the filtered options.
    highlight: usize,

    // ── Free text ───────────────────────────────────────────
    pub free_text: String,

    /// Whether keys go to the form. Esc releases it, Enter takes it back.
    active: bool,
    spinner_tick: usize,
}

impl KeywordFormComponent {
    pub fn new(options: Vec<String>, mode: HashtagInput) -> Self {
        Self {
            keyword_input: String::new(),
            focused: InputField::Keyword,
            mode,
            options,
            chosen: Vec::new(),
            filter: String::new(),
            highlight: 0,
            free_text: String::new(),
            active: true,
            spinner_tick: 0,
        }
    }

    /// Whether this component wants to capture raw key input.
    pub fn wants_input(&self) -> bool {
        self.active
    }

    /// Pre-fill free-text hashtags; switches the form to free-text mode.
    pub fn set_free_text(&mut self, text: String) {
        self.free_text = text;
        self.mode = HashtagInput::FreeText;
    }

    /// Catalogue entries matching the filter, minus those already chosen.
    fn filtered_options(&self) -> Vec<&str> {
        let needle = self.filter.to_lowercase();
        self.options
            .iter()
            .filter(|o| !self.chosen.contains(o))
            .filter(|o| needle.is_empty() || o.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    fn focused_text_mut(&mut self) -> &mut String {
        match (self.focused, self.mode) {
            (InputField::Keyword, _) => &mut self.keyword_input,
            (InputField::Hashtags, HashtagInput::Picker) => &mut self.filter,
            (InputField::Hashtags, HashtagInput::FreeText) => &mut self.free_text,
        }
    }

    fn in_picker(&self) -> bool {
        self.focused == InputField::Hashtags && self.mode == HashtagInput::Picker
    }

    fn insert_char(&mut self, c: char) {
        self.focused_text_mut().push(c);
        if self.in_picker() {
            self.highlight = 0;
        }
    }

    fn delete_char(&mut self) {
        if self.in_picker() && self.filter.is_empty() {
            self.chosen.pop();
            return;
        }
        self.focused_text_mut().pop();
        if self.in_picker() {
            self.highlight = 0;
        }
    }

    /// Delete the word before the end of the focused field (Ctrl+W).
    fn delete_word(&mut self) {
        let input = self.focused_text_mut();
        let trimmed = input.trim_end_matches(' ').len();
        let start = input[..trimmed].rfind(' ').map(|i| i + 1).unwrap_or(0);
        input.truncate(start);
    }

    fn insert_str(&mut self, s: &str) {
        let text = match (self.focused, self.mode) {
            (InputField::Hashtags, HashtagInput::FreeText) => s.replace(['\n', '\r'], " "),
            _ => s.lines().next().unwrap_or("").to_string(),
        };
        self.focused_text_mut().push_str(&text);
    }

    fn switch_field(&mut self) {
        self.focused = match self.focused {
            InputField::Keyword => InputField::Hashtags,
            InputField::Hashtags => InputField::Keyword,
        };
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            HashtagInput::Picker => HashtagInput::FreeText,
            HashtagInput::FreeText => HashtagInput::Picker,
        };
        self.focused = InputField::Hashtags;
        self.highlight = 0;
    }

    /// Add the highlighted picker option to the chosen tags.
    fn choose_highlighted(&mut self) {
        let pick = self
            .filtered_options()
            .get(self.highlight)
            .map(|s| s.to_string());
        if let Some(tag) = pick {
            self.chosen.push(tag);
            self.filter.clear();
            self.highlight = 0;
        }
    }

    fn move_down(&mut self) {
        match self.focused {
            InputField::Keyword => self.focused = InputField::Hashtags,
            InputField::Hashtags if self.mode == HashtagInput::Picker => {
                let max = self.filtered_options().len().min(MAX_OPTIONS);
                if self.highlight + 1 < max {
                    self.highlight += 1;
                }
            }
            InputField::Hashtags => {}
        }
    }

    fn move_up(&mut self) {
        match self.focused {
            InputField::Keyword => {}
            InputField::Hashtags if self.mode == HashtagInput::Picker && self.highlight > 0 => {
                self.highlight -= 1;
            }
            InputField::Hashtags => self.focused = InputField::Keyword,
        }
    }

    /// Try to submit the form. Returns the request, or a status hint.
    fn try_submit(&mut self) -> Option<Action> {
        let source = match self.mode {
            HashtagInput::Picker => HashtagSource::Selected(self.chosen.clone()),
            HashtagInput::FreeText => HashtagSource::FreeText(self.free_text.clone()),
        };

        match SubmissionRequest::new(self.keyword_input.clone(), source) {
            Ok(request) => Some(Action::Submit(request)),
            Err(e) => {
                self.focused = InputField::Keyword;
                Some(Action::SetStatus(e.to_string()))
            }
        }
    }

    fn render_text_field(
        text: &str,
        is_focused: bool,
        placeholder: &str,
        title: &str,
        frame: &mut Frame,
        area: Rect,
    ) {
        let block = field_block(title, is_focused);

        let display = if text.is_empty() && !is_focused {
            Paragraph::new(Span::styled(placeholder, Theme::dim()))
        } else if is_focused {
            Paragraph::new(Line::from(vec![
                Span::styled(text, Theme::normal()),
                cursor_span(),
            ]))
        } else {
            Paragraph::new(Span::styled(text, Theme::normal()))
        };

        frame.render_widget(display.block(block), area);
    }

    fn render_picker(&self, is_focused: bool, frame: &mut Frame, area: Rect) {
        let block = field_block(" Hashtags (picker · ctrl+t free text) ", is_focused);

        let mut spans: Vec<Span> = Vec::new();
        for tag in &self.chosen {
            spans.push(Span::styled(format!("[{tag}]"), Theme::chip()));
            spans.push(Span::raw(" "));
        }
        if self.chosen.is_empty() && self.filter.is_empty() && !is_focused {
            spans.push(Span::styled("Search and select hashtags...", Theme::dim()));
        } else {
            spans.push(Span::styled(self.filter.clone(), Theme::normal()));
            if is_focused {
                spans.push(cursor_span());
            }
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(paragraph, area);
    }

    fn render_options(&self, frame: &mut Frame, area: Rect) {
        let options = self.filtered_options();
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
            .border_style(Theme::border());

        let items: Vec<ListItem> = if options.is_empty() {
            vec![ListItem::new(Span::styled(" No options", Theme::dim()))]
        } else {
            options
                .iter()
                .take(MAX_OPTIONS)
                .enumerate()
                .map(|(i, option)| {
                    let style = if i == self.highlight {
                        Style::default()
                            .fg(Theme::bg())
                            .bg(Theme::accent())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Theme::normal()
                    };
                    ListItem::new(Span::styled(format!(" {option} "), style))
                })
                .collect()
        };

        frame.render_widget(List::new(items).block(block), area);
    }

    fn render_submit(&self, view: &ViewState, frame: &mut Frame, area: Rect) {
        let button = if view.is_loading() {
            let spinner = SPINNER[self.spinner_tick % SPINNER.len()];
            Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("[ Generating... {spinner} ]"), Theme::dim()),
            ])
        } else {
            Line::from(vec![
                Span::raw("  "),
                Span::styled("[ Generate ]", Theme::selected()),
            ])
        };
        frame.render_widget(Paragraph::new(button), area);
    }
}

impl Component for KeywordFormComponent {
    fn handle_action(&mut self, action: &Action, _view: &ViewState) -> Option<Action> {
        match action {
            Action::Tick => {
                self.spinner_tick = self.spinner_tick.wrapping_add(1);
                None
            }
            Action::Cancel => {
                self.active = false;
                None
            }
            Action::Confirm if !self.active => {
                self.active = true;
                None
            }
            _ if !self.active => None,

            // ── Text input ──────────────────────────────────────
            Action::CharInput(c) => {
                self.insert_char(*c);
                None
            }
            Action::BackspaceInput => {
                self.delete_char();
                None
            }
            Action::DeleteWord => {
                self.delete_word();
                None
            }
            Action::PasteBulk(text) => {
                if !text.is_empty() {
                    self.insert_str(text);
                }
                None
            }
            Action::SwitchInputField => {
                self.switch_field();
                None
            }
            Action::ToggleHashtagMode => {
                self.toggle_mode();
                None
            }
            Action::ScrollDown => {
                self.move_down();
                None
            }
            Action::ScrollUp => {
                self.move_up();
                None
            }

            // ── Enter: next field, pick option, or submit ───────
            Action::NewlineInput => match (self.focused, self.mode) {
                (InputField::Keyword, _) => {
                    self.switch_field();
                    None
                }
                (InputField::Hashtags, HashtagInput::Picker) => {
                    self.choose_highlighted();
                    None
                }
                (InputField::Hashtags, HashtagInput::FreeText) => self.try_submit(),
            },

            Action::SubmitForm => self.try_submit(),
            _ => None,
        }
    }

    fn render(&self, view: &ViewState, frame: &mut Frame, area: Rect) {
        let picker = self.mode == HashtagInput::Picker;
        let options_height = if picker && self.active && self.focused == InputField::Hashtags {
            (self.filtered_options().len().clamp(1, MAX_OPTIONS) + 1) as u16
        } else {
            0
        };
        let banner_height = if view.error().is_some() { 3 } else { 0 };

        let chunks = Layout::vertical([
            Constraint::Length(3),              // Keyword
            Constraint::Length(3),              // Hashtags
            Constraint::Length(options_height), // Picker dropdown
            Constraint::Length(1),              // Submit button
            Constraint::Length(1),              // Spacer
            Constraint::Length(1),              // Instructions
            Constraint::Length(banner_height),  // Error banner
            Constraint::Min(0),                 // Last results summary
        ])
        .split(area);

        let keyword_focused = self.active && self.focused == InputField::Keyword;
        Self::render_text_field(
            &self.keyword_input,
            keyword_focused,
            "Enter keywords for your content",
            " Keywords ",
            frame,
            chunks[0],
        );

        let hashtags_focused = self.active && self.focused == InputField::Hashtags;
        if picker {
            self.render_picker(hashtags_focused, frame, chunks[1]);
            if options_height > 0 {
                self.render_options(frame, chunks[2]);
            }
        } else {
            Self::render_text_field(
                &self.free_text,
                hashtags_focused,
                "#travel #summer ... (only #words are used)",
                " Hashtags (free text · ctrl+t picker) ",
                frame,
                chunks[1],
            );
        }

        self.render_submit(view, frame, chunks[3]);

        let instructions = if self.active {
            Line::from(vec![
                Span::styled("  ctrl+s", Theme::key_hint()),
                Span::styled(" generate  ", Theme::dim()),
                Span::styled("tab", Theme::key_hint()),
                Span::styled(" switch  ", Theme::dim()),
                Span::styled("ctrl+t", Theme::key_hint()),
                Span::styled(" hashtag mode  ", Theme::dim()),
                Span::styled("esc", Theme::key_hint()),
                Span::styled(" leave form", Theme::dim()),
            ])
        } else {
            Line::from(vec![
                Span::styled("  enter", Theme::key_hint()),
                Span::styled(" edit form  ", Theme::dim()),
                Span::styled("→", Theme::key_hint()),
                Span::styled(" scenarios", Theme::dim()),
            ])
        };
        frame.render_widget(Paragraph::new(instructions), chunks[5]);

        if let Some(error) = view.error() {
            let banner = Paragraph::new(Span::styled(
                format!("Error: {error}"),
                Theme::error_banner(),
            ))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Theme::error())),
            );
            frame.render_widget(banner, chunks[6]);
        }

        if let Some(request) = view.results_for() {
            let summary = Paragraph::new(vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled("  Showing ", Theme::dim()),
                    Span::styled(
                        format!("{} scenarios", view.scenarios().len()),
                        Theme::header(),
                    ),
                    Span::styled(" for ", Theme::dim()),
                    Span::styled(
                        format!("\"{}\"", truncate(&request.keyword, 60)),
                        Theme::normal(),
                    ),
                ]),
            ]);
            frame.render_widget(summary, chunks[7]);
        }
    }
}

fn field_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default().fg(Theme::accent())
    } else {
        Theme::border()
    };
    Block::default()
        .title(title)
        .title_style(if is_focused {
            Theme::key_hint()
        } else {
            Theme::muted()
        })
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn cursor_span() -> Span<'static> {
    Span::styled(" ", Style::default().fg(Theme::bg()).bg(Theme::accent()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::render_to_text;
    use scenegen_core::request::SubmissionRequest;
    use scenegen_core::scenario::GenerateResponse;

    fn form() -> KeywordFormComponent {
        KeywordFormComponent::new(
            vec![
                "#footmassager".into(),
                "#neckmassager".into(),
                "Neck Massager".into(),
                "#Relaxation".into(),
            ],
            HashtagInput::Picker,
        )
    }

    fn send(form: &mut KeywordFormComponent, action: Action) -> Option<Action> {
        form.handle_action(&action, &ViewState::default())
    }

    fn type_text(form: &mut KeywordFormComponent, text: &str) {
        for c in text.chars() {
            send(form, Action::CharInput(c));
        }
    }

    fn submitted(action: Option<Action>) -> SubmissionRequest {
        match action {
            Some(Action::Submit(req)) => req,
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn submit_without_hashtags_sends_empty_list() {
        let mut f = form();
        type_text(&mut f, "massage gun");
        let req = submitted(send(&mut f, Action::SubmitForm));
        assert_eq!(req.keyword, "massage gun");
        assert!(req.hashtags.is_empty());
    }

    #[test]
    fn empty_keyword_gives_status_hint() {
        let mut f = form();
        match send(&mut f, Action::SubmitForm) {
            Some(Action::SetStatus(msg)) => assert_eq!(msg, "Enter keywords for your content"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn picker_filters_and_chooses_in_order() {
        let mut f = form();
        type_text(&mut f, "neck");
        send(&mut f, Action::NewlineInput); // keyword -> hashtags

        type_text(&mut f, "NECK");
        assert_eq!(f.filtered_options(), vec!["#neckmassager", "Neck Massager"]);
        send(&mut f, Action::ScrollDown);
        send(&mut f, Action::NewlineInput);
        assert_eq!(f.chosen, vec!["Neck Massager"]);

        send(&mut f, Action::NewlineInput); // empty filter: first remaining option
        assert_eq!(f.chosen, vec!["Neck Massager", "#footmassager"]);

        let req = submitted(send(&mut f, Action::SubmitForm));
        assert_eq!(req.hashtags, vec!["Neck Massager", "#footmassager"]);
    }

    #[test]
    fn chosen_options_are_hidden_from_picker() {
        let mut f = form();
        send(&mut f, Action::SwitchInputField);
        send(&mut f, Action::NewlineInput);
        assert!(!f.filtered_options().contains(&"#footmassager"));
    }

    #[test]
    fn backspace_on_empty_filter_removes_last_choice() {
        let mut f = form();
        send(&mut f, Action::SwitchInputField);
        send(&mut f, Action::NewlineInput);
        send(&mut f, Action::NewlineInput);
        assert_eq!(f.chosen.len(), 2);

        send(&mut f, Action::BackspaceInput);
        assert_eq!(f.chosen, vec!["#footmassager"]);
    }

    #[test]
    fn free_text_mode_extracts_hashtags() {
        let mut f = form();
        type_text(&mut f, "trip");
        send(&mut f, Action::ToggleHashtagMode);
        type_text(&mut f, "#travel adventure #go");
        let req = submitted(send(&mut f, Action::NewlineInput));
        assert_eq!(req.hashtags, vec!["#travel", "#go"]);
    }

    #[test]
    fn free_text_paste_flattens_newlines() {
        let mut f = form();
        f.set_free_text(String::new());
        send(&mut f, Action::SwitchInputField);
        send(&mut f, Action::PasteBulk("#a\n#b".into()));
        assert_eq!(f.free_text, "#a #b");
    }

    #[test]
    fn delete_word_removes_last_word() {
        let mut f = form();
        type_text(&mut f, "tote bag ");
        send(&mut f, Action::DeleteWord);
        assert_eq!(f.keyword_input, "tote ");
    }

    #[test]
    fn escape_releases_and_confirm_reclaims_input() {
        let mut f = form();
        send(&mut f, Action::Cancel);
        assert!(!f.wants_input());
        send(&mut f, Action::CharInput('x'));
        assert!(f.keyword_input.is_empty());

        send(&mut f, Action::Confirm);
        assert!(f.wants_input());
    }

    #[test]
    fn button_shows_loading_label() {
        let f = form();
        let mut view = ViewState::default();
        let idle = render_to_text(&f, &view, 80, 20);
        assert!(idle.contains("[ Generate ]"));

        view.begin_submission(SubmissionRequest::new("k", HashtagSource::Selected(vec![])).unwrap());
        let busy = render_to_text(&f, &view, 80, 20);
        assert!(busy.contains("Generating..."));
    }

    #[test]
    fn error_banner_shows_message() {
        let f = form();
        let mut view = ViewState::default();
        let ticket =
            view.begin_submission(SubmissionRequest::new("k", HashtagSource::Selected(vec![])).unwrap());
        view.complete(ticket, Err("Failed to generate scenarios".into()));

        let text = render_to_text(&f, &view, 80, 20);
        assert!(text.contains("Error: Failed to generate scenarios"));
        assert!(text.contains("[ Generate ]"));
    }

    #[test]
    fn results_summary_names_keyword() {
        let f = form();
        let mut view = ViewState::default();
        let ticket = view
            .begin_submission(SubmissionRequest::new("tote", HashtagSource::Selected(vec![])).unwrap());
        view.complete(
            ticket,
            Ok(GenerateResponse {
                scenarios: vec![],
                top_hashtags: None,
            }),
        );
        let text = render_to_text(&f, &view, 80, 20);
        assert!(text.contains("Showing 0 scenarios for \"tote\""));
    }
}

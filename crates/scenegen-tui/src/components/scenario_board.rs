//! Scenarios screen: one card per generated scenario, with the active
//! scenario's full guidance in a detail panel.

use std::cell::Cell;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use scenegen_core::scenario::{guidance_label, GuidanceValue, ScenarioRecord};
use scenegen_core::view::ViewState;

use crate::action::Action;
use crate::components::{clamp_lines, truncate, wrap_line, Component};
use crate::theme::Theme;

/// Lines of reason shown on a card.
const CARD_REASON_LINES: usize = 2;

pub struct ScenarioBoardComponent {
    /// Vertical scroll of the detail panel.
    detail_scroll: u16,
    /// Largest useful scroll for the detail panel, updated on render.
    max_detail_scroll: Cell<u16>,
}

impl ScenarioBoardComponent {
    pub fn new() -> Self {
        Self {
            detail_scroll: 0,
            max_detail_scroll: Cell::new(0),
        }
    }

    /// Forget per-result state after a new response lands.
    pub fn reset(&mut self) {
        self.detail_scroll = 0;
    }

    fn select(&mut self, index: usize) -> Option<Action> {
        self.detail_scroll = 0;
        Some(Action::SelectScenario(index))
    }
}

impl Default for ScenarioBoardComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ScenarioBoardComponent {
    fn handle_action(&mut self, action: &Action, view: &ViewState) -> Option<Action> {
        let count = view.scenarios().len();
        let current = view.selected_index();

        match action {
            Action::ScrollUp => match current {
                Some(i) if i > 0 => self.select(i - 1),
                _ => None,
            },
            Action::ScrollDown => match current {
                Some(i) if i + 1 < count => self.select(i + 1),
                None if count > 0 => self.select(0),
                _ => None,
            },
            Action::Confirm => current.and_then(|i| self.select(i)),
            Action::ToggleExpand => current.map(Action::ToggleHashtags),
            Action::ScrollDetailUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(5);
                None
            }
            Action::ScrollDetailDown => {
                self.detail_scroll = self
                    .detail_scroll
                    .saturating_add(5)
                    .min(self.max_detail_scroll.get());
                None
            }
            _ => None,
        }
    }

    fn render(&self, view: &ViewState, frame: &mut Frame, area: Rect) {
        let title = match view.results_for() {
            Some(request) => format!(" Scenarios for \"{}\" ", truncate(&request.keyword, 40)),
            None => " Scenarios ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(Theme::dim());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if view.scenarios().is_empty() {
            let hint = if view.is_loading() {
                "Generating scenarios..."
            } else if view.results_for().is_some() {
                "The service returned no scenarios. Try other keywords."
            } else {
                "Submit keywords on the Compose screen to get started."
            };
            let msg = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("No scenarios yet", Theme::header())),
                Line::from(Span::styled(hint, Theme::dim())),
            ]);
            frame.render_widget(msg, inner);
            return;
        }

        let chunks = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(inner);

        self.render_cards(view, frame, chunks[0]);
        self.render_detail(view, frame, chunks[1]);
    }
}

impl ScenarioBoardComponent {
    // ── Cards ───────────────────────────────────────────────────

    fn render_cards(&self, view: &ViewState, frame: &mut Frame, area: Rect) {
        let text_width = area.width.saturating_sub(4) as usize;
        let selected = view.selected_index();

        let items: Vec<ListItem> = view
            .scenarios()
            .iter()
            .enumerate()
            .map(|(i, scenario)| {
                let is_selected = selected == Some(i);
                let marker = if is_selected { "▶ " } else { "  " };
                let title_style = if is_selected {
                    Theme::selected()
                } else {
                    Theme::header()
                };

                let mut lines = vec![Line::from(vec![
                    Span::styled(marker, title_style),
                    Span::styled(truncate(&scenario.scenario, text_width), title_style),
                ])];

                for reason in clamp_lines(&scenario.reason, text_width, CARD_REASON_LINES) {
                    lines.push(Line::from(vec![
                        Span::raw("  "),
                        Span::styled(reason, Theme::muted()),
                    ]));
                }

                if let Some(preview) = view.hashtag_preview(i) {
                    for row in flow_chips(preview.visible, text_width) {
                        let mut chips = vec![Span::raw("  ")];
                        for tag in row {
                            chips.push(Span::styled(truncate(tag, text_width), Theme::chip()));
                            chips.push(Span::raw(" "));
                        }
                        lines.push(Line::from(chips));
                    }
                    if let Some(label) = preview.control.label() {
                        lines.push(Line::from(vec![
                            Span::raw("  "),
                            Span::styled(label, Theme::chip_control()),
                        ]));
                    }
                }
                lines.push(Line::from(""));

                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items).highlight_style(Theme::selection());
        let mut state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(list, area, &mut state);
    }

    // ── Detail panel ────────────────────────────────────────────

    fn render_detail(&self, view: &ViewState, frame: &mut Frame, area: Rect) {
        let Some(scenario) = view.selected_scenario() else {
            return;
        };

        let block = Block::default()
            .title(format!(
                " {} ",
                truncate(&scenario.scenario, area.width.saturating_sub(4) as usize)
            ))
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(Theme::dim());

        let lines = detail_lines(scenario);
        let inner = block.inner(area);
        let max_scroll = wrapped_height(&lines, inner.width as usize)
            .saturating_sub(inner.height as usize)
            .min(u16::MAX as usize) as u16;
        self.max_detail_scroll.set(max_scroll);

        let detail = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.detail_scroll.min(max_scroll), 0))
            .block(block);
        frame.render_widget(detail, area);
    }
}

/// Pack chips into rows of at most `width` characters, one space apart.
fn flow_chips(tags: &[String], width: usize) -> Vec<Vec<&str>> {
    let mut rows: Vec<Vec<&str>> = Vec::new();
    let mut used = 0;
    for tag in tags {
        let len = tag.chars().count();
        match rows.last_mut() {
            Some(row) if used + 1 + len <= width => {
                row.push(tag.as_str());
                used += 1 + len;
            }
            _ => {
                rows.push(vec![tag.as_str()]);
                used = len;
            }
        }
    }
    rows
}

/// Rows the detail text occupies once word-wrapped to `width`.
fn wrapped_height(lines: &[Line<'_>], width: usize) -> usize {
    lines
        .iter()
        .map(|line| {
            let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            wrap_line(&text, width).len()
        })
        .sum()
}

fn section_heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default()
            .fg(Theme::accent_secondary())
            .add_modifier(Modifier::BOLD),
    ))
}

fn detail_lines(scenario: &ScenarioRecord) -> Vec<Line<'_>> {
    let mut lines = vec![
        section_heading("Why this scenario"),
        Line::from(Span::styled(scenario.reason.as_str(), Theme::normal())),
        Line::from(""),
    ];

    if !scenario.hashtags.is_empty() {
        lines.push(section_heading("Hashtags"));
        let mut chips = Vec::with_capacity(scenario.hashtags.len() * 2);
        for tag in &scenario.hashtags {
            chips.push(Span::styled(tag.as_str(), Theme::chip()));
            chips.push(Span::raw(" "));
        }
        lines.push(Line::from(chips));
        lines.push(Line::from(""));
    }

    for (key, value) in scenario.content_guidance.entries() {
        lines.push(section_heading(guidance_label(key)));
        match value {
            GuidanceValue::Text(text) => {
                lines.push(Line::from(Span::styled(text.as_str(), Theme::normal())));
            }
            GuidanceValue::List(items) => {
                for item in items {
                    lines.push(Line::from(vec![
                        Span::styled("  • ", Theme::key_hint()),
                        Span::styled(item.as_str(), Theme::normal()),
                    ]));
                }
            }
        }
        lines.push(Line::from(""));
    }

    lines
}

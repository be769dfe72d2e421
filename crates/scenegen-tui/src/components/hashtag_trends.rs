//! Trends screen: top hashtags as a horizontal bar chart, plus the
//! popular / related / niche breakdown.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use scenegen_core::view::ViewState;

use crate::components::{truncate, Component};
use crate::theme::Theme;

/// Width reserved for bar labels.
const LABEL_WIDTH: usize = 20;

pub struct HashtagTrendsComponent;

impl HashtagTrendsComponent {
    pub fn new() -> Self {
        Self
    }

    fn render_chart(&self, view: &ViewState, frame: &mut Frame, area: Rect) {
        let bars: Vec<Bar> = view
            .chart()
            .iter()
            .enumerate()
            .map(|(rank, entry)| {
                Bar::default()
                    .value(entry.count)
                    .label(Line::from(truncate(&entry.name, LABEL_WIDTH)))
                    .text_value(entry.count.to_string())
                    .style(Style::default().fg(Theme::rank_color(rank)))
                    .value_style(Style::default().fg(Theme::bg()).bg(Theme::rank_color(rank)))
            })
            .collect();

        let chart = BarChart::default()
            .block(
                Block::default()
                    .title(format!(" Top {} Hashtags ", bars.len()))
                    .title_style(Theme::title())
                    .borders(Borders::ALL)
                    .border_style(Theme::dim()),
            )
            .direction(Direction::Horizontal)
            .data(BarGroup::default().bars(&bars))
            .bar_width(1)
            .bar_gap(0);
        frame.render_widget(chart, area);
    }

    fn render_buckets(&self, view: &ViewState, frame: &mut Frame, area: Rect) {
        let buckets = view.buckets();
        let mut lines = Vec::new();

        for (title, tags, empty) in [
            ("Popular", &buckets.popular, "No trending hashtags"),
            ("Related", &buckets.related, "None of your hashtags came back"),
            ("Niche", &buckets.niche, "No single-scenario hashtags"),
        ] {
            lines.push(Line::from(vec![
                Span::styled(format!("{title} "), Theme::header()),
                Span::styled(format!("({})", tags.len()), Theme::dim()),
            ]));
            if tags.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {empty}"), Theme::dim())));
            } else {
                let mut chips = vec![Span::raw("  ")];
                for tag in tags {
                    chips.push(Span::styled(tag.as_str(), Theme::chip()));
                    chips.push(Span::raw(" "));
                }
                lines.push(Line::from(chips));
            }
            lines.push(Line::from(""));
        }

        let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(" Hashtag Mix ")
                .title_style(Theme::title())
                .borders(Borders::ALL)
                .border_style(Theme::dim()),
        );
        frame.render_widget(panel, area);
    }
}

impl Default for HashtagTrendsComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for HashtagTrendsComponent {
    fn render(&self, view: &ViewState, frame: &mut Frame, area: Rect) {
        if view.chart().is_empty() {
            let block = Block::default()
                .title(" Hashtag Trends ")
                .title_style(Theme::title())
                .borders(Borders::ALL)
                .border_style(Theme::dim());
            let msg = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("No hashtag data yet", Theme::header())),
                Line::from(Span::styled(
                    "Trends appear once generated scenarios include hashtags.",
                    Theme::dim(),
                )),
            ])
            .block(block);
            frame.render_widget(msg, area);
            return;
        }

        let chunks = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        self.render_chart(view, frame, chunks[0]);
        self.render_buckets(view, frame, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::render_to_text;
    use scenegen_core::request::{HashtagSource, SubmissionRequest};
    use scenegen_core::scenario::{
        ContentGuidance, GenerateResponse, HashtagFrequency, ScenarioRecord,
    };

    fn scenario(tags: &[&str]) -> ScenarioRecord {
        ScenarioRecord {
            scenario: "s".into(),
            reason: "r".into(),
            hashtags: tags.iter().map(|t| t.to_string()).collect(),
            content_guidance: ContentGuidance::default(),
        }
    }

    #[test]
    fn empty_state_without_chart() {
        let text = render_to_text(&HashtagTrendsComponent::new(), &ViewState::default(), 80, 10);
        assert!(text.contains("No hashtag data yet"));
    }

    #[test]
    fn shows_chart_and_buckets() {
        let mut view = ViewState::default();
        let ticket = view.begin_submission(
            SubmissionRequest::new("trip", HashtagSource::Selected(vec!["#mine".into()])).unwrap(),
        );
        view.complete(
            ticket,
            Ok(GenerateResponse {
                scenarios: vec![scenario(&["#mine", "#rare"])],
                top_hashtags: Some(vec![
                    HashtagFrequency::new("#travel", 12),
                    HashtagFrequency::new("#summer", 4),
                ]),
            }),
        );

        let text = render_to_text(&HashtagTrendsComponent::new(), &view, 120, 24);
        assert!(text.contains("Top 2 Hashtags"));
        assert!(text.contains("#travel"));
        assert!(text.contains("Related (1)"));
        assert!(text.contains("#mine"));
        assert!(text.contains("Niche (1)"));
        assert!(text.contains("#rare"));
    }
}

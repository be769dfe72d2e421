//! Presenter state: everything the result screens render from.
//!
//! All mutations go through [`ViewState`]. Renderers only borrow it, so a
//! frame is a pure function of this struct plus component-local cursors.

use crate::ranking::{bucket_hashtags, chart_data, HashtagBuckets, HashtagCount};
use crate::request::SubmissionRequest;
use crate::scenario::{GenerateResponse, ScenarioRecord};

/// How many hashtags a collapsed card shows.
pub const HASHTAG_PREVIEW_LEN: usize = 3;

/// Identifies one submission. Later submissions get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// What happened to a finished request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome was applied to the view.
    Applied,
    /// A newer submission exists; the outcome was dropped.
    Stale,
}

/// The control shown after a card's hashtags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewControl {
    /// Three or fewer hashtags: nothing to expand.
    None,
    /// Collapsed, with this many tags hidden.
    ShowMore(usize),
    /// Expanded.
    ShowLess,
}

impl PreviewControl {
    pub fn label(&self) -> Option<String> {
        match self {
            PreviewControl::None => None,
            PreviewControl::ShowMore(n) => Some(format!("+{n} more")),
            PreviewControl::ShowLess => Some("Show less".to_string()),
        }
    }
}

/// Hashtags a card should display right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashtagPreview<'a> {
    pub visible: &'a [String],
    pub control: PreviewControl,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    scenarios: Vec<ScenarioRecord>,
    /// One flag per scenario, same indices.
    expanded: Vec<bool>,
    selected: Option<usize>,
    chart: Vec<HashtagCount>,
    buckets: HashtagBuckets,
    loading: bool,
    error: Option<String>,
    latest_ticket: u64,
    /// Request of the latest submission, kept until its outcome arrives.
    in_flight: Option<SubmissionRequest>,
    /// Request whose response is currently displayed.
    results_for: Option<SubmissionRequest>,
    top_n: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(crate::ranking::DEFAULT_TOP_N)
    }
}

impl ViewState {
    pub fn new(top_n: usize) -> Self {
        Self {
            scenarios: Vec::new(),
            expanded: Vec::new(),
            selected: None,
            chart: Vec::new(),
            buckets: HashtagBuckets::default(),
            loading: false,
            error: None,
            latest_ticket: 0,
            in_flight: None,
            results_for: None,
            top_n,
        }
    }

    // ── Submission lifecycle ────────────────────────────────────

    /// Mark a submission as started: loading on, previous error cleared.
    /// The current results stay on screen until an outcome is applied.
    pub fn begin_submission(&mut self, request: SubmissionRequest) -> RequestTicket {
        self.latest_ticket += 1;
        self.loading = true;
        self.error = None;
        self.in_flight = Some(request);
        RequestTicket(self.latest_ticket)
    }

    /// Apply the outcome of a submission. Outcomes for anything but the
    /// latest ticket are ignored entirely.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<GenerateResponse, String>,
    ) -> Completion {
        if ticket.0 != self.latest_ticket {
            return Completion::Stale;
        }

        self.loading = false;
        let request = self.in_flight.take();

        match outcome {
            Ok(response) => self.replace_results(response, request),
            Err(message) => self.error = Some(message),
        }
        Completion::Applied
    }

    fn replace_results(&mut self, response: GenerateResponse, request: Option<SubmissionRequest>) {
        let GenerateResponse {
            scenarios,
            top_hashtags,
        } = response;

        self.chart = chart_data(top_hashtags.as_deref(), &scenarios, self.top_n);
        let submitted = request
            .as_ref()
            .map(|r| r.hashtags.as_slice())
            .unwrap_or_default();
        self.buckets = bucket_hashtags(&self.chart, &scenarios, submitted);

        self.expanded = vec![false; scenarios.len()];
        self.selected = if scenarios.is_empty() { None } else { Some(0) };
        self.scenarios = scenarios;
        self.results_for = request;
    }

    // ── Presenter interactions ──────────────────────────────────

    /// Make the scenario at `index` the active one. Out-of-range is a no-op.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.scenarios.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Flip a card between its 3-tag preview and the full list. Cards with
    /// nothing hidden cannot be expanded.
    pub fn toggle_hashtags(&mut self, index: usize) -> bool {
        let hidden = self
            .scenarios
            .get(index)
            .map(|s| s.hashtags.len() > HASHTAG_PREVIEW_LEN)
            .unwrap_or(false);
        if !hidden {
            return false;
        }
        self.expanded[index] = !self.expanded[index];
        true
    }

    pub fn hashtag_preview(&self, index: usize) -> Option<HashtagPreview<'_>> {
        let scenario = self.scenarios.get(index)?;
        let tags = scenario.hashtags.as_slice();

        if tags.len() <= HASHTAG_PREVIEW_LEN {
            return Some(HashtagPreview {
                visible: tags,
                control: PreviewControl::None,
            });
        }

        Some(if self.is_expanded(index) {
            HashtagPreview {
                visible: tags,
                control: PreviewControl::ShowLess,
            }
        } else {
            HashtagPreview {
                visible: &tags[..HASHTAG_PREVIEW_LEN],
                control: PreviewControl::ShowMore(tags.len() - HASHTAG_PREVIEW_LEN),
            }
        })
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn scenarios(&self) -> &[ScenarioRecord] {
        &self.scenarios
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_scenario(&self) -> Option<&ScenarioRecord> {
        self.selected.and_then(|i| self.scenarios.get(i))
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    pub fn chart(&self) -> &[HashtagCount] {
        &self.chart
    }

    pub fn buckets(&self) -> &HashtagBuckets {
        &self.buckets
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn results_for(&self) -> Option<&SubmissionRequest> {
        self.results_for.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HashtagSource;
    use crate::scenario::{ContentGuidance, HashtagFrequency};

    fn request(keyword: &str, tags: &[&str]) -> SubmissionRequest {
        SubmissionRequest::new(
            keyword,
            HashtagSource::Selected(tags.iter().map(|t| t.to_string()).collect()),
        )
        .unwrap()
    }

    fn scenario(title: &str, tags: &[&str]) -> ScenarioRecord {
        ScenarioRecord {
            scenario: title.into(),
            reason: format!("why {title}"),
            hashtags: tags.iter().map(|t| t.to_string()).collect(),
            content_guidance: ContentGuidance::default(),
        }
    }

    fn response(scenarios: Vec<ScenarioRecord>) -> GenerateResponse {
        GenerateResponse {
            scenarios,
            top_hashtags: None,
        }
    }

    fn loaded(scenarios: Vec<ScenarioRecord>) -> ViewState {
        let mut view = ViewState::default();
        let ticket = view.begin_submission(request("k", &[]));
        assert_eq!(view.complete(ticket, Ok(response(scenarios))), Completion::Applied);
        view
    }

    #[test]
    fn starts_empty_and_idle() {
        let view = ViewState::default();
        assert!(view.scenarios().is_empty());
        assert!(view.selected_scenario().is_none());
        assert!(!view.is_loading());
        assert!(view.error().is_none());
    }

    #[test]
    fn first_scenario_selected_by_default() {
        let view = loaded(vec![scenario("one", &[]), scenario("two", &[])]);
        assert_eq!(view.selected_index(), Some(0));
        assert_eq!(view.selected_scenario().unwrap().scenario, "one");
        assert!(!view.is_loading());
    }

    #[test]
    fn empty_response_selects_nothing_and_is_not_an_error() {
        let view = loaded(vec![]);
        assert_eq!(view.selected_index(), None);
        assert!(view.error().is_none());
    }

    #[test]
    fn preview_expands_and_collapses() {
        let mut view = loaded(vec![scenario("t", &["#a", "#b", "#c", "#d", "#e"])]);

        let preview = view.hashtag_preview(0).unwrap();
        assert_eq!(preview.visible, &["#a", "#b", "#c"]);
        assert_eq!(preview.control, PreviewControl::ShowMore(2));
        assert_eq!(preview.control.label().as_deref(), Some("+2 more"));

        assert!(view.toggle_hashtags(0));
        let preview = view.hashtag_preview(0).unwrap();
        assert_eq!(preview.visible.len(), 5);
        assert_eq!(preview.control.label().as_deref(), Some("Show less"));

        assert!(view.toggle_hashtags(0));
        let preview = view.hashtag_preview(0).unwrap();
        assert_eq!(preview.visible.len(), 3);
        assert_eq!(preview.control, PreviewControl::ShowMore(2));
    }

    #[test]
    fn short_cards_have_no_control_and_do_not_toggle() {
        let mut view = loaded(vec![scenario("t", &["#a", "#b", "#c"])]);
        assert_eq!(view.hashtag_preview(0).unwrap().control, PreviewControl::None);
        assert!(!view.toggle_hashtags(0));
        assert!(!view.is_expanded(0));
    }

    #[test]
    fn expansion_is_per_card_and_survives_selection() {
        let tags = ["#1", "#2", "#3", "#4"];
        let mut view = loaded(vec![scenario("a", &tags), scenario("b", &tags)]);

        view.toggle_hashtags(0);
        assert!(view.select(1));
        assert_eq!(view.selected_scenario().unwrap().scenario, "b");
        assert!(view.is_expanded(0));
        assert!(!view.is_expanded(1));
    }

    #[test]
    fn select_out_of_range_is_ignored() {
        let mut view = loaded(vec![scenario("a", &[])]);
        assert!(!view.select(3));
        assert_eq!(view.selected_index(), Some(0));
    }

    #[test]
    fn new_results_replace_wholesale_and_reset_selection() {
        let tags = ["#1", "#2", "#3", "#4"];
        let mut view = loaded(vec![scenario("a", &tags), scenario("b", &tags)]);
        view.select(1);
        view.toggle_hashtags(1);

        let ticket = view.begin_submission(request("again", &[]));
        view.complete(ticket, Ok(response(vec![scenario("c", &tags)])));

        assert_eq!(view.scenarios().len(), 1);
        assert_eq!(view.selected_index(), Some(0));
        assert!(!view.is_expanded(0));
        assert_eq!(view.results_for().unwrap().keyword, "again");
    }

    #[test]
    fn failure_keeps_previous_results_and_sets_banner() {
        let mut view = loaded(vec![scenario("kept", &[])]);

        let ticket = view.begin_submission(request("k2", &[]));
        assert!(view.is_loading());
        view.complete(ticket, Err("Failed to generate scenarios".into()));

        assert_eq!(view.error(), Some("Failed to generate scenarios"));
        assert!(!view.is_loading());
        assert_eq!(view.scenarios()[0].scenario, "kept");
        assert_eq!(view.results_for().unwrap().keyword, "k");
    }

    #[test]
    fn new_submission_clears_error() {
        let mut view = ViewState::default();
        let t1 = view.begin_submission(request("k", &[]));
        view.complete(t1, Err("boom".into()));
        assert!(view.error().is_some());

        let t2 = view.begin_submission(request("k", &[]));
        assert!(view.error().is_none());
        view.complete(t2, Ok(response(vec![scenario("ok", &[])])));
        assert!(view.error().is_none());
    }

    #[test]
    fn stale_outcomes_are_dropped() {
        let mut view = ViewState::default();
        let first = view.begin_submission(request("first", &[]));
        let second = view.begin_submission(request("second", &[]));
        assert!(second > first);

        view.complete(second, Ok(response(vec![scenario("fresh", &[])])));
        let late = view.complete(first, Ok(response(vec![scenario("stale", &[])])));

        assert_eq!(late, Completion::Stale);
        assert_eq!(view.scenarios()[0].scenario, "fresh");
    }

    #[test]
    fn stale_failure_does_not_stop_loading() {
        let mut view = ViewState::default();
        let first = view.begin_submission(request("first", &[]));
        let _second = view.begin_submission(request("second", &[]));

        assert_eq!(view.complete(first, Err("late".into())), Completion::Stale);
        assert!(view.is_loading());
        assert!(view.error().is_none());
    }

    #[test]
    fn chart_and_buckets_follow_response() {
        let mut view = ViewState::new(2);
        let ticket = view.begin_submission(request("k", &["#mine"]));
        view.complete(
            ticket,
            Ok(GenerateResponse {
                scenarios: vec![scenario("a", &["#mine", "#x"])],
                top_hashtags: Some(vec![
                    HashtagFrequency::new("a", 5),
                    HashtagFrequency::new("b", 9),
                    HashtagFrequency::new("c", 1),
                ]),
            }),
        );

        let chart: Vec<_> = view.chart().iter().map(|c| (c.name.as_str(), c.count)).collect();
        assert_eq!(chart, vec![("b", 9), ("a", 5)]);
        assert_eq!(view.buckets().related, vec!["#mine"]);
        assert_eq!(view.buckets().niche, vec!["#x"]);
    }
}

//! Main application state and render loop.

use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use scenegen_client::GenerationClient;
use scenegen_core::request::SubmissionRequest;
use scenegen_core::view::{Completion, ViewState};
use scenegen_core::ScenegenConfig;

use crate::action::{Action, InputMode, Screen};
use crate::components::hashtag_trends::HashtagTrendsComponent;
use crate::components::help::HelpComponent;
use crate::components::keyword_form::KeywordFormComponent;
use crate::components::scenario_board::ScenarioBoardComponent;
use crate::components::status_bar::StatusBarComponent;
use crate::components::Component;
use crate::event::{self, EventHandler, InputModeFlag};
use crate::theme::Theme;

/// Main application state.
pub struct App {
    /// Current active screen.
    current_screen: Screen,
    /// Whether the app should exit.
    should_quit: bool,
    /// Shared flag to tell the EventHandler which key-mapping to use.
    input_mode_flag: InputModeFlag,

    /// HTTP client for the generation service (shared across async tasks).
    client: Arc<GenerationClient>,
    /// Results, selection, loading and error state.
    view: ViewState,

    // Components
    keyword_form: KeywordFormComponent,
    scenario_board: ScenarioBoardComponent,
    hashtag_trends: HashtagTrendsComponent,
    status_bar: StatusBarComponent,
    help: HelpComponent,
}

impl App {
    pub fn new(config: &ScenegenConfig) -> Self {
        let client = GenerationClient::new(config.service.base_url.clone(), config.timeout());
        Self {
            current_screen: Screen::Compose,
            should_quit: false,
            input_mode_flag: event::new_input_mode_flag(),
            client: Arc::new(client),
            view: ViewState::new(config.chart.top_n),
            keyword_form: KeywordFormComponent::new(
                config.hashtags.options.clone(),
                config.hashtags.input,
            ),
            scenario_board: ScenarioBoardComponent::new(),
            hashtag_trends: HashtagTrendsComponent::new(),
            status_bar: StatusBarComponent::new(),
            help: HelpComponent::new(),
        }
    }

    /// Pre-fill the keywords from CLI args.
    pub fn set_initial_keyword(&mut self, keyword: String) {
        self.keyword_form.keyword_input = keyword;
    }

    /// Pre-fill free-text hashtags from CLI args.
    pub fn set_initial_hashtags(&mut self, hashtags: String) {
        self.keyword_form.set_free_text(hashtags);
    }

    /// Run the TUI application.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Set up terminal.
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Create the action channel.
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

        // Start the event handler with the shared input mode flag.
        let event_tx = tx.clone();
        let mode_flag = self.input_mode_flag.clone();
        let event_handler = EventHandler::new(event_tx, Duration::from_millis(100), mode_flag);
        tokio::spawn(async move {
            event_handler.run().await;
        });

        info!(url = %self.client.base_url(), "Generation service configured");

        // Compose starts in editing mode.
        self.sync_input_mode();

        // Main loop.
        loop {
            terminal.draw(|frame| {
                self.render(frame);
            })?;

            if let Some(action) = rx.recv().await {
                self.handle_action(&action, &tx);

                if self.should_quit {
                    break;
                }
            }
        }

        // Restore terminal.
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Determine and set the correct input mode based on the current screen
    /// and component state. Called after every action.
    fn sync_input_mode(&self) {
        let mode = self.current_input_mode();
        event::set_input_mode(&self.input_mode_flag, mode);
    }

    /// What input mode should be active right now?
    fn current_input_mode(&self) -> InputMode {
        if self.help.visible {
            return InputMode::Normal;
        }

        match self.current_screen {
            Screen::Compose if self.keyword_form.wants_input() => InputMode::Editing,
            _ => InputMode::Normal,
        }
    }

    fn go_to(&mut self, screen: Screen) {
        self.current_screen = screen;
        self.status_bar.current_screen = screen;
    }

    /// Dispatch an action to all relevant components.
    fn handle_action(&mut self, action: &Action, tx: &mpsc::UnboundedSender<Action>) {
        // While help is open, keys only close it.
        if self.help.visible && is_key_action(action) {
            self.help.handle_action(action, &self.view);
            self.sync_input_mode();
            return;
        }

        // Global actions first.
        match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::GoToScreen(screen) => self.go_to(*screen),
            Action::NextScreen => {
                if let Some(next) = self.current_screen.next() {
                    self.go_to(next);
                }
            }
            Action::PrevScreen => {
                if let Some(prev) = self.current_screen.prev() {
                    self.go_to(prev);
                }
            }
            Action::Submit(request) => {
                self.spawn_generate(request.clone(), tx.clone());
            }
            Action::GenerationFinished { ticket, outcome } => {
                let outcome = outcome.clone().map(|response| *response);
                match self.view.complete(*ticket, outcome) {
                    Completion::Stale => {
                        debug!(ticket = ticket.value(), "Dropping outcome of superseded request");
                    }
                    Completion::Applied => self.on_generation_applied(tx),
                }
            }
            Action::SelectScenario(index) => {
                self.view.select(*index);
            }
            Action::ToggleHashtags(index) => {
                self.view.toggle_hashtags(*index);
            }
            _ => {}
        }

        // Forward to the active screen component. The form also needs
        // ticks for its spinner when another screen is showing.
        let result = match self.current_screen {
            Screen::Compose => self.keyword_form.handle_action(action, &self.view),
            Screen::Scenarios => self.scenario_board.handle_action(action, &self.view),
            Screen::Trends => self.hashtag_trends.handle_action(action, &self.view),
        };
        if self.current_screen != Screen::Compose && matches!(action, Action::Tick) {
            self.keyword_form.handle_action(action, &self.view);
        }

        // Always forward to overlays and status bar.
        self.help.handle_action(action, &self.view);
        self.status_bar.handle_action(action, &self.view);

        self.sync_input_mode();

        // Handle chained actions from components.
        if let Some(chained) = result {
            self.handle_action(&chained, tx);
        }
    }

    /// Status and navigation once the latest request's outcome is on screen.
    fn on_generation_applied(&mut self, tx: &mpsc::UnboundedSender<Action>) {
        if let Some(message) = self.view.error() {
            let _ = tx.send(Action::SetStatus(message.to_string()));
            return;
        }

        self.scenario_board.reset();
        let count = self.view.scenarios().len();
        if count == 0 {
            let _ = tx.send(Action::SetStatus(
                "No scenarios returned. Try other keywords.".to_string(),
            ));
            return;
        }

        self.go_to(Screen::Scenarios);
        let _ = tx.send(Action::SetStatus(format!("Generated {count} scenarios")));
    }

    // ── Async task spawners ─────────────────────────────────────

    /// Spawn a task that submits the request to the generation service.
    fn spawn_generate(&mut self, request: SubmissionRequest, tx: mpsc::UnboundedSender<Action>) {
        if self.view.is_loading() {
            let _ = tx.send(Action::SetStatus(
                "A generation is already in progress".to_string(),
            ));
            return;
        }

        let ticket = self.view.begin_submission(request.clone());
        let _ = tx.send(Action::SetStatus("Generating scenarios...".to_string()));
        let client = self.client.clone();

        tokio::spawn(async move {
            let outcome = match client.generate(&request).await {
                Ok(response) => {
                    info!(
                        ticket = ticket.value(),
                        scenarios = response.scenarios.len(),
                        "Generation finished"
                    );
                    Ok(Box::new(response))
                }
                Err(e) => {
                    error!(ticket = ticket.value(), "Generation failed: {}", e);
                    Err(e.to_string())
                }
            };
            let _ = tx.send(Action::GenerationFinished { ticket, outcome });
        });
    }

    /// Render the full UI.
    fn render(&self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(2), // Tab bar
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.render_tabs(frame, chunks[0]);

        match self.current_screen {
            Screen::Compose => self.keyword_form.render(&self.view, frame, chunks[1]),
            Screen::Scenarios => self.scenario_board.render(&self.view, frame, chunks[1]),
            Screen::Trends => self.hashtag_trends.render(&self.view, frame, chunks[1]),
        }

        self.status_bar.render(&self.view, frame, chunks[2]);

        // Overlays (rendered on top)
        self.help.render(&self.view, frame, area);
    }

    /// Render the screen tab bar.
    fn render_tabs(&self, frame: &mut ratatui::Frame, area: Rect) {
        let titles: Vec<Line> = Screen::all()
            .iter()
            .map(|screen| {
                let style = if *screen == self.current_screen {
                    Theme::tab_active()
                } else {
                    Theme::tab_inactive()
                };
                Line::from(Span::styled(screen.label(), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.current_screen.index())
            .divider(Span::styled(" | ", Theme::dim()))
            .highlight_style(Theme::tab_active());

        frame.render_widget(tabs, area);
    }
}

/// Actions that come from a key press rather than from a task or timer.
fn is_key_action(action: &Action) -> bool {
    !matches!(
        action,
        Action::Tick
            | Action::Quit
            | Action::ToggleHelp
            | Action::SetStatus(_)
            | Action::ClearStatus
            | Action::Submit(_)
            | Action::GenerationFinished { .. }
            | Action::SelectScenario(_)
            | Action::ToggleHashtags(_)
    )
}

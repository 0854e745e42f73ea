// Terminal front end: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest `AppSnapshot` plus purely
// local state (input buffer, cursor, citation focus, open viewer). The app
// orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use maester_api::config::DEFAULT_BASE_URL;
use maester_app::{AppSnapshot, UiConfig, UiUpdate, UserCommand};
use maester_core::source::source_document_url;
use maester_core::{Citation, QueryResult, Session, SessionId};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
pub struct ViewState {
    /// Latest snapshot pushed by the orchestrator.
    pub snapshot: AppSnapshot,
    /// Transient message shown in the status bar until the next key press.
    pub notice: Option<String>,
    /// Search input buffer.
    pub input: String,
    /// Whether keystrokes go to the search input.
    pub edit_mode: bool,
    /// Citations requested for the next question.
    pub k: u8,
    /// Show relevance scores on citation cards.
    pub advanced: bool,
    /// Highlighted row in the session sidebar.
    pub sidebar_cursor: usize,
    /// Focused citation card (index into the current result's citations).
    pub citation_focus: usize,
    /// Citation open in the source viewer.
    pub viewer: Option<usize>,
    /// Vertical scroll of the content area.
    pub content_scroll: u16,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
    pub sample_questions: Vec<String>,
    pub base_url: String,
    pub document_path: String,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(&UiConfig::default(), DEFAULT_BASE_URL)
    }
}

impl ViewState {
    pub fn new(ui: &UiConfig, base_url: &str) -> Self {
        ViewState {
            snapshot: AppSnapshot::default(),
            notice: None,
            input: String::new(),
            edit_mode: false,
            k: ui.default_k,
            advanced: false,
            sidebar_cursor: 0,
            citation_focus: 0,
            viewer: None,
            content_scroll: 0,
            confirm_quit: false,
            sample_questions: ui.sample_questions.clone(),
            base_url: base_url.to_string(),
            document_path: ui.document_path.clone(),
        }
    }

    /// Apply a full state snapshot from the app orchestrator.
    ///
    /// When the current session changes, the input is pre-filled with its
    /// query and all per-answer view state (focus, viewer, scroll) resets.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        let current_changed = snapshot.current != self.snapshot.current;
        self.snapshot = snapshot;

        if current_changed {
            self.citation_focus = 0;
            self.viewer = None;
            self.content_scroll = 0;
            if !self.edit_mode {
                self.input = self
                    .current_session()
                    .map(|s| s.query.clone())
                    .unwrap_or_default();
            }
            if let Some(index) = self.current_index() {
                self.sidebar_cursor = index;
            }
        }

        let last = self.snapshot.sessions.len().saturating_sub(1);
        self.sidebar_cursor = self.sidebar_cursor.min(last);

        // A viewer can only stay open on a citation that still exists.
        let citation_count = self.current_result().map_or(0, |r| r.citations.len());
        if self.viewer.is_some_and(|i| i >= citation_count) {
            self.viewer = None;
        }
        self.citation_focus = self.citation_focus.min(citation_count.saturating_sub(1));
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.snapshot.current_session()
    }

    pub fn current_result(&self) -> Option<&QueryResult> {
        self.current_session().and_then(Session::result)
    }

    /// Position of the current session in the (newest first) list.
    fn current_index(&self) -> Option<usize> {
        let id = self.snapshot.current.as_ref()?;
        self.snapshot.sessions.iter().position(|s| &s.id == id)
    }

    /// Session under the sidebar cursor.
    pub fn highlighted_session(&self) -> Option<&SessionId> {
        self.snapshot
            .sessions
            .get(self.sidebar_cursor)
            .map(|s| &s.id)
    }

    pub fn viewer_citation(&self) -> Option<&Citation> {
        let index = self.viewer?;
        self.current_result()?.citation(index)
    }

    /// Link into the source PDF at the passage a citation quotes.
    pub fn source_url(&self, citation: &Citation) -> String {
        source_document_url(&self.base_url, &self.document_path, citation)
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::Notice(message) => {
            state.notice = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete screen.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::sidebar::render(frame, layout.sidebar, state);
    widgets::search_input::render(frame, layout.search_input, state);
    match state.current_session() {
        Some(session) => widgets::answer::render(frame, layout.content, state, session),
        None => widgets::welcome::render(frame, layout.content, state),
    }
    render_help_bar(frame, &layout, state);

    if let Some(citation) = state.viewer_citation() {
        widgets::source_viewer::render(frame, frame.area(), state, citation);
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

/// Key hints for the current mode.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.confirm_quit {
        " y:Quit | n/Esc:Cancel"
    } else if state.edit_mode {
        " Enter:Ask | Esc:Stop editing"
    } else if state.viewer.is_some() {
        " Esc:Close | 1-9:Other source | q:Quit"
    } else if state.current_session().is_none() {
        " i:Ask | 1-9:Sample question | +/-:Citations | j/k:History | Enter:Open | q:Quit"
    } else {
        " i:Ask | n:New | Tab:Focus | o/1-9:Source | u/d:Feedback | a:Scores | +/-:k | q:Quit"
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break,
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

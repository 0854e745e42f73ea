// Message types passed between the TUI, the orchestrator and query tasks.

use maester_api::RequestError;
use maester_core::{FeedbackVote, QueryResult, Session, SessionId};

// ---------------------------------------------------------------------------
// TUI -> App
// ---------------------------------------------------------------------------

/// Commands sent from the TUI to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Ask a new question with `k` citations.
    SubmitQuery { query: String, k: u8 },
    /// Make an existing session the current one.
    SelectSession(SessionId),
    /// Return to the welcome screen.
    NewChat,
    /// Toggle a vote on the current session's answer.
    Feedback(FeedbackVote),
    Quit,
}

// ---------------------------------------------------------------------------
// Query tasks -> App
// ---------------------------------------------------------------------------

/// Events produced by spawned backend requests.
#[derive(Debug)]
pub enum ApiEvent {
    QueryCompleted {
        session_id: SessionId,
        outcome: Result<QueryResult, RequestError>,
    },
}

// ---------------------------------------------------------------------------
// App -> TUI
// ---------------------------------------------------------------------------

/// Everything the TUI needs to draw the session list and the current answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSnapshot {
    /// Newest first.
    pub sessions: Vec<Session>,
    pub current: Option<SessionId>,
    /// Vote recorded for the current session, if any.
    pub feedback: Option<FeedbackVote>,
    /// Sessions still waiting on the backend.
    pub in_flight: usize,
}

impl AppSnapshot {
    pub fn current_session(&self) -> Option<&Session> {
        let id = self.current.as_ref()?;
        self.sessions.iter().find(|s| &s.id == id)
    }
}

/// Updates pushed from the application to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    Snapshot(Box<AppSnapshot>),
    /// Transient message for the status bar (e.g. a rejected submission).
    Notice(String),
}

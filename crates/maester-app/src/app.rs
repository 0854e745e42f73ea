// Application orchestrator: owns the session list and feedback votes, spawns
// backend requests and pushes snapshots to the TUI.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use maester_api::protocol::QueryRequest;
use maester_api::{QueryBackend, RequestError};
use maester_core::{
    FeedbackLedger, FeedbackVote, QueryResult, SessionId, SessionManager, Transition,
};

use crate::config::Config;
use crate::protocol::{ApiEvent, AppSnapshot, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Central application state, owned by the event loop task.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionManager,
    pub feedback: FeedbackLedger,
    backend: Arc<dyn QueryBackend>,
    /// Completed queries are reported back through this channel.
    api_tx: mpsc::Sender<ApiEvent>,
}

impl AppState {
    pub fn new(
        config: Config,
        backend: Arc<dyn QueryBackend>,
        api_tx: mpsc::Sender<ApiEvent>,
    ) -> Self {
        AppState {
            config,
            sessions: SessionManager::new(),
            feedback: FeedbackLedger::new(),
            backend,
            api_tx,
        }
    }

    /// Validate a question, open a loading session for it and send it to the
    /// backend on a background task.
    ///
    /// Invalid input is rejected before any session exists. Other sessions
    /// are never touched; several queries may be in flight at once.
    pub fn submit_query(&mut self, query: String, k: u8) -> Result<SessionId, RequestError> {
        QueryRequest::new(&query, k)?;

        let session_id = self.sessions.create(query.clone(), k);
        info!("Submitting query for session {} (k={})", session_id, k);

        let backend = Arc::clone(&self.backend);
        let tx = self.api_tx.clone();
        let id = session_id.clone();
        tokio::spawn(async move {
            let outcome = backend.submit_query(&query, k).await;
            if tx
                .send(ApiEvent::QueryCompleted {
                    session_id: id,
                    outcome,
                })
                .await
                .is_err()
            {
                debug!("Event loop gone before query completed");
            }
        });

        Ok(session_id)
    }

    /// Settle the session a finished request belongs to.
    pub fn apply_query_outcome(
        &mut self,
        session_id: &SessionId,
        outcome: Result<QueryResult, RequestError>,
    ) -> Transition {
        let transition = match outcome {
            Ok(result) => {
                let transition = self.sessions.resolve(session_id, result);
                if transition == Transition::Applied {
                    info!("Session {} resolved", session_id);
                }
                transition
            }
            Err(e) => {
                let transition = self.sessions.fail(session_id, e.to_string());
                if transition == Transition::Applied {
                    warn!("Session {} failed: {}", session_id, e);
                }
                transition
            }
        };

        if transition != Transition::Applied {
            debug!(
                "Ignoring completion for session {}: {:?}",
                session_id, transition
            );
        }
        transition
    }

    /// Toggle a vote on the current session's answer and report the new state
    /// to the backend in the background.
    ///
    /// Returns `None` (and records nothing) when there is no resolved answer
    /// to vote on. Backend failures are logged and otherwise ignored.
    pub fn toggle_feedback(&mut self, vote: FeedbackVote) -> Option<JoinHandle<()>> {
        let session = self.sessions.current()?;
        let Some(result) = session.result().cloned() else {
            debug!("No answer to rate for session {}", session.id);
            return None;
        };
        let session_id = session.id.clone();

        let new_vote = self.feedback.toggle(&session_id, vote);
        info!("Feedback for session {}: {:?}", session_id, new_vote);

        let backend = Arc::clone(&self.backend);
        Some(tokio::spawn(async move {
            if let Err(e) = backend
                .submit_feedback(new_vote, &result, Utc::now())
                .await
            {
                warn!("Failed to submit feedback for session {}: {}", session_id, e);
            }
        }))
    }

    pub fn select_session(&mut self, id: &SessionId) -> bool {
        let found = self.sessions.select_current(id);
        if !found {
            warn!("Cannot select unknown session {}", id);
        }
        found
    }

    pub fn new_chat(&mut self) {
        self.sessions.start_new();
    }

    pub fn build_snapshot(&self) -> AppSnapshot {
        let current = self.sessions.current_id().cloned();
        let feedback = current.as_ref().and_then(|id| self.feedback.vote(id));
        AppSnapshot {
            sessions: self.sessions.sessions().to_vec(),
            current,
            feedback,
            in_flight: self.sessions.in_flight(),
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. Completed backend requests
/// 2. User commands from the TUI
///
/// Pushes a fresh snapshot through `ui_tx` after every state change.
pub async fn run(
    mut api_rx: mpsc::Receiver<ApiEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    if state.config.api.uses_default_key() {
        warn!("Using the default development API key; set MAESTER_API_KEY for real deployments");
    }

    let mut api_open = true;
    send_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            // --- Backend completions ---
            event = api_rx.recv(), if api_open => {
                match event {
                    Some(ApiEvent::QueryCompleted { session_id, outcome }) => {
                        if state.apply_query_outcome(&session_id, outcome) == Transition::Applied {
                            send_snapshot(&state, &ui_tx).await;
                        }
                    }
                    None => {
                        info!("API channel closed");
                        api_open = false;
                    }
                }
            }

            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::SubmitQuery { query, k } => {
            if let Err(e) = state.submit_query(query, k) {
                warn!("Rejected query: {}", e);
                let _ = ui_tx.send(UiUpdate::Notice(e.to_string())).await;
                return;
            }
        }
        UserCommand::SelectSession(id) => {
            if !state.select_session(&id) {
                return;
            }
        }
        UserCommand::NewChat => {
            state.new_chat();
        }
        UserCommand::Feedback(vote) => {
            if state.toggle_feedback(vote).is_none() {
                return;
            }
        }
        UserCommand::Quit => {}
    }
    send_snapshot(state, ui_tx).await;
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

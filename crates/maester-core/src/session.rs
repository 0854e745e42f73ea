// Session list state container.
//
// Every transition is a plain method on `SessionManager`; there is no I/O and
// no clock access except in the `create` convenience wrapper. Completions are
// keyed by session id, and a session that has already settled can never be
// changed again, so a late response cannot flip a session the user has moved
// away from.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::QueryResult;

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Opaque session identifier: the creation time in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        SessionId(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Lifecycle of a single query: `Loading` settles exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Loading,
    Resolved(QueryResult),
    Failed(String),
}

/// One query/answer exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub query: String,
    /// Number of citations requested.
    pub k: u8,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
}

impl Session {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, SessionStatus::Loading)
    }

    pub fn result(&self) -> Option<&QueryResult> {
        match &self.status {
            SessionStatus::Resolved(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Outcome of a `resolve` or `fail` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The session had already resolved or failed; nothing changed.
    AlreadySettled,
    UnknownSession,
}

// ---------------------------------------------------------------------------
// SessionManager
// ---------------------------------------------------------------------------

/// Owns the session history and the "current session" pointer.
#[derive(Debug, Default)]
pub struct SessionManager {
    /// Newest first.
    sessions: Vec<Session>,
    current: Option<SessionId>,
    last_id_millis: Option<i64>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new loading session stamped with the current time.
    pub fn create(&mut self, query: impl Into<String>, k: u8) -> SessionId {
        self.create_at(query, k, Utc::now())
    }

    /// Start a new loading session and make it current.
    pub fn create_at(&mut self, query: impl Into<String>, k: u8, now: DateTime<Utc>) -> SessionId {
        let mut millis = now.timestamp_millis();
        if let Some(last) = self.last_id_millis {
            if millis <= last {
                millis = last + 1;
            }
        }
        self.last_id_millis = Some(millis);

        let id = SessionId(millis.to_string());
        self.sessions.insert(
            0,
            Session {
                id: id.clone(),
                query: query.into(),
                k,
                created_at: now,
                status: SessionStatus::Loading,
            },
        );
        self.current = Some(id.clone());
        id
    }

    /// Attach a result to a loading session.
    pub fn resolve(&mut self, id: &SessionId, result: QueryResult) -> Transition {
        self.settle(id, SessionStatus::Resolved(result))
    }

    /// Attach an error message to a loading session.
    pub fn fail(&mut self, id: &SessionId, error: impl Into<String>) -> Transition {
        self.settle(id, SessionStatus::Failed(error.into()))
    }

    fn settle(&mut self, id: &SessionId, status: SessionStatus) -> Transition {
        let Some(session) = self.sessions.iter_mut().find(|s| &s.id == id) else {
            debug!(session = %id, "completion for unknown session ignored");
            return Transition::UnknownSession;
        };
        if !session.is_loading() {
            debug!(session = %id, "completion for settled session ignored");
            return Transition::AlreadySettled;
        }
        session.status = status;
        Transition::Applied
    }

    /// Point the view at an existing session. Unknown ids leave the pointer as is.
    pub fn select_current(&mut self, id: &SessionId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.current = Some(id.clone());
        true
    }

    /// Return to the empty welcome view, keeping history.
    pub fn start_new(&mut self) {
        self.current = None;
    }

    pub fn current_id(&self) -> Option<&SessionId> {
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    /// All sessions, newest first.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Number of sessions still waiting on the backend.
    pub fn in_flight(&self) -> usize {
        self.sessions.iter().filter(|s| s.is_loading()).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Citation;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn result(answer: &str) -> QueryResult {
        QueryResult::new("q", answer, None, vec![Citation::new("Section 1", "text")])
    }

    #[test]
    fn create_inserts_loading_session_and_makes_it_current() {
        let mut manager = SessionManager::new();
        let id = manager.create_at("Who rules?", 2, at(1_700_000_000_000));

        assert_eq!(id.as_str(), "1700000000000");
        let current = manager.current().unwrap();
        assert_eq!(current.id, id);
        assert_eq!(current.query, "Who rules?");
        assert_eq!(current.k, 2);
        assert!(current.is_loading());
        assert!(current.result().is_none());
        assert!(current.error().is_none());
    }

    #[test]
    fn sessions_are_newest_first() {
        let mut manager = SessionManager::new();
        let first = manager.create_at("first", 2, at(1_000));
        let second = manager.create_at("second", 2, at(2_000));

        let ids: Vec<&SessionId> = manager.sessions().iter().map(|s| &s.id).collect();
        assert_eq!(ids, vec![&second, &first]);
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut manager = SessionManager::new();
        let a = manager.create_at("a", 1, at(5_000));
        let b = manager.create_at("b", 1, at(5_000));
        let c = manager.create_at("c", 1, at(4_000));

        assert_eq!(a.as_str(), "5000");
        assert_eq!(b.as_str(), "5001");
        assert_eq!(c.as_str(), "5002");
    }

    #[test]
    fn resolve_settles_loading_session() {
        let mut manager = SessionManager::new();
        let id = manager.create_at("q", 2, at(1));

        assert_eq!(manager.resolve(&id, result("answer")), Transition::Applied);
        let session = manager.get(&id).unwrap();
        assert!(!session.is_loading());
        assert_eq!(session.result().unwrap().answer_text, "answer");
    }

    #[test]
    fn fail_records_error_message() {
        let mut manager = SessionManager::new();
        let id = manager.create_at("q", 2, at(1));

        assert_eq!(manager.fail(&id, "index unavailable"), Transition::Applied);
        let session = manager.get(&id).unwrap();
        assert!(!session.is_loading());
        assert_eq!(session.error(), Some("index unavailable"));
    }

    #[test]
    fn settled_sessions_reject_late_updates() {
        let mut manager = SessionManager::new();
        let id = manager.create_at("q", 2, at(1));
        manager.resolve(&id, result("first"));

        assert_eq!(manager.resolve(&id, result("late")), Transition::AlreadySettled);
        assert_eq!(manager.fail(&id, "late error"), Transition::AlreadySettled);
        assert_eq!(manager.get(&id).unwrap().result().unwrap().answer_text, "first");
    }

    #[test]
    fn unknown_session_is_reported() {
        let mut manager = SessionManager::new();
        let missing = SessionId::from("42");
        assert_eq!(manager.resolve(&missing, result("a")), Transition::UnknownSession);
        assert_eq!(manager.fail(&missing, "e"), Transition::UnknownSession);
    }

    #[test]
    fn completion_is_keyed_by_id_not_current() {
        let mut manager = SessionManager::new();
        let older = manager.create_at("older", 2, at(1));
        let newer = manager.create_at("newer", 2, at(2));

        manager.resolve(&older, result("older answer"));

        assert_eq!(manager.current_id(), Some(&newer));
        assert!(manager.get(&newer).unwrap().is_loading());
        assert_eq!(
            manager.get(&older).unwrap().result().unwrap().answer_text,
            "older answer"
        );
        assert_eq!(manager.in_flight(), 1);
    }

    #[test]
    fn select_current_does_not_mutate_sessions() {
        let mut manager = SessionManager::new();
        let first = manager.create_at("first", 2, at(1));
        manager.resolve(&first, result("a"));
        manager.create_at("second", 2, at(2));
        let before = manager.sessions().to_vec();

        assert!(manager.select_current(&first));
        assert_eq!(manager.current_id(), Some(&first));
        assert_eq!(manager.sessions(), before.as_slice());
    }

    #[test]
    fn select_unknown_keeps_pointer() {
        let mut manager = SessionManager::new();
        let id = manager.create_at("q", 2, at(1));
        assert!(!manager.select_current(&SessionId::from("nope")));
        assert_eq!(manager.current_id(), Some(&id));
    }

    #[test]
    fn start_new_clears_pointer_but_keeps_history() {
        let mut manager = SessionManager::new();
        manager.create_at("q", 2, at(1));
        manager.start_new();

        assert!(manager.current().is_none());
        assert_eq!(manager.len(), 1);
    }
}

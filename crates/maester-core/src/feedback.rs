// Per-session thumbs up/down state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::session::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackVote {
    Positive,
    Negative,
}

/// Votes currently shown for each session.
#[derive(Debug, Default)]
pub struct FeedbackLedger {
    votes: HashMap<SessionId, FeedbackVote>,
}

impl FeedbackLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a click on `vote`. Clicking the active vote again clears it.
    ///
    /// Returns the vote that should now be submitted; `None` means the vote
    /// was withdrawn.
    pub fn toggle(&mut self, id: &SessionId, vote: FeedbackVote) -> Option<FeedbackVote> {
        if self.votes.get(id) == Some(&vote) {
            self.votes.remove(id);
            None
        } else {
            self.votes.insert(id.clone(), vote);
            Some(vote)
        }
    }

    pub fn vote(&self, id: &SessionId) -> Option<FeedbackVote> {
        self.votes.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_sets_switches_and_clears() {
        let mut ledger = FeedbackLedger::new();
        let id = SessionId::from("1");

        assert_eq!(ledger.toggle(&id, FeedbackVote::Positive), Some(FeedbackVote::Positive));
        assert_eq!(ledger.vote(&id), Some(FeedbackVote::Positive));

        assert_eq!(ledger.toggle(&id, FeedbackVote::Negative), Some(FeedbackVote::Negative));
        assert_eq!(ledger.vote(&id), Some(FeedbackVote::Negative));

        assert_eq!(ledger.toggle(&id, FeedbackVote::Negative), None);
        assert_eq!(ledger.vote(&id), None);
    }

    #[test]
    fn votes_are_per_session() {
        let mut ledger = FeedbackLedger::new();
        let a = SessionId::from("1");
        let b = SessionId::from("2");
        ledger.toggle(&a, FeedbackVote::Positive);
        assert_eq!(ledger.vote(&b), None);
    }

    #[test]
    fn vote_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FeedbackVote::Positive).unwrap(),
            "\"positive\""
        );
        assert_eq!(
            serde_json::to_string(&Some(FeedbackVote::Negative)).unwrap(),
            "\"negative\""
        );
        assert_eq!(serde_json::to_string(&None::<FeedbackVote>).unwrap(), "null");
    }
}

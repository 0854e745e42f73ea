// Wire types for the backend's `/query` and `/feedback` endpoints.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use maester_core::{FeedbackVote, QueryResult};

use crate::error::RequestError;

/// Smallest number of citations a query may request.
pub const MIN_K: u8 = 1;
/// Largest number of citations a query may request.
pub const MAX_K: u8 = 5;

/// Response envelope wrapped around every backend payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub errors: Option<Value>,
}

/// `POST /query` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub k: u8,
}

impl QueryRequest {
    /// Validate and build a query body. The query text is sent as typed.
    pub fn new(query: &str, k: u8) -> Result<Self, RequestError> {
        if query.trim().is_empty() {
            return Err(RequestError::invalid_input("Please enter a question."));
        }
        if !(MIN_K..=MAX_K).contains(&k) {
            return Err(RequestError::invalid_input(format!(
                "Number of citations must be between {MIN_K} and {MAX_K}, got {k}."
            )));
        }
        Ok(QueryRequest {
            query: query.to_string(),
            k,
        })
    }
}

/// `POST /feedback` body.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest<'a> {
    /// `null` when a vote is withdrawn.
    pub feedback: Option<FeedbackVote>,
    pub result: &'a QueryResult,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
}

impl<'a> FeedbackRequest<'a> {
    pub fn new(
        feedback: Option<FeedbackVote>,
        result: &'a QueryResult,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        FeedbackRequest {
            feedback,
            result,
            timestamp: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Pick the user-facing message out of an error response body.
///
/// Uses `message` (or FastAPI's `detail` when it is a string) and falls back
/// to the status reason phrase.
pub fn error_message_from_body(status: reqwest::StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["message", "detail"].iter().find_map(|key| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
    });

    from_body.unwrap_or_else(|| match status.canonical_reason() {
        Some(reason) => format!("Error: {reason}"),
        None => format!("Error: {}", status.as_u16()),
    })
}

// HTTP client for the legal Q&A backend.
//
// Two calls: `POST /query` returns a `QueryResult` inside the standard response
// envelope, `POST /feedback` records a vote and is only checked for success.
// Every failure is folded into `RequestError` with a message fit for display.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, warn};

use maester_core::{FeedbackVote, QueryResult};

use crate::config::ApiConfig;
use crate::error::RequestError;
use crate::protocol::{error_message_from_body, ApiEnvelope, FeedbackRequest, QueryRequest};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const QUERY_PATH: &str = "/query";
const FEEDBACK_PATH: &str = "/feedback";
const API_KEY_HEADER: &str = "X-API-Key";

const DECODE_ERROR_MESSAGE: &str = "The server returned a response that could not be read.";
const MISSING_DATA_MESSAGE: &str = "The server response did not include an answer.";

// ---------------------------------------------------------------------------
// QueryBackend
// ---------------------------------------------------------------------------

/// The two remote operations the client depends on.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Ask a question and wait for the complete answer.
    async fn submit_query(&self, query: &str, k: u8) -> Result<QueryResult, RequestError>;

    /// Record (or withdraw, with `None`) a vote on an answer.
    async fn submit_feedback(
        &self,
        vote: Option<FeedbackVote>,
        result: &QueryResult,
        submitted_at: DateTime<Utc>,
    ) -> Result<(), RequestError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// reqwest-backed implementation of [`QueryBackend`].
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, RequestError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RequestError::Client {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// POST a JSON body and return the response if its status is a success.
    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, RequestError> {
        let url = self.config.endpoint(path);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(%url, error = %e, "request did not reach the backend");
                RequestError::network()
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message_from_body(status, &text);
        warn!(%url, status = status.as_u16(), %message, "backend returned an error status");
        Err(RequestError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl QueryBackend for ApiClient {
    async fn submit_query(&self, query: &str, k: u8) -> Result<QueryResult, RequestError> {
        let body = QueryRequest::new(query, k)?;
        debug!(k, query_len = query.len(), "submitting query");

        let response = self.post(QUERY_PATH, &body).await?;
        let envelope: ApiEnvelope<QueryResult> = response.json().await.map_err(|e| {
            warn!(error = %e, "failed to decode query response");
            RequestError::Decode {
                message: DECODE_ERROR_MESSAGE.to_string(),
            }
        })?;

        let result = envelope.data.ok_or_else(|| RequestError::Decode {
            message: MISSING_DATA_MESSAGE.to_string(),
        })?;
        debug!(citations = result.citations.len(), "query answered");
        Ok(result)
    }

    async fn submit_feedback(
        &self,
        vote: Option<FeedbackVote>,
        result: &QueryResult,
        submitted_at: DateTime<Utc>,
    ) -> Result<(), RequestError> {
        let body = FeedbackRequest::new(vote, result, submitted_at);
        self.post(FEEDBACK_PATH, &body).await?;
        debug!(?vote, "feedback accepted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

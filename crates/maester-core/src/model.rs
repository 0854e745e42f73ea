// Answer payload types shared by the API client, the orchestrator and the TUI.
//
// `QueryResult` is deserialized from the backend's snake_case JSON. The
// optional `response_segments` array is resolved into an `AnswerBody` once,
// at ingestion, so nothing downstream has to branch on its presence again.

use serde::{Deserialize, Serialize};

/// Relevance scores above this value are shown as a strong match.
pub const HIGH_RELEVANCE_THRESHOLD: f64 = 0.8;

// ---------------------------------------------------------------------------
// Citation
// ---------------------------------------------------------------------------

/// A source passage backing part of an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Human-readable source label, e.g. "Section 5".
    pub source: String,
    /// The quoted passage.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub page: Option<u32>,
    /// Retrieval score in [0, 1], when the backend reports one.
    #[serde(default, rename = "score")]
    pub relevance_score: Option<f64>,
}

/// Coarse bucket for a citation's relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Moderate,
}

impl Citation {
    /// Build a citation with only a source label and passage.
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Citation {
            source: source.into(),
            text: text.into(),
            page: None,
            relevance_score: None,
        }
    }

    pub fn score_band(&self) -> Option<ScoreBand> {
        self.relevance_score.map(|score| {
            if score > HIGH_RELEVANCE_THRESHOLD {
                ScoreBand::High
            } else {
                ScoreBand::Moderate
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Segment / AnswerBody
// ---------------------------------------------------------------------------

/// One contiguous slice of a pre-segmented answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    /// Zero-based index into the owning result's citations. Signed so that
    /// malformed negative indices survive deserialization and degrade to text.
    #[serde(default)]
    pub citation_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_text: Option<String>,
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment {
            text: text.into(),
            citation_index: None,
            citation_text: None,
        }
    }

    pub fn citation(text: impl Into<String>, index: i64) -> Self {
        Segment {
            text: text.into(),
            citation_index: Some(index),
            citation_text: None,
        }
    }
}

/// How the answer text reached us.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerBody {
    /// The backend already split the answer into text and citation segments.
    Segmented(Vec<Segment>),
    /// Flat answer text carrying inline `[n]` markers (legacy payloads).
    RawMarkers(String),
}

// ---------------------------------------------------------------------------
// QueryResult
// ---------------------------------------------------------------------------

/// A complete answer as returned by the backend. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "QueryResultWire", into = "QueryResultWire")]
pub struct QueryResult {
    pub query: String,
    /// The flat answer text, always kept for display fallbacks and feedback.
    pub answer_text: String,
    pub answer: AnswerBody,
    pub citations: Vec<Citation>,
}

impl QueryResult {
    /// Assemble a result, picking the answer representation the same way
    /// deserialization does: non-empty segments win, otherwise the raw text.
    pub fn new(
        query: impl Into<String>,
        answer_text: impl Into<String>,
        segments: Option<Vec<Segment>>,
        citations: Vec<Citation>,
    ) -> Self {
        let answer_text = answer_text.into();
        let answer = match segments {
            Some(segments) if !segments.is_empty() => AnswerBody::Segmented(segments),
            _ => AnswerBody::RawMarkers(answer_text.clone()),
        };
        QueryResult {
            query: query.into(),
            answer_text,
            answer,
            citations,
        }
    }

    /// Look up a citation by zero-based index.
    pub fn citation(&self, index: usize) -> Option<&Citation> {
        self.citations.get(index)
    }
}

/// Backend JSON shape of a query result.
#[derive(Serialize, Deserialize)]
struct QueryResultWire {
    query: String,
    #[serde(default)]
    response: String,
    #[serde(default)]
    response_segments: Option<Vec<Segment>>,
    #[serde(default)]
    citations: Vec<Citation>,
}

impl From<QueryResultWire> for QueryResult {
    fn from(wire: QueryResultWire) -> Self {
        QueryResult::new(wire.query, wire.response, wire.response_segments, wire.citations)
    }
}

impl From<QueryResult> for QueryResultWire {
    fn from(result: QueryResult) -> Self {
        let response_segments = match result.answer {
            AnswerBody::Segmented(segments) => segments,
            AnswerBody::RawMarkers(_) => Vec::new(),
        };
        QueryResultWire {
            query: result.query,
            response: result.answer_text,
            response_segments: Some(response_segments),
            citations: result.citations,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segmented_payload_is_resolved_at_ingestion() {
        let json = r#"{
            "query": "Who may inherit?",
            "response": "The eldest son inherits.[1]",
            "response_segments": [
                { "text": "The eldest son inherits." },
                { "text": "[1]", "citation_index": 0, "citation_text": "Section 2" }
            ],
            "citations": [
                { "source": "Section 2", "text": "Inheritance passes to the eldest son.", "page": 3, "score": 0.91 }
            ]
        }"#;
        let result: QueryResult = serde_json::from_str(json).unwrap();

        match &result.answer {
            AnswerBody::Segmented(segments) => {
                assert_eq!(segments.len(), 2);
                assert_eq!(segments[1].citation_index, Some(0));
                assert_eq!(segments[1].citation_text.as_deref(), Some("Section 2"));
            }
            other => panic!("expected segmented body, got {other:?}"),
        }
        assert_eq!(result.citations[0].page, Some(3));
        assert_eq!(result.citations[0].relevance_score, Some(0.91));
    }

    #[test]
    fn missing_segments_fall_back_to_raw_markers() {
        let json = r#"{
            "query": "q",
            "response": "Oaths bind.[1]",
            "citations": [{ "source": "Section 1", "text": "An oath binds." }]
        }"#;
        let result: QueryResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.answer, AnswerBody::RawMarkers("Oaths bind.[1]".to_string()));
        assert_eq!(result.citations[0].page, None);
        assert_eq!(result.citations[0].relevance_score, None);
    }

    #[test]
    fn empty_segments_fall_back_to_raw_markers() {
        let json = r#"{ "query": "q", "response": "Plain.", "response_segments": [], "citations": [] }"#;
        let result: QueryResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.answer, AnswerBody::RawMarkers("Plain.".to_string()));
    }

    #[test]
    fn negative_citation_index_deserializes() {
        let json = r#"{ "text": "[0]", "citation_index": -1 }"#;
        let segment: Segment = serde_json::from_str(json).unwrap();
        assert_eq!(segment.citation_index, Some(-1));
    }

    #[test]
    fn serializes_back_to_backend_shape() {
        let result = QueryResult::new(
            "q",
            "Oaths bind.[1]",
            None,
            vec![Citation::new("Section 1", "An oath binds.")],
        );
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["query"], "q");
        assert_eq!(value["response"], "Oaths bind.[1]");
        assert_eq!(value["response_segments"], serde_json::json!([]));
        assert_eq!(value["citations"][0]["source"], "Section 1");
        assert!(value["citations"][0]["score"].is_null());
        assert!(value.get("answer_text").is_none());
    }

    #[test]
    fn score_band_thresholds() {
        let mut citation = Citation::new("Section 1", "text");
        assert_eq!(citation.score_band(), None);

        citation.relevance_score = Some(0.81);
        assert_eq!(citation.score_band(), Some(ScoreBand::High));

        citation.relevance_score = Some(0.8);
        assert_eq!(citation.score_band(), Some(ScoreBand::Moderate));
    }
}

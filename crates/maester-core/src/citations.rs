// Citation resolution: turns an answer into an ordered list of display spans.
//
// Pre-segmented answers are mapped one segment per span. Raw answers are split
// on `[n]` markers (1-based in the text, 0-based in the citation list). A marker
// that does not point at a citation stays in the output as literal text, so
// resolution never fails and never drops characters.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{AnswerBody, Citation, QueryResult, Segment};

/// A renderable piece of an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Literal answer text.
    Text(String),
    /// A reference to `citations[index]`; `marker` is the text to display.
    Citation { index: usize, marker: String },
}

impl Span {
    /// The text this span occupies in the answer.
    pub fn display_text(&self) -> &str {
        match self {
            Span::Text(text) => text,
            Span::Citation { marker, .. } => marker,
        }
    }

    pub fn citation_index(&self) -> Option<usize> {
        match self {
            Span::Citation { index, .. } => Some(*index),
            Span::Text(_) => None,
        }
    }
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[(\d+)\]").expect("citation marker pattern is valid"))
}

/// Resolve an answer body against its citation list.
pub fn resolve(answer: &AnswerBody, citations: &[Citation]) -> Vec<Span> {
    match answer {
        AnswerBody::Segmented(segments) => resolve_segments(segments, citations),
        AnswerBody::RawMarkers(text) => resolve_markers(text, citations),
    }
}

/// Map backend segments to spans. Segments without a usable index are text.
pub fn resolve_segments(segments: &[Segment], citations: &[Citation]) -> Vec<Span> {
    segments
        .iter()
        .map(|segment| {
            let index = segment
                .citation_index
                .and_then(|i| usize::try_from(i).ok())
                .filter(|&i| i < citations.len());
            match index {
                Some(index) => {
                    let marker = if segment.text.is_empty() {
                        format!("[{}]", index + 1)
                    } else {
                        segment.text.clone()
                    };
                    Span::Citation { index, marker }
                }
                None => Span::Text(segment.text.clone()),
            }
        })
        .collect()
}

/// Split flat answer text on `[n]` markers.
pub fn resolve_markers(text: &str, citations: &[Citation]) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for captures in marker_pattern().captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.start() > cursor {
            spans.push(Span::Text(text[cursor..whole.start()].to_string()));
        }

        let index = captures
            .get(1)
            .and_then(|digits| digits.as_str().parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .filter(|&i| i < citations.len());

        let marker = whole.as_str().to_string();
        spans.push(match index {
            Some(index) => Span::Citation { index, marker },
            None => Span::Text(marker),
        });
        cursor = whole.end();
    }

    if cursor < text.len() {
        spans.push(Span::Text(text[cursor..].to_string()));
    }
    spans
}

impl QueryResult {
    /// Display spans for this result's answer.
    pub fn spans(&self) -> Vec<Span> {
        resolve(&self.answer, &self.citations)
    }

    /// Distinct citation indices in the order the answer first references them.
    pub fn referenced_citations(&self) -> Vec<usize> {
        let mut seen = Vec::new();
        for index in self.spans().iter().filter_map(Span::citation_index) {
            if !seen.contains(&index) {
                seen.push(index);
            }
        }
        seen
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

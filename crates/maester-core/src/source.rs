// Source document links with scroll-to-text fragments.
//
// Long passages are anchored by their first and last few words rather than the
// whole text; the PDF's extracted text rarely matches a long passage exactly.

use crate::model::Citation;

/// Path of the statute PDF served by the backend.
pub const DEFAULT_DOCUMENT_PATH: &str = "/docs/laws.pdf";

/// Passages longer than this many words use a `start,end` fragment.
const LONG_PASSAGE_WORDS: usize = 10;

/// Words taken from each end of a long passage.
const FRAGMENT_EDGE_WORDS: usize = 5;

/// Build the URL of the document backing `citation`, anchored at its passage.
pub fn source_document_url(base_url: &str, document_path: &str, citation: &Citation) -> String {
    let document = format!("{}{}", base_url.trim_end_matches('/'), document_path);
    match text_fragment(&citation.text) {
        Some(fragment) => format!("{document}{fragment}"),
        None => format!("{document}#page={}", citation.page.unwrap_or(1)),
    }
}

/// `#:~:text=` anchor for a passage, or `None` when it has no words.
pub fn text_fragment(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    if words.len() > LONG_PASSAGE_WORDS {
        let start = words[..FRAGMENT_EDGE_WORDS].join(" ");
        let end = words[words.len() - FRAGMENT_EDGE_WORDS..].join(" ");
        Some(format!(
            "#:~:text={},{}",
            urlencoding::encode(&start),
            urlencoding::encode(&end)
        ))
    } else {
        Some(format!("#:~:text={}", urlencoding::encode(&words.join(" "))))
    }
}

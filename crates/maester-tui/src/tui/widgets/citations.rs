// Citation cards shown under an answer.
//
// Each card: "[n] source · p.{page}" with an optional relevance badge in
// advanced mode, then the quoted passage.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use maester_core::{Citation, QueryResult, ScoreBand};

use super::truncate;
use crate::tui::ViewState;

/// Longest passage excerpt shown on a card; the viewer shows the full text.
const EXCERPT_CHARS: usize = 240;

/// All citation cards for `result` as display lines.
pub fn card_lines(result: &QueryResult, state: &ViewState) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("Sources ({})", result.citations.len()),
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))];

    for (index, citation) in result.citations.iter().enumerate() {
        let focused = index == state.citation_focus;
        lines.push(header_line(index, citation, focused, state.advanced));
        if !citation.text.trim().is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", truncate(citation.text.trim(), EXCERPT_CHARS)),
                Style::default().fg(Color::Gray),
            )));
        }
    }
    lines
}

fn header_line(index: usize, citation: &Citation, focused: bool, advanced: bool) -> Line<'static> {
    let pointer = if focused { "▶ " } else { "  " };
    let mut number_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    if focused {
        number_style = number_style.add_modifier(Modifier::REVERSED);
    }

    let mut spans = vec![
        Span::styled(pointer, Style::default().fg(Color::Yellow)),
        Span::styled(format!("[{}]", index + 1), number_style),
        Span::raw(" "),
        Span::styled(
            citation.source.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(page) = citation.page {
        spans.push(Span::styled(
            format!(" · p.{page}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if advanced {
        if let Some((label, color)) = score_badge(citation) {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(label, Style::default().fg(color)));
        }
    }

    Line::from(spans)
}

/// Relevance badge text and color, or `None` when the citation has no score.
pub fn score_badge(citation: &Citation) -> Option<(String, Color)> {
    let score = citation.relevance_score?;
    let (band, color) = match citation.score_band()? {
        ScoreBand::High => ("high", Color::Green),
        ScoreBand::Moderate => ("moderate", Color::Yellow),
    };
    Some((format!("{band} relevance {score:.2}"), color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{populated_view, resolved_result};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn score_badge_bands() {
        let result = resolved_result();
        assert_eq!(
            score_badge(&result.citations[0]),
            Some(("high relevance 0.91".to_string(), Color::Green))
        );
        assert_eq!(
            score_badge(&result.citations[1]),
            Some(("moderate relevance 0.62".to_string(), Color::Yellow))
        );
        assert_eq!(score_badge(&Citation::new("s", "t")), None);
    }

    #[test]
    fn cards_hide_scores_outside_advanced_mode() {
        let state = populated_view();
        let lines = card_lines(state.current_result().unwrap(), &state);
        let text: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(text[0], "Sources (2)");
        assert_eq!(text[1], "▶ [1] Laws of the Realm, Section 12 · p.12");
        assert!(text[2].contains("Any man found guilty of theft"));
        assert_eq!(text[3], "  [2] Customs of the North");
        assert!(text.iter().all(|t| !t.contains("relevance")));
    }

    #[test]
    fn cards_show_scores_in_advanced_mode() {
        let mut state = populated_view();
        state.advanced = true;
        let lines = card_lines(state.current_result().unwrap(), &state);
        assert!(line_text(&lines[1]).ends_with("high relevance 0.91"));
    }

    #[test]
    fn long_passages_are_shortened() {
        let state = ViewState::default();
        let long = "word ".repeat(100);
        let result = QueryResult::new("q", "a [1]", None, vec![Citation::new("s", long)]);
        let lines = card_lines(&result, &state);
        assert!(line_text(&lines[2]).chars().count() <= EXCERPT_CHARS + 4);
    }
}

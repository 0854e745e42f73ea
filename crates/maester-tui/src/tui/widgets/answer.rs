// Answer panel: the current session's question with its loading state, error
// banner, or resolved answer followed by citation cards and feedback.
//
// Citation markers in the answer are numbered from the resolver output and
// styled so they stand out from the prose; the focused citation's markers
// are reversed.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use maester_core::{QueryResult, Session, SessionStatus, Span as AnswerSpan};

use super::{citations, feedback};
use crate::tui::ViewState;

/// Render the current session into the content area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, session: &Session) {
    let mut lines = vec![
        Line::from(Span::styled(
            session.query.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    let border = match &session.status {
        SessionStatus::Loading => {
            lines.push(Line::from(Span::styled(
                "Consulting the archives…",
                Style::default().fg(Color::Yellow),
            )));
            Style::default().fg(Color::Yellow)
        }
        SessionStatus::Failed(message) => {
            lines.extend(error_lines(message));
            Style::default().fg(Color::Red)
        }
        SessionStatus::Resolved(result) => {
            lines.extend(answer_lines(result, state.citation_focus));
            if !result.citations.is_empty() {
                lines.push(Line::default());
                lines.extend(citations::card_lines(result, state));
            }
            lines.push(Line::default());
            lines.push(feedback::line(state.snapshot.feedback));
            Style::default()
        }
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!("Answer (k={})", session.k)),
        )
        .wrap(Wrap { trim: false })
        .scroll((state.content_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn error_lines(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "The question could not be answered:",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Press i then Enter to ask again.",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

/// Answer text as styled lines, split on embedded newlines.
pub fn answer_lines(result: &QueryResult, focus: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for span in result.spans() {
        match span {
            AnswerSpan::Text(text) => {
                let mut parts = text.split('\n');
                if let Some(first) = parts.next() {
                    if !first.is_empty() {
                        current.push(Span::raw(first.to_string()));
                    }
                }
                for part in parts {
                    lines.push(Line::from(std::mem::take(&mut current)));
                    if !part.is_empty() {
                        current.push(Span::raw(part.to_string()));
                    }
                }
            }
            AnswerSpan::Citation { index, marker } => {
                current.push(Span::styled(marker, marker_style(index == focus)));
            }
        }
    }
    lines.push(Line::from(current));
    lines
}

fn marker_style(focused: bool) -> Style {
    let style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    if focused {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{buffer_text, populated_view, resolved_result, session};
    use maester_core::Citation;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn answer_lines_keep_markers_in_place() {
        let lines = answer_lines(&resolved_result(), 0);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            line_text(&lines[0]),
            "A thief loses a hand [1] or joins the Watch [2]."
        );
        let marker = &lines[0].spans[1];
        assert_eq!(marker.content, "[1]");
        assert!(marker.style.add_modifier.contains(Modifier::REVERSED));
        assert!(!lines[0].spans[3].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn answer_lines_split_on_newlines() {
        let result = QueryResult::new(
            "q",
            "First point [1].\n\nSecond point.",
            None,
            vec![Citation::new("Section 1", "t")],
        );
        let lines = answer_lines(&result, 5);
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["First point [1].", "", "Second point."]);
    }

    #[test]
    fn out_of_range_markers_render_as_text() {
        let result = QueryResult::new("q", "See [3].", None, vec![]);
        let lines = answer_lines(&result, 0);
        assert_eq!(line_text(&lines[0]), "See [3].");
        assert!(lines[0].spans.iter().all(|s| s.style == Style::default()));
    }

    #[test]
    fn render_resolved_session() {
        let backend = ratatui::backend::TestBackend::new(90, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = populated_view();
        let session = state.current_session().unwrap().clone();
        terminal
            .draw(|frame| render(frame, frame.area(), &state, &session))
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Answer (k=2)"));
        assert!(text.contains("A thief loses a hand [1]"));
        assert!(text.contains("Laws of the Realm, Section 12"));
        assert!(text.contains("Was this helpful?"));
    }

    #[test]
    fn render_loading_session() {
        let backend = ratatui::backend::TestBackend::new(60, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        let loading = session("1", "Who rules?", SessionStatus::Loading);
        terminal
            .draw(|frame| render(frame, frame.area(), &state, &loading))
            .unwrap();
        assert!(buffer_text(terminal.backend().buffer()).contains("Consulting the archives"));
    }
}

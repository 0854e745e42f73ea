// Status bar widget: app name, citations per question, pending queries,
// advanced mode and transient notices.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [name] [k] [pending indicator] [advanced flag] [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![
        Span::styled(
            " maester ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" k={} ", state.k),
            Style::default().fg(Color::White),
        ),
    ];

    let (pending, pending_color) = pending_indicator(state.snapshot.in_flight);
    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(pending, Style::default().fg(pending_color)));

    if state.advanced {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled("scores", Style::default().fg(Color::Magenta)));
    }

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Text and color describing how many questions are awaiting an answer.
pub fn pending_indicator(in_flight: usize) -> (String, Color) {
    match in_flight {
        0 => ("idle".to_string(), Color::Green),
        1 => ("1 question pending".to_string(), Color::Yellow),
        n => (format!("{n} questions pending"), Color::Yellow),
    }
}

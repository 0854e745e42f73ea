// Welcome screen shown when no session is current.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;

/// Sample questions beyond this cannot be picked with a digit key.
const MAX_NUMBERED: usize = 9;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(welcome_lines(&state.sample_questions))
        .block(Block::default().borders(Borders::ALL).title("Welcome"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub fn welcome_lines(sample_questions: &[String]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Ask the maester",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Questions are answered from the laws of the realm, with every claim cited.",
            Style::default().fg(Color::Gray),
        )),
        Line::default(),
    ];

    if sample_questions.is_empty() {
        lines.push(Line::from("Press i to type a question."));
        return lines;
    }

    lines.push(Line::from("Try one of these (press its number):"));
    for (i, question) in sample_questions.iter().take(MAX_NUMBERED).enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}. ", i + 1),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(question.clone()),
        ]));
    }
    lines
}

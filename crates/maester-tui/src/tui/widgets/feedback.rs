// Feedback controls under a resolved answer.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use maester_core::FeedbackVote;

/// "Was this helpful?" line with the recorded vote highlighted.
pub fn line(vote: Option<FeedbackVote>) -> Line<'static> {
    Line::from(vec![
        Span::styled("Was this helpful?  ", Style::default().fg(Color::Gray)),
        button("[u] Yes", vote == Some(FeedbackVote::Positive), Color::Green),
        Span::raw("  "),
        button("[d] No", vote == Some(FeedbackVote::Negative), Color::Red),
    ])
}

fn button(label: &'static str, selected: bool, color: Color) -> Span<'static> {
    if selected {
        Span::styled(
            label,
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(label, Style::default().fg(color))
    }
}

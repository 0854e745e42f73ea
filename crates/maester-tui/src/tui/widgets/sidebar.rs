// Session sidebar: question history, newest first.
//
// Each row: "{status} {HH:MM} {query}". The current session is bold, the
// cursor row is reversed.

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use maester_core::{Session, SessionStatus};

use super::truncate;
use crate::tui::ViewState;

/// Render the session history into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sessions = &state.snapshot.sessions;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("History ({})", sessions.len()));

    if sessions.is_empty() {
        let paragraph = Paragraph::new("  No questions yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_rows = (area.height as usize).saturating_sub(2).max(1);
    let offset = scroll_offset(state.sidebar_cursor, visible_rows, sessions.len());
    // Borders, status glyph, time and spacing.
    let query_width = (area.width as usize).saturating_sub(2 + 2 + 6);

    let items: Vec<ListItem> = sessions
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .map(|(i, session)| {
            let is_current = state.snapshot.current.as_ref() == Some(&session.id);
            ListItem::new(session_line(session, query_width, is_current, i == state.sidebar_cursor))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);

    if sessions.len() > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(sessions.len().saturating_sub(visible_rows)).position(offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// First visible row so that the cursor stays on screen.
pub fn scroll_offset(cursor: usize, visible_rows: usize, total: usize) -> usize {
    let max_offset = total.saturating_sub(visible_rows);
    cursor.saturating_sub(visible_rows.saturating_sub(1)).min(max_offset)
}

/// Glyph and color for a session's lifecycle state.
pub fn status_glyph(status: &SessionStatus) -> (&'static str, Color) {
    match status {
        SessionStatus::Loading => ("…", Color::Yellow),
        SessionStatus::Resolved(_) => ("✓", Color::Green),
        SessionStatus::Failed(_) => ("✗", Color::Red),
    }
}

fn session_line(
    session: &Session,
    query_width: usize,
    is_current: bool,
    is_cursor: bool,
) -> Line<'static> {
    let (glyph, color) = status_glyph(&session.status);

    let mut query_style = Style::default().fg(Color::White);
    if is_current {
        query_style = query_style.add_modifier(Modifier::BOLD);
    }

    let line = Line::from(vec![
        Span::styled(format!("{glyph} "), Style::default().fg(color)),
        Span::styled(
            format!("{} ", session.created_at.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(truncate(&session.query, query_width), query_style),
    ]);

    if is_cursor {
        line.style(Style::default().add_modifier(Modifier::REVERSED))
    } else {
        line
    }
}

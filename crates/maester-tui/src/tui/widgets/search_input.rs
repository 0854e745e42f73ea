// Question input box above the content area.

use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::focused_border_style;
use crate::tui::ViewState;

const PLACEHOLDER: &str = "Press i to ask about the laws of the realm…";

/// Render the input box. In edit mode the terminal cursor is placed after the
/// typed text and the view scrolls horizontally to keep it visible.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let typed = state.input.chars().count();
    let skip = horizontal_scroll(typed, inner_width);

    let content = if state.input.is_empty() && !state.edit_mode {
        Line::from(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(state.input.chars().skip(skip).collect::<String>())
    };

    let title = if state.edit_mode {
        format!("Ask ({} citations) - Enter to send", state.k)
    } else {
        format!("Ask ({} citations)", state.k)
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focused_border_style(state.edit_mode, Style::default()))
            .title(title),
    );
    frame.render_widget(paragraph, area);

    if state.edit_mode && area.width > 2 && area.height > 2 {
        let column = (typed - skip) as u16;
        frame.set_cursor_position(Position::new(area.x + 1 + column, area.y + 1));
    }
}

/// Characters hidden on the left so the cursor stays inside the box.
pub fn horizontal_scroll(typed: usize, inner_width: usize) -> usize {
    if inner_width == 0 {
        return typed;
    }
    (typed + 1).saturating_sub(inner_width)
}

// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +------------------+-------------------------------+
// | Sessions (32 col)| Search Input (3 rows)         |
// |                  +-------------------------------+
// |                  | Content (fill)                |
// |                  |                               |
// +------------------+-------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the session history column.
pub const SIDEBAR_WIDTH: u16 = 32;

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: app name, k, pending queries, notices.
    pub status_bar: Rect,
    /// Left column: session history.
    pub sidebar: Rect,
    /// Question input above the content area.
    pub search_input: Rect,
    /// Welcome screen or the current session's answer.
    pub content: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the screen layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | body(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(5),    // body
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let body = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: sidebar (fixed) | main column (fill)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(body);

    let sidebar = horizontal[0];

    // Main column: search input (3) | content (fill)
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(2)])
        .split(horizontal[1]);

    AppLayout {
        status_bar,
        sidebar,
        search_input: main[0],
        content: main[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 120, 40)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("sidebar", layout.sidebar),
            ("search_input", layout.search_input),
            ("content", layout.content),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in rects {
            assert!(rect.width > 0, "{name} has zero width");
            assert!(rect.height > 0, "{name} has zero height");
        }
    }

    #[test]
    fn fixed_sizes() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(layout.search_input.height, 3);
        assert_eq!(layout.content.height, 40 - 1 - 1 - 3);
    }

    #[test]
    fn main_column_sits_right_of_sidebar() {
        let layout = build_layout(test_area());
        assert_eq!(layout.search_input.x, SIDEBAR_WIDTH);
        assert_eq!(layout.content.x, SIDEBAR_WIDTH);
        assert_eq!(layout.content.width, 120 - SIDEBAR_WIDTH);
        assert_eq!(layout.content.y, layout.search_input.y + 3);
    }

    #[test]
    fn status_and_help_span_full_width() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.width, 120);
        assert_eq!(layout.help_bar.width, 120);
        assert_eq!(layout.help_bar.y, 39);
    }
}

// Source viewer overlay: the full passage behind a citation and a link into
// the statute PDF that scrolls to it.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use maester_core::Citation;

use super::{centered_rect, citations::score_badge};
use crate::tui::ViewState;

/// Render the viewer for `citation` centered on `area`, covering most of it.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, citation: &Citation) {
    let width = area.width.saturating_mul(4) / 5;
    let height = area.height.saturating_mul(3) / 4;
    let dialog_area = centered_rect(width, height, area);

    frame.render_widget(Clear, dialog_area);

    let number = state.viewer.map_or(0, |i| i + 1);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" Source [{number}] "),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(" Esc to close ");

    let paragraph = Paragraph::new(viewer_lines(state, citation))
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

pub fn viewer_lines(state: &ViewState, citation: &Citation) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![Line::from(Span::styled(
        citation.source.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    let page = citation
        .page
        .map_or_else(|| "unknown".to_string(), |p| p.to_string());
    lines.push(Line::from(vec![Span::styled("Page: ", label), Span::raw(page)]));

    if state.advanced {
        if let Some((badge, color)) = score_badge(citation) {
            lines.push(Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(badge, Style::default().fg(color)),
            ]));
        }
    }

    lines.push(Line::default());
    let passage = citation.text.trim();
    if passage.is_empty() {
        lines.push(Line::from(Span::styled("(no passage text)", label)));
    } else {
        lines.extend(passage.lines().map(|l| Line::from(l.to_string())));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Open in document:", label)));
    lines.push(Line::from(Span::styled(
        state.source_url(citation),
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED),
    )));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{buffer_text, populated_view};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn viewer_shows_page_passage_and_link() {
        let state = populated_view();
        let citation = state.current_result().unwrap().citations[0].clone();
        let texts: Vec<String> = viewer_lines(&state, &citation)
            .iter()
            .map(line_text)
            .collect();

        assert_eq!(texts[0], "Laws of the Realm, Section 12");
        assert_eq!(texts[1], "Page: 12");
        assert!(texts.iter().all(|t| !t.starts_with("Score:")));
        assert!(texts.iter().any(|t| t.starts_with("Any man found guilty")));
        assert_eq!(
            texts.last().unwrap(),
            "http://localhost:8000/docs/laws.pdf#:~:text=Any%20man%20found%20guilty%20of,unless%20he%20takes%20the%20black."
        );
    }

    #[test]
    fn advanced_mode_adds_score() {
        let mut state = populated_view();
        state.advanced = true;
        let citation = state.current_result().unwrap().citations[1].clone();
        let texts: Vec<String> = viewer_lines(&state, &citation)
            .iter()
            .map(line_text)
            .collect();
        assert_eq!(texts[1], "Page: unknown");
        assert_eq!(texts[2], "Score: moderate relevance 0.62");
    }

    #[test]
    fn empty_passage_links_to_page() {
        let state = ViewState::default();
        let mut citation = Citation::new("Appendix", "   ");
        citation.page = Some(40);
        let texts: Vec<String> = viewer_lines(&state, &citation)
            .iter()
            .map(line_text)
            .collect();
        assert!(texts.contains(&"(no passage text)".to_string()));
        assert_eq!(
            texts.last().unwrap(),
            "http://localhost:8000/docs/laws.pdf#page=40"
        );
    }

    #[test]
    fn render_overlay() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = populated_view();
        state.viewer = Some(0);
        let citation = state.viewer_citation().unwrap().clone();
        terminal
            .draw(|frame| render(frame, frame.area(), &state, &citation))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Source [1]"));
        assert!(text.contains("Esc to close"));
    }
}

// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (editing the question,
// moving the sidebar cursor, opening citations).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use maester_api::{MAX_K, MIN_K};
use maester_app::UserCommand;
use maester_core::FeedbackVote;

use super::ViewState;

/// Lines moved per PageUp/PageDown in the content area.
const PAGE_SCROLL: u16 = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when the key press was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    view_state.notice = None;

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.edit_mode {
        return handle_edit_mode(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('i') | KeyCode::Char('/') => {
            view_state.edit_mode = true;
            view_state.viewer = None;
            None
        }

        // Citations per question
        KeyCode::Char('+') | KeyCode::Char('=') => {
            view_state.k = (view_state.k + 1).min(MAX_K);
            None
        }
        KeyCode::Char('-') => {
            view_state.k = view_state.k.saturating_sub(1).max(MIN_K);
            None
        }

        KeyCode::Char('a') => {
            view_state.advanced = !view_state.advanced;
            None
        }

        KeyCode::Char('n') => {
            view_state.viewer = None;
            Some(UserCommand::NewChat)
        }

        // Session history
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.sidebar_cursor = view_state.sidebar_cursor.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = view_state.snapshot.sessions.len().saturating_sub(1);
            view_state.sidebar_cursor = (view_state.sidebar_cursor + 1).min(last);
            None
        }
        KeyCode::Enter => view_state
            .highlighted_session()
            .cloned()
            .map(UserCommand::SelectSession),

        // Answer scrolling
        KeyCode::PageUp => {
            view_state.content_scroll = view_state.content_scroll.saturating_sub(PAGE_SCROLL);
            None
        }
        KeyCode::PageDown => {
            view_state.content_scroll = view_state.content_scroll.saturating_add(PAGE_SCROLL);
            None
        }

        // Citation focus and the source viewer
        KeyCode::Tab => {
            move_citation_focus(view_state, true);
            None
        }
        KeyCode::BackTab => {
            move_citation_focus(view_state, false);
            None
        }
        KeyCode::Char('o') => {
            if citation_count(view_state) > 0 {
                view_state.viewer = Some(view_state.citation_focus);
            }
            None
        }
        KeyCode::Char(c @ '1'..='9') => handle_digit(c, view_state),

        KeyCode::Char('u') => feedback(view_state, FeedbackVote::Positive),
        KeyCode::Char('d') => feedback(view_state, FeedbackVote::Negative),

        KeyCode::Esc => {
            view_state.viewer = None;
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('q') => Some(UserCommand::Quit),
        KeyCode::Char('n') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn handle_edit_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter => {
            if view_state.input.trim().is_empty() {
                return None;
            }
            view_state.edit_mode = false;
            Some(UserCommand::SubmitQuery {
                query: view_state.input.clone(),
                k: view_state.k,
            })
        }
        KeyCode::Esc => {
            view_state.edit_mode = false;
            None
        }
        KeyCode::Backspace => {
            view_state.input.pop();
            None
        }
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            view_state.input.push(c);
            None
        }
        _ => None,
    }
}

/// Digits pick a sample question on the welcome screen and open citation N
/// otherwise.
fn handle_digit(c: char, view_state: &mut ViewState) -> Option<UserCommand> {
    let index = c.to_digit(10)? as usize - 1;

    if view_state.current_session().is_none() {
        let query = view_state.sample_questions.get(index)?.clone();
        view_state.input = query.clone();
        return Some(UserCommand::SubmitQuery {
            query,
            k: view_state.k,
        });
    }

    if index < citation_count(view_state) {
        view_state.citation_focus = index;
        view_state.viewer = Some(index);
    }
    None
}

fn feedback(view_state: &ViewState, vote: FeedbackVote) -> Option<UserCommand> {
    view_state
        .current_result()
        .map(|_| UserCommand::Feedback(vote))
}

fn citation_count(view_state: &ViewState) -> usize {
    view_state
        .current_result()
        .map_or(0, |result| result.citations.len())
}

/// Cycle the focused citation card, wrapping at either end.
fn move_citation_focus(view_state: &mut ViewState, forward: bool) {
    let count = citation_count(view_state);
    if count == 0 {
        return;
    }
    let focus = view_state.citation_focus.min(count - 1);
    view_state.citation_focus = if forward {
        (focus + 1) % count
    } else {
        (focus + count - 1) % count
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

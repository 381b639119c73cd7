//! Keybinding dispatcher for ragespace.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and
//! returns a `KeyAction` telling the event loop whether to continue or
//! quit. The dispatcher branches first on the flow machine's current
//! screen so each screen has an isolated handler function.
//!
//! Mouse clicks only matter in the rage room: a left click inside the
//! cached canvas rect is mapped into world coordinates and registered as a
//! hit at that exact point.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use ragespace_core::catalog::{EmotionRating, StressorType};
use ragespace_core::flow::Screen;

use crate::app::{AppState, WORLD_HEIGHT, WORLD_WIDTH};

/// Control-flow signal returned from the key dispatcher.
///
/// The event loop checks this after every keypress: `Quit` tears down the
/// terminal and exits; `Continue` carries on to the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
}

/// Dispatches a key event to the handler matching the current screen.
///
/// Mutates `state` in place and returns a `KeyAction` signalling whether to
/// continue or quit.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.flow.screen() {
        Screen::Welcome => handle_welcome(key, state),
        Screen::BeforeEmotion | Screen::AfterEmotion => handle_emotion(key, state),
        Screen::RageRoom => handle_rage_room(key, state),
        Screen::Analytics => handle_analytics(key, state),
    }
}

// ---------------------------------------------------------------------------
// Welcome
// ---------------------------------------------------------------------------

/// Stressor selection: digits 1-4 pick directly, arrows plus Enter pick
/// from the menu, `a` jumps to analytics when history exists.
fn handle_welcome(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            state.choose_stressor(StressorType::ALL[idx]);
            KeyAction::Continue
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.menu_up();
            KeyAction::Continue
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.menu_down();
            KeyAction::Continue
        }
        KeyCode::Enter => {
            let stressor = state.selected_stressor();
            state.choose_stressor(stressor);
            KeyAction::Continue
        }
        KeyCode::Char('a') => {
            state.view_analytics();
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Emotion pickers (before and after share a handler)
// ---------------------------------------------------------------------------

/// Rating selection: digits 1-5 rate directly, arrows plus Enter pick from
/// the menu. Esc abandons the flow back to Welcome without recording
/// anything.
fn handle_emotion(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char(c @ '1'..='5') => {
            let value = c as u8 - b'0';
            if let Some(rating) = EmotionRating::new(value) {
                state.record_emotion(rating);
            }
            KeyAction::Continue
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.menu_up();
            KeyAction::Continue
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.menu_down();
            KeyAction::Continue
        }
        KeyCode::Enter => {
            let rating = state.selected_emotion();
            state.record_emotion(rating);
            KeyAction::Continue
        }
        KeyCode::Esc => {
            state.abandon_flow();
            KeyAction::Continue
        }
        KeyCode::Char('q') => KeyAction::Quit,
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Rage room
// ---------------------------------------------------------------------------

/// The interactive screen: Space (or Enter) smashes near the center, y/n
/// answer the satisfaction prompt while it is visible, Esc abandons.
///
/// `confirm_satisfaction` and `decline_satisfaction` are no-ops while the
/// prompt is hidden, so y/n cannot skip the flow early.
fn handle_rage_room(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => {
            state.hit_near_center(AppState::now_ms());
            KeyAction::Continue
        }
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            state.confirm_satisfaction();
            KeyAction::Continue
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            state.decline_satisfaction();
            KeyAction::Continue
        }
        KeyCode::Esc => {
            state.abandon_flow();
            KeyAction::Continue
        }
        KeyCode::Char('q') => KeyAction::Quit,
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// `n` starts a fresh flow; `q` or Esc quits.
fn handle_analytics(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('n') => {
            state.new_session();
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: left clicks inside the rage-room canvas register
/// a hit at the clicked point.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        if state.flow.screen() == Screen::RageRoom {
            if let Some((x, y)) = canvas_point(mouse.column, mouse.row, state) {
                state.hit(x, y, AppState::now_ms());
            }
        }
    }
    KeyAction::Continue
}

/// Maps a terminal cell inside the cached canvas rect to world coordinates.
///
/// Returns `None` for clicks outside the canvas (or before the first
/// render, when the rect is still zero-sized). The world uses screen-style
/// coordinates (y down), matching the terminal's row direction, so no
/// inversion happens here.
fn canvas_point(col: u16, row: u16, state: &AppState) -> Option<(f64, f64)> {
    let rect = state.canvas_rect;
    if rect.width == 0 || rect.height == 0 {
        return None;
    }
    if !rect.contains(Position { x: col, y: row }) {
        return None;
    }
    let fx = f64::from(col - rect.x) / f64::from(rect.width);
    let fy = f64::from(row - rect.y) / f64::from(rect.height);
    Some((fx * WORLD_WIDTH, fy * WORLD_HEIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn digits_choose_stressors_on_welcome() {
        let mut state = AppState::default();
        handle_key(key(KeyCode::Char('2')), &mut state);
        assert_eq!(state.flow.screen(), Screen::BeforeEmotion);
        assert_eq!(state.flow.stressor(), Some(StressorType::Social));
    }

    #[test]
    fn q_quits_from_every_screen() {
        let mut state = AppState::default();
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), KeyAction::Quit);

        let mut state = AppState::default();
        state.choose_stressor(StressorType::Academic);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), KeyAction::Quit);
    }

    #[tokio::test]
    async fn clicks_inside_canvas_hit_at_the_mapped_point() {
        let mut state = AppState::default();
        state.choose_stressor(StressorType::General);
        state.record_emotion(EmotionRating::new(3).unwrap());
        state.canvas_rect = Rect { x: 10, y: 5, width: 60, height: 20 };

        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 40,
            row: 15,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(mouse, &mut state);
        assert_eq!(state.flow.hit_count(), 1);
        assert!(!state.particles.is_empty());
        let p = state.particles.particles()[0];
        assert_eq!(p.x, 0.5 * WORLD_WIDTH);
        assert_eq!(p.y, 0.5 * WORLD_HEIGHT);
    }

    #[test]
    fn clicks_outside_canvas_are_ignored() {
        let mut state = AppState::default();
        state.choose_stressor(StressorType::General);
        // Enter the room without timers (tx is None in this test).
        state.record_emotion(EmotionRating::new(3).unwrap());
        state.canvas_rect = Rect { x: 10, y: 5, width: 60, height: 20 };

        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(mouse, &mut state);
        assert_eq!(state.flow.hit_count(), 0);
    }

    #[test]
    fn satisfaction_keys_ignored_below_threshold() {
        let mut state = AppState::default();
        state.choose_stressor(StressorType::Academic);
        state.record_emotion(EmotionRating::new(2).unwrap());
        handle_key(key(KeyCode::Char('y')), &mut state);
        assert_eq!(state.flow.screen(), Screen::RageRoom);
    }
}

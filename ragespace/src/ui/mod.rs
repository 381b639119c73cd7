//! UI rendering module for ragespace.
//!
//! This is the module root for `ui/`. It re-exports `render()` as the
//! single entry point called by the event loop's `terminal.draw()` closure.
//!
//! Each screen has its own renderer module; `render()` dispatches on the
//! flow machine's current screen. Shared layout arithmetic and the status
//! bar live in `layout.rs`.

pub mod analytics;
pub mod emotion;
pub mod keybindings;
mod layout;
pub mod rage_room;
pub mod welcome;

use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use ragespace_core::flow::Screen;

use crate::app::AppState;
use crate::theme::Theme;

pub use layout::{inner_rect, panel_block};

/// Renders one complete frame: the active screen plus the status bar.
///
/// Called exactly once per `AppEvent::Render` inside `terminal.draw()`.
/// This is the only location where `terminal.draw()` is invoked in the
/// application — never call it from anywhere else.
///
/// `state` is mutable because the rage-room renderer caches its canvas
/// rect back into it (mouse clicks on the *next* event need it) and the
/// menu screens render their `ListState`s statefully.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    // Paint the background first; screens draw over it.
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        frame.area(),
    );

    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    match state.flow.screen() {
        Screen::Welcome => welcome::render_welcome(frame, main_area, state, theme),
        Screen::BeforeEmotion => {
            emotion::render_emotion(frame, main_area, state, theme, emotion::Stage::Before)
        }
        Screen::RageRoom => rage_room::render_rage_room(frame, main_area, state, theme),
        Screen::AfterEmotion => {
            emotion::render_emotion(frame, main_area, state, theme, emotion::Stage::After)
        }
        Screen::Analytics => analytics::render_analytics(frame, main_area, state, theme),
    }

    layout::render_status_bar(frame, status_bar, state, theme);
}

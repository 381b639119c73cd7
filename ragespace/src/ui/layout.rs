//! Shared layout helpers and the status bar.
//!
//! Pure layout arithmetic — no mutable application state lives here. The
//! screen renderers use these helpers inside `terminal.draw()` on every
//! render so each frame reflects the live terminal size.

use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
    Frame,
};

use ragespace_core::flow::Screen;

use crate::app::AppState;
use crate::theme::Theme;

/// Returns the inner `Rect` of a panel after removing the 1-cell border on
/// each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// `accent` selects the active border color and a rounded border, used for
/// the panel the user is currently acting in (the menu, the canvas, the
/// prompt).
pub fn panel_block<'a>(title: &'a str, accent: bool, theme: &'a Theme) -> Block<'a> {
    let border_style = if accent {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if accent { BorderType::Rounded } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// The left side lists the keys that do something on the current screen;
/// the right side shows the most recent cloud/sync notice, when any.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let hints = match state.flow.screen() {
        Screen::Welcome => {
            if state.history.is_empty() {
                " 1-4 or ↑↓+Enter choose · q quit "
            } else {
                " 1-4 or ↑↓+Enter choose · a analytics · q quit "
            }
        }
        Screen::BeforeEmotion | Screen::AfterEmotion => {
            " 1-5 or ↑↓+Enter rate · Esc start over · q quit "
        }
        Screen::RageRoom => " Space or click to smash · y/n when asked · Esc give up · q quit ",
        Screen::Analytics => " n new session · q quit ",
    };

    let mut spans = vec![Span::styled(
        hints,
        Style::default().fg(theme.status_bar_fg),
    )];
    if let Some(notice) = &state.notice {
        spans.push(Span::styled(
            format!("  {notice} "),
            Style::default().fg(theme.notice).add_modifier(Modifier::ITALIC),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Left)
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

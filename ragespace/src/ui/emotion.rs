//! Emotion picker renderer, shared by the before and after screens.
//!
//! The two screens are identical apart from their copy, so one renderer
//! takes a [`Stage`] and swaps the title lines. The five-step scale is a
//! stateful List driven by `AppState::emotion_list`.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use ragespace_core::catalog::EmotionRating;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Which end of the flow this picker sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Pre-session rating, before entering the rage room.
    Before,
    /// Post-session rating, after the satisfaction confirm.
    After,
}

impl Stage {
    fn title(self) -> &'static str {
        match self {
            Stage::Before => "How are you feeling right now?",
            Stage::After => "How are you feeling now?",
        }
    }

    fn subtitle(self) -> &'static str {
        match self {
            Stage::Before => "Be honest with yourself",
            Stage::After => "After releasing all that stress",
        }
    }
}

/// Renders the emotion picker into `area`.
pub fn render_emotion(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    theme: &Theme,
    stage: Stage,
) {
    let card = area.centered(Constraint::Max(52), Constraint::Max(14));
    if card.height < 7 {
        return;
    }

    let [header, list_area] =
        card.layout(&Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]));

    let title = Text::from(vec![
        Line::from(Span::styled(
            stage.title(),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(stage.subtitle(), Style::default().fg(theme.subtitle))),
    ]);
    frame.render_widget(Paragraph::new(title).alignment(Alignment::Center), header);

    let items: Vec<ListItem> = EmotionRating::SCALE
        .iter()
        .map(|rating| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{}  ", rating.glyph())),
                Span::raw(rating.describe()),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(panel_block("", true, theme))
        .highlight_style(Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD))
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, list_area, &mut state.emotion_list);
}

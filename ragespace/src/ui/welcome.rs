//! Welcome screen renderer.
//!
//! A centred card: app title, tagline, and the stressor menu. When stored
//! sessions exist a shortcut hint to the analytics screen is shown under
//! the menu.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use ragespace_core::catalog::StressorType;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the welcome screen into `area`.
///
/// Uses `render_stateful_widget` for the stressor menu so the ListState
/// selection highlight follows the cursor.
pub fn render_welcome(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let card = area.centered(Constraint::Max(64), Constraint::Max(22));
    if card.height < 8 {
        return;
    }

    let [header, menu_area, footer] = card.layout(&Layout::vertical([
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]));

    let title = Text::from(vec![
        Line::from(Span::styled(
            "🔥 RageSpace",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Your digital stress relief room",
            Style::default().fg(theme.subtitle),
        )),
        Line::default(),
    ]);
    frame.render_widget(Paragraph::new(title).alignment(Alignment::Center), header);

    let items: Vec<ListItem> = StressorType::ALL
        .iter()
        .map(|s| stressor_item(*s, theme))
        .collect();
    let list = List::new(items)
        .block(panel_block("What's stressing you out?", true, theme))
        .highlight_style(Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD))
        .highlight_symbol("▸ ");
    frame.render_stateful_widget(list, menu_area, &mut state.stressor_list);

    if !state.history.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "View your analytics → press a",
                Style::default().fg(theme.text_dim),
            )))
            .alignment(Alignment::Center),
            footer,
        );
    }
}

/// Converts a stressor into a two-line menu item: colored glyph plus label,
/// then a dim description.
fn stressor_item(stressor: StressorType, theme: &Theme) -> ListItem<'static> {
    let (r, g, b) = stressor.color();
    let glyph = Span::styled(
        format!("{} ", stressor.glyph()),
        Style::default().fg(Color::Rgb(r, g, b)),
    );
    let label = Span::styled(
        stressor.label().to_owned(),
        Style::default().add_modifier(Modifier::BOLD),
    );
    let desc = Span::styled(
        format!("   {}", stressor.description()),
        Style::default().fg(theme.text_dim),
    );
    ListItem::new(Text::from(vec![
        Line::from(vec![glyph, label]),
        Line::from(desc),
    ]))
}

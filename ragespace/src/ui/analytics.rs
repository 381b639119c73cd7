//! Analytics screen renderer.
//!
//! Header, three stat tiles (sessions / average improvement / total hits),
//! the stressor distribution bar chart, and the before/after emotion trend
//! line chart. All numbers come from `ragespace_core::analytics`, computed
//! fresh from the in-memory history on every render; at these data volumes
//! recomputation is cheaper than any cache.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{Axis, Bar, BarChart, BarGroup, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use ragespace_core::analytics;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the analytics screen into `area`.
pub fn render_analytics(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let column = area.centered(Constraint::Max(100), Constraint::Fill(1));
    if column.height < 12 {
        return;
    }

    let [header, tiles, bars, trend] = column.layout(&Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ]));

    render_header(frame, header, theme);
    render_tiles(frame, tiles, state, theme);

    if state.history.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "Complete a session to see your patterns here.",
            Style::default().fg(theme.text_dim),
        )))
        .alignment(Alignment::Center)
        .block(panel_block("", false, theme));
        frame.render_widget(placeholder, bars.union(trend));
        return;
    }

    render_distribution(frame, bars, state, theme);
    render_trend(frame, trend, state, theme);
}

fn render_header(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = panel_block("", false, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let [left, right] =
        inner.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Length(16)]));

    let title = Text::from(vec![
        Line::from(Span::styled(
            "Your Emotional Journey",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Understanding your stress patterns",
            Style::default().fg(theme.subtitle),
        )),
    ]);
    frame.render_widget(Paragraph::new(title), left);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "[n] New Session",
            Style::default().fg(theme.text_dim),
        )))
        .alignment(Alignment::Right),
        right,
    );
}

/// The three headline tiles.
fn render_tiles(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let summary = analytics::summarize(&state.history);
    let [a, b, c] = area.layout(&Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ]));

    stat_tile(frame, a, "Total Sessions", summary.total_sessions.to_string(), theme);
    stat_tile(
        frame,
        b,
        "Avg Improvement",
        format!("{:+.1}", summary.average_improvement),
        theme,
    );
    stat_tile(frame, c, "Total Hits", summary.total_hits.to_string(), theme);
}

fn stat_tile(frame: &mut Frame, area: Rect, label: &str, value: String, theme: &Theme) {
    let block = panel_block("", false, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let text = Text::from(vec![
        Line::from(Span::styled(label.to_owned(), Style::default().fg(theme.stat_label))),
        Line::from(Span::styled(
            value,
            Style::default().fg(theme.stat_value).add_modifier(Modifier::BOLD),
        )),
    ]);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

/// Bar chart of session counts per stressor, in first-seen order.
fn render_distribution(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let distribution = analytics::stressor_distribution(&state.history);
    let bars: Vec<Bar> = distribution
        .iter()
        .map(|(stressor, count)| {
            let (r, g, b) = stressor.color();
            Bar::default()
                .label(Line::from(stressor.label()))
                .value(*count as u64)
                .style(Style::default().fg(Color::Rgb(r, g, b)))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel_block("Your Stress Triggers", false, theme))
        .bar_width(17)
        .bar_gap(3)
        .bar_style(Style::default().fg(theme.bar))
        .value_style(Style::default().fg(theme.stat_value).add_modifier(Modifier::BOLD))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

/// Line chart of (before, after) ratings over the last seven sessions.
fn render_trend(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let trend = analytics::emotion_trend(&state.history);
    let before: Vec<(f64, f64)> = trend
        .iter()
        .enumerate()
        .map(|(i, (b, _))| ((i + 1) as f64, f64::from(*b)))
        .collect();
    let after: Vec<(f64, f64)> = trend
        .iter()
        .enumerate()
        .map(|(i, (_, a))| ((i + 1) as f64, f64::from(*a)))
        .collect();

    let datasets = vec![
        Dataset::default()
            .name("Before")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.trend_before))
            .data(&before),
        Dataset::default()
            .name("After")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.trend_after))
            .data(&after),
    ];

    let x_max = trend.len().max(2) as f64;
    let chart = Chart::new(datasets)
        .block(panel_block("Emotion Trend (Last 7 Sessions)", false, theme))
        .x_axis(
            Axis::default()
                .bounds([1.0, x_max])
                .labels(["1".to_owned(), format!("{}", trend.len().max(2))])
                .style(Style::default().fg(theme.chart_axis)),
        )
        .y_axis(
            Axis::default()
                .bounds([1.0, 5.0])
                .labels(["1".to_owned(), "3".to_owned(), "5".to_owned()])
                .style(Style::default().fg(theme.chart_axis)),
        );
    frame.render_widget(chart, area);
}

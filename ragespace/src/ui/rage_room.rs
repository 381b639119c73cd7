//! Rage room renderer.
//!
//! Header with the hit counter, the rage-meter gauge, the combo flash, the
//! interactive braille canvas, and (once the meter crosses the threshold)
//! the satisfaction prompt.
//!
//! The canvas maps a fixed 600×400 world onto whatever cells are
//! available. The particle engine uses screen-style coordinates (y grows
//! downward), so particles are drawn at `WORLD_HEIGHT - y`. While a shake
//! window is open the whole viewport is offset by a small random amount
//! each frame, which is what makes the room judder after a hit.
//!
//! The renderer caches the canvas's inner rect into `AppState` so mouse
//! clicks on the next event can be mapped back into world coordinates.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Points, Rectangle},
        Gauge, Paragraph,
    },
    Frame,
};

use ragespace_core::catalog::StressorType;

use crate::app::{AppState, WORLD_HEIGHT, WORLD_WIDTH};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the rage room into `area`.
pub fn render_rage_room(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let column = area.centered(Constraint::Max(90), Constraint::Fill(1));
    let prompt_height = if state.flow.satisfaction_visible() { 6 } else { 0 };

    let [header, meter, combo_line, canvas_area, prompt_area] = column.layout(&Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(prompt_height),
    ]));

    render_header(frame, header, state, theme);
    render_meter(frame, meter, state, theme);
    render_combo(frame, combo_line, state, theme);
    render_canvas(frame, canvas_area, state, theme);
    if prompt_height > 0 {
        render_prompt(frame, prompt_area, theme);
    }
}

/// Title and tagline on the left, the big hit counter on the right.
fn render_header(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = panel_block("", false, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let [left, right] =
        inner.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]));

    let title = Text::from(vec![
        Line::from(Span::styled(
            "Release Your Stress",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Click or tap rapidly to let it all out!",
            Style::default().fg(theme.subtitle),
        )),
    ]);
    frame.render_widget(Paragraph::new(title), left);

    let hits = Text::from(vec![
        Line::from(Span::styled(
            state.flow.hit_count().to_string(),
            Style::default().fg(theme.hits).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("hits", Style::default().fg(theme.text_dim))),
    ]);
    frame.render_widget(Paragraph::new(hits).alignment(Alignment::Right), right);
}

/// The rage meter: a labelled gauge tracking `FlowState::intensity`.
fn render_meter(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let intensity = state.flow.intensity();
    let gauge = Gauge::default()
        .block(panel_block("", false, theme))
        .gauge_style(Style::default().fg(theme.meter_filled).bg(theme.meter_empty))
        .percent(u16::from(intensity))
        .label(format!("Rage Meter: {intensity}%"));
    frame.render_widget(gauge, area);
}

/// The "Nx COMBO!" flash, blank while the combo is 0.
fn render_combo(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let combo = state.flow.combo();
    if combo == 0 {
        return;
    }
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("{combo}x COMBO! 🔥"),
            Style::default().fg(theme.combo).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        area,
    );
}

/// The interactive canvas: target art plus live particles.
///
/// Skips the frame silently when there is no drawable area (terminal too
/// small, mid-resize); a skipped frame is invisible at 30 FPS and never an
/// error.
fn render_canvas(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let inner = inner_rect(area);
    state.canvas_rect = inner;
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let Some(stressor) = state.flow.stressor() else {
        return;
    };

    let (shake_x, shake_y) = if state.shake_active(AppState::now_ms()) {
        state.shake_offset()
    } else {
        (0.0, 0.0)
    };

    let damage = f64::from(state.flow.hit_count()) / 2.0;
    let target_color = fade(stressor.color(), (1.0 - damage / 50.0).max(0.3));
    let particle_base = stressor.color();
    let particles = state.particles.particles();

    let canvas = Canvas::default()
        .block(panel_block("Tap anywhere to release stress", true, theme))
        .marker(Marker::Braille)
        .x_bounds([shake_x, WORLD_WIDTH + shake_x])
        .y_bounds([shake_y, WORLD_HEIGHT + shake_y])
        .paint(|ctx| {
            draw_target(ctx, stressor, damage, target_color);
            for p in particles {
                // Engine y grows downward; canvas y grows upward.
                ctx.draw(&Points {
                    coords: &[(p.x, WORLD_HEIGHT - p.y)],
                    color: fade(particle_base, p.life),
                });
            }
        });
    frame.render_widget(canvas, area);
}

/// Draws the per-stressor target art, shrunk and dimmed by `damage`.
///
/// Cosmetic only: damage is a pure function of the hit count and feeds
/// nothing back into the flow.
fn draw_target(
    ctx: &mut ratatui::widgets::canvas::Context<'_>,
    stressor: StressorType,
    damage: f64,
    color: Color,
) {
    let cx = WORLD_WIDTH / 2.0;
    let cy = WORLD_HEIGHT / 2.0;

    match stressor {
        // A leaning stack of books, sliding apart as damage grows.
        StressorType::Academic => {
            for i in 0..3 {
                let i = f64::from(i);
                ctx.draw(&Rectangle {
                    x: cx - 60.0 + i * 40.0 - damage,
                    y: cy - 10.0 - i * 20.0,
                    width: 50.0,
                    height: 70.0,
                    color,
                });
            }
        }
        // Three heads in a huddle, deflating.
        StressorType::Social => {
            let radius = (30.0 - damage / 5.0).max(8.0);
            for (dx, dy) in [(-50.0, 30.0), (50.0, 30.0), (0.0, -30.0)] {
                ctx.draw(&Circle { x: cx + dx, y: cy + dy, radius, color });
            }
        }
        // A ring of storm clouds drifting outward.
        StressorType::Future => {
            let radius = (20.0 - damage / 10.0).max(4.0);
            let ring = 60.0 + damage;
            for i in 0..5 {
                let angle = f64::from(i) * std::f64::consts::PI / 2.5;
                ctx.draw(&Circle {
                    x: cx + angle.cos() * ring,
                    y: cy + angle.sin() * ring,
                    radius,
                    color,
                });
            }
        }
        // One big everything-ball.
        StressorType::General => {
            ctx.draw(&Circle { x: cx, y: cy, radius: (60.0 - damage / 3.0).max(15.0), color });
        }
    }
}

/// The satisfaction prompt shown once the meter reaches the threshold.
fn render_prompt(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = panel_block("", true, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let text = Text::from(vec![
        Line::from(Span::styled(
            "You did great taking out your rage! 👍",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Are you satisfied?", Style::default().fg(theme.subtitle))),
        Line::default(),
        Line::from(vec![
            Span::styled(
                "[y] Yes, I feel better ✨",
                Style::default().fg(theme.prompt_yes).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled(
                "[n] No, continue 💪",
                Style::default().fg(theme.prompt_no).add_modifier(Modifier::BOLD),
            ),
        ]),
    ]);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

/// Scales an RGB triple toward black; `factor` 1.0 is full brightness.
fn fade((r, g, b): (u8, u8, u8), factor: f64) -> Color {
    let factor = factor.clamp(0.0, 1.0);
    Color::Rgb(
        (f64::from(r) * factor) as u8,
        (f64::from(g) * factor) as u8,
        (f64::from(b) * factor) as u8,
    )
}

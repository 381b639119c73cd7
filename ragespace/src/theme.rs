//! Color theme system for ragespace.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI
//! surface ragespace renders. Two built-in themes are provided:
//!
//! - `dark` — uses ANSI 16 colors (`Color::Reset`, `Color::DarkGray`, etc.)
//!   so it works on any terminal, including 256-color SSH sessions with no
//!   truecolor support.
//! - `ember` — a warm RGB palette; requires truecolor.
//!
//! Stressor brand colors are intentionally not here: they are catalog data
//! (`StressorType::color`) and travel with the stressor, the same way a
//! file's status color travels with the file elsewhere. The theme only
//! covers chrome: borders, meters, charts, and the status bar.

use ratatui::style::Color;

/// All color values used across ragespace's UI surfaces.
///
/// Every field is a `ratatui::style::Color`. Callers use `theme.field`
/// directly inside `Style::default().fg(theme.border_active)`.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the panel the user is interacting with.
    pub border_active: Color,
    /// Border color for secondary panels.
    pub border_inactive: Color,

    // Headings
    /// Screen titles ("Release Your Stress", ...).
    pub title: Color,
    /// Subtitles and helper copy under titles.
    pub subtitle: Color,
    /// De-emphasized hint text (key legends, captions).
    pub text_dim: Color,

    // Rage room
    /// Filled portion of the rage meter gauge.
    pub meter_filled: Color,
    /// Unfilled portion of the rage meter gauge.
    pub meter_empty: Color,
    /// The "Nx COMBO!" flash line.
    pub combo: Color,
    /// The large hit counter.
    pub hits: Color,
    /// The "yes, I feel better" prompt option.
    pub prompt_yes: Color,
    /// The "no, continue" prompt option.
    pub prompt_no: Color,

    // Analytics
    /// Big numbers in the stat tiles.
    pub stat_value: Color,
    /// Labels above the stat-tile numbers.
    pub stat_label: Color,
    /// Axis lines and labels on both charts.
    pub chart_axis: Color,
    /// Bars of the stressor distribution chart.
    pub bar: Color,
    /// The "before" line of the trend chart.
    pub trend_before: Color,
    /// The "after" line of the trend chart.
    pub trend_after: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Cloud/sync notices shown at the right of the status bar.
    pub notice: Color,

    // General
    /// Application background (used for clearing areas).
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    ///
    /// Works on all terminals: 16-color, 256-color, and truecolor. Suitable
    /// as the default when no config is present or color capability is unknown.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Magenta,
            border_inactive: Color::DarkGray,

            title: Color::White,
            subtitle: Color::Magenta,
            text_dim: Color::DarkGray,

            meter_filled: Color::Red,
            meter_empty: Color::Black,
            combo: Color::Yellow,
            hits: Color::Yellow,
            prompt_yes: Color::Green,
            prompt_no: Color::Yellow,

            stat_value: Color::White,
            stat_label: Color::DarkGray,
            chart_axis: Color::Gray,
            bar: Color::Magenta,
            trend_before: Color::Red,
            trend_after: Color::Green,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            notice: Color::Cyan,

            background: Color::Reset,
        }
    }

    /// Returns the ember theme using RGB truecolor values.
    ///
    /// A warm palette matching the app's rage-room mood. Colors degrade to
    /// the nearest ANSI 256-color approximation on non-truecolor terminals,
    /// but visual fidelity is reduced. Use `dark()` on SSH or 256-color
    /// terminals.
    pub fn ember() -> Self {
        let flame = Color::Rgb(0xf9, 0x73, 0x16);
        let gold = Color::Rgb(0xfb, 0xbf, 0x24);
        let crimson = Color::Rgb(0xdc, 0x26, 0x26);
        let plum = Color::Rgb(0x7e, 0x22, 0xce);
        let orchid = Color::Rgb(0xc0, 0x84, 0xfc);
        let smoke = Color::Rgb(0x6b, 0x72, 0x80);
        let char_bg = Color::Rgb(0x1c, 0x19, 0x17);
        let surface = Color::Rgb(0x3f, 0x2d, 0x2a);
        let parchment = Color::Rgb(0xf5, 0xf0, 0xe8);
        let mint = Color::Rgb(0x34, 0xd3, 0x99);

        Self {
            border_active: flame,
            border_inactive: smoke,

            title: parchment,
            subtitle: orchid,
            text_dim: smoke,

            meter_filled: crimson,
            meter_empty: char_bg,
            combo: gold,
            hits: gold,
            prompt_yes: mint,
            prompt_no: flame,

            stat_value: parchment,
            stat_label: smoke,
            chart_axis: smoke,
            bar: plum,
            trend_before: crimson,
            trend_after: mint,

            status_bar_bg: surface,
            status_bar_fg: parchment,
            notice: orchid,

            background: char_bg,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never
    /// prevents startup. The fallback is logged to stderr (not a hard error).
    ///
    /// # Arguments
    ///
    /// * `name` — theme name from config, e.g. `"dark"` or `"ember"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ember" => Self::ember(),
            "dark" => Self::dark(),
            other => {
                eprintln!("ragespace: unknown theme '{}', falling back to 'dark'", other);
                Self::dark()
            }
        }
    }
}

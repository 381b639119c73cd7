//! Terminal lifecycle management for ragespace.
//!
//! The TUI renders to a buffered stdout handle. Buffering batches escape
//! sequences into fewer write(2) syscalls, which matters at a 30 FPS render
//! interval with a braille canvas redrawn every frame. Mouse capture is
//! enabled because tapping the canvas is the primary rage-room interaction.

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::{stdout, BufWriter, Stdout};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

/// The terminal type used by ragespace — CrosstermBackend over buffered stdout.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stdout>>>;

/// Initialise the terminal for TUI rendering.
///
/// Enables raw mode, enters the alternate screen, and turns on mouse
/// capture. Call [`restore_tui`] at every exit path.
///
/// # Errors
///
/// Returns `Err` if `enable_raw_mode`, `execute!`, or `Terminal::new` fails.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut out = BufWriter::new(stdout());
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Restore the terminal to its pre-TUI state.
///
/// Disables raw mode, releases mouse capture, and leaves the alternate
/// screen. Idempotent; must be called at every exit path — including the
/// panic hook — because ratatui 0.30 does NOT auto-restore the terminal on
/// `Drop` (see ratatui GitHub #2087).
///
/// # Errors
///
/// Returns `Err` if `disable_raw_mode` or `execute!` fails. Callers in the
/// panic hook should use `let _ = restore_tui();` (best-effort only).
pub fn restore_tui() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
///
/// Must be called **before** [`init_tui`]. Chains onto any previously
/// installed hook so the default (or test framework's) panic printer still
/// runs after the terminal is restored. Without this hook a panic leaves
/// the terminal in raw mode with the alternate screen active, making the
/// message invisible and the shell unusable until the user types `reset`.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal first so the panic message is readable.
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

/// Register a SIGTERM handler that sets an `AtomicBool` flag.
///
/// Returns an `Arc<AtomicBool>` that transitions from `false` to `true`
/// when the process receives SIGTERM. The main event loop polls this flag
/// on a heartbeat (see `main.rs`).
///
/// # Panics
///
/// Panics if the OS refuses to register the signal handler (extremely rare;
/// treated as a fatal initialisation error rather than a recoverable one).
pub fn register_sigterm() -> Arc<AtomicBool> {
    let term = Arc::new(AtomicBool::new(false));
    // signal_hook::flag::register only performs an atomic store in the
    // handler, which is async-signal-safe.
    register(SIGTERM, Arc::clone(&term)).expect("Failed to register SIGTERM handler");
    term
}

//! ragespace — a terminal rage room for stress relief.
//!
//! Entry point for the `ragespace` binary. Wires together the terminal
//! lifecycle (`tui`), unified event bus (`event`), application state
//! (`app`), per-screen rendering (`ui`), theme system (`theme`), the
//! session store (`ragespace-core`), and the optional cloud worker
//! (`cloud`).
//!
//! # Startup sequence (order matters)
//!
//! 1. Load config and theme — read-only, safe before terminal init.
//! 2. Initialise file logging — also before the terminal, so a failure can
//!    print to stderr while stderr is still visible.
//! 3. `install_panic_hook()` — installed before `init_tui` so it restores
//!    the terminal before the panic message prints.
//! 4. `register_sigterm()` — returns the flag polled in the event loop.
//! 5. `init_tui()` — enters alternate screen and enables raw mode.
//! 6. Create the event channel and `spawn_event_task()`.
//! 7. Open the store and load the history before the first frame, so there
//!    is no "loading" state to manage. Store failure here is the one hard
//!    startup error: without it the app cannot keep its persistence
//!    promise.
//! 8. Spawn the cloud worker thread only when the config enables it, and
//!    queue the startup login.
//!
//! # Safety
//!
//! The event loop exits only via `break`, never via `?` (except the Render
//! arm, whose draw errors propagate out of the loop). `restore_tui()` is
//! therefore always reached: normal quit, SIGTERM, or channel close. The
//! panic hook covers the panic path.

mod app;
mod cloud;
mod config;
mod event;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::ui::keybindings::{self, KeyAction};

/// Resolves the data directory, creating it if needed.
///
/// Prefers the platform data-local dir (`~/.local/share/ragespace` on
/// Linux); falls back to a `.ragespace` directory next to the binary's
/// working directory when the platform dir cannot be resolved.
fn data_dir() -> std::io::Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .map(|d| d.join("ragespace"))
        .unwrap_or_else(|| PathBuf::from(".ragespace"));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Initialises file-based tracing in the data directory.
///
/// The TUI owns the terminal, so logs go to `ragespace.log` instead of
/// stderr. `RUST_LOG` filters as usual, defaulting to `info`. A failure to
/// open the log file is a soft failure: the app runs unlogged.
fn init_logging(dir: &std::path::Path) {
    let Ok(log_file) = std::fs::File::create(dir.join("ragespace.log")) else {
        eprintln!("ragespace: could not open log file, continuing without logs");
        return;
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false);
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Step 0: config, theme, and logging — all read-only or file-scoped,
    // safe before terminal init.
    let config = config::load();
    let theme = theme::Theme::from_name(config::theme_name(&config));
    let dir = data_dir()?;
    init_logging(&dir);

    let mut state = app::AppState::default();

    // Step 1: panic hook installed first — innermost hook restores terminal.
    tui::install_panic_hook();

    // Step 2: SIGTERM flag — polled in the 50ms heartbeat arm below.
    let term_flag = tui::register_sigterm();

    // Step 3: enter alternate screen and raw mode.
    let mut terminal = tui::init_tui()?;

    // Step 4: create event channel and spawn the background event task.
    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    state.tx = Some(handler.tx.clone());
    let mut rx = handler.rx;

    // Step 5: open the store and load the history before the first frame.
    let store_path = dir.join("sessions.db");
    let conn = ragespace_core::store::open_store(&store_path.to_string_lossy())
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    state.history = ragespace_core::store::load_history(&conn)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    tracing::info!(sessions = state.history.len(), "history loaded");

    // Step 6: cloud worker, only when configured. The worker owns the HTTP
    // agent on its own thread; dropping `state.cloud_tx` ends its loop.
    if config.cloud.active() {
        let (cloud_tx, cloud_rx) = crossbeam_channel::unbounded();
        let worker_config = config.cloud.clone();
        let event_tx = handler.tx.clone();
        std::thread::spawn(move || {
            cloud::worker::cloud_worker_loop(worker_config, cloud_rx, event_tx);
        });
        let startup = if config.cloud.auto_register {
            cloud::CloudRequest::CreateAccount {
                email: config.cloud.email.clone(),
                password: config.cloud.password.clone(),
            }
        } else {
            cloud::CloudRequest::Login {
                email: config.cloud.email.clone(),
                password: config.cloud.password.clone(),
            }
        };
        let _ = cloud_tx.send(startup);
        state.cloud_tx = Some(cloud_tx);
    }

    // Event loop — exits only via `break`, never via `?` (Render draw
    // errors break out through the `?` on terminal.draw and still reach
    // restore_tui below because main returns after the loop).
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: guarantees SIGTERM is checked at least every 50ms,
            // even when no event arrives. Without this arm a quiescent
            // terminal blocks forever in rx.recv() and the flag is never
            // polled.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event::AppEvent::Render) => {
                        // Exactly one draw() call per Render event — never elsewhere.
                        terminal.draw(|frame| ui::render(frame, &mut state, &theme))?;
                    }
                    Some(event::AppEvent::Key(key)) => {
                        if keybindings::handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Mouse(mouse)) => {
                        let _ = keybindings::handle_mouse(mouse, &mut state);
                    }
                    Some(event::AppEvent::Frame) => {
                        state.apply_frame();
                    }
                    Some(event::AppEvent::ComboExpired { generation }) => {
                        state.expire_combo(generation);
                    }
                    Some(event::AppEvent::Cloud(update)) => {
                        state.apply_cloud_update(update);
                    }
                    Some(event::AppEvent::Resize(_, _)) => {
                        // ratatui re-reads the terminal size on the next
                        // Render; the canvas rect is re-cached then too.
                    }
                    Some(event::AppEvent::Tick) => {}
                    Some(event::AppEvent::Quit) | None => break 'event_loop,
                    _ => {}
                }

                // A completed flow parks its record; persist it here so the
                // write happens on the loop, not inside a key handler.
                if let Some(record) = state.take_pending_record() {
                    if let Err(e) = ragespace_core::store::save_history(&conn, &state.history).await {
                        tracing::error!("failed to persist session: {e}");
                        state.notice = Some("could not save session".to_owned());
                    } else {
                        tracing::info!(hits = record.hit_count, "session persisted");
                        state.cloud_request(cloud::CloudRequest::PushRecord(record));
                        state.cloud_request(cloud::CloudRequest::UpdateStreak);
                    }
                }

                // Check SIGTERM after every event too, not just on the
                // heartbeat, so quit latency is at most one event cycle.
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    // Stop the animation loop and combo timer before tearing down the
    // terminal; quitting from inside the rage room is an exit path too.
    // The logout is fire-and-forget: the worker drains its channel and
    // exits once `state` (and with it the sender) is dropped.
    state.cloud_request(cloud::CloudRequest::Logout);
    state.shutdown();

    // Restore the terminal at the single exit point of the loop.
    tui::restore_tui()?;
    Ok(())
}

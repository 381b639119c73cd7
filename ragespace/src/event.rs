//! Event bus for ragespace.
//!
//! All user input, timer ticks, and background-task results are normalised
//! into a single `AppEvent` enum and sent over a tokio unbounded MPSC
//! channel. The main loop receives from this channel and dispatches
//! accordingly.
//!
//! Three timing sources exist, deliberately independent:
//!
//! - **Render interval** (33 ms ≈ 30 FPS) — triggers a `terminal.draw()` call.
//! - **Tick interval** (250 ms = 4 Hz) — low-frequency housekeeping.
//! - **Animation interval** (16 ms ≈ 60 Hz) — drives the particle physics
//!   step, but only exists while the rage room is on screen. It is owned by
//!   [`AnimationLoop`], which is started on entry and aborted on every exit
//!   path; an animation task outliving the rage room is a bug, not a
//!   harmless leak.
//!
//! The combo-reset debounce is [`ComboTimer`]: a one-shot 1-second task that
//! is re-armed (and its predecessor aborted) on every hit. The generation
//! tag carried by its event lets the flow machine discard a firing that
//! raced with the abort.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::cloud::CloudUpdate;

/// All events the application can receive from any source.
///
/// Marked `#[non_exhaustive]` so new variants (e.g. remote streak pushes)
/// do not break exhaustive match arms in existing handlers.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A key press from the terminal (`KeyEventKind::Press` only).
    ///
    /// Release and repeat events are filtered in [`spawn_event_task`] to
    /// avoid double-firing on Windows, which synthesises both press and
    /// release for every keystroke.
    Key(KeyEvent),
    /// A mouse event from the terminal (click, scroll, move).
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Low-frequency housekeeping tick (4 Hz / 250 ms).
    Tick,
    /// Render tick — triggers a `terminal.draw()` call (≈30 FPS / 33 ms).
    Render,
    /// Animation frame — advances the particle physics (≈60 Hz / 16 ms).
    /// Only produced while the rage room's [`AnimationLoop`] is running.
    Frame,
    /// The 1-second combo window elapsed for the hit tagged `generation`.
    ComboExpired { generation: u64 },
    /// Result from the cloud worker thread.
    Cloud(CloudUpdate),
    /// Quit signal (from `q` key or SIGTERM).
    Quit,
}

/// Holds the sender and receiver ends of the unified event channel.
///
/// The sender (`tx`) is cloned and distributed to background tasks;
/// the receiver (`rx`) is owned by the main event loop.
pub struct EventHandler {
    /// Send half — clone this for each background task that produces events.
    pub tx: mpsc::UnboundedSender<AppEvent>,
    /// Receive half — owned by the main loop; call `.recv().await` to block
    /// until the next event.
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// Creates a new `EventHandler` with a fresh unbounded channel.
    ///
    /// Unbounded is appropriate here: the producers (terminal events plus
    /// timers) generate events at a bounded hardware rate and the consumer
    /// always keeps up.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the background tokio task that drives the unified event channel.
///
/// The task runs until the `tx` sender is dropped. Two fully independent
/// `tokio::time::interval` timers drive the render and tick cycles;
/// crossterm input is polled via `EventStream`.
///
/// # Key implementation choices
///
/// - `reader.next().fuse()` — required so that if the crossterm stream
///   terminates unexpectedly, `tokio::select!` does not keep polling a
///   completed future (which would cause a panic).
/// - `KeyEventKind::Press` filter — Windows fires both `Press` and
///   `Release` for every keystroke; without the filter every key press
///   appears twice.
/// - Send errors are silently ignored (`let _ = tx.send(…)`) — if the
///   receiver has been dropped, the task simply exits on the next loop
///   iteration when it tries to send.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            tokio::select! {
                _ = tick_tick => {
                    let _ = tx.send(AppEvent::Tick);
                }
                _ = render_tick => {
                    let _ = tx.send(AppEvent::Render);
                }
                maybe_event = crossterm_event => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            if key.kind == KeyEventKind::Press {
                                let _ = tx.send(AppEvent::Key(key));
                            }
                        }
                        Some(Ok(Event::Resize(w, h))) => {
                            let _ = tx.send(AppEvent::Resize(w, h));
                        }
                        Some(Ok(Event::Mouse(mouse))) => {
                            let _ = tx.send(AppEvent::Mouse(mouse));
                        }
                        _ => {}
                    }
                }
            }
        }
    });
}

/// The scoped ≈60 Hz animation driver for the rage room.
///
/// `start()` spawns an interval task sending [`AppEvent::Frame`]; `stop()`
/// aborts it. The handle is owned by `AppState`, and every transition that
/// leaves the rage room (satisfaction confirm, abandon, quit) must call
/// `stop()`. Dropping the loop also aborts the task, as a backstop for the
/// teardown path.
#[derive(Debug, Default)]
pub struct AnimationLoop {
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl AnimationLoop {
    /// Starts the frame interval. A previous task, if any, is aborted first
    /// so at most one animation task ever exists.
    pub fn start(&mut self, tx: mpsc::UnboundedSender<AppEvent>) {
        self.stop();
        self.handle = Some(tokio::spawn(async move {
            let mut frame_interval = interval(Duration::from_millis(16));
            loop {
                frame_interval.tick().await;
                if tx.send(AppEvent::Frame).is_err() {
                    break;
                }
            }
        }));
    }

    /// Aborts the frame task. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether a frame task is currently held.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The re-armable one-shot combo-reset timer.
///
/// Each hit calls `arm()` with the generation returned by the flow machine:
/// the previous sleep task is aborted and a fresh 1-second one is spawned.
/// If an aborted task already fired, its event still carries the stale
/// generation and `FlowState::expire_combo` ignores it, so the abort and
/// the generation check together guarantee a rescheduled window never
/// resets a live combo early.
#[derive(Debug, Default)]
pub struct ComboTimer {
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl ComboTimer {
    /// Cancels the previous window and schedules a new one for `generation`.
    pub fn arm(&mut self, tx: mpsc::UnboundedSender<AppEvent>, generation: u64) {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(
                ragespace_core::flow::COMBO_WINDOW_MS,
            ))
            .await;
            let _ = tx.send(AppEvent::ComboExpired { generation });
        }));
    }

    /// Aborts the pending window, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ComboTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

//! Central application state for ragespace.
//!
//! `AppState` bundles the core flow machine and particle engine with the
//! UI-only state around them: menu cursors, the shake window, the status
//! notice, the cached canvas rect for mouse mapping, and the handles for
//! the scoped animation loop and the combo-reset timer. No ratatui
//! rendering logic lives here — this module is state that the render
//! module reads and the keybinding dispatcher mutates.
//!
//! The transition methods wrap the core machine's transitions with their
//! host effects, so every caller gets the full behavior: entering the rage
//! room starts the animation loop, every hit re-arms the combo timer and
//! the shake window, and every path that leaves the room stops the loop.
//! Keeping that pairing in one place is what guarantees the animation task
//! cannot outlive the screen it animates.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;

use ragespace_core::catalog::{EmotionRating, StressorType};
use ragespace_core::flow::{FlowState, Screen};
use ragespace_core::particles::ParticleEngine;
use ragespace_core::{store, SessionRecord};

use crate::cloud::{CloudRequest, CloudUpdate};
use crate::event::{AnimationLoop, AppEvent, ComboTimer};

/// Width of the rage-room world the canvas maps onto.
pub const WORLD_WIDTH: f64 = 600.0;
/// Height of the rage-room world the canvas maps onto.
pub const WORLD_HEIGHT: f64 = 400.0;

/// How long the viewport shakes after a hit.
pub const SHAKE_DURATION_MS: u64 = 100;
/// Maximum shake offset in world units, either direction on both axes.
pub const SHAKE_MAGNITUDE: f64 = 6.0;

/// All mutable application state passed through every render cycle.
///
/// The render function receives `&mut AppState` (it caches the canvas rect
/// back into it), the keybinding dispatcher receives `&mut AppState`, and
/// the main loop owns it for the lifetime of the process.
pub struct AppState {
    /// The core flow machine; the current screen lives here.
    pub flow: FlowState,
    /// Live particles for the rage-room canvas.
    pub particles: ParticleEngine,
    /// In-memory snapshot of the persisted history, oldest first.
    pub history: Vec<SessionRecord>,

    /// Stateful list widget backing the welcome stressor menu.
    pub stressor_list: ListState,
    /// Stateful list widget backing the emotion pickers (before and after).
    pub emotion_list: ListState,

    /// Shake window deadline; the canvas jitters while `now_ms` is below it.
    pub shake_until_ms: Option<u64>,
    /// Latest cloud/sync notice for the status bar.
    pub notice: Option<String>,

    /// Inner rect of the rage-room canvas, cached after each render.
    /// Used to map mouse clicks into world coordinates.
    pub canvas_rect: Rect,

    /// A record produced by a completed flow, waiting for the main loop
    /// to persist it. Taken (and cleared) via [`AppState::take_pending_record`].
    pending_record: Option<SessionRecord>,

    /// Event sender for arming timers. `None` only in tests that do not
    /// exercise timers.
    pub tx: Option<UnboundedSender<AppEvent>>,
    /// Request channel into the cloud worker; `None` when cloud is disabled.
    pub cloud_tx: Option<crossbeam_channel::Sender<CloudRequest>>,

    /// The scoped ≈60 Hz animation driver; running only in the rage room.
    pub animation: AnimationLoop,
    combo_timer: ComboTimer,
}

impl Default for AppState {
    fn default() -> Self {
        let mut stressor_list = ListState::default();
        stressor_list.select(Some(0));
        let mut emotion_list = ListState::default();
        emotion_list.select(Some(0));

        Self {
            flow: FlowState::new(),
            particles: ParticleEngine::new(),
            history: Vec::new(),
            stressor_list,
            emotion_list,
            shake_until_ms: None,
            notice: None,
            canvas_rect: Rect::default(),
            pending_record: None,
            tx: None,
            cloud_tx: None,
            animation: AnimationLoop::default(),
            combo_timer: ComboTimer::default(),
        }
    }
}

impl AppState {
    /// Milliseconds since the Unix epoch. The single clock for the combo
    /// window and the shake deadline.
    pub fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    // -----------------------------------------------------------------
    // Menu helpers
    // -----------------------------------------------------------------

    /// Moves the active menu cursor up one row.
    pub fn menu_up(&mut self) {
        match self.flow.screen() {
            Screen::Welcome => self.stressor_list.scroll_up_by(1),
            Screen::BeforeEmotion | Screen::AfterEmotion => self.emotion_list.scroll_up_by(1),
            _ => {}
        }
    }

    /// Moves the active menu cursor down one row.
    pub fn menu_down(&mut self) {
        match self.flow.screen() {
            Screen::Welcome => {
                let max = StressorType::ALL.len() - 1;
                let next = self.stressor_list.selected().unwrap_or(0).saturating_add(1);
                self.stressor_list.select(Some(next.min(max)));
            }
            Screen::BeforeEmotion | Screen::AfterEmotion => {
                let max = EmotionRating::SCALE.len() - 1;
                let next = self.emotion_list.selected().unwrap_or(0).saturating_add(1);
                self.emotion_list.select(Some(next.min(max)));
            }
            _ => {}
        }
    }

    /// The stressor currently under the welcome-menu cursor.
    pub fn selected_stressor(&self) -> StressorType {
        let idx = self.stressor_list.selected().unwrap_or(0);
        StressorType::ALL[idx.min(StressorType::ALL.len() - 1)]
    }

    /// The rating currently under the emotion-picker cursor.
    pub fn selected_emotion(&self) -> EmotionRating {
        let idx = self.emotion_list.selected().unwrap_or(0);
        EmotionRating::SCALE[idx.min(EmotionRating::SCALE.len() - 1)]
    }

    // -----------------------------------------------------------------
    // Flow transitions with host effects
    // -----------------------------------------------------------------

    /// Welcome → BeforeEmotion with the given stressor.
    pub fn choose_stressor(&mut self, stressor: StressorType) {
        self.flow.choose_stressor(stressor);
        self.emotion_list.select(Some(0));
    }

    /// Records the rating on whichever emotion screen is active.
    ///
    /// On BeforeEmotion this enters the rage room: particles are cleared
    /// and the animation loop starts. On AfterEmotion this completes the
    /// flow: the record joins the in-memory history and is parked for the
    /// main loop to persist and (optionally) push to the cloud.
    pub fn record_emotion(&mut self, rating: EmotionRating) {
        match self.flow.screen() {
            Screen::BeforeEmotion => {
                self.flow.record_before(rating);
                if self.flow.screen() == Screen::RageRoom {
                    self.particles.clear();
                    self.shake_until_ms = None;
                    if let Some(tx) = &self.tx {
                        self.animation.start(tx.clone());
                    }
                }
            }
            Screen::AfterEmotion => {
                if let Some(record) = self.flow.record_after(rating, store::now_secs()) {
                    self.history.push(record.clone());
                    self.pending_record = Some(record);
                    self.emotion_list.select(Some(0));
                }
            }
            _ => {}
        }
    }

    /// Registers a hit at world coordinates `(x, y)`.
    ///
    /// Spawns the particle burst, opens the shake window, and re-arms the
    /// combo-reset timer with the new generation. Outside the rage room
    /// this is a no-op.
    pub fn hit(&mut self, x: f64, y: f64, now_ms: u64) {
        let Some(outcome) = self.flow.register_hit(now_ms) else {
            return;
        };
        self.particles.spawn_burst(x, y, outcome.burst_size);
        self.shake_until_ms = Some(now_ms + SHAKE_DURATION_MS);
        if let Some(tx) = &self.tx {
            self.combo_timer.arm(tx.clone(), outcome.combo_generation);
        }
    }

    /// Keyboard hit: lands near the world center with a little jitter so
    /// repeated presses still scatter the bursts.
    pub fn hit_near_center(&mut self, now_ms: u64) {
        let mut rng = rand::thread_rng();
        let x = WORLD_WIDTH / 2.0 + rng.gen_range(-80.0..=80.0);
        let y = WORLD_HEIGHT / 2.0 + rng.gen_range(-50.0..=50.0);
        self.hit(x, y, now_ms);
    }

    /// Confirms the satisfaction prompt; leaves the rage room on success.
    pub fn confirm_satisfaction(&mut self) {
        self.flow.confirm_satisfaction();
        if self.flow.screen() != Screen::RageRoom {
            self.leave_rage_room();
            self.emotion_list.select(Some(0));
        }
    }

    /// Declines the satisfaction prompt; the meter drains, the room stays.
    pub fn decline_satisfaction(&mut self) {
        self.flow.decline_satisfaction();
    }

    /// Abandons the current flow and returns to Welcome.
    ///
    /// Writes nothing; the persisted history is untouched. All transient
    /// state resets and the animation loop stops.
    pub fn abandon_flow(&mut self) {
        self.leave_rage_room();
        self.flow.start_new_flow();
        self.reset_menus();
    }

    /// Starts a fresh flow from Analytics (or anywhere).
    pub fn new_session(&mut self) {
        self.abandon_flow();
    }

    /// Welcome → Analytics shortcut, offered only with stored history.
    pub fn view_analytics(&mut self) {
        if !self.history.is_empty() {
            self.flow.view_analytics();
        }
    }

    /// Tears down the rage room's scoped resources.
    ///
    /// Every path that leaves the room funnels through here: satisfaction
    /// confirm, abandon, and process shutdown.
    fn leave_rage_room(&mut self) {
        self.animation.stop();
        self.combo_timer.cancel();
        self.particles.clear();
        self.shake_until_ms = None;
    }

    fn reset_menus(&mut self) {
        self.stressor_list.select(Some(0));
        self.emotion_list.select(Some(0));
    }

    // -----------------------------------------------------------------
    // Event application
    // -----------------------------------------------------------------

    /// Advances particle physics by one frame.
    ///
    /// Driven by `AppEvent::Frame`; frames stop arriving the moment the
    /// animation loop is stopped, so no screen check is needed here.
    pub fn apply_frame(&mut self) {
        self.particles.step();
    }

    /// Forwards a combo-window expiry to the flow machine.
    pub fn expire_combo(&mut self, generation: u64) {
        self.flow.expire_combo(generation);
    }

    /// Whether the canvas should jitter this frame.
    pub fn shake_active(&self, now_ms: u64) -> bool {
        self.shake_until_ms.is_some_and(|until| now_ms < until)
    }

    /// A random shake offset within [`SHAKE_MAGNITUDE`] on both axes.
    pub fn shake_offset(&self) -> (f64, f64) {
        let mut rng = rand::thread_rng();
        (
            rng.gen_range(-SHAKE_MAGNITUDE..=SHAKE_MAGNITUDE),
            rng.gen_range(-SHAKE_MAGNITUDE..=SHAKE_MAGNITUDE),
        )
    }

    /// Takes the completed-session record awaiting persistence, if any.
    ///
    /// The main loop calls this after every dispatched event; the record is
    /// produced at most once per flow, so this returns `Some` exactly once
    /// per completed session.
    pub fn take_pending_record(&mut self) -> Option<SessionRecord> {
        self.pending_record.take()
    }

    /// Applies a cloud worker result to the status notice.
    ///
    /// Failures never interrupt the flow: they become a status-bar notice
    /// and the app keeps running local-only.
    pub fn apply_cloud_update(&mut self, update: CloudUpdate) {
        // A successful login is immediately followed by an entry fetch so
        // the status bar can report what the account holds.
        if matches!(update, CloudUpdate::LoggedIn { .. }) {
            self.cloud_request(CloudRequest::FetchEntries);
        }
        self.notice = Some(match update {
            CloudUpdate::LoggedIn { email } => format!("signed in as {email}"),
            CloudUpdate::LoggedOut => "signed out".to_owned(),
            CloudUpdate::RecordPushed => "session synced".to_owned(),
            CloudUpdate::Entries(entries) => format!("{} entries in the cloud", entries.len()),
            CloudUpdate::StreakUpdated(days) => format!("{days}-day streak"),
            CloudUpdate::Failed(notice) => format!("cloud: {notice} (local-only)"),
        });
    }

    /// Sends a request to the cloud worker if one is running.
    pub fn cloud_request(&self, request: CloudRequest) {
        if let Some(tx) = &self.cloud_tx {
            let _ = tx.send(request);
        }
    }

    /// Stops all owned background tasks. Called once before the terminal
    /// is restored.
    pub fn shutdown(&mut self) {
        self.animation.stop();
        self.combo_timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventHandler;

    fn wired_state() -> (AppState, EventHandler) {
        let handler = EventHandler::new();
        let mut state = AppState::default();
        state.tx = Some(handler.tx.clone());
        (state, handler)
    }

    /// Drives a wired state into the rage room.
    fn enter_rage_room(state: &mut AppState) {
        state.choose_stressor(StressorType::Academic);
        state.record_emotion(EmotionRating::new(2).unwrap());
        assert_eq!(state.flow.screen(), Screen::RageRoom);
    }

    #[tokio::test]
    async fn completing_a_flow_parks_exactly_one_record() {
        let (mut state, _handler) = wired_state();
        enter_rage_room(&mut state);
        for i in 0..25 {
            state.hit(300.0, 200.0, i * 100);
        }
        state.confirm_satisfaction();
        assert_eq!(state.flow.screen(), Screen::AfterEmotion);

        state.record_emotion(EmotionRating::new(4).unwrap());
        assert_eq!(state.flow.screen(), Screen::Analytics);
        assert_eq!(state.history.len(), 1);

        let record = state.take_pending_record().expect("record parked");
        assert_eq!(record.hit_count, 25);
        assert!(state.take_pending_record().is_none(), "taken only once");
    }

    #[tokio::test]
    async fn abandoning_persists_nothing_and_stops_animation() {
        let (mut state, _handler) = wired_state();
        enter_rage_room(&mut state);
        assert!(state.animation.is_running());

        state.hit(300.0, 200.0, 0);
        assert!(!state.particles.is_empty());

        state.abandon_flow();
        assert_eq!(state.flow.screen(), Screen::Welcome);
        assert!(!state.animation.is_running());
        assert!(state.particles.is_empty());
        assert!(state.take_pending_record().is_none());
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn confirm_stops_the_animation_loop() {
        let (mut state, _handler) = wired_state();
        enter_rage_room(&mut state);
        for i in 0..25 {
            state.hit(300.0, 200.0, i * 100);
        }
        assert!(state.animation.is_running());
        state.confirm_satisfaction();
        assert!(!state.animation.is_running());
        assert!(state.particles.is_empty());
    }

    #[tokio::test]
    async fn new_session_keeps_history_but_clears_flow() {
        let (mut state, _handler) = wired_state();
        enter_rage_room(&mut state);
        for i in 0..25 {
            state.hit(300.0, 200.0, i * 100);
        }
        state.confirm_satisfaction();
        state.record_emotion(EmotionRating::new(5).unwrap());
        let _ = state.take_pending_record();
        assert_eq!(state.history.len(), 1);

        state.new_session();
        assert_eq!(state.flow.screen(), Screen::Welcome);
        assert_eq!(state.flow.hit_count(), 0);
        assert!(state.flow.stressor().is_none());
        assert_eq!(state.history.len(), 1, "history untouched");
    }

    #[test]
    fn analytics_shortcut_needs_history() {
        let mut state = AppState::default();
        state.view_analytics();
        assert_eq!(state.flow.screen(), Screen::Welcome);

        state.history.push(SessionRecord {
            id: "x".to_owned(),
            stressor: StressorType::Social,
            emotion_before: EmotionRating::new(2).unwrap(),
            emotion_after: EmotionRating::new(4).unwrap(),
            hit_count: 10,
            intensity_reached: 50,
            recorded_at: 0,
        });
        state.view_analytics();
        assert_eq!(state.flow.screen(), Screen::Analytics);
    }

    #[test]
    fn menu_cursors_stay_in_bounds() {
        let mut state = AppState::default();
        for _ in 0..10 {
            state.menu_down();
        }
        assert_eq!(state.selected_stressor(), StressorType::General);
        for _ in 0..10 {
            state.menu_up();
        }
        assert_eq!(state.selected_stressor(), StressorType::Academic);
    }
}

//! The flow state machine.
//!
//! One `FlowState` instance owns all transient per-flow fields: the current
//! screen, the chosen stressor, the pre/post mood ratings, the hit counter,
//! the combo counter, and the rage meter. No rendering logic lives here —
//! the TUI reads this state to decide what to draw and calls the transition
//! methods in response to input events.
//!
//! Time is explicit: methods that depend on it take a `now_ms` argument, so
//! every transition is unit testable without timers. The combo window is
//! enforced twice, on purpose:
//!
//! - `register_hit` checks the gap to the previous hit, so a late hit can
//!   never extend a combo that already lapsed.
//! - `expire_combo` resets the counter when the host's 1-second timer fires,
//!   so the displayed combo drops promptly while the user is idle. Each hit
//!   bumps `combo_generation`; a timer armed for an older generation is
//!   ignored, which is what makes re-arming on every hit safe.

use crate::catalog::{EmotionRating, StressorType};
use crate::types::SessionRecord;

/// Rage-meter increase per hit.
pub const HIT_INTENSITY: u8 = 2;

/// Meter level at which the satisfaction prompt becomes visible.
pub const SATISFACTION_THRESHOLD: u8 = 50;

/// Interaction gap after which the combo counter resets.
pub const COMBO_WINDOW_MS: u64 = 1000;

/// The five screens of the flow, in traversal order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Stressor selection; the initial screen.
    #[default]
    Welcome,
    /// Pre-session mood rating.
    BeforeEmotion,
    /// The interactive tap screen.
    RageRoom,
    /// Post-session mood rating.
    AfterEmotion,
    /// History summaries.
    Analytics,
}

/// What a registered hit asks the host to do.
///
/// The machine itself only mutates counters; particle spawning and timer
/// arming are host effects described by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    /// Number of particles to spawn at the hit point: `5 + combo / 5`.
    pub burst_size: usize,
    /// Combo counter after this hit.
    pub combo: u32,
    /// Tag for the combo-reset timer the host must arm. A timer firing
    /// with any older tag must be discarded via [`FlowState::expire_combo`].
    pub combo_generation: u64,
}

/// All transient state for one flow traversal.
///
/// Reset to initial values whenever a new flow begins (and on abandon).
/// The persisted history lives elsewhere; nothing here survives completion
/// except the `SessionRecord` returned by [`FlowState::record_after`].
#[derive(Debug, Default)]
pub struct FlowState {
    screen: Screen,
    stressor: Option<StressorType>,
    emotion_before: Option<EmotionRating>,
    emotion_after: Option<EmotionRating>,
    hit_count: u32,
    combo: u32,
    combo_generation: u64,
    last_hit_at_ms: Option<u64>,
    intensity: u8,
}

impl FlowState {
    /// A fresh machine on the Welcome screen.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn stressor(&self) -> Option<StressorType> {
        self.stressor
    }

    pub fn emotion_before(&self) -> Option<EmotionRating> {
        self.emotion_before
    }

    pub fn emotion_after(&self) -> Option<EmotionRating> {
        self.emotion_after
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Current rage-meter level, always in 0..=100.
    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    /// Whether the satisfaction prompt is visible.
    ///
    /// A rendering condition, not a transition: the screen stays RageRoom.
    pub fn satisfaction_visible(&self) -> bool {
        self.screen == Screen::RageRoom && self.intensity >= SATISFACTION_THRESHOLD
    }

    /// Welcome → BeforeEmotion, fixing the stressor for this flow.
    ///
    /// Ignored on any other screen.
    pub fn choose_stressor(&mut self, stressor: StressorType) {
        if self.screen != Screen::Welcome {
            return;
        }
        self.stressor = Some(stressor);
        self.screen = Screen::BeforeEmotion;
    }

    /// BeforeEmotion → RageRoom, recording the pre-session mood.
    ///
    /// Resets the hit counter, combo, and rage meter so the room always
    /// starts cold. Ignored on any other screen.
    pub fn record_before(&mut self, rating: EmotionRating) {
        if self.screen != Screen::BeforeEmotion {
            return;
        }
        self.emotion_before = Some(rating);
        self.hit_count = 0;
        self.combo = 0;
        self.last_hit_at_ms = None;
        self.intensity = 0;
        self.screen = Screen::RageRoom;
    }

    /// Registers one interaction in the rage room at time `now_ms`.
    ///
    /// Self-loop on RageRoom: bumps the hit counter, raises the meter by
    /// [`HIT_INTENSITY`] clamped to 100, and advances the combo. If the gap
    /// since the previous hit exceeds [`COMBO_WINDOW_MS`] the combo resets
    /// to 0 before incrementing. Returns `None` on any other screen.
    pub fn register_hit(&mut self, now_ms: u64) -> Option<HitOutcome> {
        if self.screen != Screen::RageRoom {
            return None;
        }

        if let Some(last) = self.last_hit_at_ms {
            if now_ms.saturating_sub(last) > COMBO_WINDOW_MS {
                self.combo = 0;
            }
        }
        self.last_hit_at_ms = Some(now_ms);

        self.hit_count += 1;
        self.intensity = self.intensity.saturating_add(HIT_INTENSITY).min(100);
        self.combo += 1;
        self.combo_generation += 1;

        Some(HitOutcome {
            burst_size: 5 + self.combo as usize / 5,
            combo: self.combo,
            combo_generation: self.combo_generation,
        })
    }

    /// Resets the combo when the host's reset timer fires.
    ///
    /// Only the timer armed by the most recent hit counts: `generation`
    /// must match the current tag, otherwise the firing is stale (a newer
    /// hit re-armed the window) and nothing happens.
    pub fn expire_combo(&mut self, generation: u64) {
        if generation == self.combo_generation {
            self.combo = 0;
        }
    }

    /// RageRoom → AfterEmotion when the user confirms they feel better.
    ///
    /// Only honored while the prompt is visible (meter at or above
    /// [`SATISFACTION_THRESHOLD`]).
    pub fn confirm_satisfaction(&mut self) {
        if self.satisfaction_visible() {
            self.screen = Screen::AfterEmotion;
        }
    }

    /// Declining the prompt stays in the room and drains the meter to 0.
    ///
    /// Hit count and combo history are preserved.
    pub fn decline_satisfaction(&mut self) {
        if self.satisfaction_visible() {
            self.intensity = 0;
        }
    }

    /// AfterEmotion → Analytics, producing the completed-session record.
    ///
    /// Both mood ratings are guaranteed assigned at this point: the screen
    /// order makes `emotion_before` a precondition of ever reaching
    /// AfterEmotion, so no partial record can be constructed. Returns
    /// `None` on any other screen.
    pub fn record_after(&mut self, rating: EmotionRating, now_secs: i64) -> Option<SessionRecord> {
        if self.screen != Screen::AfterEmotion {
            return None;
        }
        let (stressor, emotion_before) = match (self.stressor, self.emotion_before) {
            (Some(s), Some(e)) => (s, e),
            // Unreachable through the public transitions; refuse rather
            // than fabricate a partial record.
            _ => return None,
        };
        self.emotion_after = Some(rating);
        self.screen = Screen::Analytics;

        Some(SessionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            stressor,
            emotion_before,
            emotion_after: rating,
            hit_count: self.hit_count,
            intensity_reached: self.intensity,
            recorded_at: now_secs,
        })
    }

    /// Clears every transient field and returns to Welcome.
    ///
    /// Used both for "new session" from Analytics and for abandoning a
    /// flow mid-way; in either case nothing is persisted here.
    pub fn start_new_flow(&mut self) {
        *self = Self::default();
    }

    /// Welcome → Analytics shortcut.
    ///
    /// The caller is responsible for only offering this when at least one
    /// stored session exists. No transient state changes besides the screen.
    pub fn view_analytics(&mut self) {
        if self.screen == Screen::Welcome {
            self.screen = Screen::Analytics;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(v: u8) -> EmotionRating {
        EmotionRating::new(v).unwrap()
    }

    /// Drives a fresh machine into the rage room.
    fn enter_rage_room() -> FlowState {
        let mut flow = FlowState::new();
        flow.choose_stressor(StressorType::Academic);
        flow.record_before(rating(2));
        assert_eq!(flow.screen(), Screen::RageRoom);
        flow
    }

    #[test]
    fn combo_counts_hits_within_window() {
        let mut flow = enter_rage_room();
        for i in 0..8 {
            let out = flow.register_hit(i * 200).unwrap();
            assert_eq!(out.combo, i as u32 + 1);
        }
        assert_eq!(flow.combo(), 8);
        assert_eq!(flow.hit_count(), 8);
    }

    #[test]
    fn combo_resets_after_gap() {
        let mut flow = enter_rage_room();
        flow.register_hit(0);
        flow.register_hit(500);
        assert_eq!(flow.combo(), 2);
        // 1001 ms after the previous hit: reset happens before the increment.
        let out = flow.register_hit(1501).unwrap();
        assert_eq!(out.combo, 1);
        // Exactly at the window boundary the combo survives.
        let out = flow.register_hit(2501).unwrap();
        assert_eq!(out.combo, 2);
    }

    #[test]
    fn stale_timer_generation_is_suppressed() {
        let mut flow = enter_rage_room();
        let first = flow.register_hit(0).unwrap();
        let second = flow.register_hit(300).unwrap();
        assert_ne!(first.combo_generation, second.combo_generation);

        // The timer armed by the first hit fires late: must not reset.
        flow.expire_combo(first.combo_generation);
        assert_eq!(flow.combo(), 2);

        // The current generation does reset.
        flow.expire_combo(second.combo_generation);
        assert_eq!(flow.combo(), 0);
    }

    #[test]
    fn intensity_is_clamped_and_linear_in_hits() {
        let mut flow = enter_rage_room();
        for i in 0..30 {
            flow.register_hit(i * 100);
        }
        assert_eq!(flow.intensity(), 60); // 2 per hit
        for i in 30..80 {
            flow.register_hit(i * 100);
        }
        assert_eq!(flow.intensity(), 100); // clamped, not 160
        assert_eq!(flow.hit_count(), 80);
    }

    #[test]
    fn decline_drains_meter_but_keeps_hits() {
        let mut flow = enter_rage_room();
        for i in 0..25 {
            flow.register_hit(i * 100);
        }
        assert!(flow.satisfaction_visible());
        flow.decline_satisfaction();
        assert_eq!(flow.intensity(), 0);
        assert_eq!(flow.hit_count(), 25);
        assert_eq!(flow.screen(), Screen::RageRoom);
        assert!(!flow.satisfaction_visible());
    }

    #[test]
    fn prompt_hidden_below_threshold() {
        let mut flow = enter_rage_room();
        for i in 0..24 {
            flow.register_hit(i * 100);
        }
        assert_eq!(flow.intensity(), 48);
        assert!(!flow.satisfaction_visible());
        // Confirm is a no-op while the prompt is hidden.
        flow.confirm_satisfaction();
        assert_eq!(flow.screen(), Screen::RageRoom);

        flow.register_hit(2400);
        assert!(flow.satisfaction_visible());
    }

    #[test]
    fn full_flow_produces_exactly_one_record() {
        let mut flow = FlowState::new();
        flow.choose_stressor(StressorType::Social);
        flow.record_before(rating(2));
        for i in 0..25 {
            flow.register_hit(i * 100);
        }
        flow.confirm_satisfaction();
        assert_eq!(flow.screen(), Screen::AfterEmotion);

        let record = flow.record_after(rating(4), 1_700_000_000).unwrap();
        assert_eq!(record.stressor, StressorType::Social);
        assert_eq!(record.emotion_before.value(), 2);
        assert_eq!(record.emotion_after.value(), 4);
        assert_eq!(record.hit_count, 25);
        assert_eq!(record.intensity_reached, 50);
        assert_eq!(record.recorded_at, 1_700_000_000);
        assert!(!record.id.is_empty());
        assert_eq!(flow.screen(), Screen::Analytics);

        // A second call is a no-op: the flow has moved on.
        assert!(flow.record_after(rating(5), 1_700_000_001).is_none());
    }

    #[test]
    fn abandoning_produces_no_record_and_resets() {
        let mut flow = enter_rage_room();
        flow.register_hit(0);
        flow.start_new_flow();
        assert_eq!(flow.screen(), Screen::Welcome);
        assert_eq!(flow.hit_count(), 0);
        assert_eq!(flow.combo(), 0);
        assert_eq!(flow.intensity(), 0);
        assert!(flow.stressor().is_none());
        assert!(flow.emotion_before().is_none());
        // No path back to a record from here without a fresh full flow.
        assert!(flow.record_after(rating(3), 0).is_none());
    }

    #[test]
    fn new_session_clears_prior_flow_fields() {
        let mut flow = FlowState::new();
        flow.choose_stressor(StressorType::Future);
        flow.record_before(rating(1));
        for i in 0..25 {
            flow.register_hit(i * 50);
        }
        flow.confirm_satisfaction();
        flow.record_after(rating(5), 42).unwrap();
        assert_eq!(flow.screen(), Screen::Analytics);

        flow.start_new_flow();
        assert_eq!(flow.screen(), Screen::Welcome);
        assert!(flow.stressor().is_none());
        assert!(flow.emotion_before().is_none());
        assert_eq!(flow.hit_count(), 0);
        assert_eq!(flow.intensity(), 0);
    }

    #[test]
    fn analytics_shortcut_only_from_welcome() {
        let mut flow = FlowState::new();
        flow.view_analytics();
        assert_eq!(flow.screen(), Screen::Analytics);

        let mut mid = enter_rage_room();
        mid.view_analytics();
        assert_eq!(mid.screen(), Screen::RageRoom);
    }

    #[test]
    fn hits_ignored_outside_rage_room() {
        let mut flow = FlowState::new();
        assert!(flow.register_hit(0).is_none());
        flow.choose_stressor(StressorType::General);
        assert!(flow.register_hit(0).is_none());
        assert_eq!(flow.hit_count(), 0);
    }

    #[test]
    fn burst_size_scales_with_combo() {
        let mut flow = enter_rage_room();
        let mut sizes = Vec::new();
        for i in 0..12 {
            sizes.push(flow.register_hit(i * 100).unwrap().burst_size);
        }
        // combo 1..=4 → 5, combo 5..=9 → 6, combo 10..=12 → 7
        assert_eq!(sizes[0], 5);
        assert_eq!(sizes[3], 5);
        assert_eq!(sizes[4], 6);
        assert_eq!(sizes[9], 7);
    }
}

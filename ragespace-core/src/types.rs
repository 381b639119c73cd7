use serde::{Deserialize, Serialize};

use crate::catalog::{EmotionRating, StressorType};

/// The immutable summary of one completed flow.
///
/// Created exactly once, when the post-session emotion is recorded, and
/// appended to the store. Records are never mutated or deleted; analytics
/// reads them as an ordered history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// UUID v4 text.
    pub id: String,
    /// The stressor the user chose for this flow.
    pub stressor: StressorType,
    /// Mood rating recorded before entering the rage room.
    pub emotion_before: EmotionRating,
    /// Mood rating recorded after the satisfaction confirm.
    pub emotion_after: EmotionRating,
    /// Total interaction count for the flow. Never decreases within a flow.
    pub hit_count: u32,
    /// The rage-meter value at the moment the flow completed, in 0..=100.
    pub intensity_reached: u8,
    /// Unix timestamp seconds at completion.
    pub recorded_at: i64,
}

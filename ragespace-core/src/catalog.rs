//! Static catalogs for stressors and the emotion scale.
//!
//! Pure data: identifiers plus the display metadata each screen needs
//! (label, glyph, RGB color, one-line description). Colors are plain
//! `(u8, u8, u8)` tuples so no rendering types leak into this crate;
//! the TUI converts them at the drawing boundary.

use serde::{Deserialize, Serialize};

/// The four stress categories a user can pick on the welcome screen.
///
/// Serialized in lowercase (`"academic"`, ...) inside the persisted
/// history blob, so the on-disk form stays stable even if variant
/// names are ever refactored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressorType {
    /// Exams, assignments, deadlines.
    Academic,
    /// Relationships, peer pressure.
    Social,
    /// Career, uncertainty.
    Future,
    /// Everything at once.
    General,
}

impl StressorType {
    /// All stressors in menu order.
    pub const ALL: [StressorType; 4] = [
        StressorType::Academic,
        StressorType::Social,
        StressorType::Future,
        StressorType::General,
    ];

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            StressorType::Academic => "Academic Stress",
            StressorType::Social => "Social Pressure",
            StressorType::Future => "Future Anxiety",
            StressorType::General => "General Overwhelm",
        }
    }

    /// One-line description shown under the label in the menu.
    pub fn description(self) -> &'static str {
        match self {
            StressorType::Academic => "Exams, assignments, deadlines",
            StressorType::Social => "Relationships, peer pressure",
            StressorType::Future => "Career, uncertainty",
            StressorType::General => "Just... everything",
        }
    }

    /// Menu glyph.
    pub fn glyph(self) -> &'static str {
        match self {
            StressorType::Academic => "📖",
            StressorType::Social => "👥",
            StressorType::Future => "🌫",
            StressorType::General => "🎯",
        }
    }

    /// Brand color as an RGB triple.
    ///
    /// Used for the rage-room target art and the particle tint.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            StressorType::Academic => (0xef, 0x44, 0x44),
            StressorType::Social => (0x8b, 0x5c, 0xf6),
            StressorType::Future => (0x06, 0xb6, 0xd4),
            StressorType::General => (0xf5, 0x9e, 0x0b),
        }
    }
}

/// A mood rating on the five-step scale: 1 = most stressed, 5 = most calm.
///
/// Construction is validated; a value outside 1..=5 never exists at
/// runtime, and deserialization of an out-of-range number fails rather
/// than producing a bad rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct EmotionRating(u8);

impl EmotionRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// The full scale in picker order, most stressed first.
    pub const SCALE: [EmotionRating; 5] = [
        EmotionRating(1),
        EmotionRating(2),
        EmotionRating(3),
        EmotionRating(4),
        EmotionRating(5),
    ];

    /// Returns `Some` for values in 1..=5, `None` otherwise.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// The raw 1..=5 value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Picker glyph for this rating.
    pub fn glyph(self) -> &'static str {
        match self.0 {
            1 => "😤",
            2 => "😟",
            3 => "😐",
            4 => "🙂",
            _ => "😊",
        }
    }

    /// Picker caption for this rating.
    pub fn describe(self) -> &'static str {
        match self.0 {
            1 => "Very Stressed",
            2 => "Stressed",
            3 => "Neutral",
            4 => "Calm",
            _ => "Very Calm",
        }
    }
}

impl TryFrom<u8> for EmotionRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        EmotionRating::new(value).ok_or_else(|| format!("emotion rating out of range: {value}"))
    }
}

impl From<EmotionRating> for u8 {
    fn from(rating: EmotionRating) -> u8 {
        rating.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_rejects_out_of_range() {
        assert!(EmotionRating::new(0).is_none());
        assert!(EmotionRating::new(6).is_none());
        assert_eq!(EmotionRating::new(3).unwrap().value(), 3);
    }

    #[test]
    fn rating_roundtrips_through_json() {
        let json = serde_json::to_string(&EmotionRating::new(4).unwrap()).unwrap();
        assert_eq!(json, "4");
        let back: EmotionRating = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), 4);
        assert!(serde_json::from_str::<EmotionRating>("9").is_err());
    }

    #[test]
    fn stressor_serializes_lowercase() {
        let json = serde_json::to_string(&StressorType::Academic).unwrap();
        assert_eq!(json, "\"academic\"");
    }

    #[test]
    fn every_stressor_has_metadata() {
        for s in StressorType::ALL {
            assert!(!s.label().is_empty());
            assert!(!s.description().is_empty());
        }
    }
}

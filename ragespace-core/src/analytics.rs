//! Summary statistics over the persisted session history.
//!
//! Every function here is a pure read of an immutable history slice, so
//! the analytics screen can recompute on demand with no caching and the
//! whole module tests without a store or a terminal. History order is
//! chronological, oldest first, as the store returns it.

use crate::catalog::StressorType;
use crate::types::SessionRecord;

/// How many trailing sessions the trend chart shows.
pub const TREND_WINDOW: usize = 7;

/// Headline numbers for the stat tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total_sessions: usize,
    pub total_hits: u64,
    /// Mean of (after − before) rounded to one decimal; 0 when empty.
    pub average_improvement: f64,
}

/// Computes the stat-tile numbers in one pass.
pub fn summarize(history: &[SessionRecord]) -> Summary {
    Summary {
        total_sessions: history.len(),
        total_hits: history.iter().map(|r| u64::from(r.hit_count)).sum(),
        average_improvement: average_improvement(history),
    }
}

/// Mean mood improvement across all sessions, rounded to one decimal.
///
/// Defined as 0 for an empty history rather than NaN.
pub fn average_improvement(history: &[SessionRecord]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let sum: i64 = history
        .iter()
        .map(|r| i64::from(r.emotion_after.value()) - i64::from(r.emotion_before.value()))
        .sum();
    let mean = sum as f64 / history.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Session counts per stressor, in first-seen order.
///
/// The order is the order each stressor first appears in the history, so
/// the bar chart stays stable as new sessions arrive.
pub fn stressor_distribution(history: &[SessionRecord]) -> Vec<(StressorType, usize)> {
    let mut counts: Vec<(StressorType, usize)> = Vec::new();
    for record in history {
        match counts.iter_mut().find(|(s, _)| *s == record.stressor) {
            Some((_, n)) => *n += 1,
            None => counts.push((record.stressor, 1)),
        }
    }
    counts
}

/// The last [`TREND_WINDOW`] sessions as (before, after) rating pairs.
///
/// Chronological order is preserved; fewer pairs are returned when the
/// history is shorter than the window.
pub fn emotion_trend(history: &[SessionRecord]) -> Vec<(u8, u8)> {
    let start = history.len().saturating_sub(TREND_WINDOW);
    history[start..]
        .iter()
        .map(|r| (r.emotion_before.value(), r.emotion_after.value()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EmotionRating;

    fn record(stressor: StressorType, before: u8, after: u8, hits: u32) -> SessionRecord {
        SessionRecord {
            id: String::new(),
            stressor,
            emotion_before: EmotionRating::new(before).unwrap(),
            emotion_after: EmotionRating::new(after).unwrap(),
            hit_count: hits,
            intensity_reached: 50,
            recorded_at: 0,
        }
    }

    #[test]
    fn improvement_is_zero_for_empty_history() {
        assert_eq!(average_improvement(&[]), 0.0);
        let s = summarize(&[]);
        assert_eq!(s.total_sessions, 0);
        assert_eq!(s.total_hits, 0);
        assert_eq!(s.average_improvement, 0.0);
    }

    #[test]
    fn improvement_is_mean_of_deltas_to_one_decimal() {
        let history = vec![
            record(StressorType::Academic, 2, 4, 10),
            record(StressorType::Social, 3, 3, 5),
        ];
        assert_eq!(average_improvement(&history), 1.0);

        // (1 + 2 + 0) / 3 = 1.0; (2 − 1 + 4 − 2) / 2 would be 1.5 etc.
        let history = vec![
            record(StressorType::Academic, 1, 2, 1),
            record(StressorType::Academic, 2, 4, 1),
            record(StressorType::Academic, 3, 3, 1),
        ];
        assert_eq!(average_improvement(&history), 1.0);

        // 1/3 rounds to 0.3.
        let history = vec![
            record(StressorType::Academic, 3, 4, 1),
            record(StressorType::Academic, 3, 3, 1),
            record(StressorType::Academic, 3, 3, 1),
        ];
        assert_eq!(average_improvement(&history), 0.3);
    }

    #[test]
    fn improvement_can_be_negative() {
        let history = vec![record(StressorType::General, 4, 2, 3)];
        assert_eq!(average_improvement(&history), -2.0);
    }

    #[test]
    fn distribution_counts_in_first_seen_order() {
        let history = vec![
            record(StressorType::Academic, 2, 4, 1),
            record(StressorType::Social, 2, 4, 1),
            record(StressorType::Academic, 2, 4, 1),
        ];
        let dist = stressor_distribution(&history);
        assert_eq!(
            dist,
            vec![(StressorType::Academic, 2), (StressorType::Social, 1)]
        );
    }

    #[test]
    fn trend_keeps_the_last_seven_in_order() {
        let history: Vec<SessionRecord> = (0..9)
            .map(|i| record(StressorType::Future, 1 + (i % 5) as u8, 5 - (i % 5) as u8, i))
            .collect();
        let trend = emotion_trend(&history);
        assert_eq!(trend.len(), 7);
        // The first two records fall outside the window.
        let expected: Vec<(u8, u8)> = history[2..]
            .iter()
            .map(|r| (r.emotion_before.value(), r.emotion_after.value()))
            .collect();
        assert_eq!(trend, expected);
    }

    #[test]
    fn trend_handles_short_histories() {
        let history = vec![record(StressorType::Social, 2, 5, 1)];
        assert_eq!(emotion_trend(&history), vec![(2, 5)]);
        assert!(emotion_trend(&[]).is_empty());
    }

    #[test]
    fn summary_totals_hits_across_sessions() {
        let history = vec![
            record(StressorType::Academic, 2, 4, 40),
            record(StressorType::General, 1, 3, 17),
        ];
        let s = summarize(&history);
        assert_eq!(s.total_sessions, 2);
        assert_eq!(s.total_hits, 57);
    }
}

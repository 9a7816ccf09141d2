//! Brain/heart coherence scoring and the insight blend.
//!
//! Scores come from two independent update paths: a list mutation recomputes
//! the matching score from scratch, a completed insight averages both current
//! scores toward its alignment score.

use crate::types::{CoherenceValues, Insight, ListItem, ManifestationState};

const BASE_SCORE: f64 = 30.0;
const MAX_SCORE: f64 = 100.0;

/// Per-list weighting. Intentions and emotions deliberately differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoherenceWeights {
    pub per_item: f64,
    pub length_divisor: f64,
}

/// Intentions feed brain coherence.
pub const BRAIN_WEIGHTS: CoherenceWeights = CoherenceWeights {
    per_item: 8.0,
    length_divisor: 10.0,
};

/// Emotions feed heart coherence.
pub const HEART_WEIGHTS: CoherenceWeights = CoherenceWeights {
    per_item: 12.0,
    length_divisor: 8.0,
};

/// Score a list: `min(100, 30 + count * per_item + total_len / length_divisor)`.
///
/// Text length is counted in UTF-16 code units, so astral-plane characters
/// such as emoji count twice.
pub fn coherence(items: &[ListItem], weights: CoherenceWeights) -> f64 {
    let count_bonus = items.len() as f64 * weights.per_item;
    let total_len: usize = items.iter().map(|item| item.text.encode_utf16().count()).sum();
    let length_bonus = total_len as f64 / weights.length_divisor;
    (BASE_SCORE + count_bonus + length_bonus).min(MAX_SCORE)
}

impl CoherenceValues {
    /// Recompute both scores from the lists.
    pub fn from_state(state: &ManifestationState) -> Self {
        Self {
            brain: coherence(&state.intentions, BRAIN_WEIGHTS),
            heart: coherence(&state.emotions, HEART_WEIGHTS),
        }
    }

    /// Pull both scores half-way toward the insight's alignment score.
    pub fn blend(self, insight: &Insight) -> Self {
        let score = f64::from(insight.alignment_score);
        Self {
            brain: blend_axis(self.brain, score),
            heart: blend_axis(self.heart, score),
        }
    }
}

fn blend_axis(current: f64, alignment: f64) -> f64 {
    ((current + alignment) / 2.0).clamp(0.0, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(texts: &[&str]) -> Vec<ListItem> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| ListItem {
                id: i.to_string(),
                text: (*t).to_string(),
            })
            .collect()
    }

    #[test]
    fn test_empty_list_is_base() {
        assert_eq!(coherence(&[], BRAIN_WEIGHTS), 30.0);
        assert_eq!(coherence(&[], HEART_WEIGHTS), 30.0);
    }

    #[test]
    fn test_single_zero_length_intention() {
        assert_eq!(coherence(&items(&[""]), BRAIN_WEIGHTS), 38.0);
    }

    #[test]
    fn test_weights_are_asymmetric() {
        // 10 chars: brain 30 + 8 + 1, heart 30 + 12 + 1.25
        let list = items(&["abcdefghij"]);
        assert_eq!(coherence(&list, BRAIN_WEIGHTS), 39.0);
        assert_eq!(coherence(&list, HEART_WEIGHTS), 43.25);
    }

    #[test]
    fn test_capped_at_100() {
        let long = "x".repeat(500);
        let list = items(&[long.as_str(), "a", "b", "c", "d", "e", "f", "g", "h", "i"]);
        assert_eq!(coherence(&list, BRAIN_WEIGHTS), 100.0);
        assert_eq!(coherence(&list, HEART_WEIGHTS), 100.0);
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // "coração" is 7 units, 9 bytes
        let score = coherence(&items(&["coração"]), BRAIN_WEIGHTS);
        assert!((score - 38.7).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_astral_characters_count_twice() {
        // 8 emoji, 16 units: 30 + 12 + 16 / 8
        let list = items(&["🙏🙏🙏🙏🙏🙏🙏🙏"]);
        assert_eq!(coherence(&list, HEART_WEIGHTS), 44.0);
        assert_eq!(coherence(&list, BRAIN_WEIGHTS), 30.0 + 8.0 + 1.6);
    }

    #[test]
    fn test_blend_averages_both_axes() {
        let values = CoherenceValues {
            brain: 60.0,
            heart: 40.0,
        };
        let insight = Insight {
            title: String::new(),
            description: String::new(),
            alignment_score: 80,
        };
        let blended = values.blend(&insight);
        assert_eq!(blended.brain, 70.0);
        assert_eq!(blended.heart, 60.0);
    }

    #[test]
    fn test_from_state_uses_matching_list() {
        let state = ManifestationState {
            intentions: items(&[""]),
            emotions: Vec::new(),
            potential_symbol: "J".to_string(),
        };
        let values = CoherenceValues::from_state(&state);
        assert_eq!(values.brain, 38.0);
        assert_eq!(values.heart, 30.0);
    }
}

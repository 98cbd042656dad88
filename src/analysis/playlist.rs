//! Playlist validation
//!
//! Scores every consecutive pair of an ordered track sequence and reduces
//! the results to a mean probability, an all-compatible flag, the weakest
//! link and a violation count.

use super::aggregation::evaluate_transition;
use super::result::{PlaylistValidation, TransitionResult, WeakestTransition};
use crate::config::ScoringConfig;
use crate::model::features::FeatureRecord;
use crate::model::preferences::UserPreferences;

/// Validate an ordered sequence of tracks
///
/// Fewer than two tracks validate trivially: probability 1.0, no
/// transitions, no violations.
pub fn validate_sequence(
    tracks: &[FeatureRecord],
    prefs: &UserPreferences,
    config: &ScoringConfig,
) -> PlaylistValidation {
    if tracks.len() < 2 {
        return PlaylistValidation::trivial();
    }

    let transitions: Vec<TransitionResult> = tracks
        .windows(2)
        .map(|pair| evaluate_transition(&pair[0], &pair[1], prefs, config))
        .collect();

    summarize(transitions)
}

/// Reduce a non-empty list of transition results
fn summarize(transitions: Vec<TransitionResult>) -> PlaylistValidation {
    if transitions.is_empty() {
        return PlaylistValidation::trivial();
    }

    let overall_probability =
        transitions.iter().map(|t| t.probability).sum::<f64>() / transitions.len() as f64;
    let is_valid = transitions.iter().all(|t| t.is_compatible);
    let total_violations = transitions.iter().map(|t| t.violations.len()).sum();

    // First strict minimum wins
    let mut weakest = WeakestTransition {
        index: 0,
        probability: 1.0,
    };
    for (index, t) in transitions.iter().enumerate() {
        if t.probability < weakest.probability {
            weakest = WeakestTransition {
                index,
                probability: t.probability,
            };
        }
    }

    log::debug!(
        "Validated {} transition(s): mean P={:.3}, valid={}, weakest #{} (P={:.3}), {} violation(s)",
        transitions.len(),
        overall_probability,
        is_valid,
        weakest.index,
        weakest.probability,
        total_violations
    );

    PlaylistValidation {
        transitions,
        overall_probability,
        overall_penalty: 1.0 - overall_probability,
        is_valid,
        weakest_transition: Some(weakest),
        total_violations,
    }
}

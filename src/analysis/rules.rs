//! Preference rule layer
//!
//! Runs the pure dimension scorers and folds the active user preferences
//! into their outputs:
//! - tempo bounds on the destination track and relaxed tempo matching
//! - preferred direction and maximum size of energy changes
//! - target and avoided dominant moods
//!
//! Preference breaches that are not visible in a low score alone are
//! reported as explicit violations.

use super::result::DimensionScores;
use crate::config::ScoringConfig;
use crate::features::energy::{
    directional_energy_compatibility, loudness_compatibility, EnergyDirection,
};
use crate::features::evidence::TransitionEvidence;
use crate::features::genre::genre_compatibility;
use crate::features::key::key_compatibility;
use crate::features::mood::{dominant_mood, mood_compatibility};
use crate::features::tempo::tempo_compatibility;
use crate::features::timbre::distance_to_probability;
use crate::model::features::FeatureRecord;
use crate::model::preferences::UserPreferences;

/// Prefix of the violation raised for a destination tempo out of bounds
pub const TEMPO_RANGE_VIOLATION: &str = "Tempo outside preferred range";

/// Prefix of the violation raised for an energy jump above the user limit
pub const ENERGY_JUMP_VIOLATION: &str = "Energy jump exceeds preference";

/// Dimension scores with preferences applied
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    /// Adjusted per-dimension probabilities
    pub scores: DimensionScores,
    /// Explicit preference violations
    pub violations: Vec<String>,
}

/// Score every dimension of `from -> to` under `prefs`
pub fn apply_rules(
    from: &FeatureRecord,
    to: &FeatureRecord,
    evidence: &TransitionEvidence,
    prefs: &UserPreferences,
    config: &ScoringConfig,
) -> RuleOutcome {
    let mut violations = Vec::new();

    let scores = DimensionScores {
        key: key_compatibility(&from.key, &to.key),
        tempo: tempo_score(from, to, prefs, config, &mut violations),
        energy: energy_score(from, to, evidence, prefs, config, &mut violations),
        loudness: loudness_compatibility(from.loudness, to.loudness, config.loudness_sigma),
        mood: mood_score(from, to, prefs, config),
        timbre: distance_to_probability(evidence.timbre_distance),
        genre: genre_compatibility(&from.genre, &to.genre),
    };

    RuleOutcome {
        scores: clamp_scores(scores),
        violations,
    }
}

fn tempo_score(
    from: &FeatureRecord,
    to: &FeatureRecord,
    prefs: &UserPreferences,
    config: &ScoringConfig,
    violations: &mut Vec<String>,
) -> f64 {
    let sigma = if prefs.prefer_consistent_tempo {
        config.tempo_sigma
    } else {
        config.tempo_sigma * config.relaxed_tempo_sigma_factor
    };
    let mut p = tempo_compatibility(from.tempo.bpm, to.tempo.bpm, sigma);

    // An unknown destination tempo cannot be judged against the bounds
    let bpm = to.tempo.bpm;
    if bpm > 0.0 && !prefs.bpm_in_range(bpm) {
        p *= config.tempo_range_penalty;
        violations.push(format!("{}: {:.0} BPM", TEMPO_RANGE_VIOLATION, bpm));
    }

    p
}

fn energy_score(
    from: &FeatureRecord,
    to: &FeatureRecord,
    evidence: &TransitionEvidence,
    prefs: &UserPreferences,
    config: &ScoringConfig,
    violations: &mut Vec<String>,
) -> f64 {
    let direction =
        EnergyDirection::from_flags(prefs.prefer_increasing_energy, prefs.prefer_decreasing_energy);
    let mut p = directional_energy_compatibility(
        from.energy_score(),
        to.energy_score(),
        config.energy_sigma,
        direction,
        config.energy_direction_penalty,
    );

    if evidence.energy_jump > prefs.max_energy_jump {
        p *= config.energy_jump_penalty;
        violations.push(format!(
            "{}: {:.0}% > {:.0}%",
            ENERGY_JUMP_VIOLATION,
            evidence.energy_jump * 100.0,
            prefs.max_energy_jump * 100.0
        ));
    }

    p
}

fn mood_score(
    from: &FeatureRecord,
    to: &FeatureRecord,
    prefs: &UserPreferences,
    config: &ScoringConfig,
) -> f64 {
    let mut p = mood_compatibility(from, to);

    for track in [from, to] {
        let Some((mood, _)) = dominant_mood(&track.moods) else {
            continue;
        };
        if prefs.avoid_moods.contains(&mood) {
            p *= config.avoid_mood_penalty;
        }
        if prefs.target_moods.contains(&mood) {
            p += (1.0 - p) * config.target_mood_boost;
        }
    }

    p
}

fn clamp_scores(scores: DimensionScores) -> DimensionScores {
    let clamp = |p: f64| if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
    DimensionScores {
        key: clamp(scores.key),
        tempo: clamp(scores.tempo),
        energy: clamp(scores.energy),
        loudness: clamp(scores.loudness),
        mood: clamp(scores.mood),
        timbre: clamp(scores.timbre),
        genre: clamp(scores.genre),
    }
}

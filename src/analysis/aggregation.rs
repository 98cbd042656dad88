//! Aggregation engine
//!
//! Combines the seven dimension probabilities into one transition
//! probability under the user's weights, flags dimensions that fall below
//! the violation threshold, and renders the explanation text.
//!
//! # Combination rule
//!
//! Each dimension is independent evidence that the transition works. A
//! dimension with weight `w` and probability `p` lets the transition
//! through with probability `1 - w (1 - p)`, and the transition is smooth
//! only if every dimension lets it through:
//!
//! ```text
//! P(smooth) = Π (1 - wᵢ (1 - pᵢ)),   P(incompatible) = 1 - P(smooth)
//! ```
//!
//! A strongly incompatible, heavily weighted dimension dominates the
//! result, and compatible dimensions cannot rescue it. Weights are
//! normalized to sum to 1 before use.
//!
//! # Example
//!
//! ```
//! use segue::analysis::aggregation::evaluate_transition;
//! use segue::{FeatureRecord, ScoringConfig, UserPreferences};
//!
//! let mut a = FeatureRecord::new("a");
//! a.tempo.bpm = 124.0;
//! let mut b = FeatureRecord::new("b");
//! b.tempo.bpm = 126.0;
//!
//! let prefs = UserPreferences::default();
//! let result = evaluate_transition(&a, &b, &prefs, &ScoringConfig::default());
//! assert!(result.is_compatible);
//! assert_eq!(result.explanation.lines().next(), Some("Key: C major -> C major (dist=0, P=100%)"));
//! ```

use super::result::{Dimension, DimensionScores, TransitionResult};
use super::rules::{apply_rules, RuleOutcome};
use crate::config::ScoringConfig;
use crate::features::evidence::{derive_evidence, TransitionEvidence};
use crate::features::mood::dominant_mood;
use crate::model::features::FeatureRecord;
use crate::model::preferences::{DimensionWeights, UserPreferences};

/// Minimum overall probability for a transition to count as compatible
///
/// With the default weights even an all-zero score vector aggregates to
/// `Π (1 - wᵢ) ≈ 0.336`, so every transition passes under default
/// preferences. Concentrate the weights on fewer dimensions to make this
/// threshold reachable, and read `violations` for per-dimension problems.
pub const COMPATIBILITY_THRESHOLD: f64 = 0.3;

/// Dimension probabilities below this are reported as violations
pub const VIOLATION_THRESHOLD: f64 = 0.3;

/// Score a transition `from -> to`
///
/// Both records are assumed to satisfy [`FeatureRecord::validate`]; the
/// checked entry points are [`crate::score_transition`] and
/// [`crate::engine::TransitionEngine::score`].
///
/// # Arguments
///
/// * `from` - Outgoing track
/// * `to` - Incoming track
/// * `prefs` - Preferences snapshot
/// * `config` - Calibration parameters
///
/// # Returns
///
/// A complete `TransitionResult`; missing data degrades to neutral scores
pub fn evaluate_transition(
    from: &FeatureRecord,
    to: &FeatureRecord,
    prefs: &UserPreferences,
    config: &ScoringConfig,
) -> TransitionResult {
    // 1. Cross-track evidence
    let evidence = derive_evidence(from, to, config);

    // 2. Dimension scores with preferences applied
    let RuleOutcome {
        scores,
        violations: preference_violations,
    } = apply_rules(from, to, &evidence, prefs, config);

    // 3. Weighted combination
    let weights = normalize_weights(&prefs.weights);
    let probability = aggregate_probability(&scores, &weights);

    // 4. Violations and explanation
    let mut violations = threshold_violations(from, to, &scores, &evidence);
    violations.extend(preference_violations);
    let explanation = build_explanation(from, to, &scores, &evidence);

    log::debug!(
        "Transition {} -> {}: P={:.3} (key={:.3}, tempo={:.3}, energy={:.3}, loudness={:.3}, mood={:.3}, timbre={:.3}, genre={:.3}), {} violation(s)",
        from.id,
        to.id,
        probability,
        scores.key,
        scores.tempo,
        scores.energy,
        scores.loudness,
        scores.mood,
        scores.timbre,
        scores.genre,
        violations.len()
    );

    TransitionResult {
        from_id: from.id.clone(),
        to_id: to.id.clone(),
        probability,
        penalty: 1.0 - probability,
        is_compatible: probability >= COMPATIBILITY_THRESHOLD,
        scores,
        violations,
        explanation,
        evidence,
    }
}

/// Sanitize and normalize dimension weights
///
/// Negative and non-finite weights count as zero. The rest are scaled to
/// sum to 1. If nothing positive remains, the default weights are used.
pub fn normalize_weights(weights: &DimensionWeights) -> DimensionWeights {
    let sanitize = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let sanitized = DimensionWeights {
        key: sanitize(weights.key),
        tempo: sanitize(weights.tempo),
        energy: sanitize(weights.energy),
        loudness: sanitize(weights.loudness),
        mood: sanitize(weights.mood),
        timbre: sanitize(weights.timbre),
        genre: sanitize(weights.genre),
    };

    let total: f64 = Dimension::ALL
        .iter()
        .map(|d| weight_of(&sanitized, *d))
        .sum();

    if total <= 0.0 || !total.is_finite() {
        log::warn!("No usable dimension weights, falling back to defaults");
        return normalize_weights(&DimensionWeights::default());
    }

    DimensionWeights {
        key: sanitized.key / total,
        tempo: sanitized.tempo / total,
        energy: sanitized.energy / total,
        loudness: sanitized.loudness / total,
        mood: sanitized.mood / total,
        timbre: sanitized.timbre / total,
        genre: sanitized.genre / total,
    }
}

/// Weight of one dimension
pub fn weight_of(weights: &DimensionWeights, dimension: Dimension) -> f64 {
    match dimension {
        Dimension::Key => weights.key,
        Dimension::Tempo => weights.tempo,
        Dimension::Energy => weights.energy,
        Dimension::Loudness => weights.loudness,
        Dimension::Mood => weights.mood,
        Dimension::Timbre => weights.timbre,
        Dimension::Genre => weights.genre,
    }
}

/// Combine dimension probabilities: `Π (1 - wᵢ (1 - pᵢ))`
///
/// `weights` should already be normalized (see [`normalize_weights`]).
pub fn aggregate_probability(scores: &DimensionScores, weights: &DimensionWeights) -> f64 {
    scores
        .iter()
        .map(|(d, p)| 1.0 - weight_of(weights, d) * (1.0 - p))
        .product::<f64>()
        .clamp(0.0, 1.0)
}

/// One message per dimension scoring below [`VIOLATION_THRESHOLD`]
pub fn threshold_violations(
    from: &FeatureRecord,
    to: &FeatureRecord,
    scores: &DimensionScores,
    evidence: &TransitionEvidence,
) -> Vec<String> {
    scores
        .iter()
        .filter(|(_, p)| *p < VIOLATION_THRESHOLD)
        .map(|(dimension, _)| violation_message(dimension, from, to, evidence))
        .collect()
}

fn violation_message(
    dimension: Dimension,
    from: &FeatureRecord,
    to: &FeatureRecord,
    evidence: &TransitionEvidence,
) -> String {
    match dimension {
        Dimension::Key => format!(
            "Key incompatible: {} -> {} (distance {})",
            key_label(from),
            key_label(to),
            evidence.circle_distance
        ),
        Dimension::Tempo => format!(
            "Tempo jump: {:.0} -> {:.0} BPM{}",
            from.tempo.bpm,
            to.tempo.bpm,
            if evidence.double_time { " (double-time)" } else { "" }
        ),
        Dimension::Energy => format!(
            "Energy jump: {:.4} -> {:.4}",
            from.energy_score(),
            to.energy_score()
        ),
        Dimension::Loudness => match (from.loudness, to.loudness) {
            (Some(a), Some(b)) => format!("Loudness mismatch: {:.2} -> {:.2}", a, b),
            _ => "Loudness mismatch".to_string(),
        },
        Dimension::Mood => format!(
            "Mood incompatible: {} -> {}",
            mood_label(from),
            mood_label(to)
        ),
        Dimension::Timbre => match evidence.timbre_distance {
            Some(d) => format!("Timbre mismatch (distance {:.2})", d),
            None => "Timbre mismatch".to_string(),
        },
        Dimension::Genre => format!(
            "Genre mismatch: {} -> {}",
            genre_label(from),
            genre_label(to)
        ),
    }
}

/// Ordered multi-line rendering of each dimension
///
/// Lines: Key, Tempo, Energy, Loudness (only when both tracks report it),
/// Timbre, Mood, Genre.
pub fn build_explanation(
    from: &FeatureRecord,
    to: &FeatureRecord,
    scores: &DimensionScores,
    evidence: &TransitionEvidence,
) -> String {
    let mut lines = Vec::with_capacity(7);

    lines.push(format!(
        "Key: {} -> {} (dist={}, P={})",
        key_label(from),
        key_label(to),
        evidence.circle_distance,
        percent(scores.key)
    ));

    lines.push(format!(
        "Tempo: {:.0} -> {:.0} BPM (diff={:.0}{}, P={})",
        from.tempo.bpm,
        to.tempo.bpm,
        evidence.bpm_difference,
        if evidence.double_time { " [double-time]" } else { "" },
        percent(scores.tempo)
    ));

    lines.push(format!(
        "Energy: {:.4} -> {:.4} (diff={:.4}, P={})",
        from.energy_score(),
        to.energy_score(),
        evidence.energy_difference,
        percent(scores.energy)
    ));

    if let (Some(a), Some(b), Some(diff)) =
        (from.loudness, to.loudness, evidence.loudness_difference)
    {
        lines.push(format!(
            "Loudness: {:.2} -> {:.2} (diff={:.2}, P={})",
            a,
            b,
            diff,
            percent(scores.loudness)
        ));
    }

    lines.push(match evidence.timbre_distance {
        Some(d) => format!("Timbre: distance={:.2} (P={})", d, percent(scores.timbre)),
        None => format!("Timbre: unknown (P={})", percent(scores.timbre)),
    });

    lines.push(format!(
        "Mood: {} -> {} (P={})",
        mood_label(from),
        mood_label(to),
        percent(scores.mood)
    ));

    lines.push(format!(
        "Genre: {} -> {} (P={})",
        genre_label(from),
        genre_label(to),
        percent(scores.genre)
    ));

    lines.join("\n")
}

fn key_label(track: &FeatureRecord) -> String {
    format!("{} {}", track.key.key, track.key.scale.as_str())
}

fn mood_label(track: &FeatureRecord) -> &'static str {
    dominant_mood(&track.moods).map_or("unknown", |(mood, _)| mood.as_str())
}

fn genre_label(track: &FeatureRecord) -> &str {
    track.genre.top.as_pair().map_or("unknown", |(label, _)| label)
}

fn percent(p: f64) -> String {
    format!("{:.0}%", p * 100.0)
}

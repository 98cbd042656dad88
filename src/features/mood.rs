//! Mood compatibility
//!
//! A track's dominant mood is the positive classification with the highest
//! probability among the five binary mood axes. Two dominant moods are
//! compared through a fixed affinity table, blended with danceability
//! similarity:
//!
//! ```text
//! P(mood) = 0.8 × affinity(m₁, m₂) + 0.2 × (1 - |d₁ - d₂|)
//! ```

use crate::model::features::{FeatureRecord, MoodClassifications};
use crate::model::preferences::MoodAxis;

/// Affinity when either track has no dominant mood
pub const NEUTRAL_MOOD_SCORE: f64 = 0.5;

/// Share of the mood score taken by mood affinity
const AFFINITY_SHARE: f64 = 0.8;

/// Share of the mood score taken by danceability similarity
const DANCEABILITY_SHARE: f64 = 0.2;

const SAME_MOOD: f64 = 1.0;
const COMPLEMENTARY_MOODS: f64 = 0.7;
const OPPOSED_MOODS: f64 = 0.15;
const UNRELATED_MOODS: f64 = 0.45;

/// Dominant mood and its probability
///
/// Only positive labels count ("happy" on the happy axis, not
/// "not_happy"). The first axis wins ties, in [`MoodAxis::ALL`] order.
/// Returns `None` when no axis carries a positive classification.
///
/// # Example
///
/// ```
/// use segue::features::mood::dominant_mood;
/// use segue::model::{Classification, MoodAxis, MoodClassifications};
///
/// let moods = MoodClassifications {
///     happy: Classification::classified("not_happy", 0.9),
///     party: Classification::classified("party", 0.7),
///     relaxed: Classification::classified("relaxed", 0.4),
///     ..Default::default()
/// };
/// assert_eq!(dominant_mood(&moods), Some((MoodAxis::Party, 0.7)));
/// ```
pub fn dominant_mood(moods: &MoodClassifications) -> Option<(MoodAxis, f64)> {
    let mut best: Option<(MoodAxis, f64)> = None;
    let mut best_probability = 0.0;

    for axis in MoodAxis::ALL {
        if let Some(p) = moods.axis(axis).positive_probability(axis.as_str()) {
            if p > best_probability {
                best_probability = p;
                best = Some((axis, p));
            }
        }
    }

    best
}

/// Affinity between two dominant moods
///
/// [`NEUTRAL_MOOD_SCORE`] when either side has none.
pub fn mood_affinity(m1: Option<MoodAxis>, m2: Option<MoodAxis>) -> f64 {
    use MoodAxis::*;

    let (Some(a), Some(b)) = (m1, m2) else {
        return NEUTRAL_MOOD_SCORE;
    };

    if a == b {
        return SAME_MOOD;
    }

    let pair = if a <= b { (a, b) } else { (b, a) };
    match pair {
        (Happy, Party) | (Sad, Relaxed) | (Aggressive, Party) => COMPLEMENTARY_MOODS,
        (Happy, Sad) | (Aggressive, Relaxed) | (Sad, Party) | (Relaxed, Party) => OPPOSED_MOODS,
        _ => UNRELATED_MOODS,
    }
}

/// Similarity of two danceability scores, `1 - |d1 - d2|`
pub fn danceability_similarity(d1: f64, d2: f64) -> f64 {
    (1.0 - (d1 - d2).abs()).clamp(0.0, 1.0)
}

/// Mood compatibility before preference adjustments
pub fn mood_compatibility(from: &FeatureRecord, to: &FeatureRecord) -> f64 {
    let m1 = dominant_mood(&from.moods).map(|(axis, _)| axis);
    let m2 = dominant_mood(&to.moods).map(|(axis, _)| axis);

    let affinity = mood_affinity(m1, m2);
    let dance = danceability_similarity(from.danceability_score(), to.danceability_score());

    AFFINITY_SHARE * affinity + DANCEABILITY_SHARE * dance
}

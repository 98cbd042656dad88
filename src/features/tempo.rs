//! Tempo compatibility
//!
//! Models tempo perception with a just-noticeable-difference (JND) law.
//! The relative tempo difference is measured for the direct ratio and for
//! the doubled and halved interpretations (DJs routinely mix at 2:1), and
//! the most favorable of the three drives a Gaussian decay:
//!
//! ```text
//! P(tempo) = exp(-Δ² / (2σ²)),  σ = 3 × JND ≈ 0.12
//! ```
//!
//! so a difference of about one JND still scores ~95%.
//!
//! # Reference
//!
//! Drake, C., & Botte, M.-C. (1993). Tempo sensitivity in auditory sequences:
//! Evidence for a multiple-look model. *Perception & Psychophysics*, 54(3), 277-286.

use serde::{Deserialize, Serialize};

/// Score when either BPM is zero or negative (cannot assess)
pub const NEUTRAL_TEMPO_SCORE: f64 = 0.5;

/// Which interpretation of the two tempi produced the smallest difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempoAlignment {
    /// Tempi compared as-is
    Direct,
    /// Destination played at double time (from ≈ 2 × to)
    Double,
    /// Destination played at half time (to ≈ 2 × from)
    Half,
}

/// Smallest relative tempo difference and the alignment that produced it
///
/// Each difference is relative to the mean of the two compared tempi.
/// Returns `None` when either BPM is not positive.
pub fn relative_tempo_difference(bpm1: f64, bpm2: f64) -> Option<(f64, TempoAlignment)> {
    if bpm1 <= 0.0 || bpm2 <= 0.0 {
        return None;
    }

    let relative = |a: f64, b: f64| (a - b).abs() / ((a + b) / 2.0);
    let candidates = [
        (relative(bpm1, bpm2), TempoAlignment::Direct),
        (relative(bpm1, 2.0 * bpm2), TempoAlignment::Double),
        (relative(2.0 * bpm1, bpm2), TempoAlignment::Half),
    ];

    // Ties keep the earlier reading, so Direct wins over Double over Half
    candidates
        .into_iter()
        .fold(None, |best: Option<(f64, TempoAlignment)>, candidate| match best {
            Some(b) if b.0 <= candidate.0 => Some(b),
            _ => Some(candidate),
        })
}

/// Tempo compatibility probability
///
/// # Arguments
///
/// * `bpm1` - Source tempo
/// * `bpm2` - Destination tempo
/// * `sigma` - Gaussian spread on relative difference (0.12 by default)
///
/// # Returns
///
/// Probability in [0, 1]; [`NEUTRAL_TEMPO_SCORE`] for degenerate tempi
///
/// # Example
///
/// ```
/// use segue::features::tempo::tempo_compatibility;
///
/// assert!(tempo_compatibility(120.0, 122.0, 0.12) > 0.98);
/// assert!(tempo_compatibility(90.0, 181.0, 0.12) > 0.95);
/// assert_eq!(tempo_compatibility(0.0, 120.0, 0.12), 0.5);
/// ```
pub fn tempo_compatibility(bpm1: f64, bpm2: f64, sigma: f64) -> f64 {
    match relative_tempo_difference(bpm1, bpm2) {
        Some((delta, _)) => gaussian_decay(delta, sigma),
        None => NEUTRAL_TEMPO_SCORE,
    }
}

/// Whether two tempi stand in a 2:1 or 1:2 ratio
///
/// The ratio tolerance is `tolerance_bpm / reference`, so it tightens as
/// tempo grows. A zero BPM on either side is never a double-time relation.
///
/// # Example
///
/// ```
/// use segue::features::tempo::is_double_time;
///
/// assert!(is_double_time(180.0, 90.0, 5.0));
/// assert!(is_double_time(90.0, 181.0, 5.0));
/// assert!(!is_double_time(120.0, 122.0, 5.0));
/// assert!(!is_double_time(0.0, 120.0, 5.0));
/// ```
pub fn is_double_time(bpm1: f64, bpm2: f64, tolerance_bpm: f64) -> bool {
    if bpm1 <= 0.0 || bpm2 <= 0.0 {
        return false;
    }

    let ratio = bpm1 / bpm2;
    (ratio - 2.0).abs() < tolerance_bpm / bpm2 || (ratio - 0.5).abs() < tolerance_bpm / bpm1
}

/// Symmetric Gaussian decay `exp(-d² / (2σ²))`
///
/// A non-positive sigma degenerates to an exact-match test.
pub fn gaussian_decay(delta: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return if delta == 0.0 { 1.0 } else { 0.0 };
    }
    (-(delta * delta) / (2.0 * sigma * sigma)).exp()
}

//! Energy and loudness compatibility
//!
//! Both dimensions use a symmetric Gaussian decay on the absolute
//! difference of a scalar, each with a spread calibrated to the scalar's
//! real-world range (see [`crate::config::ScoringConfig`]).

use serde::{Deserialize, Serialize};

use super::tempo::gaussian_decay;

/// Score when either track lacks a loudness value
pub const NEUTRAL_LOUDNESS_SCORE: f64 = 0.7;

/// Preferred direction of energy change across a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyDirection {
    /// No preference: symmetric scoring
    #[default]
    Any,
    /// Energy should rise
    Increasing,
    /// Energy should fall
    Decreasing,
}

impl EnergyDirection {
    /// Direction from the two preference flags
    ///
    /// Setting both flags cancels out to [`EnergyDirection::Any`].
    pub fn from_flags(prefer_increasing: bool, prefer_decreasing: bool) -> Self {
        match (prefer_increasing, prefer_decreasing) {
            (true, false) => EnergyDirection::Increasing,
            (false, true) => EnergyDirection::Decreasing,
            _ => EnergyDirection::Any,
        }
    }
}

/// Energy compatibility (symmetric)
///
/// # Example
///
/// ```
/// use segue::features::energy::energy_compatibility;
///
/// assert_eq!(energy_compatibility(0.004, 0.004, 0.003), 1.0);
/// assert!(energy_compatibility(0.002, 0.012, 0.003) < 0.01);
/// ```
pub fn energy_compatibility(energy1: f64, energy2: f64, sigma: f64) -> f64 {
    gaussian_decay((energy1 - energy2).abs(), sigma)
}

/// Energy compatibility under a preferred direction of change
///
/// A change in the preferred direction is scored with a doubled spread; a
/// change against it keeps the base spread and is multiplied by `penalty`.
/// Equal energies always score 1.0, and [`EnergyDirection::Any`] reduces
/// to [`energy_compatibility`].
pub fn directional_energy_compatibility(
    energy1: f64,
    energy2: f64,
    sigma: f64,
    direction: EnergyDirection,
    penalty: f64,
) -> f64 {
    let delta = energy2 - energy1;
    let with_preference = match direction {
        EnergyDirection::Any => return energy_compatibility(energy1, energy2, sigma),
        EnergyDirection::Increasing => delta >= 0.0,
        EnergyDirection::Decreasing => delta <= 0.0,
    };

    if with_preference {
        gaussian_decay(delta.abs(), 2.0 * sigma)
    } else {
        gaussian_decay(delta.abs(), sigma) * penalty
    }
}

/// Relative energy jump `|e2 - e1| / max(e1, e2)`
///
/// 0.0 when both energies are zero.
pub fn relative_energy_jump(energy1: f64, energy2: f64) -> f64 {
    let reference = energy1.abs().max(energy2.abs());
    if reference < f64::EPSILON {
        0.0
    } else {
        (energy2 - energy1).abs() / reference
    }
}

/// Loudness compatibility (symmetric)
///
/// Returns [`NEUTRAL_LOUDNESS_SCORE`] when either side is missing.
///
/// # Example
///
/// ```
/// use segue::features::energy::loudness_compatibility;
///
/// assert!(loudness_compatibility(Some(0.30), Some(0.31), 0.15) > 0.99);
/// assert_eq!(loudness_compatibility(Some(0.30), None, 0.15), 0.7);
/// ```
pub fn loudness_compatibility(loudness1: Option<f64>, loudness2: Option<f64>, sigma: f64) -> f64 {
    match (loudness1, loudness2) {
        (Some(a), Some(b)) => gaussian_decay((a - b).abs(), sigma),
        _ => NEUTRAL_LOUDNESS_SCORE,
    }
}

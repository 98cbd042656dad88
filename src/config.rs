//! Calibration parameters for transition scoring
//!
//! The fixed thresholds and neutral fallback scores are crate constants
//! (see [`crate::analysis::aggregation`] and the scorer modules); this struct
//! only carries the tunable spreads and rule-layer factors.

use serde::{Deserialize, Serialize};

/// Scoring configuration parameters
///
/// Deserializes from partial JSON: missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    // Tempo
    /// Gaussian spread on relative tempo difference (default: 0.12)
    /// Three JNDs of ~4% each, so one JND scores ~95%
    pub tempo_sigma: f64,

    /// Multiplier applied to `tempo_sigma` when the user does not ask for
    /// consistent tempo (default: 2.0)
    pub relaxed_tempo_sigma_factor: f64,

    /// Tolerance in BPM for the double/half-time test (default: 5.0)
    /// Divided by the reference BPM, so the ratio tolerance shrinks at higher tempi
    pub double_time_tolerance_bpm: f64,

    // Energy / loudness
    /// Gaussian spread on energy-score difference (default: 0.003)
    /// Spectral energy scores typically sit in 0.001-0.01
    pub energy_sigma: f64,

    /// Gaussian spread on average-loudness difference (default: 0.15)
    /// Loudness is on a 0-1 scale; same-genre pairs differ by ~0.05
    pub loudness_sigma: f64,

    // Timbre
    /// Diagonal regularization added to both covariance matrices (default: 1e-6)
    pub covariance_epsilon: f64,

    // Preference rule layer
    /// Factor applied to the tempo score when the destination BPM lies
    /// outside the preferred range (default: 0.5)
    pub tempo_range_penalty: f64,

    /// Factor applied to the energy score when energy moves against the
    /// preferred direction (default: 0.5)
    pub energy_direction_penalty: f64,

    /// Factor applied to the energy score when the relative energy jump
    /// exceeds the user's maximum (default: 0.5)
    pub energy_jump_penalty: f64,

    /// Factor applied to the mood score per track whose dominant mood is
    /// avoided (default: 0.5)
    pub avoid_mood_penalty: f64,

    /// Fraction of the remaining headroom added to the mood score per track
    /// whose dominant mood is targeted (default: 0.5)
    pub target_mood_boost: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tempo_sigma: 0.12,
            relaxed_tempo_sigma_factor: 2.0,
            double_time_tolerance_bpm: 5.0,
            energy_sigma: 0.003,
            loudness_sigma: 0.15,
            covariance_epsilon: 1e-6,
            tempo_range_penalty: 0.5,
            energy_direction_penalty: 0.5,
            energy_jump_penalty: 0.5,
            avoid_mood_penalty: 0.5,
            target_mood_boost: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{"tempo_sigma": 0.2, "avoid_mood_penalty": 0.25}"#).unwrap();
        assert_eq!(config.tempo_sigma, 0.2);
        assert_eq!(config.avoid_mood_penalty, 0.25);
        assert_eq!(config.energy_sigma, ScoringConfig::default().energy_sigma);
        assert_eq!(config.covariance_epsilon, 1e-6);

        let empty: ScoringConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ScoringConfig::default());
    }
}

//! Cross-track evidence
//!
//! Derived quantities that relate two feature records: key distance, tempo
//! relation, energy and loudness differences, timbre distance. They feed the
//! preference rules, violation messages and the explanation text. Every
//! value is defined for degenerate input (a zero BPM has no double-time
//! relation and no alignment).

use serde::{Deserialize, Serialize};

use super::energy::relative_energy_jump;
use super::tempo::{is_double_time, relative_tempo_difference, TempoAlignment};
use super::timbre::timbre_distance;
use crate::config::ScoringConfig;
use crate::model::features::FeatureRecord;
use crate::model::key::circle_of_fifths_distance;

/// Quantities derived from a pair of feature records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvidence {
    /// Circle-of-fifths distance between the tonics (0-6, 6 = tritone or unknown)
    pub circle_distance: u32,

    /// Absolute BPM difference
    pub bpm_difference: f64,

    /// Whether the tempi stand in a 2:1 or 1:2 relation
    pub double_time: bool,

    /// Most favorable tempo reading and its relative difference
    /// (`None` when either BPM is not positive)
    pub tempo_alignment: Option<(TempoAlignment, f64)>,

    /// Absolute energy-score difference
    pub energy_difference: f64,

    /// Relative energy jump `|e2 - e1| / max(e1, e2)`
    pub energy_jump: f64,

    /// Absolute loudness difference, when both tracks report loudness
    pub loudness_difference: Option<f64>,

    /// Timbre distance, when both tracks carry usable timbre models
    pub timbre_distance: Option<f64>,
}

/// Derive the evidence for a transition `from -> to`
pub fn derive_evidence(
    from: &FeatureRecord,
    to: &FeatureRecord,
    config: &ScoringConfig,
) -> TransitionEvidence {
    let bpm1 = from.tempo.bpm;
    let bpm2 = to.tempo.bpm;
    let energy1 = from.energy_score();
    let energy2 = to.energy_score();

    let timbre_distance = match (&from.timbre, &to.timbre) {
        (Some(a), Some(b)) => timbre_distance(a, b, config.covariance_epsilon),
        _ => None,
    };

    let evidence = TransitionEvidence {
        circle_distance: circle_of_fifths_distance(&from.key.key, &to.key.key),
        bpm_difference: (bpm1 - bpm2).abs(),
        double_time: is_double_time(bpm1, bpm2, config.double_time_tolerance_bpm),
        tempo_alignment: relative_tempo_difference(bpm1, bpm2).map(|(d, a)| (a, d)),
        energy_difference: (energy1 - energy2).abs(),
        energy_jump: relative_energy_jump(energy1, energy2),
        loudness_difference: from.loudness.zip(to.loudness).map(|(a, b)| (a - b).abs()),
        timbre_distance,
    };

    log::debug!(
        "Evidence {} -> {}: circle distance {}, BPM diff {:.1}{}, energy diff {:.5}",
        from.id,
        to.id,
        evidence.circle_distance,
        evidence.bpm_difference,
        if evidence.double_time { " (double-time)" } else { "" },
        evidence.energy_difference
    );

    evidence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::features::TimbreDescriptor;

    fn track(id: &str, key: &str, bpm: f64) -> FeatureRecord {
        let mut record = FeatureRecord::new(id);
        record.key.key = key.to_string();
        record.tempo.bpm = bpm;
        record
    }

    #[test]
    fn test_basic_evidence() {
        let mut a = track("a", "C", 120.0);
        let mut b = track("b", "G", 122.0);
        a.energy.mid_high = 0.01;
        b.energy.mid_high = 0.0125;
        a.loudness = Some(0.6);
        b.loudness = Some(0.65);

        let e = derive_evidence(&a, &b, &ScoringConfig::default());
        assert_eq!(e.circle_distance, 1);
        assert_eq!(e.bpm_difference, 2.0);
        assert!(!e.double_time);
        assert_eq!(e.tempo_alignment.map(|(a, _)| a), Some(TempoAlignment::Direct));
        assert!((e.energy_difference - 0.001).abs() < 1e-12);
        assert!((e.energy_jump - 0.2).abs() < 1e-9);
        assert!((e.loudness_difference.unwrap() - 0.05).abs() < 1e-12);
        assert_eq!(e.timbre_distance, None);
    }

    #[test]
    fn test_symmetric_quantities() {
        let a = track("a", "D", 90.0);
        let b = track("b", "Ab", 181.0);
        let config = ScoringConfig::default();
        let ab = derive_evidence(&a, &b, &config);
        let ba = derive_evidence(&b, &a, &config);
        assert_eq!(ab.circle_distance, 6);
        assert_eq!(ab.circle_distance, ba.circle_distance);
        assert_eq!(ab.bpm_difference, ba.bpm_difference);
        assert!(ab.double_time && ba.double_time);
    }

    #[test]
    fn test_degenerate_input() {
        let a = track("a", "not a key", 0.0);
        let b = track("b", "C", 120.0);
        let e = derive_evidence(&a, &b, &ScoringConfig::default());
        assert_eq!(e.circle_distance, 6);
        assert!(!e.double_time);
        assert_eq!(e.tempo_alignment, None);
        assert_eq!(e.energy_difference, 0.0);
        assert_eq!(e.energy_jump, 0.0);
        assert_eq!(e.loudness_difference, None);
    }

    #[test]
    fn test_timbre_distance_present() {
        let mut a = track("a", "C", 120.0);
        let mut b = track("b", "C", 120.0);
        a.timbre = Some(TimbreDescriptor { mean: vec![0.0, 0.0, 0.0], covariance: None });
        b.timbre = Some(TimbreDescriptor { mean: vec![0.0, 3.0, 4.0], covariance: None });
        let e = derive_evidence(&a, &b, &ScoringConfig::default());
        assert_eq!(e.timbre_distance, Some(5.0));
    }
}

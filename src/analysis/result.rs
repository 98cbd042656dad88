//! Scoring result types

use serde::{Deserialize, Serialize};

use crate::features::evidence::TransitionEvidence;

/// One of the seven scored dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Harmonic (key) compatibility
    Key,
    /// Tempo compatibility
    Tempo,
    /// Spectral energy compatibility
    Energy,
    /// Loudness compatibility
    Loudness,
    /// Mood compatibility
    Mood,
    /// Timbre compatibility
    Timbre,
    /// Genre compatibility
    Genre,
}

impl Dimension {
    /// All dimensions, in aggregation order
    pub const ALL: [Dimension; 7] = [
        Dimension::Key,
        Dimension::Tempo,
        Dimension::Energy,
        Dimension::Loudness,
        Dimension::Mood,
        Dimension::Timbre,
        Dimension::Genre,
    ];

    /// Lowercase name ("key", "tempo", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Key => "key",
            Dimension::Tempo => "tempo",
            Dimension::Energy => "energy",
            Dimension::Loudness => "loudness",
            Dimension::Mood => "mood",
            Dimension::Timbre => "timbre",
            Dimension::Genre => "genre",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-dimension compatibility probabilities (each 0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionScores {
    /// Key compatibility
    pub key: f64,
    /// Tempo compatibility
    pub tempo: f64,
    /// Energy compatibility
    pub energy: f64,
    /// Loudness compatibility
    pub loudness: f64,
    /// Mood compatibility
    pub mood: f64,
    /// Timbre compatibility
    pub timbre: f64,
    /// Genre compatibility
    pub genre: f64,
}

impl DimensionScores {
    /// Score of one dimension
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Key => self.key,
            Dimension::Tempo => self.tempo,
            Dimension::Energy => self.energy,
            Dimension::Loudness => self.loudness,
            Dimension::Mood => self.mood,
            Dimension::Timbre => self.timbre,
            Dimension::Genre => self.genre,
        }
    }

    /// `(dimension, score)` pairs in [`Dimension::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// Result of scoring one transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResult {
    /// Source track identifier
    pub from_id: String,

    /// Destination track identifier
    pub to_id: String,

    /// Overall transition probability (0.0-1.0)
    pub probability: f64,

    /// `1 - probability`, usable as a graph-search edge cost
    pub penalty: f64,

    /// Whether `probability` reaches the compatibility threshold
    pub is_compatible: bool,

    /// Per-dimension probabilities after preference adjustments
    pub scores: DimensionScores,

    /// Human-readable threshold and preference violations
    pub violations: Vec<String>,

    /// Multi-line rendering of each dimension's inputs and probability
    pub explanation: String,

    /// Derived cross-track quantities
    pub evidence: TransitionEvidence,
}

/// Index and probability of the weakest transition in a sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeakestTransition {
    /// Index of the transition (`i` scores track `i` -> track `i + 1`)
    pub index: usize,
    /// Its probability
    pub probability: f64,
}

/// Result of validating an ordered track sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistValidation {
    /// One result per consecutive pair
    pub transitions: Vec<TransitionResult>,

    /// Mean transition probability (1.0 for fewer than two tracks)
    pub overall_probability: f64,

    /// `1 - overall_probability`
    pub overall_penalty: f64,

    /// Whether every transition is individually compatible
    pub is_valid: bool,

    /// Lowest-probability transition (first occurrence on ties)
    pub weakest_transition: Option<WeakestTransition>,

    /// Sum of all transitions' violation counts
    pub total_violations: usize,
}

impl PlaylistValidation {
    /// Result for a sequence too short to contain a transition
    pub fn trivial() -> Self {
        Self {
            transitions: Vec::new(),
            overall_probability: 1.0,
            overall_penalty: 0.0,
            is_valid: true,
            weakest_transition: None,
            total_violations: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_scores_iter_order() {
        let scores = DimensionScores {
            key: 0.1,
            tempo: 0.2,
            energy: 0.3,
            loudness: 0.4,
            mood: 0.5,
            timbre: 0.6,
            genre: 0.7,
        };
        let names: Vec<&str> = scores.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(names, vec!["key", "tempo", "energy", "loudness", "mood", "timbre", "genre"]);
        let values: Vec<f64> = scores.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);
    }

    #[test]
    fn test_trivial_validation() {
        let v = PlaylistValidation::trivial();
        assert!(v.transitions.is_empty());
        assert_eq!(v.overall_probability, 1.0);
        assert_eq!(v.overall_penalty, 0.0);
        assert!(v.is_valid);
        assert_eq!(v.weakest_transition, None);
        assert_eq!(v.total_violations, 0);
    }

    #[test]
    fn test_dimension_serde_name() {
        assert_eq!(Dimension::Loudness.to_string(), "loudness");
    }
}

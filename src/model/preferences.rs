//! User preferences that steer transition scoring

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// The five binary mood axes that can produce a dominant mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodAxis {
    /// happy / not_happy
    Happy,
    /// sad / not_sad
    Sad,
    /// aggressive / not_aggressive
    Aggressive,
    /// relaxed / not_relaxed
    Relaxed,
    /// party / not_party
    Party,
}

impl MoodAxis {
    /// All axes, in tie-break order for dominant-mood selection
    pub const ALL: [MoodAxis; 5] = [
        MoodAxis::Happy,
        MoodAxis::Sad,
        MoodAxis::Aggressive,
        MoodAxis::Relaxed,
        MoodAxis::Party,
    ];

    /// Positive label of this axis (also its name)
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodAxis::Happy => "happy",
            MoodAxis::Sad => "sad",
            MoodAxis::Aggressive => "aggressive",
            MoodAxis::Relaxed => "relaxed",
            MoodAxis::Party => "party",
        }
    }
}

/// Per-dimension aggregation weights
///
/// Nominally sum to 1.0; aggregation normalizes whatever is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionWeights {
    /// Key weight (default: 0.15)
    pub key: f64,
    /// Tempo weight (default: 0.20)
    pub tempo: f64,
    /// Energy weight (default: 0.15)
    pub energy: f64,
    /// Loudness weight (default: 0.05)
    pub loudness: f64,
    /// Mood weight (default: 0.15)
    pub mood: f64,
    /// Timbre weight (default: 0.20)
    pub timbre: f64,
    /// Genre weight (default: 0.10)
    pub genre: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            key: 0.15,
            tempo: 0.20,
            energy: 0.15,
            loudness: 0.05,
            mood: 0.15,
            timbre: 0.20,
            genre: 0.10,
        }
    }
}

/// User-configurable preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Lowest acceptable destination BPM
    pub min_bpm: Option<f64>,

    /// Highest acceptable destination BPM
    pub max_bpm: Option<f64>,

    /// Score tempo changes strictly (default: true)
    pub prefer_consistent_tempo: bool,

    /// Favor transitions that raise energy
    pub prefer_increasing_energy: bool,

    /// Favor transitions that lower energy
    pub prefer_decreasing_energy: bool,

    /// Largest tolerated relative energy jump (default: 0.5)
    pub max_energy_jump: f64,

    /// Moods to steer towards
    pub target_moods: Vec<MoodAxis>,

    /// Moods to steer away from
    pub avoid_moods: Vec<MoodAxis>,

    /// Aggregation weights
    pub weights: DimensionWeights,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            min_bpm: None,
            max_bpm: None,
            prefer_consistent_tempo: true,
            prefer_increasing_energy: false,
            prefer_decreasing_energy: false,
            max_energy_jump: 0.5,
            target_moods: Vec::new(),
            avoid_moods: Vec::new(),
            weights: DimensionWeights::default(),
        }
    }
}

impl UserPreferences {
    /// Whether `bpm` lies within the preferred tempo bounds
    pub fn bpm_in_range(&self, bpm: f64) -> bool {
        self.min_bpm.map_or(true, |min| bpm >= min) && self.max_bpm.map_or(true, |max| bpm <= max)
    }

    /// Check tempo bounds and the energy-jump limit
    ///
    /// Weights are not checked here: aggregation sanitizes and normalizes
    /// whatever is supplied.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::InvalidInput` for non-finite or inverted tempo
    /// bounds, or a negative or non-finite energy-jump limit
    pub fn validate(&self) -> Result<(), ScoringError> {
        for (name, bound) in [("min_bpm", self.min_bpm), ("max_bpm", self.max_bpm)] {
            if let Some(bpm) = bound {
                if !bpm.is_finite() {
                    return Err(ScoringError::InvalidInput(format!("{} is not finite", name)));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_bpm, self.max_bpm) {
            if min > max {
                return Err(ScoringError::InvalidInput(format!(
                    "min_bpm ({}) exceeds max_bpm ({})",
                    min, max
                )));
            }
        }

        if !self.max_energy_jump.is_finite() || self.max_energy_jump < 0.0 {
            return Err(ScoringError::InvalidInput(format!(
                "max_energy_jump must be a non-negative number, got {}",
                self.max_energy_jump
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = DimensionWeights::default();
        let sum = w.key + w.tempo + w.energy + w.loudness + w.mood + w.timbre + w.genre;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bpm_in_range() {
        let mut prefs = UserPreferences::default();
        assert!(prefs.bpm_in_range(10.0));

        prefs.min_bpm = Some(100.0);
        prefs.max_bpm = Some(130.0);
        assert!(prefs.bpm_in_range(100.0));
        assert!(prefs.bpm_in_range(130.0));
        assert!(!prefs.bpm_in_range(99.9));
        assert!(!prefs.bpm_in_range(131.0));
    }

    #[test]
    fn test_validate() {
        assert!(UserPreferences::default().validate().is_ok());

        let inverted = UserPreferences {
            min_bpm: Some(140.0),
            max_bpm: Some(120.0),
            ..Default::default()
        };
        assert!(matches!(inverted.validate(), Err(ScoringError::InvalidInput(_))));

        let nan_bound = UserPreferences {
            max_bpm: Some(f64::NAN),
            ..Default::default()
        };
        assert!(nan_bound.validate().is_err());

        let negative_jump = UserPreferences {
            max_energy_jump: -0.1,
            ..Default::default()
        };
        assert!(negative_jump.validate().is_err());

        // Odd weights are tolerated
        let mut odd = UserPreferences::default();
        odd.weights.key = -3.0;
        assert!(odd.validate().is_ok());
    }

    #[test]
    fn test_preferences_from_sparse_json() {
        let prefs: UserPreferences =
            serde_json::from_str(
                r#"{"max_bpm": 130, "avoid_moods": ["sad"], "weights": {"tempo": 0.5}}"#,
            )
                .unwrap();
        assert_eq!(prefs.max_bpm, Some(130.0));
        assert_eq!(prefs.avoid_moods, vec![MoodAxis::Sad]);
        assert!(prefs.prefer_consistent_tempo);
        assert_eq!(prefs.weights.tempo, 0.5);
        assert_eq!(prefs.weights.key, 0.15);
    }

    #[test]
    fn test_mood_axis_names() {
        let names: Vec<&str> = MoodAxis::ALL.iter().map(MoodAxis::as_str).collect();
        assert_eq!(names, vec!["happy", "sad", "aggressive", "relaxed", "party"]);
    }
}

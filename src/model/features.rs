//! Feature record: the per-track acoustic descriptors consumed by the scorers
//!
//! Records are produced by an external loader and are immutable value
//! objects as far as the engine is concerned. Every field has a serde
//! default so sparse records still deserialize to well-formed values:
//! the key defaults to C major, energy bands to zero, optionals to absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::key::{Key, Scale};
use super::preferences::MoodAxis;
use crate::error::ScoringError;

/// Energy-band weights (low, mid-low, mid-high, high)
const ENERGY_BAND_WEIGHTS: [f64; 4] = [0.1, 0.2, 0.4, 0.3];

/// Danceability score used when no danceability data exists
pub const NEUTRAL_DANCEABILITY: f64 = 0.5;

/// A (label, probability) classifier output, or its absence
///
/// Keeps "no classification" distinct from "classified with low confidence".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Classification {
    /// Classifier output unavailable
    #[default]
    Absent,
    /// Classifier output
    Classified {
        /// Winning label (e.g. "happy" or "not_happy")
        label: String,
        /// Probability of the winning label (0.0-1.0)
        probability: f64,
    },
}

impl Classification {
    /// Shorthand constructor for a classified value
    pub fn classified(label: impl Into<String>, probability: f64) -> Self {
        Classification::Classified {
            label: label.into(),
            probability,
        }
    }

    /// Label and probability, if classified
    pub fn as_pair(&self) -> Option<(&str, f64)> {
        match self {
            Classification::Absent => None,
            Classification::Classified { label, probability } => {
                Some((label.as_str(), *probability))
            }
        }
    }

    /// Probability of `label` if this classification is positive for it
    pub fn positive_probability(&self, label: &str) -> Option<f64> {
        match self.as_pair() {
            Some((l, p)) if l == label => Some(p),
            _ => None,
        }
    }
}

/// Rhythm descriptors
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoFeatures {
    /// Tempo in beats per minute (0.0 when unknown)
    pub bpm: f64,

    /// Onsets per second
    pub onset_rate: f64,

    /// Number of detected beats
    pub beats_count: u32,
}

/// Tonal descriptors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyFeatures {
    /// Tonic name as reported by the extractor (e.g. "C#", "Bb")
    pub key: String,

    /// Major or minor
    pub scale: Scale,

    /// How well the chroma profile fits the reported key (0.0-1.0)
    pub strength: f64,

    /// Estimated tuning frequency in Hz
    pub tuning_frequency: f64,

    /// Mean chord-detection strength
    pub chords_strength: f64,
}

impl Default for KeyFeatures {
    fn default() -> Self {
        Self {
            key: "C".to_string(),
            scale: Scale::Major,
            strength: 0.0,
            tuning_frequency: 440.0,
            chords_strength: 0.0,
        }
    }
}

impl KeyFeatures {
    /// Parsed key, or `None` if the tonic name is not recognized
    pub fn parsed(&self) -> Option<Key> {
        Key::parse(&self.key, self.scale)
    }
}

/// Mean magnitudes of the four spectral energy bands
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyBands {
    /// Low band
    pub low: f64,
    /// Middle-low band
    pub mid_low: f64,
    /// Middle-high band
    pub mid_high: f64,
    /// High band
    pub high: f64,
}

impl EnergyBands {
    /// Weighted energy score
    ///
    /// `0.1 * low + 0.2 * mid_low + 0.4 * mid_high + 0.3 * high`; zero when
    /// the bands are missing.
    pub fn score(&self) -> f64 {
        let bands = [self.low, self.mid_low, self.mid_high, self.high];
        bands
            .iter()
            .zip(ENERGY_BAND_WEIGHTS.iter())
            .map(|(b, w)| b * w)
            .sum()
    }
}

/// Single-Gaussian timbre model over cepstral coefficients
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimbreDescriptor {
    /// Mean cepstral vector (typically 13 MFCCs, index 0 = overall energy)
    pub mean: Vec<f64>,

    /// Covariance matrix of the cepstral frames, row-major, `mean.len()` square
    pub covariance: Option<Vec<Vec<f64>>>,
}

/// Danceability, either a direct scalar or a classifier output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Danceability {
    /// Direct 0-1 score
    Scalar(f64),
    /// Classifier output, e.g. ("danceable", 0.8)
    Classified {
        /// "danceable" or "not_danceable"
        label: String,
        /// Probability of the label
        probability: f64,
    },
}

impl Danceability {
    /// Danceability as a 0-1 score
    pub fn score(&self) -> f64 {
        match self {
            Danceability::Scalar(value) => *value,
            Danceability::Classified { label, probability } => {
                if label == "danceable" {
                    *probability
                } else {
                    1.0 - *probability
                }
            }
        }
    }
}

/// Binary mood classifiers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodClassifications {
    /// "happy" / "not_happy"
    pub happy: Classification,
    /// "sad" / "not_sad"
    pub sad: Classification,
    /// "aggressive" / "not_aggressive"
    pub aggressive: Classification,
    /// "relaxed" / "not_relaxed"
    pub relaxed: Classification,
    /// "party" / "not_party"
    pub party: Classification,
    /// "acoustic" / "not_acoustic"
    pub acoustic: Classification,
}

impl MoodClassifications {
    /// Classification on one of the five dominant-mood axes
    pub fn axis(&self, axis: MoodAxis) -> &Classification {
        match axis {
            MoodAxis::Happy => &self.happy,
            MoodAxis::Sad => &self.sad,
            MoodAxis::Aggressive => &self.aggressive,
            MoodAxis::Relaxed => &self.relaxed,
            MoodAxis::Party => &self.party,
        }
    }
}

/// Genre classifier output
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenreClassification {
    /// Top genre label and its probability
    pub top: Classification,

    /// Full probability distribution over genre labels, when available
    pub distribution: Option<BTreeMap<String, f64>>,
}

/// Acoustic feature record for one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRecord {
    /// Recording identifier
    pub id: String,

    /// Track title
    pub title: Option<String>,

    /// Artist name
    pub artist: Option<String>,

    /// Album name
    pub album: Option<String>,

    /// Rhythm descriptors
    pub tempo: TempoFeatures,

    /// Tonal descriptors
    pub key: KeyFeatures,

    /// Spectral energy bands
    pub energy: EnergyBands,

    /// Average loudness (0-1), absent when unavailable
    pub loudness: Option<f64>,

    /// Dynamic complexity, absent when unavailable
    pub dynamic_complexity: Option<f64>,

    /// Mean spectral centroid in Hz
    pub spectral_centroid: Option<f64>,

    /// Cepstral timbre model
    pub timbre: Option<TimbreDescriptor>,

    /// Mean sensory dissonance (0-1)
    pub dissonance: Option<f64>,

    /// Danceability
    pub danceability: Option<Danceability>,

    /// Mood classifiers
    pub moods: MoodClassifications,

    /// Genre classifier
    pub genre: GenreClassification,
}

impl Default for FeatureRecord {
    fn default() -> Self {
        Self::new("unknown")
    }
}

impl FeatureRecord {
    /// Create a record with the given identifier and neutral defaults
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            artist: None,
            album: None,
            tempo: TempoFeatures::default(),
            key: KeyFeatures::default(),
            energy: EnergyBands::default(),
            loudness: None,
            dynamic_complexity: None,
            spectral_centroid: None,
            timbre: None,
            dissonance: None,
            danceability: None,
            moods: MoodClassifications::default(),
            genre: GenreClassification::default(),
        }
    }

    /// Weighted energy score of the spectral bands
    pub fn energy_score(&self) -> f64 {
        self.energy.score()
    }

    /// Danceability as a 0-1 score, 0.5 when unavailable
    pub fn danceability_score(&self) -> f64 {
        self.danceability
            .as_ref()
            .map(Danceability::score)
            .unwrap_or(NEUTRAL_DANCEABILITY)
    }

    /// Short human-readable label ("Artist - Title" or the identifier)
    pub fn display_name(&self) -> String {
        match (&self.artist, &self.title) {
            (Some(artist), Some(title)) => format!("{} - {}", artist, title),
            (None, Some(title)) => title.clone(),
            _ => self.id.clone(),
        }
    }

    /// Check the record against the loader contract
    ///
    /// Missing optional data is fine. Shape and type violations are not:
    /// an empty identifier, non-finite numbers, probabilities outside
    /// [0, 1], or a covariance matrix that is not square with the same
    /// dimension as its mean vector.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::InvalidInput` describing the first violation found
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.id.trim().is_empty() {
            return Err(ScoringError::InvalidInput(
                "Feature record has an empty identifier".to_string(),
            ));
        }

        let id = self.id.as_str();
        check_finite(id, "tempo.bpm", self.tempo.bpm)?;
        check_finite(id, "tempo.onset_rate", self.tempo.onset_rate)?;
        check_finite(id, "key.strength", self.key.strength)?;
        check_finite(id, "energy.low", self.energy.low)?;
        check_finite(id, "energy.mid_low", self.energy.mid_low)?;
        check_finite(id, "energy.mid_high", self.energy.mid_high)?;
        check_finite(id, "energy.high", self.energy.high)?;

        for (field, value) in [
            ("loudness", self.loudness),
            ("dynamic_complexity", self.dynamic_complexity),
            ("spectral_centroid", self.spectral_centroid),
            ("dissonance", self.dissonance),
        ] {
            if let Some(v) = value {
                check_finite(id, field, v)?;
            }
        }

        match &self.danceability {
            Some(Danceability::Scalar(v)) => check_finite(id, "danceability", *v)?,
            Some(Danceability::Classified { probability, .. }) => {
                check_probability(id, "danceability", *probability)?
            }
            None => {}
        }

        for (axis, classification) in [
            ("moods.happy", &self.moods.happy),
            ("moods.sad", &self.moods.sad),
            ("moods.aggressive", &self.moods.aggressive),
            ("moods.relaxed", &self.moods.relaxed),
            ("moods.party", &self.moods.party),
            ("moods.acoustic", &self.moods.acoustic),
            ("genre.top", &self.genre.top),
        ] {
            if let Some((_, p)) = classification.as_pair() {
                check_probability(id, axis, p)?;
            }
        }

        if let Some(distribution) = &self.genre.distribution {
            for (label, p) in distribution {
                check_probability(id, &format!("genre.distribution[{}]", label), *p)?;
            }
        }

        if let Some(timbre) = &self.timbre {
            validate_timbre(id, timbre)?;
        }

        Ok(())
    }
}

fn validate_timbre(id: &str, timbre: &TimbreDescriptor) -> Result<(), ScoringError> {
    for (i, v) in timbre.mean.iter().enumerate() {
        check_finite(id, &format!("timbre.mean[{}]", i), *v)?;
    }

    let Some(covariance) = &timbre.covariance else {
        return Ok(());
    };

    let dim = timbre.mean.len();
    if covariance.len() != dim {
        return Err(ScoringError::InvalidInput(format!(
            "Track {}: timbre covariance has {} rows, expected {} to match the mean vector",
            id,
            covariance.len(),
            dim
        )));
    }

    for (r, row) in covariance.iter().enumerate() {
        if row.len() != dim {
            return Err(ScoringError::InvalidInput(format!(
                "Track {}: timbre covariance row {} has {} elements, expected {}",
                id,
                r,
                row.len(),
                dim
            )));
        }
        for (c, v) in row.iter().enumerate() {
            check_finite(id, &format!("timbre.covariance[{}][{}]", r, c), *v)?;
        }
    }

    Ok(())
}

fn check_finite(id: &str, field: &str, value: f64) -> Result<(), ScoringError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScoringError::InvalidInput(format!(
            "Track {}: {} is not finite ({})",
            id, field, value
        )))
    }
}

fn check_probability(id: &str, field: &str, value: f64) -> Result<(), ScoringError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ScoringError::InvalidInput(format!(
            "Track {}: {} probability {} is outside [0, 1]",
            id, field, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_score_weights() {
        let bands = EnergyBands {
            low: 1.0,
            mid_low: 1.0,
            mid_high: 1.0,
            high: 1.0,
        };
        assert!((bands.score() - 1.0).abs() < 1e-12);

        let bands = EnergyBands {
            low: 0.0,
            mid_low: 0.0,
            mid_high: 0.01,
            high: 0.0,
        };
        assert!((bands.score() - 0.004).abs() < 1e-12);

        assert_eq!(EnergyBands::default().score(), 0.0);
    }

    #[test]
    fn test_defaults_are_neutral() {
        let record = FeatureRecord::new("t1");
        assert_eq!(record.key.key, "C");
        assert_eq!(record.key.scale, Scale::Major);
        assert_eq!(record.key.parsed(), Some(Key::Major(0)));
        assert_eq!(record.energy_score(), 0.0);
        assert_eq!(record.danceability_score(), NEUTRAL_DANCEABILITY);
        assert!(record.loudness.is_none());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_danceability_score() {
        assert_eq!(Danceability::Scalar(0.7).score(), 0.7);
        let d = Danceability::Classified {
            label: "danceable".to_string(),
            probability: 0.8,
        };
        assert!((d.score() - 0.8).abs() < 1e-12);
        let d = Danceability::Classified {
            label: "not_danceable".to_string(),
            probability: 0.8,
        };
        assert!((d.score() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_classification_accessors() {
        let c = Classification::classified("happy", 0.9);
        assert_eq!(c.as_pair(), Some(("happy", 0.9)));
        assert_eq!(c.positive_probability("happy"), Some(0.9));
        assert_eq!(c.positive_probability("sad"), None);
        assert_eq!(Classification::Absent.as_pair(), None);
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        let record = FeatureRecord::new("  ");
        assert!(matches!(record.validate(), Err(ScoringError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut record = FeatureRecord::new("t1");
        record.tempo.bpm = f64::NAN;
        assert!(record.validate().is_err());

        let mut record = FeatureRecord::new("t1");
        record.loudness = Some(f64::INFINITY);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let mut record = FeatureRecord::new("t1");
        record.moods.happy = Classification::classified("happy", 1.5);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_covariance_shape() {
        let mut record = FeatureRecord::new("t1");
        record.timbre = Some(TimbreDescriptor {
            mean: vec![0.0; 3],
            covariance: Some(vec![vec![1.0; 3]; 2]),
        });
        let err = record.validate().unwrap_err();
        assert!(err.to_string().contains("rows"));

        record.timbre = Some(TimbreDescriptor {
            mean: vec![0.0; 3],
            covariance: Some(vec![vec![1.0; 3], vec![1.0; 2], vec![1.0; 3]]),
        });
        assert!(record.validate().is_err());

        record.timbre = Some(TimbreDescriptor {
            mean: vec![0.0; 3],
            covariance: None,
        });
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_display_name() {
        let mut record = FeatureRecord::new("mbid-1");
        assert_eq!(record.display_name(), "mbid-1");
        record.title = Some("Girls".to_string());
        assert_eq!(record.display_name(), "Girls");
        record.artist = Some("Cyndi".to_string());
        assert_eq!(record.display_name(), "Cyndi - Girls");
    }
}

//! # Segue
//!
//! A transition-compatibility scoring engine for playlist and DJ-style
//! sequencing. Given two tracks' acoustic features it estimates how smoothly
//! one flows into the other, and it validates whole track sequences.
//!
//! ## Features
//!
//! - **Key**: Krumhansl-Kessler profile correlation
//! - **Tempo**: just-noticeable-difference model with double/half-time mixing
//! - **Energy / Loudness**: calibrated Gaussian decay
//! - **Timbre**: Bhattacharyya distance between cepstral Gaussians
//! - **Mood / Genre**: dominant-mood affinity and genre distribution overlap
//! - **Preferences**: weights, tempo bounds, energy direction, target/avoided moods
//!
//! ## Quick Start
//!
//! ```
//! use segue::{score_transition, FeatureRecord, ScoringConfig, UserPreferences};
//!
//! let mut a = FeatureRecord::new("track-a");
//! a.tempo.bpm = 120.0;
//! a.key.key = "C".into();
//!
//! let mut b = FeatureRecord::new("track-b");
//! b.tempo.bpm = 122.0;
//! b.key.key = "G".into();
//!
//! let result = score_transition(&a, &b, &UserPreferences::default(), &ScoringConfig::default())?;
//! println!("P(smooth) = {:.2}\n{}", result.probability, result.explanation);
//! assert!(result.is_compatible);
//! # Ok::<(), segue::ScoringError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Feature Records → Evidence → Dimension Scorers → Preference Rules → Aggregation → Result
//! ```
//!
//! [`TransitionEngine`] wraps the same pipeline with session state
//! (preferences snapshot, evaluation counter).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod model;

// Re-export main types
pub use analysis::result::{
    Dimension, DimensionScores, PlaylistValidation, TransitionResult, WeakestTransition,
};
pub use config::ScoringConfig;
pub use engine::TransitionEngine;
pub use error::ScoringError;
pub use features::evidence::TransitionEvidence;
pub use model::{
    Classification, Danceability, DimensionWeights, EnergyBands, FeatureRecord,
    GenreClassification, Key, KeyFeatures, MoodAxis, MoodClassifications, Scale, TempoFeatures,
    TimbreDescriptor, UserPreferences,
};

/// Score a single transition
///
/// Checks both feature records and the preferences, then evaluates every
/// dimension, applies the preference rules and aggregates.
///
/// # Arguments
///
/// * `from` - Outgoing track
/// * `to` - Incoming track
/// * `prefs` - User preferences (weights, tempo bounds, mood lists, ...)
/// * `config` - Calibration parameters
///
/// # Returns
///
/// `TransitionResult` with overall probability, per-dimension scores,
/// violations and explanation
///
/// # Errors
///
/// Returns `ScoringError::InvalidInput` if a record or the preferences
/// break their contract. Missing optional data is not an error.
pub fn score_transition(
    from: &FeatureRecord,
    to: &FeatureRecord,
    prefs: &UserPreferences,
    config: &ScoringConfig,
) -> Result<TransitionResult, ScoringError> {
    log::debug!("Scoring transition {} -> {}", from.id, to.id);

    from.validate()?;
    to.validate()?;
    prefs.validate()?;

    let result = analysis::aggregation::evaluate_transition(from, to, prefs, config);
    check_probability(result.probability)?;
    Ok(result)
}

/// Validate an ordered track sequence
///
/// Scores each consecutive pair and reports the mean probability, whether
/// every transition is compatible, the weakest transition and the total
/// number of violations. Fewer than two tracks validate trivially.
///
/// # Errors
///
/// Returns `ScoringError::InvalidInput` if any record or the preferences
/// break their contract
///
/// # Example
///
/// ```
/// use segue::{validate_playlist, FeatureRecord, ScoringConfig, UserPreferences};
///
/// let tracks = [FeatureRecord::new("solo")];
/// let validation =
///     validate_playlist(&tracks, &UserPreferences::default(), &ScoringConfig::default())?;
/// assert!(validation.is_valid);
/// assert_eq!(validation.overall_probability, 1.0);
/// assert!(validation.weakest_transition.is_none());
/// # Ok::<(), segue::ScoringError>(())
/// ```
pub fn validate_playlist(
    tracks: &[FeatureRecord],
    prefs: &UserPreferences,
    config: &ScoringConfig,
) -> Result<PlaylistValidation, ScoringError> {
    log::debug!("Validating playlist of {} track(s)", tracks.len());

    for track in tracks {
        track.validate()?;
    }
    prefs.validate()?;

    let validation = analysis::playlist::validate_sequence(tracks, prefs, config);
    check_probability(validation.overall_probability)?;
    Ok(validation)
}

fn check_probability(p: f64) -> Result<(), ScoringError> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ScoringError::NumericalError(format!(
            "Overall probability {} is outside [0, 1]",
            p
        )))
    }
}

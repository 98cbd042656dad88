//! Transition engine
//!
//! Holds the calibration and the active preferences for a scoring session.
//! Preferences live behind an `Arc` snapshot: scoring reads the snapshot at
//! the start of each call, and [`TransitionEngine::set_preferences`] swaps
//! in a new one. Scoring takes `&self`, so one engine can be shared across
//! threads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::analysis::result::{PlaylistValidation, TransitionResult};
use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::model::features::FeatureRecord;
use crate::model::preferences::UserPreferences;

/// Scoring session: calibration, preferences and an evaluation counter
#[derive(Debug)]
pub struct TransitionEngine {
    config: ScoringConfig,
    preferences: Arc<UserPreferences>,
    evaluations: AtomicU64,
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionEngine {
    /// Engine with default calibration and preferences
    pub fn new() -> Self {
        Self::with_config(ScoringConfig::default())
    }

    /// Engine with custom calibration and default preferences
    pub fn with_config(config: ScoringConfig) -> Self {
        Self {
            config,
            preferences: Arc::new(UserPreferences::default()),
            evaluations: AtomicU64::new(0),
        }
    }

    /// Calibration in use
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Replace the active preferences
    ///
    /// Affects every later scoring call. Snapshots already handed out by
    /// [`preferences_snapshot`](Self::preferences_snapshot) keep the old values.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::InvalidInput` if the preferences fail
    /// [`UserPreferences::validate`]; the active preferences are unchanged.
    pub fn set_preferences(&mut self, preferences: UserPreferences) -> Result<(), ScoringError> {
        preferences.validate()?;
        log::debug!("Updating preferences: {:?}", preferences);
        self.preferences = Arc::new(preferences);
        Ok(())
    }

    /// Active preferences, exactly as last set
    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    /// Shared handle on the active preferences
    pub fn preferences_snapshot(&self) -> Arc<UserPreferences> {
        Arc::clone(&self.preferences)
    }

    /// Score a transition `from -> to` under the active preferences
    ///
    /// # Errors
    ///
    /// Returns `ScoringError` if either record breaks the feature-record
    /// contract (see [`FeatureRecord::validate`])
    ///
    /// # Example
    ///
    /// ```
    /// use segue::{FeatureRecord, TransitionEngine};
    ///
    /// let engine = TransitionEngine::new();
    /// let mut a = FeatureRecord::new("a");
    /// a.tempo.bpm = 128.0;
    /// let result = engine.score(&a, &a)?;
    /// assert!(result.is_compatible);
    /// assert_eq!(engine.evaluations(), 1);
    /// # Ok::<(), segue::ScoringError>(())
    /// ```
    pub fn score(
        &self,
        from: &FeatureRecord,
        to: &FeatureRecord,
    ) -> Result<TransitionResult, ScoringError> {
        let preferences = self.preferences_snapshot();
        let result = crate::score_transition(from, to, &preferences, &self.config)?;
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        Ok(result)
    }

    /// Transition penalty `1 - probability`, for use as a graph edge cost
    ///
    /// # Errors
    ///
    /// Same as [`score`](Self::score)
    pub fn penalty(&self, from: &FeatureRecord, to: &FeatureRecord) -> Result<f64, ScoringError> {
        self.score(from, to).map(|result| result.penalty)
    }

    /// Validate an ordered track sequence under the active preferences
    ///
    /// Counts one evaluation per scored transition.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError` if any record breaks the feature-record contract
    pub fn validate_playlist(
        &self,
        tracks: &[FeatureRecord],
    ) -> Result<PlaylistValidation, ScoringError> {
        let preferences = self.preferences_snapshot();
        let validation = crate::validate_playlist(tracks, &preferences, &self.config)?;
        self.evaluations
            .fetch_add(validation.transitions.len() as u64, Ordering::Relaxed);
        Ok(validation)
    }

    /// Number of transitions scored since creation or the last [`clear`](Self::clear)
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Reset the evaluation counter
    ///
    /// Preferences and calibration are left untouched; nothing is cached
    /// between calls, so scoring results are unaffected.
    pub fn clear(&self) {
        self.evaluations.store(0, Ordering::Relaxed);
    }
}

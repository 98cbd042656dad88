//! Transition analysis
//!
//! Turns per-dimension scores into results:
//! - Preference rule layer
//! - Aggregation, violations and explanation
//! - Playlist validation
//! - Result types

pub mod aggregation;
pub mod playlist;
pub mod result;
pub mod rules;

pub use aggregation::{evaluate_transition, COMPATIBILITY_THRESHOLD, VIOLATION_THRESHOLD};
pub use playlist::validate_sequence;
pub use result::{
    Dimension, DimensionScores, PlaylistValidation, TransitionResult, WeakestTransition,
};

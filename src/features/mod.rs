//! Per-dimension compatibility scorers
//!
//! Each scorer is a pure function from two tracks' descriptors to a
//! probability in [0, 1], with a fixed neutral value for missing data:
//! - Key (Krumhansl-Kessler profile correlation)
//! - Tempo (JND Gaussian with double/half-time alignment)
//! - Energy and loudness (Gaussian decay)
//! - Timbre (Bhattacharyya distance between cepstral Gaussians)
//! - Mood (dominant-mood affinity + danceability)
//! - Genre (distribution overlap or top-label match)
//!
//! plus the evidence deriver that relates two records.

pub mod energy;
pub mod evidence;
pub mod genre;
pub mod key;
pub mod mood;
pub mod tempo;
pub mod timbre;

pub use evidence::{derive_evidence, TransitionEvidence};

//! Data model
//!
//! - Feature records (per-track acoustic descriptors)
//! - Musical keys
//! - User preferences

pub mod features;
pub mod key;
pub mod preferences;

pub use features::{
    Classification, Danceability, EnergyBands, FeatureRecord, GenreClassification, KeyFeatures,
    MoodClassifications, TempoFeatures, TimbreDescriptor,
};
pub use key::{Key, Scale};
pub use preferences::{DimensionWeights, MoodAxis, UserPreferences};

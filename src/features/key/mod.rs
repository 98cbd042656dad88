//! Key compatibility
//!
//! Inter-key similarity is the Pearson correlation between the two keys'
//! Krumhansl-Kessler profiles, mapped from [-1, 1] onto [0, 1]:
//!
//! ```text
//! P(key) = (r + 1) / 2
//! ```
//!
//! Identical keys correlate perfectly. A tonic name that cannot be parsed
//! gets the lowest score the other key reaches against any key of the
//! unparsed side's scale.

pub mod templates;

pub use templates::{key_profile, KK_MAJOR, KK_MINOR};

use crate::model::features::KeyFeatures;
use crate::model::key::{Key, Scale};

/// Key compatibility between two tracks' tonal descriptors
///
/// # Returns
///
/// Probability in [0, 1]; 1.0 for identical keys
///
/// # Example
///
/// ```
/// use segue::features::key::key_compatibility;
/// use segue::model::{KeyFeatures, Scale};
///
/// let c = KeyFeatures { key: "C".into(), scale: Scale::Major, ..Default::default() };
/// let g = KeyFeatures { key: "G".into(), scale: Scale::Major, ..Default::default() };
/// assert!((key_compatibility(&c, &c) - 1.0).abs() < 1e-9);
/// assert!(key_compatibility(&c, &g) > 0.75);
/// ```
pub fn key_compatibility(from: &KeyFeatures, to: &KeyFeatures) -> f64 {
    match (from.parsed(), to.parsed()) {
        (Some(a), Some(b)) => profile_compatibility(a, b),
        (Some(a), None) => {
            log::warn!("Unrecognized key name {:?}, scoring as least compatible", to.key);
            least_compatible(a, to.scale)
        }
        (None, Some(b)) => {
            log::warn!("Unrecognized key name {:?}, scoring as least compatible", from.key);
            least_compatible(b, from.scale)
        }
        (None, None) => {
            log::warn!(
                "Unrecognized key names {:?} and {:?}, scoring as least compatible",
                from.key,
                to.key
            );
            let anchor = match from.scale {
                Scale::Major => Key::Major(0),
                Scale::Minor => Key::Minor(0),
            };
            least_compatible(anchor, to.scale)
        }
    }
}

/// Compatibility between two parsed keys
pub fn profile_compatibility(k1: Key, k2: Key) -> f64 {
    if k1 == k2 {
        return 1.0;
    }
    let r = pearson_correlation(&key_profile(k1), &key_profile(k2));
    ((r + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Lowest compatibility between `key` and any of the twelve keys in `scale`
///
/// Profile correlation is symmetric, so this serves an unknown key on
/// either side of the transition.
fn least_compatible(key: Key, scale: Scale) -> f64 {
    (0..12u32)
        .map(|tonic| match scale {
            Scale::Major => Key::Major(tonic),
            Scale::Minor => Key::Minor(tonic),
        })
        .map(|other| profile_compatibility(key, other))
        .fold(1.0, f64::min)
}

/// Pearson correlation coefficient of two equal-length series
///
/// Returns 0.0 when either series has zero variance.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let mean_a = a[..n].iter().sum::<f64>() / n as f64;
    let mean_b = b[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a[..n].iter().zip(&b[..n]) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom < 1e-12 {
        0.0
    } else {
        cov / denom
    }
}

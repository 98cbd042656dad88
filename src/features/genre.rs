//! Genre compatibility
//!
//! With both genre distributions available, similarity is the
//! Bhattacharyya coefficient of the two (normalized) distributions:
//!
//! ```text
//! BC(p, q) = Σ √(pᵢ qᵢ)
//! ```
//!
//! which is 1.0 for identical distributions and 0.0 for disjoint ones.
//! Otherwise the top labels are compared for an exact (case-insensitive)
//! match.

use std::collections::BTreeMap;

use crate::model::features::GenreClassification;

/// Score when neither a distribution pair nor a top-label pair is available
pub const NEUTRAL_GENRE_SCORE: f64 = 0.5;

/// Genre compatibility probability
///
/// # Example
///
/// ```
/// use segue::features::genre::genre_compatibility;
/// use segue::model::{Classification, GenreClassification};
///
/// let house = GenreClassification {
///     top: Classification::classified("House", 0.8),
///     distribution: None,
/// };
/// let techno = GenreClassification {
///     top: Classification::classified("techno", 0.7),
///     distribution: None,
/// };
/// assert_eq!(genre_compatibility(&house, &house), 1.0);
/// assert_eq!(genre_compatibility(&house, &techno), 0.0);
/// assert_eq!(genre_compatibility(&house, &GenreClassification::default()), 0.5);
/// ```
pub fn genre_compatibility(a: &GenreClassification, b: &GenreClassification) -> f64 {
    if let (Some(p), Some(q)) = (&a.distribution, &b.distribution) {
        if let Some(bc) = bhattacharyya_coefficient(p, q) {
            return bc;
        }
        log::debug!("Empty genre distribution, falling back to top labels");
    }

    match (a.top.as_pair(), b.top.as_pair()) {
        (Some((l1, _)), Some((l2, _))) => {
            if l1.trim().eq_ignore_ascii_case(l2.trim()) {
                1.0
            } else {
                0.0
            }
        }
        _ => NEUTRAL_GENRE_SCORE,
    }
}

/// Bhattacharyya coefficient of two label distributions
///
/// Labels are matched case-insensitively and each distribution is
/// normalized to sum to 1. Returns `None` if either distribution has no
/// positive mass.
pub fn bhattacharyya_coefficient(
    p: &BTreeMap<String, f64>,
    q: &BTreeMap<String, f64>,
) -> Option<f64> {
    let p = normalized(p)?;
    let q = normalized(q)?;

    let coefficient: f64 = p
        .iter()
        .filter_map(|(label, pi)| q.get(label).map(|qi| (pi * qi).sqrt()))
        .sum();

    Some(coefficient.clamp(0.0, 1.0))
}

fn normalized(distribution: &BTreeMap<String, f64>) -> Option<BTreeMap<String, f64>> {
    let mut merged: BTreeMap<String, f64> = BTreeMap::new();
    for (label, p) in distribution {
        if p.is_finite() && *p > 0.0 {
            *merged.entry(label.trim().to_lowercase()).or_insert(0.0) += p;
        }
    }

    let total: f64 = merged.values().sum();
    if total <= 0.0 {
        return None;
    }
    merged.values_mut().for_each(|p| *p /= total);
    Some(merged)
}

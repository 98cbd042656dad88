//! Timbre compatibility
//!
//! Each track's cepstral descriptor is treated as one multivariate Gaussian
//! `N(μ, Σ)`. The first coefficient is dropped: it encodes overall energy,
//! which the loudness dimension already scores.
//!
//! With both covariance matrices available the distance is the
//! Bhattacharyya distance
//!
//! ```text
//! D_B = 1/8 (μ₁-μ₂)ᵀ Σ⁻¹ (μ₁-μ₂) + 1/2 ln( |Σ| / √(|Σ₁||Σ₂|) ),  Σ = (Σ₁+Σ₂)/2
//! ```
//!
//! otherwise the Euclidean distance between the means. Compatibility is
//! the Bhattacharyya coefficient `exp(-D)`.
//!
//! # Reference
//!
//! Aucouturier, J.-J., & Pachet, F. (2002). Music similarity measures:
//! What's the use? *Proc. ISMIR*.

pub mod lu;

use ndarray::{Array1, Array2};

use self::lu::LuDecomposition;
use crate::model::features::TimbreDescriptor;

/// Score when either track lacks a usable mean vector
pub const NEUTRAL_TIMBRE_SCORE: f64 = 0.6;

/// Number of cepstral coefficients considered (including the dropped c₀)
pub const MAX_COEFFICIENTS: usize = 13;

/// Distance between two timbre descriptors
///
/// # Arguments
///
/// * `a`, `b` - Timbre descriptors
/// * `epsilon` - Diagonal regularization added to both covariance matrices
///
/// # Returns
///
/// `None` when either mean vector has fewer than two coefficients,
/// otherwise the Bhattacharyya distance (both covariances present and
/// usable) or the Euclidean distance between the means.
pub fn timbre_distance(a: &TimbreDescriptor, b: &TimbreDescriptor, epsilon: f64) -> Option<f64> {
    let n = MAX_COEFFICIENTS.min(a.mean.len()).min(b.mean.len());
    if n <= 1 {
        return None;
    }

    let mu1 = Array1::from(a.mean[1..n].to_vec());
    let mu2 = Array1::from(b.mean[1..n].to_vec());

    let blocks = a
        .covariance
        .as_deref()
        .and_then(|c| covariance_block(c, n))
        .zip(b.covariance.as_deref().and_then(|c| covariance_block(c, n)));

    match blocks {
        Some((s1, s2)) => Some(bhattacharyya_distance(&mu1, &mu2, s1, s2, epsilon)),
        None => Some(euclidean_distance(&mu1, &mu2)),
    }
}

/// Timbre compatibility probability
///
/// Returns [`NEUTRAL_TIMBRE_SCORE`] when either side lacks a timbre model.
///
/// # Example
///
/// ```
/// use segue::features::timbre::timbre_compatibility;
/// use segue::model::TimbreDescriptor;
///
/// let t = TimbreDescriptor { mean: vec![-600.0, 120.0, -10.0, 15.0], covariance: None };
/// assert_eq!(timbre_compatibility(Some(&t), Some(&t), 1e-6), 1.0);
/// assert_eq!(timbre_compatibility(Some(&t), None, 1e-6), 0.6);
/// ```
pub fn timbre_compatibility(
    a: Option<&TimbreDescriptor>,
    b: Option<&TimbreDescriptor>,
    epsilon: f64,
) -> f64 {
    let distance = match (a, b) {
        (Some(a), Some(b)) => timbre_distance(a, b, epsilon),
        _ => None,
    };
    distance_to_probability(distance)
}

/// `exp(-distance)` capped at 1.0, or [`NEUTRAL_TIMBRE_SCORE`] without a distance
pub fn distance_to_probability(distance: Option<f64>) -> f64 {
    match distance {
        Some(d) => (-d).exp().min(1.0),
        None => NEUTRAL_TIMBRE_SCORE,
    }
}

/// Bhattacharyya distance between two Gaussians
///
/// Falls back to the Euclidean distance between the means when the
/// averaged covariance cannot be factored. The log-determinant term is
/// skipped if any of the three determinants is non-positive.
pub fn bhattacharyya_distance(
    mu1: &Array1<f64>,
    mu2: &Array1<f64>,
    cov1: Array2<f64>,
    cov2: Array2<f64>,
    epsilon: f64,
) -> f64 {
    let dim = mu1.len();
    let regularization = Array2::<f64>::eye(dim) * epsilon;
    let s1 = cov1 + &regularization;
    let s2 = cov2 + &regularization;
    let s_avg = (&s1 + &s2) / 2.0;

    let diff = mu1 - mu2;

    let Some(avg_lu) = LuDecomposition::new(&s_avg) else {
        log::warn!("Singular averaged timbre covariance, falling back to Euclidean distance");
        return euclidean_distance(mu1, mu2);
    };

    let mahalanobis = diff.dot(&avg_lu.solve(&diff));
    let mean_term = mahalanobis / 8.0;

    let (sign_avg, logdet_avg) = avg_lu.log_determinant();
    let shape_term = match (LuDecomposition::new(&s1), LuDecomposition::new(&s2)) {
        (Some(lu1), Some(lu2)) => {
            let (sign1, logdet1) = lu1.log_determinant();
            let (sign2, logdet2) = lu2.log_determinant();
            if sign_avg > 0.0 && sign1 > 0.0 && sign2 > 0.0 {
                0.5 * (logdet_avg - 0.5 * (logdet1 + logdet2))
            } else {
                0.0
            }
        }
        _ => 0.0,
    };

    log::debug!(
        "Bhattacharyya distance: mean term {:.4}, shape term {:.4}",
        mean_term,
        shape_term
    );
    mean_term + shape_term
}

/// Euclidean distance between two vectors
pub fn euclidean_distance(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    (a - b).mapv(|d| d * d).sum().sqrt()
}

/// Covariance block over coefficients 1..n (c₀ row and column dropped)
///
/// `None` if the matrix is too small for `n` coefficients.
fn covariance_block(covariance: &[Vec<f64>], n: usize) -> Option<Array2<f64>> {
    if covariance.len() < n || covariance[..n].iter().any(|row| row.len() < n) {
        return None;
    }
    Some(Array2::from_shape_fn((n - 1, n - 1), |(i, j)| {
        covariance[i + 1][j + 1]
    }))
}

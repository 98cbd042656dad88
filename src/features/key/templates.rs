//! Krumhansl-Kessler key templates
//!
//! Probe-tone ratings of how well each pitch class fits a major or minor
//! tonal context, indexed relative to the tonic.
//!
//! # Reference
//!
//! Krumhansl, C. L. (1990). *Cognitive Foundations of Musical Pitch*.
//! Oxford University Press.

use crate::model::key::Key;

/// Major-key probe-tone profile (index 0 = tonic)
pub const KK_MAJOR: [f64; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// Minor-key probe-tone profile (index 0 = tonic)
pub const KK_MINOR: [f64; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Profile of `key` laid out over absolute pitch classes
///
/// Element `pc` holds the rating of pitch class `pc` in the context of the
/// key, i.e. the base profile rotated so that its tonic entry lands on the
/// key's tonic. Profiles of different keys are then directly comparable.
pub fn key_profile(key: Key) -> [f64; 12] {
    let base = match key {
        Key::Major(_) => &KK_MAJOR,
        Key::Minor(_) => &KK_MINOR,
    };
    let tonic = key.tonic() as usize;

    let mut profile = [0.0; 12];
    for (pc, slot) in profile.iter_mut().enumerate() {
        *slot = base[(pc + 12 - tonic) % 12];
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_major_is_unrotated() {
        assert_eq!(key_profile(Key::Major(0)), KK_MAJOR);
        assert_eq!(key_profile(Key::Minor(0)), KK_MINOR);
    }

    #[test]
    fn test_tonic_lands_on_key() {
        for tonic in 0..12u32 {
            let major = key_profile(Key::Major(tonic));
            assert_eq!(major[tonic as usize], KK_MAJOR[0]);
            // Dominant is 7 semitones up
            assert_eq!(major[(tonic as usize + 7) % 12], KK_MAJOR[7]);

            let minor = key_profile(Key::Minor(tonic));
            assert_eq!(minor[tonic as usize], KK_MINOR[0]);
        }
    }
}

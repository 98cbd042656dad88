//! Musical key types and key-name parsing

use serde::{Deserialize, Serialize};

/// Note names indexed by pitch class (0 = C)
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Major tonics in circle-of-fifths order: C, G, D, A, E, B, F#, C#, G#, D#, A#, F
const CIRCLE_OF_FIFTHS_MAJOR: [u32; 12] = [0, 7, 2, 9, 4, 11, 6, 1, 8, 3, 10, 5];

/// Relative minors of the above: Am, Em, Bm, F#m, C#m, G#m, D#m, A#m, Fm, Cm, Gm, Dm
const CIRCLE_OF_FIFTHS_MINOR: [u32; 12] = [9, 4, 11, 6, 1, 8, 3, 10, 5, 0, 7, 2];

/// Largest possible distance on the circle of fifths (tritone)
pub const MAX_CIRCLE_DISTANCE: u32 = 6;

/// Scale (mode) of a key as reported by the feature extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Major mode
    #[default]
    Major,
    /// Minor mode
    Minor,
}

impl Scale {
    /// Lowercase name ("major" / "minor")
    pub fn as_str(&self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
        }
    }
}

/// Musical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u32),
    /// Minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u32),
}

impl Key {
    /// Parse a tonic name together with its scale
    ///
    /// Accepts letter names with an optional accidental (`C`, `c#`, `Db`,
    /// `F♯`, `B♭`) as well as the underscore spellings `c_sharp` and
    /// `d_flat`. Enharmonic spellings resolve to the same pitch class.
    ///
    /// # Returns
    ///
    /// `Some(Key)` if the name is recognized, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use segue::model::key::{Key, Scale};
    ///
    /// assert_eq!(Key::parse("C#", Scale::Major), Some(Key::Major(1)));
    /// assert_eq!(Key::parse("Db", Scale::Major), Some(Key::Major(1)));
    /// assert_eq!(Key::parse("a", Scale::Minor), Some(Key::Minor(9)));
    /// assert_eq!(Key::parse("H", Scale::Major), None);
    /// ```
    pub fn parse(name: &str, scale: Scale) -> Option<Self> {
        let pitch_class = parse_pitch_class(name)?;
        Some(match scale {
            Scale::Major => Key::Major(pitch_class),
            Scale::Minor => Key::Minor(pitch_class),
        })
    }

    /// Pitch class of the tonic (0 = C, ..., 11 = B)
    pub fn tonic(&self) -> u32 {
        match self {
            Key::Major(i) | Key::Minor(i) => *i % 12,
        }
    }

    /// Scale of this key
    pub fn scale(&self) -> Scale {
        match self {
            Key::Major(_) => Scale::Major,
            Key::Minor(_) => Scale::Minor,
        }
    }

    /// Get key name in musical notation (e.g., "C", "Am", "F#", "D#m")
    ///
    /// # Example
    ///
    /// ```
    /// use segue::model::key::Key;
    ///
    /// assert_eq!(Key::Major(0).name(), "C");
    /// assert_eq!(Key::Major(6).name(), "F#");
    /// assert_eq!(Key::Minor(9).name(), "Am");
    /// ```
    pub fn name(&self) -> String {
        match self {
            Key::Major(i) => NOTE_NAMES[*i as usize % 12].to_string(),
            Key::Minor(i) => format!("{}m", NOTE_NAMES[*i as usize % 12]),
        }
    }

    /// Get key in DJ numerical notation (e.g., "1A", "2B", "12A")
    ///
    /// Numbers follow the circle of fifths: 1A = C, 2A = G, ...; the minor
    /// keys share the number of their relative major (1B = Am, 2B = Em).
    ///
    /// # Example
    ///
    /// ```
    /// use segue::model::key::Key;
    ///
    /// assert_eq!(Key::Major(0).numerical(), "1A");
    /// assert_eq!(Key::Major(7).numerical(), "2A");
    /// assert_eq!(Key::Minor(9).numerical(), "1B");
    /// ```
    pub fn numerical(&self) -> String {
        let (table, suffix) = match self {
            Key::Major(_) => (&CIRCLE_OF_FIFTHS_MAJOR, 'A'),
            Key::Minor(_) => (&CIRCLE_OF_FIFTHS_MINOR, 'B'),
        };
        let tonic = self.tonic();
        let position = table.iter().position(|&x| x == tonic).unwrap_or(0);
        format!("{}{}", position + 1, suffix)
    }

    /// Get key from DJ numerical notation
    ///
    /// # Returns
    ///
    /// `Some(Key)` if valid, `None` if invalid format
    ///
    /// # Example
    ///
    /// ```
    /// use segue::model::key::Key;
    ///
    /// assert_eq!(Key::from_numerical("2A"), Some(Key::Major(7)));
    /// assert_eq!(Key::from_numerical("2B"), Some(Key::Minor(4)));
    /// assert_eq!(Key::from_numerical("13A"), None);
    /// ```
    pub fn from_numerical(notation: &str) -> Option<Self> {
        if notation.len() < 2 || !notation.is_char_boundary(notation.len() - 1) {
            return None;
        }

        let (num_str, suffix) = notation.split_at(notation.len() - 1);
        let num: usize = num_str.parse().ok()?;
        if !(1..=12).contains(&num) {
            return None;
        }

        match suffix {
            "A" => Some(Key::Major(CIRCLE_OF_FIFTHS_MAJOR[num - 1])),
            "B" => Some(Key::Minor(CIRCLE_OF_FIFTHS_MINOR[num - 1])),
            _ => None,
        }
    }
}

/// Parse a note name into a pitch class (0 = C)
///
/// Returns `None` for anything that is not a letter A-G followed by at most
/// one accidental.
pub fn parse_pitch_class(name: &str) -> Option<u32> {
    let trimmed = name.trim();
    let normalized = trimmed
        .to_ascii_lowercase()
        .replace("_sharp", "#")
        .replace("_flat", "b")
        .replace('\u{266F}', "#")
        .replace('\u{266D}', "b");

    let mut chars = normalized.chars();
    let base: i32 = match chars.next()? {
        'c' => 0,
        'd' => 2,
        'e' => 4,
        'f' => 5,
        'g' => 7,
        'a' => 9,
        'b' => 11,
        _ => return None,
    };

    let shift = match chars.next() {
        None => 0,
        Some('#') => 1,
        Some('b') => -1,
        Some(_) => return None,
    };
    if chars.next().is_some() {
        return None;
    }

    Some((base + shift).rem_euclid(12) as u32)
}

/// Position of a pitch class on the circle of fifths (0 = C, 1 = G, ...)
fn circle_position(pitch_class: u32) -> usize {
    // Stepping by a fifth is multiplication by 7 mod 12, and 7 is its own inverse
    ((pitch_class % 12) * 7 % 12) as usize
}

/// Minimum distance between two tonics on the circle of fifths
///
/// Compares tonic names only; the scale is ignored. Symmetric, 0 for
/// identical (or enharmonic) tonics and at most 6 (tritone). Unrecognized
/// names resolve to the maximum distance.
///
/// # Example
///
/// ```
/// use segue::model::key::circle_of_fifths_distance;
///
/// assert_eq!(circle_of_fifths_distance("C", "G"), 1);
/// assert_eq!(circle_of_fifths_distance("C", "F#"), 6);
/// assert_eq!(circle_of_fifths_distance("C#", "Db"), 0);
/// assert_eq!(circle_of_fifths_distance("C", "X"), 6);
/// ```
pub fn circle_of_fifths_distance(key1: &str, key2: &str) -> u32 {
    match (parse_pitch_class(key1), parse_pitch_class(key2)) {
        (Some(a), Some(b)) => pitch_class_distance(a, b),
        _ => MAX_CIRCLE_DISTANCE,
    }
}

/// Circle-of-fifths distance between two pitch classes
pub fn pitch_class_distance(a: u32, b: u32) -> u32 {
    let pos_a = circle_position(a) as i32;
    let pos_b = circle_position(b) as i32;
    let forward = (pos_b - pos_a).rem_euclid(12);
    let backward = (pos_a - pos_b).rem_euclid(12);
    forward.min(backward) as u32
}

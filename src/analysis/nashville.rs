//! Nashville number notation
//!
//! Renders a chord label as the scale degree of its root relative to a key tonic.

use crate::analysis::result::{KeyEstimate, NO_CHORD};
use crate::features::pitch::PitchClass;

/// Roman numeral for each semitone above the tonic
pub const DEGREE_NUMERALS: [&str; 12] = [
    "I", "bII", "II", "bIII", "III", "IV", "bV", "V", "bVI", "VI", "bVII", "VII",
];

/// Placeholder for bars without a chord
pub const NO_DEGREE: &str = "—";

/// Nashville number for a chord label in `key`
///
/// Minor-quality chords (`m`, `m7`, `dim`) are lowercased; sevenths keep a
/// `7` or `maj7` suffix. Only the key tonic matters, not its mode.
///
/// # Example
///
/// ```
/// use chordgrid::analysis::nashville::to_nashville;
/// use chordgrid::analysis::result::{KeyEstimate, KeyMode};
/// use chordgrid::features::pitch::PitchClass;
///
/// let g_major = KeyEstimate::new(PitchClass::new(7), KeyMode::Major);
/// assert_eq!(to_nashville("D7", &g_major), "V7");
/// assert_eq!(to_nashville("Em", &g_major), "vi");
/// ```
pub fn to_nashville(chord_label: &str, key: &KeyEstimate) -> String {
    if chord_label.is_empty() || chord_label == NO_CHORD {
        return NO_DEGREE.to_string();
    }
    let Some((root, quality)) = split_root(chord_label) else {
        return "?".to_string();
    };

    let degree = (root.index() + 12 - key.tonic.index()) % 12;
    let quality = quality.to_ascii_lowercase();
    let is_minor =
        (quality.starts_with('m') && !quality.starts_with("maj")) || quality.contains("dim");

    let mut numeral = if is_minor {
        DEGREE_NUMERALS[degree].to_lowercase()
    } else {
        DEGREE_NUMERALS[degree].to_string()
    };
    if quality.contains("maj7") {
        numeral.push_str("maj7");
    } else if quality.contains('7') {
        numeral.push('7');
    }
    numeral
}

/// Split "F#m7" into (F#, "m7"); flat roots are respelled as sharps
fn split_root(label: &str) -> Option<(PitchClass, &str)> {
    let letter = label.chars().next().filter(|c| ('A'..='G').contains(c))?;
    let mut end = letter.len_utf8();
    if matches!(label[end..].chars().next(), Some('#' | 'b')) {
        end += 1;
    }
    let root = PitchClass::from_name(&label[..end])?;
    Some((root, &label[end..]))
}

//! Pitch-class naming and frequency/MIDI conversion

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pitch-class names, sharps only (0 = C, 11 = B)
pub const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Reference tuning: A4 = 440 Hz = MIDI 69
const A4_HZ: f32 = 440.0;
const A4_MIDI: f32 = 69.0;

/// One of the 12 octave-independent pitch classes
///
/// Serialized as its name (`"C#"`), not as an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Build a pitch class, wrapping the index modulo 12
    pub fn new(index: usize) -> Self {
        PitchClass((index % 12) as u8)
    }

    /// Index 0-11 (0 = C)
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Sharp-spelled name (e.g. "F#")
    pub fn name(self) -> &'static str {
        PITCH_NAMES[self.index()]
    }

    /// Transpose by a number of semitones (may be negative)
    pub fn transpose(self, semitones: i32) -> Self {
        PitchClass::new((self.0 as i32 + semitones).rem_euclid(12) as usize)
    }

    /// Parse a root name, accepting flat spellings (e.g. "Bb" → A#)
    pub fn from_name(name: &str) -> Option<Self> {
        let sharp = match name {
            "Db" => "C#",
            "Eb" => "D#",
            "Gb" => "F#",
            "Ab" => "G#",
            "Bb" => "A#",
            other => other,
        };
        PITCH_NAMES
            .iter()
            .position(|&n| n == sharp)
            .map(PitchClass::new)
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for PitchClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for PitchClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        PitchClass::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown pitch class '{}'", name)))
    }
}

/// Convert a frequency in Hz to a (fractional) MIDI note number
pub fn hz_to_midi(hz: f32) -> f32 {
    A4_MIDI + 12.0 * (hz / A4_HZ).log2()
}

/// Scientific pitch name for a MIDI note (60 → "C4", 33 → "A1")
pub fn midi_to_note_name(midi: i32) -> String {
    let pc = PitchClass::new(midi.rem_euclid(12) as usize);
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", pc.name(), octave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hz_to_midi_reference_points() {
        assert_relative_eq!(hz_to_midi(440.0), 69.0, epsilon = 1e-4);
        assert_relative_eq!(hz_to_midi(55.0), 33.0, epsilon = 1e-4);
        assert_relative_eq!(hz_to_midi(110.0), 45.0, epsilon = 1e-4);
        assert_relative_eq!(hz_to_midi(41.2034), 28.0, epsilon = 1e-3);
    }

    #[test]
    fn test_midi_to_note_name() {
        assert_eq!(midi_to_note_name(69), "A4");
        assert_eq!(midi_to_note_name(60), "C4");
        assert_eq!(midi_to_note_name(33), "A1");
        assert_eq!(midi_to_note_name(28), "E1");
        assert_eq!(midi_to_note_name(37), "C#2");
    }

    #[test]
    fn test_pitch_class_names_and_flats() {
        assert_eq!(PitchClass::new(13).name(), "C#");
        assert_eq!(PitchClass::from_name("Bb"), Some(PitchClass::new(10)));
        assert_eq!(PitchClass::from_name("E"), Some(PitchClass::new(4)));
        assert_eq!(PitchClass::from_name("H"), None);
        assert_eq!(PitchClass::new(0).transpose(-1).name(), "B");
    }

    #[test]
    fn test_pitch_class_serializes_as_name() {
        let json = serde_json::to_string(&PitchClass::new(6)).unwrap();
        assert_eq!(json, "\"F#\"");
        let back: PitchClass = serde_json::from_str("\"Eb\"").unwrap();
        assert_eq!(back.index(), 3);
    }
}

//! Analysis result types
//!
//! These types form the crate's output boundary and serialize to the nested
//! mapping consumed by presentation layers:
//! `{source, title, bpm, key, time_signature, mode, segments}`.

use serde::{Deserialize, Serialize};

use crate::features::beat_tracking::time_signature::TimeSignature;
use crate::features::pitch::{hz_to_midi, midi_to_note_name, PitchClass};

/// Label used for bars no chord overlaps
pub const NO_CHORD: &str = "N";

/// Note name used for unvoiced bass beats
pub const NO_NOTE: &str = "N";

/// Key mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// Major key
    Major,
    /// Minor key
    Minor,
}

/// Global key estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Tonic pitch class (serialized as its name, e.g. "F#")
    pub tonic: PitchClass,
    /// Major or minor
    pub mode: KeyMode,
}

impl KeyEstimate {
    /// Create a key estimate
    pub fn new(tonic: PitchClass, mode: KeyMode) -> Self {
        Self { tonic, mode }
    }

    /// Get key name in musical notation (e.g., "C", "Am", "F#", "D#m")
    ///
    /// # Example
    ///
    /// ```
    /// use chordgrid::analysis::result::{KeyEstimate, KeyMode};
    /// use chordgrid::features::pitch::PitchClass;
    ///
    /// assert_eq!(KeyEstimate::new(PitchClass::new(6), KeyMode::Major).name(), "F#");
    /// assert_eq!(KeyEstimate::new(PitchClass::new(9), KeyMode::Minor).name(), "Am");
    /// ```
    pub fn name(&self) -> String {
        match self.mode {
            KeyMode::Major => self.tonic.name().to_string(),
            KeyMode::Minor => format!("{}m", self.tonic.name()),
        }
    }
}

/// A timed chord span; also used for bars after quantization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSegment {
    /// Start time in seconds
    pub start: f32,
    /// End time in seconds (exclusive)
    pub end: f32,
    /// Chord label, or "N" for no chord
    pub chord: String,
}

impl ChordSegment {
    /// Create a segment
    pub fn new(start: f32, end: f32, chord: impl Into<String>) -> Self {
        Self {
            start,
            end,
            chord: chord.into(),
        }
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}

/// A metrical bar carrying its dominant chord
pub type Bar = ChordSegment;

/// Dominant bass pitch over one beat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BassNote {
    /// Beat start time in seconds
    pub start: f32,
    /// Beat end time in seconds
    pub end: f32,
    /// Detected pitch in Hz (0 when unvoiced)
    pub pitch_hz: f32,
    /// Rounded MIDI note number (0 when unvoiced)
    pub midi_note: i32,
    /// Scientific pitch name (e.g. "A1"), or "N" when unvoiced
    pub note_name: String,
}

impl BassNote {
    /// Note for a detected pitch; the MIDI number is rounded to the nearest semitone
    ///
    /// Pitches that round to MIDI 0 or below (under ~8.4 Hz), and non-finite
    /// pitches, give an unvoiced note.
    pub fn from_pitch(start: f32, end: f32, pitch_hz: f32) -> Self {
        let midi = hz_to_midi(pitch_hz).round();
        if !midi.is_finite() || midi < 1.0 {
            return Self::unvoiced(start, end);
        }
        let midi_note = midi as i32;
        Self {
            start,
            end,
            pitch_hz,
            midi_note,
            note_name: midi_to_note_name(midi_note),
        }
    }

    /// Beat with no detected pitch
    pub fn unvoiced(start: f32, end: f32) -> Self {
        Self {
            start,
            end,
            pitch_hz: 0.0,
            midi_note: 0,
            note_name: NO_NOTE.to_string(),
        }
    }

    /// Whether a pitch was detected
    pub fn is_voiced(&self) -> bool {
        self.midi_note > 0
    }
}

/// Position on a 4-string bass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabPosition {
    /// String number, 1 (E, lowest) to 4 (G, highest); 0 when unvoiced
    pub string: u8,
    /// Fret number; -1 when unvoiced, may be negative or above 19 for out-of-range notes
    pub fret: i32,
    /// Display text, e.g. "A12"
    pub display: String,
}

/// A bar of bass notes with their tablature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BassBar {
    /// Start of the first beat
    pub start: f32,
    /// End of the last beat
    pub end: f32,
    /// Per-beat notes
    pub notes: Vec<BassNote>,
    /// Tab position for each note, same order
    pub tabs: Vec<TabPosition>,
}

/// Analysis mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Chord recognition
    #[default]
    Chords,
    /// Bass note tracking with tablature
    Bass,
}

impl AnalysisMode {
    /// Mode tag as written in results ("chords" or "bass")
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisMode::Chords => "chords",
            AnalysisMode::Bass => "bass",
        }
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chords" => Ok(AnalysisMode::Chords),
            "bass" => Ok(AnalysisMode::Bass),
            other => Err(format!("unknown mode '{}' (expected chords or bass)", other)),
        }
    }
}

/// Ordered segment list: chord segments/bars or bass bars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segments {
    /// Chord mode output
    Chords(Vec<ChordSegment>),
    /// Bass mode output
    Bass(Vec<BassBar>),
}

impl Segments {
    /// Number of segments or bars
    pub fn len(&self) -> usize {
        match self {
            Segments::Chords(s) => s.len(),
            Segments::Bass(b) => b.len(),
        }
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Chord segments, if this is a chord-mode result
    pub fn as_chords(&self) -> Option<&[ChordSegment]> {
        match self {
            Segments::Chords(s) => Some(s),
            Segments::Bass(_) => None,
        }
    }

    /// Bass bars, if this is a bass-mode result
    pub fn as_bass(&self) -> Option<&[BassBar]> {
        match self {
            Segments::Bass(b) => Some(b),
            Segments::Chords(_) => None,
        }
    }
}

/// Complete analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Source identifier (e.g. the URL or feature file the track came from)
    pub source: String,

    /// Track title, when the acquisition layer knows it
    pub title: Option<String>,

    /// Tempo in beats per minute
    pub bpm: f32,

    /// Global key (chord mode only)
    pub key: Option<KeyEstimate>,

    /// Time signature used for bar grouping
    pub time_signature: TimeSignature,

    /// Mode tag
    pub mode: AnalysisMode,

    /// Ordered segments or bars
    pub segments: Segments,
}

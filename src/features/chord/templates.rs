//! Chord template library
//!
//! Defines binary pitch-class masks for 60 chords (12 roots × 5 qualities).
//! The index order is root-major: for each root C..B the qualities follow
//! major, minor, dominant seventh, minor seventh, major seventh. Every
//! downstream stage (cost vectors, Viterbi states, labels) shares this index space.

use std::sync::OnceLock;

use ndarray::Array2;

use crate::features::chroma::normalization::{normalize_rows_l2, DEFAULT_EPSILON};
use crate::features::chroma::N_CHROMA;
use crate::features::pitch::PitchClass;

/// Number of chord qualities in the vocabulary
pub const NUM_QUALITIES: usize = 5;

/// Total number of chord templates
pub const NUM_TEMPLATES: usize = N_CHROMA * NUM_QUALITIES;

/// Chord quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    /// Root, major third, fifth
    Major,
    /// Root, minor third, fifth
    Minor,
    /// Major triad plus minor seventh
    DominantSeventh,
    /// Minor triad plus minor seventh
    MinorSeventh,
    /// Major triad plus major seventh
    MajorSeventh,
}

impl ChordQuality {
    /// All qualities in template order
    pub const ALL: [ChordQuality; NUM_QUALITIES] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::DominantSeventh,
        ChordQuality::MinorSeventh,
        ChordQuality::MajorSeventh,
    ];

    /// Semitone offsets from the root
    pub fn intervals(self) -> &'static [usize] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::DominantSeventh => &[0, 4, 7, 10],
            ChordQuality::MinorSeventh => &[0, 3, 7, 10],
            ChordQuality::MajorSeventh => &[0, 4, 7, 11],
        }
    }

    /// Label suffix appended to the root name ("" for major)
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::DominantSeventh => "7",
            ChordQuality::MinorSeventh => "m7",
            ChordQuality::MajorSeventh => "maj7",
        }
    }

    /// Position within a root's block of templates
    pub fn index(self) -> usize {
        match self {
            ChordQuality::Major => 0,
            ChordQuality::Minor => 1,
            ChordQuality::DominantSeventh => 2,
            ChordQuality::MinorSeventh => 3,
            ChordQuality::MajorSeventh => 4,
        }
    }

    /// Whether the chord is built on a minor third
    pub fn is_minor(self) -> bool {
        matches!(self, ChordQuality::Minor | ChordQuality::MinorSeventh)
    }
}

/// A single chord template
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordTemplate {
    /// Root pitch class
    pub root: PitchClass,
    /// Chord quality
    pub quality: ChordQuality,
    /// Binary pitch-class mask (1.0 where the chord has a tone)
    pub mask: [f32; N_CHROMA],
}

impl ChordTemplate {
    /// Build the template by rotating the quality's root-position mask to `root`
    pub fn new(root: PitchClass, quality: ChordQuality) -> Self {
        let mut mask = [0.0f32; N_CHROMA];
        for &interval in quality.intervals() {
            mask[(root.index() + interval) % N_CHROMA] = 1.0;
        }
        Self {
            root,
            quality,
            mask,
        }
    }

    /// Chord label, e.g. "C", "F#m", "A7", "Dm7", "A#maj7" (sharps only)
    pub fn label(&self) -> String {
        format!("{}{}", self.root.name(), self.quality.suffix())
    }
}

/// The fixed 60-template vocabulary
#[derive(Debug, Clone)]
pub struct ChordTemplates {
    templates: Vec<ChordTemplate>,
    labels: Vec<String>,
    /// Row-normalized (L2) masks, shape (60, 12)
    normalized: Array2<f32>,
}

impl ChordTemplates {
    /// Build the full vocabulary
    pub fn new() -> Self {
        let mut templates = Vec::with_capacity(NUM_TEMPLATES);
        for root in 0..N_CHROMA {
            for quality in ChordQuality::ALL {
                templates.push(ChordTemplate::new(PitchClass::new(root), quality));
            }
        }

        let labels = templates.iter().map(ChordTemplate::label).collect();
        let mut masks = Array2::<f32>::zeros((NUM_TEMPLATES, N_CHROMA));
        for (i, template) in templates.iter().enumerate() {
            for (j, &value) in template.mask.iter().enumerate() {
                masks[[i, j]] = value;
            }
        }
        let normalized = normalize_rows_l2(&masks, DEFAULT_EPSILON);

        Self {
            templates,
            labels,
            normalized,
        }
    }

    /// Process-wide instance, built on first use and never mutated
    pub fn shared() -> &'static ChordTemplates {
        static LIBRARY: OnceLock<ChordTemplates> = OnceLock::new();
        LIBRARY.get_or_init(ChordTemplates::new)
    }

    /// Number of templates (always 60)
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template at `index`
    pub fn get(&self, index: usize) -> Option<&ChordTemplate> {
        self.templates.get(index)
    }

    /// Label at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= 60`. Viterbi paths only contain valid indices.
    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// Index of a (root, quality) pair
    pub fn index_of(root: PitchClass, quality: ChordQuality) -> usize {
        root.index() * NUM_QUALITIES + quality.index()
    }

    /// Index of a label, if it belongs to the vocabulary
    pub fn find(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// L2-normalized template matrix, shape (60, 12)
    pub fn normalized(&self) -> &Array2<f32> {
        &self.normalized
    }

    /// Iterate over templates in index order
    pub fn iter(&self) -> impl Iterator<Item = &ChordTemplate> {
        self.templates.iter()
    }
}

impl Default for ChordTemplates {
    fn default() -> Self {
        Self::new()
    }
}

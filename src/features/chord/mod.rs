//! Chord recognition modules
//!
//! Frame-level chord recognition from a chroma matrix:
//! - Template library (60 chords)
//! - Cosine match cost
//! - Viterbi smoothing
//! - Segmentation into timed chord spans

pub mod cost;
pub mod segments;
pub mod templates;
pub mod viterbi;

pub use cost::{cost_matrix, frame_cost};
pub use segments::segment_labels;
pub use templates::{ChordQuality, ChordTemplate, ChordTemplates, NUM_TEMPLATES};
pub use viterbi::ViterbiSmoother;

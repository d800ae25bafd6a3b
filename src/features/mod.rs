//! Recognition modules
//!
//! This module contains the recognition engine:
//! - Pitch naming helpers
//! - Chroma normalization
//! - Chord recognition (templates, match cost, Viterbi, segmentation)
//! - Beat grid (time signatures, bar quantization)
//! - Key detection
//! - Bass tracking (per-beat notes, tablature)

pub mod bass;
pub mod beat_tracking;
pub mod chord;
pub mod chroma;
pub mod key;
pub mod pitch;

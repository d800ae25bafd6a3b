//! Key detection modules
//!
//! Detect the global musical key using:
//! - Krumhansl-Kessler templates (24 keys)
//! - Pearson correlation against the mean chroma vector

pub mod detector;
pub mod templates;

pub use detector::{detect_key, estimate_key};
pub use templates::KeyTemplates;

use crate::analysis::result::KeyEstimate;

/// Key detection result
#[derive(Debug, Clone)]
pub struct KeyDetectionResult {
    /// Detected key (best match)
    pub key: KeyEstimate,

    /// Pearson correlation of the winning template (-1.0 to 1.0)
    pub correlation: f32,

    /// All 24 key correlations (ranked, highest first)
    pub all_scores: Vec<(KeyEstimate, f32)>,
}

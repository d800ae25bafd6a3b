//! Configuration parameters for track analysis

use std::time::Duration;

use crate::analysis::result::AnalysisMode;
use crate::error::AnalysisError;
use crate::features::beat_tracking::time_signature::TimeSignature;
use crate::features::chroma::normalization::DEFAULT_EPSILON;

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    // Request
    /// Chords or bass (default: Chords)
    pub mode: AnalysisMode,

    /// Meter used for bar grouping (default: 4/4)
    pub time_signature: TimeSignature,

    // Viterbi smoothing
    /// Self-transition probability (default: 0.4)
    /// Higher values hold chords longer and suppress short changes
    pub stay_probability: f32,

    /// Probability mass spread over all other chords (default: 0.6)
    pub change_probability: f32,

    // Chroma
    /// Epsilon guarding vector normalization against division by zero (default: 1e-9)
    pub normalization_epsilon: f32,

    // Output
    /// Collapse chord segments onto the bar grid (default: false)
    pub quantize_bars: bool,

    // Collaborators
    /// Wall-clock limit for each acquisition/extraction call (default: 120 s)
    /// `None` runs collaborators unbounded on the calling thread
    pub extraction_timeout: Option<Duration>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Chords,
            time_signature: TimeSignature::FourFour,
            stay_probability: 0.4,
            change_probability: 0.6,
            normalization_epsilon: DEFAULT_EPSILON,
            quantize_bars: false,
            extraction_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl AnalysisConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for negative or non-finite
    /// transition probabilities, a zero total, or a non-positive epsilon.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let (stay, change) = (self.stay_probability, self.change_probability);
        if !stay.is_finite() || !change.is_finite() || stay < 0.0 || change < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Transition probabilities must be finite and non-negative (stay={}, change={})",
                stay, change
            )));
        }
        if stay + change <= 0.0 {
            return Err(AnalysisError::InvalidInput(
                "stay_probability + change_probability must be positive".to_string(),
            ));
        }
        if self.normalization_epsilon.is_nan() || self.normalization_epsilon <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "normalization_epsilon must be positive, got {}",
                self.normalization_epsilon
            )));
        }
        Ok(())
    }
}

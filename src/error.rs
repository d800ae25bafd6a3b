//! Error types for the chord recognition engine

use std::fmt;

/// Errors that can occur during track analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters (empty matrices, mismatched lengths, bad config)
    InvalidInput(String),

    /// The audio acquisition collaborator failed
    AcquisitionError(String),

    /// The feature extraction collaborator failed
    ExtractionError(String),

    /// A collaborator call exceeded its time bound (message names the stage)
    Timeout(String),

    /// Processing error during analysis
    ProcessingError(String),
}

impl AnalysisError {
    /// Whether the error originated outside the recognition core
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            AnalysisError::AcquisitionError(_)
                | AnalysisError::ExtractionError(_)
                | AnalysisError::Timeout(_)
        )
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::AcquisitionError(msg) => write!(f, "Acquisition error: {}", msg),
            AnalysisError::ExtractionError(msg) => write!(f, "Extraction error: {}", msg),
            AnalysisError::Timeout(stage) => write!(f, "Timed out during {}", stage),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

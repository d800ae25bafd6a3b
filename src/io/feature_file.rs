//! JSON feature files
//!
//! A feature file holds pre-computed features for one track, so the engine can
//! run without an audio front end:
//!
//! ```json
//! {
//!   "tempo_bpm": 120.0,
//!   "duration_seconds": 4.0,
//!   "beat_times": [0.0, 0.5, 1.0],
//!   "chroma": [[...T values...], ...12 rows...],
//!   "bass": {
//!     "sample_rate": 22050,
//!     "hop_length": 512,
//!     "pitches": [[...]],
//!     "magnitudes": [[...]]
//!   }
//! }
//! ```
//!
//! `chroma` and `bass` are each optional; asking for a missing section fails
//! with `AnalysisError::ExtractionError`.

use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::{AudioHandle, AudioSource, BassFeatures, ChordFeatures, FeatureExtractor};
use crate::error::AnalysisError;

/// Bass section of a feature file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BassSection {
    /// Sample rate of the analysed audio
    pub sample_rate: u32,
    /// Hop length in samples
    pub hop_length: usize,
    /// Pitch rows (bins × frames)
    pub pitches: Vec<Vec<f32>>,
    /// Magnitude rows (bins × frames)
    pub magnitudes: Vec<Vec<f32>>,
}

/// Pre-computed features for one track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFile {
    /// Global tempo
    pub tempo_bpm: f32,
    /// Track duration in seconds
    pub duration_seconds: f32,
    /// Beat start times in seconds
    pub beat_times: Vec<f32>,
    /// Chroma rows (12 × T)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chroma: Option<Vec<Vec<f32>>>,
    /// Bass pitch tracking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bass: Option<BassSection>,
}

impl FeatureFile {
    /// Parse a feature file from JSON text
    pub fn from_json(text: &str) -> Result<Self, AnalysisError> {
        serde_json::from_str(text)
            .map_err(|e| AnalysisError::ExtractionError(format!("Malformed feature file: {}", e)))
    }

    /// Read and parse a feature file
    ///
    /// # Errors
    ///
    /// `AcquisitionError` if the file cannot be read, `ExtractionError` if it
    /// does not parse.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let text = fs::read_to_string(path).map_err(|e| {
            AnalysisError::AcquisitionError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Chord-mode features
    pub fn chord_features(&self) -> Result<ChordFeatures, AnalysisError> {
        let rows = self.chroma.as_ref().ok_or_else(|| {
            AnalysisError::ExtractionError("Feature file has no chroma".to_string())
        })?;
        Ok(ChordFeatures {
            chroma: rows_to_array("chroma", rows)?,
            beat_times: self.beat_times.clone(),
            tempo_bpm: self.tempo_bpm,
            duration_seconds: self.duration_seconds,
        })
    }

    /// Bass-mode features
    pub fn bass_features(&self) -> Result<BassFeatures, AnalysisError> {
        let bass = self.bass.as_ref().ok_or_else(|| {
            AnalysisError::ExtractionError("Feature file has no bass section".to_string())
        })?;
        Ok(BassFeatures {
            pitches: rows_to_array("pitches", &bass.pitches)?,
            magnitudes: rows_to_array("magnitudes", &bass.magnitudes)?,
            sample_rate: bass.sample_rate,
            hop_length: bass.hop_length,
            beat_times: self.beat_times.clone(),
            tempo_bpm: self.tempo_bpm,
            duration_seconds: self.duration_seconds,
        })
    }
}

fn rows_to_array(name: &str, rows: &[Vec<f32>]) -> Result<Array2<f32>, AnalysisError> {
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|r| r.len() != n_cols) {
        return Err(AnalysisError::ExtractionError(format!(
            "{} row {} has {} values, expected {}",
            name,
            bad,
            rows[bad].len(),
            n_cols
        )));
    }
    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), n_cols), flat)
        .map_err(|e| AnalysisError::ExtractionError(format!("{}: {}", name, e)))
}

/// Acquisition and extraction backed by feature files on disk
///
/// The locator is the file path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureFiles;

impl AudioSource for FeatureFiles {
    fn acquire(&self, locator: &str) -> Result<AudioHandle, AnalysisError> {
        let path = Path::new(locator);
        if !path.is_file() {
            return Err(AnalysisError::AcquisitionError(format!(
                "No feature file at {}",
                locator
            )));
        }
        log::debug!("Acquired feature file {}", locator);
        Ok(AudioHandle {
            locator: locator.to_string(),
            path: path.to_path_buf(),
            sample_rate: None,
            duration_seconds: None,
        })
    }
}

impl FeatureExtractor for FeatureFiles {
    fn chord_features(&self, audio: &AudioHandle) -> Result<ChordFeatures, AnalysisError> {
        FeatureFile::load(&audio.path)?.chord_features()
    }

    fn bass_features(&self, audio: &AudioHandle) -> Result<BassFeatures, AnalysisError> {
        FeatureFile::load(&audio.path)?.bass_features()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "tempo_bpm": 96.0,
        "duration_seconds": 2.0,
        "beat_times": [0.0, 1.0],
        "chroma": [
            [1, 1], [0, 0], [0, 0], [0, 0], [1, 1], [0, 0],
            [0, 0], [1, 1], [0, 0], [0, 0], [0, 0], [0, 0]
        ],
        "bass": {
            "sample_rate": 100,
            "hop_length": 10,
            "pitches": [[55, 55, 0], [0, 0, 0]],
            "magnitudes": [[1, 1, 0], [0, 0, 0]]
        }
    }"#;

    #[test]
    fn test_parse_chord_features() {
        let file = FeatureFile::from_json(SAMPLE).unwrap();
        let features = file.chord_features().unwrap();
        assert_eq!(features.chroma.dim(), (12, 2));
        assert_eq!(features.chroma[[4, 1]], 1.0);
        assert_eq!(features.beat_times, vec![0.0, 1.0]);
        assert!(features.validate().is_ok());
    }

    #[test]
    fn test_parse_bass_features() {
        let file = FeatureFile::from_json(SAMPLE).unwrap();
        let features = file.bass_features().unwrap();
        assert_eq!(features.pitches.dim(), (2, 3));
        assert_eq!(features.sample_rate, 100);
        assert_eq!(features.hop_length, 10);
    }

    #[test]
    fn test_missing_sections() {
        let file = FeatureFile::from_json(
            r#"{"tempo_bpm": 90.0, "duration_seconds": 1.0, "beat_times": [0.0]}"#,
        )
        .unwrap();
        assert!(matches!(
            file.chord_features(),
            Err(AnalysisError::ExtractionError(_))
        ));
        assert!(matches!(
            file.bass_features(),
            Err(AnalysisError::ExtractionError(_))
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = rows_to_array("chroma", &[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, AnalysisError::ExtractionError(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            FeatureFile::from_json("{not json"),
            Err(AnalysisError::ExtractionError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_acquisition_error() {
        let err = FeatureFiles
            .acquire("/definitely/not/here/track.json")
            .unwrap_err();
        assert!(matches!(err, AnalysisError::AcquisitionError(_)));
    }
}

//! Collaborator interfaces
//!
//! Audio acquisition and signal feature extraction live outside this crate.
//! They plug in through two traits:
//! - [`AudioSource`]: turns a locator (URL, path, ...) into a local [`AudioHandle`]
//! - [`FeatureExtractor`]: computes [`ChordFeatures`] or [`BassFeatures`] for a handle
//!
//! [`feature_file`] provides a JSON-backed implementation of both, and
//! [`run_bounded`] runs a collaborator call under a wall-clock limit.

pub mod feature_file;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use ndarray::Array2;

use crate::error::AnalysisError;
use crate::features::chroma::N_CHROMA;

/// Local audio obtained by an [`AudioSource`]
#[derive(Debug, Clone, PartialEq)]
pub struct AudioHandle {
    /// Locator the handle was acquired from
    pub locator: String,
    /// Local path of the audio (or feature) data
    pub path: PathBuf,
    /// Sample rate in Hz, when known
    pub sample_rate: Option<u32>,
    /// Duration in seconds, when known
    pub duration_seconds: Option<f32>,
}

/// Obtains local audio for a locator
pub trait AudioSource: Send + Sync {
    /// Acquire audio for `locator`
    ///
    /// Failures must be reported as `AnalysisError::AcquisitionError`.
    fn acquire(&self, locator: &str) -> Result<AudioHandle, AnalysisError>;
}

/// Computes signal features for acquired audio
pub trait FeatureExtractor: Send + Sync {
    /// Chroma matrix and beat grid for chord recognition
    fn chord_features(&self, audio: &AudioHandle) -> Result<ChordFeatures, AnalysisError>;

    /// Bass-band pitch tracking and beat grid for bass transcription
    fn bass_features(&self, audio: &AudioHandle) -> Result<BassFeatures, AnalysisError>;
}

/// Beat-synchronous chroma and tempo information
#[derive(Debug, Clone, PartialEq)]
pub struct ChordFeatures {
    /// Chroma matrix, shape (12, T): one column per beat interval
    pub chroma: Array2<f32>,
    /// Beat start times in seconds, length T
    pub beat_times: Vec<f32>,
    /// Global tempo estimate
    pub tempo_bpm: f32,
    /// Track duration in seconds
    pub duration_seconds: f32,
}

impl ChordFeatures {
    /// Check shapes and values before any decoding work
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the chroma does not have 12
    /// rows, has no frames, disagrees with the beat count, or contains
    /// non-finite values.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let (rows, frames) = self.chroma.dim();
        if rows != N_CHROMA {
            return Err(AnalysisError::InvalidInput(format!(
                "Chroma must have {} rows, got {}",
                N_CHROMA, rows
            )));
        }
        if frames == 0 {
            return Err(AnalysisError::InvalidInput(
                "Chroma has no frames".to_string(),
            ));
        }
        if self.beat_times.len() != frames {
            return Err(AnalysisError::InvalidInput(format!(
                "Beat grid has {} beats but chroma has {} frames",
                self.beat_times.len(),
                frames
            )));
        }
        if self.chroma.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidInput(
                "Chroma contains non-finite values".to_string(),
            ));
        }
        validate_beat_grid(&self.beat_times, self.duration_seconds)
    }

    /// Segment boundaries: every beat time followed by the track duration
    pub fn boundaries(&self) -> Vec<f32> {
        let mut boundaries = Vec::with_capacity(self.beat_times.len() + 1);
        boundaries.extend_from_slice(&self.beat_times);
        boundaries.push(self.duration_seconds);
        boundaries
    }
}

/// Bass-band pitch tracking and beat grid
#[derive(Debug, Clone, PartialEq)]
pub struct BassFeatures {
    /// Pitch estimates in Hz, shape (bins, frames); 0 where nothing was tracked
    pub pitches: Array2<f32>,
    /// Magnitudes matching `pitches`
    pub magnitudes: Array2<f32>,
    /// Sample rate of the analysed audio
    pub sample_rate: u32,
    /// Hop length between frames, in samples
    pub hop_length: usize,
    /// Beat start times in seconds
    pub beat_times: Vec<f32>,
    /// Global tempo estimate
    pub tempo_bpm: f32,
    /// Track duration in seconds
    pub duration_seconds: f32,
}

impl BassFeatures {
    /// Check shapes and frame parameters
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the matrices are empty, differ
    /// in shape or hold non-finite values, if there are no beats, or if the
    /// frame rate is undefined.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.pitches.dim() != self.magnitudes.dim() {
            return Err(AnalysisError::InvalidInput(format!(
                "Pitch matrix {:?} and magnitude matrix {:?} differ in shape",
                self.pitches.dim(),
                self.magnitudes.dim()
            )));
        }
        if self.magnitudes.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "Bass pitch tracking has no frames".to_string(),
            ));
        }
        if self.beat_times.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "Bass mode requires at least one beat".to_string(),
            ));
        }
        if self.sample_rate == 0 || self.hop_length == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid frame parameters (sample_rate={}, hop_length={})",
                self.sample_rate, self.hop_length
            )));
        }
        if self.pitches.iter().chain(self.magnitudes.iter()).any(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidInput(
                "Bass pitch tracking contains non-finite values".to_string(),
            ));
        }
        validate_beat_grid(&self.beat_times, self.duration_seconds)
    }

    /// Frame index containing time `t`: `floor(t * sample_rate / hop_length)`
    pub fn time_to_frame(&self, t: f32) -> usize {
        let frame = (t as f64 * self.sample_rate as f64 / self.hop_length as f64).floor();
        frame.max(0.0) as usize
    }
}

/// Beat times must be finite, non-decreasing and end no later than the track
fn validate_beat_grid(beat_times: &[f32], duration_seconds: f32) -> Result<(), AnalysisError> {
    if beat_times.iter().any(|t| !t.is_finite()) || !duration_seconds.is_finite() {
        return Err(AnalysisError::InvalidInput(
            "Beat grid contains non-finite times".to_string(),
        ));
    }
    if let Some(i) = beat_times.windows(2).position(|w| w[1] < w[0]) {
        return Err(AnalysisError::InvalidInput(format!(
            "Beat times decrease at index {} ({} -> {})",
            i + 1,
            beat_times[i],
            beat_times[i + 1]
        )));
    }
    if let Some(&last) = beat_times.last() {
        if duration_seconds < last {
            return Err(AnalysisError::InvalidInput(format!(
                "Duration {} ends before the last beat at {}",
                duration_seconds, last
            )));
        }
    }
    Ok(())
}

/// Run a collaborator call on a worker thread, giving up after `limit`
///
/// With no limit the call runs on the current thread. On timeout the worker
/// is detached and its eventual result discarded.
///
/// # Errors
///
/// Returns `AnalysisError::Timeout` naming `stage` when the limit elapses, or
/// `AnalysisError::ProcessingError` if the worker dies without answering.
/// Errors from `task` itself pass through unchanged.
pub fn run_bounded<T, F>(stage: &str, limit: Option<Duration>, task: F) -> Result<T, AnalysisError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AnalysisError> + Send + 'static,
{
    let Some(limit) = limit else {
        return task();
    };

    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::Builder::new()
        .name(format!("chordgrid-{}", stage))
        .spawn(move || {
            // Receiver may already be gone after a timeout
            let _ = tx.send(task());
        })
        .map_err(|e| AnalysisError::ProcessingError(format!("Failed to spawn {} worker: {}", stage, e)))?;

    match rx.recv_timeout(limit) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            log::warn!("{} exceeded {:?}", stage, limit);
            Err(AnalysisError::Timeout(format!("{} (limit {:?})", stage, limit)))
        }
        Err(RecvTimeoutError::Disconnected) => Err(AnalysisError::ProcessingError(format!(
            "{} worker exited without a result",
            stage
        ))),
    }
}

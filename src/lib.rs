//! # chordgrid
//!
//! Chord and bass-tab recognition over pre-extracted audio features.
//!
//! ## Features
//!
//! - **Chord Recognition**: Cosine matching against 60 chord templates, smoothed with Viterbi decoding
//! - **Key Detection**: Krumhansl-Kessler profile correlation over the mean chroma vector
//! - **Bar Grid**: Segment quantization for 4/4, 3/4 and 6/8
//! - **Bass Tablature**: Per-beat bass pitch tracking mapped onto a 4-string bass
//!
//! ## Quick Start
//!
//! ```
//! use chordgrid::{analyze_chords, AnalysisConfig};
//! use chordgrid::io::ChordFeatures;
//! use ndarray::Array2;
//!
//! // Eight beats of a C major triad
//! let mut chroma = Array2::<f32>::zeros((12, 8));
//! for t in 0..8 {
//!     for pc in [0, 4, 7] {
//!         chroma[[pc, t]] = 1.0;
//!     }
//! }
//! let features = ChordFeatures {
//!     chroma,
//!     beat_times: (0..8).map(|i| i as f32 * 0.5).collect(),
//!     tempo_bpm: 120.0,
//!     duration_seconds: 4.0,
//! };
//!
//! let result = analyze_chords("demo", &features, &AnalysisConfig::default())?;
//! let segments = result.segments.as_chords().unwrap();
//! assert_eq!(segments.len(), 1);
//! assert_eq!(segments[0].chord, "C");
//! # Ok::<(), chordgrid::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Acquisition → Feature Extraction → Key / Match Cost → Viterbi → Segments (→ Bars)
//!                                  → Bass Notes → Tablature → Bass Bars
//! ```
//!
//! Acquisition and feature extraction are collaborators behind the traits in [`io`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

// Re-export main types
pub use analysis::result::{
    AnalysisMode, AnalysisResult, BassBar, BassNote, ChordSegment, KeyEstimate, KeyMode, Segments,
    TabPosition,
};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::beat_tracking::time_signature::TimeSignature;

use features::bass::{extract_bass_notes, tab_bars};
use features::beat_tracking::quantize_to_bars;
use features::chord::{cost_matrix, segment_labels, ChordTemplates, ViterbiSmoother};
use features::chroma::normalization::normalize_columns_sum;
use features::key::estimate_key;
use io::{run_bounded, AudioSource, BassFeatures, ChordFeatures, FeatureExtractor};

/// Chord-mode pipeline over extracted features
///
/// Estimates the key, matches every frame against the chord templates,
/// smooths the labels with Viterbi decoding and merges them into segments.
/// With `config.quantize_bars` the segments are collapsed onto the bar grid.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for malformed features or config;
/// nothing is decoded in that case.
pub fn analyze_chords(
    source: &str,
    features: &ChordFeatures,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let start_time = Instant::now();
    config.validate()?;
    features.validate()?;

    log::debug!(
        "Analyzing chords for {}: {} frames, {:.1} BPM",
        source,
        features.beat_times.len(),
        features.tempo_bpm
    );

    let chroma = normalize_columns_sum(&features.chroma, config.normalization_epsilon);
    let key = estimate_key(&chroma)?;

    let templates = ChordTemplates::shared();
    let costs = cost_matrix(&chroma, templates, config.normalization_epsilon)?;
    let path = ViterbiSmoother::new(config.stay_probability, config.change_probability)
        .decode(&costs)?;
    let labels: Vec<&str> = path.iter().map(|&state| templates.label(state)).collect();

    let mut segments = segment_labels(&labels, &features.boundaries())?;
    if config.quantize_bars {
        segments = quantize_to_bars(&segments, &features.beat_times, config.time_signature);
    }

    log::info!(
        "{}: key {}, {} chord segments in {:.1} ms",
        source,
        key.name(),
        segments.len(),
        start_time.elapsed().as_secs_f32() * 1000.0
    );

    Ok(AnalysisResult {
        source: source.to_string(),
        title: None,
        bpm: features.tempo_bpm,
        key: Some(key),
        time_signature: config.time_signature,
        mode: AnalysisMode::Chords,
        segments: Segments::Chords(segments),
    })
}

/// Bass-mode pipeline over extracted features
///
/// One note per beat, grouped into bars of `beats_per_bar` notes, each note
/// paired with its tab position. No key is estimated.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for malformed features or config.
pub fn analyze_bass(
    source: &str,
    features: &BassFeatures,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let start_time = Instant::now();
    config.validate()?;

    let notes = extract_bass_notes(features)?;
    let bars = tab_bars(&notes, config.time_signature);

    log::info!(
        "{}: {} bass notes in {} bars ({:.1} ms)",
        source,
        notes.len(),
        bars.len(),
        start_time.elapsed().as_secs_f32() * 1000.0
    );

    Ok(AnalysisResult {
        source: source.to_string(),
        title: None,
        bpm: features.tempo_bpm,
        key: None,
        time_signature: config.time_signature,
        mode: AnalysisMode::Bass,
        segments: Segments::Bass(bars),
    })
}

/// Full request: acquire, extract features for `config.mode`, analyze
///
/// Each collaborator call is bounded by `config.extraction_timeout`.
///
/// # Errors
///
/// Collaborator failures propagate unchanged (`AcquisitionError`,
/// `ExtractionError`, `Timeout`); no partial result is returned.
pub fn analyze_track(
    locator: &str,
    source: Arc<dyn AudioSource>,
    extractor: Arc<dyn FeatureExtractor>,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;
    let limit = config.extraction_timeout;

    let owned_locator = locator.to_string();
    let audio = run_bounded("acquisition", limit, move || source.acquire(&owned_locator))?;
    log::debug!("Acquired {} at {}", locator, audio.path.display());

    match config.mode {
        AnalysisMode::Chords => {
            let features = run_bounded("chord feature extraction", limit, move || {
                extractor.chord_features(&audio)
            })?;
            analyze_chords(locator, &features, config)
        }
        AnalysisMode::Bass => {
            let features = run_bounded("bass feature extraction", limit, move || {
                extractor.bass_features(&audio)
            })?;
            analyze_bass(locator, &features, config)
        }
    }
}

/// Analyze many tracks in parallel
///
/// Returns one result per locator, in input order; a failing track does not
/// affect the others.
pub fn analyze_batch<S>(
    locators: &[S],
    source: Arc<dyn AudioSource>,
    extractor: Arc<dyn FeatureExtractor>,
    config: &AnalysisConfig,
) -> Vec<Result<AnalysisResult, AnalysisError>>
where
    S: AsRef<str> + Sync,
{
    log::debug!("Analyzing batch of {} tracks", locators.len());
    locators
        .par_iter()
        .map(|locator| {
            let result = analyze_track(
                locator.as_ref(),
                Arc::clone(&source),
                Arc::clone(&extractor),
                config,
            );
            if let Err(e) = &result {
                log::warn!("{} failed: {}", locator.as_ref(), e);
            }
            result
        })
        .collect()
}

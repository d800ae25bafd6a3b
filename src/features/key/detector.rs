//! Key detection algorithm
//!
//! Correlates the mean chroma vector of a track against the 24 rotated
//! Krumhansl-Kessler profiles and picks the best match.
//!
//! # Reference
//!
//! Krumhansl, C. L., & Kessler, E. J. (1982). Tracing the Dynamic Changes in Perceived
//! Tonal Organization in a Spatial Representation of Musical Keys. *Psychological Review*,
//! 89(4), 334-368.

use ndarray::{Array2, Axis};

use super::{templates::KeyTemplates, KeyDetectionResult};
use crate::analysis::result::{KeyEstimate, KeyMode};
use crate::error::AnalysisError;
use crate::features::chroma::N_CHROMA;
use crate::features::pitch::PitchClass;

/// Detect the global key of a chroma matrix
///
/// Averages chroma across frames, computes the Pearson correlation with each
/// of the 24 key templates, and selects the best tonic per mode. Major wins
/// when the best major correlation is at least the best minor one; within a
/// mode the lowest tonic index wins ties.
///
/// # Arguments
///
/// * `chroma` - Chroma matrix, shape (12, T)
/// * `templates` - Key templates (Krumhansl-Kessler profiles)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the matrix has no frames or does
/// not have 12 rows.
///
/// # Example
///
/// ```
/// use chordgrid::features::key::{detect_key, KeyTemplates};
/// use ndarray::Array2;
///
/// let mut chroma = Array2::<f32>::zeros((12, 4));
/// for t in 0..4 {
///     chroma[[0, t]] = 1.0; // C
///     chroma[[4, t]] = 0.8; // E
///     chroma[[7, t]] = 0.9; // G
/// }
/// let result = detect_key(&chroma, &KeyTemplates::new())?;
/// assert_eq!(result.key.name(), "C");
/// # Ok::<(), chordgrid::AnalysisError>(())
/// ```
pub fn detect_key(
    chroma: &Array2<f32>,
    templates: &KeyTemplates,
) -> Result<KeyDetectionResult, AnalysisError> {
    let (bins, frames) = chroma.dim();
    log::debug!("Detecting key from {} chroma frames", frames);

    if bins != N_CHROMA {
        return Err(AnalysisError::InvalidInput(format!(
            "Chroma matrix must have {} rows, got {}",
            N_CHROMA, bins
        )));
    }
    let mean = chroma
        .mean_axis(Axis(1))
        .ok_or_else(|| AnalysisError::InvalidInput("Empty chroma matrix".to_string()))?;
    let mean: Vec<f32> = mean.to_vec();

    let major: Vec<f32> = (0..N_CHROMA)
        .map(|k| pearson(&mean, templates.get_major_template(k)))
        .collect();
    let minor: Vec<f32> = (0..N_CHROMA)
        .map(|k| pearson(&mean, templates.get_minor_template(k)))
        .collect();

    let (major_tonic, major_best) = first_max(&major);
    let (minor_tonic, minor_best) = first_max(&minor);

    let (key, correlation) = if major_best >= minor_best {
        (KeyEstimate::new(PitchClass::new(major_tonic), KeyMode::Major), major_best)
    } else {
        (KeyEstimate::new(PitchClass::new(minor_tonic), KeyMode::Minor), minor_best)
    };

    let mut all_scores: Vec<(KeyEstimate, f32)> = Vec::with_capacity(2 * N_CHROMA);
    for (k, &score) in major.iter().enumerate() {
        all_scores.push((KeyEstimate::new(PitchClass::new(k), KeyMode::Major), score));
    }
    for (k, &score) in minor.iter().enumerate() {
        all_scores.push((KeyEstimate::new(PitchClass::new(k), KeyMode::Minor), score));
    }
    // Stable sort keeps majors ahead of equally scored minors
    all_scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    log::debug!("Detected key: {}, correlation: {:.4}", key.name(), correlation);

    Ok(KeyDetectionResult {
        key,
        correlation,
        all_scores,
    })
}

/// Detect the key with the default Krumhansl-Kessler templates
pub fn estimate_key(chroma: &Array2<f32>) -> Result<KeyEstimate, AnalysisError> {
    detect_key(chroma, &KeyTemplates::new()).map(|result| result.key)
}

/// Pearson correlation; 0 when either input has no variance
fn pearson(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let mean_a = a.iter().map(|&x| x as f64).sum::<f64>() / n as f64;
    let mean_b = b.iter().map(|&x| x as f64).sum::<f64>() / n as f64;

    let mut cov = 0.0f64;
    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x as f64 - mean_a;
        let dy = y as f64 - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom < 1e-12 {
        0.0
    } else {
        (cov / denom) as f32
    }
}

/// Index and value of the first maximum
fn first_max(values: &[f32]) -> (usize, f32) {
    let mut best = (0usize, f32::NEG_INFINITY);
    for (i, &v) in values.iter().enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}

//! Frame-to-template matching cost
//!
//! Cosine distance between a chroma frame and each chord template:
//! `cost[i] = 1 - <frame / |frame|, template_i / |template_i|>`.
//! Identical direction costs 0, opposite costs 2. A silent (zero) frame
//! costs exactly 1 against every template.

use ndarray::{Array1, Array2, ArrayView1};

use super::templates::ChordTemplates;
use crate::error::AnalysisError;
use crate::features::chroma::normalization::{l2_normalize, normalize_columns_l2};
use crate::features::chroma::N_CHROMA;

/// Cost vector (length 60) for a single chroma frame
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the frame does not have 12 bins.
pub fn frame_cost(
    frame: ArrayView1<f32>,
    templates: &ChordTemplates,
    epsilon: f32,
) -> Result<Array1<f32>, AnalysisError> {
    if frame.len() != N_CHROMA {
        return Err(AnalysisError::InvalidInput(format!(
            "Chroma frame must have {} bins, got {}",
            N_CHROMA,
            frame.len()
        )));
    }

    let v = l2_normalize(frame, epsilon);
    let similarity = templates.normalized().dot(&v);
    Ok(similarity.mapv(|s| (1.0 - s).clamp(0.0, 2.0)))
}

/// Cost matrix for a whole chroma matrix
///
/// # Arguments
///
/// * `chroma` - Chroma matrix, shape (12, T), one column per frame
/// * `templates` - Chord template library
/// * `epsilon` - Guard for the frame norm
///
/// # Returns
///
/// Cost matrix of shape (T, 60)
pub fn cost_matrix(
    chroma: &Array2<f32>,
    templates: &ChordTemplates,
    epsilon: f32,
) -> Result<Array2<f32>, AnalysisError> {
    let (bins, frames) = chroma.dim();
    if bins != N_CHROMA {
        return Err(AnalysisError::InvalidInput(format!(
            "Chroma matrix must have {} rows, got {}",
            N_CHROMA, bins
        )));
    }
    if frames == 0 {
        return Err(AnalysisError::InvalidInput(
            "Chroma matrix has no frames".to_string(),
        ));
    }

    log::debug!("Computing match costs for {} frames", frames);

    // (T, 12) · (12, 60) → (T, 60)
    let frames_norm = normalize_columns_l2(chroma, epsilon);
    let similarity = frames_norm.t().dot(&templates.normalized().t());
    Ok(similarity.mapv(|s| (1.0 - s).clamp(0.0, 2.0)))
}

//! Frame-label segmentation
//!
//! Collapses a per-frame label sequence into contiguous, time-stamped chord
//! segments. Frame `i` spans `[boundaries[i], boundaries[i + 1])`, so the
//! boundary array carries one more entry than there are labels (the final
//! entry is the track duration).

use crate::analysis::result::ChordSegment;
use crate::error::AnalysisError;

/// Merge consecutive identical labels into segments
///
/// # Arguments
///
/// * `labels` - One label per frame (length T ≥ 1)
/// * `boundaries` - Frame start times plus the end time (length T + 1)
///
/// # Returns
///
/// Segments covering `[boundaries[0], boundaries[T])` with no gaps, no overlaps
/// and no two neighbours sharing a label
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `labels` is empty or the boundary
/// count is not `labels.len() + 1`.
pub fn segment_labels<S: AsRef<str>>(
    labels: &[S],
    boundaries: &[f32],
) -> Result<Vec<ChordSegment>, AnalysisError> {
    if labels.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Cannot segment an empty label sequence".to_string(),
        ));
    }
    if boundaries.len() != labels.len() + 1 {
        return Err(AnalysisError::InvalidInput(format!(
            "Expected {} boundary times for {} frames, got {}",
            labels.len() + 1,
            labels.len(),
            boundaries.len()
        )));
    }

    let mut segments = Vec::new();
    let mut current = labels[0].as_ref();
    let mut start = boundaries[0];

    for (i, label) in labels.iter().enumerate().skip(1) {
        let label = label.as_ref();
        if label != current {
            segments.push(ChordSegment::new(start, boundaries[i], current));
            current = label;
            start = boundaries[i];
        }
    }
    segments.push(ChordSegment::new(start, boundaries[labels.len()], current));

    log::debug!(
        "Segmented {} frames into {} chord segments",
        labels.len(),
        segments.len()
    );

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_repeats() {
        let labels = ["C", "C", "G", "G", "G", "Am"];
        let bounds = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.2];
        let segs = segment_labels(&labels, &bounds).unwrap();

        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0], ChordSegment::new(0.0, 1.0, "C"));
        assert_eq!(segs[1], ChordSegment::new(1.0, 2.5, "G"));
        assert_eq!(segs[2], ChordSegment::new(2.5, 3.2, "Am"));
    }

    #[test]
    fn test_partition_properties() {
        let labels = ["F", "F", "C", "F", "Dm", "Dm", "Dm", "Bb", "F"];
        let bounds: Vec<f32> = (0..=labels.len()).map(|i| i as f32 * 0.47 + 0.1).collect();
        let segs = segment_labels(&labels, &bounds).unwrap();

        assert_eq!(segs.first().unwrap().start, bounds[0]);
        assert_eq!(segs.last().unwrap().end, *bounds.last().unwrap());
        for pair in segs.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "no gaps or overlaps");
            assert_ne!(pair[0].chord, pair[1].chord, "neighbours differ");
        }
    }

    #[test]
    fn test_single_frame() {
        let segs = segment_labels(&["Em7".to_string()], &[1.0, 1.5]).unwrap();
        assert_eq!(segs, vec![ChordSegment::new(1.0, 1.5, "Em7")]);
    }

    #[test]
    fn test_invalid_lengths() {
        let empty: [&str; 0] = [];
        assert!(segment_labels(&empty, &[0.0]).is_err());
        assert!(segment_labels(&["C", "G"], &[0.0, 1.0]).is_err());
        assert!(segment_labels(&["C", "G"], &[0.0, 1.0, 2.0, 3.0]).is_err());
    }
}

//! Bar quantization
//!
//! Re-aggregates chord segments onto a metrical grid: every `beats_per_bar`-th
//! beat starts a bar, and each bar takes the chord that overlaps it longest.

use std::cmp::Ordering;

use super::time_signature::TimeSignature;
use crate::analysis::result::{Bar, ChordSegment, NO_CHORD};

/// Bar edge times for a beat grid
///
/// Takes every `beats_per_bar`-th beat and closes the grid with the last beat
/// when it falls after the final edge.
///
/// # Returns
///
/// `None` when there are fewer than `beats_per_bar + 1` beats (no full bar).
pub fn bar_edges(beats: &[f32], time_signature: TimeSignature) -> Option<Vec<f32>> {
    let beats_per_bar = time_signature.beats_per_bar();
    if beats.len() < beats_per_bar + 1 {
        return None;
    }

    let mut edges: Vec<f32> = beats.iter().step_by(beats_per_bar).copied().collect();
    if let (Some(&last_edge), Some(&last_beat)) = (edges.last(), beats.last()) {
        if last_edge < last_beat {
            edges.push(last_beat);
        }
    }
    Some(edges)
}

/// Quantize chord segments onto bars
///
/// Each bar `[edge_b, edge_b+1)` is labelled with the segment of greatest
/// overlap `max(0, min(end) - max(start))`. Segments are scanned in ascending
/// start time (stable for equal starts) and the first maximum wins, so the
/// result does not depend on the caller's ordering. A bar no segment touches is
/// labelled `"N"`.
///
/// # Arguments
///
/// * `segments` - Chord segments
/// * `beats` - Beat times in seconds (sorted)
/// * `time_signature` - Meter used to group beats
///
/// # Returns
///
/// Contiguous bars covering the beat grid, or the input segments unchanged
/// when the grid cannot form a single full bar
pub fn quantize_to_bars(
    segments: &[ChordSegment],
    beats: &[f32],
    time_signature: TimeSignature,
) -> Vec<Bar> {
    let edges = match bar_edges(beats, time_signature) {
        Some(edges) => edges,
        None => {
            log::debug!(
                "Only {} beats for {} bars, keeping raw segments",
                beats.len(),
                time_signature.name()
            );
            return segments.to_vec();
        }
    };

    let mut ordered: Vec<&ChordSegment> = segments.iter().collect();
    ordered.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));

    let bars: Vec<Bar> = edges
        .windows(2)
        .map(|edge| {
            let (start, end) = (edge[0], edge[1]);
            let mut best = NO_CHORD;
            let mut best_overlap = 0.0f32;
            for seg in &ordered {
                let overlap = (end.min(seg.end) - start.max(seg.start)).max(0.0);
                if overlap > best_overlap {
                    best_overlap = overlap;
                    best = seg.chord.as_str();
                }
            }
            Bar::new(start, end, best)
        })
        .collect();

    log::debug!(
        "Quantized {} segments into {} bars of {}",
        segments.len(),
        bars.len(),
        time_signature.name()
    );

    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beats(n: usize, interval: f32) -> Vec<f32> {
        (0..n).map(|i| i as f32 * interval).collect()
    }

    #[test]
    fn test_too_few_beats_returns_segments() {
        let segs = vec![ChordSegment::new(0.0, 2.0, "C")];
        let bars = quantize_to_bars(&segs, &beats(4, 0.5), TimeSignature::FourFour);
        assert_eq!(bars, segs);
    }

    #[test]
    fn test_edges_exact_grid() {
        let edges = bar_edges(&beats(9, 0.5), TimeSignature::FourFour).unwrap();
        assert_eq!(edges, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_edges_closed_with_last_beat() {
        let edges = bar_edges(&beats(10, 0.5), TimeSignature::FourFour).unwrap();
        assert_eq!(edges, vec![0.0, 2.0, 4.0, 4.5]);

        let edges = bar_edges(&beats(8, 0.5), TimeSignature::ThreeFour).unwrap();
        assert_eq!(edges, vec![0.0, 1.5, 3.0, 3.5]);

        let edges = bar_edges(&beats(13, 0.25), TimeSignature::SixEight).unwrap();
        assert_eq!(edges, vec![0.0, 1.5, 3.0]);
    }

    #[test]
    fn test_majority_overlap_wins() {
        let segs = vec![
            ChordSegment::new(0.0, 1.2, "C"),
            ChordSegment::new(1.2, 2.9, "G"),
            ChordSegment::new(2.9, 4.5, "Am"),
        ];
        let bars = quantize_to_bars(&segs, &beats(10, 0.5), TimeSignature::FourFour);
        let labels: Vec<&str> = bars.iter().map(|b| b.chord.as_str()).collect();
        assert_eq!(labels, vec!["C", "Am", "Am"]);
    }

    #[test]
    fn test_uncovered_bar_is_no_chord() {
        let segs = vec![ChordSegment::new(0.0, 1.0, "F")];
        let bars = quantize_to_bars(&segs, &beats(9, 0.5), TimeSignature::FourFour);
        assert_eq!(bars[0].chord, "F");
        assert_eq!(bars[1].chord, NO_CHORD);
    }

    #[test]
    fn test_tie_prefers_earlier_segment_regardless_of_input_order() {
        let forward = vec![
            ChordSegment::new(0.0, 1.0, "D"),
            ChordSegment::new(1.0, 2.0, "E"),
        ];
        let reversed: Vec<ChordSegment> = forward.iter().rev().cloned().collect();

        let a = quantize_to_bars(&forward, &beats(5, 0.5), TimeSignature::FourFour);
        let b = quantize_to_bars(&reversed, &beats(5, 0.5), TimeSignature::FourFour);
        assert_eq!(a[0].chord, "D");
        assert_eq!(a, b);
    }

    #[test]
    fn test_bars_contiguous_and_cover_grid() {
        let segs = vec![
            ChordSegment::new(0.0, 3.3, "Em"),
            ChordSegment::new(3.3, 7.9, "C"),
        ];
        let grid: Vec<f32> = (0..23).map(|i| 0.2 + i as f32 * 0.37).collect();
        for sig in [
            TimeSignature::FourFour,
            TimeSignature::ThreeFour,
            TimeSignature::SixEight,
        ] {
            let bars = quantize_to_bars(&segs, &grid, sig);
            for pair in bars.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert!(pair[0].start < pair[0].end);
            }
            let total: f32 = bars.iter().map(|b| b.duration()).sum();
            let span = grid[grid.len() - 1] - grid[0];
            assert!((total - span).abs() < 1e-4, "{}: {} vs {}", sig, total, span);
        }
    }
}

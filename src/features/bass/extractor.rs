//! Bass note extraction
//!
//! Picks one dominant low-frequency pitch per beat from an externally tracked
//! pitch/magnitude matrix (bins × frames, already restricted to the bass band).

use ndarray::s;

use crate::analysis::result::BassNote;
use crate::error::AnalysisError;
use crate::io::BassFeatures;

/// Extract one bass note per beat interval
///
/// Beat `i` covers `[beat[i], beat[i + 1])`; the last beat runs to the track
/// duration. Within each interval the (bin, frame) cell of greatest magnitude
/// is located (first in bin-major order on ties) and its pitch is read. A
/// pitch ≤ 0 (or one that rounds below MIDI 1), or an interval that spans no
/// frames, yields an unvoiced note. Non-finite input is rejected up front.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the matrices are empty, differ in
/// shape or hold non-finite values, or if there are no beats.
pub fn extract_bass_notes(features: &BassFeatures) -> Result<Vec<BassNote>, AnalysisError> {
    features.validate()?;

    let n_frames = features.magnitudes.ncols();
    let beats = &features.beat_times;
    log::debug!(
        "Extracting bass notes for {} beats over {} frames",
        beats.len(),
        n_frames
    );

    let mut notes = Vec::with_capacity(beats.len());
    for (i, &start) in beats.iter().enumerate() {
        let end = beats.get(i + 1).copied().unwrap_or(features.duration_seconds);
        let start_frame = features.time_to_frame(start).min(n_frames);
        let end_frame = match beats.get(i + 1) {
            Some(&next) => features.time_to_frame(next).min(n_frames),
            None => n_frames,
        };

        if start_frame >= end_frame {
            notes.push(BassNote::unvoiced(start, end));
            continue;
        }

        let window = features.magnitudes.slice(s![.., start_frame..end_frame]);
        let mut peak = (0usize, 0usize);
        let mut peak_magnitude = f32::NEG_INFINITY;
        for ((bin, col), &magnitude) in window.indexed_iter() {
            if magnitude > peak_magnitude {
                peak_magnitude = magnitude;
                peak = (bin, col);
            }
        }

        let pitch = features.pitches[[peak.0, start_frame + peak.1]];
        if pitch > 0.0 {
            notes.push(BassNote::from_pitch(start, end, pitch));
        } else {
            notes.push(BassNote::unvoiced(start, end));
        }
    }

    let voiced = notes.iter().filter(|n| n.is_voiced()).count();
    log::debug!("Extracted {} bass notes ({} voiced)", notes.len(), voiced);

    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// 4 bins × 40 frames at 10 frames per second, beats every 0.5 s
    fn features_with_peak(pitch_hz: f32) -> BassFeatures {
        let mut pitches = Array2::<f32>::zeros((4, 40));
        let mut magnitudes = Array2::<f32>::from_elem((4, 40), 0.01);
        for frame in 0..40 {
            if frame % 5 == 2 {
                pitches[[1, frame]] = pitch_hz;
                magnitudes[[1, frame]] = 1.0;
            }
        }
        BassFeatures {
            pitches,
            magnitudes,
            sample_rate: 1000,
            hop_length: 100,
            beat_times: (0..8).map(|i| i as f32 * 0.5).collect(),
            tempo_bpm: 120.0,
            duration_seconds: 4.0,
        }
    }

    #[test]
    fn test_single_peak_every_beat() {
        let notes = extract_bass_notes(&features_with_peak(55.0)).unwrap();
        assert_eq!(notes.len(), 8);
        for (i, note) in notes.iter().enumerate() {
            assert_eq!(note.midi_note, 33);
            assert_eq!(note.note_name, "A1");
            assert!((note.pitch_hz - 55.0).abs() < 1e-4);
            assert!((note.start - i as f32 * 0.5).abs() < 1e-6);
        }
        assert_eq!(notes.last().unwrap().end, 4.0);
    }

    #[test]
    fn test_octave_up() {
        let notes = extract_bass_notes(&features_with_peak(110.0)).unwrap();
        assert!(notes.iter().all(|n| n.midi_note == 45 && n.note_name == "A2"));
    }

    #[test]
    fn test_no_pitch_is_unvoiced() {
        let notes = extract_bass_notes(&features_with_peak(0.0)).unwrap();
        for note in &notes {
            assert_eq!(note.midi_note, 0);
            assert_eq!(note.pitch_hz, 0.0);
            assert_eq!(note.note_name, "N");
        }
    }

    #[test]
    fn test_subsonic_pitch_is_unvoiced() {
        // 8 Hz rounds to MIDI 0, 5 Hz to MIDI -9
        for hz in [8.0, 5.0] {
            let notes = extract_bass_notes(&features_with_peak(hz)).unwrap();
            assert!(notes
                .iter()
                .all(|n| n.midi_note == 0 && n.note_name == "N" && !n.is_voiced()));
        }
    }

    #[test]
    fn test_beats_past_last_frame_are_unvoiced() {
        let mut features = features_with_peak(82.41);
        features.beat_times.push(4.5);
        features.duration_seconds = 5.0;
        let notes = extract_bass_notes(&features).unwrap();
        assert_eq!(notes.len(), 9);
        assert_eq!(notes[0].midi_note, 40);
        assert!(!notes[8].is_voiced());
        assert_eq!(notes[8].end, 5.0);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut features = features_with_peak(55.0);
        features.beat_times.clear();
        assert!(extract_bass_notes(&features).is_err());

        let mut features = features_with_peak(55.0);
        features.magnitudes = Array2::zeros((4, 39));
        assert!(extract_bass_notes(&features).is_err());

        let mut features = features_with_peak(f32::INFINITY);
        assert!(matches!(
            extract_bass_notes(&features),
            Err(AnalysisError::InvalidInput(_))
        ));

        features = features_with_peak(55.0);
        features.magnitudes[[1, 2]] = f32::NAN;
        assert!(matches!(
            extract_bass_notes(&features),
            Err(AnalysisError::InvalidInput(_))
        ));

        let mut features = features_with_peak(55.0);
        features.pitches = Array2::zeros((4, 0));
        features.magnitudes = Array2::zeros((4, 0));
        assert!(extract_bass_notes(&features).is_err());
    }
}

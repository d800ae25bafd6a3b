//! Bass tablature mapping
//!
//! Maps MIDI notes onto a 4-string bass in standard tuning (E1 A1 D2 G2).
//! Strings are numbered from the lowest: 1 = E, 2 = A, 3 = D, 4 = G.

use crate::analysis::result::{BassBar, BassNote, TabPosition};
use crate::features::beat_tracking::time_signature::TimeSignature;

/// Open-string MIDI notes, lowest string first
pub const BASS_STRINGS: [(&str, i32); 4] = [("E", 28), ("A", 33), ("D", 38), ("G", 43)];

/// Usable frets per string (0..=19)
pub const FRET_SPAN: i32 = 20;

/// Display text for an unvoiced position
pub const UNVOICED_TAB: &str = "—";

/// Map a MIDI note to a string and fret
///
/// Strings are tried from G down to E; the first whose range
/// `open ≤ note < open + 20` contains the note wins, which keeps notes in the
/// lowest fret positions. Notes below the E string land on string 1 with a
/// negative fret, notes above every range on string 4 with a high fret.
/// MIDI 0 (unvoiced) maps to string 0, fret -1.
pub fn note_to_tab(midi_note: i32) -> TabPosition {
    if midi_note <= 0 {
        return TabPosition {
            string: 0,
            fret: -1,
            display: UNVOICED_TAB.to_string(),
        };
    }

    let found = BASS_STRINGS
        .iter()
        .enumerate()
        .rev()
        .find(|(_, string)| string.1 <= midi_note && midi_note < string.1 + FRET_SPAN);

    let (index, (name, open)) = match found {
        Some((index, &string)) => (index, string),
        None if midi_note < BASS_STRINGS[0].1 => (0, BASS_STRINGS[0]),
        None => (BASS_STRINGS.len() - 1, BASS_STRINGS[BASS_STRINGS.len() - 1]),
    };

    let fret = midi_note - open;
    TabPosition {
        string: index as u8 + 1,
        fret,
        display: format!("{}{}", name, fret),
    }
}

/// Group per-beat notes into bars and attach tab positions
///
/// Bars hold `beats_per_bar` consecutive notes; the final bar may be shorter.
pub fn tab_bars(notes: &[BassNote], time_signature: TimeSignature) -> Vec<BassBar> {
    notes
        .chunks(time_signature.beats_per_bar())
        .filter_map(|chunk| {
            let (first, last) = (chunk.first()?, chunk.last()?);
            Some(BassBar {
                start: first.start,
                end: last.end,
                notes: chunk.to_vec(),
                tabs: chunk.iter().map(|n| note_to_tab(n.midi_note)).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(string: u8, fret: i32, display: &str) -> TabPosition {
        TabPosition {
            string,
            fret,
            display: display.to_string(),
        }
    }

    #[test]
    fn test_open_strings() {
        assert_eq!(note_to_tab(28), tab(1, 0, "E0"));
        assert_eq!(note_to_tab(33), tab(2, 0, "A0"));
        assert_eq!(note_to_tab(38), tab(3, 0, "D0"));
        assert_eq!(note_to_tab(43), tab(4, 0, "G0"));
    }

    #[test]
    fn test_prefers_highest_string_in_range() {
        assert_eq!(note_to_tab(45), tab(4, 2, "G2"));
        assert_eq!(note_to_tab(42), tab(3, 4, "D4"));
        assert_eq!(note_to_tab(31), tab(1, 3, "E3"));
        assert_eq!(note_to_tab(62), tab(4, 19, "G19"));
    }

    #[test]
    fn test_unvoiced() {
        assert_eq!(note_to_tab(0), tab(0, -1, "—"));
    }

    #[test]
    fn test_out_of_range_fallbacks() {
        assert_eq!(note_to_tab(20), tab(1, -8, "E-8"));
        assert_eq!(note_to_tab(63), tab(4, 20, "G20"));
        assert_eq!(note_to_tab(70), tab(4, 27, "G27"));
    }

    #[test]
    fn test_tab_bars_grouping() {
        let notes: Vec<BassNote> = (0..10)
            .map(|i| BassNote::from_pitch(i as f32 * 0.5, (i + 1) as f32 * 0.5, 55.0))
            .collect();

        let bars = tab_bars(&notes, TimeSignature::FourFour);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].notes.len(), 4);
        assert_eq!(bars[2].notes.len(), 2);
        assert_eq!(bars[1].start, 2.0);
        assert_eq!(bars[1].end, 4.0);
        assert_eq!(bars[2].end, 5.0);
        assert!(bars.iter().all(|b| b.tabs.len() == b.notes.len()));
        assert_eq!(bars[0].tabs[0], tab(2, 0, "A0"));

        let bars = tab_bars(&notes, TimeSignature::SixEight);
        assert_eq!(bars.len(), 2);
    }
}

//! Bass tracking modules
//!
//! Per-beat bass note selection and 4-string tablature:
//! - Dominant pitch per beat from a pitch/magnitude matrix
//! - MIDI note to string/fret mapping
//! - Grouping notes into bars

pub mod extractor;
pub mod tablature;

pub use extractor::extract_bass_notes;
pub use tablature::{note_to_tab, tab_bars};

//! Result types and presentation helpers
//!
//! - Result types (segments, bars, bass notes, key estimate)
//! - Nashville number rendering

pub mod nashville;
pub mod result;

//! Beat grid modules
//!
//! Group an externally tracked beat grid into bars:
//! - Time signature parsing
//! - Bar quantization of chord segments

pub mod bars;
pub mod time_signature;

pub use bars::{bar_edges, quantize_to_bars};
pub use time_signature::TimeSignature;

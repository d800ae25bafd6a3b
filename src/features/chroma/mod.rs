//! Chroma matrix utilities
//!
//! The chroma matrix itself is computed upstream (12 × frames, beat-synchronized);
//! this module only holds the normalization steps applied before matching.

pub mod normalization;

/// Number of pitch classes per chroma frame
pub const N_CHROMA: usize = 12;

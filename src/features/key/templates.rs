//! Krumhansl-Kessler key templates
//!
//! Defines tonal profiles for 24 keys (12 major + 12 minor). Each key's
//! template is the C-rooted profile rotated so its first weight lands on the tonic.

use crate::features::chroma::N_CHROMA;

/// Krumhansl-Kessler major profile, tonic at index 0
pub const KK_MAJOR_PROFILE: [f32; N_CHROMA] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// Krumhansl-Kessler minor profile, tonic at index 0
pub const KK_MINOR_PROFILE: [f32; N_CHROMA] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Key templates for all 24 keys
#[derive(Debug, Clone)]
pub struct KeyTemplates {
    /// Major key templates (12 keys: C, C#, D, ..., B)
    pub major: [[f32; N_CHROMA]; N_CHROMA],

    /// Minor key templates (12 keys: C, C#, D, ..., B)
    pub minor: [[f32; N_CHROMA]; N_CHROMA],
}

impl KeyTemplates {
    /// Create new key templates with Krumhansl-Kessler profiles
    pub fn new() -> Self {
        Self::from_profiles(&KK_MAJOR_PROFILE, &KK_MINOR_PROFILE)
    }

    /// Build templates from arbitrary C-rooted major and minor profiles
    pub fn from_profiles(major: &[f32; N_CHROMA], minor: &[f32; N_CHROMA]) -> Self {
        Self {
            major: std::array::from_fn(|tonic| rotate(major, tonic)),
            minor: std::array::from_fn(|tonic| rotate(minor, tonic)),
        }
    }

    /// Major template for tonic `key_idx` (0 = C)
    pub fn get_major_template(&self, key_idx: usize) -> &[f32; N_CHROMA] {
        &self.major[key_idx % N_CHROMA]
    }

    /// Minor template for tonic `key_idx` (0 = C)
    pub fn get_minor_template(&self, key_idx: usize) -> &[f32; N_CHROMA] {
        &self.minor[key_idx % N_CHROMA]
    }
}

impl Default for KeyTemplates {
    fn default() -> Self {
        Self::new()
    }
}

/// Circular shift right by `shift` (element 0 moves to index `shift`)
fn rotate(profile: &[f32; N_CHROMA], shift: usize) -> [f32; N_CHROMA] {
    std::array::from_fn(|i| profile[(i + N_CHROMA - shift % N_CHROMA) % N_CHROMA])
}

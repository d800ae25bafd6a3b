//! Time signatures
//!
//! The caller chooses the meter; only 4/4, 3/4 and 6/8 are recognised and
//! any other label falls back to 4/4 rather than failing.
//!
//! # Example
//!
//! ```
//! use chordgrid::features::beat_tracking::time_signature::TimeSignature;
//!
//! assert_eq!(TimeSignature::from_label("3/4").beats_per_bar(), 3);
//! assert_eq!(TimeSignature::from_label("7/8"), TimeSignature::FourFour);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Musical time signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeSignature {
    /// 4/4 time (common time)
    #[default]
    FourFour,
    /// 3/4 time (waltz time)
    ThreeFour,
    /// 6/8 time (compound duple)
    SixEight,
}

impl TimeSignature {
    /// Get beats per bar for this time signature
    pub fn beats_per_bar(&self) -> usize {
        match self {
            TimeSignature::FourFour => 4,
            TimeSignature::ThreeFour => 3,
            TimeSignature::SixEight => 6,
        }
    }

    /// Get name as string (e.g., "4/4", "3/4", "6/8")
    pub fn name(&self) -> &'static str {
        match self {
            TimeSignature::FourFour => "4/4",
            TimeSignature::ThreeFour => "3/4",
            TimeSignature::SixEight => "6/8",
        }
    }

    /// Parse a label, falling back to 4/4 for anything unrecognised
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "4/4" => TimeSignature::FourFour,
            "3/4" => TimeSignature::ThreeFour,
            "6/8" => TimeSignature::SixEight,
            other => {
                log::warn!("Unsupported time signature '{}', using 4/4", other);
                TimeSignature::FourFour
            }
        }
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TimeSignature {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TimeSignature::from_label(s))
    }
}

impl Serialize for TimeSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TimeSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(TimeSignature::from_label(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_signature_beats_per_bar() {
        assert_eq!(TimeSignature::FourFour.beats_per_bar(), 4);
        assert_eq!(TimeSignature::ThreeFour.beats_per_bar(), 3);
        assert_eq!(TimeSignature::SixEight.beats_per_bar(), 6);
    }

    #[test]
    fn test_time_signature_name() {
        assert_eq!(TimeSignature::FourFour.name(), "4/4");
        assert_eq!(TimeSignature::ThreeFour.name(), "3/4");
        assert_eq!(TimeSignature::SixEight.name(), "6/8");
    }

    #[test]
    fn test_unknown_label_falls_back() {
        assert_eq!(TimeSignature::from_label("5/4"), TimeSignature::FourFour);
        assert_eq!(TimeSignature::from_label(""), TimeSignature::FourFour);
        assert_eq!(TimeSignature::from_label(" 6/8 "), TimeSignature::SixEight);
        assert_eq!("3/4".parse::<TimeSignature>(), Ok(TimeSignature::ThreeFour));
    }

    #[test]
    fn test_serde_as_label() {
        let json = serde_json::to_string(&TimeSignature::SixEight).unwrap();
        assert_eq!(json, "\"6/8\"");
        let sig: TimeSignature = serde_json::from_str("\"12/8\"").unwrap();
        assert_eq!(sig, TimeSignature::FourFour);
    }
}

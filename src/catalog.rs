//! Static crop and fertilizer tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Crop {
    Wheat,
    Corn,
    Sunflower,
    Soybean,
}

impl Crop {
    pub const ALL: [Crop; 4] = [Crop::Wheat, Crop::Corn, Crop::Sunflower, Crop::Soybean];

    /// Projected harvest in tons per hectare.
    pub fn yield_per_ha(self) -> f64 {
        match self {
            Crop::Wheat => 6.86,
            Crop::Corn => 11.7,
            Crop::Sunflower => 3.43,
            Crop::Soybean => 3.65,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Crop::Wheat => "Wheat",
            Crop::Corn => "Corn",
            Crop::Sunflower => "Sunflower",
            Crop::Soybean => "Soybean",
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Crop {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Crop::ALL
            .into_iter()
            .find(|crop| crop.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownIdentifier::crop(trimmed))
    }
}

/// Yield for a crop given by name; unknown names project nothing.
pub fn yield_for_crop_name(name: &str) -> f64 {
    name.parse::<Crop>().map(Crop::yield_per_ha).unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fertilizer {
    Nitrogen,
    Phosphorus,
    Potassium,
    Complex,
}

impl Fertilizer {
    pub const ALL: [Fertilizer; 4] = [
        Fertilizer::Nitrogen,
        Fertilizer::Phosphorus,
        Fertilizer::Potassium,
        Fertilizer::Complex,
    ];

    /// Fractional yield boost applied on top of the crop baseline.
    pub fn effect(self) -> f64 {
        match self {
            Fertilizer::Nitrogen => 0.10,
            Fertilizer::Phosphorus => 0.15,
            Fertilizer::Potassium => 0.20,
            Fertilizer::Complex => 0.30,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Fertilizer::Nitrogen => "nitrogen",
            Fertilizer::Phosphorus => "phosphorus",
            Fertilizer::Potassium => "potassium",
            Fertilizer::Complex => "complex",
        }
    }
}

impl fmt::Display for Fertilizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Fertilizer {
    type Err = UnknownIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Fertilizer::ALL
            .into_iter()
            .find(|fertilizer| fertilizer.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownIdentifier::fertilizer(trimmed))
    }
}

/// Effect for a fertilizer given by identifier; unknown identifiers add nothing.
pub fn effect_for_fertilizer_id(id: &str) -> f64 {
    id.parse::<Fertilizer>()
        .map(Fertilizer::effect)
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownIdentifier {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownIdentifier {
    fn crop(value: &str) -> Self {
        Self {
            kind: "crop",
            value: value.to_string(),
        }
    }

    fn fertilizer(value: &str) -> Self {
        Self {
            kind: "fertilizer",
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_names_parse_case_insensitively() {
        assert_eq!("corn".parse::<Crop>(), Ok(Crop::Corn));
        assert_eq!(" Soybean ".parse::<Crop>(), Ok(Crop::Soybean));
        let err = "Rice".parse::<Crop>().unwrap_err();
        assert_eq!(err.to_string(), "unknown crop 'Rice'");
    }

    #[test]
    fn unknown_names_fall_back_to_zero() {
        assert_eq!(yield_for_crop_name("Barley"), 0.0);
        assert_eq!(yield_for_crop_name("Wheat"), 6.86);
        assert_eq!(effect_for_fertilizer_id("manure"), 0.0);
        assert_eq!(effect_for_fertilizer_id("complex"), 0.30);
    }

    #[test]
    fn fertilizers_serialize_as_lowercase_ids() {
        let json = serde_json::to_string(&Fertilizer::Potassium).unwrap();
        assert_eq!(json, "\"potassium\"");
        let parsed: Fertilizer = serde_json::from_str("\"nitrogen\"").unwrap();
        assert_eq!(parsed, Fertilizer::Nitrogen);
    }

    #[test]
    fn every_effect_is_non_negative() {
        assert!(Fertilizer::ALL.iter().all(|f| f.effect() >= 0.0));
        assert!(Crop::ALL.iter().all(|c| c.yield_per_ha() >= 0.0));
    }
}

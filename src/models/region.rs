//! Region transcripts
//!
//! Text cropped from one semantic area of a label, keyed by the field it
//! is believed to contain.

use serde::{Deserialize, Serialize};

use crate::source::Detection;

/// Semantic label region supplied by the layout detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionField {
    ServingSize,
    ServingsPerPack,
    Sugar,
}

impl RegionField {
    pub const ALL: [RegionField; 3] = [
        RegionField::ServingSize,
        RegionField::ServingsPerPack,
        RegionField::Sugar,
    ];

    /// Key used in region maps and responses
    pub fn key(&self) -> &'static str {
        match self {
            RegionField::ServingSize => "serving_size",
            RegionField::ServingsPerPack => "servings_per_pack",
            RegionField::Sugar => "sugar",
        }
    }

    /// Class name the layout detector emits for this region
    pub fn detector_class(&self) -> &'static str {
        match self {
            RegionField::ServingSize => "takaran_saji",
            RegionField::ServingsPerPack => "sajian_per_kemasan",
            RegionField::Sugar => "gula",
        }
    }

    /// Fraction of the box size added around the crop so digits at the
    /// edge are not cut off
    pub fn crop_padding(&self) -> f64 {
        match self {
            RegionField::ServingSize => 0.4,
            RegionField::ServingsPerPack => 0.25,
            RegionField::Sugar => 0.4,
        }
    }

    /// Parse either a map key or a detector class name
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.key() == lower || f.detector_class() == lower)
    }
}

/// Optional per-field transcripts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTexts {
    pub serving_size: Option<String>,
    pub servings_per_pack: Option<String>,
    pub sugar: Option<String>,
}

impl RegionTexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, field: RegionField, text: impl Into<String>) -> Self {
        self.set(field, text);
        self
    }

    pub fn set(&mut self, field: RegionField, text: impl Into<String>) {
        let slot = match field {
            RegionField::ServingSize => &mut self.serving_size,
            RegionField::ServingsPerPack => &mut self.servings_per_pack,
            RegionField::Sugar => &mut self.sugar,
        };
        *slot = Some(text.into());
    }

    /// Region text for a field, treating blank text as absent
    pub fn get(&self, field: RegionField) -> Option<&str> {
        let slot = match field {
            RegionField::ServingSize => &self.serving_size,
            RegionField::ServingsPerPack => &self.servings_per_pack,
            RegionField::Sugar => &self.sugar,
        };
        slot.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        RegionField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

/// Raw output of one recognizer on the union crop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineText {
    pub engine: String,
    pub text: String,
}

/// Everything a text source produces for one image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelTranscripts {
    pub global: String,
    pub regions: RegionTexts,
    /// Every recognizer's reading of the union crop, in try order
    #[serde(default)]
    pub engine_texts: Vec<EngineText>,
    /// Boxes reported by the layout detector
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl LabelTranscripts {
    /// True when neither the global nor any region transcript has text
    pub fn is_blank(&self) -> bool {
        self.global.trim().is_empty() && self.regions.is_empty()
    }
}

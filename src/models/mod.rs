//! Data models
//!
//! Records passed between the text source, the extractor and the tools.

mod record;
mod region;

pub use record::{FieldSource, NutritionRecord, Provenance};
pub use region::{EngineText, LabelTranscripts, RegionField, RegionTexts};

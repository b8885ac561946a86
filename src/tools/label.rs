//! Label Scan Tools
//!
//! Turns an extraction into the caller-facing response: absent fields are
//! replaced by policy defaults, sugar is derived in whichever direction is
//! missing and gram values are rounded.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::PresentationPolicy;
use crate::models::{EngineText, LabelTranscripts, Provenance, RegionTexts};
use crate::nutrition::{normalize, Extraction, Extractor};
use crate::source::{Detection, SourceError, TextSource};

/// Label scan error types
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("could not extract any text")]
    NoText,

    #[error("Text source error: {0}")]
    Source(#[from] SourceError),
}

/// Response for scan_label_text
#[derive(Debug, Clone, Serialize)]
pub struct LabelScanResponse {
    pub product_name: Option<String>,
    pub raw_text: String,
    pub serving_size_gram: f64,
    pub servings_per_pack: u32,
    pub sugar_per_serving_gram: f64,
    pub sugar_per_pack_gram: f64,
    pub provenance: Provenance,
    pub debug: LabelDebug,
}

/// What the scan was computed from
#[derive(Debug, Clone, Default, Serialize)]
pub struct LabelDebug {
    /// Region transcripts as received
    #[serde(flatten)]
    pub regions: RegionTexts,
    /// Each engine's reading of the whole label
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub engine_texts: Vec<EngineText>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub detections: Vec<Detection>,
}

impl LabelDebug {
    pub fn from_transcripts(transcripts: &LabelTranscripts) -> Self {
        Self {
            regions: transcripts.regions.clone(),
            engine_texts: transcripts.engine_texts.clone(),
            detections: transcripts.detections.clone(),
        }
    }
}

impl LabelScanResponse {
    /// Apply the presentation policy to an extraction
    pub fn from_extraction(
        extraction: &Extraction,
        policy: &PresentationPolicy,
        debug: LabelDebug,
    ) -> Self {
        let record = &extraction.record;

        let servings = record
            .servings_per_pack
            .filter(|s| *s > 0)
            .unwrap_or(policy.default_servings_per_pack);
        let servings_f = f64::from(servings);

        let mut per_serving = record.sugar_per_serving_grams;
        let mut per_pack = record.sugar_per_pack_grams;
        if per_serving.is_none() {
            per_serving = per_pack.map(|pack| pack / servings_f);
        }
        if per_pack.is_none() {
            per_pack = per_serving.map(|serving| serving * servings_f);
        }

        Self {
            product_name: record.product_name.clone(),
            raw_text: record.raw_text.clone(),
            serving_size_gram: round_to(
                record.serving_size_grams.unwrap_or(policy.default_serving_size),
                policy.decimals,
            ),
            servings_per_pack: servings,
            sugar_per_serving_gram: round_to(per_serving.unwrap_or(0.0), policy.decimals),
            sugar_per_pack_gram: round_to(per_pack.unwrap_or(0.0), policy.decimals),
            provenance: extraction.provenance.clone(),
            debug,
        }
    }
}

/// Response for normalize_label_text
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeResponse {
    pub normalized: String,
    pub lines: Vec<String>,
}

/// Extract and present nutrition facts from transcripts
pub fn scan_label_text(
    extractor: &Extractor,
    policy: &PresentationPolicy,
    transcripts: &LabelTranscripts,
) -> Result<LabelScanResponse, LabelError> {
    if transcripts.is_blank() {
        return Err(LabelError::NoText);
    }

    let extraction = extractor.extract(&transcripts.global, &transcripts.regions);
    let response = LabelScanResponse::from_extraction(
        &extraction,
        policy,
        LabelDebug::from_transcripts(transcripts),
    );

    info!(
        serving_size = response.serving_size_gram,
        servings = response.servings_per_pack,
        sugar_per_serving = response.sugar_per_serving_gram,
        sugar_per_pack = response.sugar_per_pack_gram,
        "label scanned"
    );
    Ok(response)
}

/// Read transcripts for an image from a text source, then scan them
pub fn scan_label_image(
    source: &dyn TextSource,
    extractor: &Extractor,
    policy: &PresentationPolicy,
    image: &[u8],
) -> Result<LabelScanResponse, LabelError> {
    let transcripts = source.transcripts(image)?;
    scan_label_text(extractor, policy, &transcripts)
}

/// Normalized form of a transcript, as the extractor sees it
pub fn normalize_label_text(text: &str) -> NormalizeResponse {
    let normalized = normalize(text);
    let lines = normalized.lines().map(str::to_string).collect();
    NormalizeResponse { normalized, lines }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldSource, NutritionRecord, RegionField};

    fn extraction(record: NutritionRecord) -> Extraction {
        Extraction {
            record,
            provenance: Provenance::default(),
        }
    }

    fn transcripts(global: &str) -> LabelTranscripts {
        LabelTranscripts {
            global: global.to_string(),
            ..LabelTranscripts::default()
        }
    }

    struct FixedSource(LabelTranscripts);

    impl TextSource for FixedSource {
        fn transcripts(&self, _image: &[u8]) -> Result<LabelTranscripts, SourceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_defaults_for_absent_fields() {
        let response = LabelScanResponse::from_extraction(
            &extraction(NutritionRecord::empty("x")),
            &PresentationPolicy::default(),
            LabelDebug::default(),
        );
        assert_eq!(response.serving_size_gram, 0.0);
        assert_eq!(response.servings_per_pack, 1);
        assert_eq!(response.sugar_per_serving_gram, 0.0);
        assert_eq!(response.sugar_per_pack_gram, 0.0);
        assert!(response.product_name.is_none());
    }

    #[test]
    fn test_zero_servings_replaced() {
        let record = NutritionRecord {
            servings_per_pack: Some(0),
            sugar_per_serving_grams: Some(4.0),
            ..NutritionRecord::default()
        };
        let response = LabelScanResponse::from_extraction(
            &extraction(record),
            &PresentationPolicy::default(),
            LabelDebug::default(),
        );
        assert_eq!(response.servings_per_pack, 1);
        assert_eq!(response.sugar_per_pack_gram, 4.0);
    }

    #[test]
    fn test_per_serving_derived_from_per_pack() {
        let record = NutritionRecord {
            servings_per_pack: Some(3),
            sugar_per_pack_grams: Some(10.0),
            ..NutritionRecord::default()
        };
        let response = LabelScanResponse::from_extraction(
            &extraction(record),
            &PresentationPolicy::default(),
            LabelDebug::default(),
        );
        assert_eq!(response.sugar_per_serving_gram, 3.33);
        assert_eq!(response.sugar_per_pack_gram, 10.0);
    }

    #[test]
    fn test_rounding_follows_policy() {
        let record = NutritionRecord {
            serving_size_grams: Some(12.3456),
            ..NutritionRecord::default()
        };
        let policy = PresentationPolicy {
            decimals: 1,
            ..PresentationPolicy::default()
        };
        let response =
            LabelScanResponse::from_extraction(&extraction(record), &policy, LabelDebug::default());
        assert_eq!(response.serving_size_gram, 12.3);
    }

    #[test]
    fn test_scan_label_text() {
        let response = scan_label_text(
            &Extractor::default(),
            &PresentationPolicy::default(),
            &transcripts("Serving size 30 g\nServings per pack 3\nSugar total 12 g per serving"),
        )
        .unwrap();
        assert_eq!(response.serving_size_gram, 30.0);
        assert_eq!(response.servings_per_pack, 3);
        assert_eq!(response.sugar_per_serving_gram, 12.0);
        assert_eq!(response.sugar_per_pack_gram, 36.0);
        assert_eq!(response.provenance.sugar_per_pack, FieldSource::Derived);
    }

    #[test]
    fn test_blank_input_is_no_text() {
        let result = scan_label_text(
            &Extractor::default(),
            &PresentationPolicy::default(),
            &transcripts("  \n"),
        );
        assert!(matches!(result, Err(LabelError::NoText)));
    }

    #[test]
    fn test_region_only_input_is_scanned() {
        let transcripts = LabelTranscripts {
            global: String::new(),
            regions: RegionTexts::new().with(RegionField::ServingSize, "Takaran saji 15 g"),
            ..LabelTranscripts::default()
        };
        let response =
            scan_label_text(&Extractor::default(), &PresentationPolicy::default(), &transcripts)
                .unwrap();
        assert_eq!(response.serving_size_gram, 15.0);
        assert_eq!(response.debug.regions.serving_size.as_deref(), Some("Takaran saji 15 g"));
    }

    #[test]
    fn test_scan_label_image() {
        let source = FixedSource(transcripts("Takaran saji 20 g\n2 sajian per kemasan"));
        let response = scan_label_image(
            &source,
            &Extractor::default(),
            &PresentationPolicy::default(),
            b"image",
        )
        .unwrap();
        assert_eq!(response.serving_size_gram, 20.0);
        assert_eq!(response.servings_per_pack, 2);
    }

    #[test]
    fn test_debug_carries_engines_and_detections() {
        let transcripts = LabelTranscripts {
            global: "Takaran saji 20 g".to_string(),
            regions: RegionTexts::new().with(RegionField::Sugar, "Gula 4 g"),
            engine_texts: vec![EngineText {
                engine: "paddle".to_string(),
                text: "Takaran saji 20 g".to_string(),
            }],
            detections: vec![Detection {
                class: "gula".to_string(),
                confidence: 0.9,
                x: 10.0,
                y: 10.0,
                width: 4.0,
                height: 4.0,
            }],
        };
        let response =
            scan_label_text(&Extractor::default(), &PresentationPolicy::default(), &transcripts)
                .unwrap();
        assert_eq!(response.debug.engine_texts, transcripts.engine_texts);
        assert_eq!(response.debug.detections, transcripts.detections);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["debug"]["sugar"], "Gula 4 g");
        assert_eq!(json["debug"]["detections"][0]["class"], "gula");
        assert_eq!(json["debug"]["engine_texts"][0]["engine"], "paddle");
    }

    #[test]
    fn test_debug_omits_empty_lists() {
        let response = scan_label_text(
            &Extractor::default(),
            &PresentationPolicy::default(),
            &transcripts("Takaran saji 20 g"),
        )
        .unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["debug"].get("detections").is_none());
        assert!(json["debug"].get("engine_texts").is_none());
    }

    #[test]
    fn test_normalize_label_text() {
        let response = normalize_label_text("Takaran Saji 209\nGula 5 9");
        assert_eq!(response.normalized, "takaran saji 20 g\ngula 5 g");
        assert_eq!(response.lines.len(), 2);
    }
}

//! Label text sources
//!
//! The layout detector and the OCR engines are external collaborators; this
//! module only defines their interfaces and composes them into the global and
//! per-region transcripts the extractor consumes.

pub mod crop;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{EngineText, LabelTranscripts, RegionField, RegionTexts};

pub use crop::{crop_detection, crop_union, CropError, PixelRect};

/// Text source error types
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Region detection failed: {0}")]
    Detection(String),

    #[error("Text recognition failed in {engine}: {message}")]
    Recognition { engine: String, message: String },

    #[error("Crop error: {0}")]
    Crop(#[from] CropError),
}

/// One box reported by the layout detector, centre-based in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class: String,
    #[serde(default)]
    pub confidence: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Detection {
    /// Pixel rectangle of this box grown by `pad`, clamped to the image
    pub fn rect(&self, pad: f64, image_width: u32, image_height: u32) -> Option<PixelRect> {
        PixelRect::from_center(
            self.x,
            self.y,
            self.width,
            self.height,
            pad,
            image_width,
            image_height,
        )
    }
}

/// Highest-confidence detection of a class
pub fn best_detection<'a>(detections: &'a [Detection], class: &str) -> Option<&'a Detection> {
    detections
        .iter()
        .filter(|d| d.class == class)
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
}

/// Locates label regions in an image
pub trait RegionDetector: Send + Sync {
    fn detect(&self, image: &[u8]) -> Result<Vec<Detection>, SourceError>;
}

/// Turns an image into text
pub trait Recognizer: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &str;

    fn recognize(&self, image: &[u8]) -> Result<String, SourceError>;
}

/// Produces the transcripts for one label image
pub trait TextSource: Send + Sync {
    fn transcripts(&self, image: &[u8]) -> Result<LabelTranscripts, SourceError>;
}

/// Detect regions, crop them and run the recognizers over each crop
pub struct CroppingTextSource {
    detector: Box<dyn RegionDetector>,
    recognizers: Vec<Box<dyn Recognizer>>,
}

impl CroppingTextSource {
    pub fn new(detector: Box<dyn RegionDetector>) -> Self {
        Self {
            detector,
            recognizers: Vec::new(),
        }
    }

    /// Add a recognizer; earlier recognizers are tried first
    pub fn with_recognizer(mut self, recognizer: Box<dyn Recognizer>) -> Self {
        self.recognizers.push(recognizer);
        self
    }

    /// Every recognizer's reading of `image`; failed engines are skipped
    fn recognize_all(&self, image: &[u8]) -> Vec<EngineText> {
        self.recognizers
            .iter()
            .filter_map(|recognizer| match recognizer.recognize(image) {
                Ok(text) => Some(EngineText {
                    engine: recognizer.name().to_string(),
                    text,
                }),
                Err(e) => {
                    warn!(engine = recognizer.name(), error = %e, "recognizer failed");
                    None
                }
            })
            .collect()
    }

    /// Text from the first recognizer that returns any
    fn recognize_first(&self, image: &[u8]) -> String {
        for recognizer in &self.recognizers {
            match recognizer.recognize(image) {
                Ok(text) if !text.trim().is_empty() => return text,
                Ok(_) => debug!(engine = recognizer.name(), "recognizer returned no text"),
                Err(e) => warn!(engine = recognizer.name(), error = %e, "recognizer failed"),
            }
        }
        String::new()
    }
}

impl TextSource for CroppingTextSource {
    fn transcripts(&self, image: &[u8]) -> Result<LabelTranscripts, SourceError> {
        let detections = self.detector.detect(image)?;
        debug!(count = detections.len(), "regions detected");

        let union = crop_union(image, &detections).unwrap_or_else(|e| {
            warn!(error = %e, "union crop failed, using full image");
            image.to_vec()
        });
        let engine_texts = self.recognize_all(&union);
        let global = engine_texts
            .iter()
            .find(|e| !e.text.trim().is_empty())
            .map(|e| e.text.clone())
            .unwrap_or_default();

        let mut regions = RegionTexts::new();
        for field in RegionField::ALL {
            let Some(detection) = best_detection(&detections, field.detector_class()) else {
                continue;
            };
            let text = match crop_detection(image, detection, field.crop_padding()) {
                Ok(crop) => self.recognize_first(&crop),
                Err(e) => {
                    warn!(region = field.key(), error = %e, "region crop failed");
                    String::new()
                }
            };
            regions.set(field, text);
        }

        Ok(LabelTranscripts {
            global,
            regions,
            engine_texts,
            detections,
        })
    }
}

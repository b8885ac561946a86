//! Label region cropping
//!
//! Detector boxes are centre-based (`x`, `y` are the box centre). Crops are
//! re-encoded as JPEG for the recognizers.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use super::Detection;

/// Crop error types
#[derive(Debug, Error)]
pub enum CropError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Crop region is empty")]
    EmptyRegion,
}

/// Pixel rectangle, end coordinates exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl PixelRect {
    /// Rectangle of a centre-based box grown by `pad` of its size, clamped to the image
    pub fn from_center(
        cx: f64,
        cy: f64,
        width: f64,
        height: f64,
        pad: f64,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        if image_width == 0 || image_height == 0 {
            return None;
        }
        let w = width * (1.0 + pad);
        let h = height * (1.0 + pad);
        let max_x = f64::from(image_width - 1);
        let max_y = f64::from(image_height - 1);

        let x1 = (cx - w / 2.0).trunc().clamp(0.0, max_x) as u32;
        let y1 = (cy - h / 2.0).trunc().clamp(0.0, max_y) as u32;
        let x2 = (cx + w / 2.0).trunc().clamp(0.0, max_x) as u32;
        let y2 = (cy + h / 2.0).trunc().clamp(0.0, max_y) as u32;

        let rect = Self { x1, y1, x2, y2 };
        (!rect.is_empty()).then_some(rect)
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &PixelRect) -> PixelRect {
        PixelRect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }
}

/// Crop one detection, padded by `pad` of its size
pub fn crop_detection(image_bytes: &[u8], detection: &Detection, pad: f64) -> Result<Vec<u8>, CropError> {
    let img = image::load_from_memory(image_bytes)?;
    let rect = detection
        .rect(pad, img.width(), img.height())
        .ok_or(CropError::EmptyRegion)?;
    encode_crop(&img, rect)
}

/// Crop the union of all detections; with no detections the image is returned as is
pub fn crop_union(image_bytes: &[u8], detections: &[Detection]) -> Result<Vec<u8>, CropError> {
    if detections.is_empty() {
        return Ok(image_bytes.to_vec());
    }
    let img = image::load_from_memory(image_bytes)?;
    let union = detections
        .iter()
        .filter_map(|d| d.rect(0.0, img.width(), img.height()))
        .reduce(|acc, r| acc.union(&r));

    match union {
        Some(rect) => encode_crop(&img, rect),
        None => Ok(image_bytes.to_vec()),
    }
}

fn encode_crop(img: &DynamicImage, rect: PixelRect) -> Result<Vec<u8>, CropError> {
    if rect.is_empty() {
        return Err(CropError::EmptyRegion);
    }
    let cropped = img.crop_imm(rect.x1, rect.y1, rect.width(), rect.height());
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(cropped.to_rgb8());
    let mut buf = Cursor::new(Vec::new());
    rgb.write_to(&mut buf, ImageFormat::Jpeg)?;
    Ok(buf.into_inner())
}

/// Portrait conversion module
///
/// This module handles:
/// - Decoding JPEG/PNG buffers, honoring EXIF orientation (exif.rs)
/// - Cropping to portrait aspect and adjusting exposure (transform.rs)
/// - Encoding the result as PNG
///
/// It is the single function the conversion worker invokes; the UI never
/// calls into it directly.

pub mod exif;
pub mod transform;

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;

/// All parameters of the portrait conversion
///
/// These values control the crop and the exposure lift applied after it.
/// They are serialized to JSON for the startup log line.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PortraitParams {
    /// Crop aspect ratio, width / height
    pub aspect_ratio: f32,
    /// Horizontal crop anchor, 0.0 (left edge) to 1.0 (right edge)
    pub focus_x: f32,
    /// Vertical crop anchor, 0.0 (top edge) to 1.0 (bottom edge).
    /// Portraits keep the subject above center.
    pub focus_y: f32,
    /// Brightness change in percent (-100.0 to +100.0)
    pub brightness: f32,
    /// Contrast change in percent (-100.0 to +100.0)
    pub contrast: f32,
    /// Gamma correction; values above 1.0 lift the midtones
    pub gamma: f32,
}

impl Default for PortraitParams {
    fn default() -> Self {
        Self {
            aspect_ratio: 3.0 / 4.0,
            focus_x: 0.5,
            focus_y: 0.4,
            brightness: 0.0,
            contrast: 5.0,
            gamma: 1.4,
        }
    }
}

impl PortraitParams {
    /// Create default portrait parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert to JSON string for logging
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Why a conversion failed
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("could not decode image: {0}")]
    Decode(image::ImageError),
    #[error("could not encode to png: {0}")]
    Encode(image::ImageError),
}

/// Convert one encoded JPEG/PNG buffer into a PNG-encoded portrait
pub fn portrait(bytes: &[u8], params: &PortraitParams) -> Result<Vec<u8>, ConvertError> {
    let decoded = image::load_from_memory(bytes).map_err(ConvertError::Decode)?;

    // A missing or unreadable orientation tag is not an error; the image
    // is used as decoded
    let oriented = match exif::orientation(bytes) {
        Some(orientation) => exif::apply_orientation(decoded, orientation),
        None => decoded,
    };

    let cropped = transform::crop_portrait(
        &oriented,
        params.aspect_ratio,
        params.focus_x,
        params.focus_y,
    );
    let adjusted = transform::adjust(cropped, params.brightness, params.contrast, params.gamma);

    let mut out = Cursor::new(Vec::new());
    adjusted
        .write_to(&mut out, ImageFormat::Png)
        .map_err(ConvertError::Encode)?;

    Ok(out.into_inner())
}

//! Aspect-ratio classification of a video stream.
//!
//! The orientation only ever becomes the leading segment of a storage path;
//! it is never persisted as structured metadata.

use serde::Serialize;
use std::fmt;

use super::media::MediaError;

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;

/// Absorbs encoder rounding (e.g. 1366x768, 854x480).
const RATIO_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    /// Path prefix used when composing storage keys.
    pub fn as_prefix(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_prefix())
    }
}

/// Classify pixel dimensions as landscape (16:9), portrait (9:16) or other.
///
/// Zero dimensions are an error, never an `Other` classification.
pub fn classify(width: u32, height: u32) -> Result<Orientation, MediaError> {
    if width == 0 || height == 0 {
        return Err(MediaError::InvalidDimensions { width, height });
    }

    let ratio = f64::from(width) / f64::from(height);
    if (ratio - LANDSCAPE_RATIO).abs() < RATIO_TOLERANCE {
        Ok(Orientation::Landscape)
    } else if (ratio - PORTRAIT_RATIO).abs() < RATIO_TOLERANCE {
        Ok(Orientation::Portrait)
    } else {
        Ok(Orientation::Other)
    }
}

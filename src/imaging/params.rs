//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the batch loop in [`process`](crate::process) (which
//! decides what to cut) and the [`backend`](super::backend) (which does the
//! actual pixel work), so a mock codec can stand in during tests.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 90). Clamped on construction.
//! - [`CropParams`]: Full specification for one crop: source bytes, pixel region, quality.

use super::calculations::PixelRegion;

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    /// Build from a fraction in `(0, 1]`, the scale browsers use for
    /// `toBlob`-style encoders. Returns `None` outside that range.
    pub fn from_fraction(fraction: f64) -> Option<Self> {
        if fraction.is_finite() && fraction > 0.0 && fraction <= 1.0 {
            Some(Self::new((fraction * 100.0).round() as u32))
        } else {
            None
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for a crop + re-encode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CropParams<'a> {
    /// Encoded source image.
    pub source: &'a [u8],
    pub region: PixelRegion,
    pub quality: Quality,
}

//! Pure calculation functions for crop geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid dimensions: {width}x{height} with target ratio {ratio}")]
    InvalidDimensions { width: f64, height: f64, ratio: f64 },
}

/// Crop rectangle in source-pixel coordinates.
///
/// Fractional values are kept as computed; [`CropRect::to_pixel_region`]
/// turns them into the integer rectangle cut from the decoded pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Convert to whole pixels inside a `source_width` x `source_height` image.
    ///
    /// Offsets round to the nearest pixel; the size is rounded and then
    /// clamped to what remains of the source past the offset, never below 1.
    pub fn to_pixel_region(&self, source_width: u32, source_height: u32) -> PixelRegion {
        let x = (self.x.round().max(0.0) as u32).min(source_width.saturating_sub(1));
        let y = (self.y.round().max(0.0) as u32).min(source_height.saturating_sub(1));
        let width = (self.width.round() as u32).clamp(1, (source_width - x).max(1));
        let height = (self.height.round() as u32).clamp(1, (source_height - y).max(1));
        PixelRegion {
            x,
            y,
            width,
            height,
        }
    }
}

/// Integer crop region actually applied to the decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute the largest centered crop of a source image matching `target_ratio`.
///
/// The constrained axis is kept whole: a source wider than the target keeps
/// its full height and loses columns on both sides; a taller (or equal)
/// source keeps its full width and loses rows top and bottom.
///
/// # Examples
/// ```
/// # use papercrop::imaging::compute_crop;
/// // 4000x3000 landscape to A4 portrait (210/297) → full height, centered
/// let crop = compute_crop(4000.0, 3000.0, 210.0 / 297.0).unwrap();
/// assert_eq!(crop.height, 3000.0);
/// assert!((crop.width - 2121.21).abs() < 0.01);
/// assert!((crop.x - 939.39).abs() < 0.01);
/// ```
pub fn compute_crop(
    source_width: f64,
    source_height: f64,
    target_ratio: f64,
) -> Result<CropRect, GeometryError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(source_width) || !valid(source_height) || !valid(target_ratio) {
        return Err(GeometryError::InvalidDimensions {
            width: source_width,
            height: source_height,
            ratio: target_ratio,
        });
    }

    let source_ratio = source_width / source_height;

    let (mut x, mut y, mut width, mut height) = if source_ratio > target_ratio {
        // Source is wider: keep height, trim width
        let width = source_height * target_ratio;
        ((source_width - width) / 2.0, 0.0, width, source_height)
    } else {
        // Source is taller or equal: keep width, trim height
        let height = source_width / target_ratio;
        (0.0, (source_height - height) / 2.0, source_width, height)
    };

    // Floating-point overshoot at the boundary
    x = x.max(0.0);
    y = y.max(0.0);
    if x + width > source_width {
        width = source_width - x;
    }
    if y + height > source_height {
        height = source_height - y;
    }

    Ok(CropRect {
        x,
        y,
        width,
        height,
    })
}

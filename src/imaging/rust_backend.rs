//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageDecoder::dimensions` (header only), swapped for quarter-turn EXIF orientations |
//! | Orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image` crate decoders, format sniffed from content |
//! | Crop | `image::DynamicImage::crop_imm` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::CropParams;
use image::codecs::jpeg::JpegEncoder;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("gif", ImageFormat::Gif),
    ("bmp", ImageFormat::Bmp),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| BackendError::Decode(format!("Failed to detect format: {}", e)))
}

/// A decoder for `data` plus the EXIF orientation it declares.
///
/// Unreadable or missing orientation metadata counts as upright.
fn oriented_decoder(data: &[u8]) -> Result<(impl ImageDecoder + '_, Orientation), BackendError> {
    let mut decoder = reader(data)?
        .into_decoder()
        .map_err(|e| BackendError::Decode(e.to_string()))?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    Ok((decoder, orientation))
}

/// True when the orientation turns the stored pixels by a quarter turn.
fn swaps_axes(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

/// Decode an in-memory image upright, sniffing the format from its magic
/// bytes and applying its EXIF orientation.
fn load_image(data: &[u8]) -> Result<DynamicImage, BackendError> {
    let (decoder, orientation) = oriented_decoder(data)?;
    let mut img =
        DynamicImage::from_decoder(decoder).map_err(|e| BackendError::Decode(e.to_string()))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Encode as baseline JPEG. Alpha is dropped; JPEG has no transparency.
fn encode_jpeg(img: &DynamicImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100) as u8);
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {}", e)))?;
    Ok(out)
}

impl ImageBackend for RustBackend {
    /// Dimensions as displayed: a quarter-turn EXIF orientation swaps
    /// width and height.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError> {
        let (decoder, orientation) = oriented_decoder(data)?;
        let (width, height) = decoder.dimensions();
        if swaps_axes(orientation) {
            Ok(Dimensions {
                width: height,
                height: width,
            })
        } else {
            Ok(Dimensions { width, height })
        }
    }

    fn crop_encode(&self, params: &CropParams<'_>) -> Result<Vec<u8>, BackendError> {
        let img = load_image(params.source)?;
        let r = params.region;
        if r.width == 0
            || r.height == 0
            || r.x + r.width > img.width()
            || r.y + r.height > img.height()
        {
            return Err(BackendError::Encode(format!(
                "Crop {}x{}+{}+{} outside {}x{} image",
                r.width,
                r.height,
                r.x,
                r.y,
                img.width(),
                img.height()
            )));
        }
        let cropped = img.crop_imm(r.x, r.y, r.width, r.height);
        encode_jpeg(&cropped, params.quality.value())
    }
}

//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the batch loop
//! needs from a codec: identify (pixel dimensions of an encoded image) and
//! crop_encode (cut a region out of the decoded pixels and re-encode it).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::CropParams;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image codec backends.
///
/// Both operations work on in-memory encoded bytes so the batch loop never
/// touches the filesystem.
pub trait ImageBackend {
    /// Get pixel dimensions of an encoded image.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, crop to `params.region` and re-encode as JPEG.
    fn crop_encode(&self, params: &CropParams<'_>) -> Result<Vec<u8>, BackendError>;
}

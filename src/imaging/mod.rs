//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Crop geometry** | [`compute_crop`] (pure math) |
//! | **Crop → JPEG** | `crop_imm` + `JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{CropRect, GeometryError, PixelRegion, compute_crop};
pub use params::{CropParams, Quality};
pub use rust_backend::{RustBackend, supported_input_extensions};

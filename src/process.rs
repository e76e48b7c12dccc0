//! The batch loop: crop every input to one ratio, in order.
//!
//! ## Pipeline
//!
//! ```text
//! settings.format ──resolve──▶ TargetRatio        (once per run, fail fast)
//!
//! for each SourceImage, in input order:
//!     identify ──▶ compute_crop ──▶ to_pixel_region ──▶ crop_encode
//!         │              │                                  │
//!         └──── any error: log, record SkippedItem ─────────┘
//!     on_progress(event)   // exactly once per input, success or not
//! ```
//!
//! ## Failure policy
//!
//! Run-level problems (no inputs, an invalid custom ratio, a quality outside
//! `(0, 1]`) return [`BatchError`] before any image is touched. Per-image
//! problems never escape the loop: a corrupt or zero-sized file is recorded
//! in [`BatchResult::skipped`] and the next image is processed. Progress
//! counts *attempted* items, so a run always reports `total / total` at the
//! end even when some inputs were skipped.
//!
//! ## Ordering
//!
//! Images are processed one at a time on the calling thread. The result
//! items, the progress events and the archive entries all follow input
//! order.

use crate::format::{self, FormatError, FormatSelector, TargetRatio};
use crate::imaging::{
    BackendError, CropParams, GeometryError, ImageBackend, PixelRegion, Quality, RustBackend,
    compute_crop,
};
use crate::naming;
use crate::types::{BatchResult, FailureKind, ProcessedItem, SkippedItem, SourceImage};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BatchError {
    #[error("No images to process")]
    EmptyBatch,
    #[error(transparent)]
    InvalidRatio(#[from] FormatError),
    #[error("Quality must be in (0, 1], got {0}")]
    InvalidQuality(f64),
}

/// Settings read once at the start of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSettings {
    pub format: FormatSelector,
    pub quality: Quality,
}

impl BatchSettings {
    pub fn new(format: FormatSelector, quality: Quality) -> Self {
        Self { format, quality }
    }

    /// Build with quality as a fraction in `(0, 1]`.
    pub fn with_quality_fraction(format: FormatSelector, quality: f64) -> Result<Self, BatchError> {
        let quality = Quality::from_fraction(quality).ok_or(BatchError::InvalidQuality(quality))?;
        Ok(Self { format, quality })
    }
}

/// Progress event emitted once per input image.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Processed {
        completed: usize,
        total: usize,
        source_name: String,
        output_name: String,
        crop: PixelRegion,
    },
    Skipped {
        completed: usize,
        total: usize,
        source_name: String,
        reason: String,
    },
}

impl ProcessEvent {
    /// `(completed, total)` after this event.
    pub fn progress(&self) -> (usize, usize) {
        match self {
            ProcessEvent::Processed {
                completed, total, ..
            }
            | ProcessEvent::Skipped {
                completed, total, ..
            } => (*completed, *total),
        }
    }
}

#[derive(Error, Debug)]
enum ItemError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl ItemError {
    fn kind(&self) -> FailureKind {
        match self {
            ItemError::Backend(BackendError::Decode(_)) => FailureKind::Decode,
            ItemError::Backend(BackendError::Encode(_)) => FailureKind::Encode,
            ItemError::Geometry(_) => FailureKind::Geometry,
        }
    }
}

/// Crop `images` with the pure Rust backend.
pub fn process(
    images: &[SourceImage],
    settings: &BatchSettings,
    on_progress: impl FnMut(&ProcessEvent),
) -> Result<BatchResult, BatchError> {
    process_with_backend(&RustBackend::new(), images, settings, on_progress)
}

/// Crop `images` using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    images: &[SourceImage],
    settings: &BatchSettings,
    mut on_progress: impl FnMut(&ProcessEvent),
) -> Result<BatchResult, BatchError> {
    if images.is_empty() {
        return Err(BatchError::EmptyBatch);
    }
    let ratio = format::resolve(&settings.format)?;
    let total = images.len();

    log::info!(
        "cropping {} images to {} (ratio {:.4}, quality {})",
        total,
        settings.format,
        ratio.value(),
        settings.quality.value()
    );

    let mut result = BatchResult::default();

    for (index, image) in images.iter().enumerate() {
        let completed = index + 1;
        let event = match process_one(backend, image, ratio, settings) {
            Ok(item) => {
                let event = ProcessEvent::Processed {
                    completed,
                    total,
                    source_name: item.source_name.clone(),
                    output_name: item.output_name.clone(),
                    crop: item.crop,
                };
                result.items.push(item);
                event
            }
            Err(e) => {
                log::warn!("skipping {}: {}", image.name, e);
                let reason = e.to_string();
                result.skipped.push(SkippedItem {
                    index,
                    source_name: image.name.clone(),
                    kind: e.kind(),
                    reason: reason.clone(),
                });
                ProcessEvent::Skipped {
                    completed,
                    total,
                    source_name: image.name.clone(),
                    reason,
                }
            }
        };
        on_progress(&event);
    }

    log::info!(
        "processed {} of {} images ({} skipped)",
        result.items.len(),
        total,
        result.failure_count()
    );
    Ok(result)
}

fn process_one(
    backend: &impl ImageBackend,
    image: &SourceImage,
    ratio: TargetRatio,
    settings: &BatchSettings,
) -> Result<ProcessedItem, ItemError> {
    let dims = backend.identify(&image.data)?;
    let crop = compute_crop(dims.width as f64, dims.height as f64, ratio.value())?;
    let region = crop.to_pixel_region(dims.width, dims.height);

    log::debug!(
        "{}: {}x{} (ratio {:.4}) → crop {:.1}x{:.1} at ({:.1}, {:.1}), output ratio {:.4}",
        image.name,
        dims.width,
        dims.height,
        dims.width as f64 / dims.height as f64,
        crop.width,
        crop.height,
        crop.x,
        crop.y,
        crop.ratio()
    );

    let data = backend.crop_encode(&CropParams {
        source: &image.data,
        region,
        quality: settings.quality,
    })?;

    Ok(ProcessedItem {
        source_name: image.name.clone(),
        output_name: naming::name_for(&image.name, &settings.format),
        data,
        source_dimensions: dims,
        crop: region,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::NamedFormat;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::{create_test_jpeg, create_test_jpeg_with_orientation, create_test_png};

    fn sources(names: &[&str]) -> Vec<SourceImage> {
        names
            .iter()
            .map(|n| SourceImage::new(*n, n.as_bytes().to_vec()))
            .collect()
    }

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    fn a4() -> BatchSettings {
        BatchSettings::new(FormatSelector::Named(NamedFormat::A4), Quality::new(80))
    }

    fn run(
        backend: &MockBackend,
        images: &[SourceImage],
        settings: &BatchSettings,
    ) -> (Result<BatchResult, BatchError>, Vec<ProcessEvent>) {
        let mut events = Vec::new();
        let result = process_with_backend(backend, images, settings, |e| events.push(e.clone()));
        (result, events)
    }

    // =========================================================================
    // All items succeed
    // =========================================================================

    #[test]
    fn all_succeed_in_input_order() {
        let images = sources(&["c.png", "a.jpg", "b.webp"]);
        let backend =
            MockBackend::with_dimensions(vec![dims(800, 600), dims(600, 800), dims(100, 100)]);

        let (result, events) = run(&backend, &images, &a4());
        let result = result.unwrap();

        let names: Vec<&str> = result.items.iter().map(|i| i.output_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["c_A4_Portrait.jpg", "a_A4_Portrait.jpg", "b_A4_Portrait.jpg"]
        );
        assert_eq!(result.failure_count(), 0);

        let progress: Vec<(usize, usize)> = events.iter().map(|e| e.progress()).collect();
        assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn crop_regions_follow_geometry() {
        let images = sources(&["wide.jpg"]);
        // 4000x3000 to A4 portrait → 2121x3000 at x=939
        let backend = MockBackend::with_dimensions(vec![dims(4000, 3000)]);

        let (result, _) = run(&backend, &images, &a4());
        let result = result.unwrap();
        let item = &result.items[0];

        assert_eq!(
            item.crop,
            PixelRegion {
                x: 939,
                y: 0,
                width: 2121,
                height: 3000
            }
        );
        assert_eq!(item.source_dimensions, dims(4000, 3000));
        assert_eq!(item.data, b"2121x3000+939+0@80");
    }

    #[test]
    fn backend_sees_identify_then_encode_per_item() {
        let images = sources(&["one", "two"]);
        let backend = MockBackend::with_dimensions(vec![dims(10, 10), dims(20, 10)]);
        let settings =
            BatchSettings::new(FormatSelector::Named(NamedFormat::Square), Quality::new(55));

        run(&backend, &images, &settings).0.unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 4);
        assert!(matches!(ops[0], RecordedOp::Identify { len: 3 }));
        assert!(matches!(ops[1], RecordedOp::CropEncode { quality: 55, .. }));
        assert!(matches!(ops[2], RecordedOp::Identify { len: 3 }));
        assert!(matches!(
            ops[3],
            RecordedOp::CropEncode {
                region: PixelRegion {
                    x: 5,
                    y: 0,
                    width: 10,
                    height: 10
                },
                ..
            }
        ));
    }

    // =========================================================================
    // Partial failures
    // =========================================================================

    #[test]
    fn middle_decode_failure_is_skipped() {
        let images = sources(&["1.jpg", "2.jpg", "3.jpg"]);
        let backend = MockBackend::with_results(vec![
            Ok(dims(300, 400)),
            Err(BackendError::Decode("corrupt header".into())),
            Ok(dims(400, 300)),
        ]);

        let (result, events) = run(&backend, &images, &a4());
        let result = result.unwrap();

        let kept: Vec<&str> = result.items.iter().map(|i| i.source_name.as_str()).collect();
        assert_eq!(kept, vec!["1.jpg", "3.jpg"]);
        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.skipped[0].index, 1);
        assert_eq!(result.skipped[0].kind, FailureKind::Decode);
        assert!(result.skipped[0].reason.contains("corrupt header"));

        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[1],
            ProcessEvent::Skipped { completed: 2, total: 3, source_name, .. } if source_name == "2.jpg"
        ));
        assert_eq!(events[2].progress(), (3, 3));
    }

    #[test]
    fn encode_failure_is_skipped() {
        let images = sources(&["1.jpg", "2.jpg"]);
        let backend =
            MockBackend::with_dimensions(vec![dims(10, 10), dims(10, 10)]).failing_encode_at(&[0]);

        let (result, events) = run(&backend, &images, &a4());
        let result = result.unwrap();

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].source_name, "2.jpg");
        assert_eq!(result.skipped[0].kind, FailureKind::Encode);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn zero_size_image_is_geometry_failure() {
        let images = sources(&["empty.png", "ok.png"]);
        let backend = MockBackend::with_dimensions(vec![dims(0, 0), dims(10, 10)]);

        let (result, _) = run(&backend, &images, &a4());
        let result = result.unwrap();

        assert_eq!(result.skipped[0].kind, FailureKind::Geometry);
        assert_eq!(result.items.len(), 1);
        // No encode attempted for the zero-size image
        let encodes = backend
            .get_operations()
            .iter()
            .filter(|op| matches!(op, RecordedOp::CropEncode { .. }))
            .count();
        assert_eq!(encodes, 1);
    }

    #[test]
    fn all_failures_still_reach_full_progress() {
        let images = sources(&["x", "y"]);
        let backend = MockBackend::new();

        let (result, events) = run(&backend, &images, &a4());
        let result = result.unwrap();

        assert!(result.is_empty());
        assert_eq!(result.failure_count(), 2);
        assert_eq!(events.last().unwrap().progress(), (2, 2));
    }

    // =========================================================================
    // Run-level errors
    // =========================================================================

    #[test]
    fn empty_input_fails_fast() {
        let backend = MockBackend::new();
        let (result, events) = run(&backend, &[], &a4());
        assert_eq!(result, Err(BatchError::EmptyBatch));
        assert!(events.is_empty());
    }

    #[test]
    fn invalid_custom_ratio_fails_before_any_item() {
        let images = sources(&["a.jpg"]);
        let backend = MockBackend::with_dimensions(vec![dims(10, 10)]);
        let settings = BatchSettings::new(
            FormatSelector::Custom {
                width: 4.0,
                height: 0.0,
            },
            Quality::default(),
        );

        let (result, events) = run(&backend, &images, &settings);

        assert!(matches!(result, Err(BatchError::InvalidRatio(_))));
        assert!(events.is_empty());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn quality_fraction_validation() {
        let format = FormatSelector::Named(NamedFormat::Square);
        let settings = BatchSettings::with_quality_fraction(format.clone(), 0.92).unwrap();
        assert_eq!(settings.quality.value(), 92);
        assert_eq!(
            BatchSettings::with_quality_fraction(format, 0.0),
            Err(BatchError::InvalidQuality(0.0))
        );
    }

    #[test]
    fn unknown_format_crops_square_and_names_processed() {
        let images = sources(&["pic.gif"]);
        let backend = MockBackend::with_dimensions(vec![dims(300, 200)]);
        let settings =
            BatchSettings::new(FormatSelector::Unknown("b5".into()), Quality::default());

        let (result, _) = run(&backend, &images, &settings);
        let result = result.unwrap();
        let item = &result.items[0];

        assert_eq!(item.output_name, "pic_Processed.jpg");
        assert_eq!(item.crop.width, item.crop.height);
    }

    // =========================================================================
    // Real backend
    // =========================================================================

    #[test]
    fn process_real_images_with_rust_backend() {
        let images = vec![
            SourceImage::new("landscape.jpg", create_test_jpeg(400, 300)),
            SourceImage::new("broken.jpg", b"not a jpeg".to_vec()),
            SourceImage::new("portrait.png", create_test_png(300, 600)),
        ];
        let settings = BatchSettings::new(
            FormatSelector::Named(NamedFormat::A4Landscape),
            Quality::new(85),
        );

        let mut events = 0;
        let result = process(&images, &settings, |_| events += 1).unwrap();

        assert_eq!(events, 3);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.skipped[0].source_name, "broken.jpg");

        for item in &result.items {
            let decoded = image::load_from_memory(&item.data).unwrap();
            let ratio = decoded.width() as f64 / decoded.height() as f64;
            assert!(
                (ratio - 297.0 / 210.0).abs() < 0.01,
                "{} has ratio {ratio}",
                item.output_name
            );
        }
        assert_eq!(result.items[1].output_name, "portrait_A4_Landscape.jpg");
    }

    #[test]
    fn rotated_phone_photo_is_cropped_upright() {
        // Landscape pixels tagged "rotate 90° clockwise" display as 300x400.
        let images = vec![SourceImage::new(
            "phone.jpg",
            create_test_jpeg_with_orientation(400, 300, 6),
        )];
        let settings = BatchSettings::new(FormatSelector::Named(NamedFormat::A4), Quality::new(85));

        let result = process(&images, &settings, |_| {}).unwrap();
        let item = &result.items[0];

        assert_eq!(item.source_dimensions, dims(300, 400));
        assert_eq!(
            item.crop,
            PixelRegion {
                x: 9,
                y: 0,
                width: 283,
                height: 400
            }
        );
        let decoded = image::load_from_memory(&item.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (283, 400));
    }
}

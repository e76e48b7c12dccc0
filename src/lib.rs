//! # papercrop
//!
//! Batch center-cropping of photos to paper sizes. Give it a set of images
//! and a target format (A4, A3, A5, US Letter, their landscape variants,
//! square, or a custom ratio); every image is cropped to the largest centered
//! rectangle of that shape, re-encoded as JPEG, and packaged into one zip.
//!
//! # Pipeline
//!
//! ```text
//! paths ──scan──▶ SourceImage[] ──process──▶ BatchResult ──archive──▶ <prefix>_<time>.zip
//!                                              │
//!                                              └──preview──▶ index.html + before/ + after/
//! ```
//!
//! The format is resolved to a ratio once per run. Each image is then
//! identified, cropped and encoded on its own; a file that fails is
//! skipped and reported without stopping the rest of the batch.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`format`] | Format table: identifiers, paper ratios, output suffixes |
//! | [`imaging`] | Crop geometry and the [`ImageBackend`](imaging::ImageBackend) codec seam |
//! | [`process`] | The sequential batch loop with per-image progress events |
//! | [`naming`] | `<stem>_<suffix>.jpg` output names |
//! | [`archive`] | Zip packaging and timestamped archive names |
//! | [`scan`] | Expands files and directories into the input list |
//! | [`preview`] | Before/after HTML page rendered with Maud |
//! | [`config`] | `papercrop.toml` loading, validation and CLI overrides |
//! | [`types`] | Shared result types, serializable for `--report` |
//! | [`output`] | CLI output formatting |
//!
//! # Library Use
//!
//! ```no_run
//! use papercrop::format::{FormatSelector, NamedFormat};
//! use papercrop::imaging::Quality;
//! use papercrop::process::{BatchSettings, process};
//! use papercrop::types::SourceImage;
//! use std::path::Path;
//!
//! let images = vec![SourceImage::load(Path::new("beach.jpg"))?];
//! let settings = BatchSettings::new(FormatSelector::Named(NamedFormat::A4), Quality::new(90));
//! let result = process(&images, &settings, |event| println!("{:?}", event.progress()))?;
//! papercrop::archive::save_archive(&result, Path::new("out"), "PaperCrop")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod config;
pub mod format;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod preview;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

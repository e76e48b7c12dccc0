//! Shared types passed between the batch loop, the archive writer, the
//! preview page and the CLI report.

use crate::imaging::{Dimensions, PixelRegion};
use serde::Serialize;
use std::path::Path;

/// An input image: its file name and encoded bytes.
///
/// The batch loop only borrows these; pixel dimensions are read from the
/// bytes when the item is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub name: String,
    pub data: Vec<u8>,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Read a file from disk, naming it by its final path component.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self { name, data })
    }
}

/// One successfully cropped and re-encoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedItem {
    pub source_name: String,
    pub output_name: String,
    /// Encoded JPEG bytes.
    #[serde(skip)]
    pub data: Vec<u8>,
    pub source_dimensions: Dimensions,
    pub crop: PixelRegion,
}

/// Which stage of the per-item pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Decode,
    Geometry,
    Encode,
}

/// An input that was skipped because processing it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    /// Zero-based position in the input list.
    pub index: usize,
    pub source_name: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Outcome of one batch run: successes in input order plus skipped inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub items: Vec<ProcessedItem>,
    pub skipped: Vec<SkippedItem>,
}

impl BatchResult {
    pub fn failure_count(&self) -> usize {
        self.skipped.len()
    }

    /// Number of inputs attempted (processed + skipped).
    pub fn attempted(&self) -> usize {
        self.items.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

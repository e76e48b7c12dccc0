//! Zip packaging for a finished batch.
//!
//! Every processed image becomes one stored (uncompressed) entry named by
//! its output name. JPEG data does not deflate usefully, so entries are
//! written as-is.
//!
//! Output names are not deduplicated (see [`naming`](crate::naming)). When
//! two items share a name the archive keeps a single entry at the position
//! of the first occurrence holding the bytes of the last one, and a warning
//! is logged for each overwritten item.
//!
//! ```text
//! out/
//! └── PaperCrop_2026-10-16T09-30-00.zip
//!     ├── beach_A4_Portrait.jpg
//!     └── city_A4_Portrait.jpg
//! ```

use crate::types::{BatchResult, ProcessedItem};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::HashMap;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Collapse duplicate output names: first position, last bytes.
fn entries(result: &BatchResult) -> Vec<&ProcessedItem> {
    let mut slots: Vec<&ProcessedItem> = Vec::with_capacity(result.items.len());
    let mut by_name: HashMap<&str, usize> = HashMap::new();

    for item in &result.items {
        match by_name.get(item.output_name.as_str()) {
            Some(&slot) => {
                warn!(
                    "{}: output name {} already used by {}, keeping the later image",
                    item.source_name, item.output_name, slots[slot].source_name
                );
                slots[slot] = item;
            }
            None => {
                by_name.insert(&item.output_name, slots.len());
                slots.push(item);
            }
        }
    }
    slots
}

/// Write every processed item of `result` into a zip archive on `writer`.
///
/// Returns the writer once the central directory has been flushed.
pub fn write_archive<W: Write + Seek>(result: &BatchResult, writer: W) -> Result<W, ArchiveError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut zip = zip::ZipWriter::new(writer);

    for item in entries(result) {
        zip.start_file(item.output_name.as_str(), options)?;
        zip.write_all(&item.data)?;
    }

    Ok(zip.finish()?)
}

/// Archive file name for a run started at `timestamp`:
/// `<prefix>_YYYY-MM-DDTHH-MM-SS.zip`.
pub fn archive_file_name(prefix: &str, timestamp: DateTime<Utc>) -> String {
    format!("{}_{}.zip", prefix, timestamp.format("%Y-%m-%dT%H-%M-%S"))
}

/// Write `result` to a timestamped zip inside `dir`, creating the directory
/// if needed. Returns the path of the written archive.
pub fn save_archive(result: &BatchResult, dir: &Path, prefix: &str) -> Result<PathBuf, ArchiveError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(archive_file_name(prefix, Utc::now()));
    let file = std::fs::File::create(&path)?;
    let mut file = write_archive(result, std::io::BufWriter::new(file))?;
    file.flush()?;
    info!("Wrote {} images to {}", result.items.len(), path.display());
    Ok(path)
}

//! Input discovery: expand command-line paths into the list of images to crop.
//!
//! Files named on the command line are taken as given. Directories are
//! walked one level deep (or fully with `recursive`), entries sorted by file
//! name, hidden entries ignored. Only files whose extension has a decoder
//! compiled into [`RustBackend`](crate::imaging::RustBackend) are kept:
//!
//! ```text
//! shoot/
//! ├── .DS_Store        # hidden, ignored
//! ├── 001-beach.jpg    # kept
//! ├── 002-city.png     # kept
//! ├── notes.txt        # skipped with a warning
//! ├── 004-dock.jpg -> ../export/dock.jpg   # symlink, kept
//! └── raw/             # walked only with --recursive
//!     └── 003-pier.tif
//! ```

use crate::imaging::supported_input_extensions;
use crate::types::SourceImage;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("No supported images found")]
    NoImages,
}

fn is_supported(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    supported_input_extensions().contains(&ext.as_str())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

fn keep_or_warn(path: PathBuf, found: &mut Vec<PathBuf>) {
    if is_supported(&path) {
        found.push(path);
    } else {
        warn!("Skipping {}: not a supported image type", path.display());
    }
}

/// Expand `paths` into the ordered list of image files to process.
///
/// Command-line order is preserved between arguments; within a directory
/// entries come in file-name order.
pub fn collect_sources(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    let mut found = Vec::new();

    for path in paths {
        if std::fs::metadata(path)?.is_dir() {
            let walker = WalkDir::new(path)
                .min_depth(1)
                .max_depth(if recursive { usize::MAX } else { 1 })
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));
            for entry in walker {
                let entry = entry?;
                // Symlinks to files count as files; directory links are not followed.
                if entry.path().is_file() {
                    keep_or_warn(entry.into_path(), &mut found);
                }
            }
        } else {
            keep_or_warn(path.clone(), &mut found);
        }
    }

    if found.is_empty() {
        return Err(ScanError::NoImages);
    }
    debug!("Collected {} input images", found.len());
    Ok(found)
}

/// Read every file into memory. Any unreadable file fails the whole call.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<SourceImage>, ScanError> {
    paths
        .iter()
        .map(|p| SourceImage::load(p).map_err(ScanError::from))
        .collect()
}

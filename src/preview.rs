//! Before/after preview page for a finished batch.
//!
//! Writes the originals and the cropped outputs next to a static HTML page
//! so a run can be checked in a browser before the archive is shared.
//!
//! ## Output Structure
//!
//! ```text
//! preview/
//! ├── index.html               # Side-by-side comparison
//! ├── before/
//! │   ├── beach.jpg
//! │   └── city.png
//! └── after/
//!     ├── beach_A4_Portrait.jpg
//!     └── city_A4_Portrait.jpg
//! ```
//!
//! Every source is copied into `before/`, including ones that were skipped.
//! Only processed items get a row on the page; skipped inputs are listed
//! with their reason at the bottom.
//!
//! Names are used as-is, so two files with the same name (sources from
//! different directories, or outputs of such sources) share one file on
//! disk. The later one wins, as in the archive, and a warning is logged.

use crate::types::{BatchResult, ProcessedItem, SkippedItem, SourceImage};
use log::{info, warn};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CSS: &str = include_str!("../static/preview.css");

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Percent-encode a file name for use as a relative URL path segment.
fn url_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Collapse `(name, bytes)` pairs that share a name: first position, last bytes.
fn last_wins<'a>(
    folder: &str,
    files: impl IntoIterator<Item = (&'a str, &'a [u8])>,
) -> Vec<(&'a str, &'a [u8])> {
    let mut slots: Vec<(&str, &[u8])> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();

    for (name, data) in files {
        match by_name.get(name) {
            Some(&slot) => {
                warn!("Preview {folder}/{name} written twice, keeping the later image");
                slots[slot].1 = data;
            }
            None => {
                by_name.insert(name, slots.len());
                slots.push((name, data));
            }
        }
    }
    slots
}

fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

fn render_pair(item: &ProcessedItem) -> Markup {
    let before = format!("before/{}", url_segment(&item.source_name));
    let after = format!("after/{}", url_segment(&item.output_name));
    let crop = item.crop;
    html! {
        figure.pair {
            div.sides {
                div {
                    img src=(before) alt=(item.source_name) loading="lazy";
                    p.dims {
                        (item.source_dimensions.width) "×" (item.source_dimensions.height)
                    }
                }
                div {
                    img src=(after) alt=(item.output_name) loading="lazy";
                    p.dims {
                        (crop.width) "×" (crop.height) " from (" (crop.x) ", " (crop.y) ")"
                    }
                }
            }
            figcaption { (item.source_name) " → " (item.output_name) }
        }
    }
}

fn render_skipped(skipped: &[SkippedItem]) -> Markup {
    html! {
        @if !skipped.is_empty() {
            section.skipped {
                h2 { "Skipped" }
                ul {
                    @for s in skipped {
                        li { strong { (s.source_name) } ": " (s.reason) }
                    }
                }
            }
        }
    }
}

/// Render the comparison page for `result`.
pub fn render_index(result: &BatchResult) -> Markup {
    let content = html! {
        h1 { "Crop preview" }
        p.summary {
            "Processed " (result.items.len()) " of " (result.attempted()) " images"
            @if result.failure_count() > 0 {
                " (" (result.failure_count()) " skipped)"
            }
        }
        @for item in &result.items {
            (render_pair(item))
        }
        (render_skipped(&result.skipped))
    };
    base_document("Crop preview", content)
}

/// Write the preview into `dir` and return the path of its `index.html`.
pub fn write_preview(
    sources: &[SourceImage],
    result: &BatchResult,
    dir: &Path,
) -> Result<PathBuf, PreviewError> {
    let before = dir.join("before");
    let after = dir.join("after");
    fs::create_dir_all(&before)?;
    fs::create_dir_all(&after)?;

    let originals = sources
        .iter()
        .map(|s| (s.name.as_str(), s.data.as_slice()));
    for (name, data) in last_wins("before", originals) {
        fs::write(before.join(name), data)?;
    }
    let crops = result
        .items
        .iter()
        .map(|i| (i.output_name.as_str(), i.data.as_slice()));
    for (name, data) in last_wins("after", crops) {
        fs::write(after.join(name), data)?;
    }

    let index = dir.join("index.html");
    fs::write(&index, render_index(result).into_string())?;
    info!("Wrote preview to {}", index.display());
    Ok(index)
}

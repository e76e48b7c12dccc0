//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Crop
//!
//! One line per input as it completes, then a summary:
//!
//! ```text
//! [001/003] beach.jpg → beach_A4_Portrait.jpg (2121x3000)
//! [002/003] notes.png skipped: Decode failed: ...
//! [003/003] city.png → city_A4_Portrait.jpg (707x1000)
//!
//! Processed 2 of 3 images (1 skipped)
//!     notes.png (decode)
//! Archive: ./PaperCrop_2026-10-16T09-30-00.zip
//! ```
//!
//! ## Formats
//!
//! ```text
//! a4                 0.7071  A4_Portrait       A4 portrait (210x297 mm)
//! ...
//! custom             w/h     Custom            Ratio from custom_ratio or --ratio
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::format::{self, CUSTOM_ID, CUSTOM_SUFFIX};
use crate::process::ProcessEvent;
use crate::types::{BatchResult, FailureKind};
use std::path::Path;

/// Format a 1-based position against the total, zero-padded to at least
/// three digits.
fn format_position(completed: usize, total: usize) -> String {
    let width = total.to_string().len().max(3);
    format!("[{:0>w$}/{:0>w$}]", completed, total, w = width)
}

fn failure_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Decode => "decode",
        FailureKind::Geometry => "geometry",
        FailureKind::Encode => "encode",
    }
}

// ============================================================================
// Crop
// ============================================================================

/// Format one progress event.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Processed {
            completed,
            total,
            source_name,
            output_name,
            crop,
        } => vec![format!(
            "{} {} → {} ({}x{})",
            format_position(*completed, *total),
            source_name,
            output_name,
            crop.width,
            crop.height
        )],
        ProcessEvent::Skipped {
            completed,
            total,
            source_name,
            reason,
        } => vec![format!(
            "{} {} skipped: {}",
            format_position(*completed, *total),
            source_name,
            reason
        )],
    }
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

/// Format the end-of-run summary, listing skipped inputs and the archive.
pub fn format_summary(result: &BatchResult, archive: Option<&Path>) -> Vec<String> {
    let mut lines = Vec::new();
    let noun = if result.attempted() == 1 { "image" } else { "images" };
    let mut headline = format!(
        "Processed {} of {} {}",
        result.items.len(),
        result.attempted(),
        noun
    );
    if result.failure_count() > 0 {
        headline.push_str(&format!(" ({} skipped)", result.failure_count()));
    }
    lines.push(headline);

    for skipped in &result.skipped {
        lines.push(format!(
            "    {} ({})",
            skipped.source_name,
            failure_label(skipped.kind)
        ));
    }

    match archive {
        Some(path) => lines.push(format!("Archive: {}", path.display())),
        None if result.is_empty() => lines.push("No archive written".to_string()),
        None => {}
    }
    lines
}

pub fn print_summary(result: &BatchResult, archive: Option<&Path>) {
    println!();
    for line in format_summary(result, archive) {
        println!("{}", line);
    }
}

// ============================================================================
// Formats
// ============================================================================

/// Format the table of accepted format identifiers.
pub fn format_formats() -> Vec<String> {
    let mut lines: Vec<String> = format::named_formats()
        .iter()
        .map(|f| {
            format!(
                "{:<18} {:<7} {:<17} {}",
                f.id,
                format!("{:.4}", f.ratio()),
                f.suffix,
                f.description
            )
        })
        .collect();
    lines.push(format!(
        "{:<18} {:<7} {:<17} {}",
        CUSTOM_ID, "w/h", CUSTOM_SUFFIX, "Ratio from custom_ratio or --ratio"
    ));
    lines
}

pub fn print_formats() {
    for line in format_formats() {
        println!("{}", line);
    }
}

//! Output formats and their aspect ratios.
//!
//! A [`FormatSelector`] names the shape every image in a batch is cropped
//! to. Named formats come from a single table ([`named_formats`]) that both
//! [`resolve`] and the file-name suffixes in [`naming`](crate::naming) read,
//! so a format's ratio and its label can never drift apart.
//!
//! ## Identifiers
//!
//! | Id | Ratio (w/h) | Suffix |
//! |----|-------------|--------|
//! | `a4` | 210/297 | `A4_Portrait` |
//! | `a4-landscape` | 297/210 | `A4_Landscape` |
//! | `a3` | 297/420 | `A3_Portrait` |
//! | `a3-landscape` | 420/297 | `A3_Landscape` |
//! | `a5` | 148/210 | `A5_Portrait` |
//! | `a5-landscape` | 210/148 | `A5_Landscape` |
//! | `letter` | 216/279 | `Letter_Portrait` |
//! | `letter-landscape` | 279/216 | `Letter_Landscape` |
//! | `square` | 1 | `Square` |
//! | `custom` | w/h from config | `Custom` |
//!
//! Any other identifier parses to [`FormatSelector::Unknown`], which crops
//! square and names outputs `_Processed`.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("invalid custom ratio {width}:{height} (both sides must be positive)")]
    InvalidRatio { width: f64, height: f64 },
}

/// Formats with a fixed, table-driven ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedFormat {
    A4,
    A4Landscape,
    A3,
    A3Landscape,
    A5,
    A5Landscape,
    Letter,
    LetterLandscape,
    Square,
}

/// One row of the format table.
#[derive(Debug, Clone, Copy)]
pub struct FormatSpec {
    pub format: NamedFormat,
    /// Identifier accepted on the command line and in config files.
    pub id: &'static str,
    /// Paper width and height (mm for paper sizes).
    pub width: f64,
    pub height: f64,
    /// Suffix appended to output file names.
    pub suffix: &'static str,
    pub description: &'static str,
}

impl FormatSpec {
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }
}

const FORMAT_TABLE: &[FormatSpec] = &[
    FormatSpec {
        format: NamedFormat::A4,
        id: "a4",
        width: 210.0,
        height: 297.0,
        suffix: "A4_Portrait",
        description: "A4 portrait (210x297 mm)",
    },
    FormatSpec {
        format: NamedFormat::A4Landscape,
        id: "a4-landscape",
        width: 297.0,
        height: 210.0,
        suffix: "A4_Landscape",
        description: "A4 landscape (297x210 mm)",
    },
    FormatSpec {
        format: NamedFormat::A3,
        id: "a3",
        width: 297.0,
        height: 420.0,
        suffix: "A3_Portrait",
        description: "A3 portrait (297x420 mm)",
    },
    FormatSpec {
        format: NamedFormat::A3Landscape,
        id: "a3-landscape",
        width: 420.0,
        height: 297.0,
        suffix: "A3_Landscape",
        description: "A3 landscape (420x297 mm)",
    },
    FormatSpec {
        format: NamedFormat::A5,
        id: "a5",
        width: 148.0,
        height: 210.0,
        suffix: "A5_Portrait",
        description: "A5 portrait (148x210 mm)",
    },
    FormatSpec {
        format: NamedFormat::A5Landscape,
        id: "a5-landscape",
        width: 210.0,
        height: 148.0,
        suffix: "A5_Landscape",
        description: "A5 landscape (210x148 mm)",
    },
    FormatSpec {
        format: NamedFormat::Letter,
        id: "letter",
        width: 216.0,
        height: 279.0,
        suffix: "Letter_Portrait",
        description: "US Letter portrait (216x279 mm)",
    },
    FormatSpec {
        format: NamedFormat::LetterLandscape,
        id: "letter-landscape",
        width: 279.0,
        height: 216.0,
        suffix: "Letter_Landscape",
        description: "US Letter landscape (279x216 mm)",
    },
    FormatSpec {
        format: NamedFormat::Square,
        id: "square",
        width: 1.0,
        height: 1.0,
        suffix: "Square",
        description: "Square (1:1)",
    },
];

/// Identifier of the custom ratio format.
pub const CUSTOM_ID: &str = "custom";
/// Suffix for custom ratio outputs.
pub const CUSTOM_SUFFIX: &str = "Custom";
/// Suffix for outputs of an unrecognized format.
pub const FALLBACK_SUFFIX: &str = "Processed";

/// All named formats in display order.
pub fn named_formats() -> &'static [FormatSpec] {
    FORMAT_TABLE
}

impl NamedFormat {
    /// Table row for this format.
    pub fn spec(self) -> &'static FormatSpec {
        FORMAT_TABLE
            .iter()
            .find(|s| s.format == self)
            .expect("every NamedFormat has a table row")
    }
}

/// The format a batch is cropped to.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatSelector {
    Named(NamedFormat),
    Custom { width: f64, height: f64 },
    /// An identifier not in the table, trimmed and lowercased as matched.
    Unknown(String),
}

impl FormatSelector {
    /// Parse a format identifier. `custom` takes its sides from `custom`.
    ///
    /// Matching ignores case and surrounding whitespace. Unrecognized ids
    /// become [`FormatSelector::Unknown`] rather than an error; callers that
    /// want to reject them check [`FormatSelector::is_unknown`].
    pub fn parse(id: &str, custom: (f64, f64)) -> Self {
        let id = id.trim().to_ascii_lowercase();
        if id == CUSTOM_ID {
            return FormatSelector::Custom {
                width: custom.0,
                height: custom.1,
            };
        }
        match FORMAT_TABLE.iter().find(|s| s.id == id) {
            Some(spec) => FormatSelector::Named(spec.format),
            None => FormatSelector::Unknown(id),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, FormatSelector::Unknown(_))
    }

    /// Human-readable suffix used in output file names.
    pub fn suffix(&self) -> &'static str {
        match self {
            FormatSelector::Named(f) => f.spec().suffix,
            FormatSelector::Custom { .. } => CUSTOM_SUFFIX,
            FormatSelector::Unknown(_) => FALLBACK_SUFFIX,
        }
    }
}

impl fmt::Display for FormatSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatSelector::Named(n) => write!(f, "{}", n.spec().id),
            FormatSelector::Custom { width, height } => write!(f, "custom {}:{}", width, height),
            FormatSelector::Unknown(id) => write!(f, "unknown format '{}'", id),
        }
    }
}

/// Target width/height ratio. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TargetRatio(f64);

impl TargetRatio {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Resolve a selector to the ratio images are cropped to.
///
/// Unknown selectors resolve to 1.0 (square) with a warning.
pub fn resolve(selector: &FormatSelector) -> Result<TargetRatio, FormatError> {
    match selector {
        FormatSelector::Named(f) => Ok(TargetRatio(f.spec().ratio())),
        FormatSelector::Custom { width, height } => {
            let valid = |v: f64| v.is_finite() && v > 0.0;
            if !valid(*width) || !valid(*height) {
                return Err(FormatError::InvalidRatio {
                    width: *width,
                    height: *height,
                });
            }
            Ok(TargetRatio(width / height))
        }
        FormatSelector::Unknown(id) => {
            log::warn!("unknown format '{}', cropping to square", id);
            Ok(TargetRatio(1.0))
        }
    }
}

/// Parse a `W:H` (or `WxH`) ratio string such as `4:3` or `16x9`.
pub fn parse_ratio(input: &str) -> Option<(f64, f64)> {
    let (w, h) = input.trim().split_once([':', 'x', 'X', '/'])?;
    let w: f64 = w.trim().parse().ok()?;
    let h: f64 = h.trim().parse().ok()?;
    Some((w, h))
}

//! Output file names for processed images.
//!
//! Every output is `<stem>_<suffix>.jpg`, where the stem is the original
//! name without its extension and the suffix comes from the format table
//! (`A4_Portrait`, `Square`, `Custom`, or `Processed` for unknown formats).
//!
//! Names are not deduplicated: `a.png` and `a.jpg` both become
//! `a_A4_Portrait.jpg`. See [`archive`](crate::archive) for how collisions
//! are packaged.

use crate::format::FormatSelector;

/// Strip a trailing extension: the last `.` followed by one or more
/// characters that are neither `.` nor `/`.
///
/// - `"photo.png"` → `"photo"`
/// - `"archive.tar.gz"` → `"archive.tar"`
/// - `"noext"` → `"noext"`
/// - `"trailing."` → `"trailing."` (nothing after the dot)
/// - `"dir.d/file"` → `"dir.d/file"` (dot is not in the final component)
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) => {
            let ext = &name[dot + 1..];
            if ext.is_empty() || ext.contains('/') {
                name
            } else {
                &name[..dot]
            }
        }
        None => name,
    }
}

/// Output name for `original_name` cropped to `selector`.
pub fn name_for(original_name: &str, selector: &FormatSelector) -> String {
    format!("{}_{}.jpg", strip_extension(original_name), selector.suffix())
}

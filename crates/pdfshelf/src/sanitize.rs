//! Helpers for cleaning caller-supplied names before they are logged or
//! persisted.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
///
/// Safe for span fields: reveals file name without exposing the full path.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Reduces an upload filename hint to its final component.
///
/// Both `/` and `\` count as separators since clients send either. Control
/// characters are dropped and surrounding whitespace is trimmed.
pub fn upload_filename(hint: &str) -> String {
    let last = hint.rsplit(['/', '\\']).next().unwrap_or("");
    last.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

//! Path conventions shared by both tools.
//!
//! The web page consumes paths as URL fragments, so every path written to an
//! output file is relative and uses `/` as its only separator.

use std::path::{Component, Path};

/// Image extensions indexed by default, lower-case, without the dot.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Whether `path` has an extension from `allowed`, compared case-insensitively.
///
/// `allowed` must already be lower-case.
pub fn has_allowed_extension<S: AsRef<str>>(path: &Path, allowed: &[S]) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    !ext.is_empty() && allowed.iter().any(|a| a.as_ref() == ext)
}

/// Express `path` relative to `base` with `/` separators.
///
/// Returns `None` when `path` is not under `base`. Backslashes inside
/// component names are rewritten as well, so paths produced on Windows and
/// elsewhere read the same.
pub fn relative_slash_path(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().replace('\\', "/")),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

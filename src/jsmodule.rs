//! Generated JavaScript data modules.
//!
//! Both tools emit the same shape of file: one `//` comment line per banner
//! entry, then a single `var NAME = <json>;` assignment. Loading it with a
//! plain `<script>` tag works from `file://` where `fetch` does not.
//!
//! ```text
//! // Generated by handball-prep data - do not edit by hand
//! // 2 rows of data
//! var HANDBALL_DATA = [
//!   {
//!     "Nom": "Team1"
//!   }
//! ];
//! ```
//!
//! JSON is pretty-printed with two-space indentation and non-ASCII text is
//! written literally, so diffs of regenerated files stay readable.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Render a module assigning `value` to `variable`.
pub fn render<T: Serialize + ?Sized>(
    banner: &[String],
    variable: &str,
    value: &T,
) -> serde_json::Result<String> {
    let json = serde_json::to_string_pretty(value)?;
    let mut content = String::with_capacity(json.len() + 128);
    for line in banner {
        content.push_str("// ");
        content.push_str(line);
        content.push('\n');
    }
    content.push_str(&format!("var {variable} = {json};\n"));
    Ok(content)
}

/// Write `content` to `path`, replacing whatever was there. Returns the byte size.
pub fn write(path: &Path, content: &str) -> io::Result<usize> {
    fs::write(path, content)?;
    Ok(content.len())
}

/// Whether `name` can be used as a JavaScript variable name.
///
/// ASCII-only check: letter, `_` or `$` first, then letters, digits, `_`, `$`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

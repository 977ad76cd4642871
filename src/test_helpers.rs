//! Shared test utilities for the handball-prep test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let report = convert(tmp.path(), &DataConfig::default(), |_| {}).unwrap();
//!
//! let content = fs::read_to_string(tmp.path().join("data.js")).unwrap();
//! let rows: serde_json::Value = serde_json::from_str(json_payload(&content, "HANDBALL_DATA")).unwrap();
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::photos::TeamIndex;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/` to a temp directory and return it.
///
/// The copy holds `Events.csv` and `Effectifs/Alpha/`. Tests get an isolated
/// working root they can mutate without affecting other tests.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write CSV text to `dir/name` and return the path.
pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// =========================================================================
// Generated file readers (panic with a clear message on malformed output)
// =========================================================================

/// The JSON literal assigned to `variable` in a generated module.
pub fn json_payload<'a>(content: &'a str, variable: &str) -> &'a str {
    let prefix = format!("var {variable} = ");
    let start = content
        .find(&prefix)
        .unwrap_or_else(|| panic!("no assignment to {variable} in:\n{content}"))
        + prefix.len();
    content[start..]
        .trim_end()
        .strip_suffix(';')
        .unwrap_or_else(|| panic!("assignment to {variable} not terminated by ';'"))
}

/// Parse `Effectifs/<team>/index.json` under a working root.
pub fn read_team_index(root: &Path, team: &str) -> TeamIndex {
    let path = root.join("Effectifs").join(team).join("index.json");
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("invalid index {}: {e}", path.display()))
}

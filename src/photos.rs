//! Team photo indexing.
//!
//! Walks the photo root (`Effectifs/`) and records, for each team, the image
//! files it contains. Two outputs serve the two ways the web page is opened:
//!
//! - `index.json` inside every team directory, fetched when the page is
//!   served over HTTP;
//! - `photos-index.js` at the working root, loaded with a `<script>` tag when
//!   the page is opened from disk and `fetch` is unavailable.
//!
//! ## Directory Structure
//!
//! ```text
//! Effectifs/                   # Photo root
//! ├── README.txt               # Ignored (not a directory)
//! ├── Juniors/                 # Team "Juniors"
//! │   ├── index.json           # Written by this module
//! │   ├── 07-lea.jpg
//! │   └── staff/
//! │       └── coach.PNG        # Indexed as "staff/coach.PNG"
//! └── Seniors/                 # Team "Seniors", no photos yet
//! ```
//!
//! Paths are relative to the team directory and always use `/`. Teams are
//! visited in name order and photo lists are sorted, so unchanged input
//! always regenerates identical files.
//!
//! A root with no team directories is not an error: every output is still
//! written, with an empty aggregate.

use crate::config::PhotosConfig;
use crate::jsmodule;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PhotosError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Photo directory not found: {0}")]
    RootNotFound(PathBuf),
}

/// One team directory and its photos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamPhotos {
    pub team: String,
    pub dir: PathBuf,
    /// Slash-separated paths relative to `dir`, sorted.
    pub photos: Vec<String>,
}

/// Contents of a team's `index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamIndex {
    pub photos: Vec<String>,
    pub count: usize,
    pub team: String,
}

impl From<&TeamPhotos> for TeamIndex {
    fn from(team: &TeamPhotos) -> Self {
        Self {
            photos: team.photos.clone(),
            count: team.photos.len(),
            team: team.team.clone(),
        }
    }
}

/// List image files anywhere under `dir`, relative to it, sorted.
///
/// Symlinked directories are not descended; symlinked files are listed.
pub fn list_photos<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Result<Vec<String>, PhotosError> {
    let mut photos = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !paths::has_allowed_extension(path, extensions) {
            continue;
        }
        if let Some(rel) = paths::relative_slash_path(path, dir) {
            photos.push(rel);
        }
    }
    photos.sort();
    Ok(photos)
}

/// Team directories directly under `root`, sorted by name.
pub fn team_dirs(root: &Path) -> Result<Vec<(String, PathBuf)>, PhotosError> {
    if !root.is_dir() {
        return Err(PhotosError::RootNotFound(root.to_path_buf()));
    }
    let entries = fs::read_dir(root)?.collect::<Result<Vec<_>, _>>()?;
    let mut dirs: Vec<(String, PathBuf)> = entries
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter_map(|p| {
            let name = p.file_name()?.to_string_lossy().into_owned();
            Some((name, p))
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Write `index.json` (or the configured name) inside the team directory.
pub fn write_team_index(team: &TeamPhotos, index_file: &str) -> Result<PathBuf, PhotosError> {
    let path = team.dir.join(index_file);
    let json = serde_json::to_string_pretty(&TeamIndex::from(team))?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Render the aggregate module mapping team name to photo list.
pub fn render_aggregate(teams: &[TeamPhotos], variable: &str) -> Result<String, PhotosError> {
    let index: BTreeMap<&str, &[String]> = teams
        .iter()
        .map(|t| (t.team.as_str(), t.photos.as_slice()))
        .collect();
    let banner = vec!["Generated by handball-prep photos - do not edit by hand".to_string()];
    Ok(jsmodule::render(&banner, variable, &index)?)
}

/// Summary of an indexing run.
#[derive(Debug)]
pub struct IndexReport {
    pub root: PathBuf,
    pub output: PathBuf,
    pub teams: Vec<TeamPhotos>,
    pub bytes: usize,
}

impl IndexReport {
    pub fn total_photos(&self) -> usize {
        self.teams.iter().map(|t| t.photos.len()).sum()
    }
}

/// Index `<root>/<photos.root>`, writing every per-team index and the aggregate.
///
/// `progress` is called once per team, right after its index is written.
pub fn index<F>(root: &Path, config: &PhotosConfig, mut progress: F) -> Result<IndexReport, PhotosError>
where
    F: FnMut(&TeamPhotos),
{
    let photo_root = root.join(&config.root);
    let output = root.join(&config.output);

    let mut teams = Vec::new();
    for (team, dir) in team_dirs(&photo_root)? {
        let photos = list_photos(&dir, &config.extensions)?;
        let team = TeamPhotos { team, dir, photos };
        write_team_index(&team, &config.index_file)?;
        progress(&team);
        teams.push(team);
    }

    let content = render_aggregate(&teams, &config.variable)?;
    let bytes = jsmodule::write(&output, &content)?;

    Ok(IndexReport {
        root: photo_root,
        output,
        teams,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::IMAGE_EXTENSIONS;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "fake image").unwrap();
    }

    fn scan(root: &Path) -> Result<Vec<TeamPhotos>, PhotosError> {
        team_dirs(root)?
            .into_iter()
            .map(|(team, dir)| {
                let photos = list_photos(&dir, IMAGE_EXTENSIONS)?;
                Ok(TeamPhotos { team, dir, photos })
            })
            .collect()
    }

    #[test]
    fn lists_nested_photos_sorted() {
        let tmp = TempDir::new().unwrap();
        let team = tmp.path().join("Alpha");
        touch(&team.join("sub/b.png"));
        touch(&team.join("a.jpg"));
        touch(&team.join("Z.webp"));
        touch(&team.join("sub/deeper/c.gif"));

        let photos = list_photos(&team, IMAGE_EXTENSIONS).unwrap();
        assert_eq!(photos, vec!["Z.webp", "a.jpg", "sub/b.png", "sub/deeper/c.gif"]);
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("photo.PNG"));
        touch(&tmp.path().join("notes.txt"));
        touch(&tmp.path().join("scan.JPEG"));
        touch(&tmp.path().join("noext"));

        let photos = list_photos(tmp.path(), IMAGE_EXTENSIONS).unwrap();
        assert_eq!(photos, vec!["photo.PNG", "scan.JPEG"]);
    }

    #[test]
    fn directories_named_like_images_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("album.jpg")).unwrap();
        touch(&tmp.path().join("album.jpg/inner.jpg"));

        let photos = list_photos(tmp.path(), IMAGE_EXTENSIONS).unwrap();
        assert_eq!(photos, vec!["album.jpg/inner.jpg"]);
    }

    #[test]
    fn empty_team_has_no_photos() {
        let tmp = TempDir::new().unwrap();
        assert!(list_photos(tmp.path(), IMAGE_EXTENSIONS).unwrap().is_empty());
    }

    #[test]
    fn paths_relative_to_team_not_root() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Alpha/sub/b.png"));

        let teams = scan(tmp.path()).unwrap();
        assert_eq!(teams[0].photos, vec!["sub/b.png"]);
        assert!(teams[0].photos.iter().all(|p| !p.contains('\\')));
    }

    #[test]
    fn teams_sorted_and_files_at_root_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Gamma")).unwrap();
        fs::create_dir_all(tmp.path().join("Alpha")).unwrap();
        fs::create_dir_all(tmp.path().join("Beta")).unwrap();
        touch(&tmp.path().join("stray.jpg"));

        let teams = scan(tmp.path()).unwrap();
        let names: Vec<&str> = teams.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("Effectifs"));
        assert!(matches!(result, Err(PhotosError::RootNotFound(_))));
    }

    #[test]
    fn root_that_is_a_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Effectifs"));
        let result = team_dirs(&tmp.path().join("Effectifs"));
        assert!(matches!(result, Err(PhotosError::RootNotFound(_))));
    }

    #[test]
    fn team_index_json_shape() {
        let tmp = TempDir::new().unwrap();
        let team = TeamPhotos {
            team: "Alpha".into(),
            dir: tmp.path().to_path_buf(),
            photos: vec!["a.jpg".into(), "sub/b.png".into()],
        };

        let path = write_team_index(&team, "index.json").unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"photos": ["a.jpg", "sub/b.png"], "count": 2, "team": "Alpha"})
        );
    }

    #[test]
    fn team_index_field_order() {
        let index = TeamIndex {
            photos: vec![],
            count: 0,
            team: "Beta".into(),
        };
        assert_eq!(
            serde_json::to_string(&index).unwrap(),
            r#"{"photos":[],"count":0,"team":"Beta"}"#
        );
    }

    #[test]
    fn aggregate_maps_team_to_photos() {
        let teams = vec![
            TeamPhotos {
                team: "Élite".into(),
                dir: PathBuf::from("Effectifs/Élite"),
                photos: vec!["x.jpg".into()],
            },
            TeamPhotos {
                team: "Beta".into(),
                dir: PathBuf::from("Effectifs/Beta"),
                photos: vec![],
            },
        ];
        let content = render_aggregate(&teams, "PHOTOS_INDEX").unwrap();

        assert!(content.starts_with("// Generated by handball-prep photos"));
        assert!(content.contains("\"Élite\": [\n    \"x.jpg\"\n  ]"));
        let value: serde_json::Value =
            serde_json::from_str(json_payload(&content, "PHOTOS_INDEX")).unwrap();
        assert_eq!(value["Beta"], serde_json::json!([]));
    }

    #[test]
    fn index_fixtures_end_to_end() {
        let tmp = setup_fixtures();
        fs::create_dir_all(tmp.path().join("Effectifs/Beta")).unwrap();

        let report = index(tmp.path(), &PhotosConfig::default(), |_| {}).unwrap();
        assert_eq!(report.teams.len(), 2);
        assert_eq!(report.total_photos(), 2);

        assert_eq!(
            read_team_index(tmp.path(), "Alpha"),
            TeamIndex {
                photos: vec!["a.jpg".into(), "sub/b.png".into()],
                count: 2,
                team: "Alpha".into(),
            }
        );
        assert_eq!(read_team_index(tmp.path(), "Beta").count, 0);

        let aggregate = fs::read_to_string(tmp.path().join("photos-index.js")).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(json_payload(&aggregate, "PHOTOS_INDEX")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"Alpha": ["a.jpg", "sub/b.png"], "Beta": []})
        );
    }

    #[test]
    fn index_with_no_teams_writes_empty_aggregate() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Effectifs")).unwrap();

        let report = index(tmp.path(), &PhotosConfig::default(), |_| {}).unwrap();
        assert!(report.teams.is_empty());
        let aggregate = fs::read_to_string(tmp.path().join("photos-index.js")).unwrap();
        assert!(aggregate.ends_with("var PHOTOS_INDEX = {};\n"));
    }

    #[test]
    fn index_missing_root_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let result = index(tmp.path(), &PhotosConfig::default(), |_| {});

        assert!(matches!(result, Err(PhotosError::RootNotFound(_))));
        assert!(!tmp.path().join("photos-index.js").exists());
    }

    #[test]
    fn rerun_is_idempotent() {
        let tmp = setup_fixtures();
        index(tmp.path(), &PhotosConfig::default(), |_| {}).unwrap();
        let first = fs::read_to_string(tmp.path().join("photos-index.js")).unwrap();

        // index.json files from the first run are not images
        index(tmp.path(), &PhotosConfig::default(), |_| {}).unwrap();
        let second = fs::read_to_string(tmp.path().join("photos-index.js")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn progress_reported_per_team_in_order() {
        let tmp = setup_fixtures();
        fs::create_dir_all(tmp.path().join("Effectifs/Beta")).unwrap();

        let mut seen = Vec::new();
        index(tmp.path(), &PhotosConfig::default(), |team| {
            // the team's index is already on disk when progress fires
            assert!(team.dir.join("index.json").is_file());
            seen.push((team.team.clone(), team.photos.len()));
        })
        .unwrap();

        assert_eq!(seen, vec![("Alpha".to_string(), 2), ("Beta".to_string(), 0)]);
    }

    #[test]
    fn report_bytes_match_aggregate_file() {
        let tmp = setup_fixtures();
        let report = index(tmp.path(), &PhotosConfig::default(), |_| {}).unwrap();
        let written = fs::read_to_string(tmp.path().join("photos-index.js")).unwrap();
        assert_eq!(report.bytes, written.len());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_rules() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let external = tmp.path().join("external");
        touch(&external.join("x.jpg"));
        let root = tmp.path().join("Effectifs");
        let alpha = root.join("Alpha");
        fs::create_dir_all(&alpha).unwrap();

        // linked directory at the root is a team
        symlink(&external, root.join("Linked")).unwrap();
        // linked directory inside a team is not descended
        symlink(&external, alpha.join("dirlink")).unwrap();
        // linked file inside a team is listed
        symlink(external.join("x.jpg"), alpha.join("f.jpg")).unwrap();
        // dangling link at the root is ignored
        symlink(tmp.path().join("gone"), root.join("Ghost")).unwrap();

        let teams = scan(&root).unwrap();
        let names: Vec<&str> = teams.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Linked"]);
        assert_eq!(teams[0].photos, vec!["f.jpg"]);
        assert_eq!(teams[1].photos, vec!["x.jpg"]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_team_directory_fails_run() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = setup_fixtures();
        let locked = tmp.path().join("Effectifs/Alpha/locked");
        touch(&locked.join("hidden.jpg"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // privileged users read through mode 000; nothing to check then
        let privileged = fs::read_dir(&locked).is_ok();
        let result = index(tmp.path(), &PhotosConfig::default(), |_| {});
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if privileged {
            return;
        }

        assert!(matches!(result, Err(PhotosError::Walk(_))));
        assert!(!tmp.path().join("photos-index.js").exists());
    }
}

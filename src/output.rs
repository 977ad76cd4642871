//! Console output for both tools.
//!
//! The console is the only operator interface: there are no log files. Each
//! run prints a banner, the resolved paths, per-item progress, and a final
//! summary framed by rules.
//!
//! # Output Format
//!
//! ## Data
//!
//! ```text
//! ======================================================================
//!   DATA MODULE FROM Events.csv
//! ======================================================================
//!
//!   Source : ./Events.csv
//!   Output : ./data.js
//!
//!   Reading CSV...
//!   -> 412 unique rows
//!   -> 3 duplicate(s) skipped
//!   Generating data.js...
//!   -> data.js written (184.2 KB)
//!   -> Teams detected: Juniors, Seniors
//!
//! ======================================================================
//!   DONE: 412 rows -> data.js (184.2 KB)
//! ======================================================================
//! ```
//!
//! ## Photos
//!
//! ```text
//!   Juniors              -> 14 photo(s)
//!   Seniors              -> no photos
//!
//!   photos-index.js      -> written (2 team(s), 0.3 KB)
//! ```
//!
//! # Architecture
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Progress lines
//! are printed from the tools' callbacks while the run is still going.

use crate::convert::{ConvertEvent, ConvertReport};
use crate::photos::{IndexReport, TeamPhotos};
use std::path::Path;

const RULE_WIDTH: usize = 70;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Kilobytes with one decimal, as shown in summaries.
pub fn format_kb(bytes: usize) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Framed title block opening a run.
pub fn format_banner(title: &str) -> Vec<String> {
    vec![rule(), format!("  {title}"), rule(), String::new()]
}

// ============================================================================
// Data
// ============================================================================

/// Header printed before the export is read.
pub fn format_data_header(source: &Path, output: &Path) -> Vec<String> {
    let mut lines = format_banner(&format!("DATA MODULE FROM {}", file_name(source)));
    lines.push(format!("  Source : {}", source.display()));
    lines.push(format!("  Output : {}", output.display()));
    lines.push(String::new());
    lines.push("  Reading CSV...".to_string());
    lines
}

/// Progress lines for one converter stage.
pub fn format_convert_event(event: &ConvertEvent) -> Vec<String> {
    match event {
        ConvertEvent::Deduplicated {
            rows,
            duplicates,
            blank,
        } => {
            let mut lines = vec![format!("  -> {rows} unique rows")];
            if *duplicates > 0 {
                lines.push(format!("  -> {duplicates} duplicate(s) skipped"));
            }
            if *blank > 0 {
                lines.push(format!("  -> {blank} blank row(s) ignored"));
            }
            lines
        }
        ConvertEvent::Writing { output } => {
            vec![format!("  Generating {}...", file_name(output))]
        }
    }
}

/// Written size, detected teams, and the closing summary.
pub fn format_data_report(report: &ConvertReport) -> Vec<String> {
    let output_name = file_name(&report.output);
    let size = format_kb(report.bytes);

    let mut lines = vec![format!("  -> {output_name} written ({size})")];
    if !report.teams.is_empty() {
        lines.push(format!("  -> Teams detected: {}", report.teams.join(", ")));
    }

    lines.push(String::new());
    lines.push(rule());
    lines.push(format!(
        "  DONE: {} rows -> {output_name} ({size})",
        report.rows
    ));
    lines.push(rule());
    lines
}

pub fn print_data_header(source: &Path, output: &Path) {
    for line in format_data_header(source, output) {
        println!("{}", line);
    }
}

pub fn print_convert_event(event: &ConvertEvent) {
    for line in format_convert_event(event) {
        println!("{}", line);
    }
}

pub fn print_data_report(report: &ConvertReport) {
    for line in format_data_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Photos
// ============================================================================

/// Header printed before the photo root is scanned.
pub fn format_photos_header(working_root: &Path, photo_root: &Path) -> Vec<String> {
    let mut lines = format_banner("PHOTO INDEX GENERATION");
    lines.push(format!("  Working directory : {}", working_root.display()));
    lines.push(format!("  Photo root        : {}", photo_root.display()));
    lines.push(String::new());
    lines
}

/// Progress line for a team whose index has just been written.
pub fn format_team_line(team: &TeamPhotos) -> String {
    let status = match team.photos.len() {
        0 => "no photos".to_string(),
        n => format!("{n} photo(s)"),
    };
    format!("  {:<20} -> {}", team.team, status)
}

/// The aggregate file and the closing summary.
pub fn format_photos_report(report: &IndexReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "  {:<20} -> written ({} team(s), {})",
            file_name(&report.output),
            report.teams.len(),
            format_kb(report.bytes)
        ),
    ];

    lines.push(String::new());
    lines.push(rule());
    if report.teams.is_empty() {
        lines.push(format!("  No teams found in {}/", file_name(&report.root)));
    } else {
        lines.push(format!(
            "  DONE: {} team(s), {} photo(s) indexed",
            report.teams.len(),
            report.total_photos()
        ));
    }
    lines.push(rule());
    lines
}

pub fn print_photos_header(working_root: &Path, photo_root: &Path) {
    for line in format_photos_header(working_root, photo_root) {
        println!("{}", line);
    }
}

pub fn print_team_line(team: &TeamPhotos) {
    println!("{}", format_team_line(team));
}

pub fn print_photos_report(report: &IndexReport) {
    for line in format_photos_report(report) {
        println!("{}", line);
    }
}

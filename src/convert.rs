//! Tabular export to data module conversion.
//!
//! Reads the stats export (`Events.csv`), drops blank and duplicate rows,
//! and writes `data.js` assigning the remaining rows to `HANDBALL_DATA`.
//!
//! ## Pipeline
//!
//! ```text
//! Events.csv ──read_records──▶ Vec<Record> ──Deduplicator──▶ Dedup ──write_module──▶ data.js
//! ```
//!
//! ## Deduplication
//!
//! The export is appended to by hand over a season, so the same event often
//! appears more than once. Rows are compared by [`Record::fingerprint`] and
//! the first occurrence wins: the retained set depends on input order, and
//! the same file always produces the same output.
//!
//! Blank rows (every cell empty after trimming) are skipped before hashing
//! and are not counted as duplicates.
//!
//! ## Failure
//!
//! Nothing is written unless at least one row survives. A missing export is
//! [`ConvertError::SourceNotFound`], an export with no usable rows is
//! [`ConvertError::NoRows`].

use crate::config::DataConfig;
use crate::jsmodule;
use crate::record::{Fingerprint, Header, Record};
use csv::ReaderBuilder;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BOM: char = '\u{feff}';

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("No valid rows found in {0}")]
    NoRows(PathBuf),
}

/// What happened to a row fed to the [`Deduplicator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Kept,
    Blank,
    Duplicate,
}

/// Single-pass, first-occurrence-wins row filter.
///
/// All state lives in the value, so separate passes never see each other's
/// fingerprints.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<Fingerprint>,
    records: Vec<Record>,
    duplicates: usize,
    blank: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) -> RowOutcome {
        if record.is_blank() {
            self.blank += 1;
            return RowOutcome::Blank;
        }
        if !self.seen.insert(record.fingerprint()) {
            self.duplicates += 1;
            return RowOutcome::Duplicate;
        }
        self.records.push(record);
        RowOutcome::Kept
    }

    pub fn finish(self) -> Dedup {
        Dedup {
            records: self.records,
            fingerprints: self.seen,
            duplicates: self.duplicates,
            blank: self.blank,
        }
    }
}

/// Result of one deduplication pass.
#[derive(Debug, Default)]
pub struct Dedup {
    /// Retained rows in input order.
    pub records: Vec<Record>,
    /// Fingerprints of the retained rows.
    pub fingerprints: HashSet<Fingerprint>,
    /// Non-blank rows dropped because an earlier row had the same fingerprint.
    pub duplicates: usize,
    /// Rows dropped because every cell was empty.
    pub blank: usize,
}

/// Run a whole sequence of records through a fresh [`Deduplicator`].
pub fn deduplicate<I: IntoIterator<Item = Record>>(records: I) -> Dedup {
    let mut dedup = Deduplicator::new();
    for record in records {
        dedup.push(record);
    }
    dedup.finish()
}

/// Parse CSV text into records, ignoring a leading byte-order mark.
pub fn parse_records(content: &str) -> Result<Vec<Record>, ConvertError> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let header = Header::new(reader.headers()?);
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(header.record(&row));
    }
    Ok(records)
}

/// Read the export at `path` into records.
pub fn read_records(path: &Path) -> Result<Vec<Record>, ConvertError> {
    if !path.is_file() {
        return Err(ConvertError::SourceNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_records(&content)
}

/// Read and deduplicate the export, failing when no row survives.
pub fn load_and_deduplicate(path: &Path) -> Result<Dedup, ConvertError> {
    let dedup = deduplicate(read_records(path)?);
    if dedup.records.is_empty() {
        return Err(ConvertError::NoRows(path.to_path_buf()));
    }
    Ok(dedup)
}

/// Render the data module for `records`.
pub fn render_module(records: &[Record], variable: &str) -> Result<String, ConvertError> {
    let banner = vec![
        "Generated by handball-prep data - do not edit by hand".to_string(),
        format!("{} rows of data", records.len()),
    ];
    Ok(jsmodule::render(&banner, variable, records)?)
}

/// Write the data module to `path`, overwriting it. Returns the byte size.
pub fn write_module(path: &Path, records: &[Record], variable: &str) -> Result<usize, ConvertError> {
    let content = render_module(records, variable)?;
    Ok(jsmodule::write(path, &content)?)
}

/// Team labels named by the header, e.g. `#03 Phase Seniors` gives `Seniors`.
///
/// Only the first record's columns are inspected; every record shares the
/// header. Labels are distinct, non-empty, and sorted.
pub fn detect_teams(records: &[Record], marker: &str) -> Vec<String> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    first
        .columns()
        .filter(|column| column.contains(marker))
        .map(|column| column.replace(marker, "").trim().to_string())
        .filter(|label| !label.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Progress reported while [`convert`] runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertEvent {
    /// The export was read and deduplicated.
    Deduplicated {
        rows: usize,
        duplicates: usize,
        blank: usize,
    },
    /// The module is about to be written.
    Writing { output: PathBuf },
}

/// Summary of a successful conversion.
#[derive(Debug)]
pub struct ConvertReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub duplicates: usize,
    pub blank: usize,
    pub bytes: usize,
    pub teams: Vec<String>,
}

/// Convert `<root>/<source>` into `<root>/<output>`.
///
/// `progress` is called after each stage, before the next one starts.
pub fn convert<F>(root: &Path, config: &DataConfig, mut progress: F) -> Result<ConvertReport, ConvertError>
where
    F: FnMut(&ConvertEvent),
{
    let source = root.join(&config.source);
    let output = root.join(&config.output);

    let dedup = load_and_deduplicate(&source)?;
    progress(&ConvertEvent::Deduplicated {
        rows: dedup.records.len(),
        duplicates: dedup.duplicates,
        blank: dedup.blank,
    });

    progress(&ConvertEvent::Writing {
        output: output.clone(),
    });
    let bytes = write_module(&output, &dedup.records, &config.variable)?;
    let teams = detect_teams(&dedup.records, &config.team_marker);

    Ok(ConvertReport {
        source,
        output,
        rows: dedup.records.len(),
        duplicates: dedup.duplicates,
        blank: dedup.blank,
        bytes,
        teams,
    })
}

//! Rows of the stats export and their fingerprints.
//!
//! A [`Record`] keeps every column of a row in header order so the generated
//! module mirrors the export exactly. Duplicate detection only looks at the
//! six [`FINGERPRINT_COLUMNS`]; two rows that agree on those are the same
//! event even if other columns differ.
//!
//! The fingerprint is SHA-256 over the six values joined with `|`, hex
//! encoded. Missing columns read as empty strings, so an export lacking one
//! of them still deduplicates on the rest.

use serde::ser::{Serialize, SerializeMap, Serializer};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

/// Columns hashed into the fingerprint, in hashing order.
pub const FINGERPRINT_COLUMNS: [&str; 6] = [
    "Position",
    "[M] rencontre",
    "#14 joueurs",
    "#15 gardiens",
    "#08 r\u{e9}sultat",
    "Nom",
];

const FINGERPRINT_SEPARATOR: &str = "|";

/// Column layout of an export, resolved once per file.
///
/// A repeated header name keeps its first position; the later cell's value
/// lands there, so the last value wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    columns: Vec<String>,
    /// For each header cell, the index of its column in `columns`.
    slots: Vec<usize>,
}

impl Header {
    pub fn new<H>(names: H) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
    {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut header = Header::default();
        for name in names {
            let name = name.as_ref();
            let slot = *positions.entry(name.to_string()).or_insert_with(|| {
                header.columns.push(name.to_string());
                header.columns.len() - 1
            });
            header.slots.push(slot);
        }
        header
    }

    /// Distinct column names in first-appearance order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Build a record from one data row.
    ///
    /// Cells missing from a short row become empty strings and cells past the
    /// header width are dropped.
    pub fn record<V>(&self, values: V) -> Record
    where
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let mut fields: Vec<(String, String)> = self
            .columns
            .iter()
            .map(|name| (name.clone(), String::new()))
            .collect();
        for (slot, value) in self.slots.iter().zip(values) {
            fields[*slot].1 = value.as_ref().to_string();
        }
        Record { fields }
    }
}

/// One data row as an ordered column-to-value mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Build a record from a header row and one data row.
    ///
    /// Resolves the header on every call; use [`Header::record`] when
    /// building many rows against the same header.
    pub fn from_row<H, V>(headers: H, values: V) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        Header::new(headers).record(values)
    }

    /// Value of `column`, or `""` when the column is absent.
    pub fn get(&self, column: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Column names in header order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when every value is empty after trimming whitespace.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.trim().is_empty())
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let joined = FINGERPRINT_COLUMNS
            .iter()
            .map(|column| self.get(column))
            .collect::<Vec<_>>()
            .join(FINGERPRINT_SEPARATOR);
        let digest = Sha256::digest(joined.as_bytes());
        Fingerprint(format!("{:x}", digest))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Hex-encoded SHA-256 digest identifying a row for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! # handball-prep
//!
//! Offline data preparation for a static handball statistics web app. The
//! page is plain HTML and JavaScript; this crate produces the data files it
//! loads.
//!
//! # Two Independent Tools
//!
//! ```text
//! data     Events.csv  →  data.js                      (rows, deduplicated)
//! photos   Effectifs/  →  Effectifs/*/index.json       (per team, for HTTP)
//!                      →  photos-index.js              (all teams, for file://)
//! ```
//!
//! Each tool is a single pass over its input directory and fully rewrites
//! its outputs. They share conventions but no state.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`convert`] | CSV export → deduplicated records → `data.js` |
//! | [`record`] | Ordered row type and its SHA-256 fingerprint |
//! | [`photos`] | Team directory scan, `index.json` and `photos-index.js` |
//! | [`jsmodule`] | `var NAME = <json>;` module rendering shared by both tools |
//! | [`paths`] | Extension allow-list and `/`-separated relative paths |
//! | [`config`] | Optional `handball.toml` overrides |
//! | [`output`] | Console formatting of progress and summaries |
//!
//! # Design Decisions
//!
//! ## JavaScript Modules Instead of Plain JSON
//!
//! Browsers block `fetch` on `file://` pages, but a `<script src>` tag still
//! loads. Wrapping the JSON in a variable assignment lets the same page work
//! double-clicked from a USB stick and served from a host.
//!
//! ## First Occurrence Wins
//!
//! Duplicate rows are dropped by fingerprint in input order. Keeping the
//! earliest row makes the output a pure function of the file, so
//! regenerating after an unrelated edit produces a minimal diff.

pub mod config;
pub mod convert;
pub mod jsmodule;
pub mod output;
pub mod paths;
pub mod photos;
pub mod record;

#[cfg(test)]
pub(crate) mod test_helpers;

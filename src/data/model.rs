use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classify::{classify_schema, detect_category, detect_ws_subtype};
use crate::config::ClassifierConfig;

/// One CSV record: column name → raw cell text.
///
/// Short records simply lack the trailing keys, so every read goes through
/// [`crate::data::coerce::lookup`] instead of indexing directly.
pub type Row = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// SchemaType – coarse benchmark family
// ---------------------------------------------------------------------------

/// Benchmark family inferred from which columns a file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Websocket,
    Http,
    Unknown,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Websocket => "websocket",
            SchemaType::Http => "http",
            SchemaType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WsSubtype – websocket test pattern
// ---------------------------------------------------------------------------

/// Refinement of a websocket result file by the kind of sweep it records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WsSubtype {
    ConcurrencySweep,
    PayloadSweep,
    Burst,
    Stream,
}

impl WsSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            WsSubtype::ConcurrencySweep => "concurrency_sweep",
            WsSubtype::PayloadSweep => "payload_sweep",
            WsSubtype::Burst => "burst",
            WsSubtype::Stream => "stream",
        }
    }
}

impl fmt::Display for WsSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LoadedFile – one parsed CSV with its cached classification
// ---------------------------------------------------------------------------

/// A successfully parsed result file.
///
/// Classification happens once in [`LoadedFile::new`]; the result is never
/// recomputed. Reloading the path is the only way to refresh it.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// Path as given by the caller. Unique key within a workbench.
    pub path: String,
    /// Column names in file order.
    pub header: Vec<String>,
    pub rows: Vec<Row>,
    pub schema: SchemaType,
    /// Display category, `"Unknown"` when no rule matched.
    pub category: String,
    /// Only ever `Some` for websocket files.
    pub ws_subtype: Option<WsSubtype>,
}

impl LoadedFile {
    /// Build a file from parsed CSV content and classify it.
    pub fn new(
        path: impl Into<String>,
        header: Vec<String>,
        rows: Vec<Row>,
        config: &ClassifierConfig,
    ) -> Self {
        let path = path.into();
        let schema = classify_schema(&header);
        let category = detect_category(&path, config);
        let ws_subtype = match schema {
            SchemaType::Websocket => detect_ws_subtype(&path, &header, &rows),
            _ => None,
        };
        LoadedFile {
            path,
            header,
            rows,
            schema,
            category,
            ws_subtype,
        }
    }

    /// Base name with the extension stripped, e.g. `ws-run1` for
    /// `results/ws-run1.csv`.
    pub fn stem(&self) -> String {
        Path::new(&self.path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Base name including the extension.
    pub fn file_name(&self) -> String {
        Path::new(&self.path)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.clone())
    }

    /// Exact, case-sensitive header membership.
    pub fn has_column(&self, column: &str) -> bool {
        self.header.iter().any(|h| h == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Series – one file's plottable data
// ---------------------------------------------------------------------------

/// An index-aligned (x, y) sequence with its legend label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub x: Vec<f64>,
    /// Same length as `x`.
    pub y: Vec<f64>,
    pub label: String,
}

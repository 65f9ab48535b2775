use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::Serialize;

use super::axis::x_axis_column;
use super::coerce::{column_values, lookup};
use super::metrics::{summarize, Summary};
use super::model::{LoadedFile, SchemaType, Series};
use crate::config::ClassifierConfig;

const CONTAINER_NAME: &str = "Container Name";

// ---------------------------------------------------------------------------
// Series extraction
// ---------------------------------------------------------------------------

/// Build one file's series for `metric`.
///
/// x comes from the file's x-axis column (see [`x_axis_column`]) or a
/// 1-based row index; y is the coerced metric per row. Both stay
/// index-aligned with the file's rows.
pub fn extract_series(file: &LoadedFile, metric: &str, config: &ClassifierConfig) -> Series {
    let label = resolve_label(file);

    let x = match x_axis_column(file, config) {
        Some(col) => column_values(&file.rows, &file.header, &col, 0.0),
        None => (1..=file.rows.len()).map(|i| i as f64).collect(),
    };
    // one value per row; a missing metric column reads as zeros
    let y = column_values(&file.rows, &file.header, metric, 0.0);

    Series { x, y, label }
}

/// Legend label for a file.
///
/// Defaults to the file stem. A `Container Name` from the first row takes
/// over unless it is just a fragment of the stem, in which case the stem
/// carries more context (e.g. a run index) and is kept.
pub fn resolve_label(file: &LoadedFile) -> String {
    let stem = file.stem();
    if !file.has_column(CONTAINER_NAME) {
        return stem;
    }
    let container = file
        .rows
        .first()
        .and_then(|r| lookup(r, &file.header, CONTAINER_NAME))
        .filter(|c| !c.is_empty())
        .map(str::trim);

    match container {
        Some(c) if !stem.is_empty() && stem != c && stem.contains(c) => stem,
        Some(c) => c.to_string(),
        None => stem,
    }
}

/// Series for each file in caller order.
pub fn plot_series<'a, I>(files: I, metric: &str, config: &ClassifierConfig) -> Vec<Series>
where
    I: IntoIterator<Item = &'a LoadedFile>,
{
    files
        .into_iter()
        .map(|f| extract_series(f, metric, config))
        .collect()
}

// ---------------------------------------------------------------------------
// Chart kind
// ---------------------------------------------------------------------------

/// How the front end should draw a set of series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Bars for websocket results, lines otherwise.
    #[default]
    Auto,
    Bar,
    Line,
}

impl ChartKind {
    /// Resolve `Auto` against the schema of the first plotted file.
    pub fn resolve(self, first_schema: Option<SchemaType>) -> ChartKind {
        match self {
            ChartKind::Auto if first_schema == Some(SchemaType::Websocket) => ChartKind::Bar,
            ChartKind::Auto => ChartKind::Line,
            other => other,
        }
    }
}

impl FromStr for ChartKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ChartKind::Auto),
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            other => bail!("Unknown chart kind: {other}"),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChartKind::Auto => "auto",
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Series summary
// ---------------------------------------------------------------------------

/// Summary of every y value across a plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub metric: String,
    #[serde(flatten)]
    pub stats: Summary,
}

impl SeriesSummary {
    pub fn from_series(metric: &str, series: &[Series]) -> Option<Self> {
        summarize(series.iter().flat_map(|s| s.y.iter().copied())).map(|stats| SeriesSummary {
            metric: metric.to_string(),
            stats,
        })
    }
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.metric, self.stats)
    }
}

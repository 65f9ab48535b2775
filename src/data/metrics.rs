use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::coerce::{lookup, parse_cell};
use super::model::LoadedFile;
use crate::config::ClassifierConfig;

// ---------------------------------------------------------------------------
// Metric discovery
// ---------------------------------------------------------------------------

/// Columns whose lower-cased name contains one of the metric keywords.
pub fn numeric_columns(header: &[String], keywords: &[String]) -> BTreeSet<String> {
    header
        .iter()
        .filter(|h| {
            let lower = h.to_lowercase();
            keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
        })
        .cloned()
        .collect()
}

/// Metric columns shared by every file, sorted ascending.
///
/// An empty file set has no metrics.
pub fn intersect_metrics<'a, I>(files: I, config: &ClassifierConfig) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a LoadedFile>,
{
    let mut iter = files.into_iter();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };
    let mut common = numeric_columns(&first.header, &config.metric_keywords);
    for file in iter {
        if common.is_empty() {
            break;
        }
        let cols = numeric_columns(&file.header, &config.metric_keywords);
        common.retain(|c| cols.contains(c));
    }
    common
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Min / max / mean of a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "min={:.2}, max={:.2}, avg={:.2}", self.min, self.max, self.avg)
    }
}

/// `None` for an empty input.
pub fn summarize<I>(values: I) -> Option<Summary>
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }
    (count > 0).then(|| Summary {
        min,
        max,
        avg: sum / count as f64,
    })
}

/// Summary of the parseable, non-missing cells of one column.
pub fn summarize_column(file: &LoadedFile, column: &str) -> Option<Summary> {
    summarize(
        file.rows
            .iter()
            .filter_map(|r| parse_cell(lookup(r, &file.header, column))),
    )
}

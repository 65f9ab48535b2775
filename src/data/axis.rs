use super::coerce::{coerce, is_missing, lookup};
use super::model::{LoadedFile, Row, SchemaType, WsSubtype};
use crate::config::ClassifierConfig;

/// X axis used by HTTP-style result files.
pub const TOTAL_REQUESTS: &str = "Total Requests";

/// Axis title when no column is chosen and rows are plotted by index.
pub const INDEX_AXIS_TITLE: &str = "Test Parameter";

const NUM_CLIENTS: &str = "Num Clients";
const MESSAGE_SIZE: &str = "Message Size (KB)";

/// Pick the x-axis column for a websocket file.
///
/// Sweep files use their swept column outright. Otherwise the first
/// candidate whose values actually vary wins, then the first candidate that
/// is merely present. `None` means "plot against row index".
pub fn select_x_axis(
    header: &[String],
    rows: &[Row],
    subtype: Option<WsSubtype>,
    candidates: &[String],
) -> Option<String> {
    let has = |name: &str| header.iter().any(|h| h == name);
    match subtype {
        Some(WsSubtype::ConcurrencySweep) if has(NUM_CLIENTS) => return Some(NUM_CLIENTS.into()),
        Some(WsSubtype::PayloadSweep) if has(MESSAGE_SIZE) => return Some(MESSAGE_SIZE.into()),
        _ => {}
    }

    let present: Vec<&String> = candidates.iter().filter(|c| has(c.as_str())).collect();
    present
        .iter()
        .find(|c| distinct_values(rows, header, c.as_str()) > 1)
        .or_else(|| present.first())
        .map(|c| c.to_string())
}

/// Number of distinct numeric values in a column, ignoring missing cells.
fn distinct_values(rows: &[Row], header: &[String], column: &str) -> usize {
    let mut values: Vec<f64> = rows
        .iter()
        .map(|r| lookup(r, header, column))
        .filter(|v| !is_missing(*v))
        .map(|v| coerce(v, 0.0))
        .collect();
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| a.total_cmp(b).is_eq());
    values.len()
}

/// X-axis column for any loaded file, or `None` for a row-index axis.
pub fn x_axis_column(file: &LoadedFile, config: &ClassifierConfig) -> Option<String> {
    match file.schema {
        SchemaType::Websocket => select_x_axis(
            &file.header,
            &file.rows,
            file.ws_subtype,
            &config.x_axis_candidates,
        ),
        _ if file.has_column(TOTAL_REQUESTS) => Some(TOTAL_REQUESTS.to_string()),
        _ => None,
    }
}

/// Title for the shared x axis, taken from the first plotted file.
pub fn axis_title(first: Option<&LoadedFile>, config: &ClassifierConfig) -> String {
    first
        .and_then(|f| x_axis_column(f, config))
        .unwrap_or_else(|| INDEX_AXIS_TITLE.to_string())
}

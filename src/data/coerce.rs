use super::model::Row;

/// Cell tokens that mean "no value", compared case-insensitively.
const MISSING_TOKENS: [&str; 5] = ["", "nan", "n/a", "-", "--"];

/// Whether a raw cell should be treated as absent.
pub fn is_missing(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let v = v.trim();
            MISSING_TOKENS.iter().any(|t| v.eq_ignore_ascii_case(t))
        }
    }
}

/// Parse a raw cell, `None` for missing, malformed or NaN input
/// (`-nan` and `+NaN` parse as NaN and are rejected here).
pub fn parse_cell(value: Option<&str>) -> Option<f64> {
    if is_missing(value) {
        return None;
    }
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| !v.is_nan())
}

/// Convert a raw cell to a number, returning `default` for missing or
/// malformed input. Never fails.
pub fn coerce(value: Option<&str>, default: f64) -> f64 {
    parse_cell(value).unwrap_or(default)
}

/// Read `column` from `row`, tolerating header drift between CSV writers.
///
/// Exact key first; otherwise the first header entry whose trimmed,
/// lower-cased name equals the trimmed, lower-cased `column` is used as the
/// key. Every row read in the crate goes through here.
pub fn lookup<'a>(row: &'a Row, header: &[String], column: &str) -> Option<&'a str> {
    if let Some(v) = row.get(column) {
        return Some(v.as_str());
    }
    let wanted = column.trim().to_lowercase();
    header
        .iter()
        .filter(|h| h.trim().to_lowercase() == wanted)
        .find_map(|h| row.get(h.as_str()))
        .map(String::as_str)
}

/// Coerce `column` for every row, keeping row order. Always yields exactly
/// one value per row, so absent columns come back as `default`s.
pub fn column_values(rows: &[Row], header: &[String], column: &str, default: f64) -> Vec<f64> {
    rows.iter()
        .map(|r| coerce(lookup(r, header, column), default))
        .collect()
}

use std::collections::BTreeSet;
use std::path::Path;

use super::coerce::lookup;
use super::model::{Row, SchemaType, WsSubtype};
use crate::config::ClassifierConfig;

/// Category used when no prefix or path rule matches.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Decide the benchmark family from exact column-name membership.
pub fn classify_schema(header: &[String]) -> SchemaType {
    let has = |name: &str| header.iter().any(|h| h == name);
    if has("Test Type") || has("Total Messages") {
        SchemaType::Websocket
    } else if has("Type") && has("Total Requests") {
        SchemaType::Http
    } else {
        SchemaType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Assign a display category from the file path.
///
/// File-name prefixes are tried first, then path substrings; both tables
/// are scanned in order and the first hit wins.
pub fn detect_category(path: &str, config: &ClassifierConfig) -> String {
    let base = Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if let Some(rule) = config
        .category_prefixes
        .iter()
        .find(|r| base.starts_with(&r.pattern.to_lowercase()))
    {
        return rule.category.clone();
    }

    let full = path.to_lowercase();
    config
        .category_path_parts
        .iter()
        .find(|r| full.contains(&r.pattern.to_lowercase()))
        .map(|r| r.category.clone())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}

// ---------------------------------------------------------------------------
// Websocket sub-type
// ---------------------------------------------------------------------------

/// Refine a websocket file into its sweep kind.
///
/// A descriptive file name is authoritative. Without one, the distinct
/// values of the `Pattern` column decide: any `stream` means stream,
/// otherwise `burst` means burst.
pub fn detect_ws_subtype(path: &str, header: &[String], rows: &[Row]) -> Option<WsSubtype> {
    let base = Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if base.contains("_concurrency_sweep") {
        return Some(WsSubtype::ConcurrencySweep);
    }
    if base.contains("_payload_sweep") {
        return Some(WsSubtype::PayloadSweep);
    }

    if rows.is_empty() || !header.iter().any(|h| h == "Pattern") {
        return None;
    }
    let patterns: BTreeSet<String> = rows
        .iter()
        .filter_map(|r| lookup(r, header, "Pattern"))
        .map(|p| p.trim().to_lowercase())
        .collect();

    if patterns.contains("stream") {
        Some(WsSubtype::Stream)
    } else if patterns.contains("burst") {
        Some(WsSubtype::Burst)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn pattern_rows(patterns: &[&str]) -> Vec<Row> {
        patterns
            .iter()
            .map(|p| Row::from([("Pattern".to_string(), p.to_string())]))
            .collect()
    }

    #[test]
    fn schema_from_columns() {
        assert_eq!(classify_schema(&header(&["Test Type", "X"])), SchemaType::Websocket);
        assert_eq!(classify_schema(&header(&["Total Messages"])), SchemaType::Websocket);
        assert_eq!(classify_schema(&header(&["Type", "Total Requests"])), SchemaType::Http);
        assert_eq!(classify_schema(&header(&["Type"])), SchemaType::Unknown);
        assert_eq!(classify_schema(&header(&["Foo"])), SchemaType::Unknown);
        // exact match only
        assert_eq!(classify_schema(&header(&["test type"])), SchemaType::Unknown);
    }

    #[test]
    fn category_prefix_beats_path_segment() {
        let config = ClassifierConfig::default();
        assert_eq!(detect_category("results/ws-run1.csv", &config), "WebSocket");
        assert_eq!(detect_category("results/static/ws-run1.csv", &config), "WebSocket");
        assert_eq!(detect_category("results/GRPC-unary.csv", &config), "gRPC");
    }

    #[test]
    fn category_from_path_segment() {
        let config = ClassifierConfig::default();
        assert_eq!(detect_category("results/static/run.csv", &config), "Static");
        assert_eq!(detect_category("Results/Dynamic/run.csv", &config), "Dynamic");
        assert_eq!(detect_category("results/misc.csv", &config), "Unknown");
    }

    #[test]
    fn category_path_table_order_is_priority() {
        let config = ClassifierConfig::default();
        // both "static" and "local" appear; "static" is earlier in the table
        assert_eq!(detect_category("local/static/run.csv", &config), "Static");
    }

    #[test]
    fn category_tables_are_extensible() {
        let mut config = ClassifierConfig::default();
        config
            .category_prefixes
            .insert(0, crate::config::CategoryRule::new("h2-", "HTTP/2"));
        assert_eq!(detect_category("out/h2-run.csv", &config), "HTTP/2");
    }

    #[test]
    fn subtype_from_filename_ignores_content() {
        let rows = pattern_rows(&["stream"]);
        assert_eq!(
            detect_ws_subtype("bench_concurrency_sweep_01.csv", &header(&["Pattern"]), &rows),
            Some(WsSubtype::ConcurrencySweep)
        );
        assert_eq!(
            detect_ws_subtype("out/Bench_Payload_Sweep.csv", &header(&["Pattern"]), &rows),
            Some(WsSubtype::PayloadSweep)
        );
    }

    #[test]
    fn subtype_from_pattern_column() {
        let h = header(&["Test Type", "Pattern"]);
        assert_eq!(
            detect_ws_subtype("run.csv", &h, &pattern_rows(&["burst", "Burst "])),
            Some(WsSubtype::Burst)
        );
        assert_eq!(
            detect_ws_subtype("run.csv", &h, &pattern_rows(&["burst", "Stream"])),
            Some(WsSubtype::Stream)
        );
        assert_eq!(detect_ws_subtype("run.csv", &h, &pattern_rows(&["steady"])), None);
    }

    #[test]
    fn subtype_needs_rows_and_pattern_column() {
        assert_eq!(detect_ws_subtype("run.csv", &header(&["Pattern"]), &[]), None);
        assert_eq!(
            detect_ws_subtype("run.csv", &header(&["Test Type"]), &pattern_rows(&["burst"])),
            None
        );
    }
}

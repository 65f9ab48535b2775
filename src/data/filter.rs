use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use super::model::{LoadedFile, WsSubtype};

/// Category filter value that matches every file.
pub const ALL_CATEGORIES: &str = "All";

/// Category whose files are further split by [`WsGroup`].
pub const WEBSOCKET_CATEGORY: &str = "WebSocket";

// ---------------------------------------------------------------------------
// Websocket sub-type groups
// ---------------------------------------------------------------------------

/// User-facing grouping of websocket sub-types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WsGroup {
    #[default]
    All,
    Concurrency,
    Payload,
    /// Burst and stream runs, plus websocket files with no detected sub-type.
    BurstStream,
}

impl WsGroup {
    pub const ALL_GROUPS: [WsGroup; 4] = [
        WsGroup::All,
        WsGroup::Concurrency,
        WsGroup::Payload,
        WsGroup::BurstStream,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WsGroup::All => "All",
            WsGroup::Concurrency => "Concurrency",
            WsGroup::Payload => "Payload",
            WsGroup::BurstStream => "Burst / Stream",
        }
    }

    pub fn contains(&self, subtype: Option<WsSubtype>) -> bool {
        match self {
            WsGroup::All => true,
            WsGroup::Concurrency => subtype == Some(WsSubtype::ConcurrencySweep),
            WsGroup::Payload => subtype == Some(WsSubtype::PayloadSweep),
            WsGroup::BurstStream => matches!(
                subtype,
                None | Some(WsSubtype::Burst) | Some(WsSubtype::Stream)
            ),
        }
    }
}

impl FromStr for WsGroup {
    type Err = anyhow::Error;

    /// Accepts the display label or a short name (`burst`, `stream`).
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "all" => Ok(WsGroup::All),
            "concurrency" => Ok(WsGroup::Concurrency),
            "payload" => Ok(WsGroup::Payload),
            "burststream" | "burst" | "stream" => Ok(WsGroup::BurstStream),
            _ => bail!("Unknown websocket group: {s}"),
        }
    }
}

impl fmt::Display for WsGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Whether a file passes the category and sub-type filters.
///
/// The sub-type group only applies when the category filter is WebSocket.
pub fn is_visible(file: &LoadedFile, category: &str, ws_group: WsGroup) -> bool {
    if category == ALL_CATEGORIES {
        return true;
    }
    if file.category != category {
        return false;
    }
    category != WEBSOCKET_CATEGORY || ws_group.contains(file.ws_subtype)
}

/// Paths of the visible files, in load order.
pub fn list_visible_files(files: &[LoadedFile], category: &str, ws_group: WsGroup) -> Vec<String> {
    files
        .iter()
        .filter(|f| is_visible(f, category, ws_group))
        .map(|f| f.path.clone())
        .collect()
}

/// `"All"` followed by the sorted distinct categories of the loaded files.
pub fn category_options(files: &[LoadedFile]) -> Vec<String> {
    let cats: BTreeSet<&str> = files.iter().map(|f| f.category.as_str()).collect();
    std::iter::once(ALL_CATEGORIES)
        .chain(cats)
        .map(str::to_string)
        .collect()
}

/// The selected visible paths in visible order, or every visible path when
/// the selection is empty or entirely filtered out.
pub fn selected_or_visible(visible: &[String], selected: &BTreeSet<String>) -> Vec<String> {
    let picked: Vec<String> = visible
        .iter()
        .filter(|p| selected.contains(*p))
        .cloned()
        .collect();
    if picked.is_empty() {
        visible.to_vec()
    } else {
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::data::model::Row;

    fn ws_file(path: &str, pattern: Option<&str>) -> LoadedFile {
        let mut header = vec!["Test Type".to_string()];
        let mut rows = vec![Row::from([("Test Type".to_string(), "x".to_string())])];
        if let Some(p) = pattern {
            header.push("Pattern".into());
            rows[0].insert("Pattern".into(), p.into());
        }
        LoadedFile::new(path, header, rows, &ClassifierConfig::default())
    }

    fn http_file(path: &str) -> LoadedFile {
        LoadedFile::new(
            path,
            vec!["Type".into(), "Total Requests".into()],
            Vec::new(),
            &ClassifierConfig::default(),
        )
    }

    fn files() -> Vec<LoadedFile> {
        vec![
            ws_file("r/ws-a_concurrency_sweep.csv", None),
            http_file("r/st-a.csv"),
            ws_file("r/ws-b_payload_sweep.csv", None),
            ws_file("r/ws-c.csv", Some("burst")),
            ws_file("r/ws-d.csv", None),
            http_file("r/dy-a.csv"),
        ]
    }

    #[test]
    fn all_shows_everything() {
        let f = files();
        assert_eq!(list_visible_files(&f, "All", WsGroup::Payload).len(), 6);
    }

    #[test]
    fn category_filter() {
        let f = files();
        assert_eq!(list_visible_files(&f, "Static", WsGroup::All), vec!["r/st-a.csv"]);
        assert!(list_visible_files(&f, "gRPC", WsGroup::All).is_empty());
    }

    #[test]
    fn websocket_groups() {
        let f = files();
        assert_eq!(list_visible_files(&f, "WebSocket", WsGroup::All).len(), 4);
        assert_eq!(
            list_visible_files(&f, "WebSocket", WsGroup::Concurrency),
            vec!["r/ws-a_concurrency_sweep.csv"]
        );
        assert_eq!(
            list_visible_files(&f, "WebSocket", WsGroup::Payload),
            vec!["r/ws-b_payload_sweep.csv"]
        );
        assert_eq!(
            list_visible_files(&f, "WebSocket", WsGroup::BurstStream),
            vec!["r/ws-c.csv", "r/ws-d.csv"]
        );
    }

    #[test]
    fn group_ignored_outside_websocket() {
        let f = files();
        assert_eq!(
            list_visible_files(&f, "Dynamic", WsGroup::Concurrency),
            vec!["r/dy-a.csv"]
        );
    }

    #[test]
    fn options_are_sorted_after_all() {
        assert_eq!(
            category_options(&files()),
            vec!["All", "Dynamic", "Static", "WebSocket"]
        );
        assert_eq!(category_options(&[]), vec!["All"]);
    }

    #[test]
    fn selection_falls_back_to_visible() {
        let visible = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let none = BTreeSet::new();
        assert_eq!(selected_or_visible(&visible, &none), visible);

        let stale: BTreeSet<String> = ["z".to_string()].into();
        assert_eq!(selected_or_visible(&visible, &stale), visible);

        let some: BTreeSet<String> = ["c".to_string(), "a".to_string(), "z".to_string()].into();
        assert_eq!(selected_or_visible(&visible, &some), vec!["a", "c"]);
    }

    #[test]
    fn group_names_parse() {
        assert_eq!("Burst / Stream".parse::<WsGroup>().unwrap(), WsGroup::BurstStream);
        assert_eq!("payload".parse::<WsGroup>().unwrap(), WsGroup::Payload);
        assert!("latency".parse::<WsGroup>().is_err());
        for g in WsGroup::ALL_GROUPS {
            assert_eq!(g.label().parse::<WsGroup>().unwrap(), g);
        }
    }
}

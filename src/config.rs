use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Classifier configuration
// ---------------------------------------------------------------------------

/// A `pattern → category` entry. Tables of these are scanned in order and
/// the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: String,
}

impl CategoryRule {
    pub fn new(pattern: &str, category: &str) -> Self {
        CategoryRule {
            pattern: pattern.to_string(),
            category: category.to_string(),
        }
    }
}

/// Data tables that drive classification and metric discovery.
///
/// Adding a benchmark family means adding entries here; none of the
/// detection code branches on specific names.
///
/// ```json
/// {
///   "category_prefixes": [{ "pattern": "h2-", "category": "HTTP/2" }],
///   "metric_keywords": ["latency", "cpu"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Matched against the lower-cased file name with `starts_with`.
    pub category_prefixes: Vec<CategoryRule>,
    /// Matched against the lower-cased full path with `contains`.
    pub category_path_parts: Vec<CategoryRule>,
    /// A column is a metric when its lower-cased name contains one of these.
    pub metric_keywords: Vec<String>,
    /// Websocket x-axis candidates in priority order.
    pub x_axis_candidates: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            category_prefixes: vec![
                CategoryRule::new("ws-", "WebSocket"),
                CategoryRule::new("st-", "Static"),
                CategoryRule::new("dy-", "Dynamic"),
                CategoryRule::new("grpc-", "gRPC"),
            ],
            category_path_parts: vec![
                CategoryRule::new("websocket", "WebSocket"),
                CategoryRule::new("static", "Static"),
                CategoryRule::new("dynamic", "Dynamic"),
                CategoryRule::new("local", "Local"),
                CategoryRule::new("grpc", "gRPC"),
            ],
            metric_keywords: [
                "cpu",
                "mem",
                "latency",
                "throughput",
                "energy",
                "power",
                "requests",
                "messages",
                "samples",
                "rate",
                "size",
                "duration",
                "interval",
                "bursts",
                "time",
                "execution",
                "runtime",
                "clients",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            x_axis_candidates: [
                "Num Clients",
                "Message Size (KB)",
                "Rate (msg/s)",
                "Bursts",
                "Duration (s)",
                "Interval (s)",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

impl ClassifierConfig {
    /// Read a JSON config file. Omitted fields keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: ClassifierConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::debug!(
            "Loaded classifier config: {} prefixes, {} path parts, {} keywords",
            config.category_prefixes.len(),
            config.category_path_parts.len(),
            config.metric_keywords.len()
        );
        Ok(config)
    }
}

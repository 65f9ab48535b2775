use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::config::ClassifierConfig;
use crate::data::axis::axis_title;
use crate::data::filter::{
    category_options, is_visible, selected_or_visible, WsGroup, ALL_CATEGORIES,
};
use crate::data::loader::{find_csv_files, load_file, LoadError};
use crate::data::metrics::intersect_metrics;
use crate::data::model::{LoadedFile, Series};
use crate::data::series::{plot_series, ChartKind, SeriesSummary};

// ---------------------------------------------------------------------------
// Plot request result
// ---------------------------------------------------------------------------

/// Everything a front end needs to draw one overlay chart.
#[derive(Debug, Clone, Serialize)]
pub struct Plot {
    pub metric: String,
    pub x_axis: String,
    pub kind: ChartKind,
    /// One entry per plotted file, in draw order.
    pub series: Vec<Series>,
    pub summary: Option<SeriesSummary>,
}

// ---------------------------------------------------------------------------
// Workbench state
// ---------------------------------------------------------------------------

/// Loaded files plus the filter, selection and metric choices of the
/// front end. Independent of any rendering.
pub struct Workbench {
    pub config: ClassifierConfig,

    /// Loaded files in load order. Paths are unique.
    files: Vec<LoadedFile>,

    /// Active category filter, `"All"` for none.
    pub category: String,

    /// Sub-type group, only consulted for the WebSocket category.
    pub ws_group: WsGroup,

    /// Explicitly selected paths. Empty means "all visible".
    pub selected: BTreeSet<String>,

    /// Metric to plot, kept in sync with the visible files.
    pub metric: Option<String>,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl Workbench {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
            category: ALL_CATEGORIES.to_string(),
            ws_group: WsGroup::All,
            selected: BTreeSet::new(),
            metric: None,
        }
    }

    pub fn files(&self) -> &[LoadedFile] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&LoadedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Load every path that is not already loaded.
    ///
    /// Known paths are skipped so the first classification sticks. Returns
    /// the failures; every other file is added.
    pub fn add_files<P: AsRef<str>>(&mut self, paths: &[P]) -> Vec<LoadError> {
        let mut known: HashSet<String> = self.files.iter().map(|f| f.path.clone()).collect();
        let mut errors = Vec::new();
        for path in paths {
            let path: &str = path.as_ref();
            if known.contains(path) {
                log::debug!("Skipping already loaded {path}");
                continue;
            }
            match load_file(path, &self.config) {
                Ok(file) => {
                    known.insert(file.path.clone());
                    self.files.push(file);
                }
                Err(e) => errors.push(e),
            }
        }
        log::info!(
            "{} files loaded, {} failed in this batch",
            self.files.len(),
            errors.len()
        );
        self.refresh_metric();
        errors
    }

    /// Recursively add every CSV below `dir`.
    pub fn add_folder(&mut self, dir: &Path) -> Result<Vec<LoadError>> {
        let paths: Vec<String> = find_csv_files(dir)
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        if paths.is_empty() {
            bail!("No CSV files found in {}", dir.display());
        }
        Ok(self.add_files(&paths))
    }

    /// Forget all files and reset every choice.
    pub fn clear(&mut self) {
        self.files.clear();
        self.category = ALL_CATEGORIES.to_string();
        self.ws_group = WsGroup::All;
        self.selected.clear();
        self.metric = None;
    }

    pub fn set_category_filter(&mut self, category: &str) {
        self.category = category.to_string();
        self.refresh_metric();
    }

    pub fn set_ws_group(&mut self, group: WsGroup) {
        self.ws_group = group;
        self.refresh_metric();
    }

    /// Choose a metric. Returns `false` and leaves the choice untouched if
    /// it is not plottable for every visible file.
    pub fn set_metric(&mut self, metric: &str) -> bool {
        if self.available_metrics().contains(metric) {
            self.metric = Some(metric.to_string());
            true
        } else {
            false
        }
    }

    pub fn category_options(&self) -> Vec<String> {
        category_options(&self.files)
    }

    fn visible(&self) -> impl Iterator<Item = &LoadedFile> + '_ {
        self.files
            .iter()
            .filter(|f| is_visible(f, &self.category, self.ws_group))
    }

    pub fn visible_files(&self) -> Vec<String> {
        self.visible().map(|f| f.path.clone()).collect()
    }

    /// Visible files to plot: the selection, or everything visible.
    pub fn selected_files(&self) -> Vec<String> {
        selected_or_visible(&self.visible_files(), &self.selected)
    }

    pub fn available_metrics(&self) -> BTreeSet<String> {
        intersect_metrics(self.visible(), &self.config)
    }

    /// Keep the current metric if it survived the change, else take the
    /// first available one.
    fn refresh_metric(&mut self) {
        let metrics = self.available_metrics();
        let keep = self.metric.as_ref().is_some_and(|m| metrics.contains(m));
        if !keep {
            self.metric = metrics.into_iter().next();
        }
    }

    /// Series for the selected files with the current metric.
    pub fn plot(&self, kind: ChartKind) -> Option<Plot> {
        let metric = self.metric.as_deref()?;
        let files: Vec<&LoadedFile> = self
            .selected_files()
            .iter()
            .filter_map(|p| self.file(p))
            .collect();
        if files.is_empty() {
            return None;
        }

        let first = files.first().copied();
        let series = plot_series(files.iter().copied(), metric, &self.config);
        Some(Plot {
            metric: metric.to_string(),
            x_axis: axis_title(first, &self.config),
            kind: kind.resolve(first.map(|f| f.schema)),
            summary: SeriesSummary::from_series(metric, &series),
            series,
        })
    }
}

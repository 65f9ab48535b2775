use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use benchplot::data::filter::WsGroup;
use benchplot::data::metrics::{summarize_column, Summary};
use benchplot::data::series::ChartKind;
use benchplot::{ClassifierConfig, LoadError, SchemaType, Workbench, WsSubtype};

#[derive(Parser)]
#[command(name = "benchplot")]
#[command(about = "Classify CSV benchmark results and derive overlay plot series", long_about = None)]
struct Cli {
    /// JSON file with category tables, metric keywords and x-axis candidates.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show how each file was classified.
    Inspect {
        #[command(flatten)]
        input: Input,
        #[arg(long)]
        json: bool,
        /// Also report min / max / avg of this column per file.
        #[arg(long)]
        summary: Option<String>,
    },
    /// List metrics common to every visible file.
    Metrics {
        #[command(flatten)]
        input: Input,
    },
    /// Print plot series for the visible files as JSON.
    Plot {
        #[command(flatten)]
        input: Input,
        /// Metric column to plot; defaults to the first common metric.
        #[arg(long)]
        metric: Option<String>,
        /// auto, bar or line.
        #[arg(long, default_value = "auto")]
        kind: ChartKind,
    },
}

#[derive(Args)]
struct Input {
    /// CSV files or folders (searched recursively).
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Category filter, e.g. WebSocket or Static.
    #[arg(long, default_value = "All")]
    category: String,

    /// Websocket group: All, Concurrency, Payload or "Burst / Stream".
    #[arg(long, default_value = "All")]
    ws_group: WsGroup,
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a str,
    name: String,
    schema: SchemaType,
    category: &'a str,
    ws_subtype: Option<WsSubtype>,
    rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ClassifierConfig::from_path(path)?,
        None => ClassifierConfig::default(),
    };
    let mut workbench = Workbench::new(config);

    match cli.command {
        Command::Inspect {
            input,
            json,
            summary,
        } => {
            load(&mut workbench, &input);
            inspect(&workbench, json, summary.as_deref())
        }
        Command::Metrics { input } => {
            load(&mut workbench, &input);
            for metric in workbench.available_metrics() {
                println!("{metric}");
            }
            Ok(())
        }
        Command::Plot {
            input,
            metric,
            kind,
        } => {
            load(&mut workbench, &input);
            match plot_json(&mut workbench, metric.as_deref(), kind)? {
                Some(json) => println!("{json}"),
                None => eprintln!("Nothing to plot: no visible files or no common metric"),
            }
            Ok(())
        }
    }
}

/// Load every input path, reporting per-file failures and carrying on.
fn load(workbench: &mut Workbench, input: &Input) {
    let mut errors: Vec<LoadError> = Vec::new();
    for path in &input.paths {
        if path.is_dir() {
            match workbench.add_folder(path) {
                Ok(errs) => errors.extend(errs),
                Err(e) => eprintln!("Error: {e:#}"),
            }
        } else {
            errors.extend(workbench.add_files(&[path.to_string_lossy().into_owned()]));
        }
    }
    for e in &errors {
        eprintln!("Error: {e}");
    }
    if workbench.files().is_empty() {
        eprintln!("No files could be loaded");
    }

    workbench.set_category_filter(&input.category);
    workbench.set_ws_group(input.ws_group);
    log::info!(
        "{} loaded, {} visible",
        workbench.files().len(),
        workbench.visible_files().len()
    );
}

/// Pretty JSON for the current plot, or `None` when there is nothing to
/// draw. Only an explicitly requested metric that is not plottable for
/// every visible file is an error.
fn plot_json(
    workbench: &mut Workbench,
    metric: Option<&str>,
    kind: ChartKind,
) -> Result<Option<String>> {
    if let Some(metric) = metric {
        if !workbench.set_metric(metric) {
            bail!("Metric {metric:?} is not available for every visible file");
        }
    }
    workbench
        .plot(kind)
        .map(|plot| serde_json::to_string_pretty(&plot))
        .transpose()
        .map_err(Into::into)
}

fn inspect(workbench: &Workbench, json: bool, column: Option<&str>) -> Result<()> {
    let visible = workbench.visible_files();
    let reports: Vec<FileReport> = workbench
        .files()
        .iter()
        .filter(|f| visible.contains(&f.path))
        .map(|f| FileReport {
            path: &f.path,
            name: f.file_name(),
            schema: f.schema,
            category: &f.category,
            ws_subtype: f.ws_subtype,
            rows: f.len(),
            summary: column.and_then(|c| summarize_column(f, c)),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for r in &reports {
        println!(
            "{}  [{}]  {}  {}  ({} rows)",
            r.name,
            r.schema,
            r.category,
            r.ws_subtype.map_or("-", |s| s.as_str()),
            r.rows
        );
        if let (Some(column), Some(summary)) = (column, r.summary) {
            println!("    {column}: {summary}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(paths: Vec<PathBuf>) -> Input {
        Input {
            paths,
            category: "All".to_string(),
            ws_group: WsGroup::All,
        }
    }

    fn write(dir: &std::path::Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn unreadable_inputs_leave_an_empty_workbench() {
        let dir = tempfile::tempdir().unwrap();
        let mut wb = Workbench::default();
        load(&mut wb, &input(vec![dir.path().join("missing.csv")]));
        assert!(wb.files().is_empty());
        assert!(wb.available_metrics().is_empty());
        assert_eq!(plot_json(&mut wb, None, ChartKind::Auto).unwrap(), None);
    }

    #[test]
    fn no_common_metric_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.csv", "Foo\n1\n");
        let b = write(dir.path(), "b.csv", "Bar\n2\n");
        let mut wb = Workbench::default();
        load(&mut wb, &input(vec![a, b]));
        assert_eq!(wb.files().len(), 2);
        assert_eq!(plot_json(&mut wb, None, ChartKind::Auto).unwrap(), None);
    }

    #[test]
    fn unavailable_metric_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.csv", "Latency,CPU\n1,2\n");
        let b = write(dir.path(), "b.csv", "Latency\n3\n");
        let mut wb = Workbench::default();
        load(&mut wb, &input(vec![a, b]));

        assert!(plot_json(&mut wb, Some("CPU"), ChartKind::Auto).is_err());
        let json = plot_json(&mut wb, Some("Latency"), ChartKind::Line)
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metric"], "Latency");
        assert_eq!(value["kind"], "line");
        assert_eq!(value["series"].as_array().unwrap().len(), 2);
    }
}

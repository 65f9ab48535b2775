//! Classification and plot-series derivation for CSV benchmark results.
//!
//! A front end hands [`state::Workbench`] a batch of paths, lets the user
//! pick a category, sub-type group and metric, and receives ready-to-draw
//! [`data::model::Series`] back. Drawing itself happens elsewhere.

pub mod config;
pub mod data;
pub mod state;

pub use config::{CategoryRule, ClassifierConfig};
pub use data::loader::{load_files, LoadError, LoadFailure};
pub use data::model::{LoadedFile, SchemaType, Series, WsSubtype};
pub use state::{Plot, Workbench};

/// Data layer: loading, classification and series derivation.
///
/// Architecture:
/// ```text
///   results/**/*.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → header + rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ classify  │  schema, category, websocket sub-type (once per file)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category / sub-type group → visible files
///   └──────────┘
///        │
///        ├──────────────► metrics   columns plottable in every visible file
///        ▼
///   ┌──────────┐
///   │  series   │  axis + coerce → (x, y, label) per file
///   └──────────┘
/// ```

pub mod axis;
pub mod classify;
pub mod coerce;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod series;

/// Data layer: catalog types, loading, session cache, and search.
///
/// Architecture:
/// ```text
///  TAP (csv over HTTP) / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  fetch    │  CatalogSource + CatalogCache (once per query)
///   └──────────┘
///        │ loader: parse table → Vec<Record>
///        ▼
///   ┌──────────────┐
///   │ ScoredCatalog │  Vec<ScoredRecord>, facility index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  name query → indices sorted by habitability
///   └──────────┘
/// ```

pub mod fetch;
pub mod filter;
pub mod loader;
pub mod model;

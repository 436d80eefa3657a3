/// Data layer: core types, loading, filtering and ranking.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file (+ WKT boundaries) → NeighborhoodTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ NeighborhoodTable │  read-only base table, one row per neighborhood
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  chosen names → derived sub-table
///   └──────────┘
///        │
///        ├──────────────► ranking     (top / bottom three)
///        └──────────────► choropleth  (map model, see crate::choropleth)
/// ```

pub mod boundary;
pub mod filter;
pub mod loader;
pub mod model;
pub mod ranking;

/// Data layer: dataset descriptions, loading, and set combination analysis.
///
/// Architecture:
/// ```text
///  datasets.json ──► description.json ──► payload.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read catalog + CSV, split header
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌────────────┐
///   │   sets    │ ───► │    mask     │  row → union of set ids
///   └──────────┘      └────────────┘
///        │                  │
///        ▼                  ▼
///   ┌────────────┐    ┌──────────┐
///   │ attributes  │    │ subsets   │  2^n - 1 combinations of active sets
///   └────────────┘    └──────────┘
/// ```

pub mod attributes;
pub mod description;
pub mod diagnostics;
pub mod loader;
pub mod mask;
pub mod model;
pub mod sets;
pub mod subsets;

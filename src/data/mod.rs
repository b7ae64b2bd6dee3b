/// Data layer: loading, normalization, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read first sheet → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  validate columns, parse dates → ActivityTable
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  criteria / text search → FilteredView
///   └──────────┘
///        │
///        ├──▶ aggregate   counts, sums, rankings per view
///        └──▶ export      CSV of the displayed rows
/// ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;

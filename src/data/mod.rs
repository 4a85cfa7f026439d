/// Data layer: core types, loading, filtering, aggregation, and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, drop incomplete rows → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, distinct-value indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category/supplier selection → filtered Dataset
///   └──────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌──────────┐      ┌──────────┐
///   │ aggregate │      │  export   │  totals, grouped views / CSV file
///   └──────────┘      └──────────┘
/// ```
pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

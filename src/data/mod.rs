//! Data layer: the column-wise table, loading, and record grouping.
//!
//! Architecture:
//! ```text
//!  .parquet / .csv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Table    │  column catalog + column arrays
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ grouping  │  partition row indices by RECNO → records
//!   └──────────┘
//! ```

pub mod grouping;
pub mod loader;
pub mod model;

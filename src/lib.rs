//! Reader and plotting views for Madrigal tabular data exports.
//!
//! Madrigal distributes upper-atmosphere measurements as flat row tables:
//! each row carries a record number (`RECNO`, one record per instrument
//! scan), an altitude (`GDALT`), six date/time columns, and the measured
//! observables. This crate loads such an export into per-column arrays
//! and derives the three things a plot needs:
//!
//! * [`view::build_image`] – a (bins × records) matrix of one observable
//! * [`view::build_altitude_axis`] – the y axis, optionally checked for
//!   consistency across records
//! * [`view::build_record_timestamps`] – the x axis, one timestamp per
//!   record
//!
//! ```no_run
//! use std::path::Path;
//!
//! let table = madrigal_view::load_table(Path::new("mlh160102g.parquet"))?;
//! let image = madrigal_view::view::build_image(&table, "VIPN2")?;
//! let altitudes = madrigal_view::view::altitude_axis(&table)?;
//! let times = madrigal_view::view::record_timestamps_utc(&table)?;
//! assert_eq!(image.dim(), (altitudes.len() / times.len(), times.len()));
//! # Ok::<(), madrigal_view::MadrigalError>(())
//! ```

pub mod data;
pub mod error;
pub mod view;

pub use data::loader::{list_columns, load_table};
pub use data::model::{Table, RECNO_COLUMN};
pub use error::{MadrigalError, Result};

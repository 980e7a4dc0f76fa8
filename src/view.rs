//! Derived plotting views over a loaded [`Table`]: the 2D observable
//! image, the altitude axis, and the per-record timestamps.

use chrono::{DateTime, TimeZone, Utc};
use ndarray::Array2;

use crate::data::grouping::{record_first_indices, record_indices, record_order};
use crate::data::model::Table;
use crate::error::{MadrigalError, Result};

/// Column used for the altitude axis unless the caller picks another.
pub const DEFAULT_ALTITUDE_COLUMN: &str = "GDALT";

/// Absolute tolerance for the altitude consistency check. Differences
/// between records are required to be this close to zero.
const VALIDATE_TOLERANCE: f64 = 1e-8;

/// Build the 2D image of one observable, shaped (bins, records).
///
/// Column k of the result holds the observable restricted to the rows of
/// the k-th record, records ordered by first appearance. Every record must
/// cover the same number of bins; the fixed altitude grid of a Madrigal
/// instrument guarantees this for well-formed files, and ragged files fail
/// with [`MadrigalError::ShapeMismatch`].
pub fn build_image(table: &Table, observable: &str) -> Result<Array2<f64>> {
    let values = table.column(observable)?;
    let recnos = table.recnos()?;

    let order = record_order(recnos);
    if order.is_empty() {
        return Ok(Array2::zeros((0, 0)));
    }

    let expected = record_indices(recnos, order[0]).len();
    let mut image = Array2::zeros((expected, order.len()));
    for (k, &recno) in order.iter().enumerate() {
        let indices = record_indices(recnos, recno);
        if indices.len() != expected {
            return Err(MadrigalError::ShapeMismatch {
                recno,
                expected,
                found: indices.len(),
            });
        }
        for (bin, &row) in indices.iter().enumerate() {
            image[[bin, k]] = values[row];
        }
    }

    log::debug!(
        "built {}x{} image of {observable}",
        image.nrows(),
        image.ncols()
    );
    Ok(image)
}

/// Build the altitude (y) axis for plotting.
///
/// Returns the whole altitude column. The reference restricted it by
/// `RECNO == RECNO`, which selects every row; the semantics are identical,
/// so the restriction is dropped here. With `validate`, each record's
/// altitude sequence from the second onward is compared against the first
/// record's and all elementwise differences must be within tolerance of
/// zero, else [`MadrigalError::Validation`].
pub fn build_altitude_axis(
    table: &Table,
    altitude_column: &str,
    validate: bool,
) -> Result<Vec<f64>> {
    let altitudes = table.column(altitude_column)?;

    if validate {
        let recnos = table.recnos()?;
        let order = record_order(recnos);
        if let Some((&first, rest)) = order.split_first() {
            let reference: Vec<f64> = record_indices(recnos, first)
                .iter()
                .map(|&i| altitudes[i])
                .collect();
            for &recno in rest {
                let indices = record_indices(recnos, recno);
                if indices.len() != reference.len() {
                    return Err(MadrigalError::ShapeMismatch {
                        recno,
                        expected: reference.len(),
                        found: indices.len(),
                    });
                }
                for (bin, &row) in indices.iter().enumerate() {
                    let difference = altitudes[row] - reference[bin];
                    if difference.abs() > VALIDATE_TOLERANCE {
                        return Err(MadrigalError::Validation {
                            recno,
                            index: bin,
                            difference,
                        });
                    }
                }
            }
        }
    }

    Ok(altitudes.to_vec())
}

/// Unvalidated altitude axis from the default GDALT column.
pub fn altitude_axis(table: &Table) -> Result<Vec<f64>> {
    build_altitude_axis(table, DEFAULT_ALTITUDE_COLUMN, false)
}

/// Build the timestamp (x) axis: one timezone-aware timestamp per record,
/// in first-appearance order.
///
/// The six date/time components are read at each record's first row and
/// truncated toward zero, matching how Madrigal stores them (integers in
/// float columns). Component combinations that name no valid calendar
/// instant fail with [`MadrigalError::InvalidDate`].
pub fn build_record_timestamps<Tz: TimeZone>(
    table: &Table,
    timezone: &Tz,
) -> Result<Vec<DateTime<Tz>>> {
    let recnos = table.recnos()?;
    let years = table.column("YEAR")?;
    let months = table.column("MONTH")?;
    let days = table.column("DAY")?;
    let hours = table.column("HOUR")?;
    let minutes = table.column("MIN")?;
    let seconds = table.column("SEC")?;

    let mut timestamps = Vec::new();
    for i in record_first_indices(recnos) {
        let recno = recnos[i];
        let year = years[i] as i32;
        let month = months[i] as u32;
        let day = days[i] as u32;
        let hour = hours[i] as u32;
        let minute = minutes[i] as u32;
        let second = seconds[i] as u32;

        let timestamp = timezone
            .with_ymd_and_hms(year, month, day, hour, minute, second)
            .single()
            .ok_or(MadrigalError::InvalidDate {
                recno,
                year,
                month,
                day,
                hour,
                minute,
                second,
            })?;
        timestamps.push(timestamp);
    }
    Ok(timestamps)
}

/// Record timestamps in UTC, the usual timezone for Madrigal data.
pub fn record_timestamps_utc(table: &Table) -> Result<Vec<DateTime<Utc>>> {
    build_record_timestamps(table, &Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use ndarray::array;
    use std::collections::BTreeMap;

    fn table(columns: &[(&str, Vec<f64>)]) -> Table {
        let names: Vec<String> = columns.iter().map(|(n, _)| n.to_string()).collect();
        let map: BTreeMap<String, Vec<f64>> = columns
            .iter()
            .map(|(n, v)| (n.to_string(), v.clone()))
            .collect();
        Table::new(names, map)
    }

    #[test]
    fn image_is_bins_by_records() {
        let t = table(&[
            ("RECNO", vec![1.0, 1.0, 2.0, 2.0]),
            ("VIPN2", vec![10.0, 20.0, 30.0, 40.0]),
        ]);
        let image = build_image(&t, "VIPN2").unwrap();
        assert_eq!(image, array![[10.0, 30.0], [20.0, 40.0]]);
    }

    #[test]
    fn image_handles_interleaved_records() {
        let t = table(&[
            ("RECNO", vec![1.0, 2.0, 1.0, 2.0]),
            ("VIPN2", vec![10.0, 30.0, 20.0, 40.0]),
        ]);
        let image = build_image(&t, "VIPN2").unwrap();
        assert_eq!(image, array![[10.0, 30.0], [20.0, 40.0]]);
    }

    #[test]
    fn ragged_records_fail_with_shape_mismatch() {
        let t = table(&[
            ("RECNO", vec![1.0, 1.0, 1.0, 2.0, 2.0]),
            ("VIPN2", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        ]);
        let err = build_image(&t, "VIPN2").unwrap_err();
        assert!(matches!(
            err,
            MadrigalError::ShapeMismatch {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn image_of_unknown_observable_is_an_error() {
        let t = table(&[("RECNO", vec![1.0])]);
        assert!(matches!(
            build_image(&t, "VIPN2").unwrap_err(),
            MadrigalError::UnknownColumn { .. }
        ));
    }

    #[test]
    fn empty_table_yields_empty_image() {
        let t = table(&[("RECNO", vec![]), ("VIPN2", vec![])]);
        let image = build_image(&t, "VIPN2").unwrap();
        assert_eq!(image.dim(), (0, 0));
    }

    #[test]
    fn altitude_axis_is_whole_column() {
        let t = table(&[
            ("RECNO", vec![1.0, 1.0, 2.0, 2.0]),
            ("GDALT", vec![100.0, 200.0, 100.0, 200.0]),
        ]);
        let axis = build_altitude_axis(&t, "GDALT", false).unwrap();
        assert_eq!(axis, vec![100.0, 200.0, 100.0, 200.0]);
        assert_eq!(altitude_axis(&t).unwrap(), axis);
    }

    #[test]
    fn consistent_altitudes_pass_validation() {
        let t = table(&[
            ("RECNO", vec![1.0, 1.0, 2.0, 2.0]),
            ("GDALT", vec![100.0, 200.0, 100.0, 200.0]),
        ]);
        assert!(build_altitude_axis(&t, "GDALT", true).is_ok());
    }

    #[test]
    fn drifting_altitudes_fail_validation() {
        let t = table(&[
            ("RECNO", vec![1.0, 1.0, 2.0, 2.0]),
            ("GDALT", vec![100.0, 200.0, 100.0, 201.0]),
        ]);
        let err = build_altitude_axis(&t, "GDALT", true).unwrap_err();
        assert!(matches!(
            err,
            MadrigalError::Validation {
                index: 1,
                difference,
                ..
            } if difference == 1.0
        ));
    }

    fn dated_table(recnos: Vec<f64>, months: Vec<f64>) -> Table {
        let n = recnos.len();
        table(&[
            ("RECNO", recnos),
            ("YEAR", vec![2016.0; n]),
            ("MONTH", months),
            ("DAY", vec![15.0; n]),
            ("HOUR", vec![12.0; n]),
            ("MIN", vec![30.0; n]),
            ("SEC", vec![5.0; n]),
        ])
    }

    #[test]
    fn one_timestamp_per_record() {
        let t = dated_table(vec![1.0, 1.0, 2.0, 2.0], vec![1.0, 1.0, 2.0, 2.0]);
        let stamps = record_timestamps_utc(&t).unwrap();
        assert_eq!(stamps.len(), 2);
        assert_eq!(
            stamps[0],
            Utc.with_ymd_and_hms(2016, 1, 15, 12, 30, 5).unwrap()
        );
        assert_eq!(
            stamps[1],
            Utc.with_ymd_and_hms(2016, 2, 15, 12, 30, 5).unwrap()
        );
    }

    #[test]
    fn timestamps_honour_the_caller_timezone() {
        let t = dated_table(vec![1.0], vec![1.0]);
        let offset = FixedOffset::east_opt(3600).unwrap();
        let stamps = build_record_timestamps(&t, &offset).unwrap();
        assert_eq!(stamps[0].offset(), &offset);
        assert_eq!(
            stamps[0],
            offset.with_ymd_and_hms(2016, 1, 15, 12, 30, 5).unwrap()
        );
    }

    #[test]
    fn impossible_calendar_date_is_rejected() {
        let t = dated_table(vec![1.0], vec![13.0]);
        let err = record_timestamps_utc(&t).unwrap_err();
        assert!(matches!(err, MadrigalError::InvalidDate { month: 13, .. }));
    }

    #[test]
    fn fractional_components_are_truncated() {
        // Madrigal stores integers in float columns; 1.9 means month 1.
        let t = dated_table(vec![1.0], vec![1.9]);
        let stamps = record_timestamps_utc(&t).unwrap();
        assert_eq!(
            stamps[0],
            Utc.with_ymd_and_hms(2016, 1, 15, 12, 30, 5).unwrap()
        );
    }
}

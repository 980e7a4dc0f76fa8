// ---------------------------------------------------------------------------
// Record grouping: partition row indices by RECNO value
// ---------------------------------------------------------------------------

/// Distinct record numbers in the order they first appear when scanning
/// rows 0..N. This order drives every per-record iteration in the derived
/// views: image columns, validation passes, and timestamps.
pub fn record_order(recnos: &[f64]) -> Vec<f64> {
    let mut order: Vec<f64> = Vec::new();
    for &recno in recnos {
        if !order.iter().any(|&seen| seen == recno) {
            order.push(recno);
        }
    }
    order
}

/// Indices of the rows belonging to one record.
///
/// Membership is plain `f64` equality with no tolerance, matching how the
/// RECNO column is produced (small integers stored as floats). Row order
/// within the group is preserved.
pub fn record_indices(recnos: &[f64], recno: f64) -> Vec<usize> {
    recnos
        .iter()
        .enumerate()
        .filter(|(_, &r)| r == recno)
        .map(|(i, _)| i)
        .collect()
}

/// The first row index of each record, in [`record_order`].
///
/// Used where only one representative row per record is needed, such as
/// reading the date columns for a record's timestamp.
pub fn record_first_indices(recnos: &[f64]) -> Vec<usize> {
    let mut order: Vec<f64> = Vec::new();
    let mut firsts: Vec<usize> = Vec::new();
    for (i, &recno) in recnos.iter().enumerate() {
        if !order.iter().any(|&seen| seen == recno) {
            order.push(recno);
            firsts.push(i);
        }
    }
    firsts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_first_appearance() {
        let recnos = [3.0, 3.0, 1.0, 2.0, 1.0];
        assert_eq!(record_order(&recnos), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn indices_keep_row_order() {
        let recnos = [1.0, 2.0, 1.0, 2.0, 1.0];
        assert_eq!(record_indices(&recnos, 1.0), vec![0, 2, 4]);
        assert_eq!(record_indices(&recnos, 2.0), vec![1, 3]);
        assert!(record_indices(&recnos, 9.0).is_empty());
    }

    #[test]
    fn first_indices_follow_record_order() {
        let recnos = [3.0, 3.0, 1.0, 2.0, 1.0];
        assert_eq!(record_first_indices(&recnos), vec![0, 2, 3]);
    }

    #[test]
    fn empty_table_has_no_records() {
        assert!(record_order(&[]).is_empty());
    }

    #[test]
    fn equality_is_exact() {
        // 1.0 and 1.0000001 are distinct records; no tolerance applies.
        let recnos = [1.0, 1.000_000_1];
        assert_eq!(record_order(&recnos).len(), 2);
    }
}

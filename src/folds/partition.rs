//! Group-aware k-fold partitioning.
//!
//! Groups are packed greedily, largest first, into whichever fold currently
//! holds the fewest rows. Whole groups move together, so no group is ever
//! split between two test sets. The greedy packing approximately balances
//! fold sizes; it does not search for the globally best balance.

use std::collections::BTreeMap;

use crate::error::{DepthFoldError, Result};

/// Default number of folds.
pub const DEFAULT_N_SPLITS: usize = 5;

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// Output of [`GroupKFold::split`]: the fold holding each row in its test set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    n_splits: usize,
    fold_of_row: Vec<usize>,
    groups_per_fold: Vec<usize>,
}

impl Partition {
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Fold id per row, each in `0..n_splits`.
    pub fn fold_of_row(&self) -> &[usize] {
        &self.fold_of_row
    }

    /// Number of distinct groups assigned to each fold.
    pub fn groups_per_fold(&self) -> &[usize] {
        &self.groups_per_fold
    }

    /// Test-set size per fold.
    pub fn fold_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_splits];
        for &fold in &self.fold_of_row {
            sizes[fold] += 1;
        }
        sizes
    }

    /// Ascending row indices of fold `fold`'s test set.
    pub fn test_indices(&self, fold: usize) -> Vec<usize> {
        self.fold_of_row
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f == fold)
            .map(|(i, _)| i)
            .collect()
    }

    /// Ascending row indices of fold `fold`'s train set: every other row.
    pub fn train_indices(&self, fold: usize) -> Vec<usize> {
        self.fold_of_row
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f != fold)
            .map(|(i, _)| i)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// GroupKFold
// ---------------------------------------------------------------------------

/// k-fold splitter that keeps every group inside a single test fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupKFold {
    n_splits: usize,
}

impl GroupKFold {
    /// Create a splitter; at least 2 folds are required.
    pub fn new(n_splits: usize) -> Result<Self> {
        if n_splits < 2 {
            return Err(DepthFoldError::Configuration(format!(
                "number of folds must be at least 2, got {n_splits}"
            )));
        }
        Ok(GroupKFold { n_splits })
    }

    /// Partition rows by their group keys.
    ///
    /// Groups are visited by descending size, ties broken by ascending key,
    /// and each goes to the fold with the fewest rows so far (lowest id on
    /// ties). The result depends only on `keys` and the fold count.
    pub fn split<K: Ord>(&self, keys: &[K]) -> Result<Partition> {
        if keys.is_empty() {
            return Err(DepthFoldError::Configuration(
                "cannot split an empty dataset".to_string(),
            ));
        }

        let mut groups: BTreeMap<&K, Vec<usize>> = BTreeMap::new();
        for (row, key) in keys.iter().enumerate() {
            groups.entry(key).or_default().push(row);
        }
        if groups.len() < self.n_splits {
            return Err(DepthFoldError::Configuration(format!(
                "cannot split {} distinct groups into {} folds",
                groups.len(),
                self.n_splits
            )));
        }

        // BTreeMap iteration is ascending by key; the stable sort keeps that
        // order among groups of equal size.
        let mut ordered: Vec<Vec<usize>> = groups.into_values().collect();
        ordered.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut totals = vec![0usize; self.n_splits];
        let mut groups_per_fold = vec![0usize; self.n_splits];
        let mut fold_of_row = vec![0usize; keys.len()];

        for rows in &ordered {
            let fold = lightest_fold(&totals);
            totals[fold] += rows.len();
            groups_per_fold[fold] += 1;
            for &row in rows {
                fold_of_row[row] = fold;
            }
            log::debug!("group of {} rows -> fold {fold}", rows.len());
        }

        Ok(Partition {
            n_splits: self.n_splits,
            fold_of_row,
            groups_per_fold,
        })
    }
}

/// Index of the smallest running total, lowest index on ties.
fn lightest_fold(totals: &[usize]) -> usize {
    totals
        .iter()
        .enumerate()
        .min_by_key(|&(fold, &total)| (total, fold))
        .map_or(0, |(fold, _)| fold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn keys(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn largest_group_goes_first() {
        let keys = keys(&["a", "a", "b", "b", "b", "c"]);
        let partition = GroupKFold::new(3).unwrap().split(&keys).unwrap();
        // b (3 rows) -> fold 0, a (2 rows) -> fold 1, c (1 row) -> fold 2.
        assert_eq!(partition.fold_of_row(), &[1, 1, 0, 0, 0, 2]);
        assert_eq!(partition.test_indices(0), vec![2, 3, 4]);
        assert_eq!(partition.train_indices(0), vec![0, 1, 5]);
        assert_eq!(partition.groups_per_fold(), &[1, 1, 1]);
    }

    #[test]
    fn equal_sizes_break_ties_by_key() {
        let keys = keys(&["z", "y", "x", "z", "y", "x"]);
        let partition = GroupKFold::new(3).unwrap().split(&keys).unwrap();
        // x, y, z in key order to folds 0, 1, 2.
        assert_eq!(partition.fold_of_row(), &[2, 1, 0, 2, 1, 0]);
    }

    #[test]
    fn later_groups_fill_the_lightest_fold() {
        // Sizes: a=4, b=3, c=2, d=2, e=1.
        let keys = keys(&["a", "a", "a", "a", "b", "b", "b", "c", "c", "d", "d", "e"]);
        let partition = GroupKFold::new(2).unwrap().split(&keys).unwrap();
        // a->0 (4), b->1 (3), c->1 (5), d->0 (6), e->1 (6).
        assert_eq!(partition.fold_sizes(), vec![6, 6]);
        assert_eq!(partition.test_indices(0), vec![0, 1, 2, 3, 9, 10]);
        assert_eq!(partition.test_indices(1), vec![4, 5, 6, 7, 8, 11]);
    }

    #[test]
    fn missing_keys_form_one_group() {
        let keys = vec![None, Some("a"), None, Some("b"), Some("a"), None];
        let partition = GroupKFold::new(2).unwrap().split(&keys).unwrap();
        let fold = partition.fold_of_row()[0];
        assert_eq!(partition.fold_of_row()[2], fold);
        assert_eq!(partition.fold_of_row()[5], fold);
    }

    #[test]
    fn signed_zero_keys_share_a_group() {
        let keys = vec![
            CellValue::Float(0.0),
            CellValue::Float(-0.0),
            CellValue::Float(1.0),
            CellValue::Float(-0.0),
        ];
        let partition = GroupKFold::new(2).unwrap().split(&keys).unwrap();
        assert_eq!(partition.fold_of_row(), &[0, 0, 1, 0]);
        assert!(GroupKFold::new(3).unwrap().split(&keys).is_err());
    }

    #[test]
    fn too_few_groups_is_a_configuration_error() {
        let keys = keys(&["a", "b", "c", "a"]);
        let err = GroupKFold::new(5).unwrap().split(&keys).unwrap_err();
        assert!(matches!(err, DepthFoldError::Configuration(_)));
    }

    #[test]
    fn fewer_than_two_folds_is_rejected() {
        assert!(GroupKFold::new(0).is_err());
        assert!(GroupKFold::new(1).is_err());
        assert!(GroupKFold::new(2).is_ok());
    }

    #[test]
    fn empty_input_is_rejected() {
        let keys: Vec<String> = Vec::new();
        assert!(GroupKFold::new(2).unwrap().split(&keys).is_err());
    }

    #[test]
    fn split_is_deterministic() {
        let keys: Vec<String> = (0..200).map(|i| format!("g{}", (i * 7) % 23)).collect();
        let splitter = GroupKFold::new(5).unwrap();
        let first = splitter.split(&keys).unwrap();
        let second = splitter.split(&keys).unwrap();
        assert_eq!(first, second);
    }
}

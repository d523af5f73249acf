use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::partition::Partition;
use crate::error::{DepthFoldError, Result};

/// One train/test split; both index lists ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Serializable view of a [`Partition`]: index lists per fold and a fold id
/// per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldReport {
    pub folds: Vec<FoldIndices>,
    pub fold_ids: Vec<usize>,
}

impl From<&Partition> for FoldReport {
    fn from(partition: &Partition) -> Self {
        let folds = (0..partition.n_splits())
            .map(|fold| FoldIndices {
                train: partition.train_indices(fold),
                test: partition.test_indices(fold),
            })
            .collect();
        FoldReport {
            folds,
            fold_ids: partition.fold_of_row().to_vec(),
        }
    }
}

impl FoldReport {
    pub fn n_rows(&self) -> usize {
        self.fold_ids.len()
    }

    /// Rebuild per-row fold ids from the test lists alone.
    ///
    /// Fails if a row is tested twice, never, or lies out of range.
    pub fn fold_ids_from_tests(folds: &[FoldIndices], n_rows: usize) -> Result<Vec<usize>> {
        let mut ids: Vec<Option<usize>> = vec![None; n_rows];
        for (fold, indices) in folds.iter().enumerate() {
            for &row in &indices.test {
                let slot = ids.get_mut(row).ok_or_else(|| {
                    DepthFoldError::Configuration(format!(
                        "fold {fold} tests row {row} but there are only {n_rows} rows"
                    ))
                })?;
                if let Some(previous) = slot.replace(fold) {
                    return Err(DepthFoldError::Configuration(format!(
                        "row {row} is tested by folds {previous} and {fold}"
                    )));
                }
            }
        }
        ids.into_iter()
            .enumerate()
            .map(|(row, id)| {
                id.ok_or_else(|| {
                    DepthFoldError::Configuration(format!("row {row} is not tested by any fold"))
                })
            })
            .collect()
    }

    /// Check the report against the group keys it was built from: tests
    /// cover every row exactly once, each train list is the complement of
    /// its test list, and every group sits in one fold.
    pub fn verify<K: Ord>(&self, keys: &[K]) -> Result<()> {
        if keys.len() != self.n_rows() {
            return Err(DepthFoldError::Configuration(format!(
                "report covers {} rows but {} keys were given",
                self.n_rows(),
                keys.len()
            )));
        }

        let rebuilt = Self::fold_ids_from_tests(&self.folds, self.n_rows())?;
        if rebuilt != self.fold_ids {
            return Err(DepthFoldError::Configuration(
                "per-row fold ids disagree with the test lists".to_string(),
            ));
        }

        for (fold, indices) in self.folds.iter().enumerate() {
            let expected: Vec<usize> = (0..self.n_rows())
                .filter(|&row| self.fold_ids[row] != fold)
                .collect();
            if indices.train != expected {
                return Err(DepthFoldError::Configuration(format!(
                    "fold {fold} train list is not the complement of its test list"
                )));
            }
        }

        let mut fold_of_group: BTreeMap<&K, usize> = BTreeMap::new();
        for (row, key) in keys.iter().enumerate() {
            let fold = self.fold_ids[row];
            let owner = *fold_of_group.entry(key).or_insert(fold);
            if owner != fold {
                return Err(DepthFoldError::Configuration(format!(
                    "row {row} splits its group across folds {owner} and {fold}"
                )));
            }
        }
        Ok(())
    }
}

//! Run settings for the two pipeline steps, with the tool's defaults.

use std::path::{Path, PathBuf};

use crate::folds::DEFAULT_N_SPLITS;

/// Name of the label column written by interval annotation.
pub const INTERVAL_COLUMN: &str = "interval";

/// Name of the per-row fold column in the auxiliary table.
pub const FOLD_COLUMN: &str = "fold";

/// Settings for adding the interval column.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalConfig {
    pub depth_col: String,
    /// JSON list of `[start, end]` pairs replacing the default table.
    pub intervals_json: Option<PathBuf>,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        IntervalConfig {
            depth_col: "Depth".to_string(),
            intervals_json: None,
        }
    }
}

/// Settings for fold generation.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldConfig {
    pub group_col: String,
    /// Used for stable row order within a group, and for binning with `from_depth`.
    pub depth_col: String,
    /// Excluded from spectral columns, otherwise unused.
    pub target_col: String,
    pub n_splits: usize,
    /// Derive the group column from `depth_col` instead of reading it.
    pub from_depth: bool,
    pub intervals_json: Option<PathBuf>,
    /// Remove rows without a group key before partitioning.
    pub drop_unlabeled: bool,
}

impl Default for FoldConfig {
    fn default() -> Self {
        FoldConfig {
            group_col: INTERVAL_COLUMN.to_string(),
            depth_col: "depth".to_string(),
            target_col: "totalREE".to_string(),
            n_splits: DEFAULT_N_SPLITS,
            from_depth: false,
            intervals_json: None,
            drop_unlabeled: false,
        }
    }
}

impl FoldConfig {
    /// Interval file to bin with. Only `from_depth` bins, so without it the
    /// file is never read.
    pub fn intervals_path(&self) -> Option<&Path> {
        if self.from_depth {
            self.intervals_json.as_deref()
        } else {
            None
        }
    }
}

/// Default annotated-table path: `cores.csv` → `cores_interval.csv`.
pub fn default_interval_output(input: &Path) -> PathBuf {
    let text = input.to_string_lossy();
    let stem = if text.to_ascii_lowercase().ends_with(".csv") {
        &text[..text.len() - 4]
    } else {
        &text[..]
    };
    PathBuf::from(format!("{stem}_interval.csv"))
}

/// Auxiliary per-row fold table written next to the fold JSON.
pub fn aux_folds_path(out: &Path) -> PathBuf {
    out.with_extension("aux_folds.csv")
}

//! The two processing steps over an in-memory table: interval annotation
//! and fold generation. File I/O stays with the caller.

use std::collections::BTreeMap;

use crate::binning::{DepthBinner, IntervalTable};
use crate::config::{FOLD_COLUMN, FoldConfig, INTERVAL_COLUMN};
use crate::data::filter::{labeled_indices, spectral_columns};
use crate::data::model::{CellValue, Dataset};
use crate::error::Result;
use crate::folds::{FoldReport, GroupKFold, GroupSource, stable_order};

// ---------------------------------------------------------------------------
// Interval annotation
// ---------------------------------------------------------------------------

/// Add or overwrite the `interval` column from the depth column.
pub fn annotate_intervals(
    dataset: &mut Dataset,
    depth_col: &str,
    table: &IntervalTable,
) -> Result<()> {
    let labels = DepthBinner::new(table).label_column(dataset, depth_col)?;
    dataset.set_column(INTERVAL_COLUMN, labels)
}

/// Row count per interval label, sorted by label, with unlabelled rows
/// (`None`) last.
pub fn interval_counts(dataset: &Dataset) -> Result<Vec<(Option<String>, usize)>> {
    let idx = dataset.resolve_column(INTERVAL_COLUMN)?;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut missing = 0;
    for cell in dataset.column(idx) {
        if cell.is_missing() {
            missing += 1;
        } else {
            *counts.entry(cell.to_string()).or_default() += 1;
        }
    }
    let mut summary: Vec<(Option<String>, usize)> =
        counts.into_iter().map(|(label, n)| (Some(label), n)).collect();
    if missing > 0 {
        summary.push((None, missing));
    }
    Ok(summary)
}

/// Text table of the first `limit` entries of [`interval_counts`], one
/// `label count` line each under a header.
pub fn format_interval_counts(counts: &[(Option<String>, usize)], limit: usize) -> String {
    let mut text = format!("Interval counts (first {limit} shown):");
    for (label, n) in counts.iter().take(limit) {
        text.push_str(&format!("\n{:<16} {n}", label.as_deref().unwrap_or("<none>")));
    }
    text
}

// ---------------------------------------------------------------------------
// Fold generation
// ---------------------------------------------------------------------------

/// Result of fold generation.
#[derive(Debug, Clone)]
pub struct FoldRun {
    /// Input rows in partition order, with a trailing `fold` column.
    pub table: Dataset,
    /// Fold index lists; indices refer to rows of `table`.
    pub report: FoldReport,
    /// Names of the numeric-named spectral columns found.
    pub spectral_columns: Vec<String>,
}

/// Sort rows by group and depth, then split them into group-aware folds.
pub fn make_folds(
    mut dataset: Dataset,
    config: &FoldConfig,
    table: &IntervalTable,
) -> Result<FoldRun> {
    let source = if config.from_depth {
        GroupSource::Intervals {
            depth_col: config.depth_col.clone(),
            table: table.clone(),
        }
    } else {
        GroupSource::Column(config.group_col.clone())
    };
    let mut keys = source.keys(&dataset)?;
    if config.from_depth {
        dataset.set_column(&config.group_col, keys.clone())?;
    }

    if config.drop_unlabeled {
        let keep = labeled_indices(&keys);
        let dropped = keys.len() - keep.len();
        if dropped > 0 {
            log::warn!("dropping {dropped} rows without a group key");
        }
        dataset = dataset.reordered(&keep);
        keys = keep.iter().map(|&i| keys[i].clone()).collect();
    }

    let depth_idx = dataset.find_column(&config.depth_col);
    let depths: Option<Vec<CellValue>> =
        depth_idx.map(|idx| dataset.column(idx).cloned().collect());
    let order = stable_order(&keys, depths.as_deref());
    let dataset = dataset.reordered(&order);
    let keys: Vec<CellValue> = order.iter().map(|&i| keys[i].clone()).collect();

    let spectral = find_spectral_columns(&dataset, config, depth_idx);
    if spectral.is_empty() {
        log::warn!("no numeric-named spectral columns detected; proceeding with groups only");
    } else {
        log::info!("{} spectral columns detected", spectral.len());
    }

    let splitter = GroupKFold::new(config.n_splits)?;
    let partition = splitter.split(&keys)?;
    let report = FoldReport::from(&partition);
    report.verify(&keys)?;

    for (fold, (size, groups)) in partition
        .fold_sizes()
        .iter()
        .zip(partition.groups_per_fold())
        .enumerate()
    {
        log::info!("fold {fold}: {size} test rows from {groups} groups");
    }

    let mut table_out = dataset;
    let fold_cells = report
        .fold_ids
        .iter()
        .map(|&f| CellValue::Integer(f as i64))
        .collect();
    table_out.set_column(FOLD_COLUMN, fold_cells)?;

    Ok(FoldRun {
        table: table_out,
        report,
        spectral_columns: spectral,
    })
}

fn find_spectral_columns(
    dataset: &Dataset,
    config: &FoldConfig,
    depth_idx: Option<usize>,
) -> Vec<String> {
    let group_idx = dataset.find_column(&config.group_col);
    let mut excluded: Vec<&str> = vec![
        config.group_col.as_str(),
        config.depth_col.as_str(),
        config.target_col.as_str(),
    ];
    for idx in [group_idx, depth_idx].into_iter().flatten() {
        excluded.push(dataset.column_names[idx].as_str());
    }
    spectral_columns(dataset, &excluded)
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn cores() -> Dataset {
        let depths = [6.2, 7.4, 6.1, 9.5, 7.0, 8.5, 6.9, 200.0];
        Dataset::new(
            vec!["Depth".into(), "400".into(), "totalREE".into()],
            depths
                .iter()
                .enumerate()
                .map(|(i, &d)| {
                    vec![
                        CellValue::Float(d),
                        CellValue::Float(0.1 * i as f64),
                        CellValue::Integer(i as i64),
                    ]
                })
                .collect(),
        )
    }

    fn small_table() -> IntervalTable {
        IntervalTable::from_pairs(&[(6.0, 7.0), (7.0, 8.0), (8.0, 10.0)])
    }

    #[test]
    fn annotate_adds_interval_labels() {
        let mut ds = cores();
        annotate_intervals(&mut ds, "depth", &small_table()).unwrap();
        let idx = ds.resolve_column("interval").unwrap();
        let labels: Vec<CellValue> = ds.column(idx).cloned().collect();
        assert_eq!(
            labels,
            vec![
                s("6-7"),
                s("7-8"),
                s("6-7"),
                s("8-10"),
                s("7-8"),
                s("8-10"),
                s("6-7"),
                CellValue::Null,
            ]
        );
        let counts = interval_counts(&ds).unwrap();
        assert_eq!(
            counts,
            vec![
                (Some("6-7".to_string()), 3),
                (Some("7-8".to_string()), 2),
                (Some("8-10".to_string()), 2),
                (None, 1),
            ]
        );
    }

    #[test]
    fn interval_summary_is_capped() {
        let counts: Vec<(Option<String>, usize)> =
            (0..25).map(|i| (Some(format!("{i:02}-{}", i + 1)), i + 1)).collect();
        let text = format_interval_counts(&counts, 20);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 21);
        assert_eq!(lines[0], "Interval counts (first 20 shown):");
        assert_eq!(lines[1], "00-1             1");
        assert_eq!(lines[20], "19-20            20");
    }

    #[test]
    fn interval_summary_names_unlabelled_rows() {
        let mut ds = cores();
        annotate_intervals(&mut ds, "Depth", &small_table()).unwrap();
        let text = format_interval_counts(&interval_counts(&ds).unwrap(), 20);
        assert_eq!(text.lines().count(), 5);
        assert_eq!(text.lines().last(), Some("<none>           1"));
    }

    #[test]
    fn folds_from_depth_sort_and_partition() {
        let config = FoldConfig {
            depth_col: "Depth".into(),
            n_splits: 3,
            from_depth: true,
            ..FoldConfig::default()
        };
        let run = make_folds(cores(), &config, &small_table()).unwrap();

        // Sorted: 6-7 (6.1, 6.2, 6.9), 7-8 (7.0, 7.4), 8-10 (8.5, 9.5), missing (200).
        let depth: Vec<CellValue> = run.table.column(0).cloned().collect();
        assert_eq!(
            depth,
            [6.1, 6.2, 6.9, 7.0, 7.4, 8.5, 9.5, 200.0].map(CellValue::Float).to_vec()
        );
        // 6-7 (3) -> 0, 7-8 (2) -> 1, 8-10 (2) -> 2, missing (1) -> 1.
        assert_eq!(run.report.fold_ids, vec![0, 0, 0, 1, 1, 2, 2, 1]);
        assert_eq!(run.report.folds[1].test, vec![3, 4, 7]);
        assert_eq!(run.spectral_columns, vec!["400"]);
        let fold_idx = run.table.resolve_column("fold").unwrap();
        assert_eq!(run.table.rows[7][fold_idx], CellValue::Integer(1));
    }

    #[test]
    fn drop_unlabeled_removes_missing_groups() {
        let config = FoldConfig {
            depth_col: "Depth".into(),
            n_splits: 3,
            from_depth: true,
            drop_unlabeled: true,
            ..FoldConfig::default()
        };
        let run = make_folds(cores(), &config, &small_table()).unwrap();
        assert_eq!(run.table.len(), 7);
        assert_eq!(run.report.fold_ids, vec![0, 0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn missing_group_column_is_reported() {
        let err = make_folds(cores(), &FoldConfig::default(), &small_table()).unwrap_err();
        assert!(matches!(err, crate::error::DepthFoldError::MissingColumn { .. }));
    }

    #[test]
    fn more_folds_than_groups_is_rejected() {
        let config = FoldConfig {
            depth_col: "Depth".into(),
            from_depth: true,
            ..FoldConfig::default()
        };
        let err = make_folds(cores(), &config, &small_table()).unwrap_err();
        assert!(matches!(err, crate::error::DepthFoldError::Configuration(_)));
    }
}

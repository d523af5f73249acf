use std::collections::BTreeSet;

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// Whether a column name reads as a number, e.g. `"400"` or `"401.5"`.
pub fn is_numeric_column_name(name: &str) -> bool {
    name.trim().parse::<f64>().is_ok()
}

/// Spectral (feature) columns: numeric names not listed in `excluded`.
///
/// Exclusions compare against the names exactly as given.
pub fn spectral_columns<'a>(dataset: &'a Dataset, excluded: &[&str]) -> Vec<&'a str> {
    let excluded: BTreeSet<&str> = excluded.iter().copied().collect();
    dataset
        .column_names
        .iter()
        .map(String::as_str)
        .filter(|name| !excluded.contains(name) && is_numeric_column_name(name))
        .collect()
}

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Indices of rows whose group key is present.
pub fn labeled_indices(keys: &[CellValue]) -> Vec<usize> {
    keys.iter()
        .enumerate()
        .filter(|(_, key)| !key.is_missing())
        .map(|(i, _)| i)
        .collect()
}

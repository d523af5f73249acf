use std::cmp::Ordering;

use crate::binning::{DepthBinner, IntervalTable};
use crate::data::model::{CellValue, Dataset};
use crate::error::Result;

/// Where each row's group key comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupSource {
    /// An existing categorical column, used verbatim.
    Column(String),
    /// The interval label of a depth column.
    Intervals {
        depth_col: String,
        table: IntervalTable,
    },
}

impl GroupSource {
    /// Group key per row. Missing keys come back as [`CellValue::Null`].
    pub fn keys(&self, dataset: &Dataset) -> Result<Vec<CellValue>> {
        match self {
            GroupSource::Column(name) => {
                let idx = dataset.resolve_column(name)?;
                Ok(dataset
                    .column(idx)
                    .map(|cell| if cell.is_missing() { CellValue::Null } else { cell.clone() })
                    .collect())
            }
            GroupSource::Intervals { depth_col, table } => {
                DepthBinner::new(table).label_column(dataset, depth_col)
            }
        }
    }
}

/// Row permutation sorting by group key, then depth. Missing values sort
/// last; equal rows keep their input order.
pub fn stable_order(keys: &[CellValue], depths: Option<&[CellValue]>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| {
        cmp_missing_last(&keys[a], &keys[b]).then_with(|| match depths {
            Some(depths) => cmp_depth(&depths[a], &depths[b]),
            None => Ordering::Equal,
        })
    });
    order
}

fn cmp_missing_last(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

fn cmp_depth(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => cmp_missing_last(a, b),
    }
}

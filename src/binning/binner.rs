use super::table::{Interval, IntervalTable};
use crate::data::model::{CellValue, Dataset};
use crate::error::Result;

/// Maps depths onto the labels of an [`IntervalTable`].
///
/// Every interval but the last is half-open, `start <= depth < end`; the last
/// is closed, `start <= depth <= end`, so the deepest sample still lands in a
/// bin. A depth on a shared boundary belongs to the interval starting there.
#[derive(Debug, Clone, Copy)]
pub struct DepthBinner<'a> {
    table: &'a IntervalTable,
}

impl<'a> DepthBinner<'a> {
    pub fn new(table: &'a IntervalTable) -> Self {
        DepthBinner { table }
    }

    /// First interval containing `depth`, scanning in table order.
    pub fn locate(&self, depth: f64) -> Option<&'a Interval> {
        let intervals = self.table.intervals();
        let last = intervals.len().checked_sub(1)?;
        intervals.iter().enumerate().find_map(|(i, iv)| {
            let inside = if i < last {
                iv.start <= depth && depth < iv.end
            } else {
                iv.start <= depth && depth <= iv.end
            };
            inside.then_some(iv)
        })
    }

    /// Label for a depth, or `None` when it is missing or outside every interval.
    pub fn label_for(&self, depth: Option<f64>) -> Option<&'a str> {
        depth.and_then(|d| self.locate(d)).map(Interval::label)
    }

    /// Label for a table cell; non-numeric cells have no label.
    pub fn label_for_cell(&self, cell: &CellValue) -> Option<&'a str> {
        self.label_for(cell.as_f64())
    }

    /// Interval label per row of the named depth column, as group-key cells.
    pub fn label_column(&self, dataset: &Dataset, depth_col: &str) -> Result<Vec<CellValue>> {
        let idx = dataset.resolve_column(depth_col)?;
        let labels: Vec<CellValue> = dataset
            .column(idx)
            .map(|cell| CellValue::from(self.label_for_cell(cell).map(str::to_string)))
            .collect();

        let unlabeled = labels.iter().filter(|c| c.is_missing()).count();
        if unlabeled > 0 {
            log::warn!(
                "{unlabeled} of {} rows have no interval for column '{}'",
                labels.len(),
                dataset.column_names[idx]
            );
        }
        Ok(labels)
    }
}

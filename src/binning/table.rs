use std::path::Path;

use anyhow::Context;
use serde_json::Value as JsonValue;

use crate::error::{DepthFoldError, Result};

/// Depth ranges used when no interval file is supplied, as `(start, end)`.
pub const DEFAULT_INTERVALS: [(f64, f64); 69] = [
    (6.0, 7.0), (7.0, 8.006), (8.006, 9.0), (9.0, 10.0), (10.0, 11.0), (11.0, 12.007),
    (12.007, 13.5), (13.5, 15.0), (15.0, 17.6), (17.6, 19.0), (19.0, 21.0), (21.0, 23.0),
    (23.0, 25.007), (25.007, 27.0), (27.0, 29.0), (29.0, 29.6), (29.6, 31.008),
    (31.008, 32.007), (32.007, 33.007), (33.007, 34.0), (34.0, 34.6), (34.6, 35.9),
    (35.9, 37.008), (37.008, 38.0), (38.0, 39.008), (39.008, 40.0), (40.0, 41.0),
    (41.0, 42.007), (42.007, 43.007), (43.007, 44.0), (44.0, 45.0), (45.0, 46.0),
    (46.0, 47.008), (47.008, 48.007), (48.007, 49.007), (49.007, 50.01), (50.01, 51.01),
    (51.01, 51.71), (51.71, 53.3), (53.3, 55.008), (55.008, 56.007), (56.007, 57.006),
    (57.006, 57.7), (57.7, 59.0), (59.0, 61.6), (61.6, 63.007), (63.007, 64.704),
    (64.704, 66.018), (66.018, 67.0), (67.0, 68.0), (68.0, 69.5), (69.5, 71.008),
    (71.008, 73.007), (73.007, 73.7), (73.7, 75.0), (75.0, 77.0), (77.0, 79.0),
    (79.0, 81.0), (81.0, 83.0), (83.0, 84.1), (84.1, 85.006), (85.006, 86.007),
    (86.007, 87.0), (87.0, 88.0), (88.0, 89.0), (89.0, 90.6), (90.6, 92.8),
    (92.8, 94.008), (94.008, 95.0),
];

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// A labelled depth range. The label joins the boundary texts with `-`.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
    label: String,
}

impl Interval {
    /// Boundaries rendered with their shortest decimal form (`6` → `"6"`).
    pub fn new(start: f64, end: f64) -> Self {
        Self::with_text(start, end, &start.to_string(), &end.to_string())
    }

    /// Boundaries rendered exactly as the given texts.
    pub fn with_text(start: f64, end: f64, start_text: &str, end_text: &str) -> Self {
        Interval {
            start,
            end,
            label: format!("{start_text}-{end_text}"),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

// ---------------------------------------------------------------------------
// IntervalTable
// ---------------------------------------------------------------------------

/// Ordered, immutable sequence of intervals.
///
/// Order and overlap are not checked: lookups take the first match in table
/// order, so a malformed table classifies exactly as written.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTable {
    intervals: Vec<Interval>,
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self::from_pairs(&DEFAULT_INTERVALS)
    }
}

impl IntervalTable {
    pub fn new(intervals: Vec<Interval>) -> Self {
        IntervalTable { intervals }
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().map(|&(s, e)| Interval::new(s, e)).collect())
    }

    /// Parse a JSON list of `[start, end]` pairs, e.g. `[[6, 7], [7, 8.006]]`.
    ///
    /// Entries may hold numbers or numeric strings; extra elements after the
    /// first two are ignored. Labels keep the boundary text as written.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let root: JsonValue = serde_json::from_str(text).map_err(|e| {
            DepthFoldError::invalid_interval_document(format!("not valid JSON: {e}"))
        })?;
        let entries = root.as_array().ok_or_else(|| {
            DepthFoldError::invalid_interval_document("top-level value is not a list")
        })?;

        let intervals = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_entry(index, entry))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(intervals))
    }

    /// Load an interval table from a JSON file.
    pub fn load_json(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading intervals from {}", path.display()))?;
        let table = Self::from_json_str(&text)
            .with_context(|| format!("loading intervals from {}", path.display()))?;
        log::info!("loaded {} intervals from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

fn parse_entry(index: usize, entry: &JsonValue) -> Result<Interval> {
    let pair = entry
        .as_array()
        .ok_or_else(|| DepthFoldError::invalid_interval(index, format!("{entry} is not a list")))?;
    if pair.len() < 2 {
        return Err(DepthFoldError::invalid_interval(
            index,
            format!("expected 2 elements, found {}", pair.len()),
        ));
    }
    let (start, start_text) = parse_bound(index, &pair[0])?;
    let (end, end_text) = parse_bound(index, &pair[1])?;
    Ok(Interval::with_text(start, end, &start_text, &end_text))
}

fn parse_bound(index: usize, value: &JsonValue) -> Result<(f64, String)> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_f64().map(|v| (v, n.to_string())),
        JsonValue::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<f64>().ok().map(|v| (v, trimmed.to_string()))
        }
        _ => None,
    };
    parsed.ok_or_else(|| {
        DepthFoldError::invalid_interval(index, format!("{value} is not a number"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_spans_six_to_ninety_five() {
        let table = IntervalTable::default();
        assert_eq!(table.len(), 69);
        assert_eq!(table.intervals()[0].label(), "6-7");
        assert_eq!(table.intervals()[1].label(), "7-8.006");
        assert_eq!(table.intervals()[37].label(), "51.01-51.71");
        assert_eq!(table.intervals()[68].label(), "94.008-95");
    }

    #[test]
    fn default_table_is_contiguous() {
        let table = IntervalTable::default();
        for pair in table.intervals().windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(pair[0].start < pair[0].end);
        }
    }

    #[test]
    fn json_labels_keep_boundary_text() {
        let table = IntervalTable::from_json_str(r#"[[6, 7], [7, 8.006], ["8.006", 9.0, "extra"]]"#)
            .unwrap();
        let labels: Vec<&str> = table.intervals().iter().map(Interval::label).collect();
        assert_eq!(labels, vec!["6-7", "7-8.006", "8.006-9.0"]);
        assert_eq!(table.intervals()[2].start, 8.006);
    }

    #[test]
    fn json_short_entry_is_rejected() {
        let err = IntervalTable::from_json_str("[[6, 7], [7]]").unwrap_err();
        assert!(matches!(err, DepthFoldError::InvalidIntervalFormat { index: Some(1), .. }));
    }

    #[test]
    fn json_non_numeric_entry_is_rejected() {
        let err = IntervalTable::from_json_str(r#"[[6, "deep"]]"#).unwrap_err();
        assert!(matches!(err, DepthFoldError::InvalidIntervalFormat { index: Some(0), .. }));
        let err = IntervalTable::from_json_str(r#"[{"start": 6, "end": 7}]"#).unwrap_err();
        assert!(matches!(err, DepthFoldError::InvalidIntervalFormat { index: Some(0), .. }));
        let err = IntervalTable::from_json_str("{}").unwrap_err();
        assert!(matches!(err, DepthFoldError::InvalidIntervalFormat { index: None, .. }));
        let err = IntervalTable::from_json_str("[[6, 7],").unwrap_err();
        assert!(matches!(err, DepthFoldError::InvalidIntervalFormat { index: None, .. }));
    }

    #[test]
    fn json_order_is_kept_as_written() {
        let table = IntervalTable::from_json_str("[[10, 20], [0, 10]]").unwrap();
        assert_eq!(table.intervals()[0].label(), "10-20");
    }
}

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::error::{DepthFoldError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
/// Cells double as group keys, so `CellValue` must be `Ord`.
///
/// Equality follows the ordering. `0.0` and `-0.0` are one key, but an
/// integer and a float never are: `1` and `1.0` in a group column stay
/// separate groups.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can sort rows and key groups by CellValue --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                String(_) => 3,
            }
        }
        // -0.0 + 0.0 is +0.0, so signed zeros compare equal.
        fn unsigned_zero(v: f64) -> f64 {
            v + 0.0
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => unsigned_zero(*a).total_cmp(&unsigned_zero(*b)),
            // Mixed numeric columns compare by value; ties keep ints first.
            (Integer(a), Float(b)) => (*a as f64)
                .total_cmp(&unsigned_zero(*b))
                .then(Ordering::Less),
            (Float(a), Integer(b)) => unsigned_zero(*a)
                .total_cmp(&(*b as f64))
                .then(Ordering::Greater),
            (String(a), String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the cell as a number. Numeric text parses; NaN counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(_) | CellValue::Null => return None,
        };
        if v.is_nan() {
            None
        } else {
            Some(v)
        }
    }

    /// Missing marker: null cells and NaN floats.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Text written to a CSV field. Missing values become empty fields and
    /// whole floats keep a trailing `.0` so they read back as floats.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Float(v) if v.is_nan() => String::new(),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                format!("{v:.1}")
            }
            CellValue::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(CellValue::Null, CellValue::String)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// A table of samples: ordered column names and one row of cells per sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Column names in file order.
    pub column_names: Vec<String>,
    /// Rows, each with exactly `column_names.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Dataset { column_names, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a column name to its position: exact match first, then a
    /// case-insensitive match.
    pub fn resolve_column(&self, name: &str) -> Result<usize> {
        if let Some(idx) = self.column_names.iter().position(|c| c == name) {
            return Ok(idx);
        }
        let lowercase: HashMap<String, usize> = self
            .column_names
            .iter()
            .enumerate()
            .map(|(i, c)| (c.to_lowercase(), i))
            .collect();
        lowercase
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| DepthFoldError::missing_column(name, &self.column_names))
    }

    /// Like [`Dataset::resolve_column`] but yields `None` instead of an error.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.resolve_column(name).ok()
    }

    /// Iterate over one column's cells.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Add a column at the end, or overwrite it in place if the exact name exists.
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(DepthFoldError::Configuration(format!(
                "column '{name}' has {} values but the table has {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        match self.column_names.iter().position(|c| c == name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.column_names.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// New dataset holding the rows at `order`, in that order.
    pub fn reordered(&self, order: &[usize]) -> Dataset {
        Dataset {
            column_names: self.column_names.clone(),
            rows: order.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

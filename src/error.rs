use thiserror::Error;

/// Errors raised by interval binning and fold partitioning.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DepthFoldError {
    /// Named column absent, even after case-insensitive lookup.
    #[error("column '{column}' not found; available: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// An interval entry is not a `[start, end]` pair of numbers, or the
    /// document is not a list at all (`index` is `None`).
    #[error(
        "invalid interval{}: {reason}; expected a list of [start, end] pairs",
        entry_suffix(.index)
    )]
    InvalidIntervalFormat {
        index: Option<usize>,
        reason: String,
    },

    /// Fold count out of range, too few groups, or an empty dataset.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DepthFoldError {
    pub fn missing_column(column: impl Into<String>, available: &[String]) -> Self {
        Self::MissingColumn {
            column: column.into(),
            available: available.to_vec(),
        }
    }

    pub fn invalid_interval(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidIntervalFormat {
            index: Some(index),
            reason: reason.into(),
        }
    }

    pub fn invalid_interval_document(reason: impl Into<String>) -> Self {
        Self::InvalidIntervalFormat {
            index: None,
            reason: reason.into(),
        }
    }
}

fn entry_suffix(index: &Option<usize>) -> String {
    index.map_or_else(String::new, |i| format!(" at entry {i}"))
}

pub type Result<T> = std::result::Result<T, DepthFoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_errors_name_the_entry_when_known() {
        let entry = DepthFoldError::invalid_interval(3, "expected 2 elements, found 1");
        assert!(entry.to_string().starts_with("invalid interval at entry 3: expected 2"));

        let document = DepthFoldError::invalid_interval_document("top-level value is not a list");
        assert!(document.to_string().starts_with("invalid interval: top-level value"));
    }
}

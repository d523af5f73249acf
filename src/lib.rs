//! Depth-interval labelling and group-aware k-fold splits for depth-indexed
//! spectral datasets.
//!
//! Each sample gets an interval label from its depth, and samples sharing a
//! label are kept together in one test fold so that no depth interval leaks
//! between training and evaluation.
//!
//! ```
//! use depthfold::binning::{DepthBinner, IntervalTable};
//! use depthfold::folds::{FoldReport, GroupKFold};
//!
//! let table = IntervalTable::from_pairs(&[(6.0, 7.0), (7.0, 8.0)]);
//! let binner = DepthBinner::new(&table);
//! let keys: Vec<Option<&str>> = [6.0, 6.9, 7.0, 8.0]
//!     .iter()
//!     .map(|&d| binner.label_for(Some(d)))
//!     .collect();
//! assert_eq!(keys, vec![Some("6-7"), Some("6-7"), Some("7-8"), Some("7-8")]);
//!
//! let partition = GroupKFold::new(2).unwrap().split(&keys).unwrap();
//! let report = FoldReport::from(&partition);
//! assert_eq!(report.fold_ids, vec![0, 0, 1, 1]);
//! ```

pub mod binning;
pub mod config;
pub mod data;
pub mod error;
pub mod folds;
pub mod pipeline;

pub use error::{DepthFoldError, Result};

//! Fold layer: group keys, partitioning and the serializable report.
//!
//! ```text
//!   Dataset -> groups -> keys -> partition -> Partition -> report -> FoldReport
//! ```

pub mod groups;
pub mod partition;
pub mod report;

pub use groups::{GroupSource, stable_order};
pub use partition::{DEFAULT_N_SPLITS, GroupKFold, Partition};
pub use report::{FoldIndices, FoldReport};

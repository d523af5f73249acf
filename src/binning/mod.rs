//! Depth → interval labelling.

pub mod binner;
pub mod table;

pub use binner::DepthBinner;
pub use table::{DEFAULT_INTERVALS, Interval, IntervalTable};

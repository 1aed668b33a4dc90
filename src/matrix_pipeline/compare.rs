//! Matrix comparison module
//!
//! This module computes absolute-difference matrices and threshold verdicts.

mod comparator;
pub mod types;


pub use comparator::{abs_diff, compare};
pub use types::{
    ComparisonResult, ComparisonSummary, ThresholdConfig, ThresholdConfigBuilder, Verdict,
};

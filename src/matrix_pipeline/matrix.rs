//! Canonical matrix module
//!
//! Every decode path converges on [`Matrix`] and every encode path starts from it.

pub mod format;
pub mod types;

pub use format::FormatTag;
pub use types::{ElementType, Matrix, MatrixData, Shape};

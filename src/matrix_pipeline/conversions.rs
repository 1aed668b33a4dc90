//! Pipeline conversions module
//!
//! This module contains orchestration logic for converting, comparing and
//! analysing matrix files.

mod pipeline;
pub mod types;

#[cfg(test)]
mod tests;

pub use pipeline::MatrixPipeline;
pub use types::{PipelineConfig, PipelineConfigBuilder};

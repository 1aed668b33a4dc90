//! Comparison configuration and result types

use serde::Serialize;

use crate::matrix_pipeline::matrix::{Matrix, Shape};

/// Thresholds applied to a difference matrix
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ThresholdConfig {
    /// A cell exceeds when its absolute difference is strictly greater than this
    pub absolute: f64,
    /// Largest share of exceeding cells, in percent, that still passes
    pub percentage: f64,
}

impl ThresholdConfig {
    pub fn new(absolute: f64, percentage: f64) -> Self {
        Self {
            absolute,
            percentage,
        }
    }

    pub fn builder() -> ThresholdConfigBuilder {
        ThresholdConfigBuilder::default()
    }

    /// Both thresholds are non-negative numbers.
    pub fn is_valid(&self) -> bool {
        self.absolute >= 0.0 && self.percentage >= 0.0
    }
}

/// Builder for ThresholdConfig
#[derive(Default)]
pub struct ThresholdConfigBuilder {
    absolute: Option<f64>,
    percentage: Option<f64>,
}

impl ThresholdConfigBuilder {
    pub fn absolute(mut self, threshold: f64) -> Self {
        self.absolute = Some(threshold);
        self
    }

    pub fn percentage(mut self, threshold: f64) -> Self {
        self.percentage = Some(threshold);
        self
    }

    pub fn build(self) -> ThresholdConfig {
        let default = ThresholdConfig::default();
        ThresholdConfig {
            absolute: self.absolute.unwrap_or(default.absolute),
            percentage: self.percentage.unwrap_or(default.percentage),
        }
    }
}

/// Pass/fail outcome of a threshold comparison. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Difference matrix plus threshold statistics for one comparison
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    /// Element-wise absolute difference, same shape as the inputs
    pub diff: Matrix,
    /// (row, column) cells where any channel's difference exceeds the
    /// absolute threshold
    pub exceeding: usize,
    /// Cells compared (`rows * cols`, independent of the channel count)
    pub total: usize,
    /// `exceeding / total` in percent (0 when nothing was compared)
    pub percentage: f64,
    pub verdict: Verdict,
    pub thresholds: ThresholdConfig,
}

impl ComparisonResult {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary {
            shape: self.diff.shape(),
            exceeding: self.exceeding,
            total: self.total,
            percentage: self.percentage,
            verdict: self.verdict,
            thresholds: self.thresholds,
        }
    }
}

/// Serializable view of a [`ComparisonResult`] without the diff samples
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub shape: Shape,
    pub exceeding: usize,
    pub total: usize,
    pub percentage: f64,
    pub verdict: Verdict,
    pub thresholds: ThresholdConfig,
}

//! Pipeline configuration types

use serde::Serialize;

use crate::matrix_pipeline::compare::ThresholdConfig;
use crate::matrix_pipeline::raw::RawFormatConfig;

/// Configuration for file conversion and comparison
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PipelineConfig {
    /// Geometry used to interpret `.raw` inputs
    pub raw: RawFormatConfig,
    /// Thresholds applied by comparisons
    pub thresholds: ThresholdConfig,
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    raw: Option<RawFormatConfig>,
    thresholds: Option<ThresholdConfig>,
}

impl PipelineConfigBuilder {
    pub fn raw(mut self, raw: RawFormatConfig) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn thresholds(mut self, thresholds: ThresholdConfig) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            raw: self.raw.unwrap_or(default.raw),
            thresholds: self.thresholds.unwrap_or(default.thresholds),
        }
    }
}

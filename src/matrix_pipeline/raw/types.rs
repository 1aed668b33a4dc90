//! RAW sensor frame configuration types

use serde::Serialize;

/// Default frame width of the sensor in pixels
pub const DEFAULT_RAW_WIDTH: usize = 2592;

/// Default frame height of the sensor in pixels
pub const DEFAULT_RAW_HEIGHT: usize = 1944;

/// Sample encoding of a RAW sensor dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RawSampleType {
    /// 16-bit unsigned little-endian samples carrying 10 significant bits
    #[default]
    Unsigned16,
    /// Any other persisted selector value; not decodable
    Other(u32),
}

impl RawSampleType {
    /// Maps the persisted integer selector (0 = 16-bit unsigned).
    pub fn from_selector(selector: u32) -> Self {
        match selector {
            0 => Self::Unsigned16,
            other => Self::Other(other),
        }
    }
}

/// Geometry and sample type of a RAW sensor dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RawFormatConfig {
    pub sample_type: RawSampleType,
    /// Frame width in pixels
    pub width: usize,
    /// Frame height in pixels
    pub height: usize,
}

impl Default for RawFormatConfig {
    fn default() -> Self {
        Self {
            sample_type: RawSampleType::Unsigned16,
            width: DEFAULT_RAW_WIDTH,
            height: DEFAULT_RAW_HEIGHT,
        }
    }
}

impl RawFormatConfig {
    pub fn builder() -> RawFormatConfigBuilder {
        RawFormatConfigBuilder::default()
    }

    /// Number of samples in one frame, `None` on overflow
    pub fn sample_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }
}

/// Builder for RawFormatConfig
#[derive(Default)]
pub struct RawFormatConfigBuilder {
    sample_type: Option<RawSampleType>,
    width: Option<usize>,
    height: Option<usize>,
}

impl RawFormatConfigBuilder {
    pub fn sample_type(mut self, sample_type: RawSampleType) -> Self {
        self.sample_type = Some(sample_type);
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: usize) -> Self {
        self.height = Some(height);
        self
    }

    pub fn build(self) -> RawFormatConfig {
        let default = RawFormatConfig::default();
        RawFormatConfig {
            sample_type: self.sample_type.unwrap_or(default.sample_type),
            width: self.width.unwrap_or(default.width),
            height: self.height.unwrap_or(default.height),
        }
    }
}

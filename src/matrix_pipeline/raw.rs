//! RAW sensor frame module
//!
//! This module decodes header-less, fixed-geometry sensor dumps into 8-bit matrices.

mod reader;
mod sensor_decoder;
pub mod types;

pub use reader::RawFrameReader;
pub use sensor_decoder::{RAW_RESCALE, RawSensorDecoder, rescale_sample};
pub use types::{
    DEFAULT_RAW_HEIGHT, DEFAULT_RAW_WIDTH, RawFormatConfig, RawFormatConfigBuilder, RawSampleType,
};

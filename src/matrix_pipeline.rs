//! Matrix conversion and comparison pipeline
//!
//! This module loads matrices from text, XML, RAW sensor dumps and standard
//! images, writes them back out, and compares two matrices cell by cell.

pub mod codec;
pub mod common;
pub mod compare;
pub mod conversions;
pub mod histogram;
pub mod matrix;
pub mod raw;

pub use common::{
    ErrorKind,
    MatrixError,
    Result,
};

pub use matrix::{
    ElementType,
    FormatTag,
    Matrix,
    MatrixData,
    Shape,
};

pub use codec::{
    FileCodec,
    MatrixCodec,
};

pub use raw::{
    RawFormatConfig,
    RawFormatConfigBuilder,
    RawFrameReader,
    RawSampleType,
    RawSensorDecoder,
};

pub use compare::{
    ComparisonResult,
    ComparisonSummary,
    ThresholdConfig,
    ThresholdConfigBuilder,
    Verdict,
};

pub use histogram::{
    Channel,
    ChannelCounts,
};

pub use conversions::{
    MatrixPipeline,
    PipelineConfig,
    PipelineConfigBuilder,
};

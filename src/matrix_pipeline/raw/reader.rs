use std::path::Path;

use crate::matrix_pipeline::common::error::Result;
use crate::matrix_pipeline::matrix::Matrix;

pub trait RawFrameReader {
    /// Interprets `data`, read from `source`, as one sensor frame.
    fn read_raw(&self, source: &Path, data: &[u8]) -> Result<Matrix>;
}

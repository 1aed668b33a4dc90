//! Fixed-geometry RAW sensor frame decoder.
//!
//! A RAW dump carries no header: width, height and sample type come from a
//! [`RawFormatConfig`] supplied by the caller. Samples are rescaled from the
//! sensor's 10-bit range down to 8 bits, producing a single-channel image.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::matrix_pipeline::common::error::{MatrixError, Result};
use crate::matrix_pipeline::matrix::{FormatTag, Matrix};
use crate::matrix_pipeline::raw::reader::RawFrameReader;
use crate::matrix_pipeline::raw::types::{RawFormatConfig, RawSampleType};

/// Scale factor from the 10-bit significant range (0..=1023) to 8 bits.
pub const RAW_RESCALE: f64 = RESCALE_NUMERATOR / RESCALE_DENOMINATOR;

const RESCALE_NUMERATOR: f64 = 127.5;
const RESCALE_DENOMINATOR: f64 = 511.5;

/// Decoder for header-less sensor dumps of a fixed geometry.
#[derive(Debug, Clone, Default)]
pub struct RawSensorDecoder {
    config: RawFormatConfig,
}

/// Rescales one 16-bit sample to 8 bits, truncating and saturating at 255.
pub fn rescale_sample(sample: u16) -> u8 {
    // Multiply before dividing so 1023 lands exactly on 255.
    (sample as f64 * RESCALE_NUMERATOR / RESCALE_DENOMINATOR) as u8
}

impl RawSensorDecoder {
    pub fn new(config: RawFormatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RawFormatConfig {
        &self.config
    }

    /// Reads and decodes the frame stored at `path`.
    ///
    /// At most one frame worth of bytes is read; anything after it stays on
    /// disk. The read buffer lives only for the duration of this call.
    pub fn decode_file(&self, path: &Path) -> Result<Matrix> {
        let (_, expected_bytes) = self.frame_layout(path)?;

        let file = File::open(path).map_err(|e| MatrixError::io(path, e))?;
        let file_len = file.metadata().map_err(|e| MatrixError::io(path, e))?.len();

        let capacity = usize::try_from(file_len)
            .map_or(expected_bytes, |len| len.min(expected_bytes));
        let mut data = Vec::with_capacity(capacity);
        file.take(expected_bytes as u64)
            .read_to_end(&mut data)
            .map_err(|e| MatrixError::io(path, e))?;

        if file_len > expected_bytes as u64 {
            warn!(
                "Ignoring {} trailing bytes after raw frame in {}",
                file_len - expected_bytes as u64,
                path.display()
            );
        }

        self.read_raw(path, &data)
    }

    /// Bytes per sample and bytes per frame for the configured format.
    fn frame_layout(&self, source: &Path) -> Result<(usize, usize)> {
        let RawFormatConfig {
            sample_type,
            width,
            height,
        } = self.config;

        let bytes_per_sample = match sample_type {
            RawSampleType::Unsigned16 => 2,
            RawSampleType::Other(selector) => {
                return Err(MatrixError::unsupported(
                    source,
                    format!("raw sample type {} is not supported", selector),
                ));
            }
        };

        let expected_bytes = self
            .config
            .sample_count()
            .and_then(|count| count.checked_mul(bytes_per_sample))
            .filter(|&bytes| bytes > 0)
            .ok_or_else(|| MatrixError::InvalidDimensions {
                path: Some(source.to_path_buf()),
                rows: height,
                cols: width,
                channels: 1,
                len: 0,
            })?;

        Ok((bytes_per_sample, expected_bytes))
    }
}

impl RawFrameReader for RawSensorDecoder {
    /// Decodes `width * height` little-endian samples into an 8-bit matrix.
    ///
    /// # Errors
    ///
    /// * `UnsupportedFormat` - the configured sample type is not 16-bit unsigned
    /// * `InvalidDimensions` - the configured geometry is empty or overflows
    /// * `MalformedInput` - the file holds fewer bytes than one full frame
    fn read_raw(&self, source: &Path, data: &[u8]) -> Result<Matrix> {
        let (bytes_per_sample, expected_bytes) = self.frame_layout(source)?;
        let RawFormatConfig { width, height, .. } = self.config;

        debug!(
            "Decoding raw frame {}x{}, {} bytes available",
            width,
            height,
            data.len()
        );

        if data.len() < expected_bytes {
            return Err(MatrixError::malformed(
                source,
                format!(
                    "truncated raw frame: expected {} bytes for {}x{} samples, got {}",
                    expected_bytes,
                    width,
                    height,
                    data.len()
                ),
            ));
        }

        if data.len() > expected_bytes {
            warn!(
                "Ignoring {} trailing bytes after raw frame in {}",
                data.len() - expected_bytes,
                source.display()
            );
        }

        let pixels: Vec<u8> = data[..expected_bytes]
            .par_chunks_exact(bytes_per_sample)
            .map(|bytes| rescale_sample(u16::from_le_bytes([bytes[0], bytes[1]])))
            .collect();

        Ok(Matrix::from_u8(height, width, 1, pixels)
            .map_err(|e| e.in_file(source))?
            .with_format(FormatTag::RawSensor))
    }
}

//! Per-channel intensity histograms for 8-bit images

use rayon::prelude::*;
use tracing::debug;

use crate::matrix_pipeline::common::error::{MatrixError, Result};
use crate::matrix_pipeline::matrix::{Matrix, MatrixData};

/// Number of intensity levels in an 8-bit channel
pub const LEVELS: usize = 256;

/// Pixel count below which counting stays sequential
const PARALLEL_THRESHOLD: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// Frequency tables for the red, green and blue channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCounts {
    pub red: [u64; LEVELS],
    pub green: [u64; LEVELS],
    pub blue: [u64; LEVELS],
}

impl Default for ChannelCounts {
    fn default() -> Self {
        Self {
            red: [0; LEVELS],
            green: [0; LEVELS],
            blue: [0; LEVELS],
        }
    }
}

impl ChannelCounts {
    pub fn channel(&self, channel: Channel) -> &[u64; LEVELS] {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }

    /// Number of pixels counted (the sum of any one table).
    pub fn total(&self) -> u64 {
        self.red.iter().sum()
    }

    /// Counts interleaved RGB pixels.
    pub fn from_rgb(pixels: &[u8]) -> Self {
        count_pixels(pixels, 3, |counts, px| {
            counts.red[px[0] as usize] += 1;
            counts.green[px[1] as usize] += 1;
            counts.blue[px[2] as usize] += 1;
        })
    }

    /// Counts grayscale pixels into all three tables.
    pub fn from_gray(pixels: &[u8]) -> Self {
        count_pixels(pixels, 1, |counts, px| {
            let level = px[0] as usize;
            counts.red[level] += 1;
            counts.green[level] += 1;
            counts.blue[level] += 1;
        })
    }

    fn merge(mut self, other: Self) -> Self {
        for level in 0..LEVELS {
            self.red[level] += other.red[level];
            self.green[level] += other.green[level];
            self.blue[level] += other.blue[level];
        }
        self
    }
}

fn count_pixels<F>(pixels: &[u8], stride: usize, add: F) -> ChannelCounts
where
    F: Fn(&mut ChannelCounts, &[u8]) + Sync,
{
    let fold = |mut counts: ChannelCounts, px: &[u8]| {
        add(&mut counts, px);
        counts
    };

    if pixels.len() / stride >= PARALLEL_THRESHOLD {
        pixels
            .par_chunks_exact(stride)
            .fold(ChannelCounts::default, fold)
            .reduce(ChannelCounts::default, ChannelCounts::merge)
    } else {
        pixels
            .chunks_exact(stride)
            .fold(ChannelCounts::default(), fold)
    }
}

/// Builds the three channel histograms of an 8-bit image matrix.
///
/// Three-channel matrices are read as RGB; single-channel matrices count
/// each level into every table.
pub fn compute(image: &Matrix) -> Result<ChannelCounts> {
    let pixels = match image.data() {
        MatrixData::U8(pixels) => pixels,
        MatrixData::F64(_) => {
            return Err(MatrixError::invalid_image(format!(
                "histogram needs 8-bit samples, matrix is {}",
                image.type_string()
            )));
        }
    };
    let counts = match image.channels() {
        3 => ChannelCounts::from_rgb(pixels),
        1 => ChannelCounts::from_gray(pixels),
        n => {
            return Err(MatrixError::invalid_image(format!(
                "histogram needs 1 or 3 channels, matrix has {}",
                n
            )));
        }
    };

    debug!("Histogram over {} pixels", counts.total());
    Ok(counts)
}

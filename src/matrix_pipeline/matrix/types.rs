//! Canonical in-memory matrix types

use std::fmt;

use serde::Serialize;

use crate::matrix_pipeline::common::error::{MatrixError, Result};
use crate::matrix_pipeline::matrix::format::FormatTag;

/// Element type of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// 64-bit float, used for numeric data matrices
    F64,
    /// 8-bit unsigned, used for image matrices
    U8,
}

/// Row, column and channel counts of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize, channels: usize) -> Self {
        Self { rows, cols, channels }
    }

    /// Total number of samples (rows * cols * channels)
    ///
    /// Only meaningful for shapes that passed [`Shape::checked_len`]; every
    /// constructed [`Matrix`] does.
    pub fn len(&self) -> usize {
        self.rows * self.cols * self.channels
    }

    /// Sample count, or `None` when the product overflows `usize`.
    pub fn checked_len(&self) -> Option<usize> {
        self.rows
            .checked_mul(self.cols)
            .and_then(|cells| cells.checked_mul(self.channels))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} cols", self.rows, self.cols)?;
        if self.channels != 1 {
            write!(f, " x {} channels", self.channels)?;
        }
        Ok(())
    }
}

/// Sample storage, interleaved by channel in row-major order
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixData {
    F64(Vec<f64>),
    U8(Vec<u8>),
}

impl MatrixData {
    pub fn len(&self) -> usize {
        match self {
            Self::F64(values) => values.len(),
            Self::U8(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Self::F64(_) => ElementType::F64,
            Self::U8(_) => ElementType::U8,
        }
    }
}

/// A dense 2-D grid of samples with a fixed element type.
///
/// The shape is fixed at construction; every cell is defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    shape: Shape,
    data: MatrixData,
    format: FormatTag,
}

impl Matrix {
    /// Builds a matrix, checking that `data` holds exactly `shape.len()` samples.
    pub fn new(shape: Shape, data: MatrixData) -> Result<Self> {
        if shape.channels == 0 || shape.checked_len() != Some(data.len()) {
            return Err(MatrixError::InvalidDimensions {
                path: None,
                rows: shape.rows,
                cols: shape.cols,
                channels: shape.channels,
                len: data.len(),
            });
        }

        Ok(Self {
            shape,
            data,
            format: FormatTag::Unknown,
        })
    }

    /// Single-channel 64-bit float matrix from row-major values.
    pub fn from_f64(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self> {
        Self::new(Shape::new(rows, cols, 1), MatrixData::F64(values))
    }

    /// 8-bit matrix with `channels` interleaved samples per cell.
    pub fn from_u8(rows: usize, cols: usize, channels: usize, values: Vec<u8>) -> Result<Self> {
        Self::new(Shape::new(rows, cols, channels), MatrixData::U8(values))
    }

    pub fn with_format(mut self, format: FormatTag) -> Self {
        self.format = format;
        self
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    pub fn data(&self) -> &MatrixData {
        &self.data
    }

    pub fn into_data(self) -> MatrixData {
        self.data
    }

    /// Format the matrix was decoded from, `Unknown` for derived matrices.
    pub fn format(&self) -> FormatTag {
        self.format
    }

    /// Sample at (`row`, `col`, `channel`) widened to f64.
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<f64> {
        if row >= self.shape.rows || col >= self.shape.cols || channel >= self.shape.channels {
            return None;
        }
        let index = (row * self.shape.cols + col) * self.shape.channels + channel;
        Some(match &self.data {
            MatrixData::F64(values) => values[index],
            MatrixData::U8(values) => values[index] as f64,
        })
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.data {
            MatrixData::F64(values) => Some(values),
            MatrixData::U8(_) => None,
        }
    }

    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.data {
            MatrixData::U8(values) => Some(values),
            MatrixData::F64(_) => None,
        }
    }

    /// All samples widened to f64, in storage order.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match &self.data {
            MatrixData::F64(values) => values.clone(),
            MatrixData::U8(values) => values.iter().map(|&v| v as f64).collect(),
        }
    }

    /// OpenCV-style type name, e.g. `CV_64FC1` or `CV_8UC3`.
    pub fn type_string(&self) -> String {
        let depth = match self.element_type() {
            ElementType::F64 => "64F",
            ElementType::U8 => "8U",
        };
        format!("CV_{}C{}", depth, self.shape.channels)
    }
}

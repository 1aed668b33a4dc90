//! Standard image codecs (BMP, JPEG, PNG).
//!
//! Decoding always yields a 3-channel 8-bit RGB matrix. Only BMP can be written.

use std::path::Path;

use image::{ColorType, ImageError, ImageFormat};
use tracing::debug;

use crate::matrix_pipeline::common::error::{MatrixError, Result};
use crate::matrix_pipeline::matrix::{FormatTag, Matrix, MatrixData};

/// Decodes an image file; any codec failure is `UnsupportedFormat`.
pub fn decode_image(path: &Path) -> Result<Matrix> {
    let bytes = std::fs::read(path).map_err(|e| MatrixError::io(path, e))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| MatrixError::unsupported(path, format!("cannot decode image: {}", e)))?;

    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    debug!("Decoded image {}x{} from {}", width, height, path.display());

    let tag = match FormatTag::from_path(path) {
        tag @ (FormatTag::Bitmap | FormatTag::Jpeg | FormatTag::Png) => tag,
        _ => FormatTag::Unknown,
    };

    Ok(Matrix::from_u8(height as usize, width as usize, 3, rgb.into_raw())
        .map_err(|e| e.in_file(path))?
        .with_format(tag))
}

/// Writes `matrix` as a BMP file.
///
/// 64-bit data is rounded and saturated into 0..=255.
pub fn encode_bitmap(matrix: &Matrix, path: &Path) -> Result<()> {
    let color = match matrix.channels() {
        1 => ColorType::L8,
        3 => ColorType::Rgb8,
        4 => ColorType::Rgba8,
        n => {
            return Err(MatrixError::unsupported(
                path,
                format!("cannot write a {}-channel matrix as an image", n),
            ));
        }
    };

    let (width, height) = match (u32::try_from(matrix.cols()), u32::try_from(matrix.rows())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(MatrixError::unsupported(path, "matrix is too large for an image"));
        }
    };

    let pixels: Vec<u8> = match matrix.data() {
        MatrixData::U8(values) => values.clone(),
        MatrixData::F64(values) => values.iter().map(|&v| v.round() as u8).collect(),
    };

    image::save_buffer_with_format(path, &pixels, width, height, color, ImageFormat::Bmp).map_err(
        |e| match e {
            ImageError::IoError(source) => MatrixError::io(path, source),
            other => MatrixError::unsupported(path, format!("cannot encode bitmap: {}", other)),
        },
    )
}

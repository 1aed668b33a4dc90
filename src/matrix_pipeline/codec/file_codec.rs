use std::path::Path;

use tracing::{debug, instrument};

use crate::matrix_pipeline::codec::{image_file, text_format, xml_storage};
use crate::matrix_pipeline::common::error::{MatrixError, Result};
use crate::matrix_pipeline::matrix::{FormatTag, Matrix};
use crate::matrix_pipeline::raw::{RawFormatConfig, RawSensorDecoder};

/// Maps between files and matrices.
pub trait MatrixCodec {
    fn decode(&self, path: &Path) -> Result<Matrix>;
    fn encode(&self, matrix: &Matrix, path: &Path) -> Result<()>;
}

/// Codec that picks the on-disk layout from the filename extension.
///
/// `.xml`, `.txt` and `.raw` select their dedicated layouts; anything else is
/// decoded as an image. Only `.xml`, `.txt` and `.bmp` can be written.
#[derive(Debug, Clone, Default)]
pub struct FileCodec {
    raw: RawSensorDecoder,
}

impl FileCodec {
    pub fn new(raw_config: RawFormatConfig) -> Self {
        Self {
            raw: RawSensorDecoder::new(raw_config),
        }
    }

    pub fn raw_config(&self) -> &RawFormatConfig {
        self.raw.config()
    }
}

impl MatrixCodec for FileCodec {
    #[instrument(skip(self, path), fields(path = %path.display()))]
    fn decode(&self, path: &Path) -> Result<Matrix> {
        let tag = FormatTag::from_path(path);
        debug!("Decoding as {}", tag);

        match tag {
            FormatTag::XmlContainer => xml_storage::decode_xml(path),
            FormatTag::DelimitedText => text_format::decode_text(path),
            FormatTag::RawSensor => self.raw.decode_file(path),
            FormatTag::Bitmap | FormatTag::Jpeg | FormatTag::Png | FormatTag::Unknown => {
                image_file::decode_image(path)
            }
        }
    }

    #[instrument(skip(self, matrix, path), fields(path = %path.display()))]
    fn encode(&self, matrix: &Matrix, path: &Path) -> Result<()> {
        let tag = FormatTag::from_path(path);
        debug!("Encoding {} as {}", matrix.shape(), tag);

        match tag {
            FormatTag::XmlContainer => xml_storage::encode_xml(matrix, path),
            FormatTag::DelimitedText => text_format::encode_text(matrix, path),
            FormatTag::Bitmap => image_file::encode_bitmap(matrix, path),
            FormatTag::RawSensor => Err(MatrixError::unsupported(
                path,
                "writing raw sensor frames is not implemented",
            )),
            FormatTag::Jpeg | FormatTag::Png => Err(MatrixError::unsupported(
                path,
                format!("writing {} images is not supported, use .bmp", tag),
            )),
            FormatTag::Unknown => Err(MatrixError::unsupported(
                path,
                "unrecognised output extension (expected .xml, .txt or .bmp)",
            )),
        }
    }
}

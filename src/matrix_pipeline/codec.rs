//! Matrix file codecs
//!
//! This module maps matrices to and from their on-disk layouts, selected by
//! filename extension.

mod file_codec;
pub mod image_file;
pub mod text_format;
pub mod xml_storage;


pub use file_codec::{FileCodec, MatrixCodec};

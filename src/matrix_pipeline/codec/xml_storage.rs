//! XML storage container.
//!
//! Matrices live under a single `matrix` node using the OpenCV `FileStorage`
//! layout, so files written by OpenCV tools load here and vice versa:
//!
//! ```xml
//! <?xml version="1.0"?>
//! <opencv_storage>
//!   <matrix type_id="opencv-matrix">
//!     <rows>2</rows>
//!     <cols>2</cols>
//!     <dt>d</dt>
//!     <data>1 2 3 4</data>
//!   </matrix>
//! </opencv_storage>
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matrix_pipeline::common::error::{MatrixError, Result};
use crate::matrix_pipeline::matrix::{ElementType, FormatTag, Matrix, MatrixData, Shape};

const MATRIX_TYPE_ID: &str = "opencv-matrix";
const XML_DECLARATION: &str = "<?xml version=\"1.0\"?>\n";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "opencv_storage")]
struct Storage {
    matrix: Option<MatrixNode>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MatrixNode {
    #[serde(rename = "@type_id", default, skip_serializing_if = "Option::is_none")]
    type_id: Option<String>,
    rows: usize,
    cols: usize,
    dt: String,
    #[serde(default)]
    data: String,
}

/// Parses an element descriptor such as `d`, `u` or `3u` into channels and
/// canonical element type. Every depth except `u` widens to f64.
fn parse_dt(dt: &str) -> Option<(usize, ElementType)> {
    let dt = dt.trim().trim_matches('"');
    let split = dt.find(|c: char| !c.is_ascii_digit())?;
    let (count, code) = dt.split_at(split);
    let channels = if count.is_empty() {
        1
    } else {
        count.parse::<usize>().ok().filter(|&n| n > 0)?
    };
    let element = match code {
        "u" => ElementType::U8,
        "c" | "w" | "s" | "i" | "f" | "d" => ElementType::F64,
        _ => return None,
    };
    Some((channels, element))
}

fn format_dt(channels: usize, element: ElementType) -> String {
    let code = match element {
        ElementType::U8 => "u",
        ElementType::F64 => "d",
    };
    if channels == 1 {
        code.to_string()
    } else {
        format!("{}{}", channels, code)
    }
}

pub fn decode_xml(path: &Path) -> Result<Matrix> {
    let bytes = std::fs::read(path).map_err(|e| MatrixError::io(path, e))?;
    let contents = String::from_utf8(bytes)
        .map_err(|_| MatrixError::malformed(path, "file is not valid UTF-8 XML"))?;
    parse_xml(path, &contents)
}

pub fn parse_xml(source: &Path, contents: &str) -> Result<Matrix> {
    let storage: Storage = quick_xml::de::from_str(contents)
        .map_err(|e| MatrixError::malformed(source, format!("invalid XML container: {}", e)))?;

    let node = storage
        .matrix
        .ok_or_else(|| MatrixError::malformed(source, "no `matrix` node in container"))?;

    let (channels, element) = parse_dt(&node.dt).ok_or_else(|| {
        MatrixError::malformed(source, format!("unrecognised element type {:?}", node.dt))
    })?;

    if node.rows == 0 || node.cols == 0 {
        return Err(MatrixError::malformed(
            source,
            format!("invalid matrix size {}x{}", node.rows, node.cols),
        ));
    }

    let shape = Shape::new(node.rows, node.cols, channels);
    let expected = shape.checked_len().ok_or_else(|| {
        MatrixError::malformed(source, format!("matrix size {} overflows", shape))
    })?;
    let tokens: Vec<&str> = node.data.split_whitespace().collect();
    if tokens.len() != expected {
        return Err(MatrixError::malformed(
            source,
            format!("expected {} values for {}, found {}", expected, shape, tokens.len()),
        ));
    }

    debug!("Parsed XML matrix node: {}, dt={}", shape, node.dt);

    let data = match element {
        ElementType::U8 => MatrixData::U8(
            tokens
                .iter()
                .map(|t| t.parse::<u8>())
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| MatrixError::malformed(source, "8-bit data holds a non-byte value"))?,
        ),
        ElementType::F64 => MatrixData::F64(
            tokens
                .iter()
                .map(|t| t.parse::<f64>())
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| MatrixError::malformed(source, "data holds a non-numeric value"))?,
        ),
    };

    Ok(Matrix::new(shape, data)
        .map_err(|e| e.in_file(source))?
        .with_format(FormatTag::XmlContainer))
}

/// Renders `matrix` as a storage document with a single `matrix` node.
pub fn format_xml(target: &Path, matrix: &Matrix) -> Result<String> {
    let data = match matrix.data() {
        MatrixData::F64(values) => join_values(values),
        MatrixData::U8(values) => join_values(values),
    };

    let storage = Storage {
        matrix: Some(MatrixNode {
            type_id: Some(MATRIX_TYPE_ID.to_string()),
            rows: matrix.rows(),
            cols: matrix.cols(),
            dt: format_dt(matrix.channels(), matrix.element_type()),
            data,
        }),
    };

    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut body);
    serializer.indent(' ', 2);
    storage
        .serialize(serializer)
        .map_err(|e| MatrixError::unsupported(target, format!("cannot serialise matrix: {}", e)))?;

    Ok(format!("{}{}\n", XML_DECLARATION, body))
}

fn join_values<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn encode_xml(matrix: &Matrix, path: &Path) -> Result<()> {
    let document = format_xml(path, matrix)?;
    std::fs::write(path, document).map_err(|e| MatrixError::io(path, e))
}

//! Delimited text layout.
//!
//! Line one holds `<cols> <rows>` (width first), line two holds every value
//! in row-major order, space separated with a trailing space.

use std::path::Path;

use rayon::prelude::*;
use tracing::debug;

use crate::matrix_pipeline::common::error::{MatrixError, Result};
use crate::matrix_pipeline::matrix::{FormatTag, Matrix, MatrixData};

pub fn decode_text(path: &Path) -> Result<Matrix> {
    let bytes = std::fs::read(path).map_err(|e| MatrixError::io(path, e))?;
    let contents = String::from_utf8(bytes)
        .map_err(|_| MatrixError::malformed(path, "file is not valid UTF-8 text"))?;
    parse_text(path, &contents)
}

/// Parses the text layout; `source` is only used for error context.
pub fn parse_text(source: &Path, contents: &str) -> Result<Matrix> {
    let mut lines = contents.lines();
    let header = lines
        .next()
        .ok_or_else(|| MatrixError::malformed(source, "missing `<cols> <rows>` header"))?;

    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(MatrixError::malformed(
            source,
            format!("header must hold `<cols> <rows>`, found {} fields", fields.len()),
        ));
    }
    let cols = parse_dimension(source, fields[0], "column count")?;
    let rows = parse_dimension(source, fields[1], "row count")?;

    let expected = rows
        .checked_mul(cols)
        .ok_or_else(|| MatrixError::malformed(source, "matrix dimensions overflow"))?;

    let tokens: Vec<&str> = lines.flat_map(str::split_whitespace).collect();
    if tokens.len() != expected {
        return Err(MatrixError::malformed(
            source,
            format!(
                "expected {} values for {} rows x {} cols, found {}",
                expected,
                rows,
                cols,
                tokens.len()
            ),
        ));
    }

    debug!("Parsing {} text values ({}x{})", expected, rows, cols);

    // Each token owns exactly one output cell.
    let values = tokens
        .par_iter()
        .enumerate()
        .map(|(v, token)| {
            token.parse::<f64>().map_err(|_| {
                MatrixError::malformed(
                    source,
                    format!(
                        "value at row {}, column {} is not a number: {:?}",
                        v / cols,
                        v % cols,
                        token
                    ),
                )
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(Matrix::from_f64(rows, cols, values)
        .map_err(|e| e.in_file(source))?
        .with_format(FormatTag::DelimitedText))
}

fn parse_dimension(source: &Path, field: &str, what: &str) -> Result<usize> {
    match field.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(MatrixError::malformed(
            source,
            format!("invalid {} {:?}: must be a strictly positive integer", what, field),
        )),
    }
}

/// Renders a single-channel matrix in the text layout.
pub fn format_text(target: &Path, matrix: &Matrix) -> Result<String> {
    if matrix.channels() != 1 {
        return Err(MatrixError::unsupported(
            target,
            format!(
                "text layout holds single-channel data, matrix has {} channels",
                matrix.channels()
            ),
        ));
    }

    let mut out = String::with_capacity(matrix.len() * 8 + 16);
    out.push_str(&format!("{} {}\n", matrix.cols(), matrix.rows()));
    match matrix.data() {
        MatrixData::F64(values) => {
            for value in values {
                out.push_str(&value.to_string());
                out.push(' ');
            }
        }
        MatrixData::U8(values) => {
            for value in values {
                out.push_str(&value.to_string());
                out.push(' ');
            }
        }
    }
    Ok(out)
}

pub fn encode_text(matrix: &Matrix, path: &Path) -> Result<()> {
    let text = format_text(path, matrix)?;
    std::fs::write(path, text).map_err(|e| MatrixError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix_pipeline::common::error::ErrorKind;

    fn parse(contents: &str) -> Result<Matrix> {
        parse_text(Path::new("m.txt"), contents)
    }

    #[test]
    fn test_header_is_cols_then_rows() {
        let m = parse("3 2\n1 2 3 4 5 6 \n").unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.get(0, 2, 0), Some(3.0));
        assert_eq!(m.get(1, 0, 0), Some(4.0));
        assert_eq!(m.format(), FormatTag::DelimitedText);
    }

    #[test]
    fn test_zero_dimension_is_malformed() {
        assert_eq!(parse("0 2\n").unwrap_err().kind(), ErrorKind::MalformedInput);
        assert_eq!(parse("2 0\n").unwrap_err().kind(), ErrorKind::MalformedInput);
        assert_eq!(parse("-1 2\n1 2").unwrap_err().kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_bad_header_is_malformed() {
        assert_eq!(parse("").unwrap_err().kind(), ErrorKind::MalformedInput);
        assert_eq!(parse("3\n1 2 3").unwrap_err().kind(), ErrorKind::MalformedInput);
        assert_eq!(parse("a b\n1").unwrap_err().kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_value_count_must_match() {
        let err = parse("2 2\n1 2 3\n").unwrap_err();
        assert!(err.to_string().contains("expected 4 values"));
        assert_eq!(parse("2 1\n1 2 3\n").unwrap_err().kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_non_numeric_token_reports_position() {
        let err = parse("2 2\n1 2 x 4\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("row 1, column 0"));
    }

    #[test]
    fn test_format_layout() {
        let m = Matrix::from_f64(2, 2, vec![1.0, 2.5, -3.0, 0.125]).unwrap();
        let text = format_text(Path::new("out.txt"), &m).unwrap();
        assert_eq!(text, "2 2\n1 2.5 -3 0.125 ");
    }

    #[test]
    fn test_format_rejects_multichannel() {
        let m = Matrix::from_u8(1, 1, 3, vec![1, 2, 3]).unwrap();
        let err = format_text(Path::new("out.txt"), &m).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let values: Vec<f64> = (0..12).map(|i| i as f64 * 0.1 - 0.35).collect();
        let m = Matrix::from_f64(3, 4, values.clone()).unwrap();
        let text = format_text(Path::new("rt.txt"), &m).unwrap();
        let back = parse(&text).unwrap();
        assert_eq!(back.shape(), m.shape());
        assert_eq!(back.as_f64().unwrap(), values.as_slice());
    }
}

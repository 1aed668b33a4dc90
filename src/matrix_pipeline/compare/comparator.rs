use rayon::prelude::*;
use tracing::debug;

use crate::matrix_pipeline::common::error::{MatrixError, Result};
use crate::matrix_pipeline::compare::types::{ComparisonResult, ThresholdConfig, Verdict};
use crate::matrix_pipeline::matrix::{Matrix, MatrixData};

fn check_shapes(first: &Matrix, second: &Matrix) -> Result<()> {
    if first.shape() != second.shape() {
        return Err(MatrixError::ShapeMismatch {
            first: first.shape(),
            second: second.shape(),
        });
    }
    Ok(())
}

/// Element-wise `|first - second|`.
///
/// Two 8-bit inputs give an 8-bit result; any other pairing is computed in f64.
pub fn abs_diff(first: &Matrix, second: &Matrix) -> Result<Matrix> {
    check_shapes(first, second)?;

    let data = match (first.data(), second.data()) {
        (MatrixData::U8(a), MatrixData::U8(b)) => MatrixData::U8(
            a.par_iter()
                .zip(b.par_iter())
                .map(|(&x, &y)| x.abs_diff(y))
                .collect(),
        ),
        (MatrixData::F64(a), MatrixData::F64(b)) => MatrixData::F64(diff_f64(a, b)),
        _ => MatrixData::F64(diff_f64(&first.to_f64_vec(), &second.to_f64_vec())),
    };

    Matrix::new(first.shape(), data)
}

fn diff_f64(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.par_iter()
        .zip(b.par_iter())
        .map(|(&x, &y)| (x - y).abs())
        .collect()
}

/// Counts (row, column) cells where any channel's difference exceeds `threshold`.
fn count_exceeding(diff: &Matrix, threshold: f64) -> usize {
    let channels = diff.channels();
    match diff.data() {
        MatrixData::F64(values) => values
            .par_chunks_exact(channels)
            .filter(|cell| cell.iter().any(|&v| v > threshold))
            .count(),
        MatrixData::U8(values) => values
            .par_chunks_exact(channels)
            .filter(|cell| cell.iter().any(|&v| f64::from(v) > threshold))
            .count(),
    }
}

/// Compares two matrices of identical shape against `thresholds`.
///
/// A shape mismatch is the only operational failure besides invalid
/// thresholds; exceeding the thresholds yields `Verdict::Fail`, not an error.
pub fn compare(
    first: &Matrix,
    second: &Matrix,
    thresholds: &ThresholdConfig,
) -> Result<ComparisonResult> {
    if !thresholds.is_valid() {
        return Err(MatrixError::InvalidThreshold {
            absolute: thresholds.absolute,
            percentage: thresholds.percentage,
        });
    }

    let diff = abs_diff(first, second)?;
    let total = diff.rows() * diff.cols();
    let exceeding = count_exceeding(&diff, thresholds.absolute);
    let percentage = if total == 0 {
        0.0
    } else {
        exceeding as f64 * 100.0 / total as f64
    };

    let verdict = if percentage <= thresholds.percentage {
        Verdict::Pass
    } else {
        Verdict::Fail
    };

    debug!(
        exceeding,
        total,
        percentage,
        ?verdict,
        "Compared {}",
        diff.shape()
    );

    Ok(ComparisonResult {
        diff,
        exceeding,
        total,
        percentage,
        verdict,
        thresholds: *thresholds,
    })
}

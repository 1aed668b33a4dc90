use std::path::PathBuf;

use thiserror::Error;

use crate::matrix_pipeline::matrix::Shape;

/// Coarse classification of a [`MatrixError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    MalformedInput,
    UnsupportedFormat,
    ShapeMismatch,
    InvalidConfig,
}

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed input in {}: {reason}", .path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("Unsupported format for {}: {reason}", .path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error(
        "The two matrices cannot be compared because they have different sizes \
         (first: {first}, second: {second})"
    )]
    ShapeMismatch { first: Shape, second: Shape },

    #[error(
        "Invalid matrix dimensions{}: rows={rows}, cols={cols}, channels={channels}, samples={len}",
        located(.path)
    )]
    InvalidDimensions {
        path: Option<PathBuf>,
        rows: usize,
        cols: usize,
        channels: usize,
        len: usize,
    },

    #[error("Invalid thresholds: absolute={absolute}, percentage={percentage}")]
    InvalidThreshold { absolute: f64, percentage: f64 },

    #[error("Invalid image{}: {reason}", located(.path))]
    InvalidImage {
        path: Option<PathBuf>,
        reason: String,
    },
}

impl MatrixError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            path: None,
            reason: reason.into(),
        }
    }

    /// Attaches `path` to errors raised before the file was known.
    pub fn in_file(mut self, path: impl Into<PathBuf>) -> Self {
        if let Self::InvalidDimensions { path: slot, .. } | Self::InvalidImage { path: slot, .. } =
            &mut self
        {
            if slot.is_none() {
                *slot = Some(path.into());
            }
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::MalformedInput { .. } | Self::InvalidDimensions { .. } => {
                ErrorKind::MalformedInput
            }
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            Self::InvalidThreshold { .. } | Self::InvalidImage { .. } => ErrorKind::InvalidConfig,
        }
    }
}

pub type Result<T> = std::result::Result<T, MatrixError>;

fn located(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" in {}", path.display()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_file_names_the_file() {
        let err = MatrixError::invalid_image("histogram needs 8-bit samples").in_file("a.xml");
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert_eq!(
            err.to_string(),
            "Invalid image in a.xml: histogram needs 8-bit samples"
        );
    }

    #[test]
    fn test_in_file_keeps_existing_path() {
        let err = MatrixError::InvalidDimensions {
            path: Some(PathBuf::from("first.raw")),
            rows: 0,
            cols: 4,
            channels: 1,
            len: 0,
        }
        .in_file("second.raw");
        assert!(err.to_string().contains("first.raw"));
        assert!(!err.to_string().contains("second.raw"));
    }

    #[test]
    fn test_in_file_leaves_other_errors_alone() {
        let err = MatrixError::malformed("m.txt", "bad header").in_file("other.txt");
        assert_eq!(err.to_string(), "Malformed input in m.txt: bad header");
    }
}

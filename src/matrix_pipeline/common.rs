//! Common utilities module
//!
//! This module contains the error type shared by every stage of the matrix pipeline.

pub mod error;

pub use error::{ErrorKind, MatrixError, Result};

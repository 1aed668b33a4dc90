use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::matrix_pipeline::codec::MatrixCodec;
use crate::matrix_pipeline::common::error::{ErrorKind, MatrixError, Result};
use crate::matrix_pipeline::compare::{ThresholdConfig, Verdict};
use crate::matrix_pipeline::conversions::{MatrixPipeline, PipelineConfig};
use crate::matrix_pipeline::matrix::Matrix;
use crate::matrix_pipeline::raw::RawFormatConfig;

#[derive(Default)]
struct MockCodec {
    files: HashMap<PathBuf, Matrix>,
    fail_encode: bool,
    written: Arc<Mutex<Vec<(PathBuf, Matrix)>>>,
}

impl MockCodec {
    fn with_file(mut self, path: &str, matrix: Matrix) -> Self {
        self.files.insert(PathBuf::from(path), matrix);
        self
    }
}

impl MatrixCodec for MockCodec {
    fn decode(&self, path: &Path) -> Result<Matrix> {
        self.files.get(path).cloned().ok_or_else(|| {
            MatrixError::io(path, std::io::Error::from(std::io::ErrorKind::NotFound))
        })
    }

    fn encode(&self, matrix: &Matrix, path: &Path) -> Result<()> {
        if self.fail_encode {
            return Err(MatrixError::unsupported(path, "mock encode error"));
        }
        self.written
            .lock()
            .unwrap()
            .push((path.to_path_buf(), matrix.clone()));
        Ok(())
    }
}

fn before() -> Matrix {
    Matrix::from_f64(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap()
}

fn after() -> Matrix {
    Matrix::from_f64(2, 2, vec![1.0, 5.0, 0.0, 4.0]).unwrap()
}

fn thresholds(absolute: f64, percentage: f64) -> PipelineConfig {
    PipelineConfig::builder()
        .thresholds(ThresholdConfig::new(absolute, percentage))
        .build()
}

#[test]
fn test_config_builder() {
    let raw = RawFormatConfig::builder().width(640).height(480).build();
    let config = PipelineConfig::builder().raw(raw).build();

    assert_eq!(config.raw.width, 640);
    assert_eq!(config.raw.height, 480);
    assert_eq!(config.thresholds, ThresholdConfig::default());
}

#[test]
fn test_default_config_matches_sensor() {
    let config = PipelineConfig::default();
    assert_eq!(config.raw.width, 2592);
    assert_eq!(config.raw.height, 1944);
    assert_eq!(config.thresholds.absolute, 0.0);
    assert_eq!(config.thresholds.percentage, 0.0);
}

#[test]
fn test_successful_conversion() {
    let written = Arc::new(Mutex::new(Vec::new()));
    let codec = MockCodec {
        written: written.clone(),
        ..MockCodec::default()
    }
    .with_file("in.txt", before());

    let pipeline = MatrixPipeline::with_custom(codec, PipelineConfig::default());
    let matrix = pipeline.convert_file("in.txt", "out.xml").unwrap();

    assert_eq!(matrix, before());
    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].0, PathBuf::from("out.xml"));
}

#[test]
fn test_decode_failure_skips_encode() {
    let written = Arc::new(Mutex::new(Vec::new()));
    let codec = MockCodec {
        written: written.clone(),
        ..MockCodec::default()
    };

    let pipeline = MatrixPipeline::with_custom(codec, PipelineConfig::default());
    let err = pipeline.convert_file("missing.txt", "out.xml").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_encode_failure() {
    let codec = MockCodec {
        fail_encode: true,
        ..MockCodec::default()
    }
    .with_file("in.txt", before());

    let pipeline = MatrixPipeline::with_custom(codec, PipelineConfig::default());
    let err = pipeline.convert_file("in.txt", "out.png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
}

#[test]
fn test_compare_with_uses_configured_thresholds() {
    let codec = MockCodec::default().with_file("after.txt", after());

    let mut pipeline = MatrixPipeline::with_custom(codec, thresholds(2.0, 50.0));
    let result = pipeline.compare_with(&before(), "after.txt").unwrap();
    assert_eq!(result.verdict, Verdict::Pass);
    assert_eq!(result.diff.as_f64().unwrap(), &[0.0, 3.0, 3.0, 0.0]);

    pipeline.set_thresholds(ThresholdConfig::new(2.0, 49.0));
    let result = pipeline.compare_with(&before(), "after.txt").unwrap();
    assert_eq!(result.verdict, Verdict::Fail);
}

#[test]
fn test_compare_files_shape_mismatch() {
    let wide = Matrix::from_f64(3, 5, vec![0.0; 15]).unwrap();
    let narrow = Matrix::from_f64(3, 4, vec![0.0; 12]).unwrap();
    let codec = MockCodec::default()
        .with_file("a.txt", narrow)
        .with_file("b.txt", wide);

    let pipeline = MatrixPipeline::with_custom(codec, PipelineConfig::default());
    let err = pipeline.compare_files("a.txt", "b.txt").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn test_histogram_file() {
    let image = Matrix::from_u8(1, 2, 3, vec![1, 2, 3, 1, 2, 4]).unwrap();
    let codec = MockCodec::default().with_file("pic.bmp", image);

    let pipeline = MatrixPipeline::with_custom(codec, PipelineConfig::default());
    let counts = pipeline.histogram_file("pic.bmp").unwrap();
    assert_eq!(counts.red[1], 2);
    assert_eq!(counts.blue[3], 1);
    assert_eq!(counts.blue[4], 1);
    assert_eq!(counts.total(), 2);
}

#[test]
fn test_histogram_of_data_matrix_names_the_file() {
    let codec = MockCodec::default().with_file("values.xml", before());

    let pipeline = MatrixPipeline::with_custom(codec, PipelineConfig::default());
    let err = pipeline.histogram_file("values.xml").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    assert!(err.to_string().contains("values.xml"), "{}", err);
}

#[test]
fn test_file_pipeline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("before.txt");
    let xml = dir.path().join("before.xml");
    std::fs::write(&txt, "2 2\n1 2 3 4 ").unwrap();

    let pipeline = MatrixPipeline::new(thresholds(0.0, 0.0));
    pipeline.convert_file(&txt, &xml).unwrap();

    let result = pipeline.compare_files(&txt, &xml).unwrap();
    assert_eq!(result.exceeding, 0);
    assert!(result.passed());
}

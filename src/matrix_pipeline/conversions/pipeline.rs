use std::path::Path;

use tracing::{info, instrument};

use crate::matrix_pipeline::{
    codec::{FileCodec, MatrixCodec},
    common::error::Result,
    compare::{self, ComparisonResult, ThresholdConfig},
    conversions::types::PipelineConfig,
    histogram::{self, ChannelCounts},
    matrix::Matrix,
};

/// Loads, converts and compares matrix files through a [`MatrixCodec`].
pub struct MatrixPipeline<C: MatrixCodec> {
    codec: C,
    config: PipelineConfig,
}

impl MatrixPipeline<FileCodec> {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            codec: FileCodec::new(config.raw),
            config,
        }
    }
}

impl<C: MatrixCodec> MatrixPipeline<C> {
    pub fn with_custom(codec: C, config: PipelineConfig) -> Self {
        Self { codec, config }
    }

    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Matrix> {
        let matrix = self.codec.decode(path.as_ref())?;
        info!(
            rows = matrix.rows(),
            cols = matrix.cols(),
            channels = matrix.channels(),
            format = %matrix.format(),
            "Loaded matrix"
        );
        Ok(matrix)
    }

    #[instrument(skip(self, matrix, path), fields(path = %path.as_ref().display()))]
    pub fn save<P: AsRef<Path>>(&self, matrix: &Matrix, path: P) -> Result<()> {
        self.codec.encode(matrix, path.as_ref())
    }

    /// Decodes `input_path` and re-encodes it at `output_path`.
    ///
    /// Returns the decoded matrix.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<Matrix> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let matrix = {
            let _span = tracing::info_span!("decode").entered();
            self.codec.decode(input_path)?
        };

        {
            let _span = tracing::info_span!("encode", shape = %matrix.shape()).entered();
            self.codec.encode(&matrix, output_path)?;
        }

        info!(
            rows = matrix.rows(),
            cols = matrix.cols(),
            "Conversion complete"
        );
        Ok(matrix)
    }

    /// Compares an in-memory reference against the matrix stored at `candidate_path`.
    #[instrument(skip(self, reference, candidate_path))]
    pub fn compare_with<P: AsRef<Path>>(
        &self,
        reference: &Matrix,
        candidate_path: P,
    ) -> Result<ComparisonResult> {
        let candidate = {
            let _span = tracing::info_span!("decode_candidate").entered();
            self.codec.decode(candidate_path.as_ref())?
        };

        let result = {
            let _span = tracing::info_span!("compare", shape = %reference.shape()).entered();
            compare::compare(reference, &candidate, &self.config.thresholds)?
        };

        info!(
            exceeding = result.exceeding,
            total = result.total,
            percentage = result.percentage,
            verdict = ?result.verdict,
            "Comparison complete"
        );
        Ok(result)
    }

    pub fn compare_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        reference_path: P,
        candidate_path: Q,
    ) -> Result<ComparisonResult> {
        let reference = self.load(reference_path)?;
        self.compare_with(&reference, candidate_path)
    }

    pub fn histogram_file<P: AsRef<Path>>(&self, path: P) -> Result<ChannelCounts> {
        let path = path.as_ref();
        let image = self.load(path)?;
        let _span = tracing::info_span!("histogram").entered();
        histogram::compute(&image).map_err(|e| e.in_file(path))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn set_thresholds(&mut self, thresholds: ThresholdConfig) {
        self.config.thresholds = thresholds;
    }
}

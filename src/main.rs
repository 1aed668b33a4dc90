use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;

use matrix_compare_rs::logger;
use matrix_compare_rs::matrix_pipeline::raw::{DEFAULT_RAW_HEIGHT, DEFAULT_RAW_WIDTH};
use matrix_compare_rs::matrix_pipeline::{
    ComparisonSummary, MatrixPipeline, PipelineConfig, RawFormatConfig, RawSampleType,
    ThresholdConfig, Verdict,
};

use tracing::{error, info};

/// Convert matrix files between formats and compare them cell by cell
#[derive(Parser, Debug)]
#[command(name = "matrix_compare_rs")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "FORMATS:
    .txt   read/write  `<cols> <rows>` header, then row-major values
    .xml   read/write  storage container with a `matrix` node
    .raw   read        header-less sensor frame (see --raw-*)
    .bmp   read/write
    .jpg   read
    .png   read

EXIT CODES:
    0 - Success (comparison passed)
    1 - Comparison failed its thresholds
    2 - Error (file not found, malformed input, size mismatch, ...)")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    raw: RawArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct RawArgs {
    /// Width of .raw sensor frames in pixels
    #[arg(long, global = true, default_value_t = DEFAULT_RAW_WIDTH, value_name = "PIXELS")]
    raw_width: usize,

    /// Height of .raw sensor frames in pixels
    #[arg(long, global = true, default_value_t = DEFAULT_RAW_HEIGHT, value_name = "PIXELS")]
    raw_height: usize,

    /// Sample type selector of .raw frames (0 = 16-bit unsigned)
    #[arg(long, global = true, default_value_t = 0, value_name = "SELECTOR")]
    raw_type: u32,
}

impl RawArgs {
    fn config(&self) -> RawFormatConfig {
        RawFormatConfig::builder()
            .sample_type(RawSampleType::from_selector(self.raw_type))
            .width(self.raw_width)
            .height(self.raw_height)
            .build()
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode INPUT and write it to OUTPUT, format chosen by extension
    Convert { input: PathBuf, output: PathBuf },

    /// Compare SECOND against FIRST and report the threshold verdict
    Compare {
        first: PathBuf,
        second: PathBuf,

        /// A cell exceeds when |first - second| is greater than this
        #[arg(long, default_value_t = 0.0, value_name = "N")]
        abs_threshold: f64,

        /// Largest percentage of exceeding cells that still passes
        #[arg(long, default_value_t = 0.0, value_name = "P")]
        pct_threshold: f64,

        /// Output JSON
        #[arg(long)]
        json: bool,

        /// Write the difference matrix to FILE
        #[arg(long, value_name = "FILE")]
        diff_out: Option<PathBuf>,
    },

    /// Print per-channel intensity histograms of an image
    Histogram {
        image: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the shape, element type and format of a file
    Info { file: PathBuf },
}

#[derive(Serialize)]
struct CompareOutput<'a> {
    first: String,
    second: String,
    #[serde(flatten)]
    summary: &'a ComparisonSummary,
}

#[derive(Serialize)]
struct HistogramOutput<'a> {
    image: String,
    pixels: u64,
    red: &'a [u64],
    green: &'a [u64],
    blue: &'a [u64],
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = PipelineConfig::builder().raw(cli.raw.config()).build();

    match &cli.command {
        Command::Convert { input, output } => {
            let pipeline = MatrixPipeline::new(config);
            let matrix = pipeline.convert_file(input, output).with_context(|| {
                format!("Conversion of {} to {} failed", input.display(), output.display())
            })?;
            println!(
                "{} -> {} ({}, {})",
                input.display(),
                output.display(),
                matrix.shape(),
                matrix.type_string()
            );
            Ok(ExitCode::SUCCESS)
        }

        Command::Compare {
            first,
            second,
            abs_threshold,
            pct_threshold,
            json,
            diff_out,
        } => {
            let mut pipeline = MatrixPipeline::new(config);
            pipeline.set_thresholds(ThresholdConfig::new(*abs_threshold, *pct_threshold));

            let reference = pipeline
                .load(first)
                .with_context(|| format!("Cannot load {}", first.display()))?;
            let result = pipeline
                .compare_with(&reference, second)
                .with_context(|| {
                    format!("Cannot compare {} with {}", first.display(), second.display())
                })?;

            if let Some(path) = diff_out {
                pipeline
                    .save(&result.diff, path)
                    .with_context(|| format!("Cannot write diff to {}", path.display()))?;
                info!("Diff written to {}", path.display());
            }

            let summary = result.summary();
            if *json {
                let output = CompareOutput {
                    first: first.display().to_string(),
                    second: second.display().to_string(),
                    summary: &summary,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_summary(&summary);
            }

            Ok(match summary.verdict {
                Verdict::Pass => ExitCode::SUCCESS,
                Verdict::Fail => ExitCode::from(1),
            })
        }

        Command::Histogram { image, json } => {
            let pipeline = MatrixPipeline::new(config);
            let counts = pipeline
                .histogram_file(image)
                .with_context(|| format!("Cannot compute histogram of {}", image.display()))?;

            if *json {
                let output = HistogramOutput {
                    image: image.display().to_string(),
                    pixels: counts.total(),
                    red: &counts.red,
                    green: &counts.green,
                    blue: &counts.blue,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{:>5} {:>10} {:>10} {:>10}", "level", "red", "green", "blue");
                for level in 0..counts.red.len() {
                    let (r, g, b) = (counts.red[level], counts.green[level], counts.blue[level]);
                    if r + g + b > 0 {
                        println!("{:>5} {:>10} {:>10} {:>10}", level, r, g, b);
                    }
                }
                println!("pixels: {}", counts.total());
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Info { file } => {
            let pipeline = MatrixPipeline::new(config);
            let matrix = pipeline
                .load(file)
                .with_context(|| format!("Cannot load {}", file.display()))?;
            let kind = if matrix.format().is_data() {
                "data"
            } else if matrix.format().is_image() {
                "image"
            } else {
                "unknown"
            };
            println!("file:     {}", file.display());
            println!("format:   {} ({})", matrix.format(), kind);
            println!("type:     {}", matrix.type_string());
            println!("shape:    {}", matrix.shape());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_summary(summary: &ComparisonSummary) {
    let verdict = match summary.verdict {
        Verdict::Pass => "pass",
        Verdict::Fail => "fail",
    };
    println!("verdict:    {}", verdict);
    println!("shape:      {}", summary.shape);
    println!(
        "exceeding:  {} of {} cells ({:.2}%)",
        summary.exceeding, summary.total, summary.percentage
    );
    println!(
        "thresholds: absolute {}, percentage {}",
        summary.thresholds.absolute, summary.thresholds.percentage
    );
}

//! arena-vision CLI: detect balls and walls in still images or replayed sequences.

use std::path::{Path, PathBuf};
use std::time::Duration;

use arena_vision::capture::{read_frame, CaptureConfig, ImageSequenceDevice};
use arena_vision::{Detector, Pipeline, PipelineParams};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "arena-vision")]
#[command(about = "Detect red balls and blue walls in arena camera frames")]
#[command(version)]
struct Cli {
    /// Log verbosity.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Emit structured JSON logs through `tracing` instead of the plain logger.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(clap::Args)]
struct TuningArgs {
    /// JSON file with `PipelineParams` overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Box blur radius applied before segmentation (3 gives a 7x7 window).
    #[arg(long)]
    blur_radius: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one detection cycle on a still image and print the detections.
    Detect {
        /// Path to the input image.
        #[arg(long)]
        image: PathBuf,

        #[command(flatten)]
        tuning: TuningArgs,
    },
    /// Replay images as a camera and print one detection line per tick.
    Run {
        /// Frames to replay, in order; the sequence loops.
        #[arg(long, num_args = 1.., required = true)]
        frames: Vec<PathBuf>,

        /// Replay rate of the simulated camera.
        #[arg(long, default_value_t = 30.0)]
        fps: f32,

        /// Number of ticks before shutting down.
        #[arg(long, default_value_t = 10)]
        ticks: u64,

        /// Pause before each tick.
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,

        /// Capture width; frames are resized to it.
        #[arg(long, default_value_t = 640)]
        width: usize,

        /// Capture height; frames are resized to it.
        #[arg(long, default_value_t = 480)]
        height: usize,

        #[command(flatten)]
        tuning: TuningArgs,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Detect { image, tuning } => run_detect(&image, &tuning),
        Commands::Run {
            frames,
            fps,
            ticks,
            interval_ms,
            width,
            height,
            tuning,
        } => run_sequence(
            frames,
            fps,
            ticks,
            Duration::from_millis(interval_ms),
            CaptureConfig::default().with_size(width, height),
            &tuning,
        ),
    }
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> CliResult<()> {
    if cli.log_json {
        // Filter comes from RUST_LOG.
        arena_vision::core::init_tracing(true);
        return Ok(());
    }
    arena_vision::core::init_with_level(cli.log_level.into())?;
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> CliResult<()> {
    arena_vision::core::init_with_level(cli.log_level.into())?;
    Ok(())
}

fn load_params(tuning: &TuningArgs) -> CliResult<PipelineParams> {
    let mut params = match &tuning.config {
        Some(path) => PipelineParams::from_json_file(path)?,
        None => PipelineParams::default(),
    };
    if let Some(radius) = tuning.blur_radius {
        params = params.with_blur_radius(radius);
    }
    Ok(params)
}

fn run_detect(image: &Path, tuning: &TuningArgs) -> CliResult<()> {
    let params = load_params(tuning)?;
    let frame = read_frame(image).map_err(|e| -> CliError {
        format!("failed to open image {}: {e}", image.display()).into()
    })?;
    log::info!(
        "loaded {} ({}x{})",
        image.display(),
        frame.width,
        frame.height
    );

    let detections = Detector::new(params).process(&frame);
    println!("{}", serde_json::to_string_pretty(&detections)?);
    Ok(())
}

fn run_sequence(
    frames: Vec<PathBuf>,
    fps: f32,
    ticks: u64,
    interval: Duration,
    capture: CaptureConfig,
    tuning: &TuningArgs,
) -> CliResult<()> {
    let params = load_params(tuning)?;
    let device = ImageSequenceDevice::from_paths(frames).with_fps(fps);
    let mut pipeline = Pipeline::start_with_config(device, capture, params)?;

    for _ in 0..ticks {
        std::thread::sleep(interval);
        let detections = pipeline.tick();
        println!("{}", serde_json::to_string(&detections)?);
    }

    pipeline.shutdown();
    log::info!(
        "processed {} ticks over {} captured frames",
        pipeline.ticks(),
        pipeline.source().frames_captured()
    );
    Ok(())
}

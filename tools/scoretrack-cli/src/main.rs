//! ScoreTrack CLI: reconstruct score timelines from match recordings.
//!
//! Usage:
//!   scoretrack process <VIDEO> --crop x,y,w,h   Track the score in a video
//!   scoretrack timeline <READINGS>              Rebuild a timeline from recorded readings
//!   scoretrack preprocess <IMAGE> --crop ...    Write the normalized crop for calibration
//!   scoretrack config [--init]                  Show or initialize configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scoretrack_common::config::{AppConfig, LoggingConfig};
use scoretrack_ocr_engine::RecognizerKind;
use scoretrack_score_model::region::CropRect;

mod commands;

#[derive(Parser)]
#[command(
    name = "scoretrack",
    about = "Reconstruct score timelines from match recordings",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RecognizerChoice {
    /// The `tesseract` command-line tool
    Tesseract,
    /// An external program given with --ocr-command
    Command,
}

#[derive(Subcommand)]
enum Commands {
    /// Track the score shown in a video
    Process {
        /// Path to the match recording
        video: PathBuf,

        /// Score region in pixels: x,y,width,height
        #[arg(long, allow_hyphen_values = true)]
        crop: CropRect,

        /// Frames per second to analyze (defaults to the configured rate)
        #[arg(long)]
        fps: Option<f64>,

        /// Alliance label recorded in the report
        #[arg(long)]
        alliance: Option<String>,

        /// Recognizer backend
        #[arg(long, value_enum, default_value = "tesseract")]
        recognizer: RecognizerChoice,

        /// Command line for --recognizer command; split on whitespace, the
        /// crop path is appended
        #[arg(long)]
        ocr_command: Option<String>,

        /// Extra argument for the recognizer command, kept verbatim (repeatable)
        #[arg(long = "ocr-arg", allow_hyphen_values = true)]
        ocr_args: Vec<String>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write per-frame readings as JSONL
        #[arg(long)]
        readings: Option<PathBuf>,
    },

    /// Rebuild a score timeline from recorded per-frame readings
    Timeline {
        /// Path to a readings JSONL file
        readings: PathBuf,

        /// Number of sampled frames (defaults to the number of readings)
        #[arg(long)]
        frames: Option<u64>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the normalized score crop of a still frame
    Preprocess {
        /// Path to a frame image
        image: PathBuf,

        /// Score region in pixels: x,y,width,height
        #[arg(long, allow_hyphen_values = true)]
        crop: CropRect,

        /// Output image path
        #[arg(short, long, default_value = "crop.png")]
        output: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    scoretrack_common::logging::init_logging(&LoggingConfig {
        level,
        json: cli.json_logs || config.logging.json,
    });

    match cli.command {
        Commands::Process {
            video,
            crop,
            fps,
            alliance,
            recognizer,
            ocr_command,
            ocr_args,
            output,
            readings,
        } => {
            let recognizer = match recognizer {
                RecognizerChoice::Tesseract => RecognizerKind::Tesseract,
                RecognizerChoice::Command => RecognizerKind::Command {
                    command_line: ocr_command.ok_or_else(|| {
                        anyhow::anyhow!("--ocr-command is required with --recognizer command")
                    })?,
                    extra_args: ocr_args,
                },
            };
            commands::process::run(
                &config,
                commands::process::ProcessOptions {
                    video,
                    crop,
                    fps,
                    alliance,
                    recognizer,
                    output,
                    readings,
                },
            )
        }
        Commands::Timeline {
            readings,
            frames,
            output,
        } => commands::timeline::run(&config, readings, frames, output),
        Commands::Preprocess {
            image,
            crop,
            output,
        } => commands::preprocess::run(&config, image, crop, output),
        Commands::Config { init } => commands::config::run(&config, init),
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrsim — render text, degrade it, and see what OCR makes of it.
//
// Entry point. Initialises logging, merges the JSON configuration with
// command-line overrides, and dispatches to the simulator.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ocrsim_batch::{BatchOptions, InputSource, ProcessOutput, Simulator};
use ocrsim_core::error::Result;
use ocrsim_core::{ConditionKind, SimulatorConfig};
use ocrsim_image::Recognizer;

#[derive(Parser)]
#[command(name = "ocrsim")]
#[command(about = "Render text under controlled degradations and measure OCR output")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// JSON configuration file; flags below override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// none, typeface-substitution, geometric-tonal-distortion, speckle-noise
    /// (or simple, blackletter, distorted, noisy).
    #[arg(long, global = true)]
    condition: Option<ConditionKind>,

    /// Language code (eng, deu, fra, ltz).
    #[arg(long, global = true)]
    language: Option<String>,

    #[arg(long, global = true)]
    seed: Option<u64>,

    #[arg(long, global = true)]
    dpi: Option<u32>,

    /// Font size in points.
    #[arg(long, global = true)]
    font_size: Option<u32>,

    /// Font file overriding the language default.
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Fixed canvas width in pixels.
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Fixed canvas height in pixels.
    #[arg(long, global = true)]
    height: Option<u32>,

    /// Worker threads (0 = one per core).
    #[arg(long, global = true)]
    jobs: Option<usize>,

    /// Keep every rendered image in this directory.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Recognition engine.
    #[arg(long, global = true, value_enum, default_value_t = Engine::Tesseract)]
    engine: Engine,

    /// Path to the tesseract executable.
    #[arg(long, global = true)]
    tesseract: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Engine {
    Tesseract,
    /// In-process `ocrs`; needs a build with the `ocr` feature.
    Ocrs,
}

#[derive(Subcommand)]
enum Command {
    /// Render and degrade a text into a PNG, without recognition.
    Render {
        text: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Round-trip a single text (or a CSV file / folder, detected automatically).
    Simulate { input: String },
    /// Round-trip every cell of a CSV file.
    Csv {
        input: PathBuf,
        #[arg(long)]
        output_csv: Option<PathBuf>,
        /// Image name prefix (default `{condition}_{language}`).
        #[arg(long)]
        image_prefix: Option<String>,
    },
    /// Round-trip every matching text file in a directory.
    Folder {
        dir: PathBuf,
        #[arg(long, default_value = ocrsim_batch::folder::DEFAULT_PATTERN)]
        pattern: String,
        #[arg(long)]
        recursive: bool,
        #[arg(long)]
        output_csv: Option<PathBuf>,
    },
    /// Print the default configuration as JSON.
    Defaults {
        #[arg(value_name = "CONDITION")]
        kind: Option<ConditionKind>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(class = ?err.class(), "{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Defaults { kind } = &cli.command {
        let kind = kind.or(cli.global.condition).unwrap_or(ConditionKind::None);
        let config = SimulatorConfig {
            degradation: kind.default_degradation(),
            ..Default::default()
        };
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let config = build_config(&cli.global)?;
    let simulator = Simulator::new(config)?;

    match cli.command {
        Command::Render { text, output } => {
            let mut rng = simulator.item_rng(0);
            let canvas = simulator.text_to_image(&text, &mut rng);
            ocrsim_image::save_png(&canvas, &output, simulator.config().render.dpi)?;
            tracing::info!(path = %output.display(), "Image written");
        }
        Command::Simulate { input } => {
            let recognizer = recognizer(&cli.global, &simulator)?;
            let output = simulator.process_input(
                InputSource::sniff(&input),
                recognizer.as_ref(),
                &BatchOptions::default(),
            )?;
            print_output(&output)?;
        }
        Command::Csv {
            input,
            output_csv,
            image_prefix,
        } => {
            let recognizer = recognizer(&cli.global, &simulator)?;
            let options = BatchOptions {
                image_prefix,
                output_csv: output_csv.clone(),
            };
            let output =
                simulator.process_input(InputSource::CsvFile(input), recognizer.as_ref(), &options)?;
            if output_csv.is_none() {
                print_output(&output)?;
            }
        }
        Command::Folder {
            dir,
            pattern,
            recursive,
            output_csv,
        } => {
            let recognizer = recognizer(&cli.global, &simulator)?;
            let options = BatchOptions {
                output_csv: output_csv.clone(),
                ..Default::default()
            };
            let source = InputSource::Folder {
                path: dir,
                pattern,
                recursive,
            };
            let output = simulator.process_input(source, recognizer.as_ref(), &options)?;
            if output_csv.is_none() {
                print_output(&output)?;
            }
        }
        Command::Defaults { .. } => {}
    }
    Ok(())
}

/// Configuration file (or defaults) with command-line overrides applied.
fn build_config(args: &GlobalArgs) -> Result<SimulatorConfig> {
    let mut config = match &args.config {
        Some(path) => SimulatorConfig::from_json_file(path)?,
        None => SimulatorConfig::default(),
    };

    if let Some(kind) = args.condition {
        if kind != config.degradation.kind() {
            config.degradation = kind.default_degradation();
        }
    }
    if let Some(language) = &args.language {
        config.language = language.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(dpi) = args.dpi {
        config.render.dpi = dpi;
    }
    if let Some(font_size) = args.font_size {
        config.render.font_size = font_size;
    }
    if args.font.is_some() {
        config.render.font_path = args.font.clone();
    }
    if args.width.is_some() {
        config.render.image_width = args.width;
    }
    if args.height.is_some() {
        config.render.image_height = args.height;
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = Some(dir.clone());
        config.save_images = true;
    }
    Ok(config)
}

fn recognizer(args: &GlobalArgs, simulator: &Simulator) -> Result<Box<dyn Recognizer>> {
    match args.engine {
        Engine::Tesseract => {
            let mut tesseract = simulator.default_recognizer();
            if let Some(path) = &args.tesseract {
                tesseract = tesseract.with_binary(path);
            }
            if !tesseract.is_available() {
                tracing::warn!("tesseract could not be started; every item will come back empty");
            }
            Ok(Box::new(tesseract))
        }
        #[cfg(feature = "ocr")]
        Engine::Ocrs => Ok(Box::new(ocrsim_image::OcrsRecognizer::with_defaults()?)),
        #[cfg(not(feature = "ocr"))]
        Engine::Ocrs => Err(ocrsim_core::SimError::Config(
            "this build of ocrsim has no ocrs support; rebuild with --features ocr".into(),
        )),
    }
}

fn print_output(output: &ProcessOutput) -> Result<()> {
    match output {
        ProcessOutput::Text(result) => println!("{}", result.ocr_text),
        ProcessOutput::Texts(results) => println!("{}", serde_json::to_string_pretty(results)?),
        ProcessOutput::Table(table) => print!("{}", table.to_csv_string()?),
        ProcessOutput::Files(results) => println!("{}", serde_json::to_string_pretty(results)?),
    }
    Ok(())
}

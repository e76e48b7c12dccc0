use clap::{Parser, Subcommand};
use papercrop::types::BatchResult;
use papercrop::{archive, config, format, output, preview, process, scan};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "papercrop")]
#[command(about = "Batch center-crop photos to paper sizes and zip the results")]
#[command(long_about = "\
Batch center-crop photos to paper sizes and zip the results

Every input is cropped to the largest centered rectangle with the chosen
format's aspect ratio, re-encoded as JPEG and written into a single
timestamped zip archive. Images that cannot be decoded are skipped and
reported; the rest of the batch still completes.

Examples:

  papercrop crop shoot/                    # A4 portrait, ./PaperCrop_<time>.zip
  papercrop crop -f a4-landscape *.jpg     # landscape A4
  papercrop crop --ratio 16:9 -o out/ a.png b.png
  papercrop crop --preview preview/ shoot/ # also write a before/after page

Settings are read from ./papercrop.toml (or --config); flags override them.
Run 'papercrop formats' to list format ids and 'papercrop gen-config' for a
documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./papercrop.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log per-image geometry and decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct CropArgs {
    /// Image files or directories
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Target format id (see `papercrop formats`)
    #[arg(short, long)]
    format: Option<String>,

    /// Custom ratio as W:H, e.g. 4:3 (implies --format custom)
    #[arg(long, value_parser = parse_ratio_arg)]
    ratio: Option<(f64, f64)>,

    /// JPEG quality, 1-100
    #[arg(short, long)]
    quality: Option<u32>,

    /// Directory the zip archive is written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a before/after preview page into this directory
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Crop images and package them as a zip archive
    Crop(CropArgs),
    /// List the accepted format ids and their ratios
    Formats,
    /// Print a stock papercrop.toml with all options documented
    GenConfig,
}

/// JSON written by `--report`.
#[derive(Serialize)]
struct Report<'a> {
    format: String,
    quality: u32,
    archive: Option<&'a Path>,
    #[serde(flatten)]
    result: &'a BatchResult,
}

fn parse_ratio_arg(s: &str) -> Result<(f64, f64), String> {
    format::parse_ratio(s).ok_or_else(|| format!("expected W:H, got '{s}'"))
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Crop(args) => crop(cli.config.as_deref(), args)?,
        Command::Formats => output::print_formats(),
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

fn crop(config_path: Option<&Path>, args: CropArgs) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = config::Overrides {
        format: args.format,
        custom_ratio: args.ratio.map(|(w, h)| [w, h]),
        quality: args.quality,
        output_dir: args.output.map(|p| p.to_string_lossy().into_owned()),
        recursive: args.recursive,
    };
    let config = config::load_config(config_path, Path::new("."), &overrides)?;

    let paths = scan::collect_sources(&args.paths, config.recursive)?;
    let sources = scan::load_sources(&paths)?;

    let settings = process::BatchSettings::new(config.selector(), config.jpeg_quality());
    let result = process::process(&sources, &settings, output::print_process_event)?;

    let archive_path = if result.is_empty() {
        None
    } else {
        Some(archive::save_archive(
            &result,
            &config.output_path(),
            &config.archive_prefix,
        )?)
    };

    if let Some(dir) = &args.preview {
        let index = preview::write_preview(&sources, &result, dir)?;
        println!("Preview: {}", index.display());
    }

    if let Some(report_path) = &args.report {
        let report = Report {
            format: settings.format.to_string(),
            quality: settings.quality.value(),
            archive: archive_path.as_deref(),
            result: &result,
        };
        std::fs::write(report_path, serde_json::to_string_pretty(&report)?)?;
    }

    output::print_summary(&result, archive_path.as_deref());

    if result.is_empty() {
        return Err("no image could be processed".into());
    }
    Ok(())
}

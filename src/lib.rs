//! visdrone-sft: VisDrone detection annotations → QA-style SFT dataset.
//!
//! The conversion runs in two stages. The annotation parser turns per-image
//! text files into a flat list of detection tasks (`detection_tasks.json`).
//! The SFT formatter then turns those tasks into human/assistant question
//! and answer pairs for vision-language fine-tuning.
//!
//! # Modules
//!
//! - [`task`]: Intermediate detection task types and their JSON file
//! - [`annotation`]: VisDrone text annotation parser
//! - [`parse_log`]: Per-line parser diagnostics sinks
//! - [`category`]: Category id → label mapping
//! - [`sft`]: SFT record formatting, skip diagnostics and output
//! - [`error`]: Error types for visdrone-sft operations

pub mod annotation;
pub mod category;
pub mod error;
pub mod parse_log;
pub mod sft;
pub mod task;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

pub use error::SftError;

use annotation::ParseOptions;
use category::{read_category_mapping, CategoryMapping, CategoryPreset};
use parse_log::{FileParseLog, DEFAULT_LOG_FILE};
use task::io_json::DETECTION_TASKS_FILE;

/// The visdrone-sft CLI application.
#[derive(Parser)]
#[command(name = "visdrone-sft")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Parse annotation files into detection_tasks.json.
    Parse(ParseArgs),
    /// Convert detection_tasks.json into an SFT dataset.
    Format(FormatArgs),
    /// Run parse and format back to back.
    Run(RunArgs),
}

/// Options shared by commands that read annotation files.
#[derive(clap::Args)]
struct AnnotationOpts {
    /// Extension of the image that belongs to each annotation file.
    #[arg(long = "image-ext", default_value = "jpg")]
    image_ext: String,

    /// Append-only log of per-line parse results.
    #[arg(long = "log-file", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

/// Options shared by commands that write the SFT dataset.
#[derive(clap::Args)]
struct MappingOpts {
    /// Built-in category names to start from.
    #[arg(long, value_enum, default_value = "visdrone")]
    preset: CategoryPreset,

    /// JSON or YAML file of category id → name, layered over the preset.
    #[arg(long)]
    categories: Option<PathBuf>,

    /// Also write every skip entry to this JSON file.
    #[arg(long = "skipped-out")]
    skipped_out: Option<PathBuf>,
}

/// Arguments for the parse subcommand.
#[derive(clap::Args)]
struct ParseArgs {
    /// Directory of per-image annotation .txt files.
    annotations_dir: PathBuf,

    /// Directory that receives detection_tasks.json.
    #[arg(long = "output-dir")]
    output_dir: PathBuf,

    #[command(flatten)]
    annotation: AnnotationOpts,
}

/// Arguments for the format subcommand.
#[derive(clap::Args)]
struct FormatArgs {
    /// detection_tasks.json produced by the parse step.
    tasks: PathBuf,

    /// Directory holding the images referenced by the tasks.
    #[arg(long = "images-dir")]
    images_dir: PathBuf,

    /// Output path of the SFT JSON dataset.
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    mapping: MappingOpts,
}

/// Arguments for the run subcommand.
#[derive(clap::Args)]
struct RunArgs {
    /// Directory of per-image annotation .txt files.
    #[arg(long = "annotations-dir")]
    annotations_dir: PathBuf,

    /// Directory holding the images referenced by the annotations.
    #[arg(long = "images-dir")]
    images_dir: PathBuf,

    /// Directory that receives detection_tasks.json.
    #[arg(long = "tasks-dir")]
    tasks_dir: PathBuf,

    /// Output path of the SFT JSON dataset.
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    annotation: AnnotationOpts,

    #[command(flatten)]
    mapping: MappingOpts,
}

/// Run the visdrone-sft CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SftError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Parse(args)) => {
            run_parse(&args.annotations_dir, &args.output_dir, &args.annotation)
        }
        Some(Commands::Format(args)) => {
            run_format(&args.tasks, &args.images_dir, &args.output, &args.mapping)
        }
        Some(Commands::Run(args)) => {
            run_parse(&args.annotations_dir, &args.tasks_dir, &args.annotation)?;
            run_format(
                &args.tasks_dir.join(DETECTION_TASKS_FILE),
                &args.images_dir,
                &args.output,
                &args.mapping,
            )?;
            println!("All tasks executed successfully!");
            Ok(())
        }
        None => {
            println!("visdrone-sft {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert VisDrone detection annotations into a QA-style SFT dataset.");
            println!();
            println!("Run 'visdrone-sft --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the parse stage.
fn run_parse(
    annotations_dir: &Path,
    output_dir: &Path,
    opts: &AnnotationOpts,
) -> Result<(), SftError> {
    log::info!("Parsing annotations from {}", annotations_dir.display());

    let parse_opts = ParseOptions {
        image_extension: opts.image_ext.trim_start_matches('.').to_string(),
    };
    let mut log = FileParseLog::new(&opts.log_file);
    let summary =
        annotation::generate_detection_tasks(annotations_dir, output_dir, &parse_opts, &mut log)?;

    println!(
        "Detection tasks generated: {}, Total records: {} (from {} file(s))",
        summary.output_path.display(),
        summary.tasks,
        summary.files
    );
    Ok(())
}

/// Execute the format stage.
fn run_format(
    tasks: &Path,
    images_dir: &Path,
    output: &Path,
    opts: &MappingOpts,
) -> Result<(), SftError> {
    let mapping = build_mapping(opts)?;
    log::info!(
        "Formatting {} with {} predefined category name(s)",
        tasks.display(),
        mapping.len()
    );

    let report = sft::convert_detection_tasks(tasks, output, images_dir, mapping)?;

    if let Some(path) = &opts.skipped_out {
        sft::io_json::write_skipped_json(path, &report.skipped)?;
        log::info!(
            "Wrote {} skip entries to {}",
            report.skipped.len(),
            path.display()
        );
    }

    println!();
    print!("{}", report);
    Ok(())
}

fn build_mapping(opts: &MappingOpts) -> Result<CategoryMapping, SftError> {
    let mut mapping = opts.preset.mapping();
    if let Some(path) = &opts.categories {
        mapping.extend_from(read_category_mapping(path)?);
    }
    Ok(mapping)
}

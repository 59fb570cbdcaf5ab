//! CLI tool for converting PowerPoint presentations into paginated documents.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use deck_core::{output_filename, HtmlPaginator, LayoutRenderer, PageOptions, Paginator};
use deck_pptx::{GroupTransforms, PptxParser};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Convert PowerPoint (.pptx) files into print-ready documents.
#[derive(Parser, Debug)]
#[command(name = "deck-convert")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file(s) (.pptx)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Read group children as slide-absolute instead of composing group transforms
    #[arg(long)]
    flat_groups: bool,

    /// Maximum width of text boxes as a multiple of their declared width
    #[arg(long, default_value = "1.5")]
    text_growth: f64,

    /// Print output to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Paginated HTML, one landscape page per slide
    Html,
    /// The slide model as JSON
    Json,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let group_transforms = if args.flat_groups {
        GroupTransforms::Flat
    } else {
        GroupTransforms::Compose
    };
    let parser = PptxParser::new().with_group_transforms(group_transforms);
    let renderer = LayoutRenderer::new().with_text_growth(args.text_growth);

    let mut failures = 0;
    for input_path in &args.input {
        log::info!("Processing: {}", input_path.display());

        match process_file(input_path, &args, &parser, &renderer) {
            Ok(output) => {
                if args.print {
                    std::io::stdout().write_all(&output)?;
                } else {
                    let output_path =
                        get_output_path(input_path, args.output.as_ref(), args.format.extension())?;
                    write_output(&output_path, &output)?;
                    log::info!("Written to: {}", output_path.display());
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) failed to convert", failures, args.input.len());
    }
    Ok(())
}

/// Convert a single presentation file.
fn process_file(
    input_path: &Path,
    args: &Args,
    parser: &PptxParser,
    renderer: &LayoutRenderer,
) -> Result<Vec<u8>> {
    let data = std::fs::read(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;

    if !deck_pptx::is_package(&data) {
        log::warn!(
            "{} does not start with a ZIP header, trying anyway",
            input_path.display()
        );
    }

    let presentation = parser.parse(&data)?;
    log::debug!(
        "Found {} slides, {} elements",
        presentation.slides.len(),
        presentation.element_count()
    );

    match args.format {
        OutputFormat::Json => {
            serde_json::to_vec_pretty(&presentation).context("Failed to serialize slide model")
        }
        OutputFormat::Html => {
            let surfaces = renderer.render(&presentation);
            let title = input_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("presentation");
            let paginator = HtmlPaginator::new().with_title(title);
            let document = paginator.render_document(&surfaces, &PageOptions::default())?;
            Ok(document)
        }
    }
}

/// Determine the output path for a processed file.
fn get_output_path(
    input_path: &Path,
    output_dir: Option<&PathBuf>,
    extension: &str,
) -> Result<PathBuf> {
    let input_name = input_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let output_filename = output_filename(input_name, extension);

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

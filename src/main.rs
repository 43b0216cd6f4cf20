use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use essay_facsimile::{Fonts, Geometry, pages_to_pdf, render_request_file};

/// Render a graded essay as annotated composition-paper pages.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// JSON render request: {"title", "content", "grading"}
    input: PathBuf,

    /// Directory for page-NNN.png files
    #[arg(short, long, default_value = "pages")]
    output: PathBuf,

    /// Font file for glyphs (default: scan font directories for a CJK face)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Face index inside a .ttc/.otc collection
    #[arg(long, default_value_t = 0)]
    face_index: u32,

    /// Multiplier on the 702x993 base page
    #[arg(long, default_value_t = 2)]
    scale: u32,

    /// Also bundle all pages into this PDF
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let fonts = match &cli.font {
        Some(path) => match Fonts::from_file(path, cli.face_index) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Fonts::discover(),
    };
    let geo = Geometry::scaled(cli.scale);

    let rendering = match render_request_file(&cli.input, &cli.output, &geo, &fonts) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    for w in &rendering.warnings {
        eprintln!("Warning: {w}");
    }

    if let Some(pdf_path) = &cli.pdf {
        if let Err(e) = std::fs::write(pdf_path, pages_to_pdf(&rendering.pages)) {
            eprintln!("Error: {}: {e}", pdf_path.display());
            return ExitCode::FAILURE;
        }
    }

    println!(
        "Rendered {} -> {} pages in {}",
        cli.input.display(),
        rendering.pages.len(),
        cli.output.display()
    );
    ExitCode::SUCCESS
}

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use xhs_cover::cover::CoverDocument;
use xhs_cover::{CoverComposer, HeuristicMeasurer, ResolutionAdapter, Surface};

#[derive(Parser)]
#[command(name = "xhs-cover", version, about = "Lay out and render cover images")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the body layout of a cover document as JSON
    Layout {
        /// Cover document (JSON)
        input: PathBuf,
    },
    /// Render a cover document to PNG
    Render {
        input: PathBuf,
        #[arg(short, long, default_value = "cover.png")]
        output: PathBuf,
        /// Render the 360x480 preview instead of the 1080x1440 export
        #[arg(long)]
        preview: bool,
    },
    /// Write a default cover document
    Init { path: PathBuf },
}

fn read_document(path: &PathBuf) -> Result<CoverDocument> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let adapter = ResolutionAdapter::default();
    let measurer = HeuristicMeasurer::default();

    match cli.command {
        Command::Layout { input } => {
            let doc = read_document(&input)?;
            let layout = CoverComposer::new(&adapter, &measurer).layout_body(&doc)?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
        Command::Render { input, output, preview } => {
            let doc = read_document(&input)?;
            let surface = if preview { Surface::Preview } else { Surface::Export };
            let shot = xhs_cover::render_png(
                &doc,
                &adapter,
                &measurer,
                surface,
                &xhs_cover::rendering::raster::NoopGlyphPainter,
            )?;
            fs::write(&output, &shot.png_data).with_context(|| format!("writing {}", output.display()))?;
            log::info!("wrote {}x{} cover to {}", shot.width, shot.height, output.display());
        }
        Command::Init { path } => {
            let json = serde_json::to_string_pretty(&CoverDocument::default())?;
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        }
    }
    Ok(())
}

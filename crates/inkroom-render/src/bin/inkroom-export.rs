//! Export a stored drawing to SVG or PNG.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use inkroom_core::ShapeKind;
use inkroom_core::document::Document;
use inkroom_core::export::{DEFAULT_EXPORT_HEIGHT, DEFAULT_EXPORT_WIDTH, export_svg};
use inkroom_core::storage::DrawingRecord;
use inkroom_render::{VelloSurface, export_png};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Png,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Png => "png",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "inkroom-export")]
#[command(about = "Export an inkroom drawing to SVG or PNG")]
struct Cli {
    /// Drawing JSON: a shape array or a stored room record
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    #[arg(long, default_value_t = DEFAULT_EXPORT_WIDTH)]
    width: u32,

    #[arg(long, default_value_t = DEFAULT_EXPORT_HEIGHT)]
    height: u32,

    /// TrueType/OpenType font for text shapes in PNG output
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output file (defaults to whiteboard-<millis>.<ext>)
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Accepted input layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
    Record(DrawingRecord),
    Shapes(Document),
}

fn read_document(path: &Path) -> Result<Document> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let input: Input = serde_json::from_str(&json)
        .with_context(|| format!("parsing {}", path.display()))?;
    let shapes = match input {
        Input::Record(record) => record.shapes,
        Input::Shapes(document) => document.into_shapes(),
    };
    Ok(Document::from_shapes(shapes)?)
}

fn default_output(format: Format) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    PathBuf::from(format!("whiteboard-{millis}.{}", format.extension()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let document = read_document(&cli.input)?;
    log::info!("Loaded {} shapes from {}", document.len(), cli.input.display());

    let bytes = match cli.format {
        Format::Svg => export_svg(&document, cli.width, cli.height).into_bytes(),
        Format::Png => {
            let font = match &cli.font {
                Some(path) => {
                    let bytes = std::fs::read(path)
                        .with_context(|| format!("reading font {}", path.display()))?;
                    Some(VelloSurface::load_font(bytes)?)
                }
                None => {
                    if document.iter().any(|s| s.kind() == ShapeKind::Text) {
                        log::warn!("No --font given, text shapes are left out of the PNG");
                    }
                    None
                }
            };
            export_png(&document, cli.width, cli.height, font)?
        }
    };

    let out = cli.out.unwrap_or_else(|| default_output(cli.format));
    std::fs::write(&out, bytes).with_context(|| format!("writing {}", out.display()))?;
    log::info!("Wrote {}", out.display());
    println!("{}", out.display());
    Ok(())
}

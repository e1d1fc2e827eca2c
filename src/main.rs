use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use journeymap::{Journey, MapView, Mode};

/// Render a customer journey map to SVG or PNG.
#[derive(Parser, Debug)]
#[command(name = "journeymap", version, about)]
struct Args {
    /// Path to a journey definition (JSON); renders the built-in sample when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file; format is inferred from the extension (.svg or .png)
    #[arg(short, long, default_value = "journey.svg")]
    output: PathBuf,

    /// Start in vertical layout instead of horizontal
    #[arg(long)]
    vertical: bool,

    /// Flip the layout mode before rendering
    #[arg(long)]
    toggle: bool,

    /// Canvas background color
    #[arg(long, default_value = "#f8fafc")]
    background: String,

    /// Raster scale factor for PNG output
    #[arg(long, default_value_t = 2.0)]
    scale: f32,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = Args::parse();

    let journey = match &args.input {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Journey::from_json(&raw)?
        }
        None => Journey::sample(),
    };

    let initial = if args.vertical {
        Mode::Vertical
    } else {
        Mode::Horizontal
    };
    let mut view = MapView::new(initial);
    if args.toggle {
        view.toggle_mode();
    }

    info!(
        mode = view.mode().as_str(),
        stages = journey.stages().len(),
        "rendering journey map"
    );

    let is_png = args
        .output
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);

    if is_png {
        let png = journey.render_png(view.mode(), &args.background, args.scale)?;
        fs::write(&args.output, png)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
    } else {
        let svg = journey.render_svg(view.mode(), &args.background)?;
        fs::write(&args.output, svg)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
    }

    info!(output = %args.output.display(), "journey map written");
    Ok(())
}

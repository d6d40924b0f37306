use anyhow::Context;
use clap::{Parser, Subcommand};
use pancakekit::designer::FloodFillResult;
use pancakekit::{init_logging, Config, Layer, Point, Rect, Shade, TinySkiaRasterizer};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Toolpath planning and G-code generation for pancake printers
struct Cli {
    /// Configuration file (JSON or TOML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene file to a printer script
    Render {
        /// Scene file (JSON layer)
        scene: PathBuf,
        /// Output file, stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Flood fill the closed region around a point and add it to the scene
    Fill {
        /// Scene file (JSON layer)
        scene: PathBuf,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        /// Shade index of the new fill (0-3)
        #[arg(long, default_value_t = 0)]
        shade: u8,
        /// Output scene file, overwrites the input when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the default configuration as TOML
    Config,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn load_scene(path: &Path) -> anyhow::Result<Layer> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scene {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    tracing::debug!("PancakeKit {} built {}", pancakekit::VERSION, pancakekit::BUILD_DATE);

    match cli.command {
        Command::Render { scene, output } => {
            let config = load_config(cli.config.as_deref())?;
            let layer = load_scene(&scene)?;
            match output {
                Some(path) => {
                    pancakekit::render_to_file(&layer, &config.render, &path)
                        .with_context(|| format!("rendering to {}", path.display()))?;
                }
                None => {
                    let gcode = pancakekit::render(&layer, &config.render)?;
                    print!("{}", gcode);
                }
            }
        }
        Command::Fill {
            scene,
            x,
            y,
            shade,
            output,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let mut layer = load_scene(&scene)?;
            let shade = Shade::try_new(shade)
                .with_context(|| format!("shade {} is not in the palette", shade))?;
            let view = config.render.view;
            let region = Rect::from_xywh(view.x, 0.0, view.width, view.height);
            let raster = TinySkiaRasterizer::new(&layer, config.fill_tool.stroke_width);
            let result = pancakekit::flood_fill(
                Point::new(x, y),
                &layer,
                &raster,
                &region,
                shade,
                &config.fill_tool,
            )?;
            let existing = matches!(result, FloodFillResult::Existing(_));
            let id = result.add_to(&mut layer);
            if existing {
                tracing::info!("Seed is inside existing fill {:?}", id);
            } else {
                tracing::info!("Added fill {:?}", id);
            }

            let out = output.unwrap_or(scene);
            let json = serde_json::to_string_pretty(&layer)?;
            std::fs::write(&out, json).with_context(|| format!("writing {}", out.display()))?;
        }
        Command::Config => {
            let config = load_config(cli.config.as_deref())?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

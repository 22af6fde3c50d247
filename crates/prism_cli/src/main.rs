//! prism CLI - render JSON scenes offline
//!
//! `prism render` writes an image, `prism pick` dumps the octree leaves a
//! pixel's ray passes through, and `prism info` summarises a scene.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use prism_core::load_scene;
use prism_renderer::{render, Color, RenderConfig, World, DEFAULT_BUCKET_SIZE};

#[derive(Parser)]
#[command(name = "prism")]
#[command(about = "Octree-accelerated Whitted ray tracer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Copy)]
struct Resolution {
    /// Image width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,
    /// Image height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene to an image file
    Render {
        /// Scene description (.json)
        scene: PathBuf,
        /// Output image (format determined by extension)
        #[arg(short, long, default_value = "out.png")]
        output: PathBuf,
        #[command(flatten)]
        resolution: Resolution,
        /// Average four sub-pixel samples per pixel
        #[arg(short, long)]
        antialias: bool,
        /// Bucket edge length in pixels
        #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
        bucket_size: u32,
        /// Background for primary rays that miss, as r,g,b
        #[arg(long, value_parser = parse_color)]
        background: Option<Color>,
    },
    /// Report the octree leaves crossed by the ray through a pixel
    Pick {
        /// Scene description (.json)
        scene: PathBuf,
        /// Pixel column
        x: u32,
        /// Pixel row, counted from the top
        y: u32,
        #[command(flatten)]
        resolution: Resolution,
    },
    /// Display information about a scene
    Info {
        /// Scene description (.json)
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            scene,
            output,
            resolution,
            antialias,
            bucket_size,
            background,
        } => {
            let config = RenderConfig {
                width: resolution.width,
                height: resolution.height,
                antialias,
                bucket_size,
                background,
            };
            render_scene(&scene, &output, &config)?;
        }
        Commands::Pick {
            scene,
            x,
            y,
            resolution,
        } => {
            pick_pixel(&scene, x, y, resolution)?;
        }
        Commands::Info { scene } => {
            show_info(&scene)?;
        }
    }

    Ok(())
}

/// Parse `r,g,b` into a colour.
fn parse_color(s: &str) -> Result<Color, String> {
    let channels = s
        .split(',')
        .map(|c| c.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid colour channel in '{s}': {e}"))?;
    match channels[..] {
        [r, g, b] => Ok(Color::new(r, g, b)),
        _ => Err(format!("expected r,g,b, got {} channels", channels.len())),
    }
}

fn load_world(path: &Path) -> Result<World> {
    let scene = load_scene(path)
        .with_context(|| format!("Failed to load scene {}", path.display()))?;
    Ok(World::new(scene))
}

fn render_scene(scene: &Path, output: &Path, config: &RenderConfig) -> Result<()> {
    anyhow::ensure!(
        config.width > 0 && config.height > 0,
        "Resolution must be non-zero, got {}x{}",
        config.width,
        config.height
    );

    let world = load_world(scene)?;
    let image = render(&world, config);
    image
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Rendered {} to {}", scene.display(), output.display());
    Ok(())
}

fn pick_pixel(scene: &Path, x: u32, y: u32, resolution: Resolution) -> Result<()> {
    anyhow::ensure!(
        x < resolution.width && y < resolution.height,
        "Pixel ({x}, {y}) is outside {}x{}",
        resolution.width,
        resolution.height
    );

    let world = load_world(scene)?;
    let config = RenderConfig {
        width: resolution.width,
        height: resolution.height,
        ..Default::default()
    };
    let camera = config.camera(world.scene().fov);

    // Camera rows count up from the bottom
    let row = (resolution.height - 1 - y) as f32;
    let visits = world.pick(camera.origin(), camera.target(x as f32, row));

    println!("Pixel ({x}, {y}) crosses {} leaves", visits.len());
    for visit in &visits {
        let ids: Vec<String> = visit.shapes.iter().map(|id| id.0.to_string()).collect();
        println!("  {:?} -> [{}]", visit.bbox.to_array(), ids.join(", "));
    }
    Ok(())
}

fn show_info(path: &Path) -> Result<()> {
    let world = load_world(path)?;
    let scene = world.scene();
    let lighting = &scene.lighting;

    println!("Scene: {}", scene.name);
    println!("  Field of view: {}", scene.fov);
    println!("  Background: {:?}", scene.background);
    println!(
        "  Shapes: {} ({} bounded, {} planes)",
        scene.shape_count(),
        scene.bounded().len(),
        scene.planes().len()
    );
    match scene.bounds() {
        Some(bounds) => println!("  Bounds: {:?}", bounds.to_array()),
        None => println!("  Bounds: none"),
    }
    println!(
        "  Lights: {} point, {} directional, {} spot",
        lighting.points.len(),
        lighting.directionals.len(),
        lighting.spots.len()
    );

    let stats = world.octree().stats();
    println!(
        "  Octree: {} nodes, {} leaves, depth {}",
        stats.nodes, stats.leaves, stats.max_depth
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["prism", "render", "scene.json"]).unwrap();
        let Commands::Render {
            output,
            resolution,
            antialias,
            bucket_size,
            background,
            ..
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(output, PathBuf::from("out.png"));
        assert_eq!((resolution.width, resolution.height), (640, 480));
        assert!(!antialias);
        assert_eq!(bucket_size, DEFAULT_BUCKET_SIZE);
        assert!(background.is_none());
    }

    #[test]
    fn test_render_background() {
        let cli = Cli::try_parse_from([
            "prism",
            "render",
            "scene.json",
            "--background",
            "0.1,0.2,0.3",
            "-a",
        ])
        .unwrap();
        let Commands::Render {
            background,
            antialias,
            ..
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(background, Some(Color::new(0.1, 0.2, 0.3)));
        assert!(antialias);
    }

    #[test]
    fn test_background_needs_three_channels() {
        assert!(
            Cli::try_parse_from(["prism", "render", "s.json", "--background", "0.1,0.2"]).is_err()
        );
        assert!(Cli::try_parse_from([
            "prism",
            "render",
            "s.json",
            "--background",
            "0.1,0.2,0.3,0.4"
        ])
        .is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("1, 0.5,0"), Ok(Color::new(1.0, 0.5, 0.0)));
        assert!(parse_color("red").is_err());
        assert!(parse_color("").is_err());
    }

    #[test]
    fn test_pick_arguments() {
        let cli =
            Cli::try_parse_from(["prism", "pick", "s.json", "3", "4", "--width", "100"]).unwrap();
        let Commands::Pick {
            x, y, resolution, ..
        } = cli.command
        else {
            panic!("expected pick");
        };
        assert_eq!((x, y), (3, 4));
        assert_eq!(resolution.width, 100);
        assert_eq!(resolution.height, 480);
    }
}

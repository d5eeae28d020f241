use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;

use terrain_generator::maps::WorldData;
use terrain_generator::telemetry::{init_logging, log_startup_header};
use terrain_generator::{ascii, export, GeneratorConfig, MapOrchestrator};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Dimension {
    #[value(name = "2d")]
    Flat,
    #[value(name = "3d")]
    Layered,
}

#[derive(Parser, Debug)]
#[command(name = "terrain_generator")]
#[command(about = "Generate procedural terrain heightmaps and their adjacency graph")]
struct Args {
    /// TOML configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of the grid in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the grid in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if neither this nor the config sets one)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Highest elevation above sea level, in km
    #[arg(long)]
    max_elevation: Option<f64>,

    /// Deepest point below sea level, in km
    #[arg(long)]
    max_depth: Option<f64>,

    /// Number of erosion rounds
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Grid layout
    #[arg(short, long, value_enum, default_value = "2d")]
    dimension: Dimension,

    /// Write the world dump (terrain + heights + graph summary) to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Export normalized elevation as an image (e.g., "terrain.png")
    #[arg(long)]
    png: Option<PathBuf>,

    /// Print the map as ASCII
    #[arg(long)]
    ascii: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<GeneratorConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)?,
            None => GeneratorConfig {
                seed: rand::random(),
                ..GeneratorConfig::default()
            },
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(max_elevation) = self.max_elevation {
            config.grid.max_elevation = max_elevation;
        }
        if let Some(max_depth) = self.max_depth {
            config.grid.max_depth = max_depth;
        }
        if let Some(iterations) = self.iterations {
            config.erosion.iterations = iterations;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run_flat(args: &Args, config: GeneratorConfig) -> Result<(), Box<dyn Error>> {
    let mut orchestrator = MapOrchestrator::new(config)?;
    orchestrator.generate()?;
    println!("{}", orchestrator);

    let grid = orchestrator.grid();
    let normalized = grid.normalized_elevation_map();
    if args.ascii {
        print!("{}", ascii::render_normalized(&normalized));
        println!();
        print!("{}", ascii::render_materials(&grid.material_map()));
        println!();
        print!("{}", ascii::height_legend());
    }
    if let Some(path) = &args.png {
        export::export_normalized(&normalized, path)?;
    }
    if let Some(path) = &args.json {
        WorldData::from_orchestrator(&orchestrator).to_json_file(path)?;
    }
    Ok(())
}

fn run_layered(args: &Args, config: GeneratorConfig) -> Result<(), Box<dyn Error>> {
    let mut orchestrator = MapOrchestrator::new_3d(config)?;
    orchestrator.generate()?;
    println!("{}", orchestrator);

    let grid = orchestrator.grid();
    println!(
        "  Z-levels: {} (sea level at {})",
        grid.z_levels(),
        grid.sea_level_index()
    );
    println!(
        "  Graph: {} nodes, {} edges",
        orchestrator.graph().node_count(),
        orchestrator.graph().edge_count()
    );

    let normalized = grid.normalized_elevation_map();
    if args.ascii {
        print!("{}", ascii::render_normalized(&normalized));
        println!();
        print!("{}", ascii::render_materials(&grid.surface_material_map()));
    }
    if let Some(path) = &args.png {
        export::export_normalized(&normalized, path)?;
    }
    if args.json.is_some() {
        info!("JSON dump is only written for 2d runs; skipping");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    init_logging(&config.logging.level);
    log_startup_header();
    info!(
        "Generating terrain with seed {} ({}x{}, {:?})",
        config.seed, config.grid.width, config.grid.height, args.dimension
    );

    match args.dimension {
        Dimension::Flat => run_flat(&args, config),
        Dimension::Layered => run_layered(&args, config),
    }
}

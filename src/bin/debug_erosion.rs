//! Debug tool for comparing erosion round counts
//! Prints per-variant statistics and writes a strip of normalized fields side by side

use image::{ImageBuffer, Rgb, RgbImage};
use terrain_generator::erosion::ErosionPass;
use terrain_generator::export::render_normalized;
use terrain_generator::orchestrator::rescale_to_range;
use terrain_generator::telemetry::init_logging;
use terrain_generator::{GeneratorConfig, MapOrchestrator};

const WIDTH: usize = 128;
const HEIGHT: usize = 128;
const SEED: u64 = 42;
const VARIANTS: &[usize] = &[0, 1, 5, 10, 25, 50, 100];
const GAP: u32 = 4;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("warn");
    println!("Generating erosion comparison strip...");

    let config = GeneratorConfig::with_grid(WIDTH, HEIGHT, 10.0, 5.0, SEED);
    let orchestrator = MapOrchestrator::new(config)?;
    let raw = orchestrator.raw_field();
    let erosion_seed = orchestrator.seeds().erosion;
    println!(
        "Raw field: min {:.4}, max {:.4}, mean {:.4}",
        raw.min_value().unwrap_or(0.0),
        raw.max_value().unwrap_or(0.0),
        raw.mean().unwrap_or(0.0)
    );

    let strip_width = (WIDTH as u32 + GAP) * VARIANTS.len() as u32 - GAP;
    let mut strip: RgbImage = ImageBuffer::from_pixel(strip_width, HEIGHT as u32, Rgb([0, 0, 0]));

    println!(
        "{:>6} {:>12} {:>12} {:>10} {:>10}",
        "rounds", "removed", "max cell", "at floor", "mean"
    );
    for (i, &iterations) in VARIANTS.iter().enumerate() {
        let (eroded, stats) = ErosionPass::new(iterations, erosion_seed).apply_with_stats(&raw);
        println!(
            "{:>6} {:>12.4} {:>12.4} {:>10} {:>10.4}",
            iterations,
            stats.total_removed,
            stats.max_cell_removed,
            stats.cells_at_floor,
            eroded.mean().unwrap_or(0.0)
        );

        let tile = match rescale_to_range(&eroded, 1.0) {
            Ok(normalized) => render_normalized(&normalized),
            Err(e) => {
                println!("  rounds {}: {}", iterations, e);
                continue;
            }
        };
        let offset = i as u32 * (WIDTH as u32 + GAP);
        for (x, y, pixel) in tile.enumerate_pixels() {
            strip.put_pixel(offset + x, y, *pixel);
        }
    }

    let output = "erosion_comparison.png";
    strip.save(output)?;
    println!("Saved {}", output);
    Ok(())
}

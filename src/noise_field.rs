//! Raw scalar field synthesis
//!
//! Two generators feed the heightmap:
//! - **Coherent noise**: Perlin sampled at `(x * scale, y * scale)`, smooth across neighbors
//! - **Cellular noise**: nearest-seed-point ownership, a piecewise-constant Voronoi partition
//!
//! Both are pure functions of their parameters, seed and field size.

use noise::{NoiseFn, Perlin};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::tilemap::Tilemap;

/// Default blend weight of the coherent layer.
pub const COHERENT_WEIGHT: f64 = 0.7;
/// Default blend weight of the cellular layer.
pub const CELLULAR_WEIGHT: f64 = 0.3;

/// A generator producing one value per cell of a `width x height` field.
pub trait NoiseField {
    fn generate(&self, width: usize, height: usize) -> Tilemap<f64>;
}

/// Smooth Perlin noise. Smaller `scale` means longer wavelengths.
pub struct CoherentNoise {
    scale: f64,
    perlin: Perlin,
}

impl CoherentNoise {
    pub fn new(scale: f64, seed: u32) -> Self {
        Self {
            scale,
            perlin: Perlin::new(seed),
        }
    }

    pub fn sample(&self, x: usize, y: usize) -> f64 {
        self.perlin.get([x as f64 * self.scale, y as f64 * self.scale])
    }
}

impl NoiseField for CoherentNoise {
    fn generate(&self, width: usize, height: usize) -> Tilemap<f64> {
        Tilemap::from_fn(width, height, |x, y| self.sample(x, y))
    }
}

/// Region noise: each cell takes `index / regions` of its closest seed point.
pub struct CellularNoise {
    regions: usize,
    seed: u64,
}

impl CellularNoise {
    pub fn new(regions: usize, seed: u64) -> Self {
        Self { regions, seed }
    }

    /// Scatter the seed points uniformly over `[0, width) x [0, height)`.
    pub fn seed_points(&self, width: usize, height: usize) -> Vec<(f64, f64)> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        (0..self.regions)
            .map(|_| {
                let x = rng.gen::<f64>() * width as f64;
                let y = rng.gen::<f64>() * height as f64;
                (x, y)
            })
            .collect()
    }
}

impl NoiseField for CellularNoise {
    fn generate(&self, width: usize, height: usize) -> Tilemap<f64> {
        let points = self.seed_points(width, height);
        if points.is_empty() {
            return Tilemap::new_with(width, height, 0.0);
        }

        Tilemap::from_fn(width, height, |x, y| {
            let nearest = nearest_point(&points, x as f64, y as f64);
            nearest as f64 / self.regions as f64
        })
    }
}

/// Index of the closest point; ties go to the lowest index.
fn nearest_point(points: &[(f64, f64)], x: f64, y: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &(px, py)) in points.iter().enumerate() {
        let dist = (px - x).powi(2) + (py - y).powi(2);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Weighted sum of two equally-sized fields.
pub fn blend(
    coherent: &Tilemap<f64>,
    cellular: &Tilemap<f64>,
    coherent_weight: f64,
    cellular_weight: f64,
) -> Tilemap<f64> {
    debug_assert_eq!((coherent.width, coherent.height), (cellular.width, cellular.height));
    Tilemap::from_fn(coherent.width, coherent.height, |x, y| {
        coherent_weight * *coherent.get(x, y) + cellular_weight * *cellular.get(x, y)
    })
}

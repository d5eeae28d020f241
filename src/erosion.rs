//! Coarse stochastic relaxation of a scalar field
//!
//! Every round subtracts an independent uniform draw in `[0, MAX_PERTURBATION)` from each
//! cell and clamps at `EROSION_FLOOR`. Values only ever go down and never below the floor.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::tilemap::Tilemap;

/// Exclusive upper bound of the per-cell, per-round perturbation.
pub const MAX_PERTURBATION: f64 = 0.01;
/// Eroded values are clamped at this floor.
pub const EROSION_FLOOR: f64 = 0.0;

/// A bounded number of relaxation rounds driven by a seeded RNG.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErosionPass {
    pub iterations: usize,
    pub seed: u64,
}

/// Summary of what one `apply` call removed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ErosionStats {
    pub iterations: usize,
    pub total_removed: f64,
    pub max_cell_removed: f64,
    pub cells_at_floor: usize,
}

impl ErosionPass {
    pub fn new(iterations: usize, seed: u64) -> Self {
        Self { iterations, seed }
    }

    /// Return the eroded copy of `field`. Zero iterations is the identity.
    pub fn apply(&self, field: &Tilemap<f64>) -> Tilemap<f64> {
        self.apply_with_stats(field).0
    }

    pub fn apply_with_stats(&self, field: &Tilemap<f64>) -> (Tilemap<f64>, ErosionStats) {
        let mut eroded = field.clone();
        if self.iterations == 0 {
            return (eroded, ErosionStats::default());
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        for _ in 0..self.iterations {
            erode_round(&mut eroded, &mut rng);
        }

        let mut stats = ErosionStats {
            iterations: self.iterations,
            ..Default::default()
        };
        for (x, y, &after) in eroded.iter() {
            let removed = *field.get(x, y) - after;
            stats.total_removed += removed;
            stats.max_cell_removed = stats.max_cell_removed.max(removed);
            if after <= EROSION_FLOOR {
                stats.cells_at_floor += 1;
            }
        }

        (eroded, stats)
    }
}

/// One round over every cell in row-major order.
pub(crate) fn erode_round(field: &mut Tilemap<f64>, rng: &mut ChaCha8Rng) {
    for (_, _, value) in field.iter_mut() {
        let perturbation = rng.gen_range(0.0..MAX_PERTURBATION);
        *value = (*value - perturbation).max(EROSION_FLOOR);
    }
}

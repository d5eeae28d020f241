//! Seed management for terrain generation
//!
//! Each pipeline stage gets its own seed, derived from the master seed by default.
//! Individual seeds can be overridden to vary one stage while keeping the others fixed.

/// Seeds for every randomized stage of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainSeeds {
    /// Master seed (the one users configure)
    pub master: u64,
    /// Coherent (Perlin) noise permutation table
    pub coherent: u64,
    /// Cellular noise seed-point scatter
    pub cellular: u64,
    /// Per-cell erosion perturbations
    pub erosion: u64,
}

impl TerrainSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            coherent: derive_seed(master, "coherent"),
            cellular: derive_seed(master, "cellular"),
            erosion: derive_seed(master, "erosion"),
        }
    }

    pub fn builder(master: u64) -> TerrainSeedsBuilder {
        TerrainSeedsBuilder {
            seeds: Self::from_master(master),
        }
    }

    /// Perlin takes a 32-bit seed.
    pub fn coherent_u32(&self) -> u32 {
        self.coherent as u32
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct TerrainSeedsBuilder {
    seeds: TerrainSeeds,
}

impl TerrainSeedsBuilder {
    pub fn coherent(mut self, seed: u64) -> Self {
        self.seeds.coherent = seed;
        self
    }

    pub fn cellular(mut self, seed: u64) -> Self {
        self.seeds.cellular = seed;
        self
    }

    pub fn erosion(mut self, seed: u64) -> Self {
        self.seeds.erosion = seed;
        self
    }

    pub fn build(self) -> TerrainSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a stage name.
///
/// FNV-1a over the stage name, folded into the master and finished with SplitMix64.
/// Fixed arithmetic, so a seed stored in a dump regenerates the same terrain on any build.
fn derive_seed(master: u64, stage: &str) -> u64 {
    let mut name_hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in stage.bytes() {
        name_hash ^= u64::from(byte);
        name_hash = name_hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    splitmix64(master ^ name_hash)
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

impl std::fmt::Display for TerrainSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TerrainSeeds {{ master: {}, coherent: {}, cellular: {}, erosion: {} }}",
            self.master, self.coherent, self.cellular, self.erosion,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        assert_eq!(TerrainSeeds::from_master(12345), TerrainSeeds::from_master(12345));
    }

    #[test]
    fn test_stages_get_different_seeds() {
        let seeds = TerrainSeeds::from_master(12345);
        assert_ne!(seeds.coherent, seeds.cellular);
        assert_ne!(seeds.cellular, seeds.erosion);
    }

    #[test]
    fn test_derivation_is_pinned() {
        let seeds = TerrainSeeds::from_master(42);
        assert_eq!(seeds.coherent, 13026287040569854188);
        assert_eq!(seeds.cellular, 15984757978213571572);
        assert_eq!(seeds.erosion, 12782165734848404764);
    }

    #[test]
    fn test_builder_override() {
        let seeds = TerrainSeeds::builder(12345).erosion(99999).build();
        assert_eq!(seeds.erosion, 99999);
        assert_eq!(seeds.coherent, TerrainSeeds::from_master(12345).coherent);
    }
}

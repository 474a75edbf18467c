//! Common interface over the two world generators
//!
//! The grid biome map and the lazy hex map classify terrain with different
//! biome sets. `WorldStrategy` lets callers sample either one by integer
//! position without merging those sets.

use crate::biome_map::BiomeMap;
use crate::export::{biome_color, grid_biome_color};
use crate::generator::HexMapGenerator;
use crate::hex::AxialCoord;
use crate::tiles::{PoiKind, TileRarity};

/// What a generator reports for one position
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TileSummary {
    pub x: i32,
    pub y: i32,
    pub biome: &'static str,
    pub poi: Option<&'static str>,
    pub rarity: Option<TileRarity>,
    pub color: (u8, u8, u8),
}

pub trait WorldStrategy {
    fn name(&self) -> &'static str;

    fn seed(&self) -> i32;

    /// Summary of the tile at a position. Bounded generators return `None`
    /// outside their area.
    fn sample(&mut self, x: i32, y: i32) -> Option<TileSummary>;
}

impl WorldStrategy for BiomeMap {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn seed(&self) -> i32 {
        BiomeMap::seed(self)
    }

    fn sample(&mut self, x: i32, y: i32) -> Option<TileSummary> {
        let biome = self.biome_at(x, y)?;
        Some(TileSummary {
            x,
            y,
            biome: biome.display_name(),
            poi: None,
            rarity: None,
            color: grid_biome_color(biome),
        })
    }
}

/// Positions are axial `(q, r)`.
impl WorldStrategy for HexMapGenerator {
    fn name(&self) -> &'static str {
        "hex"
    }

    fn seed(&self) -> i32 {
        HexMapGenerator::seed(self)
    }

    fn sample(&mut self, x: i32, y: i32) -> Option<TileSummary> {
        let tile = self.tile_data(AxialCoord::new(x, y));
        Some(TileSummary {
            x,
            y,
            biome: tile.biome.display_name(),
            poi: (tile.poi != PoiKind::None).then(|| tile.poi.display_name()),
            rarity: Some(tile.rarity),
            color: biome_color(tile.biome),
        })
    }
}

/// Sample a rectangle row by row
pub fn sample_area(strategy: &mut dyn WorldStrategy, width: i32, height: i32) -> Vec<TileSummary> {
    let mut samples = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if let Some(summary) = strategy.sample(x, y) {
                samples.push(summary);
            }
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome_map::BiomeMapConfig;
    use crate::config::GenerationConfig;

    #[test]
    fn test_both_strategies_sample() {
        let config = BiomeMapConfig {
            width: 6,
            height: 6,
            ..Default::default()
        };
        let mut grid = BiomeMap::generate(config, 17);
        let mut hex = HexMapGenerator::new(GenerationConfig::default(), 17);

        let strategies: [&mut dyn WorldStrategy; 2] = [&mut grid, &mut hex];
        for strategy in strategies {
            assert_eq!(strategy.seed(), 17);
            assert_eq!(sample_area(strategy, 6, 6).len(), 36);
        }
    }

    #[test]
    fn test_grid_is_bounded() {
        let config = BiomeMapConfig {
            width: 4,
            height: 4,
            ..Default::default()
        };
        let mut grid = BiomeMap::generate(config, 3);
        assert!(grid.sample(4, 0).is_none());
        assert_eq!(sample_area(&mut grid, 8, 8).len(), 16);
    }
}

//! Statistics over generated tiles

use std::collections::HashMap;

use crate::generator::HexMapGenerator;
use crate::hex::AxialCoord;
use crate::tiles::{BiomeKind, PoiKind, TileRarity, TileRecord};

/// Counts over a set of tiles
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct MapStatistics {
    pub tiles: usize,
    pub conquered: usize,
    pub unlocked: usize,
    pub visible: usize,
    pub megagon_centers: usize,
    pub biomes: HashMap<BiomeKind, usize>,
    pub rarities: HashMap<TileRarity, usize>,
    pub pois: HashMap<PoiKind, usize>,
}

impl MapStatistics {
    pub fn from_tiles<'a>(tiles: impl IntoIterator<Item = &'a TileRecord>) -> Self {
        let mut stats = Self::default();
        for tile in tiles {
            stats.add(tile);
        }
        stats
    }

    /// Every tile the generator has produced so far
    pub fn from_generator(generator: &HexMapGenerator) -> Self {
        Self::from_tiles(generator.tiles())
    }

    /// Tiles within `radius` of `center`, generating any that are missing
    pub fn from_region(generator: &mut HexMapGenerator, center: AxialCoord, radius: i32) -> Self {
        let mut stats = Self::default();
        for coord in center.hexes_in_range(radius) {
            stats.add(generator.tile_data(coord));
        }
        stats
    }

    fn add(&mut self, tile: &TileRecord) {
        self.tiles += 1;
        if tile.conquered {
            self.conquered += 1;
        }
        if tile.unlocked {
            self.unlocked += 1;
        }
        if tile.visible {
            self.visible += 1;
        }
        if tile.is_megagon_center {
            self.megagon_centers += 1;
        }
        *self.biomes.entry(tile.biome).or_insert(0) += 1;
        *self.rarities.entry(tile.rarity).or_insert(0) += 1;
        if tile.poi != PoiKind::None {
            *self.pois.entry(tile.poi).or_insert(0) += 1;
        }
    }

    pub fn biome_count(&self, biome: BiomeKind) -> usize {
        self.biomes.get(&biome).copied().unwrap_or(0)
    }

    pub fn rarity_count(&self, rarity: TileRarity) -> usize {
        self.rarities.get(&rarity).copied().unwrap_or(0)
    }

    /// Share of tiles on a rare biome (0.0 to 1.0)
    pub fn rare_biome_ratio(&self) -> f32 {
        if self.tiles == 0 {
            return 0.0;
        }
        let rare: usize = BiomeKind::RARE.iter().map(|b| self.biome_count(*b)).sum();
        rare as f32 / self.tiles as f32
    }

    /// Format as human-readable string
    pub fn summary(&self) -> String {
        format!(
            "Tiles: {} | Conquered: {} | Unlocked: {} | Visible: {} | Megagons: {} | Rare biomes: {:.1}%",
            self.tiles,
            self.conquered,
            self.unlocked,
            self.visible,
            self.megagon_centers,
            self.rare_biome_ratio() * 100.0
        )
    }

    /// Multi-line breakdown by biome, rarity and POI
    pub fn report(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.summary());
        out.push('\n');

        out.push_str("Biomes:\n");
        for biome in BiomeKind::all() {
            let count = self.biome_count(*biome);
            if count > 0 {
                out.push_str(&format!("  {:<16} {:>6}\n", biome.display_name(), count));
            }
        }

        out.push_str("Rarity:\n");
        for rarity in TileRarity::all() {
            out.push_str(&format!("  {:<16} {:>6}\n", rarity.to_string(), self.rarity_count(*rarity)));
        }

        if !self.pois.is_empty() {
            out.push_str("Points of interest:\n");
            let mut pois: Vec<_> = self.pois.iter().collect();
            pois.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.display_name().cmp(b.0.display_name())));
            for (poi, count) in pois {
                out.push_str(&format!("  {:<22} {:>6}\n", poi.display_name(), count));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;

    #[test]
    fn test_region_counts_every_tile() {
        let mut generator = HexMapGenerator::new(GenerationConfig::default(), 42);
        let stats = MapStatistics::from_region(&mut generator, AxialCoord::ORIGIN, 3);

        assert_eq!(stats.tiles, 37);
        assert_eq!(stats.biomes.values().sum::<usize>(), 37);
        assert_eq!(stats.rarities.values().sum::<usize>(), 37);
        assert_eq!(stats.conquered, 0);
        assert_eq!(generator.generated_tile_count(), 37);
    }

    #[test]
    fn test_from_generator_tracks_exploration() {
        let mut generator = HexMapGenerator::new(GenerationConfig::default(), 42);
        generator.initialize_map(42, AxialCoord::ORIGIN);

        let stats = MapStatistics::from_generator(&generator);
        assert_eq!(stats.tiles, 7);
        assert_eq!(stats.conquered, 1);
        assert_eq!(stats.unlocked, 7);
        assert!(stats.summary().contains("Conquered: 1"));
    }

    #[test]
    fn test_empty() {
        let stats = MapStatistics::default();
        assert_eq!(stats.rare_biome_ratio(), 0.0);
        assert!(stats.report().contains("Basic"));
    }
}

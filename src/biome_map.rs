//! Grid biome map
//!
//! Classifies every cell of a bounded grid from its continuous field values.
//! A threshold decision tree over altitude, temperature, moisture and
//! enchantment names a category; a weighted draw inside that category's table
//! then selects the final biome.

use std::collections::HashMap;

use crate::fields::{ContinuousFields, FieldSample, FieldSettings};
use crate::seeds::{FieldSeeds, SeededRandom};
use crate::tilemap::Tilemap;

/// Biome used when a category has no weight table
pub const DEFAULT_GRID_BIOME: GridBiome = GridBiome::Hill;

/// Biomes of the continuous grid map
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GridBiome {
    #[default]
    Hill,
    Forest,
    Mountain,
    Desert,
    Swamp,
    MysticForest,
    PoisonousSwamp,
    DragonBoneyard,
    Lavascape,
    IceSpike,
    GreatPeak,
    Water,
}

impl GridBiome {
    pub fn all() -> &'static [GridBiome] {
        &[
            GridBiome::Hill,
            GridBiome::Forest,
            GridBiome::Mountain,
            GridBiome::Desert,
            GridBiome::Swamp,
            GridBiome::MysticForest,
            GridBiome::PoisonousSwamp,
            GridBiome::DragonBoneyard,
            GridBiome::Lavascape,
            GridBiome::IceSpike,
            GridBiome::GreatPeak,
            GridBiome::Water,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GridBiome::Hill => "Hill",
            GridBiome::Forest => "Forest",
            GridBiome::Mountain => "Mountain",
            GridBiome::Desert => "Desert",
            GridBiome::Swamp => "Swamp",
            GridBiome::MysticForest => "Mystic Forest",
            GridBiome::PoisonousSwamp => "Poisonous Swamp",
            GridBiome::DragonBoneyard => "Dragon Boneyard",
            GridBiome::Lavascape => "Lavascape",
            GridBiome::IceSpike => "Ice Spike",
            GridBiome::GreatPeak => "Great Peak",
            GridBiome::Water => "Water",
        }
    }
}

/// Category chosen by the threshold classifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeCategory {
    Hills,
    Forest,
    Mountain,
    GreatPeak,
    Desert,
    Swamp,
    IceSpike,
    Water,
    MysticForest,
    PoisonousSwamp,
    DragonBoneyard,
    Lavascape,
}

impl BiomeCategory {
    pub fn name(&self) -> &'static str {
        match self {
            BiomeCategory::Hills => "hills",
            BiomeCategory::Forest => "forest",
            BiomeCategory::Mountain => "mountain",
            BiomeCategory::GreatPeak => "great_peak",
            BiomeCategory::Desert => "desert",
            BiomeCategory::Swamp => "swamp",
            BiomeCategory::IceSpike => "ice_spike",
            BiomeCategory::Water => "water",
            BiomeCategory::MysticForest => "mystic_forest",
            BiomeCategory::PoisonousSwamp => "poisonous_swamp",
            BiomeCategory::DragonBoneyard => "dragon_boneyard",
            BiomeCategory::Lavascape => "lavascape",
        }
    }
}

/// Weighted biome choices per category.
///
/// Entries keep their insertion order; the first entry is the fallback when
/// a draw never crosses the running total.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CategoryTable {
    entries: HashMap<BiomeCategory, Vec<(GridBiome, f32)>>,
}

impl CategoryTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Replace a category's weight list
    pub fn set(&mut self, category: BiomeCategory, weights: Vec<(GridBiome, f32)>) {
        self.entries.insert(category, weights);
    }

    pub fn remove(&mut self, category: BiomeCategory) {
        self.entries.remove(&category);
    }

    pub fn weights(&self, category: BiomeCategory) -> Option<&[(GridBiome, f32)]> {
        self.entries.get(&category).map(|w| w.as_slice())
    }

    /// Weighted draw within a category.
    ///
    /// Unconfigured or empty categories return `DEFAULT_GRID_BIOME` without
    /// consuming randomness.
    pub fn pick(&self, category: BiomeCategory, rng: &mut SeededRandom) -> GridBiome {
        let weights = match self.entries.get(&category) {
            Some(w) if !w.is_empty() => w,
            _ => return DEFAULT_GRID_BIOME,
        };

        let roll = rng.float01();
        let mut running_total = 0.0;
        for &(biome, weight) in weights {
            running_total += weight;
            if roll <= running_total {
                return biome;
            }
        }

        weights[0].0
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        use BiomeCategory as C;
        use GridBiome as B;

        let mut table = Self::empty();
        table.set(C::Hills, vec![(B::Hill, 1.0)]);
        table.set(C::Forest, vec![(B::Forest, 0.9), (B::Hill, 0.1)]);
        table.set(C::Mountain, vec![(B::Mountain, 0.95), (B::Hill, 0.05)]);
        table.set(C::GreatPeak, vec![(B::GreatPeak, 0.9), (B::Mountain, 0.1)]);
        table.set(C::Desert, vec![(B::Desert, 1.0)]);
        table.set(C::Swamp, vec![(B::Swamp, 1.0)]);
        table.set(C::IceSpike, vec![(B::IceSpike, 0.9), (B::Mountain, 0.1)]);
        table.set(C::Water, vec![(B::Water, 1.0)]);
        table.set(C::MysticForest, vec![(B::MysticForest, 0.95), (B::Forest, 0.05)]);
        table.set(C::PoisonousSwamp, vec![(B::PoisonousSwamp, 0.95), (B::Swamp, 0.05)]);
        table.set(C::DragonBoneyard, vec![(B::DragonBoneyard, 1.0)]);
        table.set(C::Lavascape, vec![(B::Lavascape, 1.0)]);
        table
    }
}

/// Half-open range test `[lo, hi)`
pub fn is_between(value: f32, lo: f32, hi: f32) -> bool {
    value >= lo && value < hi
}

/// Threshold decision tree. First matching rule wins.
///
/// Randomness is consumed only for the enchanted great-peak roll in the
/// `[0.9, 1.2)` altitude band, and only when enchantment exceeds 1.5.
pub fn classify_category(sample: &FieldSample, rng: &mut SeededRandom) -> BiomeCategory {
    let FieldSample {
        temperature,
        moisture,
        altitude,
        enchantment,
        ..
    } = *sample;

    // Oceans and large lakes
    if moisture > 1.3 {
        return BiomeCategory::Water;
    }
    // Coastal seas
    if altitude < 0.2 && moisture > 1.0 {
        return BiomeCategory::Water;
    }

    if altitude > 1.2 {
        if altitude > 1.5 && enchantment > 1.3 {
            BiomeCategory::GreatPeak
        } else if temperature < 0.4 {
            BiomeCategory::IceSpike
        } else {
            BiomeCategory::Mountain
        }
    } else if is_between(altitude, 0.9, 1.2) {
        if enchantment > 1.5 && rng.float01() < 0.3 {
            BiomeCategory::GreatPeak
        } else {
            BiomeCategory::Mountain
        }
    } else if is_between(altitude, 0.3, 0.9) {
        if moisture > 1.1 {
            return BiomeCategory::Water;
        }

        if temperature < 0.5 {
            if moisture > 0.7 {
                BiomeCategory::Forest
            } else {
                BiomeCategory::Hills
            }
        } else if is_between(temperature, 0.5, 1.0) {
            if moisture > 0.8 {
                BiomeCategory::Forest
            } else if is_between(moisture, 0.4, 0.8) {
                BiomeCategory::Hills
            } else {
                BiomeCategory::Desert
            }
        } else if moisture > 0.7 {
            BiomeCategory::Forest
        } else {
            BiomeCategory::Desert
        }
    } else if moisture > 0.9 {
        BiomeCategory::Water
    } else if moisture > 0.7 {
        BiomeCategory::Swamp
    } else if temperature > 1.0 && moisture < 0.4 {
        BiomeCategory::Desert
    } else {
        BiomeCategory::Hills
    }
}

/// Grid size and field shapes
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BiomeMapConfig {
    pub width: usize,
    pub height: usize,
    pub fields: FieldSettings,
}

impl Default for BiomeMapConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            fields: FieldSettings::default(),
        }
    }
}

impl BiomeMapConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self, crate::config::ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: BiomeMapConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

/// Field values and classified biome at one cell
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BiomeCell {
    pub fields: FieldSample,
    pub category: BiomeCategory,
    pub biome: GridBiome,
}

/// Continuous-field biome map over a bounded grid
pub struct BiomeMap {
    seed: i32,
    config: BiomeMapConfig,
    table: CategoryTable,
    fields: ContinuousFields,
    cells: Tilemap<Option<BiomeCell>>,
}

impl BiomeMap {
    /// Generate a map. A seed of 0 picks a random non-zero seed.
    pub fn generate(config: BiomeMapConfig, seed: i32) -> Self {
        Self::generate_with_table(config, CategoryTable::default(), seed)
    }

    pub fn generate_with_table(config: BiomeMapConfig, table: CategoryTable, seed: i32) -> Self {
        let mut map = Self {
            seed: 0,
            config,
            table,
            fields: ContinuousFields::generate(0, 0, &config.fields, &FieldSeeds::from_master(0)),
            cells: Tilemap::new(0, 0),
        };
        map.regenerate(seed);
        map
    }

    /// Discard every field and biome and rebuild from a new seed.
    pub fn regenerate(&mut self, seed: i32) {
        let seed = if seed == 0 { random_nonzero_seed() } else { seed };
        self.seed = seed;

        let BiomeMapConfig { width, height, fields } = self.config;
        self.fields = ContinuousFields::generate(width, height, &fields, &FieldSeeds::from_master(seed));

        let mut rng = SeededRandom::new(seed);
        let field_data = &self.fields;
        let table = &self.table;
        self.cells = Tilemap::from_fn(width, height, |x, y| {
            let sample = field_data.sample(x as i32, y as i32)?;
            let category = classify_category(&sample, &mut rng);
            let biome = table.pick(category, &mut rng);
            Some(BiomeCell {
                fields: sample,
                category,
                biome,
            })
        });

        tracing::info!(seed, width, height, "biome map generated");
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn width(&self) -> usize {
        self.config.width
    }

    pub fn height(&self) -> usize {
        self.config.height
    }

    pub fn config(&self) -> &BiomeMapConfig {
        &self.config
    }

    pub fn fields(&self) -> &ContinuousFields {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Field values and biome at a cell, `None` outside the grid
    pub fn biome_data_at(&self, x: i32, y: i32) -> Option<BiomeCell> {
        self.cells.get_signed(x, y).copied().flatten()
    }

    pub fn biome_at(&self, x: i32, y: i32) -> Option<GridBiome> {
        self.biome_data_at(x, y).map(|cell| cell.biome)
    }

    /// Number of cells per biome
    pub fn biome_counts(&self) -> HashMap<GridBiome, usize> {
        let mut counts = HashMap::new();
        for (_, _, cell) in self.cells.iter() {
            if let Some(cell) = cell {
                *counts.entry(cell.biome).or_insert(0) += 1;
            }
        }
        counts
    }
}

fn random_nonzero_seed() -> i32 {
    loop {
        let seed: i32 = rand::random();
        if seed != 0 {
            return seed;
        }
    }
}

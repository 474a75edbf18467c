//! Lazy hex map generator and exploration state
//!
//! Tiles are generated the first time any coordinate is asked for and cached
//! forever after. Every random draw for a tile comes from a generator derived
//! from `(world seed, q, r)`, so the dice a coordinate sees never depend on
//! which tiles were generated before it. What does depend on generation order
//! is the neighborhood feedback: biome clustering, nearby POI counts and the
//! megagon exclusion zone only see tiles that already exist.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, error, info, trace, warn};

use crate::config::GenerationConfig;
use crate::hex::AxialCoord;
use crate::save::{SaveSnapshot, SaveStore, TileSaveData};
use crate::seeds::SeededRandom;
use crate::tiles::{
    determine_rarity, megagon_candidates, valid_pois, BiomeKind, PoiKind, TileRarity, TileRecord, MEGAGON_BONUSES,
};

/// View range used until a conquest or load says otherwise
pub const DEFAULT_VIEW_RANGE: i32 = 1;

/// Save directory used unless another store is set
pub const DEFAULT_SAVE_DIR: &str = "saves";

/// Exploration map: tile store, megagon registry and conquest state
pub struct HexMapGenerator {
    config: GenerationConfig,
    rng: SeededRandom,
    tiles: HashMap<AxialCoord, TileRecord>,
    /// Append-only, in registration order
    megagon_centers: Vec<AxialCoord>,
    view_range: i32,
    save_store: SaveStore,
}

impl HexMapGenerator {
    pub fn new(config: GenerationConfig, seed: i32) -> Self {
        Self {
            config,
            rng: SeededRandom::new(seed),
            tiles: HashMap::new(),
            megagon_centers: Vec::new(),
            view_range: DEFAULT_VIEW_RANGE,
            save_store: SaveStore::new(DEFAULT_SAVE_DIR),
        }
    }

    /// Use a different directory for save slots
    pub fn with_save_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.save_store = SaveStore::new(dir);
        self
    }

    pub fn save_store(&self) -> &SaveStore {
        &self.save_store
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn seed(&self) -> i32 {
        self.rng.seed()
    }

    pub fn view_range(&self) -> i32 {
        self.view_range
    }

    /// Drop all tiles and megagons and reseed.
    fn reset(&mut self, seed: i32) {
        self.rng.set_seed(seed);
        self.tiles.clear();
        self.megagon_centers.clear();
    }

    /// Start a new map: the start tile and its 6 neighbors are generated,
    /// unlocked and visible, and the start tile is conquered.
    pub fn initialize_map(&mut self, seed: i32, start: AxialCoord) {
        self.reset(seed);

        for coord in start.megagon_cluster() {
            let tile = self.tile_entry(coord);
            tile.unlocked = true;
            tile.visible = true;
        }

        if let Some(tile) = self.tiles.get_mut(&start) {
            tile.conquered = true;
        }

        info!(seed, start = %start, "hex map initialized");
    }

    // ===== Tile access =====

    /// Stored tile, generating it first if the coordinate is new.
    ///
    /// A stored tile is never regenerated.
    pub fn tile_data(&mut self, coord: AxialCoord) -> &TileRecord {
        self.tile_entry(coord)
    }

    /// Owned copy of `tile_data`
    pub fn get_tile_data(&mut self, coord: AxialCoord) -> TileRecord {
        self.tile_entry(coord).clone()
    }

    /// Stored tile for `coord`, generated and inserted only if absent.
    fn tile_entry(&mut self, coord: AxialCoord) -> &mut TileRecord {
        let tile = match self.tiles.remove(&coord) {
            Some(stored) => stored,
            None => self.generate_tile(coord),
        };
        self.tiles.entry(coord).or_insert(tile)
    }

    /// Stored tile without generating
    pub fn tile(&self, coord: AxialCoord) -> Option<&TileRecord> {
        self.tiles.get(&coord)
    }

    pub fn does_tile_exist(&self, coord: AxialCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    pub fn generated_tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &TileRecord> {
        self.tiles.values()
    }

    pub fn megagon_centers(&self) -> &[AxialCoord] {
        &self.megagon_centers
    }

    // ===== Generation =====

    fn generate_tile(&mut self, coord: AxialCoord) -> TileRecord {
        let mut tile = TileRecord::new(coord);

        // Megagon members take no rolls at all
        if let Some(center) = self.megagon_containing(coord) {
            trace!(coord = %coord, center = %center, "tile is part of megagon");
            tile.is_part_of_megagon = true;
            tile.megagon_center = Some(center);
            tile.is_megagon_center = coord == center;
            tile.biome = BiomeKind::None;
            tile.rarity = TileRarity::Megagon;
            return tile;
        }

        let mut rng = self.rng.from_coordinate(coord.q, coord.r);

        let base = self.roll_base_biome(coord, &mut rng);
        tile.biome = self.try_upgrade_biome(base, &mut rng);

        let megagon = self.try_spawn_megagon(coord, tile.biome, &mut rng);
        if megagon != PoiKind::None {
            tile.poi = megagon;
            tile.rarity = TileRarity::Megagon;
            tile.is_megagon_center = true;
            self.megagon_centers.push(coord);
            debug!(coord = %coord, megagon = %megagon, "megagon spawned");
        } else {
            tile.poi = self.roll_poi(tile.biome, &mut rng);
            tile.rarity = determine_rarity(tile.biome, tile.poi);
        }

        tile.visual_variant = rng.int_range(0, 3);
        tile.difficulty_level = (coord.distance_from_origin() / 3).max(1);

        debug!(
            coord = %coord,
            biome = %tile.biome,
            poi = %tile.poi,
            rarity = %tile.rarity,
            "tile generated"
        );

        tile
    }

    fn megagon_containing(&self, coord: AxialCoord) -> Option<AxialCoord> {
        self.megagon_centers.iter().copied().find(|center| center.distance(&coord) <= 1)
    }

    /// Weighted pick among the base biomes, each weight scaled by
    /// `1 + cluster_weight * clustering_strength`.
    fn roll_base_biome(&self, coord: AxialCoord, rng: &mut SeededRandom) -> BiomeKind {
        let weights = self.config.base_weights().map(|(biome, weight)| {
            let cluster = self.clustering_weight(coord, biome);
            (biome, weight * (1.0 + cluster * self.config.biome_clustering_strength))
        });

        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        let roll = rng.float_range(0.0, total);
        trace!(coord = %coord, total, roll, "base biome roll");

        let mut running_total = 0.0;
        for (biome, weight) in weights {
            running_total += weight;
            if roll <= running_total {
                return biome;
            }
        }

        warn!(coord = %coord, "biome roll fell through, using hills");
        BiomeKind::Hills
    }

    /// Fraction of generated tiles within the cluster radius whose base
    /// biome matches. Missing tiles and megagon members are not counted.
    pub fn clustering_weight(&self, coord: AxialCoord, biome: BiomeKind) -> f32 {
        let mut matching = 0;
        let mut total = 0;

        for nearby in coord.hexes_in_range(self.config.biome_cluster_radius) {
            if nearby == coord {
                continue;
            }
            let Some(tile) = self.tiles.get(&nearby) else {
                continue;
            };
            if tile.biome == BiomeKind::None {
                continue;
            }

            total += 1;
            if tile.biome.base() == biome {
                matching += 1;
            }
        }

        if total == 0 {
            0.0
        } else {
            matching as f32 / total as f32
        }
    }

    fn try_upgrade_biome(&self, biome: BiomeKind, rng: &mut SeededRandom) -> BiomeKind {
        let config = &self.config;
        match biome {
            BiomeKind::Forest if rng.chance(config.mystic_forest_chance) => BiomeKind::MysticForest,
            BiomeKind::Swamp if rng.chance(config.poison_swamp_chance) => BiomeKind::PoisonSwamp,
            BiomeKind::Desert if rng.chance(config.dragon_bones_chance) => BiomeKind::DragonBones,
            BiomeKind::Mountains => {
                let roll = rng.float01();
                if roll < config.lavascape_chance {
                    BiomeKind::Lavascape
                } else if roll < config.lavascape_chance + config.ice_spikes_chance {
                    BiomeKind::IceSpikes
                } else {
                    biome
                }
            }
            _ => biome,
        }
    }

    /// Roll for a megagon centered here. Returns `PoiKind::None` when the
    /// roll fails, another center is too close, or the biome hosts none.
    fn try_spawn_megagon(&self, coord: AxialCoord, biome: BiomeKind, rng: &mut SeededRandom) -> PoiKind {
        if !rng.chance(self.config.megagon_chance) {
            return PoiKind::None;
        }
        if !self.can_spawn_megagon(coord) {
            trace!(coord = %coord, "megagon blocked by nearby center");
            return PoiKind::None;
        }

        let candidates = self.megagon_candidates_at(coord, biome);
        match rng.index(candidates.len()) {
            Some(i) => candidates[i],
            None => PoiKind::None,
        }
    }

    /// Megagons the biome hosts at `coord`, plus any bonus megagon whose
    /// nearby POI requirement is met by already generated tiles.
    pub fn megagon_candidates_at(&self, coord: AxialCoord, biome: BiomeKind) -> Vec<PoiKind> {
        let mut candidates = megagon_candidates(biome).to_vec();
        for bonus in MEGAGON_BONUSES.iter().filter(|b| b.biome == biome) {
            let count = self.count_nearby_pois(coord, bonus.required_poi, self.config.megagon_poi_scan_radius);
            if count >= bonus.required_count {
                candidates.push(bonus.megagon);
            }
        }
        candidates
    }

    /// No registered center closer than the minimum separation
    pub fn can_spawn_megagon(&self, coord: AxialCoord) -> bool {
        self.megagon_centers
            .iter()
            .all(|center| center.distance(&coord) >= self.config.megagon_min_separation)
    }

    /// Generated tiles within `range` carrying `poi`
    pub fn count_nearby_pois(&self, coord: AxialCoord, poi: PoiKind, range: i32) -> usize {
        coord
            .hexes_in_range(range)
            .iter()
            .filter_map(|c| self.tiles.get(c))
            .filter(|tile| tile.poi == poi)
            .count()
    }

    /// Rare roll, then an epic roll that upgrades the rare pick when the biome
    /// has epic POIs. Biomes without rare POIs get none at all.
    fn roll_poi(&self, biome: BiomeKind, rng: &mut SeededRandom) -> PoiKind {
        if !rng.chance(self.config.rare_poi_chance) {
            return PoiKind::None;
        }

        let rare = valid_pois(biome, TileRarity::Rare);
        let Some(i) = rng.index(rare.len()) else {
            return PoiKind::None;
        };
        let mut poi = rare[i];

        if rng.chance(self.config.epic_poi_chance) {
            let epic = valid_pois(biome, TileRarity::Epic);
            if let Some(i) = rng.index(epic.len()) {
                poi = epic[i];
            }
        }

        poi
    }

    // ===== Exploration =====

    /// Conquer an unlocked tile: unlock its 6 neighbors and recompute
    /// visibility with `view_range`. Unknown or locked tiles are left alone.
    pub fn conquer_tile(&mut self, coord: AxialCoord, view_range: i32) -> bool {
        let Some(tile) = self.tiles.get_mut(&coord) else {
            warn!(coord = %coord, "attempting to conquer unknown tile");
            return false;
        };
        if !tile.unlocked {
            warn!(coord = %coord, "attempting to conquer locked tile");
            return false;
        }

        tile.conquered = true;
        let name = tile.display_name();

        self.unlock_adjacent_tiles(coord);
        self.update_visibility(view_range);

        info!(coord = %coord, tile = name, "tile conquered");
        true
    }

    /// Generate and unlock the 6 neighbors
    pub fn unlock_adjacent_tiles(&mut self, coord: AxialCoord) {
        for neighbor in coord.neighbors() {
            self.tile_entry(neighbor).unlocked = true;
        }
    }

    /// Recompute visibility from scratch: every tile within `view_range` of
    /// a conquered tile is visible, everything else is not.
    pub fn update_visibility(&mut self, view_range: i32) {
        self.view_range = view_range;

        for tile in self.tiles.values_mut() {
            tile.visible = false;
        }

        for conquered in self.conquered_tiles() {
            for coord in conquered.hexes_in_range(view_range) {
                self.tile_entry(coord).visible = true;
            }
        }
    }

    /// Unlock and reveal a tile without conquering anything
    pub fn force_unlock_tile(&mut self, coord: AxialCoord) {
        let tile = self.tile_entry(coord);
        tile.unlocked = true;
        tile.visible = true;
    }

    pub fn force_unlock_area(&mut self, center: AxialCoord, radius: i32) {
        let coords = center.hexes_in_range(radius);
        for &coord in &coords {
            self.force_unlock_tile(coord);
        }
        info!(count = coords.len(), radius, center = %center, "force unlocked area");
    }

    fn coords_where(&self, predicate: impl Fn(&TileRecord) -> bool) -> Vec<AxialCoord> {
        let mut coords: Vec<AxialCoord> = self
            .tiles
            .values()
            .filter(|tile| predicate(tile))
            .map(|tile| tile.coordinate)
            .collect();
        coords.sort();
        coords
    }

    /// Sorted conquered coordinates
    pub fn conquered_tiles(&self) -> Vec<AxialCoord> {
        self.coords_where(|t| t.conquered)
    }

    pub fn unlocked_tiles(&self) -> Vec<AxialCoord> {
        self.coords_where(|t| t.unlocked)
    }

    pub fn visible_tiles(&self) -> Vec<AxialCoord> {
        self.coords_where(|t| t.visible)
    }

    pub fn conquered_tile_count(&self) -> usize {
        self.tiles.values().filter(|t| t.conquered).count()
    }

    // ===== Search =====

    /// Generate every tile within `radius` of `center` and return the ones
    /// on rare biomes.
    pub fn find_rare_biomes(&mut self, center: AxialCoord, radius: i32) -> Vec<AxialCoord> {
        let mut found = Vec::new();
        for coord in center.hexes_in_range(radius) {
            let tile = self.tile_entry(coord);
            if tile.biome.is_rare() {
                debug!(coord = %coord, biome = %tile.biome, "found rare biome");
                found.push(coord);
            }
        }
        found
    }

    /// Generate every tile within `radius` of `center` and return the
    /// megagon centers among them.
    pub fn find_megagons(&mut self, center: AxialCoord, radius: i32) -> Vec<AxialCoord> {
        let mut found = Vec::new();
        for coord in center.hexes_in_range(radius) {
            let tile = self.tile_entry(coord);
            if tile.is_megagon_center {
                debug!(coord = %coord, megagon = %tile.poi, "found megagon");
                found.push(coord);
            }
        }
        found
    }

    // ===== Persistence =====

    /// Snapshot of the current progress under a slot name
    pub fn snapshot(&self, slot: &str) -> SaveSnapshot {
        let mut snapshot = SaveSnapshot::new(slot, self.seed(), self.view_range);
        snapshot.conquered_tiles = self
            .conquered_tiles()
            .into_iter()
            .map(|coordinate| TileSaveData {
                coordinate,
                conquered: true,
            })
            .collect();
        snapshot.total_tiles_explored = self.conquered_tile_count();
        snapshot.total_megagons_defeated = self
            .tiles
            .values()
            .filter(|t| t.conquered && t.rarity == TileRarity::Megagon)
            .count();
        snapshot
    }

    /// Rebuild state from a snapshot: reseed, regenerate each conquered tile,
    /// conquer it and unlock its neighbors, then recompute visibility once.
    pub fn restore(&mut self, snapshot: &SaveSnapshot) {
        self.reset(snapshot.seed);
        self.view_range = snapshot.view_range;

        for coord in snapshot.conquered_coordinates() {
            let tile = self.tile_entry(coord);
            tile.conquered = true;
            tile.unlocked = true;
            self.unlock_adjacent_tiles(coord);
        }

        self.update_visibility(snapshot.view_range);
    }

    pub fn save_map_state(&self, slot: &str) -> bool {
        let snapshot = self.snapshot(slot);
        match self.save_store.save(&snapshot) {
            Ok(()) => {
                info!(slot, conquered = snapshot.total_tiles_explored, "map saved");
                true
            }
            Err(e) => {
                error!(slot, error = %e, "failed to save map");
                false
            }
        }
    }

    pub fn load_map_state(&mut self, slot: &str) -> bool {
        match self.save_store.load(slot) {
            Ok(Some(snapshot)) => {
                self.restore(&snapshot);
                info!(
                    slot,
                    seed = snapshot.seed,
                    conquered = snapshot.conquered_tiles.len(),
                    "map loaded"
                );
                true
            }
            Ok(None) => {
                warn!(slot, "save does not exist");
                false
            }
            Err(e) => {
                error!(slot, error = %e, "failed to load save");
                false
            }
        }
    }

    pub fn does_save_exist(&self, slot: &str) -> bool {
        self.save_store.exists(slot)
    }

    pub fn delete_save(&self, slot: &str) -> bool {
        match self.save_store.delete(slot) {
            Ok(deleted) => deleted,
            Err(e) => {
                error!(slot, error = %e, "failed to delete save");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn generator(seed: i32) -> HexMapGenerator {
        HexMapGenerator::new(GenerationConfig::default(), seed)
    }

    #[test]
    fn test_initialize_map() {
        let mut map = generator(0);
        map.initialize_map(12345, AxialCoord::ORIGIN);

        assert_eq!(map.generated_tile_count(), 7);
        assert_eq!(map.conquered_tiles(), vec![AxialCoord::ORIGIN]);
        assert_eq!(map.unlocked_tiles().len(), 7);
        assert_eq!(map.visible_tiles().len(), 7);
        assert_eq!(map.seed(), 12345);
    }

    #[test]
    fn test_tile_generated_once() {
        let mut map = generator(777);
        let first = map.get_tile_data(AxialCoord::new(4, -2));
        let second = map.get_tile_data(AxialCoord::new(4, -2));
        assert_eq!(first, second);
        assert_eq!(map.generated_tile_count(), 1);
    }

    #[test]
    fn test_difficulty_from_distance() {
        let mut map = generator(1);
        assert_eq!(map.tile_data(AxialCoord::ORIGIN).difficulty_level, 1);
        assert_eq!(map.tile_data(AxialCoord::new(2, 0)).difficulty_level, 1);
        let far = map.tile_data(AxialCoord::new(9, -3)).clone();
        if !far.is_part_of_megagon || far.is_megagon_center {
            assert_eq!(far.difficulty_level, 3);
        }
    }

    #[test]
    fn test_variant_in_range() {
        let mut map = generator(2);
        map.force_unlock_area(AxialCoord::ORIGIN, 4);
        assert!(map.tiles().all(|t| (0..=3).contains(&t.visual_variant)));
    }

    #[test]
    fn test_conquer_locked_tile_is_noop() {
        let mut map = generator(3);
        map.get_tile_data(AxialCoord::new(1, 0));

        assert!(!map.conquer_tile(AxialCoord::new(1, 0), 1));
        assert!(!map.conquer_tile(AxialCoord::new(50, 50), 1));
        assert_eq!(map.conquered_tile_count(), 0);
        assert_eq!(map.generated_tile_count(), 1);
    }

    #[test]
    fn test_conquer_unlocks_neighbors() {
        let mut map = generator(4);
        map.force_unlock_tile(AxialCoord::ORIGIN);
        assert!(map.conquer_tile(AxialCoord::ORIGIN, 1));

        let unlocked: HashSet<_> = map.unlocked_tiles().into_iter().collect();
        let mut expected: HashSet<_> = AxialCoord::ORIGIN.neighbors().into_iter().collect();
        expected.insert(AxialCoord::ORIGIN);
        assert_eq!(unlocked, expected);
        assert_eq!(map.conquered_tiles(), vec![AxialCoord::ORIGIN]);
    }

    #[test]
    fn test_visibility_follows_view_range() {
        let mut map = generator(5);
        map.force_unlock_tile(AxialCoord::ORIGIN);
        map.conquer_tile(AxialCoord::ORIGIN, 2);

        assert_eq!(map.visible_tiles().len(), 19);
        assert_eq!(map.view_range(), 2);

        map.update_visibility(0);
        assert_eq!(map.visible_tiles(), vec![AxialCoord::ORIGIN]);
    }

    #[test]
    fn test_rarity_consistent_with_biome_and_poi() {
        let mut map = generator(6);
        map.force_unlock_area(AxialCoord::ORIGIN, 6);
        for tile in map.tiles() {
            if tile.rarity == TileRarity::Megagon {
                assert!(tile.is_part_of_megagon || tile.is_megagon_center);
                assert_eq!(tile.is_megagon_center, tile.poi.is_megagon());
                continue;
            }
            assert_eq!(tile.rarity, determine_rarity(tile.biome, tile.poi));
            assert_ne!(tile.biome, BiomeKind::None);
        }
    }

    #[test]
    fn test_always_megagon_respects_separation() {
        let config = GenerationConfig {
            megagon_chance: 1.0,
            ..Default::default()
        };
        let mut map = HexMapGenerator::new(config, 99);
        map.force_unlock_area(AxialCoord::ORIGIN, 10);

        let centers = map.megagon_centers().to_vec();
        assert!(!centers.is_empty());
        for (i, a) in centers.iter().enumerate() {
            for b in &centers[i + 1..] {
                assert!(a.distance(b) >= 5, "{} and {} too close", a, b);
            }
        }

        // Tiles generated after a center next to it are members
        for center in &centers {
            for neighbor in center.neighbors() {
                let Some(tile) = map.tile(neighbor) else {
                    continue;
                };
                if tile.is_part_of_megagon {
                    assert_eq!(tile.biome, BiomeKind::None);
                    assert_eq!(tile.megagon_center, Some(*center));
                }
            }
        }
    }

    #[test]
    fn test_no_megagons_when_chance_zero() {
        let config = GenerationConfig {
            megagon_chance: 0.0,
            ..Default::default()
        };
        let mut map = HexMapGenerator::new(config, 99);
        assert!(map.find_megagons(AxialCoord::ORIGIN, 8).is_empty());
    }

    #[test]
    fn test_clustering_weight_skips_missing_and_none() {
        let mut map = generator(8);
        assert_eq!(map.clustering_weight(AxialCoord::ORIGIN, BiomeKind::Hills), 0.0);

        let neighbor = AxialCoord::new(1, 0);
        let biome = map.tile_data(neighbor).biome;
        if biome != BiomeKind::None {
            assert_eq!(map.clustering_weight(AxialCoord::ORIGIN, biome.base()), 1.0);
        }
    }

    #[test]
    fn test_find_rare_biomes() {
        let config = GenerationConfig {
            mystic_forest_chance: 1.0,
            poison_swamp_chance: 1.0,
            dragon_bones_chance: 1.0,
            lavascape_chance: 1.0,
            ice_spikes_chance: 0.0,
            megagon_chance: 0.0,
            ..Default::default()
        };
        let mut map = HexMapGenerator::new(config, 10);
        let found = map.find_rare_biomes(AxialCoord::ORIGIN, 2);
        // Hills never upgrade; everything else always does
        let hills = map.tiles().filter(|t| t.biome == BiomeKind::Hills).count();
        assert_eq!(found.len() + hills, 19);
    }

    #[test]
    fn test_snapshot_counts() {
        let mut map = generator(11);
        map.initialize_map(11, AxialCoord::ORIGIN);
        map.conquer_tile(AxialCoord::new(1, 0), 1);

        let snapshot = map.snapshot("slot");
        assert_eq!(snapshot.total_tiles_explored, 2);
        assert_eq!(snapshot.conquered_tiles.len(), 2);
        assert_eq!(snapshot.seed, 11);
        assert_eq!(snapshot.view_range, 1);
    }

    #[test]
    fn test_restore_replays_conquests() {
        let mut map = generator(12);
        map.initialize_map(12, AxialCoord::ORIGIN);
        map.conquer_tile(AxialCoord::new(0, 1), 2);
        let snapshot = map.snapshot("slot");
        let conquered = map.conquered_tiles();

        let mut restored = generator(0);
        restored.restore(&snapshot);
        assert_eq!(restored.conquered_tiles(), conquered);
        assert_eq!(restored.view_range(), 2);
        assert_eq!(restored.seed(), 12);
        assert_eq!(restored.tile(AxialCoord::ORIGIN), map.tile(AxialCoord::ORIGIN));
    }

    #[test]
    fn test_lookup_keeps_stored_tile_state() {
        let mut map = generator(13);
        let coord = AxialCoord::new(3, -1);
        map.force_unlock_tile(coord);
        let stored = map.get_tile_data(coord);

        assert!(map.tile_data(coord).unlocked);
        assert_eq!(map.get_tile_data(coord), stored);
        assert_eq!(map.generated_tile_count(), 1);
    }

    fn single_biome_config(biome: BiomeKind) -> GenerationConfig {
        let weight = |b: BiomeKind| if b == biome { 1.0 } else { 0.0 };
        GenerationConfig {
            hills_weight: weight(BiomeKind::Hills),
            forest_weight: weight(BiomeKind::Forest),
            mountains_weight: weight(BiomeKind::Mountains),
            desert_weight: weight(BiomeKind::Desert),
            swamp_weight: weight(BiomeKind::Swamp),
            mystic_forest_chance: 0.0,
            poison_swamp_chance: 0.0,
            dragon_bones_chance: 0.0,
            lavascape_chance: 0.0,
            ice_spikes_chance: 0.0,
            rare_poi_chance: 1.0,
            epic_poi_chance: 1.0,
            megagon_chance: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_poi_without_rare_table() {
        let mut map = HexMapGenerator::new(single_biome_config(BiomeKind::Mountains), 21);
        map.force_unlock_area(AxialCoord::new(50, 50), 3);

        let mountains: Vec<_> = map.tiles().filter(|t| t.biome == BiomeKind::Mountains).collect();
        assert!(!mountains.is_empty());
        for tile in mountains {
            assert_eq!(tile.poi, PoiKind::None, "{} has {}", tile.coordinate, tile.poi);
            assert_eq!(tile.rarity, TileRarity::Basic);
        }
    }

    #[test]
    fn test_rare_poi_stands_without_epic_table() {
        let mut map = HexMapGenerator::new(single_biome_config(BiomeKind::Forest), 22);
        map.force_unlock_area(AxialCoord::ORIGIN, 3);

        let rare = valid_pois(BiomeKind::Forest, TileRarity::Rare);
        let forests: Vec<_> = map.tiles().filter(|t| t.biome == BiomeKind::Forest).collect();
        assert!(!forests.is_empty());
        for tile in forests {
            assert!(rare.contains(&tile.poi), "{} has {}", tile.coordinate, tile.poi);
            assert_eq!(tile.rarity, TileRarity::Rare);
        }
    }

    #[test]
    fn test_epic_roll_upgrades_rare_pick() {
        let mut map = HexMapGenerator::new(single_biome_config(BiomeKind::Hills), 23);
        map.force_unlock_area(AxialCoord::ORIGIN, 2);

        for tile in map.tiles().filter(|t| t.biome == BiomeKind::Hills) {
            assert_eq!(tile.poi, PoiKind::Crypt);
            assert_eq!(tile.rarity, TileRarity::Epic);
        }
    }

    #[test]
    fn test_megagon_center_is_not_a_member() {
        let config = GenerationConfig {
            megagon_chance: 1.0,
            ..Default::default()
        };
        let mut map = HexMapGenerator::new(config, 99);
        map.force_unlock_area(AxialCoord::ORIGIN, 10);
        assert!(!map.megagon_centers().is_empty());

        for center in map.megagon_centers() {
            let tile = map.tile(*center).unwrap();
            assert!(tile.is_megagon_center);
            assert!(!tile.is_part_of_megagon);
            assert_eq!(tile.megagon_center, None);
            assert_ne!(tile.biome, BiomeKind::None);
            assert_eq!(tile.rarity, TileRarity::Megagon);
        }
        for tile in map.tiles().filter(|t| t.is_part_of_megagon) {
            assert!(!tile.is_megagon_center);
            assert_eq!(tile.biome, BiomeKind::None);
        }
    }

    fn place_poi(map: &mut HexMapGenerator, coord: AxialCoord, biome: BiomeKind, poi: PoiKind) {
        let mut tile = TileRecord::new(coord);
        tile.biome = biome;
        tile.poi = poi;
        tile.rarity = determine_rarity(biome, poi);
        map.tiles.insert(coord, tile);
    }

    #[test]
    fn test_rift_bonus_needs_three_nearby_rifts() {
        let mut map = generator(30);
        let center = AxialCoord::new(20, 20);
        let base = megagon_candidates(BiomeKind::MysticForest).to_vec();

        place_poi(&mut map, AxialCoord::new(21, 20), BiomeKind::MysticForest, PoiKind::Rift);
        place_poi(&mut map, AxialCoord::new(20, 18), BiomeKind::MysticForest, PoiKind::Rift);
        // Outside the scan radius
        place_poi(&mut map, AxialCoord::new(26, 20), BiomeKind::MysticForest, PoiKind::Rift);
        assert_eq!(map.megagon_candidates_at(center, BiomeKind::MysticForest), base);

        place_poi(&mut map, AxialCoord::new(25, 20), BiomeKind::MysticForest, PoiKind::Rift);
        let mut expected = base.clone();
        expected.push(PoiKind::DimensionalStronghold);
        assert_eq!(map.megagon_candidates_at(center, BiomeKind::MysticForest), expected);

        // The bonus belongs to mystic forest only
        assert_eq!(
            map.megagon_candidates_at(center, BiomeKind::Forest),
            megagon_candidates(BiomeKind::Forest).to_vec()
        );
    }

    #[test]
    fn test_forge_bonus_needs_two_nearby_forges() {
        let mut map = generator(31);
        let center = AxialCoord::new(-20, 5);
        let base = megagon_candidates(BiomeKind::Lavascape).to_vec();

        place_poi(&mut map, AxialCoord::new(-19, 5), BiomeKind::Lavascape, PoiKind::Forge);
        assert_eq!(map.megagon_candidates_at(center, BiomeKind::Lavascape), base);

        place_poi(&mut map, AxialCoord::new(-20, 3), BiomeKind::Lavascape, PoiKind::Forge);
        let mut expected = base.clone();
        expected.push(PoiKind::TheGreatForge);
        assert_eq!(map.megagon_candidates_at(center, BiomeKind::Lavascape), expected);
    }
}

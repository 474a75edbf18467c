//! Tile records of the exploration map and their static lookup tables
//!
//! Biomes, points of interest and rarity tiers, together with the fixed tables
//! that say which POIs can appear on which biome and which megagons a biome
//! can host.

use crate::hex::AxialCoord;

/// Biome of an exploration tile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BiomeKind {
    /// Only used by megagon member tiles
    #[default]
    None,
    Hills,
    Forest,
    Mountains,
    Desert,
    Swamp,
    MysticForest,
    PoisonSwamp,
    DragonBones,
    Lavascape,
    IceSpikes,
}

impl BiomeKind {
    /// The five biomes rolled directly from the base weights
    pub const BASE: [BiomeKind; 5] = [
        BiomeKind::Hills,
        BiomeKind::Forest,
        BiomeKind::Mountains,
        BiomeKind::Desert,
        BiomeKind::Swamp,
    ];

    /// Upgraded variants of the base biomes
    pub const RARE: [BiomeKind; 5] = [
        BiomeKind::MysticForest,
        BiomeKind::PoisonSwamp,
        BiomeKind::DragonBones,
        BiomeKind::Lavascape,
        BiomeKind::IceSpikes,
    ];

    pub fn all() -> &'static [BiomeKind] {
        &[
            BiomeKind::None,
            BiomeKind::Hills,
            BiomeKind::Forest,
            BiomeKind::Mountains,
            BiomeKind::Desert,
            BiomeKind::Swamp,
            BiomeKind::MysticForest,
            BiomeKind::PoisonSwamp,
            BiomeKind::DragonBones,
            BiomeKind::Lavascape,
            BiomeKind::IceSpikes,
        ]
    }

    pub fn is_rare(&self) -> bool {
        Self::RARE.contains(self)
    }

    /// Fold a rare variant back to the biome it was upgraded from.
    pub fn base(&self) -> BiomeKind {
        match self {
            BiomeKind::MysticForest => BiomeKind::Forest,
            BiomeKind::PoisonSwamp => BiomeKind::Swamp,
            BiomeKind::DragonBones => BiomeKind::Desert,
            BiomeKind::Lavascape | BiomeKind::IceSpikes => BiomeKind::Mountains,
            other => *other,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BiomeKind::None => "None",
            BiomeKind::Hills => "Hills",
            BiomeKind::Forest => "Forest",
            BiomeKind::Mountains => "Mountains",
            BiomeKind::Desert => "Desert",
            BiomeKind::Swamp => "Swamp",
            BiomeKind::MysticForest => "Mystic Forest",
            BiomeKind::PoisonSwamp => "Poison Swamp",
            BiomeKind::DragonBones => "Dragon Bones",
            BiomeKind::Lavascape => "Lavascape",
            BiomeKind::IceSpikes => "Ice Spikes",
        }
    }
}

impl std::fmt::Display for BiomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Point of interest placed on a tile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PoiKind {
    #[default]
    None,

    // Rare
    Monster,
    MarauderCamp,
    Ruins,
    Village,
    Tomb,

    // Epic
    Monolith,
    Oasis,
    WizardTower,
    Crypt,
    Rift,
    Forge,
    DragonPerch,
    CrystalFields,

    // Megagon
    DragonsDen,
    AncientDragon,
    MageCastle,
    DarkCastle,
    Pyrolith,
    Cryolith,
    ForestsOfGrim,
    GabagolGrudge,
    CorpseOfNorridia,
    MinesOfMortem,
    TheGreatForge,
    DimensionalStronghold,
}

const EPIC_POIS: [PoiKind; 8] = [
    PoiKind::Monolith,
    PoiKind::Oasis,
    PoiKind::WizardTower,
    PoiKind::Crypt,
    PoiKind::Rift,
    PoiKind::Forge,
    PoiKind::DragonPerch,
    PoiKind::CrystalFields,
];

const MEGAGON_POIS: [PoiKind; 12] = [
    PoiKind::DragonsDen,
    PoiKind::AncientDragon,
    PoiKind::MageCastle,
    PoiKind::DarkCastle,
    PoiKind::Pyrolith,
    PoiKind::Cryolith,
    PoiKind::ForestsOfGrim,
    PoiKind::GabagolGrudge,
    PoiKind::CorpseOfNorridia,
    PoiKind::MinesOfMortem,
    PoiKind::TheGreatForge,
    PoiKind::DimensionalStronghold,
];

impl PoiKind {
    pub fn is_epic(&self) -> bool {
        EPIC_POIS.contains(self)
    }

    pub fn is_megagon(&self) -> bool {
        MEGAGON_POIS.contains(self)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PoiKind::None => "None",
            PoiKind::Monster => "Monster",
            PoiKind::MarauderCamp => "Marauder Camp",
            PoiKind::Ruins => "Ruins",
            PoiKind::Village => "Village",
            PoiKind::Tomb => "Tomb",
            PoiKind::Monolith => "Monolith",
            PoiKind::Oasis => "Oasis",
            PoiKind::WizardTower => "Wizard Tower",
            PoiKind::Crypt => "Crypt",
            PoiKind::Rift => "Rift",
            PoiKind::Forge => "Forge",
            PoiKind::DragonPerch => "Dragon Perch",
            PoiKind::CrystalFields => "Crystal Fields",
            PoiKind::DragonsDen => "Dragon's Den",
            PoiKind::AncientDragon => "Ancient Dragon",
            PoiKind::MageCastle => "Mage Castle",
            PoiKind::DarkCastle => "Dark Castle",
            PoiKind::Pyrolith => "Pyrolith",
            PoiKind::Cryolith => "Cryolith",
            PoiKind::ForestsOfGrim => "Forests of Grim",
            PoiKind::GabagolGrudge => "Gabagol Grudge",
            PoiKind::CorpseOfNorridia => "Corpse of Norridia",
            PoiKind::MinesOfMortem => "Mines of Mortem",
            PoiKind::TheGreatForge => "The Great Forge",
            PoiKind::DimensionalStronghold => "Dimensional Stronghold",
        }
    }
}

impl std::fmt::Display for PoiKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Rarity tier of a tile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum TileRarity {
    #[default]
    Basic,
    Rare,
    Epic,
    Megagon,
}

impl TileRarity {
    pub fn all() -> &'static [TileRarity] {
        &[TileRarity::Basic, TileRarity::Rare, TileRarity::Epic, TileRarity::Megagon]
    }
}

impl std::fmt::Display for TileRarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TileRarity::Basic => "Basic",
            TileRarity::Rare => "Rare",
            TileRarity::Epic => "Epic",
            TileRarity::Megagon => "Megagon",
        };
        f.write_str(name)
    }
}

/// POIs that may be placed on a biome at a rarity tier.
///
/// Only `Rare` and `Epic` have tables; other tiers return an empty slice.
pub fn valid_pois(biome: BiomeKind, rarity: TileRarity) -> &'static [PoiKind] {
    use BiomeKind as B;
    use PoiKind as P;

    match rarity {
        TileRarity::Rare => match biome {
            B::Swamp | B::PoisonSwamp => &[P::Monster, P::Ruins, P::Tomb],
            B::Hills => &[P::MarauderCamp, P::Village],
            B::Desert | B::DragonBones => &[P::Ruins, P::Tomb],
            B::Forest | B::MysticForest => &[P::Ruins, P::Village, P::Tomb],
            _ => &[],
        },
        TileRarity::Epic => match biome {
            B::Lavascape => &[P::Monolith, P::Forge],
            B::IceSpikes => &[P::Monolith],
            B::Desert | B::DragonBones => &[P::Oasis],
            B::Mountains => &[P::WizardTower, P::Crypt, P::DragonPerch],
            B::Hills => &[P::Crypt],
            B::MysticForest => &[P::Rift, P::CrystalFields],
            _ => &[],
        },
        TileRarity::Basic | TileRarity::Megagon => &[],
    }
}

/// True if the POI appears in the rare or epic table for the biome
pub fn can_poi_spawn_on_biome(poi: PoiKind, biome: BiomeKind) -> bool {
    valid_pois(biome, TileRarity::Rare).contains(&poi) || valid_pois(biome, TileRarity::Epic).contains(&poi)
}

/// Minimum nearby POI counts that unlock a bonus megagon on a biome
pub struct MegagonBonus {
    pub biome: BiomeKind,
    pub required_poi: PoiKind,
    pub required_count: usize,
    pub megagon: PoiKind,
}

pub const MEGAGON_BONUSES: [MegagonBonus; 2] = [
    MegagonBonus {
        biome: BiomeKind::MysticForest,
        required_poi: PoiKind::Rift,
        required_count: 3,
        megagon: PoiKind::DimensionalStronghold,
    },
    MegagonBonus {
        biome: BiomeKind::Lavascape,
        required_poi: PoiKind::Forge,
        required_count: 2,
        megagon: PoiKind::TheGreatForge,
    },
];

/// Megagons a biome can host without any nearby POI requirement
pub fn megagon_candidates(biome: BiomeKind) -> &'static [PoiKind] {
    use BiomeKind as B;
    use PoiKind as P;

    match biome {
        B::Mountains => &[P::DragonsDen, P::DarkCastle, P::MinesOfMortem],
        B::Desert => &[P::AncientDragon],
        B::MysticForest => &[P::MageCastle],
        B::Lavascape => &[P::Pyrolith],
        B::IceSpikes => &[P::Cryolith],
        B::Forest => &[P::ForestsOfGrim],
        B::PoisonSwamp => &[P::GabagolGrudge],
        B::DragonBones => &[P::CorpseOfNorridia],
        B::None | B::Hills | B::Swamp => &[],
    }
}

/// Rarity of a tile from its biome and POI.
///
/// Without a POI a rare biome makes the tile Rare. With a POI, epic POIs
/// make it Epic and everything else Rare.
pub fn determine_rarity(biome: BiomeKind, poi: PoiKind) -> TileRarity {
    if poi == PoiKind::None {
        if biome.is_rare() {
            TileRarity::Rare
        } else {
            TileRarity::Basic
        }
    } else if poi.is_epic() {
        TileRarity::Epic
    } else {
        TileRarity::Rare
    }
}

/// Generated and exploration state of one hex
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TileRecord {
    pub coordinate: AxialCoord,
    pub biome: BiomeKind,
    pub poi: PoiKind,
    pub rarity: TileRarity,

    pub unlocked: bool,
    pub conquered: bool,
    /// Within view range of a conquered tile
    pub visible: bool,

    pub is_megagon_center: bool,
    pub is_part_of_megagon: bool,
    pub megagon_center: Option<AxialCoord>,

    pub difficulty_level: i32,
    /// Cosmetic sprite index, 0 to 3
    pub visual_variant: i32,
}

impl TileRecord {
    pub fn new(coordinate: AxialCoord) -> Self {
        Self {
            coordinate,
            biome: BiomeKind::None,
            poi: PoiKind::None,
            rarity: TileRarity::Basic,
            unlocked: false,
            conquered: false,
            visible: false,
            is_megagon_center: false,
            is_part_of_megagon: false,
            megagon_center: None,
            difficulty_level: 1,
            visual_variant: 0,
        }
    }

    /// Unlocked and not yet conquered
    pub fn can_enter(&self) -> bool {
        self.unlocked && !self.conquered
    }

    /// POI name if there is one, else the biome name
    pub fn display_name(&self) -> &'static str {
        if self.poi != PoiKind::None {
            self.poi.display_name()
        } else {
            self.biome.display_name()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rare_biomes_fold_to_base() {
        assert_eq!(BiomeKind::MysticForest.base(), BiomeKind::Forest);
        assert_eq!(BiomeKind::PoisonSwamp.base(), BiomeKind::Swamp);
        assert_eq!(BiomeKind::DragonBones.base(), BiomeKind::Desert);
        assert_eq!(BiomeKind::Lavascape.base(), BiomeKind::Mountains);
        assert_eq!(BiomeKind::IceSpikes.base(), BiomeKind::Mountains);
        for biome in BiomeKind::BASE {
            assert_eq!(biome.base(), biome);
            assert!(!biome.is_rare());
        }
    }

    #[test]
    fn test_rarity_derivation() {
        assert_eq!(determine_rarity(BiomeKind::Hills, PoiKind::None), TileRarity::Basic);
        assert_eq!(determine_rarity(BiomeKind::Lavascape, PoiKind::None), TileRarity::Rare);
        assert_eq!(determine_rarity(BiomeKind::Hills, PoiKind::Village), TileRarity::Rare);
        assert_eq!(determine_rarity(BiomeKind::Hills, PoiKind::Crypt), TileRarity::Epic);
        // A rare POI on a rare biome is still only Rare
        assert_eq!(determine_rarity(BiomeKind::MysticForest, PoiKind::Ruins), TileRarity::Rare);
    }

    #[test]
    fn test_poi_tables() {
        assert!(valid_pois(BiomeKind::Mountains, TileRarity::Rare).is_empty());
        assert_eq!(valid_pois(BiomeKind::IceSpikes, TileRarity::Epic), &[PoiKind::Monolith]);
        assert!(valid_pois(BiomeKind::Hills, TileRarity::Megagon).is_empty());

        for biome in BiomeKind::all() {
            for poi in valid_pois(*biome, TileRarity::Epic) {
                assert!(poi.is_epic());
            }
            for poi in valid_pois(*biome, TileRarity::Rare) {
                assert!(!poi.is_epic() && !poi.is_megagon());
            }
            for poi in megagon_candidates(*biome) {
                assert!(poi.is_megagon());
            }
        }

        assert!(can_poi_spawn_on_biome(PoiKind::Oasis, BiomeKind::DragonBones));
        assert!(!can_poi_spawn_on_biome(PoiKind::Oasis, BiomeKind::Forest));
    }

    #[test]
    fn test_megagon_candidates() {
        assert!(megagon_candidates(BiomeKind::Hills).is_empty());
        assert!(megagon_candidates(BiomeKind::Swamp).is_empty());
        assert_eq!(megagon_candidates(BiomeKind::Mountains).len(), 3);
        assert!(MEGAGON_BONUSES.iter().all(|b| b.megagon.is_megagon()));
    }

    #[test]
    fn test_display_name_prefers_poi() {
        let mut tile = TileRecord::new(AxialCoord::new(1, 1));
        tile.biome = BiomeKind::DragonBones;
        assert_eq!(tile.display_name(), "Dragon Bones");
        tile.poi = PoiKind::CorpseOfNorridia;
        assert_eq!(tile.display_name(), "Corpse of Norridia");
    }

    #[test]
    fn test_can_enter() {
        let mut tile = TileRecord::new(AxialCoord::ORIGIN);
        assert!(!tile.can_enter());
        tile.unlocked = true;
        assert!(tile.can_enter());
        tile.conquered = true;
        assert!(!tile.can_enter());
    }
}

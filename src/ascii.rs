//! ASCII rendering for the terminal
//!
//! Draws a hexagonal region of the exploration map (pointy-top rows, each row
//! shifted half a cell per step from the center) and the grid biome map.

use crate::biome_map::{BiomeMap, GridBiome};
use crate::export::{biome_color, grid_biome_color};
use crate::generator::HexMapGenerator;
use crate::hex::AxialCoord;
use crate::tiles::{BiomeKind, TileRarity, TileRecord};

/// What each hex shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Biome glyphs with megagons overlaid
    Biome,
    /// Rarity tier
    Rarity,
    /// Conquered, unlocked, visible or hidden
    Exploration,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Biome => "Biome",
            AsciiMode::Rarity => "Rarity",
            AsciiMode::Exploration => "Exploration",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Biome, AsciiMode::Rarity, AsciiMode::Exploration]
    }
}

impl std::str::FromStr for AsciiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AsciiMode::all()
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown mode '{}'", s))
    }
}

/// Get ASCII character for a biome
pub fn biome_char(biome: BiomeKind) -> char {
    match biome {
        BiomeKind::None => '?',
        BiomeKind::Hills => 'h',
        BiomeKind::Forest => 'f',
        BiomeKind::Mountains => '^',
        BiomeKind::Desert => 'd',
        BiomeKind::Swamp => 's',
        BiomeKind::MysticForest => 'F',
        BiomeKind::PoisonSwamp => 'S',
        BiomeKind::DragonBones => 'D',
        BiomeKind::Lavascape => 'L',
        BiomeKind::IceSpikes => 'I',
    }
}

pub fn rarity_char(rarity: TileRarity) -> char {
    match rarity {
        TileRarity::Basic => '.',
        TileRarity::Rare => 'r',
        TileRarity::Epic => 'E',
        TileRarity::Megagon => 'M',
    }
}

pub fn tile_char(tile: &TileRecord, mode: AsciiMode) -> char {
    match mode {
        AsciiMode::Biome => {
            if tile.is_megagon_center {
                '@'
            } else if tile.is_part_of_megagon {
                '#'
            } else {
                biome_char(tile.biome)
            }
        }
        AsciiMode::Rarity => rarity_char(tile.rarity),
        AsciiMode::Exploration => {
            if tile.conquered {
                'X'
            } else if tile.unlocked {
                'o'
            } else if tile.visible {
                '.'
            } else {
                ' '
            }
        }
    }
}

/// Get ASCII character for a grid biome
pub fn grid_biome_char(biome: GridBiome) -> char {
    match biome {
        GridBiome::Hill => 'h',
        GridBiome::Forest => 'f',
        GridBiome::Mountain => '^',
        GridBiome::Desert => 'd',
        GridBiome::Swamp => 's',
        GridBiome::MysticForest => 'F',
        GridBiome::PoisonousSwamp => 'S',
        GridBiome::DragonBoneyard => 'D',
        GridBiome::Lavascape => 'L',
        GridBiome::IceSpike => 'I',
        GridBiome::GreatPeak => 'A',
        GridBiome::Water => '~',
    }
}

/// Format a single character with ANSI true color (24-bit) background
pub fn ansi_colored_char(ch: char, bg: (u8, u8, u8)) -> String {
    let brightness = (bg.0 as u32 * 299 + bg.1 as u32 * 587 + bg.2 as u32 * 114) / 1000;
    let fg = if brightness > 128 { (0, 0, 0) } else { (255, 255, 255) };
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        fg.0, fg.1, fg.2, bg.0, bg.1, bg.2, ch
    )
}

/// Render every hex within `radius` of `center`, generating tiles as needed.
pub fn render_hex_region(
    generator: &mut HexMapGenerator,
    center: AxialCoord,
    radius: i32,
    mode: AsciiMode,
    colored: bool,
) -> String {
    let mut result = String::new();
    if radius < 0 {
        return result;
    }

    for dr in -radius..=radius {
        result.push_str(&" ".repeat(dr.unsigned_abs() as usize));

        let min_q = (-radius).max(-dr - radius);
        let max_q = radius.min(-dr + radius);
        for dq in min_q..=max_q {
            let coord = AxialCoord::new(center.q + dq, center.r + dr);
            let tile = generator.tile_data(coord);
            let ch = tile_char(tile, mode);
            if colored && tile.biome != BiomeKind::None {
                result.push_str(&ansi_colored_char(ch, biome_color(tile.biome)));
            } else {
                result.push(ch);
            }
            result.push(' ');
        }

        let trimmed = result.trim_end_matches(' ').len();
        result.truncate(trimmed);
        result.push('\n');
    }

    result
}

/// Render the grid biome map, one character per cell
pub fn render_biome_map(map: &BiomeMap, colored: bool) -> String {
    let mut result = String::with_capacity((map.width() + 1) * map.height());

    for y in 0..map.height() as i32 {
        for x in 0..map.width() as i32 {
            match map.biome_at(x, y) {
                Some(biome) if colored => {
                    result.push_str(&ansi_colored_char(grid_biome_char(biome), grid_biome_color(biome)));
                }
                Some(biome) => result.push(grid_biome_char(biome)),
                None => result.push(' '),
            }
        }
        result.push('\n');
    }

    result
}

/// Generate legend for tile characters
pub fn biome_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== BIOME LEGEND ===\n");
    legend.push_str("BASE:\n");
    legend.push_str("  h Hills        f Forest      ^ Mountains   d Desert      s Swamp\n");
    legend.push_str("RARE:\n");
    legend.push_str("  F MysticForest S PoisonSwamp D DragonBones L Lavascape   I IceSpikes\n");
    legend.push_str("MEGAGON:\n");
    legend.push_str("  @ Center       # Member\n");
    legend
}

pub fn grid_biome_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== BIOME LEGEND ===\n");
    for biome in GridBiome::all() {
        legend.push_str(&format!("  {} {}\n", grid_biome_char(*biome), biome.display_name()));
    }
    legend
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome_map::BiomeMapConfig;
    use crate::config::GenerationConfig;

    #[test]
    fn test_region_shape() {
        let mut generator = HexMapGenerator::new(GenerationConfig::default(), 5);
        let text = render_hex_region(&mut generator, AxialCoord::ORIGIN, 2, AsciiMode::Biome, false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        let counts: Vec<usize> = lines.iter().map(|l| l.split_whitespace().count()).collect();
        assert_eq!(counts, vec![3, 4, 5, 4, 3]);
        assert_eq!(generator.generated_tile_count(), 19);
    }

    #[test]
    fn test_exploration_mode() {
        let mut generator = HexMapGenerator::new(GenerationConfig::default(), 5);
        generator.initialize_map(5, AxialCoord::ORIGIN);
        let text = render_hex_region(&mut generator, AxialCoord::ORIGIN, 1, AsciiMode::Exploration, false);

        assert_eq!(text.matches('X').count(), 1);
        assert_eq!(text.matches('o').count(), 6);
    }

    #[test]
    fn test_biome_map_dimensions() {
        let config = BiomeMapConfig {
            width: 10,
            height: 4,
            ..Default::default()
        };
        let map = BiomeMap::generate(config, 3);
        let text = render_biome_map(&map, false);
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().all(|l| l.chars().count() == 10));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("rarity".parse::<AsciiMode>(), Ok(AsciiMode::Rarity));
        assert!("plates".parse::<AsciiMode>().is_err());
    }
}

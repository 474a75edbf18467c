use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::biome_map::{BiomeMap, GridBiome};
use crate::fields::{FieldKind, FIELD_MAX};
use crate::generator::HexMapGenerator;
use crate::hex::AxialCoord;
use crate::tiles::BiomeKind;
use crate::tilemap::Tilemap;

/// Debug palette of the grid biomes
pub fn grid_biome_color(biome: GridBiome) -> (u8, u8, u8) {
    match biome {
        GridBiome::Hill => (144, 238, 144),
        GridBiome::Forest => (34, 139, 34),
        GridBiome::Mountain => (139, 137, 137),
        GridBiome::Desert => (237, 201, 175),
        GridBiome::Swamp => (107, 142, 35),
        GridBiome::MysticForest => (138, 43, 226),
        GridBiome::PoisonousSwamp => (154, 205, 50),
        GridBiome::DragonBoneyard => (245, 245, 220),
        GridBiome::Lavascape => (255, 69, 0),
        GridBiome::IceSpike => (175, 238, 238),
        GridBiome::Water => (65, 105, 225),
        GridBiome::GreatPeak => (255, 255, 255),
    }
}

/// Palette of the exploration biomes
pub fn biome_color(biome: BiomeKind) -> (u8, u8, u8) {
    match biome {
        BiomeKind::None => (40, 40, 40),
        BiomeKind::Hills => (144, 238, 144),
        BiomeKind::Forest => (34, 139, 34),
        BiomeKind::Mountains => (139, 137, 137),
        BiomeKind::Desert => (237, 201, 175),
        BiomeKind::Swamp => (107, 142, 35),
        BiomeKind::MysticForest => (138, 43, 226),
        BiomeKind::PoisonSwamp => (154, 205, 50),
        BiomeKind::DragonBones => (245, 245, 220),
        BiomeKind::Lavascape => (255, 69, 0),
        BiomeKind::IceSpikes => (175, 238, 238),
    }
}

const MEGAGON_COLOR: (u8, u8, u8) = (200, 30, 60);

fn rgb((r, g, b): (u8, u8, u8)) -> Rgb<u8> {
    Rgb([r, g, b])
}

/// Export the grid biome map, one pixel per cell.
pub fn export_biome_map(map: &BiomeMap, path: &Path) -> Result<(), image::ImageError> {
    let mut img: RgbImage = ImageBuffer::new(map.width() as u32, map.height() as u32);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        if let Some(biome) = map.biome_at(x as i32, y as i32) {
            *pixel = rgb(grid_biome_color(biome));
        }
    }

    img.save(path)
}

/// Export one continuous field using spectral colormap.
/// Values are scaled from `[0, 2]` to the colormap range.
pub fn export_field(map: &BiomeMap, kind: FieldKind, path: &Path) -> Result<(), image::ImageError> {
    export_scalar_map(map.fields().field(kind), FIELD_MAX, path)
}

pub fn export_scalar_map(values: &Tilemap<f32>, max: f32, path: &Path) -> Result<(), image::ImageError> {
    let mut img: RgbImage = ImageBuffer::new(values.width as u32, values.height as u32);
    let scale = if max > 0.0 { max } else { 1.0 };

    for (x, y, val) in values.iter() {
        let color = spectral_colormap((val / scale).clamp(0.0, 1.0));
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }

    img.save(path)
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],
        [0.20, 0.53, 0.74],
        [0.40, 0.76, 0.65],
        [0.67, 0.87, 0.64],
        [0.90, 0.96, 0.60],
        [1.00, 1.00, 0.75],
        [1.00, 0.88, 0.55],
        [0.99, 0.68, 0.38],
        [0.96, 0.43, 0.26],
        [0.84, 0.24, 0.31],
        [0.62, 0.00, 0.26],
    ];

    let t_scaled = t * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

/// Export a hexagonal region of the exploration map.
///
/// Each hex is a `cell x cell` block; rows are shifted half a hex per step
/// so the region keeps its hexagonal outline. Megagon members are drawn in a
/// single highlight color.
pub fn export_hex_region(
    generator: &mut HexMapGenerator,
    center: AxialCoord,
    radius: i32,
    cell: u32,
    path: &Path,
) -> Result<(), image::ImageError> {
    let radius = radius.max(0);
    let cell = cell.max(2);
    let half = cell / 2;
    let side = (2 * radius + 1) as u32;

    let mut img: RgbImage = ImageBuffer::from_pixel(side * cell + half, side * cell, Rgb([0, 0, 0]));

    for hex in center.hexes_in_range(radius) {
        let dq = hex.q - center.q;
        let dr = hex.r - center.r;
        let tile = generator.tile_data(hex);
        let color = if tile.is_megagon_center || tile.is_part_of_megagon {
            MEGAGON_COLOR
        } else {
            biome_color(tile.biome)
        };

        // Column in doubled units: 2*dq + dr, shifted to be non-negative
        let doubled = (2 * dq + dr + 2 * radius) as u32;
        let px = doubled * half;
        let py = (dr + radius) as u32 * cell;

        for oy in 0..cell.saturating_sub(1) {
            for ox in 0..cell.saturating_sub(1) {
                let (x, y) = (px + ox, py + oy);
                if x < img.width() && y < img.height() {
                    img.put_pixel(x, y, rgb(color));
                }
            }
        }
    }

    img.save(path)
}

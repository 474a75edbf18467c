//! Hex world generation library
//!
//! Deterministic procedural generation for a hex-tiled fantasy map: a bounded
//! biome grid painted from continuous noise fields, and an unbounded
//! exploration map whose tiles are generated lazily as the player conquers
//! their way outward.

pub mod ascii;
pub mod biome_map;
pub mod config;
pub mod export;
pub mod fields;
pub mod generator;
pub mod hex;
pub mod save;
pub mod seeds;
pub mod stats;
pub mod strategy;
pub mod tilemap;
pub mod tiles;

pub use biome_map::{BiomeMap, BiomeMapConfig, GridBiome};
pub use config::GenerationConfig;
pub use generator::HexMapGenerator;
pub use hex::AxialCoord;
pub use save::{SaveSnapshot, SaveStore};
pub use seeds::SeededRandom;
pub use tiles::{BiomeKind, PoiKind, TileRarity, TileRecord};

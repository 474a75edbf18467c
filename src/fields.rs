//! Continuous field generation for the grid biome map
//!
//! Five independent fractal noise fields (temperature, moisture, altitude,
//! volatility, enchantment) sampled over a bounded grid. Each field is built by
//! summing octaves of Perlin noise, normalizing by total amplitude, then folding
//! the result into `[0, 2]` with `2 * |n|`, which piles values up at both ends
//! of the range rather than around 1.0.

use noise::{NoiseFn, Perlin};

use crate::seeds::FieldSeeds;
use crate::tilemap::Tilemap;

/// Offset between the hash of consecutive octaves
const OCTAVE_HASH_STEP: i64 = 1000;

/// Scale applied to the octave hash before it shifts the sample position
const HASH_OFFSET_SCALE: f64 = 0.1;

/// Upper bound of a folded field value
pub const FIELD_MAX: f32 = 2.0;

/// The five continuous fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Temperature,
    Moisture,
    Altitude,
    Volatility,
    Enchantment,
}

impl FieldKind {
    pub fn all() -> &'static [FieldKind] {
        &[
            FieldKind::Temperature,
            FieldKind::Moisture,
            FieldKind::Altitude,
            FieldKind::Volatility,
            FieldKind::Enchantment,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Temperature => "temperature",
            FieldKind::Moisture => "moisture",
            FieldKind::Altitude => "altitude",
            FieldKind::Volatility => "volatility",
            FieldKind::Enchantment => "enchantment",
        }
    }

    /// Seed used for this field
    pub fn seed(&self, seeds: &FieldSeeds) -> i32 {
        match self {
            FieldKind::Temperature => seeds.temperature,
            FieldKind::Moisture => seeds.moisture,
            FieldKind::Altitude => seeds.altitude,
            FieldKind::Volatility => seeds.volatility,
            FieldKind::Enchantment => seeds.enchantment,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// Noise shape of a single field
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Wavelength of the first octave, in cells
    pub period: f32,
    /// Number of octaves (each halves amplitude and doubles frequency)
    pub octaves: u32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            period: 5.0,
            octaves: 1,
        }
    }
}

/// Noise shape of all five fields
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub temperature: FieldParams,
    pub moisture: FieldParams,
    pub altitude: FieldParams,
    pub volatility: FieldParams,
    pub enchantment: FieldParams,
}

impl FieldSettings {
    pub fn params(&self, kind: FieldKind) -> &FieldParams {
        match kind {
            FieldKind::Temperature => &self.temperature,
            FieldKind::Moisture => &self.moisture,
            FieldKind::Altitude => &self.altitude,
            FieldKind::Volatility => &self.volatility,
            FieldKind::Enchantment => &self.enchantment,
        }
    }
}

/// All field values at one grid cell
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct FieldSample {
    pub temperature: f32,
    pub moisture: f32,
    pub altitude: f32,
    pub volatility: f32,
    pub enchantment: f32,
}

/// The five generated fields, stored as parallel grids
#[derive(Clone, Debug)]
pub struct ContinuousFields {
    pub width: usize,
    pub height: usize,
    pub temperature: Tilemap<f32>,
    pub moisture: Tilemap<f32>,
    pub altitude: Tilemap<f32>,
    pub volatility: Tilemap<f32>,
    pub enchantment: Tilemap<f32>,
}

impl ContinuousFields {
    /// Generate every field for a `width x height` grid.
    ///
    /// Runs synchronously over all `width * height * 5` cells.
    pub fn generate(width: usize, height: usize, settings: &FieldSettings, seeds: &FieldSeeds) -> Self {
        let map = |kind: FieldKind| generate_noise_map(width, height, settings.params(kind), kind.seed(seeds));

        Self {
            width,
            height,
            temperature: map(FieldKind::Temperature),
            moisture: map(FieldKind::Moisture),
            altitude: map(FieldKind::Altitude),
            volatility: map(FieldKind::Volatility),
            enchantment: map(FieldKind::Enchantment),
        }
    }

    pub fn field(&self, kind: FieldKind) -> &Tilemap<f32> {
        match kind {
            FieldKind::Temperature => &self.temperature,
            FieldKind::Moisture => &self.moisture,
            FieldKind::Altitude => &self.altitude,
            FieldKind::Volatility => &self.volatility,
            FieldKind::Enchantment => &self.enchantment,
        }
    }

    /// Values of all fields at a cell, or `None` outside the grid
    pub fn sample(&self, x: i32, y: i32) -> Option<FieldSample> {
        Some(FieldSample {
            temperature: *self.temperature.get_signed(x, y)?,
            moisture: *self.moisture.get_signed(x, y)?,
            altitude: *self.altitude.get_signed(x, y)?,
            volatility: *self.volatility.get_signed(x, y)?,
            enchantment: *self.enchantment.get_signed(x, y)?,
        })
    }
}

/// Fractal Perlin noise at a grid position, normalized to roughly `[-1, 1]`.
///
/// Each octave samples at a position shifted by `(seed + i * 1000) * 0.1`
/// on both axes, which decorrelates fields that share the same lattice.
pub fn perlin_fbm(noise: &Perlin, x: f64, y: f64, params: &FieldParams, seed: i32) -> f64 {
    let octaves = params.octaves.max(1);
    let period = if params.period > 0.0 { params.period as f64 } else { 1.0 };

    let mut total = 0.0;
    let mut frequency = 1.0 / period;
    let mut amplitude = 1.0;
    let mut max_value = 0.0;

    for i in 0..octaves {
        let hash = seed as i64 + i as i64 * OCTAVE_HASH_STEP;
        let offset = hash as f64 * HASH_OFFSET_SCALE;

        let value = noise.get([x * frequency + offset, y * frequency + offset]);

        total += value * amplitude;
        max_value += amplitude;

        amplitude *= 0.5;
        frequency *= 2.0;
    }

    (total / max_value).clamp(-1.0, 1.0)
}

/// Map normalized noise `n` in `[-1, 1]` to a field value `2 * |n|` in `[0, 2]`.
pub fn fold(normalized: f64) -> f32 {
    (2.0 * normalized.abs()) as f32
}

/// Generate one folded noise field over the grid.
pub fn generate_noise_map(width: usize, height: usize, params: &FieldParams, seed: i32) -> Tilemap<f32> {
    let noise = Perlin::new(0);
    Tilemap::from_fn(width, height, |x, y| {
        fold(perlin_fbm(&noise, x as f64, y as f64, params, seed))
    })
}

//! Seed management for world generation
//!
//! Provides the deterministic random stream used by every generator, plus the
//! per-field seeds of the continuous terrain model. All randomness in the crate
//! flows from a single signed 32-bit world seed so a saved game only needs to
//! record that seed to regenerate its world.

/// LCG multiplier (Numerical Recipes)
const LCG_MULTIPLIER: u32 = 1664525;

/// LCG increment (Numerical Recipes)
const LCG_INCREMENT: u32 = 1013904223;

/// Knuth multiplicative hash constant used to mix coordinates into a seed
const COORDINATE_HASH: u32 = 2654435761;

/// Largest f32 strictly below 1.0
const LARGEST_BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// Deterministic pseudo-random stream.
///
/// A 32-bit linear congruential generator. The state wraps on overflow, which
/// is the modulus. Two generators built from the same seed produce identical
/// sequences on every platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRandom {
    seed: i32,
    state: u32,
}

impl SeededRandom {
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            state: seed as u32,
        }
    }

    /// Rewind to the initial seed.
    pub fn reset(&mut self) {
        self.state = self.seed as u32;
    }

    /// Replace the seed and rewind.
    pub fn set_seed(&mut self, seed: i32) {
        self.seed = seed;
        self.state = seed as u32;
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Advance the state and return it.
    pub fn next_u32(&mut self) -> u32 {
        self.state = LCG_MULTIPLIER
            .wrapping_mul(self.state)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Random integer in `[min, max]` (inclusive). Reversed bounds are swapped.
    pub fn int_range(&mut self, min: i32, max: i32) -> i32 {
        let (min, max) = if min > max { (max, min) } else { (min, max) };

        if min == max {
            return min;
        }

        let range = (max as i64 - min as i64 + 1) as u64;
        let value = self.next_u32() as u64 % range;
        (min as i64 + value as i64) as i32
    }

    /// Random index in `[0, len)`. Returns `None` for an empty collection.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.int_range(0, len as i32 - 1) as usize)
    }

    /// Random float in `[0, 1)`.
    pub fn float01(&mut self) -> f32 {
        // Values within 2^-25 of one would round up to 1.0 in f32
        let value = (self.next_u32() as f64 / 4294967296.0) as f32;
        value.min(LARGEST_BELOW_ONE)
    }

    /// Random float in `[min, max)`.
    pub fn float_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.float01()
    }

    /// True with the given probability.
    pub fn chance(&mut self, probability: f32) -> bool {
        self.float01() < probability
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.chance(0.5)
    }

    /// Seed for a single coordinate, mixing the world seed with `q` then `r`.
    pub fn coordinate_seed(&self, q: i32, r: i32) -> u32 {
        let hash = (self.seed as u32)
            .wrapping_mul(COORDINATE_HASH)
            .wrapping_add(q as u32);
        hash.wrapping_mul(COORDINATE_HASH).wrapping_add(r as u32)
    }

    /// Independent generator for a coordinate.
    ///
    /// Depends only on `(seed, q, r)`, never on how far this generator has
    /// been advanced, so the same coordinate always sees the same draws.
    pub fn from_coordinate(&self, q: i32, r: i32) -> SeededRandom {
        SeededRandom::new(self.coordinate_seed(q, r) as i32)
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(0)
    }
}

impl rand::RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        SeededRandom::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = SeededRandom::next_u32(self) as u64;
        let lo = SeededRandom::next_u32(self) as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = SeededRandom::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Seeds for the five continuous terrain fields.
///
/// Each field gets its own seed, offset from the master seed by default so the
/// fields stay decorrelated. Individual seeds can be overridden for experimentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSeeds {
    /// Master seed (used for display/reference)
    pub master: i32,
    /// Temperature field (hot lands vs cold lands)
    pub temperature: i32,
    /// Moisture field (wetlands vs drylands)
    pub moisture: i32,
    /// Altitude field (highlands vs lowlands)
    pub altitude: i32,
    /// Volatility field (amount of points of interest)
    pub volatility: i32,
    /// Enchantment field (presence of rare biomes)
    pub enchantment: i32,
}

impl FieldSeeds {
    /// Derive every field seed from a master seed.
    pub fn from_master(master: i32) -> Self {
        Self {
            master,
            temperature: master,
            moisture: master.wrapping_add(1000),
            altitude: master.wrapping_add(2000),
            volatility: master.wrapping_add(3000),
            enchantment: master.wrapping_add(4000),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: i32) -> FieldSeedsBuilder {
        FieldSeedsBuilder::new(master)
    }
}

/// Builder for overriding individual field seeds while deriving the rest
pub struct FieldSeedsBuilder {
    seeds: FieldSeeds,
}

impl FieldSeedsBuilder {
    pub fn new(master: i32) -> Self {
        Self {
            seeds: FieldSeeds::from_master(master),
        }
    }

    pub fn temperature(mut self, seed: i32) -> Self {
        self.seeds.temperature = seed;
        self
    }

    pub fn moisture(mut self, seed: i32) -> Self {
        self.seeds.moisture = seed;
        self
    }

    pub fn altitude(mut self, seed: i32) -> Self {
        self.seeds.altitude = seed;
        self
    }

    pub fn volatility(mut self, seed: i32) -> Self {
        self.seeds.volatility = seed;
        self
    }

    pub fn enchantment(mut self, seed: i32) -> Self {
        self.seeds.enchantment = seed;
        self
    }

    pub fn build(self) -> FieldSeeds {
        self.seeds
    }
}

impl std::fmt::Display for FieldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FieldSeeds {{ master: {}, temperature: {}, moisture: {}, altitude: {}, \
             volatility: {}, enchantment: {} }}",
            self.master,
            self.temperature,
            self.moisture,
            self.altitude,
            self.volatility,
            self.enchantment,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_first_values() {
        let mut rng = SeededRandom::new(0);
        assert_eq!(rng.next_u32(), 1013904223);
        assert_eq!(rng.next_u32(), 1013904223u32.wrapping_mul(1664525).wrapping_add(1013904223));
    }

    #[test]
    fn test_negative_seed_casts_to_state() {
        let mut a = SeededRandom::new(-1);
        let expected = 1664525u32.wrapping_mul(u32::MAX).wrapping_add(1013904223);
        assert_eq!(a.next_u32(), expected);
    }

    #[test]
    fn test_reset_replays_sequence() {
        let mut rng = SeededRandom::new(42);
        let first: Vec<u32> = (0..5).map(|_| rng.next_u32()).collect();
        rng.reset();
        let second: Vec<u32> = (0..5).map(|_| rng.next_u32()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_int_range_degenerate_and_swapped() {
        let mut rng = SeededRandom::new(7);
        let before = rng.clone();
        assert_eq!(rng.int_range(3, 3), 3);
        // Degenerate range consumes no state
        assert_eq!(rng, before);

        for _ in 0..200 {
            let v = rng.int_range(10, -10);
            assert!((-10..=10).contains(&v));
        }
    }

    #[test]
    fn test_int_range_full_span_does_not_overflow() {
        let mut rng = SeededRandom::new(99);
        for _ in 0..50 {
            let _ = rng.int_range(i32::MIN, i32::MAX);
        }
    }

    #[test]
    fn test_float01_half_open() {
        let mut rng = SeededRandom::new(1234);
        for _ in 0..10_000 {
            let v = rng.float01();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = SeededRandom::new(5);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn test_coordinate_generator_ignores_parent_state() {
        let mut world = SeededRandom::new(12345);
        let fresh = world.from_coordinate(5, 3);
        for _ in 0..17 {
            world.next_u32();
        }
        let advanced = world.from_coordinate(5, 3);
        assert_eq!(fresh, advanced);
    }

    #[test]
    fn test_coordinate_seed_is_order_sensitive() {
        let world = SeededRandom::new(12345);
        assert_ne!(world.coordinate_seed(1, 2), world.coordinate_seed(2, 1));
        assert_eq!(
            world.coordinate_seed(1, 2),
            12345u32
                .wrapping_mul(2654435761)
                .wrapping_add(1)
                .wrapping_mul(2654435761)
                .wrapping_add(2)
        );
    }

    #[test]
    fn test_field_seed_offsets() {
        let seeds = FieldSeeds::from_master(10);
        assert_eq!(seeds.temperature, 10);
        assert_eq!(seeds.moisture, 1010);
        assert_eq!(seeds.altitude, 2010);
        assert_eq!(seeds.volatility, 3010);
        assert_eq!(seeds.enchantment, 4010);
    }

    #[test]
    fn test_builder_override() {
        let seeds = FieldSeeds::builder(12345).moisture(99999).build();
        assert_eq!(seeds.moisture, 99999);

        let defaults = FieldSeeds::from_master(12345);
        assert_eq!(seeds.altitude, defaults.altitude);
        assert_eq!(seeds.temperature, defaults.temperature);
    }

    #[test]
    fn test_rng_core_interop() {
        use rand::seq::SliceRandom;

        let items = [1, 2, 3, 4, 5];
        let mut a = SeededRandom::new(3);
        let mut b = SeededRandom::new(3);
        assert_eq!(items.choose(&mut a), items.choose(&mut b));
    }
}
